//! Error types for the intent router.

use std::time::Duration;

use crate::intent::Category;

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Unknown service: {0}")]
    UnknownService(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Text-generation provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} is not configured")]
    NotConfigured { provider: String },

    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Provider {provider} timed out after {timeout:?}")]
    Timeout { provider: String, timeout: Duration },

    #[error("Provider {provider} returned HTTP {status}: {body}")]
    HttpStatus {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Remote classification failures. Recovered inside the remote adapter.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error("classification transport failed: {0}")]
    Transport(#[from] LlmError),

    #[error("classification response unparseable: {0}")]
    Parse(String),
}

/// A capability handler failed. Recovered by the dispatcher.
#[derive(Debug, thiserror::Error)]
pub enum CapabilityError {
    #[error("Capability {capability} failed: {reason}")]
    ExecutionFailed { capability: String, reason: String },

    #[error("Capability completion failed: {0}")]
    Llm(#[from] LlmError),
}

/// Errors that escape local recovery and fail the whole dispatch.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("classifier failed: {0}")]
    Classification(#[from] ClassifyError),

    #[error("capability for {category} produced a malformed payload: {reason}")]
    MalformedOutput { category: Category, reason: String },

    #[error("failed to record conversation: {0}")]
    LogAppend(#[from] LogError),
}

/// Conversation log errors.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("Failed to append record {id}: {reason}")]
    AppendFailed { id: String, reason: String },
}

//! Request and envelope types for the dispatch pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::intent::Category;

/// Error code reported in the failure envelope.
pub const INTERNAL_ERROR_CODE: &str = "internal_error";

/// User-facing text in the failure envelope.
pub const FALLBACK_MESSAGE: &str =
    "I'm sorry, something went wrong while handling your request. Please try again in a moment.";

/// Response substituted when a capability fails.
pub const CAPABILITY_APOLOGY: &str =
    "I apologize, but I encountered an error processing your request. Please try again.";

// ── Inbound request ─────────────────────────────────────────────────

/// One message to classify and dispatch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchRequest {
    #[serde(default)]
    pub message: String,
    /// Free-form caller context, passed to the classifier and capabilities.
    #[serde(default)]
    pub context: serde_json::Value,
    /// Business name or description used in generated text.
    #[serde(default)]
    pub business_context: Option<String>,
}

impl DispatchRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = context;
        self
    }

    pub fn with_business_context(mut self, business: impl Into<String>) -> Self {
        self.business_context = Some(business.into());
        self
    }
}

// ── Dispatch stages ─────────────────────────────────────────────────

/// Where a dispatch is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchStage {
    Classifying,
    Dispatching,
    Responding,
}

impl DispatchStage {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Classifying => "classifying",
            Self::Dispatching => "dispatching",
            Self::Responding => "responding",
        }
    }
}

// ── Normalized capability output ────────────────────────────────────

/// Capability output flattened into envelope fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResponse {
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompts: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<serde_json::Value>,
}

// ── Envelopes ───────────────────────────────────────────────────────

/// Envelope for a dispatch that produced a response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchSuccess {
    /// Always `true`.
    pub success: bool,
    #[serde(flatten)]
    pub body: NormalizedResponse,
    /// Category the message was routed on.
    pub intent: Category,
    pub timestamp: DateTime<Utc>,
}

/// Envelope for a dispatch that failed past local recovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchFailure {
    /// Always `false`.
    pub success: bool,
    pub error: String,
    pub fallback: String,
}

impl Default for DispatchFailure {
    fn default() -> Self {
        Self {
            success: false,
            error: INTERNAL_ERROR_CODE.to_string(),
            fallback: FALLBACK_MESSAGE.to_string(),
        }
    }
}

/// Result of one dispatch, serialized as either envelope shape.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum DispatchOutcome {
    Success(DispatchSuccess),
    Failure(DispatchFailure),
}

impl DispatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn success(&self) -> Option<&DispatchSuccess> {
        match self {
            Self::Success(success) => Some(success),
            Self::Failure(_) => None,
        }
    }

    /// Response text, or the fallback text on failure.
    pub fn text(&self) -> &str {
        match self {
            Self::Success(success) => &success.body.response,
            Self::Failure(failure) => &failure.fallback,
        }
    }
}

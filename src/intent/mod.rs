//! Intent classification.
//!
//! Two tiers behind one trait:
//! 1. `RemoteClassifier`: asks the text-generation service for a structured intent
//! 2. `KeywordClassifier`: deterministic keyword rules, used when the service
//!    is unconfigured
//!
//! The dispatcher only sees `IntentClassifier`; configuration decides which tier runs.

pub mod keywords;
pub mod remote;
pub mod types;

pub use keywords::KeywordClassifier;
pub use remote::RemoteClassifier;
pub use types::{Business, Category, GENERAL_ASSISTANCE, Intent, Priority};

use async_trait::async_trait;

use crate::error::ClassifyError;

/// Anything that can turn a message into an `Intent`.
///
/// The built-in classifiers never return `Err`; the `Result` exists so the
/// dispatcher can treat a misbehaving injected classifier as a fatal dispatch
/// error instead of panicking.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    /// Short name for logging ("remote", "keyword").
    fn name(&self) -> &str;

    async fn classify(
        &self,
        message: &str,
        context: &serde_json::Value,
    ) -> Result<Intent, ClassifyError>;
}

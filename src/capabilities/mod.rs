//! Capabilities: one handler per business-domain category.
//!
//! Every capability implements the same `Capability` contract and returns
//! either plain text or a structured JSON payload carrying a `response`
//! field plus optional side fields. The dispatcher normalizes both shapes.

pub mod canned;
pub mod content;
pub mod general;
pub mod registry;
pub mod social;

pub use content::ContentCapability;
pub use general::GeneralCapability;
pub use registry::CapabilityRegistry;
pub use social::SocialCapability;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_BUSINESS_CONTEXT;
use crate::error::CapabilityError;
use crate::intent::Intent;

/// Everything a capability sees about one request.
#[derive(Debug, Clone, Copy)]
pub struct CapabilityRequest<'a> {
    pub intent: &'a Intent,
    pub message: &'a str,
    /// Caller-supplied business name/description, if any.
    pub business_context: Option<&'a str>,
    /// Free-form caller context (JSON object or null).
    pub context: &'a serde_json::Value,
}

impl<'a> CapabilityRequest<'a> {
    /// Business context for template interpolation.
    pub fn business(&self) -> &'a str {
        self.business_context
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .unwrap_or(DEFAULT_BUSINESS_CONTEXT)
    }
}

/// Raw output of a capability, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CapabilityOutput {
    Text(String),
    /// JSON object expected to hold a string `response` field.
    Structured(serde_json::Value),
}

impl CapabilityOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Build a structured payload from a response and named side fields.
    pub fn structured<I>(response: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, serde_json::Value)>,
    {
        let mut object = serde_json::Map::new();
        object.insert("response".into(), serde_json::Value::String(response.into()));
        for (key, value) in fields {
            object.insert(key.into(), value);
        }
        Self::Structured(serde_json::Value::Object(object))
    }
}

/// A handler bound to one or more intent categories.
#[async_trait]
pub trait Capability: Send + Sync {
    /// Capability name for logging.
    fn name(&self) -> &str;

    async fn handle(
        &self,
        request: &CapabilityRequest<'_>,
    ) -> Result<CapabilityOutput, CapabilityError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::Category;

    #[test]
    fn business_defaults_when_blank() {
        let intent = Intent::new(Category::General, 0.6, "x");
        let context = serde_json::Value::Null;
        let mut request = CapabilityRequest {
            intent: &intent,
            message: "hi",
            business_context: None,
            context: &context,
        };
        assert_eq!(request.business(), "your business");

        request.business_context = Some("  ");
        assert_eq!(request.business(), "your business");

        request.business_context = Some(" Acme ");
        assert_eq!(request.business(), "Acme");
    }

    #[test]
    fn structured_output_shape() {
        let output = CapabilityOutput::structured(
            "done",
            [("caption", serde_json::json!("hello"))],
        );
        let CapabilityOutput::Structured(value) = output else {
            panic!("expected structured output");
        };
        assert_eq!(value["response"], "done");
        assert_eq!(value["caption"], "hello");
    }

    #[test]
    fn output_serializes_untagged() {
        let text = serde_json::to_value(CapabilityOutput::text("plain")).unwrap();
        assert_eq!(text, "plain");
    }
}

//! Social media capability.

use async_trait::async_trait;
use serde_json::json;

use super::canned::render;
use super::{Capability, CapabilityOutput, CapabilityRequest};
use crate::error::CapabilityError;

pub const SOCIAL_DEFAULT: &str = "I can help run social media for {business}: planning posts, \
writing captions, and tracking engagement. Social accounts are running in demo mode, so nothing \
is published automatically. Ask me for a caption or a posting plan to get started.";

const CAPTION_RESPONSE: &str = "Here's a caption you can post for {business}:";

const CAPTION_TEMPLATE: &str = "Big things are happening at {business}. We've been heads-down \
building something we think you'll love, and we can't wait to show you. Stay tuned! \
#behindthescenes #smallbusiness";

const POSTING_PLAN: &str = "Posting plan for {business}: 3 posts a week on your main channel, \
one educational, one behind-the-scenes, and one customer story. Post between 9 and 11am for \
the best reach.";

/// Social media capability. Caption requests return a structured payload
/// with a `caption` side field; everything else is plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct SocialCapability;

#[async_trait]
impl Capability for SocialCapability {
    fn name(&self) -> &str {
        "social"
    }

    async fn handle(
        &self,
        request: &CapabilityRequest<'_>,
    ) -> Result<CapabilityOutput, CapabilityError> {
        let lowered = request.message.to_lowercase();
        let business = request.business();

        if lowered.contains("caption") {
            return Ok(CapabilityOutput::structured(
                render(CAPTION_RESPONSE, business),
                [("caption", json!(render(CAPTION_TEMPLATE, business)))],
            ));
        }

        if ["plan", "strategy", "how often", "when to post"]
            .iter()
            .any(|k| lowered.contains(k))
        {
            return Ok(CapabilityOutput::Text(render(POSTING_PLAN, business)));
        }

        Ok(CapabilityOutput::Text(render(SOCIAL_DEFAULT, business)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::{Category, Intent};

    async fn run(message: &str) -> CapabilityOutput {
        let intent = Intent::new(Category::Social, 0.7, "social_media_management");
        let context = serde_json::Value::Null;
        let request = CapabilityRequest {
            intent: &intent,
            message,
            business_context: Some("Acme"),
            context: &context,
        };
        SocialCapability.handle(&request).await.unwrap()
    }

    #[tokio::test]
    async fn caption_request_is_structured() {
        let CapabilityOutput::Structured(value) = run("Write an Instagram caption").await else {
            panic!("expected structured output");
        };
        assert!(value["response"].as_str().unwrap().contains("Acme"));
        assert!(value["caption"].as_str().unwrap().contains("Acme"));
    }

    #[tokio::test]
    async fn plan_request_is_text() {
        let output = run("what's a good posting strategy?").await;
        assert!(matches!(output, CapabilityOutput::Text(ref t) if t.starts_with("Posting plan for Acme")));
    }

    #[tokio::test]
    async fn default_reply() {
        assert_eq!(
            run("social stuff").await,
            CapabilityOutput::Text(render(SOCIAL_DEFAULT, "Acme"))
        );
    }
}

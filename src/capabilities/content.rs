//! Content-generation capability: image prompts and weekly content calendars.
//!
//! Sub-dispatch is pure substring matching over the lowercased message; no
//! further classification call is made. Calendar phrases are checked before
//! prompt phrases so "generate a content calendar" yields a calendar.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::canned::render;
use super::{Capability, CapabilityOutput, CapabilityRequest};
use crate::error::CapabilityError;

const CALENDAR_TRIGGERS: &[&str] = &["content calendar", "weekly calendar"];
const IMAGE_PROMPT_TRIGGERS: &[&str] = &["image prompt", "high-end image", "generate"];

pub const CLARIFYING_QUESTION: &str = "I can create high-end image prompts or a weekly content \
calendar for {business}. Which would you like? Mention \"image prompts\" or \"content calendar\" \
and I'll get started.";

/// One day of a content calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEntry {
    pub day: String,
    pub theme: String,
    pub content: String,
    pub post_idea: String,
    pub optimal_time: String,
}

/// (day, theme, content format, optimal time) for Monday through Friday.
const WEEK_PLAN: [(&str, &str, &str, &str); 5] = [
    ("Monday", "Motivation Monday", "Inspirational quote graphic", "8:00 AM"),
    ("Tuesday", "Tips Tuesday", "Carousel of practical tips", "12:00 PM"),
    ("Wednesday", "Behind the Scenes", "Short-form video", "5:00 PM"),
    ("Thursday", "Client Spotlight", "Case study post", "11:00 AM"),
    ("Friday", "Feature Friday", "Product or service showcase", "3:00 PM"),
];

/// Build the Monday–Friday calendar for a business.
pub fn build_content_calendar(business: &str) -> Vec<CalendarEntry> {
    WEEK_PLAN
        .iter()
        .map(|(day, theme, content, time)| CalendarEntry {
            day: (*day).to_string(),
            theme: (*theme).to_string(),
            content: (*content).to_string(),
            post_idea: post_idea(theme, business),
            optimal_time: (*time).to_string(),
        })
        .collect()
}

fn post_idea(theme: &str, business: &str) -> String {
    match theme {
        "Motivation Monday" => format!("Share the mission that drives {business} and why it matters"),
        "Tips Tuesday" => format!("Five quick wins your audience can use today, from the {business} team"),
        "Behind the Scenes" => format!("A day in the life at {business}"),
        "Client Spotlight" => format!("How {business} helped a client reach a measurable result"),
        _ => format!("Showcase the signature offer of {business} with a clear call to action"),
    }
}

/// Five parameterized, high-end image prompts for a business.
pub fn build_image_prompts(business: &str) -> Vec<String> {
    vec![
        format!(
            "Ultra-realistic editorial photograph of the {business} workspace at golden hour, \
             shallow depth of field, 85mm lens, warm natural light"
        ),
        format!(
            "Minimalist flat-lay of premium products representing {business}, soft shadows, \
             neutral palette, top-down studio lighting, 8k detail"
        ),
        format!(
            "Cinematic portrait of a confident founder leading {business}, dramatic rim light, \
             moody background, magazine cover composition"
        ),
        format!(
            "Futuristic 3D render visualizing the growth of {business}, glass and chrome \
             elements, volumetric lighting, clean gradient backdrop"
        ),
        format!(
            "Lifestyle photo of happy customers using {business} services, candid moment, \
             vibrant colors, bright airy atmosphere, high-end commercial style"
        ),
    ]
}

/// Capability bound to both the `prompts` and `content` categories.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentCapability;

#[async_trait]
impl Capability for ContentCapability {
    fn name(&self) -> &str {
        "content"
    }

    async fn handle(
        &self,
        request: &CapabilityRequest<'_>,
    ) -> Result<CapabilityOutput, CapabilityError> {
        let lowered = request.message.to_lowercase();
        let business = request.business();

        if CALENDAR_TRIGGERS.iter().any(|t| lowered.contains(t)) {
            debug!(business = %business, "Building content calendar");
            let calendar = build_content_calendar(business);
            let value = serde_json::to_value(&calendar).map_err(|e| {
                CapabilityError::ExecutionFailed {
                    capability: "content".into(),
                    reason: format!("failed to serialize calendar: {e}"),
                }
            })?;
            return Ok(CapabilityOutput::structured(
                format!("Here's a weekly content calendar for {business}:"),
                [("calendar", value)],
            ));
        }

        if IMAGE_PROMPT_TRIGGERS.iter().any(|t| lowered.contains(t)) {
            debug!(business = %business, "Building image prompts");
            let prompts = build_image_prompts(business);
            return Ok(CapabilityOutput::structured(
                format!("Here are 5 high-end image prompts for {business}:"),
                [("prompts", serde_json::json!(prompts))],
            ));
        }

        Ok(CapabilityOutput::Text(render(CLARIFYING_QUESTION, business)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::{Category, Intent};

    async fn run(message: &str, business: Option<&str>) -> CapabilityOutput {
        let intent = Intent::new(Category::Content, 0.9, "content_generation");
        let context = serde_json::Value::Null;
        let request = CapabilityRequest {
            intent: &intent,
            message,
            business_context: business,
            context: &context,
        };
        ContentCapability.handle(&request).await.unwrap()
    }

    #[tokio::test]
    async fn content_calendar_for_acme() {
        let CapabilityOutput::Structured(value) =
            run("generate a content calendar", Some("Acme")).await
        else {
            panic!("expected structured output");
        };

        let calendar = value["calendar"].as_array().unwrap();
        assert_eq!(calendar.len(), 5);
        for entry in calendar {
            let idea = entry["postIdea"].as_str().unwrap();
            assert!(!idea.is_empty());
            assert!(idea.contains("Acme"), "postIdea missing business: {idea}");
            assert!(entry["optimalTime"].is_string());
        }
        assert_eq!(calendar[0]["day"], "Monday");
        assert_eq!(calendar[4]["day"], "Friday");
    }

    #[tokio::test]
    async fn weekly_calendar_phrase_also_matches() {
        let output = run("Plan my Weekly Calendar of posts", None).await;
        let CapabilityOutput::Structured(value) = output else {
            panic!("expected structured output");
        };
        assert!(value["response"].as_str().unwrap().contains("your business"));
    }

    #[tokio::test]
    async fn image_prompts_are_five_and_interpolated() {
        for message in ["give me an image prompt", "High-End image ideas", "generate visuals"] {
            let CapabilityOutput::Structured(value) = run(message, Some("Lumen Studio")).await else {
                panic!("expected structured output for {message}");
            };
            let prompts = value["prompts"].as_array().unwrap();
            assert_eq!(prompts.len(), 5);
            assert!(prompts.iter().all(|p| p.as_str().unwrap().contains("Lumen Studio")));
        }
    }

    #[tokio::test]
    async fn anything_else_gets_clarifying_question() {
        let CapabilityOutput::Text(text) = run("help with content", Some("Acme")).await else {
            panic!("expected text output");
        };
        assert_eq!(text, render(CLARIFYING_QUESTION, "Acme"));
        assert!(text.contains("for Acme."));
        assert!(!text.contains("{business}"));

        let CapabilityOutput::Text(text) = run("help with content", None).await else {
            panic!("expected text output");
        };
        assert!(text.contains("for your business."));
    }

    #[test]
    fn default_business_in_templates() {
        let calendar = build_content_calendar("your business");
        assert!(calendar.iter().all(|e| e.post_idea.contains("your business")));
    }
}

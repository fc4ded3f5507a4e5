//! Remote classifier: asks the text-generation service for a structured intent.
//!
//! Short-circuits to the keyword classifier when the service is unconfigured.
//! Transport and parse failures never escape: they are logged and replaced
//! with `Intent::degraded()`.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::keywords::KeywordClassifier;
use super::types::{Business, Category, GENERAL_ASSISTANCE, Intent, Priority};
use super::IntentClassifier;
use crate::error::ClassifyError;
use crate::llm::{ChatMessage, CompletionRequest, LlmProvider};

/// Max tokens for the classification call (the answer is one small JSON object).
const CLASSIFY_MAX_TOKENS: u32 = 200;

/// Temperature for classification (biased toward parseable output).
const CLASSIFY_TEMPERATURE: f32 = 0.3;

/// Longest message excerpt embedded in the prompt.
const MAX_MESSAGE_CHARS: usize = 2000;

/// Two-tier classifier: remote when configured, keyword rules otherwise.
pub struct RemoteClassifier {
    llm: Arc<dyn LlmProvider>,
    fallback: KeywordClassifier,
}

impl RemoteClassifier {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self {
            llm,
            fallback: KeywordClassifier::new(),
        }
    }

    /// One classification round-trip. Errors are handled by the caller.
    async fn request_intent(
        &self,
        message: &str,
        context: &serde_json::Value,
    ) -> Result<Intent, ClassifyError> {
        let request = CompletionRequest::new(vec![ChatMessage::user(build_classification_prompt(
            message, context,
        ))])
        .with_max_tokens(CLASSIFY_MAX_TOKENS)
        .with_temperature(CLASSIFY_TEMPERATURE);

        let response = self.llm.complete(request).await?;

        parse_intent_response(&response.content).inspect_err(|e| {
            debug!(raw_response = %response.content, error = %e, "Unparseable classification");
        })
    }
}

#[async_trait]
impl IntentClassifier for RemoteClassifier {
    fn name(&self) -> &str {
        "remote"
    }

    async fn classify(
        &self,
        message: &str,
        context: &serde_json::Value,
    ) -> Result<Intent, ClassifyError> {
        if !self.llm.is_configured().await {
            debug!("Classifier credential absent, using keyword rules");
            return Ok(self.fallback.classify(message));
        }

        match self.request_intent(message, context).await {
            Ok(intent) => {
                info!(
                    category = %intent.category,
                    confidence = intent.confidence,
                    action = %intent.action,
                    "Remote classification succeeded"
                );
                Ok(intent)
            }
            Err(e) => {
                warn!(error = %e, "Remote classification failed, using degraded intent");
                Ok(Intent::degraded())
            }
        }
    }
}

// ── Prompt construction ─────────────────────────────────────────────

/// Build the classification instruction for one message.
fn build_classification_prompt(message: &str, context: &serde_json::Value) -> String {
    let categories = Category::ALL
        .iter()
        .map(Category::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    let context_text = match context {
        serde_json::Value::Null => "none".to_string(),
        serde_json::Value::Object(map) if map.is_empty() => "none".to_string(),
        other => other.to_string(),
    };

    let message_preview: String = message.chars().take(MAX_MESSAGE_CHARS).collect();

    format!(
        "You are the intent classifier for a business assistant.\n\n\
         Business taxonomy:\n\
         - \"agency\": the digital marketing agency (campaigns, social media, client work)\n\
         - \"ai\": the AI automation consultancy (automation projects, AI strategy)\n\
         - \"both\": applies to both businesses or is unclear\n\
         - \"client\": work done on behalf of a specific client\n\n\
         Classify the message below. Respond with ONLY a JSON object:\n\
         {{\"category\": \"...\", \"confidence\": 0.0, \"action\": \"...\", \"business\": \"...\", \"priority\": \"...\"}}\n\n\
         Rules:\n\
         - category MUST be one of: {categories}\n\
         - confidence is a number between 0 and 1\n\
         - action is a short snake_case label for what the user wants\n\
         - business MUST be one of: agency, ai, both, client\n\
         - priority MUST be one of: low, medium, high, urgent\n\n\
         Context: {context_text}\n\n\
         Message:\n{message_preview}"
    )
}

// ── Response parsing ────────────────────────────────────────────────

/// Classification response as returned by the model. Everything but the
/// category is optional.
#[derive(Debug, Deserialize)]
struct IntentResponse {
    category: String,
    #[serde(default)]
    confidence: Option<f32>,
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    business: Option<String>,
    #[serde(default)]
    priority: Option<String>,
}

/// Parse the model's reply into an `Intent`.
fn parse_intent_response(raw: &str) -> Result<Intent, ClassifyError> {
    let response = first_intent_object(raw)?;

    let category = Category::parse(&response.category).ok_or_else(|| {
        ClassifyError::Parse(format!("unknown category: '{}'", response.category))
    })?;

    let action = response
        .action
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .unwrap_or_else(|| GENERAL_ASSISTANCE.to_string());

    let business = response
        .business
        .as_deref()
        .and_then(Business::parse)
        .unwrap_or_default();
    let priority = response
        .priority
        .as_deref()
        .and_then(Priority::parse)
        .unwrap_or_default();

    Ok(Intent::new(category, response.confidence.unwrap_or(0.0), action)
        .with_business(business)
        .with_priority(priority))
}

/// Deserialize the first intent object embedded in model output.
///
/// Each `{` is tried as a candidate start; the streaming deserializer stops
/// at the end of the object, so fences, trailing prose and braces in the
/// surrounding text are ignored.
fn first_intent_object(raw: &str) -> Result<IntentResponse, ClassifyError> {
    let mut first_error = None;

    for (start, _) in raw.match_indices('{') {
        let mut stream =
            serde_json::Deserializer::from_str(&raw[start..]).into_iter::<IntentResponse>();
        match stream.next() {
            Some(Ok(response)) => return Ok(response),
            Some(Err(e)) if first_error.is_none() => first_error = Some(e),
            _ => {}
        }
    }

    Err(match first_error {
        Some(e) => ClassifyError::Parse(format!("JSON parse error: {e}")),
        None => ClassifyError::Parse("no JSON object in response".to_string()),
    })
}

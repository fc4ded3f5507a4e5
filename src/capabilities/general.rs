//! General assistant capability: default handler for anything unrouted.
//!
//! Two levels: a free-text completion when the text-generation service is
//! configured, otherwise a canned message explaining offline mode.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::canned::render;
use super::{Capability, CapabilityOutput, CapabilityRequest};
use crate::error::CapabilityError;
use crate::llm::{ChatMessage, CompletionRequest, FinishReason, LlmProvider};

/// Max tokens for a general answer.
const GENERAL_MAX_TOKENS: u32 = 500;

/// Temperature for general answers (conversational).
const GENERAL_TEMPERATURE: f32 = 0.7;

pub const OFFLINE_RESPONSE: &str = "I'm your business assistant for {business}. I'm running in \
offline mode right now, so I can route requests about email, calendar, calls, research, social \
media, clients, business insights, content and productivity, but I can't answer open-ended \
questions yet. Add a text-generation API key in the configuration to enable full answers.";

pub struct GeneralCapability {
    llm: Arc<dyn LlmProvider>,
}

impl GeneralCapability {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }
}

fn build_general_prompt(message: &str, business: &str) -> String {
    format!(
        "You are a helpful business assistant for {business}, a company running a marketing \
         agency and an AI consultancy. Answer the request below clearly and concisely.\n\n\
         Request: {message}"
    )
}

#[async_trait]
impl Capability for GeneralCapability {
    fn name(&self) -> &str {
        "general"
    }

    async fn handle(
        &self,
        request: &CapabilityRequest<'_>,
    ) -> Result<CapabilityOutput, CapabilityError> {
        let business = request.business();

        if !self.llm.is_configured().await {
            debug!("Text generation unconfigured, returning offline response");
            return Ok(CapabilityOutput::Text(render(OFFLINE_RESPONSE, business)));
        }

        let completion = CompletionRequest::new(vec![ChatMessage::user(build_general_prompt(
            request.message,
            business,
        ))])
        .with_max_tokens(GENERAL_MAX_TOKENS)
        .with_temperature(GENERAL_TEMPERATURE);

        let response = self.llm.complete(completion).await?;
        info!(
            model = self.llm.model_name(),
            output_tokens = response.output_tokens,
            "General completion returned"
        );

        if response.finish_reason == FinishReason::Length {
            warn!(
                max_tokens = GENERAL_MAX_TOKENS,
                "General completion truncated at the token limit"
            );
        }

        let content = response.content.trim();
        if content.is_empty() {
            return Err(CapabilityError::ExecutionFailed {
                capability: "general".into(),
                reason: "completion was empty".into(),
            });
        }
        Ok(CapabilityOutput::Text(content.to_string()))
    }
}

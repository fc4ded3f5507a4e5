//! Dispatcher: classify, route, invoke, normalize, record.
//!
//! **Core invariant: every dispatch returns an envelope.** Capability errors
//! are replaced with an apology and still succeed; anything else that goes
//! wrong becomes the failure envelope and leaves the conversation log as it was.
//!
//! Flow:
//! 1. Classify → `Intent`
//! 2. Resolve the capability for `intent.category`
//! 3. Invoke it (failures → apology text)
//! 4. Normalize the output
//! 5. Append a `ConversationRecord`, emit the success envelope

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use tracing::{error, info, warn};

use crate::capabilities::{CapabilityOutput, CapabilityRegistry, CapabilityRequest};
use crate::error::DispatchError;
use crate::intent::IntentClassifier;
use crate::pipeline::normalize::normalize;
use crate::pipeline::types::{
    CAPABILITY_APOLOGY, DispatchFailure, DispatchOutcome, DispatchRequest, DispatchStage,
    DispatchSuccess,
};
use crate::store::{ConversationLog, ConversationRecord};

/// Orchestrates one request through the pipeline. Cheap to share behind an
/// `Arc`; every dispatch is independent apart from the log append.
pub struct Dispatcher {
    classifier: Arc<dyn IntentClassifier>,
    registry: Arc<CapabilityRegistry>,
    log: Arc<dyn ConversationLog>,
    default_business_context: Option<String>,
}

impl Dispatcher {
    pub fn new(
        classifier: Arc<dyn IntentClassifier>,
        registry: Arc<CapabilityRegistry>,
        log: Arc<dyn ConversationLog>,
    ) -> Self {
        Self {
            classifier,
            registry,
            log,
            default_business_context: None,
        }
    }

    /// Business context used when a request carries none.
    pub fn with_default_business_context(mut self, business: Option<String>) -> Self {
        self.default_business_context = business;
        self
    }

    /// The conversation log this dispatcher records into.
    pub fn log(&self) -> &Arc<dyn ConversationLog> {
        &self.log
    }

    /// Dispatch one message. Never fails; errors become the failure envelope.
    pub async fn dispatch(&self, request: DispatchRequest) -> DispatchOutcome {
        let started = Instant::now();
        let mut stage = DispatchStage::Classifying;

        match self.run(&request, &mut stage).await {
            Ok(success) => {
                info!(
                    classifier = self.classifier.name(),
                    intent = %success.intent,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Dispatch complete"
                );
                DispatchOutcome::Success(success)
            }
            Err(e) => {
                error!(
                    error = %e,
                    stage = stage.label(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Dispatch failed"
                );
                DispatchOutcome::Failure(DispatchFailure::default())
            }
        }
    }

    /// Dispatch several messages concurrently. Outcomes keep request order.
    pub async fn dispatch_batch(&self, requests: Vec<DispatchRequest>) -> Vec<DispatchOutcome> {
        let count = requests.len();
        info!(count, "Dispatching batch");

        let outcomes = join_all(requests.into_iter().map(|r| self.dispatch(r))).await;

        info!(
            succeeded = outcomes.iter().filter(|o| o.is_success()).count(),
            total = count,
            "Batch dispatch complete"
        );
        outcomes
    }

    async fn run(
        &self,
        request: &DispatchRequest,
        stage: &mut DispatchStage,
    ) -> Result<DispatchSuccess, DispatchError> {
        // Classifying
        let intent = self
            .classifier
            .classify(&request.message, &request.context)
            .await?;

        // Dispatching
        *stage = DispatchStage::Dispatching;
        let capability = self.registry.resolve(intent.category);
        let business_context = request
            .business_context
            .as_deref()
            .or(self.default_business_context.as_deref());

        let capability_request = CapabilityRequest {
            intent: &intent,
            message: &request.message,
            business_context,
            context: &request.context,
        };

        let output = match capability.handle(&capability_request).await {
            Ok(output) => output,
            Err(e) => {
                warn!(
                    capability = capability.name(),
                    category = %intent.category,
                    error = %e,
                    "Capability failed, substituting apology"
                );
                CapabilityOutput::text(CAPABILITY_APOLOGY)
            }
        };

        // Responding
        *stage = DispatchStage::Responding;
        let body = normalize(intent.category, &output)?;
        let category = intent.category;

        let record = ConversationRecord::new(request.message.clone(), output, intent);
        let timestamp = record.timestamp;
        self.log.append(record).await?;

        Ok(DispatchSuccess {
            success: true,
            body,
            intent: category,
            timestamp,
        })
    }
}

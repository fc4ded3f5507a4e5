//! Dispatch pipeline.
//!
//! Every inbound message flows through:
//! 1. `IntentClassifier::classify()`: remote service, or keywords when offline
//! 2. `CapabilityRegistry::resolve()`: category → capability
//! 3. `Capability::handle()`: produce text or a structured payload
//! 4. `normalize()`: flatten into the response envelope
//! 5. `ConversationLog::append()`: bounded history
//!
//! **A dispatch never errors out to the caller.** Failures become the
//! failure envelope.

pub mod dispatcher;
pub mod normalize;
pub mod types;

pub use dispatcher::Dispatcher;
pub use normalize::normalize;
pub use types::{
    DispatchFailure, DispatchOutcome, DispatchRequest, DispatchStage, DispatchSuccess,
    NormalizedResponse,
};

//! Text-generation service integration.
//!
//! `LlmProvider` is the seam; `HttpCompletionProvider` is the production
//! implementation speaking the chat-completions wire format. Tests plug in
//! mock providers.

pub mod http;
pub mod provider;

pub use http::HttpCompletionProvider;
pub use provider::*;

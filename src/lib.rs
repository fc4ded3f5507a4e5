//! Intent Router: classify business messages and dispatch them to capabilities.

pub mod api;
pub mod capabilities;
pub mod config;
pub mod error;
pub mod intent;
pub mod llm;
pub mod pipeline;
pub mod store;

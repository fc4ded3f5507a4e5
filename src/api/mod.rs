//! HTTP surface: chat dispatch, conversation history, credential status.

pub mod routes;

pub use routes::{AppState, router};

//! REST endpoints for the intent router.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use secrecy::SecretString;
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::config::Service;
use crate::error::ConfigError;
use crate::llm::LlmProvider;
use crate::pipeline::{DispatchOutcome, DispatchRequest, Dispatcher};
use crate::store::CredentialStore;

/// Records returned by `/api/conversations` when no limit is given.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub credentials: Arc<dyn CredentialStore>,
    /// Provider backing the remote classifier and the general capability.
    pub llm: Arc<dyn LlmProvider>,
}

/// Build the Axum router with every REST route and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/chat", post(chat))
        .route("/api/conversations", get(conversations))
        .route("/api/config/status", get(config_status))
        .route("/api/config", post(update_config))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ── Health ──────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok", "service": "intent-router"}))
}

// ── Chat ────────────────────────────────────────────────────────────

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<DispatchRequest>,
) -> impl IntoResponse {
    let outcome = state.dispatcher.dispatch(request).await;
    let status = match &outcome {
        DispatchOutcome::Success(_) => StatusCode::OK,
        DispatchOutcome::Failure(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(outcome))
}

// ── Conversations ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    limit: Option<usize>,
}

async fn conversations(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> impl IntoResponse {
    let log = state.dispatcher.log();
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let records = log.recent(limit).await;
    Json(serde_json::json!({
        "conversations": records,
        "total": log.len().await,
    }))
}

// ── Credentials ─────────────────────────────────────────────────────

async fn config_status(State(state): State<AppState>) -> impl IntoResponse {
    let classifier = if state.llm.is_configured().await {
        "remote"
    } else {
        "keyword"
    };
    Json(serde_json::json!({
        "classifier": classifier,
        "services": state.credentials.status().await,
    }))
}

#[derive(Debug, Deserialize)]
struct CredentialUpdate {
    service: String,
    credential: String,
}

async fn update_config(
    State(state): State<AppState>,
    Json(update): Json<CredentialUpdate>,
) -> impl IntoResponse {
    let service = match Service::parse(&update.service) {
        Ok(service) => service,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"success": false, "error": e.to_string()})),
            )
                .into_response();
        }
    };

    let secret = SecretString::from(update.credential);
    match state.credentials.set_credential(service, secret).await {
        Ok(()) => {
            let configured = state.credentials.is_configured(service).await;
            info!(service = service.name(), configured, "Credential updated");
            Json(serde_json::json!({
                "success": true,
                "service": service.name(),
                "configured": configured,
            }))
            .into_response()
        }
        Err(e) => {
            warn!(service = service.name(), error = %e, "Credential update failed");
            let status = match e {
                ConfigError::UnknownService(_) | ConfigError::InvalidValue { .. } => {
                    StatusCode::BAD_REQUEST
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (
                status,
                Json(serde_json::json!({"success": false, "error": e.to_string()})),
            )
                .into_response()
        }
    }
}

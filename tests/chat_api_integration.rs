//! Integration tests for the chat REST surface.
//!
//! Each test spins up an Axum server on a random port and exercises the
//! real HTTP contract with reqwest.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::time::timeout;

use intent_router::api::{AppState, router};
use intent_router::capabilities::CapabilityRegistry;
use intent_router::config::Service;
use intent_router::error::{ClassifyError, LlmError};
use intent_router::intent::{Intent, IntentClassifier, RemoteClassifier};
use intent_router::llm::{
    CompletionRequest, CompletionResponse, FinishReason, HttpCompletionProvider, LlmProvider,
};
use intent_router::pipeline::Dispatcher;
use intent_router::store::{
    ConversationLog, CredentialStore, InMemoryConversationLog, MemoryCredentialStore,
};

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Stub provider that answers every completion with a fixed reply.
struct StubLlm {
    reply: &'static str,
}

#[async_trait]
impl LlmProvider for StubLlm {
    fn model_name(&self) -> &str {
        "stub"
    }
    async fn is_configured(&self) -> bool {
        true
    }
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        Ok(CompletionResponse {
            content: self.reply.to_string(),
            input_tokens: 0,
            output_tokens: 0,
            finish_reason: FinishReason::Stop,
        })
    }
}

struct BrokenClassifier;

#[async_trait]
impl IntentClassifier for BrokenClassifier {
    fn name(&self) -> &str {
        "broken"
    }
    async fn classify(&self, _message: &str, _context: &Value) -> Result<Intent, ClassifyError> {
        Err(ClassifyError::Parse("forced".into()))
    }
}

struct Server {
    base: String,
    log: Arc<InMemoryConversationLog>,
    credentials: Arc<MemoryCredentialStore>,
}

/// Start a server backed by the real HTTP provider with no credential.
async fn start_offline_server() -> Server {
    let credentials = Arc::new(MemoryCredentialStore::new());
    let store: Arc<dyn CredentialStore> = credentials.clone();
    let llm: Arc<dyn LlmProvider> = Arc::new(
        HttpCompletionProvider::new(
            "http://127.0.0.1:9/v1/chat/completions",
            "gpt-4o-mini",
            Duration::from_secs(1),
            Arc::clone(&store),
        )
        .unwrap(),
    );
    start_server(Arc::new(RemoteClassifier::new(Arc::clone(&llm))), llm, credentials).await
}

async fn start_server(
    classifier: Arc<dyn IntentClassifier>,
    llm: Arc<dyn LlmProvider>,
    credentials: Arc<MemoryCredentialStore>,
) -> Server {
    let log = Arc::new(InMemoryConversationLog::new(100));
    let dispatcher = Dispatcher::new(
        classifier,
        Arc::new(CapabilityRegistry::with_defaults(Arc::clone(&llm))),
        log.clone(),
    );
    let app = router(AppState {
        dispatcher: Arc::new(dispatcher),
        credentials: credentials.clone(),
        llm,
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;

    Server {
        base: format!("http://127.0.0.1:{port}"),
        log,
        credentials,
    }
}

async fn post_chat(base: &str, body: Value) -> (u16, Value) {
    let response = reqwest::Client::new()
        .post(format!("{base}/api/chat"))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn offline_chat_uses_keyword_routing() {
    timeout(TEST_TIMEOUT, async {
        let server = start_offline_server().await;

        let (status, json) =
            post_chat(&server.base, json!({"message": "I need to schedule a call"})).await;
        assert_eq!(status, 200);
        assert_eq!(json["success"], true);
        assert_eq!(json["intent"], "calendar");
        assert!(json["response"].as_str().unwrap().contains("your business"));
        assert!(json["timestamp"].is_string());
        assert_eq!(server.log.len().await, 1);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn content_calendar_carries_side_field() {
    timeout(TEST_TIMEOUT, async {
        let llm: Arc<dyn LlmProvider> = Arc::new(StubLlm {
            reply: r#"{"category": "content", "confidence": 0.88}"#,
        });
        let server = start_server(
            Arc::new(RemoteClassifier::new(Arc::clone(&llm))),
            llm,
            Arc::new(MemoryCredentialStore::new()),
        )
        .await;

        let (status, json) = post_chat(
            &server.base,
            json!({"message": "Generate a content calendar", "businessContext": "Acme"}),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(json["intent"], "content");
        let calendar = json["calendar"].as_array().expect("calendar array");
        assert_eq!(calendar.len(), 5);
        assert!(calendar[0]["postIdea"].as_str().unwrap().contains("Acme"));
        assert!(json.get("prompts").is_none());
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn remote_classification_drives_routing() {
    timeout(TEST_TIMEOUT, async {
        let llm: Arc<dyn LlmProvider> = Arc::new(StubLlm {
            reply: r#"{"category": "social", "confidence": 0.92, "action": "draft_caption", "business": "agency", "priority": "high"}"#,
        });
        let server = start_server(
            Arc::new(RemoteClassifier::new(Arc::clone(&llm))),
            llm,
            Arc::new(MemoryCredentialStore::new()),
        )
        .await;

        let (status, json) =
            post_chat(&server.base, json!({"message": "Write a caption for our launch"})).await;
        assert_eq!(status, 200);
        assert_eq!(json["intent"], "social");
        assert!(json["caption"].is_string());

        let records = server.log.recent(1).await;
        assert_eq!(records[0].intent.action, "draft_caption");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn fatal_error_returns_failure_envelope() {
    timeout(TEST_TIMEOUT, async {
        let llm: Arc<dyn LlmProvider> = Arc::new(StubLlm { reply: "" });
        let server = start_server(
            Arc::new(BrokenClassifier),
            llm,
            Arc::new(MemoryCredentialStore::new()),
        )
        .await;

        let (status, json) = post_chat(&server.base, json!({"message": "hello"})).await;
        assert_eq!(status, 500);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "internal_error");
        assert!(json["fallback"].is_string());
        assert_eq!(server.log.len().await, 0);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn conversations_endpoint_returns_recent_records() {
    timeout(TEST_TIMEOUT, async {
        let server = start_offline_server().await;
        for message in ["email Bob", "call Alice", "research competitors"] {
            post_chat(&server.base, json!({"message": message})).await;
        }

        let json: Value = reqwest::get(format!("{}/api/conversations?limit=2", server.base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(json["total"], 3);
        let conversations = json["conversations"].as_array().unwrap();
        assert_eq!(conversations.len(), 2);
        assert_eq!(conversations[0]["message"], "call Alice");
        assert_eq!(conversations[1]["message"], "research competitors");
        assert_eq!(conversations[1]["intent"]["category"], "research");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn config_update_flips_classifier_status() {
    timeout(TEST_TIMEOUT, async {
        let server = start_offline_server().await;
        let client = reqwest::Client::new();

        let status: Value = client
            .get(format!("{}/api/config/status", server.base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(status["classifier"], "keyword");

        let response = client
            .post(format!("{}/api/config", server.base))
            .json(&json!({"service": "openai", "credential": "sk-test-123"}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
        assert!(server.credentials.is_configured(Service::OpenAi).await);

        let status: Value = client
            .get(format!("{}/api/config/status", server.base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(status["classifier"], "remote");
        assert_eq!(status["services"]["openai"], true);
        assert_eq!(status["services"]["linkedin"], false);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn health_check() {
    timeout(TEST_TIMEOUT, async {
        let server = start_offline_server().await;
        let json: Value = reqwest::get(format!("{}/health", server.base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "intent-router");
    })
    .await
    .expect("test timed out");
}

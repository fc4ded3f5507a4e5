use std::sync::Arc;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use intent_router::api::{self, AppState};
use intent_router::capabilities::CapabilityRegistry;
use intent_router::config::AppConfig;
use intent_router::intent::RemoteClassifier;
use intent_router::llm::{HttpCompletionProvider, LlmProvider};
use intent_router::pipeline::Dispatcher;
use intent_router::store::{CredentialStore, EnvFileCredentialStore, InMemoryConversationLog};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("Invalid configuration")?;

    // Guard must outlive the server or buffered file logs are lost.
    let _log_guard = init_tracing(&config);

    eprintln!("🧭 Intent Router v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.llm_model);
    eprintln!("   Endpoint: {}", config.llm_endpoint);
    eprintln!("   Chat API: http://{}/api/chat", config.bind_addr);
    eprintln!("   Env file: {}", config.env_file.display());

    // ── Credentials ─────────────────────────────────────────────────
    let credentials: Arc<dyn CredentialStore> = Arc::new(
        EnvFileCredentialStore::load(&config.env_file)
            .await
            .with_context(|| format!("Failed to load {}", config.env_file.display()))?,
    );

    // ── Text generation ─────────────────────────────────────────────
    let llm: Arc<dyn LlmProvider> = Arc::new(HttpCompletionProvider::new(
        config.llm_endpoint.clone(),
        config.llm_model.clone(),
        config.llm_timeout,
        Arc::clone(&credentials),
    )?);

    if llm.is_configured().await {
        eprintln!("   Classifier: remote");
    } else {
        eprintln!("   Classifier: keyword (no OpenAI credential)");
    }

    // ── Pipeline ────────────────────────────────────────────────────
    let dispatcher = Dispatcher::new(
        Arc::new(RemoteClassifier::new(Arc::clone(&llm))),
        Arc::new(CapabilityRegistry::with_defaults(Arc::clone(&llm))),
        Arc::new(InMemoryConversationLog::new(config.log_capacity)),
    )
    .with_default_business_context(config.business_context.clone());

    let app = api::router(AppState {
        dispatcher: Arc::new(dispatcher),
        credentials,
        llm,
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, "Intent router listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Intent router stopped");
    Ok(())
}

/// Console logging, plus a daily rolling file when a log dir is configured.
fn init_tracing(config: &AppConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let console = tracing_subscriber::fmt::layer().with_target(false);

    match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "intent-router.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file = tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer);
            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .with(file)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .init();
            None
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
    }
}

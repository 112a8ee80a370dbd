use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use local_llm_chat::clipboard::{ClipboardSink, NoClipboard, SystemClipboard};
use local_llm_chat::config::{AppConfig, ClipboardMode};
use local_llm_chat::host::NoHost;
use local_llm_chat::routes::api_routes::api_router;
use local_llm_chat::{ChatController, ProviderClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (development convenience)
    dotenvy::dotenv().ok();

    // Initialise tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "local_llm_chat=debug,tower_http=debug".into()),
        )
        .init();

    let config = AppConfig::from_env()?;

    // ── Controller wiring ─────────────────────────────────────────────────────
    let clipboard: Arc<dyn ClipboardSink> = match config.clipboard {
        ClipboardMode::System => Arc::new(SystemClipboard),
        ClipboardMode::Disabled => Arc::new(NoClipboard),
    };
    let controller = ChatController::new(
        ProviderClient::new(),
        config.controller_options(),
        Arc::new(NoHost),
        clipboard,
    );

    // Session-start connection check
    tokio::spawn({
        let controller = controller.clone();
        async move { controller.start().await }
    });

    // ── Router ────────────────────────────────────────────────────────────────
    let app = api_router(controller)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    // ── Listen ────────────────────────────────────────────────────────────────
    let addr = format!("127.0.0.1:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{addr}/");

    axum::serve(listener, app).await?;
    Ok(())
}

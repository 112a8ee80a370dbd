#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use serde_json::Value;

use local_llm_chat::clipboard::NoClipboard;
use local_llm_chat::host::{HostBridge, NoHost};
use local_llm_chat::{ChatController, ControllerOptions, ProviderClient, ProviderKind, ProviderSettings};

/// Request bodies captured by a stub provider.
pub type Recorded = Arc<Mutex<Vec<Value>>>;

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub listener");
    let addr = listener.local_addr().expect("Stub listener has no address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Stub server failed");
    });
    format!("http://{addr}")
}

/// A base URL nothing listens on.
pub async fn closed_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind probe listener");
    let addr = listener.local_addr().expect("Listener has no address");
    drop(listener);
    format!("http://{addr}")
}

pub fn settings(provider: ProviderKind, base_url: &str, model: &str) -> ProviderSettings {
    ProviderSettings { provider, base_url: base_url.to_string(), model: model.to_string() }
}

pub fn controller(settings: ProviderSettings) -> ChatController {
    controller_with_host(settings, Arc::new(NoHost))
}

pub fn controller_with_host(settings: ProviderSettings, host: Arc<dyn HostBridge>) -> ChatController {
    ChatController::new(
        ProviderClient::new(),
        ControllerOptions { default_settings: settings, probe_debounce: Duration::from_millis(50) },
        host,
        Arc::new(NoClipboard),
    )
}

/// Polls `condition` every few milliseconds until it holds or two seconds pass.
pub async fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}

//! Drives the JSON API over real HTTP, backed by a stub Ollama server.

mod common;

use axum::routing::{get, post};
use axum::{Json, Router};
use reqwest::StatusCode;
use serde_json::json;

use common::{controller, serve, settings};
use local_llm_chat::models::{ChatResponse, SessionView};
use local_llm_chat::routes::api_routes::api_router;
use local_llm_chat::{ConnectionStatus, MessageRole, ProviderKind};

async fn setup() -> (String, reqwest::Client) {
    let provider = Router::new()
        .route("/api/generate", post(|| async { Json(json!({"response": "Hi there"})) }))
        .route(
            "/api/tags",
            get(|| async { Json(json!({"models": [{"name": "llama3.2"}, {"name": "phi3"}]})) }),
        );
    let provider_url = serve(provider).await;
    let ctl = controller(settings(ProviderKind::Ollama, &provider_url, "llama3.2"));
    let api_url = serve(api_router(ctl)).await;
    (api_url, reqwest::Client::new())
}

#[tokio::test]
async fn test_chat_round_trip_and_clear() {
    let (api, http) = setup().await;

    let resp: ChatResponse = http
        .post(format!("{api}/api/chat"))
        .json(&json!({"message": "hello"}))
        .send()
        .await
        .expect("chat request failed")
        .json()
        .await
        .expect("chat response is not JSON");
    let reply = resp.message.expect("reply expected");
    assert_eq!(reply.role, MessageRole::Assistant);
    assert_eq!(reply.content, "Hi there");
    assert_eq!(resp.session.messages.len(), 2);
    assert_eq!(resp.session.status, ConnectionStatus::Connected);

    let blank: ChatResponse = http
        .post(format!("{api}/api/chat"))
        .json(&json!({"message": "   "}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(blank.message.is_none());
    assert_eq!(blank.session.messages.len(), 2);

    let cleared: SessionView = http
        .delete(format!("{api}/api/messages"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(cleared.messages.is_empty());
    assert_eq!(cleared.status, ConnectionStatus::Connected);
}

#[tokio::test]
async fn test_check_connection_lists_models() {
    let (api, http) = setup().await;

    let view: SessionView = http
        .post(format!("{api}/api/connection/check"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(view.status, ConnectionStatus::Connected);
    let names: Vec<&str> = view.models.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["llama3.2", "phi3"]);

    let view: SessionView = http
        .put(format!("{api}/api/settings"))
        .json(&json!({"model": "phi3"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(view.settings.model, "phi3");
    assert!(view.models.is_empty());

    let view: SessionView = http
        .post(format!("{api}/api/models/refresh"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(view.models.len(), 2);
    assert_eq!(view.settings.model, "phi3");
}

#[tokio::test]
async fn test_draft_and_clipboard_accept_text() {
    let (api, http) = setup().await;

    let resp = http
        .put(format!("{api}/api/draft"))
        .json(&json!({"text": "half-typed"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let view: SessionView =
        http.get(format!("{api}/api/session")).send().await.unwrap().json().await.unwrap();
    assert_eq!(view.draft, "half-typed");

    let resp = http
        .post(format!("{api}/api/clipboard"))
        .json(&json!({"text": "copied"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_malformed_settings_body_is_rejected() {
    let (api, http) = setup().await;

    let resp = http
        .put(format!("{api}/api/settings"))
        .json(&json!({"provider": "gemini"}))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_client_error());
}

#[tokio::test]
async fn test_model_name_settable_while_disconnected() {
    let (api, http) = setup().await;

    let before: SessionView =
        http.get(format!("{api}/api/session")).send().await.unwrap().json().await.unwrap();
    assert_eq!(before.status, ConnectionStatus::Disconnected);
    assert!(before.models.is_empty());

    let view: SessionView = http
        .put(format!("{api}/api/settings"))
        .json(&json!({"model": "mistral:7b-instruct"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(view.settings.model, "mistral:7b-instruct");
    assert_eq!(view.status, ConnectionStatus::Disconnected);
}

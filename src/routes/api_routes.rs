use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};

use crate::models::{ChatRequest, ChatResponse, SettingsPatch, TextBody};
use crate::service::chat_controller::ChatController;

/// JSON API driven by the frontend.
pub fn api_router(controller: ChatController) -> Router {
    Router::new()
        .route("/api/session", get(session_handler))
        .route("/api/chat", post(chat_handler))
        .route("/api/draft", put(draft_handler))
        .route("/api/settings", put(settings_handler))
        .route("/api/connection/check", post(check_connection_handler))
        .route("/api/models/refresh", post(refresh_models_handler))
        .route("/api/messages", delete(clear_messages_handler))
        .route("/api/clipboard", post(clipboard_handler))
        .with_state(controller)
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET `/api/session` — full session view
pub async fn session_handler(State(ctl): State<ChatController>) -> impl IntoResponse {
    Json(ctl.snapshot())
}

/// POST `/api/chat` — submit a prompt and wait for the reply
pub async fn chat_handler(
    State(ctl): State<ChatController>,
    Json(req): Json<ChatRequest>,
) -> impl IntoResponse {
    let message = ctl.submit(&req.message).await;
    Json(ChatResponse { message, session: ctl.snapshot() })
}

/// PUT `/api/draft` — keep the input box contents
pub async fn draft_handler(
    State(ctl): State<ChatController>,
    Json(body): Json<TextBody>,
) -> impl IntoResponse {
    ctl.set_draft(body.text);
    StatusCode::NO_CONTENT
}

/// PUT `/api/settings` — merge a partial settings update
pub async fn settings_handler(
    State(ctl): State<ChatController>,
    Json(patch): Json<SettingsPatch>,
) -> impl IntoResponse {
    ctl.update_settings(patch);
    Json(ctl.snapshot())
}

/// POST `/api/connection/check` — probe now, refresh models if reachable
pub async fn check_connection_handler(State(ctl): State<ChatController>) -> impl IntoResponse {
    ctl.check_connection().await;
    Json(ctl.snapshot())
}

/// POST `/api/models/refresh`
pub async fn refresh_models_handler(State(ctl): State<ChatController>) -> impl IntoResponse {
    ctl.refresh_models().await;
    Json(ctl.snapshot())
}

/// DELETE `/api/messages` — start over with an empty conversation
pub async fn clear_messages_handler(State(ctl): State<ChatController>) -> impl IntoResponse {
    ctl.clear_session();
    Json(ctl.snapshot())
}

/// POST `/api/clipboard` — copy text on the server host
pub async fn clipboard_handler(
    State(ctl): State<ChatController>,
    Json(body): Json<TextBody>,
) -> impl IntoResponse {
    ctl.copy_message_text(&body.text);
    StatusCode::NO_CONTENT
}

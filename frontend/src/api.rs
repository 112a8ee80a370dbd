use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;

use crate::models::{ChatRequest, ChatResponse, SessionView, SettingsPatch, TextBody};

/// Base URL of the backend API server.
const API_BASE: &str = "http://localhost:3000";

async fn read<T: DeserializeOwned>(resp: Response) -> Result<T, String> {
    if !resp.ok() {
        return Err(format!("Server error: {}", resp.status()));
    }
    resp.json::<T>()
        .await
        .map_err(|e| format!("Parse error: {e}"))
}

fn check(resp: Response) -> Result<(), String> {
    if resp.ok() {
        Ok(())
    } else {
        Err(format!("Server error: {}", resp.status()))
    }
}

/// Fetches the current session state.
pub async fn fetch_session() -> Result<SessionView, String> {
    let resp = Request::get(&format!("{API_BASE}/api/session"))
        .send()
        .await
        .map_err(|e| format!("Network error: {e}"))?;
    read(resp).await
}

/// Submits a prompt and waits for the assistant reply.
pub async fn send_chat(message: &str) -> Result<ChatResponse, String> {
    let body = ChatRequest { message: message.to_string() };
    let resp = Request::post(&format!("{API_BASE}/api/chat"))
        .json(&body)
        .map_err(|e| format!("Serialize error: {e}"))?
        .send()
        .await
        .map_err(|e| format!("Network error: {e}"))?;
    read(resp).await
}

pub async fn save_draft(text: &str) -> Result<(), String> {
    let body = TextBody { text: text.to_string() };
    let resp = Request::put(&format!("{API_BASE}/api/draft"))
        .json(&body)
        .map_err(|e| format!("Serialize error: {e}"))?
        .send()
        .await
        .map_err(|e| format!("Network error: {e}"))?;
    check(resp)
}

pub async fn update_settings(patch: &SettingsPatch) -> Result<SessionView, String> {
    let resp = Request::put(&format!("{API_BASE}/api/settings"))
        .json(patch)
        .map_err(|e| format!("Serialize error: {e}"))?
        .send()
        .await
        .map_err(|e| format!("Network error: {e}"))?;
    read(resp).await
}

/// Probes the provider now; the backend refreshes models when it answers.
pub async fn check_connection() -> Result<SessionView, String> {
    let resp = Request::post(&format!("{API_BASE}/api/connection/check"))
        .send()
        .await
        .map_err(|e| format!("Network error: {e}"))?;
    read(resp).await
}

pub async fn refresh_models() -> Result<SessionView, String> {
    let resp = Request::post(&format!("{API_BASE}/api/models/refresh"))
        .send()
        .await
        .map_err(|e| format!("Network error: {e}"))?;
    read(resp).await
}

pub async fn clear_messages() -> Result<SessionView, String> {
    let resp = Request::delete(&format!("{API_BASE}/api/messages"))
        .send()
        .await
        .map_err(|e| format!("Network error: {e}"))?;
    read(resp).await
}

pub async fn copy_text(text: &str) -> Result<(), String> {
    let body = TextBody { text: text.to_string() };
    let resp = Request::post(&format!("{API_BASE}/api/clipboard"))
        .json(&body)
        .map_err(|e| format!("Serialize error: {e}"))?
        .send()
        .await
        .map_err(|e| format!("Network error: {e}"))?;
    check(resp)
}

//! Wire shapes of the supported model servers.
//!
//! Each provider variant knows how to build its completion request, pull the
//! assistant text out of the reply, and normalize its model listing. Nothing
//! in here performs I/O; [`crate::client::ProviderClient`] does the transport.

pub mod ollama;
pub mod openai_compat;

use serde_json::Value;

use crate::errors::AppError;
use crate::models::{ModelInfo, ProviderKind};

/// Assistant text used when a successful reply lacks the expected field.
pub const EMPTY_REPLY_PLACEHOLDER: &str = "No response received.";

/// A fully-shaped completion call: where to POST and what to send.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub url: String,
    pub body: Value,
}

pub trait ProviderApi: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Builds the completion call carrying `prompt` as the only user turn.
    fn build_completion_request(
        &self,
        base_url: &str,
        model: &str,
        prompt: &str,
    ) -> Result<CompletionRequest, AppError>;

    /// Extracts the assistant text, falling back to [`EMPTY_REPLY_PLACEHOLDER`].
    fn parse_completion_response(&self, body: &Value) -> String;

    /// The model-listing endpoint, also used as the connectivity probe.
    fn listing_url(&self, base_url: &str) -> String;

    /// Normalizes a listing body; unrecognized shapes yield an empty list.
    fn parse_model_listing(&self, body: &Value) -> Vec<ModelInfo>;
}

pub fn api_for(kind: ProviderKind) -> &'static dyn ProviderApi {
    match kind {
        ProviderKind::Ollama => &ollama::Ollama,
        ProviderKind::OpenaiCompatible => &openai_compat::OpenAiCompatible,
    }
}

pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim().trim_end_matches('/'))
}

pub(crate) fn to_body<T: serde::Serialize>(payload: &T) -> Result<Value, AppError> {
    serde_json::to_value(payload).map_err(|e| AppError::RequestBuild { message: e.to_string() })
}

/// Renders a listing field as a label: strings as-is, numbers via `Display`.
pub(crate) fn label(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_strips_trailing_slashes() {
        assert_eq!(
            endpoint("http://localhost:11434/", "/api/tags"),
            "http://localhost:11434/api/tags"
        );
        assert_eq!(endpoint(" http://h:1 ", "/v1/models"), "http://h:1/v1/models");
    }

    #[test]
    fn api_for_dispatches_on_kind() {
        for kind in ProviderKind::ALL {
            assert_eq!(api_for(kind).kind(), kind);
        }
    }
}

use serde::Serialize;
use serde_json::Value;

use super::{endpoint, label, to_body, CompletionRequest, ProviderApi, EMPTY_REPLY_PLACEHOLDER};
use crate::errors::AppError;
use crate::models::{ModelInfo, ProviderKind};

const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";
const MODELS_PATH: &str = "/v1/models";
const UNKNOWN_MODEL: &str = "Unknown Model";
const DEFAULT_MODEL_LABEL: &str = "model";

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ApiMessage<'a>; 1],
    stream: bool,
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// OpenAI-style chat completions, as served by LM Studio and friends.
pub struct OpenAiCompatible;

impl ProviderApi for OpenAiCompatible {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenaiCompatible
    }

    fn build_completion_request(
        &self,
        base_url: &str,
        model: &str,
        prompt: &str,
    ) -> Result<CompletionRequest, AppError> {
        let body = to_body(&ChatCompletionRequest {
            model,
            messages: [ApiMessage { role: "user", content: prompt }],
            stream: false,
        })?;
        Ok(CompletionRequest { url: endpoint(base_url, CHAT_COMPLETIONS_PATH), body })
    }

    fn parse_completion_response(&self, body: &Value) -> String {
        body.pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| EMPTY_REPLY_PLACEHOLDER.to_string())
    }

    fn listing_url(&self, base_url: &str) -> String {
        endpoint(base_url, MODELS_PATH)
    }

    fn parse_model_listing(&self, body: &Value) -> Vec<ModelInfo> {
        let entries = match body {
            Value::Array(entries) => entries,
            Value::Object(map) => match map.get("data") {
                Some(Value::Array(entries)) => entries,
                _ => return Vec::new(),
            },
            _ => return Vec::new(),
        };
        entries
            .iter()
            .map(|entry| {
                let name = ["id", "name"]
                    .iter()
                    .find_map(|key| entry.get(*key).and_then(Value::as_str))
                    .unwrap_or(UNKNOWN_MODEL);
                let size = label(entry.get("object"))
                    .or_else(|| label(entry.get("owned_by")))
                    .unwrap_or_else(|| DEFAULT_MODEL_LABEL.to_string());
                ModelInfo::new(name, Some(size))
            })
            .collect()
    }
}

use serde::Serialize;
use serde_json::Value;

use super::{endpoint, label, to_body, CompletionRequest, ProviderApi, EMPTY_REPLY_PLACEHOLDER};
use crate::errors::AppError;
use crate::models::{ModelInfo, ProviderKind};

const GENERATE_PATH: &str = "/api/generate";
const TAGS_PATH: &str = "/api/tags";

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Ollama's native API: `/api/generate` for completions, `/api/tags` for models.
pub struct Ollama;

impl ProviderApi for Ollama {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Ollama
    }

    fn build_completion_request(
        &self,
        base_url: &str,
        model: &str,
        prompt: &str,
    ) -> Result<CompletionRequest, AppError> {
        let body = to_body(&GenerateRequest { model, prompt, stream: false })?;
        Ok(CompletionRequest { url: endpoint(base_url, GENERATE_PATH), body })
    }

    fn parse_completion_response(&self, body: &Value) -> String {
        body.get("response")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| EMPTY_REPLY_PLACEHOLDER.to_string())
    }

    fn listing_url(&self, base_url: &str) -> String {
        endpoint(base_url, TAGS_PATH)
    }

    fn parse_model_listing(&self, body: &Value) -> Vec<ModelInfo> {
        let Some(models) = body.get("models").and_then(Value::as_array) else {
            return Vec::new();
        };
        models
            .iter()
            .filter_map(|entry| {
                let name = entry.get("name")?.as_str()?;
                Some(ModelInfo {
                    name: name.to_string(),
                    size: label(entry.get("size")),
                    modified_at: label(entry.get("modified_at")),
                })
            })
            .collect()
    }
}

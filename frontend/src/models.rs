use serde::{Deserialize, Serialize};

/// Matches the backend `Message` model.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Message {
    pub id: u64,
    pub role: String,
    pub content: String,
    pub created_at: String,
}

/// Matches the backend `ProviderSettings`.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct ProviderSettings {
    pub provider: String,
    pub base_url: String,
    pub model: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub size: Option<String>,
}

/// Full session state as returned by most backend endpoints.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SessionView {
    pub messages: Vec<Message>,
    pub draft: String,
    pub pending: bool,
    pub settings: ProviderSettings,
    /// `connected`, `connecting` or `disconnected`
    pub status: String,
    pub models: Vec<ModelInfo>,
    pub models_loading: bool,
}

/// Partial settings update; `None` fields are left out of the JSON.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ChatResponse {
    pub message: Option<Message>,
    pub session: SessionView,
}

#[derive(Clone, Debug, Serialize)]
pub struct TextBody {
    pub text: String,
}

/// Provider choices offered in the settings panel, with their default addresses.
pub const PROVIDERS: [(&str, &str, &str); 2] = [
    ("ollama", "Ollama", "http://localhost:11434"),
    ("openai-compatible", "LM Studio (OpenAI-compatible)", "http://localhost:1234"),
];

pub fn default_base_url(provider: &str) -> Option<&'static str> {
    PROVIDERS.iter().find(|(id, _, _)| *id == provider).map(|(_, _, url)| *url)
}

/// Builds a model-only patch from free-form input; blank input changes nothing.
pub fn model_patch(input: &str) -> Option<SettingsPatch> {
    let model = input.trim();
    if model.is_empty() {
        return None;
    }
    Some(SettingsPatch { model: Some(model.to_string()), ..SettingsPatch::default() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_patch_trims_and_sets_only_the_model() {
        let patch = model_patch("  mistral:7b \n").unwrap();
        assert_eq!(patch.model.as_deref(), Some("mistral:7b"));
        assert!(patch.provider.is_none());
        assert!(patch.base_url.is_none());
    }

    #[test]
    fn model_patch_ignores_blank_input() {
        assert!(model_patch("").is_none());
        assert!(model_patch("   ").is_none());
    }

    #[test]
    fn provider_defaults_cover_both_providers() {
        assert_eq!(default_base_url("ollama"), Some("http://localhost:11434"));
        assert_eq!(default_base_url("openai-compatible"), Some("http://localhost:1234"));
        assert_eq!(default_base_url("other"), None);
    }
}

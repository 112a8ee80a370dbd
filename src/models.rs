use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Conversation ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One turn in the conversation. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Hands out message ids derived from the creation time (milliseconds since
/// the epoch), bumped when two messages land in the same millisecond.
#[derive(Debug, Default)]
pub struct MessageIdGenerator {
    last: u64,
}

impl MessageIdGenerator {
    /// Resumes above every id already present in `messages`.
    pub fn resume_after(messages: &[Message]) -> Self {
        Self {
            last: messages.iter().map(|m| m.id).max().unwrap_or(0),
        }
    }

    pub fn next(&mut self, now: DateTime<Utc>) -> u64 {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        // Restored ids come from the host and may sit at the top of the range.
        self.last = millis.max(self.last.saturating_add(1));
        self.last
    }

    pub fn message(&mut self, role: MessageRole, content: impl Into<String>) -> Message {
        let now = Utc::now();
        Message {
            id: self.next(now),
            role,
            content: content.into(),
            created_at: now,
        }
    }
}

// ── Provider settings ─────────────────────────────────────────────────────────

pub const OLLAMA_DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const OPENAI_COMPAT_DEFAULT_BASE_URL: &str = "http://localhost:1234";
pub const OLLAMA_DEFAULT_MODEL: &str = "llama3.2";
pub const OPENAI_COMPAT_DEFAULT_MODEL: &str = "local-model";

/// The closed set of supported local model servers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
    /// Ollama's native REST API.
    #[default]
    Ollama,
    /// LM Studio and other servers speaking the OpenAI chat-completions API.
    OpenaiCompatible,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 2] = [ProviderKind::Ollama, ProviderKind::OpenaiCompatible];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Ollama => "ollama",
            ProviderKind::OpenaiCompatible => "openai-compatible",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::Ollama => OLLAMA_DEFAULT_BASE_URL,
            ProviderKind::OpenaiCompatible => OPENAI_COMPAT_DEFAULT_BASE_URL,
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Ollama => OLLAMA_DEFAULT_MODEL,
            ProviderKind::OpenaiCompatible => OPENAI_COMPAT_DEFAULT_MODEL,
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Ok(ProviderKind::Ollama),
            "openai-compatible" | "openai" | "lmstudio" | "lm-studio" => {
                Ok(ProviderKind::OpenaiCompatible)
            }
            other => Err(format!("Unknown provider: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSettings {
    pub provider: ProviderKind,
    pub base_url: String,
    pub model: String,
}

impl ProviderSettings {
    pub fn for_provider(provider: ProviderKind) -> Self {
        Self {
            provider,
            base_url: provider.default_base_url().to_string(),
            model: provider.default_model().to_string(),
        }
    }

    /// Merges `patch` into these settings and reports whether the connection
    /// target (provider kind or base address) changed.
    pub fn apply(&mut self, patch: SettingsPatch) -> bool {
        let before = (self.provider, self.base_url.clone());
        if let Some(provider) = patch.provider {
            self.provider = provider;
        }
        if let Some(base_url) = patch.base_url {
            self.base_url = base_url;
        }
        if let Some(model) = patch.model {
            self.model = model;
        }
        before != (self.provider, self.base_url.clone())
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self::for_provider(ProviderKind::default())
    }
}

/// Partial settings update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl SettingsPatch {
    /// Selects `provider` and auto-fills its default base address.
    pub fn switch_provider(provider: ProviderKind) -> Self {
        Self {
            provider: Some(provider),
            base_url: Some(provider.default_base_url().to_string()),
            model: None,
        }
    }

    pub fn base_url(base_url: impl Into<String>) -> Self {
        Self { base_url: Some(base_url.into()), ..Self::default() }
    }

    pub fn model(model: impl Into<String>) -> Self {
        Self { model: Some(model.into()), ..Self::default() }
    }
}

// ── Provider state ────────────────────────────────────────────────────────────

/// A model advertised by the configured provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<String>,
}

impl ModelInfo {
    pub fn new(name: impl Into<String>, size: Option<String>) -> Self {
        Self { name: name.into(), size, modified_at: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Connected,
    Connecting,
    #[default]
    Disconnected,
}

// ── Session ───────────────────────────────────────────────────────────────────

/// What gets mirrored into the host state slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub messages: Vec<Message>,
    pub settings: ProviderSettings,
}

/// Full read-only view of the controller state, as rendered by the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub messages: Vec<Message>,
    pub draft: String,
    pub pending: bool,
    pub settings: ProviderSettings,
    pub status: ConnectionStatus,
    pub models: Vec<ModelInfo>,
    pub models_loading: bool,
}

// ── API payloads ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Serialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The assistant reply, or `None` when the submit was ignored.
    pub message: Option<Message>,
    pub session: SessionView,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct TextBody {
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn ids_are_strictly_increasing_within_one_millisecond() {
        let mut ids = MessageIdGenerator::default();
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let a = ids.next(now);
        let b = ids.next(now);
        let c = ids.next(now);
        assert_eq!(a, 1_700_000_000_000);
        assert!(a < b && b < c);
    }

    #[test]
    fn ids_resume_after_restored_messages() {
        let restored = Message {
            id: u64::MAX / 2,
            role: MessageRole::User,
            content: "hi".into(),
            created_at: Utc::now(),
        };
        let mut ids = MessageIdGenerator::resume_after(&[restored]);
        assert_eq!(ids.next(Utc::now()), u64::MAX / 2 + 1);
    }

    #[test]
    fn ids_restored_at_max_do_not_overflow() {
        let restored = Message {
            id: u64::MAX,
            role: MessageRole::Assistant,
            content: "from host".into(),
            created_at: Utc::now(),
        };
        let mut ids = MessageIdGenerator::resume_after(&[restored]);
        assert_eq!(ids.next(Utc::now()), u64::MAX);
        let msg = ids.message(MessageRole::User, "hi");
        assert_eq!(msg.id, u64::MAX);
    }

    #[test]
    fn apply_reports_target_change_only_for_provider_or_address() {
        let mut settings = ProviderSettings::default();
        assert!(!settings.apply(SettingsPatch::model("mistral")));
        assert_eq!(settings.model, "mistral");

        assert!(settings.apply(SettingsPatch::base_url("http://10.0.0.2:11434")));
        assert!(!settings.apply(SettingsPatch::base_url("http://10.0.0.2:11434")));

        assert!(settings.apply(SettingsPatch::switch_provider(ProviderKind::OpenaiCompatible)));
        assert_eq!(settings.base_url, OPENAI_COMPAT_DEFAULT_BASE_URL);
        assert_eq!(settings.model, "mistral");
    }

    #[test]
    fn provider_kind_parses_aliases() {
        assert_eq!("Ollama".parse::<ProviderKind>(), Ok(ProviderKind::Ollama));
        assert_eq!("lmstudio".parse::<ProviderKind>(), Ok(ProviderKind::OpenaiCompatible));
        assert!("gemini".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn provider_kind_serializes_kebab_case() {
        let json = serde_json::to_string(&ProviderKind::OpenaiCompatible).unwrap();
        assert_eq!(json, "\"openai-compatible\"");
    }
}

use std::str::FromStr;
use std::time::Duration;

use crate::errors::AppError;
use crate::models::{ProviderKind, ProviderSettings};
use crate::service::chat_controller::{ControllerOptions, PROBE_DEBOUNCE};

const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardMode {
    System,
    Disabled,
}

/// Runtime configuration, read from the environment (after `.env`).
///
/// | Variable                 | Default                       |
/// |--------------------------|-------------------------------|
/// | `PORT`                   | `3000`                        |
/// | `CHAT_PROVIDER`          | `ollama`                      |
/// | `CHAT_BASE_URL`          | provider default address      |
/// | `CHAT_MODEL`             | provider default model        |
/// | `CHAT_PROBE_DEBOUNCE_MS` | `500`                         |
/// | `CHAT_CLIPBOARD`         | `system` (`none` disables it) |
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub default_settings: ProviderSettings,
    pub probe_debounce: Duration,
    pub clipboard: ClipboardMode,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => parse(&raw, "PORT")?,
            None => DEFAULT_PORT,
        };

        let provider = match get("CHAT_PROVIDER") {
            Some(raw) => ProviderKind::from_str(&raw).map_err(|_| invalid("CHAT_PROVIDER", &raw))?,
            None => ProviderKind::default(),
        };
        let mut default_settings = ProviderSettings::for_provider(provider);
        if let Some(base_url) = get("CHAT_BASE_URL") {
            default_settings.base_url = base_url.trim().to_string();
        }
        if let Some(model) = get("CHAT_MODEL") {
            default_settings.model = model.trim().to_string();
        }

        let probe_debounce = match get("CHAT_PROBE_DEBOUNCE_MS") {
            Some(raw) => Duration::from_millis(parse(&raw, "CHAT_PROBE_DEBOUNCE_MS")?),
            None => PROBE_DEBOUNCE,
        };

        let clipboard = match get("CHAT_CLIPBOARD").as_deref().map(str::trim) {
            None | Some("system") => ClipboardMode::System,
            Some("none") | Some("off") => ClipboardMode::Disabled,
            Some(other) => return Err(invalid("CHAT_CLIPBOARD", other)),
        };

        Ok(Self { port, default_settings, probe_debounce, clipboard })
    }

    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            default_settings: self.default_settings.clone(),
            probe_debounce: self.probe_debounce,
        }
    }
}

fn parse<T: FromStr>(raw: &str, key: &str) -> Result<T, AppError> {
    raw.trim().parse().map_err(|_| invalid(key, raw))
}

fn invalid(key: &str, value: &str) -> AppError {
    AppError::InvalidConfig { key: key.to_string(), value: value.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, AppError> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_target_local_ollama() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.default_settings, ProviderSettings::default());
        assert_eq!(cfg.default_settings.base_url, "http://localhost:11434");
        assert_eq!(cfg.probe_debounce, PROBE_DEBOUNCE);
        assert_eq!(cfg.clipboard, ClipboardMode::System);
    }

    #[test]
    fn provider_switch_fills_its_default_address() {
        let cfg = config(&[("CHAT_PROVIDER", "openai-compatible"), ("CHAT_MODEL", "qwen")]).unwrap();
        assert_eq!(cfg.default_settings.provider, ProviderKind::OpenaiCompatible);
        assert_eq!(cfg.default_settings.base_url, "http://localhost:1234");
        assert_eq!(cfg.default_settings.model, "qwen");
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(matches!(
            config(&[("PORT", "eighty")]),
            Err(AppError::InvalidConfig { key, .. }) if key == "PORT"
        ));
        assert!(config(&[("CHAT_PROVIDER", "gemini")]).is_err());
        assert!(config(&[("CHAT_CLIPBOARD", "maybe")]).is_err());
    }

    #[test]
    fn blank_values_count_as_unset() {
        let cfg = config(&[("CHAT_BASE_URL", "  "), ("CHAT_CLIPBOARD", "none")]).unwrap();
        assert_eq!(cfg.default_settings.base_url, "http://localhost:11434");
        assert_eq!(cfg.clipboard, ClipboardMode::Disabled);
    }
}

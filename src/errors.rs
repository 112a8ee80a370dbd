use thiserror::Error;

/// Top-level application error.
/// All variants carry a human-readable message for display/logging.
#[derive(Debug, Error)]
pub enum AppError {
    // ── Provider errors ──────────────────────────────────────────────────────
    #[error("Provider unreachable at {url}: {source}")]
    ProviderUnreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Provider returned HTTP {status} for {url}")]
    ProviderStatus { url: String, status: u16 },

    #[error("Failed to parse provider response: {message}")]
    ResponseParse { message: String },

    #[error("Failed to build request: {message}")]
    RequestBuild { message: String },

    // ── Host errors ──────────────────────────────────────────────────────────
    #[error("Clipboard unavailable: {message}")]
    Clipboard { message: String },

    // ── Configuration errors ─────────────────────────────────────────────────
    #[error("Invalid configuration value for '{key}': {value}")]
    InvalidConfig { key: String, value: String },
}

impl AppError {
    pub fn parse(message: impl Into<String>) -> Self {
        AppError::ResponseParse { message: message.into() }
    }

    pub fn is_timeout(&self) -> bool {
        match self {
            AppError::ProviderUnreachable { source, .. } => source.is_timeout(),
            _ => false,
        }
    }
}

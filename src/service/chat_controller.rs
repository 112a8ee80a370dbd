use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tracing::{debug, error, info, warn};

use crate::client::ProviderClient;
use crate::clipboard::ClipboardSink;
use crate::errors::AppError;
use crate::host::{HostBridge, HostEvent};
use crate::models::{
    ConnectionStatus, Message, MessageIdGenerator, MessageRole, ModelInfo, ProviderSettings,
    SessionSnapshot, SessionView, SettingsPatch,
};

/// Delay between a connection-target change and the probe it triggers.
pub const PROBE_DEBOUNCE: Duration = Duration::from_millis(500);

pub fn failure_notice(err: &AppError) -> String {
    format!("Error: {err}. Please check that the provider is running and your settings are correct.")
}

#[derive(Debug, Clone)]
pub struct ControllerOptions {
    /// Used when the host has no stored session.
    pub default_settings: ProviderSettings,
    pub probe_debounce: Duration,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self { default_settings: ProviderSettings::default(), probe_debounce: PROBE_DEBOUNCE }
    }
}

struct SessionState {
    messages: Vec<Message>,
    draft: String,
    pending: bool,
    settings: ProviderSettings,
    status: ConnectionStatus,
    models: Vec<ModelInfo>,
    models_loading: bool,
    ids: MessageIdGenerator,
}

impl SessionState {
    fn persisted(&self) -> SessionSnapshot {
        SessionSnapshot { messages: self.messages.clone(), settings: self.settings.clone() }
    }
}

struct Inner {
    client: ProviderClient,
    host: Arc<dyn HostBridge>,
    clipboard: Arc<dyn ClipboardSink>,
    probe_debounce: Duration,
    state: Mutex<SessionState>,
    scheduled_probe: Mutex<Option<AbortHandle>>,
}

/// Owns one chat session: the conversation, the provider settings and the
/// live connection status.
///
/// Provider failures never escape: completions turn them into an assistant
/// message, probes into `disconnected`, listings into an empty model list.
/// At most one completion is in flight; a submit made while one is pending
/// is dropped.
#[derive(Clone)]
pub struct ChatController {
    inner: Arc<Inner>,
}

impl ChatController {
    /// Builds a controller, restoring messages and settings from the host
    /// state slot when it holds a readable session.
    pub fn new(
        client: ProviderClient,
        options: ControllerOptions,
        host: Arc<dyn HostBridge>,
        clipboard: Arc<dyn ClipboardSink>,
    ) -> Self {
        let restored = host.get_state().and_then(|value| {
            serde_json::from_value::<SessionSnapshot>(value)
                .map_err(|e| warn!("Ignoring unreadable host state: {e}"))
                .ok()
        });
        let snapshot = restored.unwrap_or_else(|| SessionSnapshot {
            messages: Vec::new(),
            settings: options.default_settings.clone(),
        });
        info!(
            provider = %snapshot.settings.provider,
            base_url = %snapshot.settings.base_url,
            messages = snapshot.messages.len(),
            "chat session initialised"
        );

        let state = SessionState {
            ids: MessageIdGenerator::resume_after(&snapshot.messages),
            messages: snapshot.messages,
            draft: String::new(),
            pending: false,
            settings: snapshot.settings,
            status: ConnectionStatus::Disconnected,
            models: Vec::new(),
            models_loading: false,
        };

        Self {
            inner: Arc::new(Inner {
                client,
                host,
                clipboard,
                probe_debounce: options.probe_debounce,
                state: Mutex::new(state),
                scheduled_probe: Mutex::new(None),
            }),
        }
    }

    /// Session-start trigger: one connection check.
    pub async fn start(&self) {
        self.check_connection().await;
    }

    pub fn snapshot(&self) -> SessionView {
        let state = self.state();
        SessionView {
            messages: state.messages.clone(),
            draft: state.draft.clone(),
            pending: state.pending,
            settings: state.settings.clone(),
            status: state.status,
            models: state.models.clone(),
            models_loading: state.models_loading,
        }
    }

    pub fn set_draft(&self, text: impl Into<String>) {
        self.state().draft = text.into();
    }

    // ── Conversation ─────────────────────────────────────────────────────────

    /// Appends `text` as a user message and asks the provider for a reply.
    ///
    /// Returns the assistant message, or `None` when the input is blank or a
    /// previous submit is still pending. The outbound call runs on its own
    /// task, so dropping the returned future does not cancel it.
    pub async fn submit(&self, text: &str) -> Option<Message> {
        let prompt = text.trim();
        if prompt.is_empty() {
            return None;
        }

        let (settings, persisted) = {
            let mut state = self.state();
            if state.pending {
                debug!("submit ignored: a completion is already pending");
                return None;
            }
            let message = state.ids.message(MessageRole::User, prompt);
            state.messages.push(message);
            state.draft.clear();
            state.pending = true;
            (state.settings.clone(), state.persisted())
        };
        self.persist(persisted);

        let controller = self.clone();
        let prompt = prompt.to_string();
        match tokio::spawn(async move { controller.complete(settings, prompt).await }).await {
            Ok(reply) => Some(reply),
            Err(e) => {
                error!("Completion task failed: {e}");
                None
            }
        }
    }

    async fn complete(&self, settings: ProviderSettings, prompt: String) -> Message {
        let _pending = PendingGuard(self);

        let (content, status) = match self.inner.client.complete(&settings, &prompt).await {
            Ok(text) => (text, ConnectionStatus::Connected),
            Err(e) => {
                error!(provider = %settings.provider, "Completion failed: {e}");
                (failure_notice(&e), ConnectionStatus::Disconnected)
            }
        };

        let (reply, persisted) = {
            let mut state = self.state();
            let reply = state.ids.message(MessageRole::Assistant, content);
            state.messages.push(reply.clone());
            state.status = status;
            (reply, state.persisted())
        };
        self.persist(persisted);
        self.post(&HostEvent::StatusChanged { status });
        reply
    }

    /// Empties the conversation; settings and status are untouched.
    pub fn clear_session(&self) {
        let persisted = {
            let mut state = self.state();
            state.messages.clear();
            state.persisted()
        };
        info!("conversation cleared");
        self.persist(persisted);
    }

    /// Best-effort copy to the clipboard; failures are only logged.
    pub fn copy_message_text(&self, text: &str) {
        if let Err(e) = self.inner.clipboard.set_text(text) {
            warn!("Copy to clipboard failed: {e}");
        }
    }

    // ── Connection ───────────────────────────────────────────────────────────

    /// Probes the model-listing endpoint and records the outcome.
    pub async fn probe_connection(&self) -> ConnectionStatus {
        let settings = {
            let mut state = self.state();
            state.status = ConnectionStatus::Connecting;
            state.settings.clone()
        };
        self.post(&HostEvent::StatusChanged { status: ConnectionStatus::Connecting });

        let status = match self.inner.client.probe(&settings).await {
            Ok(()) => ConnectionStatus::Connected,
            Err(e) => {
                if e.is_timeout() {
                    warn!(base_url = %settings.base_url, "Provider probe timed out");
                } else {
                    warn!(base_url = %settings.base_url, "Provider probe failed: {e}");
                }
                ConnectionStatus::Disconnected
            }
        };

        self.state().status = status;
        self.post(&HostEvent::StatusChanged { status });
        status
    }

    /// Probe, then refresh the model list if the provider answered.
    pub async fn check_connection(&self) -> ConnectionStatus {
        let status = self.probe_connection().await;
        if status == ConnectionStatus::Connected {
            self.refresh_models().await;
        }
        status
    }

    /// Refetches the model list while connected, keeping the selected model
    /// valid. Listing failures degrade to an empty list.
    pub async fn refresh_models(&self) -> Vec<ModelInfo> {
        let settings = {
            let mut state = self.state();
            if state.status != ConnectionStatus::Connected {
                debug!("model refresh skipped: provider not connected");
                return state.models.clone();
            }
            state.models_loading = true;
            state.settings.clone()
        };
        let _loading = LoadingGuard(self);

        let models = match self.inner.client.list_models(&settings).await {
            Ok(models) => models,
            Err(e) => {
                warn!(base_url = %settings.base_url, "Model listing failed: {e}");
                Vec::new()
            }
        };

        let corrected = {
            let mut state = self.state();
            if (state.settings.provider, &state.settings.base_url)
                != (settings.provider, &settings.base_url)
            {
                debug!("discarding model list for a superseded provider target");
                return Vec::new();
            }
            state.models = models.clone();
            match models.first() {
                Some(first) if !models.iter().any(|m| m.name == state.settings.model) => {
                    info!(from = %state.settings.model, to = %first.name, "selected model not offered, switching");
                    state.settings.model = first.name.clone();
                    Some(state.persisted())
                }
                _ => None,
            }
        };
        if let Some(persisted) = corrected {
            self.persist(persisted);
        }
        models
    }

    // ── Settings ─────────────────────────────────────────────────────────────

    /// Merges `patch` into the settings and drops the cached model list. A
    /// change of provider or base address schedules a debounced probe.
    pub fn update_settings(&self, patch: SettingsPatch) -> ProviderSettings {
        let (target_changed, settings, persisted) = {
            let mut state = self.state();
            let target_changed = state.settings.apply(patch);
            state.models.clear();
            (target_changed, state.settings.clone(), state.persisted())
        };
        self.persist(persisted);
        if target_changed {
            self.schedule_probe();
        }
        settings
    }

    /// Replaces any scheduled probe with a fresh one after the debounce delay.
    fn schedule_probe(&self) {
        let Ok(runtime) = Handle::try_current() else {
            warn!("No async runtime available; connection probe not scheduled");
            return;
        };
        let controller = self.clone();
        let delay = self.inner.probe_debounce;
        let task = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            controller.check_connection().await;
        });

        let previous = self
            .inner
            .scheduled_probe
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(task.abort_handle());
        if let Some(previous) = previous {
            // A check aborted in flight leaves `Connecting`; the replacement settles it.
            previous.abort();
        }
    }

    // ── Helpers ──────────────────────────────────────────────────────────────

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, snapshot: SessionSnapshot) {
        let message_count = snapshot.messages.len();
        match serde_json::to_value(&snapshot) {
            Ok(value) => self.inner.host.set_state(value),
            Err(e) => warn!("Failed to serialize session for host: {e}"),
        }
        self.post(&HostEvent::SessionChanged { message_count });
    }

    fn post<T: Serialize>(&self, event: &T) {
        if let Ok(value) = serde_json::to_value(event) {
            self.inner.host.post_message(value);
        }
    }
}

/// Clears the pending flag however the completion ends.
struct PendingGuard<'a>(&'a ChatController);

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.state().pending = false;
    }
}

struct LoadingGuard<'a>(&'a ChatController);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.state().models_loading = false;
    }
}

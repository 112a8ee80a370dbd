use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::clipboard;
use crate::models::{default_base_url, Message, ModelInfo, ProviderSettings, SessionView, SettingsPatch};

/// How long to wait after a settings change before asking for the new status;
/// slightly longer than the backend's probe debounce.
const STATUS_POLL_DELAY_MS: u32 = 700;
const STATUS_POLL_ATTEMPTS: u32 = 12;

/// Shared application state, provided via Leptos context.
#[derive(Clone, Copy)]
pub struct AppState {
    // --- Read signals (for components to subscribe to) ---
    pub messages: ReadSignal<Vec<Message>>,
    pub draft: ReadSignal<String>,
    pub pending: ReadSignal<bool>,
    pub settings: ReadSignal<ProviderSettings>,
    pub status: ReadSignal<String>,
    pub models: ReadSignal<Vec<ModelInfo>>,
    pub models_loading: ReadSignal<bool>,
    pub error: ReadSignal<Option<String>>,

    // --- Write signals (for mutating state) ---
    pub set_messages: WriteSignal<Vec<Message>>,
    pub set_draft: WriteSignal<String>,
    pub set_pending: WriteSignal<bool>,
    pub set_settings: WriteSignal<ProviderSettings>,
    pub set_status: WriteSignal<String>,
    pub set_models: WriteSignal<Vec<ModelInfo>>,
    pub set_models_loading: WriteSignal<bool>,
    pub set_error: WriteSignal<Option<String>>,
}

impl AppState {
    /// Create a new `AppState` and provide it in the current Leptos context.
    pub fn provide() -> Self {
        let (messages, set_messages) = signal(Vec::<Message>::new());
        let (draft, set_draft) = signal(String::new());
        let (pending, set_pending) = signal(false);
        let (settings, set_settings) = signal(ProviderSettings::default());
        let (status, set_status) = signal("disconnected".to_string());
        let (models, set_models) = signal(Vec::<ModelInfo>::new());
        let (models_loading, set_models_loading) = signal(false);
        let (error, set_error) = signal(None::<String>);

        let state = Self {
            messages,
            draft,
            pending,
            settings,
            status,
            models,
            models_loading,
            error,
            set_messages,
            set_draft,
            set_pending,
            set_settings,
            set_status,
            set_models,
            set_models_loading,
            set_error,
        };

        provide_context(state);
        state
    }

    /// Copies a backend session view into the signals.
    fn apply(&self, view: SessionView) {
        self.set_messages.set(view.messages);
        self.set_pending.set(view.pending);
        self.set_settings.set(view.settings);
        self.set_status.set(view.status);
        self.set_models.set(view.models);
        self.set_models_loading.set(view.models_loading);
    }

    fn report(&self, context: &str, err: String) {
        log::error!("{context}: {err}");
        self.set_error.set(Some(err));
    }

    /// Load the session from the backend, including any saved draft.
    pub fn load_session(&self) {
        let state = *self;
        spawn_local(async move {
            match api::fetch_session().await {
                Ok(view) => {
                    state.set_draft.set(view.draft.clone());
                    state.apply(view);
                }
                Err(e) => state.report("Failed to fetch session", e),
            }
        });
    }

    pub fn save_draft(&self, text: String) {
        spawn_local(async move {
            if let Err(e) = api::save_draft(&text).await {
                log::warn!("Failed to save draft: {e}");
            }
        });
    }

    /// Send a message and wait for the assistant's reply.
    pub fn send_message(&self, text: String) {
        let state = *self;

        // Optimistically add the user message to the display
        let temp_user_msg = Message {
            id: js_sys::Date::now() as u64,
            role: "user".to_string(),
            content: text.clone(),
            created_at: String::new(),
        };
        self.set_messages.update(|msgs| msgs.push(temp_user_msg));
        self.set_pending.set(true);
        self.set_error.set(None);

        spawn_local(async move {
            match api::send_chat(&text).await {
                Ok(resp) => {
                    let failed = resp.session.status == "disconnected";
                    state.apply(resp.session);
                    if failed {
                        state.set_error.set(Some(
                            "Could not reach the model server. Check the provider settings.".to_string(),
                        ));
                    }
                }
                Err(e) => {
                    state.set_pending.set(false);
                    state.report("Chat request failed", e);
                }
            }
        });
    }

    pub fn update_settings(&self, patch: SettingsPatch) {
        let state = *self;
        let target_changed = patch.provider.is_some() || patch.base_url.is_some();
        spawn_local(async move {
            match api::update_settings(&patch).await {
                Ok(view) => state.apply(view),
                Err(e) => {
                    state.report("Failed to update settings", e);
                    return;
                }
            }
            if target_changed {
                state.poll_status().await;
            }
        });
    }

    /// Switches provider kind, filling in that provider's default address.
    pub fn switch_provider(&self, provider: String) {
        let patch = SettingsPatch {
            base_url: default_base_url(&provider).map(str::to_string),
            provider: Some(provider),
            model: None,
        };
        self.update_settings(patch);
    }

    /// Follows the backend's debounced probe until it settles.
    async fn poll_status(&self) {
        self.set_status.set("connecting".to_string());
        for _ in 0..STATUS_POLL_ATTEMPTS {
            TimeoutFuture::new(STATUS_POLL_DELAY_MS).await;
            match api::fetch_session().await {
                Ok(view) => {
                    let settled = view.status != "connecting" && !view.models_loading;
                    self.apply(view);
                    if settled {
                        return;
                    }
                }
                Err(e) => {
                    self.report("Failed to fetch session", e);
                    return;
                }
            }
        }
    }

    pub fn check_connection(&self) {
        let state = *self;
        self.set_status.set("connecting".to_string());
        spawn_local(async move {
            match api::check_connection().await {
                Ok(view) => {
                    state.set_error.set(None);
                    state.apply(view);
                }
                Err(e) => state.report("Connection check failed", e),
            }
        });
    }

    pub fn refresh_models(&self) {
        let state = *self;
        self.set_models_loading.set(true);
        spawn_local(async move {
            match api::refresh_models().await {
                Ok(view) => state.apply(view),
                Err(e) => {
                    state.set_models_loading.set(false);
                    state.report("Failed to refresh models", e);
                }
            }
        });
    }

    pub fn clear_chat(&self) {
        let state = *self;
        spawn_local(async move {
            match api::clear_messages().await {
                Ok(view) => state.apply(view),
                Err(e) => state.report("Failed to clear chat", e),
            }
        });
    }

    /// Copies via the browser clipboard, falling back to the backend host's.
    pub fn copy_text(&self, text: String) {
        spawn_local(async move {
            let Err(browser_err) = clipboard::write_text(&text).await else {
                return;
            };
            log::debug!("Browser clipboard unavailable ({browser_err}); asking the backend");
            if let Err(e) = api::copy_text(&text).await {
                log::warn!("Copy failed: {e}");
            }
        });
    }
}

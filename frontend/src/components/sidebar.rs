use leptos::prelude::*;

use crate::models::{PROVIDERS, SettingsPatch, model_patch};
use crate::state::AppState;

/// Sidebar with provider settings, connection status and session controls.
#[component]
pub fn Sidebar() -> impl IntoView {
    let state = expect_context::<AppState>();

    let status_label = move || match state.status.get().as_str() {
        "connected" => "Connected",
        "connecting" => "Connecting…",
        _ => "Disconnected",
    };

    view! {
        <aside class="sidebar">
            <div class="sidebar-header">
                <h2>"Local LLM Chat"</h2>
                <button class="new-chat-btn" on:click=move |_| state.clear_chat()>
                    "Clear chat"
                </button>
            </div>

            <div class="status-row">
                <span class=move || format!("status-dot {}", state.status.get())></span>
                <span class="status-label">{status_label}</span>
                <button
                    class="check-btn"
                    on:click=move |_| state.check_connection()
                    disabled=move || state.status.get() == "connecting"
                >
                    "Check connection"
                </button>
            </div>

            <label class="field">
                <span>"Provider"</span>
                <select
                    prop:value=move || state.settings.get().provider
                    on:change=move |ev| state.switch_provider(event_target_value(&ev))
                >
                    {PROVIDERS
                        .iter()
                        .map(|(id, label, _)| view! { <option value=*id>{*label}</option> })
                        .collect_view()}
                </select>
            </label>

            <label class="field">
                <span>"Base URL"</span>
                <input
                    type="text"
                    prop:value=move || state.settings.get().base_url
                    on:change=move |ev| {
                        state.update_settings(SettingsPatch {
                            base_url: Some(event_target_value(&ev).trim().to_string()),
                            ..SettingsPatch::default()
                        });
                    }
                />
            </label>

            <label class="field">
                <span>"Model"</span>
                // Free-form name, usable whether or not a listing is available
                <input
                    type="text"
                    placeholder="Model name"
                    prop:value=move || state.settings.get().model
                    on:change=move |ev| {
                        if let Some(patch) = model_patch(&event_target_value(&ev)) {
                            state.update_settings(patch);
                        }
                    }
                />
                <select
                    prop:value=move || state.settings.get().model
                    on:change=move |ev| {
                        state.update_settings(SettingsPatch {
                            model: Some(event_target_value(&ev)),
                            ..SettingsPatch::default()
                        });
                    }
                    disabled=move || state.models.get().is_empty()
                >
                    {move || {
                        let models = state.models.get();
                        if models.is_empty() {
                            let current = state.settings.get().model;
                            view! { <option value=current.clone()>{current}</option> }.into_any()
                        } else {
                            models
                                .into_iter()
                                .map(|m| {
                                    let label = match &m.size {
                                        Some(size) => format!("{} ({size})", m.name),
                                        None => m.name.clone(),
                                    };
                                    view! { <option value=m.name>{label}</option> }
                                })
                                .collect_view()
                                .into_any()
                        }
                    }}
                </select>
                <button
                    class="refresh-btn"
                    on:click=move |_| state.refresh_models()
                    disabled=move || state.models_loading.get() || state.status.get() != "connected"
                >
                    {move || if state.models_loading.get() { "Loading…" } else { "Refresh models" }}
                </button>
            </label>
        </aside>
    }
}

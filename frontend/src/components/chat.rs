use leptos::ev;
use leptos::prelude::*;

use crate::state::AppState;

/// Main chat area with message history and input.
#[component]
pub fn ChatArea() -> impl IntoView {
    let state = expect_context::<AppState>();

    view! {
        <main class="chat-area">
            // Error banner
            {move || {
                state.error.get().map(|err| {
                    view! {
                        <div class="error-banner">{err}</div>
                    }
                })
            }}

            // Chat header
            <div class="chat-header">
                {move || {
                    let settings = state.settings.get();
                    format!("{} · {}", settings.model, settings.base_url)
                }}
            </div>

            // Messages
            <div class="messages-container">
                {move || {
                    if state.messages.get().is_empty() {
                        view! {
                            <div class="empty-state">
                                "Send a message to start chatting"
                            </div>
                        }.into_any()
                    } else {
                        view! {
                            <For
                                each=move || state.messages.get()
                                key=|m| m.id
                                let:msg
                            >
                                <MessageBubble role=msg.role.clone() content=msg.content.clone() />
                            </For>
                            // Waiting for the reply
                            {move || {
                                state.pending.get().then(|| {
                                    view! {
                                        <div class="message assistant">
                                            <div class="role-label">"assistant"</div>
                                            <div class="thinking">"Thinking…"</div>
                                        </div>
                                    }
                                })
                            }}
                        }.into_any()
                    }
                }}
            </div>

            // Input area
            <ChatInput />
        </main>
    }
}

/// A single chat message bubble with a copy button.
#[component]
fn MessageBubble(role: String, content: String) -> impl IntoView {
    let state = expect_context::<AppState>();
    let css_class = if role == "user" {
        "message user"
    } else {
        "message assistant"
    };
    let to_copy = content.clone();

    view! {
        <div class=css_class>
            <div class="role-label">
                {role}
                <button
                    class="copy-btn"
                    title="Copy"
                    on:click=move |_| state.copy_text(to_copy.clone())
                >
                    "Copy"
                </button>
            </div>
            <div class="message-content">{content}</div>
        </div>
    }
}

/// Chat input form with textarea and send button.
#[component]
fn ChatInput() -> impl IntoView {
    let state = expect_context::<AppState>();

    let is_sending = move || state.pending.get();

    let send = move || {
        let text = state.draft.get_untracked().trim().to_string();
        if text.is_empty() || state.pending.get_untracked() {
            return;
        }
        state.set_draft.set(String::new());
        state.send_message(text);
    };

    let on_keydown = move |ev: ev::KeyboardEvent| {
        if ev.key() == "Enter" && !ev.shift_key() {
            ev.prevent_default();
            send();
        }
    };

    view! {
        <div class="input-area">
            <div class="input-row">
                <textarea
                    rows="1"
                    placeholder="Type a message… (Enter to send, Shift+Enter for newline)"
                    prop:value=move || state.draft.get()
                    on:input=move |ev| {
                        state.set_draft.set(event_target_value(&ev));
                    }
                    on:change=move |ev| {
                        state.save_draft(event_target_value(&ev));
                    }
                    on:keydown=on_keydown
                    disabled=is_sending
                />
                <button
                    class="send-btn"
                    on:click=move |_| send()
                    disabled=move || is_sending() || state.draft.get().trim().is_empty()
                >
                    {move || if is_sending() { "Sending…" } else { "Send" }}
                </button>
            </div>
        </div>
    }
}

use leptos::ev;
use leptos::html;
use leptos::prelude::*;

use crate::models::{format_time, Role};
use crate::state::AppState;

/// Main chat area: header, message history, and input form.
#[component]
pub fn ChatArea() -> impl IntoView {
    let state = expect_context::<AppState>();
    let messages = state.messages;
    let notice = state.notice;
    let is_loading = state.is_loading;
    let set_show_settings = state.set_show_settings;
    let end_ref = NodeRef::<html::Div>::new();

    // Keep the newest message in view as the list grows or streams.
    Effect::new(move |_| {
        messages.track();
        if let Some(el) = end_ref.get() {
            el.scroll_into_view();
        }
    });

    let clear_chat = move |_| state.clear_conversation();

    // Dots shown while the request is in flight and no reply text has arrived.
    let awaiting_reply = move || {
        is_loading.get()
            && messages
                .get()
                .last()
                .map(|m| m.role == Role::User)
                .unwrap_or(false)
    };

    view! {
        <main class="chat-panel">
            <div class="chat-header">
                <span class="chat-title">"Chat Interface"</span>
                <div class="chat-actions">
                    <button
                        class="header-btn"
                        on:click=move |_| {
                            set_show_settings.update(|visible| *visible = !*visible);
                        }
                    >
                        "Settings"
                    </button>
                    <button class="header-btn" on:click=clear_chat>
                        "Clear Chat"
                    </button>
                </div>
            </div>

            // Validation notice banner
            {move || {
                notice.get().map(|text| {
                    view! { <div class="notice-banner">{text}</div> }
                })
            }}

            <div class="messages-container">
                {move || {
                    if messages.get().is_empty() {
                        view! {
                            <div class="empty-state">
                                "Start a conversation by typing a message below"
                            </div>
                        }
                        .into_any()
                    } else {
                        view! {
                            <For
                                each=move || messages.get()
                                // Content length is part of the key so the
                                // trailing record re-renders as it streams.
                                key=|m| (m.id.clone(), m.content.len())
                                let:msg
                            >
                                <MessageBubble
                                    role=msg.role
                                    content=msg.content.clone()
                                    timestamp=msg.timestamp
                                />
                            </For>
                        }
                        .into_any()
                    }
                }}
                {move || {
                    awaiting_reply().then(|| {
                        view! {
                            <div class="message assistant">
                                <div class="typing-indicator">
                                    <span class="dot"></span>
                                    <span class="dot"></span>
                                    <span class="dot"></span>
                                </div>
                            </div>
                        }
                    })
                }}
                <div node_ref=end_ref></div>
            </div>

            <ChatInput />
        </main>
    }
}

/// A single chat message bubble with role label and timestamp.
#[component]
fn MessageBubble(role: Role, content: String, timestamp: f64) -> impl IntoView {
    let css_class = match role {
        Role::User => "message user",
        Role::Assistant => "message assistant",
    };

    view! {
        <div class=css_class>
            <div class="role-label">{role.label()}</div>
            <div class="message-content">{content}</div>
            <div class="message-time">{format_time(timestamp)}</div>
        </div>
    }
}

/// Input form with send button. Disabled while a reply is streaming.
#[component]
fn ChatInput() -> impl IntoView {
    let state = expect_context::<AppState>();
    let input = state.input;
    let set_input = state.set_input;
    let is_loading = state.is_loading;

    let send = move || state.send_message();

    let send_on_enter = {
        let send = send.clone();
        move |ev: ev::KeyboardEvent| {
            if ev.key() == "Enter" && !is_loading.get_untracked() {
                ev.prevent_default();
                send();
            }
        }
    };

    view! {
        <form class="input-area" on:submit=move |ev: ev::SubmitEvent| ev.prevent_default()>
            <div class="input-row">
                <input
                    type="text"
                    placeholder="Type your message here..."
                    prop:value=input
                    on:input=move |ev| {
                        set_input.set(event_target_value(&ev));
                    }
                    on:keydown=send_on_enter
                    disabled=move || is_loading.get()
                />
                <button
                    class="send-btn"
                    on:click=move |_| send()
                    disabled=move || is_loading.get() || input.get().trim().is_empty()
                >
                    {move || if is_loading.get() { "Sending..." } else { "Send" }}
                </button>
            </div>
        </form>
    }
}

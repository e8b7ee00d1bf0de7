use leptos::prelude::*;

use crate::state::AppState;

const MODEL_OPTIONS: &[(&str, &str)] = &[
    ("gpt-4.1-mini", "GPT-4.1 Mini"),
    ("gpt-4", "GPT-4"),
    ("gpt-3.5-turbo", "GPT-3.5 Turbo"),
];

/// Configuration panel: API key, model choice, and system prompt.
#[component]
pub fn SettingsPanel() -> impl IntoView {
    let state = expect_context::<AppState>();
    let api_key = state.api_key;
    let set_api_key = state.set_api_key;
    let model = state.model;
    let set_model = state.set_model;
    let system_prompt = state.system_prompt;
    let set_system_prompt = state.set_system_prompt;
    let set_show_settings = state.set_show_settings;

    view! {
        <div class="settings-panel">
            <div class="settings-header">
                <h3>"Settings"</h3>
                <button class="close-btn" on:click=move |_| set_show_settings.set(false)>
                    "Close"
                </button>
            </div>

            <label class="settings-field">
                "OpenAI API Key"
                <input
                    type="password"
                    placeholder="sk-..."
                    prop:value=api_key
                    on:input=move |ev| {
                        set_api_key.set(event_target_value(&ev));
                    }
                />
            </label>

            <label class="settings-field">
                "Model"
                <select
                    prop:value=model
                    on:change=move |ev| {
                        set_model.set(event_target_value(&ev));
                    }
                >
                    {MODEL_OPTIONS
                        .iter()
                        .map(|(value, label)| {
                            let value = value.to_string();
                            let selected = {
                                let value = value.clone();
                                move || model.get() == value
                            };
                            view! {
                                <option value=value selected=selected>
                                    {*label}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
            </label>

            <label class="settings-field">
                "System Message"
                <textarea
                    rows="3"
                    placeholder="You are a helpful AI assistant..."
                    prop:value=system_prompt
                    on:input=move |ev| {
                        set_system_prompt.set(event_target_value(&ev));
                    }
                />
            </label>
        </div>
    }
}

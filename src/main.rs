mod api;
mod components;
mod models;
mod state;
mod stream;

use leptos::mount::mount_to_body;
use leptos::prelude::*;

use components::chat::ChatArea;
use components::settings::SettingsPanel;
use state::AppState;

/// Root application component.
#[component]
fn App() -> impl IntoView {
    let state = AppState::provide();
    let show_settings = state.show_settings;

    view! {
        <div class="app-container">
            <header class="app-header">
                <h1>"AI Chat"</h1>
                <p class="tagline">"Chat with GPT models powered by OpenAI"</p>
            </header>
            {move || show_settings.get().then(|| view! { <SettingsPanel /> })}
            <ChatArea />
        </div>
    }
}

fn main() {
    console_log::init_with_level(log::Level::Debug).expect("Failed to init logger");
    mount_to_body(App);
}

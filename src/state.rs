use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::models::{ChatRequest, Message, Role};
use crate::stream;

/// Substituted as the assistant reply when the request or stream fails.
pub const FALLBACK_REPLY: &str =
    "Sorry, there was an error processing your request. Please check your API key and try again.";

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant.";
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";

/// Why a submission was rejected before any request was made.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitError {
    EmptyPrompt,
    MissingApiKey,
}

impl SubmitError {
    pub fn notice(self) -> &'static str {
        match self {
            SubmitError::EmptyPrompt => "Please enter a message",
            SubmitError::MissingApiKey => "Please enter your OpenAI API key in the settings",
        }
    }
}

/// Shared application state, provided via Leptos context.
#[derive(Clone)]
pub struct AppState {
    // --- Read signals (for components to subscribe to) ---
    pub messages: ReadSignal<Vec<Message>>,
    pub input: ReadSignal<String>,
    pub system_prompt: ReadSignal<String>,
    pub api_key: ReadSignal<String>,
    pub model: ReadSignal<String>,
    pub is_loading: ReadSignal<bool>,
    pub show_settings: ReadSignal<bool>,
    pub notice: ReadSignal<Option<String>>,

    // --- Write signals (for mutating state) ---
    pub set_messages: WriteSignal<Vec<Message>>,
    pub set_input: WriteSignal<String>,
    pub set_system_prompt: WriteSignal<String>,
    pub set_api_key: WriteSignal<String>,
    pub set_model: WriteSignal<String>,
    pub set_is_loading: WriteSignal<bool>,
    pub set_show_settings: WriteSignal<bool>,
    pub set_notice: WriteSignal<Option<String>>,
}

impl AppState {
    pub fn new() -> Self {
        let (messages, set_messages) = signal(Vec::<Message>::new());
        let (input, set_input) = signal(String::new());
        let (system_prompt, set_system_prompt) = signal(DEFAULT_SYSTEM_PROMPT.to_string());
        let (api_key, set_api_key) = signal(String::new());
        let (model, set_model) = signal(DEFAULT_MODEL.to_string());
        let (is_loading, set_is_loading) = signal(false);
        let (show_settings, set_show_settings) = signal(false);
        let (notice, set_notice) = signal(None::<String>);

        Self {
            messages,
            input,
            system_prompt,
            api_key,
            model,
            is_loading,
            show_settings,
            notice,
            set_messages,
            set_input,
            set_system_prompt,
            set_api_key,
            set_model,
            set_is_loading,
            set_show_settings,
            set_notice,
        }
    }

    /// Create a new `AppState` and provide it in the current Leptos context.
    pub fn provide() -> Self {
        let state = Self::new();
        provide_context(state.clone());
        state
    }

    /// Validates the prompt and credential, then commits the submission.
    ///
    /// On success the user record is appended, the input cleared, the loading
    /// flag raised, and the request to send is returned. On failure a notice
    /// is surfaced (and the settings panel opened for the credential case)
    /// without touching the conversation.
    pub fn begin_submission(&self) -> Result<ChatRequest, SubmitError> {
        let prompt = self.input.get_untracked().trim().to_string();
        if prompt.is_empty() {
            self.set_notice
                .set(Some(SubmitError::EmptyPrompt.notice().to_string()));
            return Err(SubmitError::EmptyPrompt);
        }

        let api_key = self.api_key.get_untracked().trim().to_string();
        if api_key.is_empty() {
            self.set_notice
                .set(Some(SubmitError::MissingApiKey.notice().to_string()));
            self.set_show_settings.set(true);
            return Err(SubmitError::MissingApiKey);
        }

        let request = ChatRequest {
            developer_message: self.system_prompt.get_untracked(),
            user_message: prompt.clone(),
            model: self.model.get_untracked(),
            api_key,
        };

        self.set_messages
            .update(|msgs| msgs.push(Message::new(Role::User, prompt)));
        self.set_input.set(String::new());
        self.set_notice.set(None);
        self.set_is_loading.set(true);
        Ok(request)
    }

    /// Appends the empty assistant record that the stream writes into.
    pub fn begin_assistant(&self) {
        self.set_messages
            .update(|msgs| msgs.push(Message::new(Role::Assistant, "")));
    }

    /// Overwrites the trailing assistant record with the accumulated text.
    /// Any other record is left alone; earlier turns are immutable.
    pub fn set_streamed_content(&self, text: &str) {
        self.set_messages.update(|msgs| {
            if let Some(last) = msgs.last_mut() {
                if last.role == Role::Assistant {
                    last.content = text.to_string();
                }
            }
        });
    }

    /// Puts the fixed fallback reply in place of the assistant response:
    /// overwrites the trailing assistant record if the stream had started,
    /// otherwise appends a fresh one.
    pub fn apply_fallback(&self) {
        self.set_messages.update(|msgs| match msgs.last_mut() {
            Some(last) if last.role == Role::Assistant => {
                last.content = FALLBACK_REPLY.to_string();
            }
            _ => msgs.push(Message::new(Role::Assistant, FALLBACK_REPLY)),
        });
    }

    /// Clears the loading flag. Called on every submission exit path.
    pub fn finish_submission(&self) {
        self.set_is_loading.set(false);
    }

    /// Empties the conversation. The reset is all-or-nothing.
    pub fn clear_conversation(&self) {
        self.set_messages.set(Vec::new());
        self.set_notice.set(None);
    }

    /// Submission entry point used by the input form.
    pub fn send_message(&self) {
        let request = match self.begin_submission() {
            Ok(request) => request,
            Err(err) => {
                log::warn!("Submission blocked: {err:?}");
                return;
            }
        };

        let state = self.clone();
        spawn_local(async move {
            match api::stream_chat(&request).await {
                Ok(body) => {
                    state.begin_assistant();
                    let sink = state.clone();
                    if let Err(e) =
                        stream::pump(body, move |text| sink.set_streamed_content(text)).await
                    {
                        log::error!("Streaming failed: {e}");
                        state.apply_fallback();
                    }
                }
                Err(e) => {
                    log::error!("Chat request failed: {e}");
                    state.apply_fallback();
                }
            }
            state.finish_submission();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submitted_state() -> AppState {
        let state = AppState::new();
        state.set_input.set("hello".to_string());
        state.set_api_key.set("sk-test".to_string());
        state.begin_submission().expect("submission should pass");
        state
    }

    #[test]
    fn empty_prompt_never_appends_a_message() {
        let state = AppState::new();
        assert_eq!(state.begin_submission(), Err(SubmitError::EmptyPrompt));
        assert!(state.messages.get_untracked().is_empty());
        assert!(!state.is_loading.get_untracked());
        assert!(!state.show_settings.get_untracked());
        assert!(state.notice.get_untracked().is_some());
    }

    #[test]
    fn whitespace_only_prompt_is_rejected() {
        let state = AppState::new();
        state.set_input.set("   \n".to_string());
        state.set_api_key.set("sk-test".to_string());
        assert_eq!(state.begin_submission(), Err(SubmitError::EmptyPrompt));
        assert!(state.messages.get_untracked().is_empty());
    }

    #[test]
    fn missing_api_key_opens_settings_and_appends_nothing() {
        let state = AppState::new();
        state.set_input.set("hello".to_string());
        assert_eq!(state.begin_submission(), Err(SubmitError::MissingApiKey));
        assert!(state.messages.get_untracked().is_empty());
        assert!(state.show_settings.get_untracked());
        assert!(!state.is_loading.get_untracked());
    }

    #[test]
    fn successful_submission_appends_user_record_and_raises_loading() {
        let state = AppState::new();
        state.set_input.set("hello".to_string());
        state.set_api_key.set("sk-test".to_string());

        let request = state.begin_submission().expect("submission should pass");
        assert_eq!(request.user_message, "hello");
        assert_eq!(request.model, DEFAULT_MODEL);
        assert_eq!(request.developer_message, DEFAULT_SYSTEM_PROMPT);
        assert_eq!(request.api_key, "sk-test");

        let msgs = state.messages.get_untracked();
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].role, Role::User);
        assert_eq!(msgs[0].content, "hello");
        assert!(state.input.get_untracked().is_empty());
        assert!(state.is_loading.get_untracked());
        assert!(state.notice.get_untracked().is_none());
    }

    #[test]
    fn streamed_chunks_accumulate_into_trailing_assistant_record() {
        let state = submitted_state();
        state.begin_assistant();

        let mut acc = crate::stream::Accumulator::new();
        state.set_streamed_content(acc.push("Hel"));
        state.set_streamed_content(acc.push("lo"));

        let msgs = state.messages.get_untracked();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[1].role, Role::Assistant);
        assert_eq!(msgs[1].content, "Hello");
    }

    #[test]
    fn streaming_never_touches_earlier_records() {
        let state = submitted_state();
        state.begin_assistant();
        state.set_streamed_content("partial");

        let msgs = state.messages.get_untracked();
        assert_eq!(msgs[0].role, Role::User);
        assert_eq!(msgs[0].content, "hello");
    }

    #[test]
    fn streamed_content_is_a_noop_when_trailing_record_is_not_assistant() {
        let state = submitted_state();
        state.set_streamed_content("stray");

        let msgs = state.messages.get_untracked();
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].content, "hello");
    }

    #[test]
    fn fallback_overwrites_partial_assistant_record() {
        let state = submitted_state();
        state.begin_assistant();
        state.set_streamed_content("partial answer");
        state.apply_fallback();

        let msgs = state.messages.get_untracked();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[1].content, FALLBACK_REPLY);
    }

    #[test]
    fn fallback_appends_when_request_failed_before_stream_start() {
        let state = submitted_state();
        state.apply_fallback();

        let msgs = state.messages.get_untracked();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[1].role, Role::Assistant);
        assert_eq!(msgs[1].content, FALLBACK_REPLY);
    }

    #[test]
    fn finish_submission_clears_the_loading_flag() {
        let state = submitted_state();
        assert!(state.is_loading.get_untracked());
        state.finish_submission();
        assert!(!state.is_loading.get_untracked());
    }

    #[test]
    fn clearing_the_conversation_empties_it_unconditionally() {
        let state = submitted_state();
        state.begin_assistant();
        state.set_streamed_content("some reply");
        state.clear_conversation();
        assert!(state.messages.get_untracked().is_empty());
        assert!(state.notice.get_untracked().is_none());
    }
}

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Who authored a chat message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One chat turn in the conversation display.
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    /// Client-local id, used as the render key.
    pub id: String,
    pub role: Role,
    pub content: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: f64,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: format!("msg-{}", next_id()),
            role,
            content: content.into(),
            timestamp: now_ms(),
        }
    }
}

fn next_id() -> u64 {
    static NEXT: AtomicU64 = AtomicU64::new(0);
    NEXT.fetch_add(1, Ordering::Relaxed)
}

/// Request body for the chat completion endpoint.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChatRequest {
    pub developer_message: String,
    pub user_message: String,
    pub model: String,
    pub api_key: String,
}

/// Current time in milliseconds since the Unix epoch.
pub fn now_ms() -> f64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as f64)
            .unwrap_or(0.0)
    }
}

/// Formats a millisecond timestamp as a locale time string for display.
/// Browser-only at runtime; components are never rendered in native tests.
pub fn format_time(ms: f64) -> String {
    js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(ms))
        .to_locale_time_string("en-US")
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_ids_are_unique() {
        let a = Message::new(Role::User, "hi");
        let b = Message::new(Role::Assistant, "hello");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn chat_request_serializes_with_wire_field_names() {
        let request = ChatRequest {
            developer_message: "You are a helpful AI assistant.".to_string(),
            user_message: "hello".to_string(),
            model: "gpt-4.1-mini".to_string(),
            api_key: "sk-test".to_string(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["developer_message"], "You are a helpful AI assistant.");
        assert_eq!(value["user_message"], "hello");
        assert_eq!(value["model"], "gpt-4.1-mini");
        assert_eq!(value["api_key"], "sk-test");
        assert_eq!(value.as_object().unwrap().len(), 4);
    }
}

use gloo_net::http::Request;
use web_sys::ReadableStream;

use crate::models::ChatRequest;

/// Path of the chat completion endpoint, served by the collaborating backend.
const CHAT_ENDPOINT: &str = "/api/chat";

/// Sends a chat request and returns the raw response body stream.
///
/// The endpoint replies with plain text bytes, delivered incrementally, so
/// the caller consumes the body via [`crate::stream`] instead of a JSON
/// decode.
pub async fn stream_chat(request: &ChatRequest) -> Result<ReadableStream, String> {
    let resp = Request::post(CHAT_ENDPOINT)
        .json(request)
        .map_err(|e| format!("Serialize error: {e}"))?
        .send()
        .await
        .map_err(|e| format!("Network error: {e}"))?;

    if !resp.ok() {
        return Err(format!("Server error: {}", resp.status()));
    }

    resp.body()
        .ok_or_else(|| "Empty response body".to_string())
}

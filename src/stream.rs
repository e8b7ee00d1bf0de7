use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{ReadableStream, ReadableStreamDefaultReader, TextDecodeOptions, TextDecoder};

/// Concatenates decoded text fragments in arrival order.
///
/// The only buffering in the streaming path: each pushed fragment extends the
/// accumulated string, which is what the UI displays after every chunk.
#[derive(Debug, Default)]
pub struct Accumulator {
    buf: String,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a fragment and returns the full accumulated text.
    pub fn push(&mut self, fragment: &str) -> &str {
        self.buf.push_str(fragment);
        &self.buf
    }

    pub fn into_text(self) -> String {
        self.buf
    }
}

/// Incremental reader over a response body stream.
///
/// Decodes with `stream: true` so UTF-8 sequences split across chunk
/// boundaries are carried over to the next read instead of being mangled.
struct BodyReader {
    reader: ReadableStreamDefaultReader,
    decoder: TextDecoder,
}

impl BodyReader {
    fn new(body: ReadableStream) -> Result<Self, String> {
        let reader: ReadableStreamDefaultReader = body
            .get_reader()
            .dyn_into()
            .map_err(|_| "Response body is not readable".to_string())?;
        let decoder =
            TextDecoder::new().map_err(|e| format!("Failed to create text decoder: {e:?}"))?;
        Ok(Self { reader, decoder })
    }

    /// Reads and decodes the next chunk. `None` once the stream is done.
    async fn next_chunk(&self) -> Result<Option<String>, String> {
        let result = JsFuture::from(self.reader.read())
            .await
            .map_err(|e| format!("Stream read failed: {e:?}"))?;

        let done = js_sys::Reflect::get(&result, &"done".into())
            .ok()
            .and_then(|v| v.as_bool())
            .unwrap_or(true);
        if done {
            return Ok(None);
        }

        let value = js_sys::Reflect::get(&result, &"value".into())
            .map_err(|e| format!("Stream read failed: {e:?}"))?;
        let mut bytes = js_sys::Uint8Array::new(&value).to_vec();

        let options = TextDecodeOptions::new();
        options.set_stream(true);
        self.decoder
            .decode_with_u8_array_and_options(&mut bytes, &options)
            .map(Some)
            .map_err(|e| format!("Decode failed: {e:?}"))
    }
}

/// Drives the streaming loop: read chunk, decode, accumulate, report.
///
/// `on_update` receives the full accumulated text after every chunk, in
/// arrival order, as fast as chunks arrive. Returns the complete text once
/// the stream signals completion.
pub async fn pump(
    body: ReadableStream,
    mut on_update: impl FnMut(&str),
) -> Result<String, String> {
    let reader = BodyReader::new(body)?;
    let mut acc = Accumulator::new();
    while let Some(chunk) = reader.next_chunk().await? {
        on_update(acc.push(&chunk));
    }
    Ok(acc.into_text())
}

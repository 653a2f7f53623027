//! Shared SSE plumbing for provider streams.
//!
//! Both vendors stream responses over HTTP Server-Sent Events. This wraps
//! `eventsource-stream` to turn a response body into a stream of data
//! payloads, filtering `[DONE]` markers and empty events, and provides a
//! tolerant JSON parse that logs and skips malformed events instead of
//! killing the stream.

use eventsource_stream::Eventsource;
use futures::{Stream, StreamExt};
use tracing::warn;

/// Turn a streaming response into a stream of SSE data payloads.
///
/// Read errors end the stream with a warning; a dropped connection is
/// indistinguishable from a clean end here, so callers must tolerate
/// streams that end without their vendor's terminal event.
pub fn sse_data_stream(
    response: reqwest::Response,
) -> impl Stream<Item = String> + Send + 'static {
    let mut events = response.bytes_stream().eventsource();
    async_stream::stream! {
        while let Some(event) = events.next().await {
            match event {
                Ok(ev) => {
                    let data = ev.data.trim();
                    if data.is_empty() || data == "[DONE]" {
                        continue;
                    }
                    yield data.to_owned();
                }
                Err(e) => {
                    warn!("SSE stream read error: {e}");
                    break;
                }
            }
        }
    }
}

/// Parse an SSE data payload, logging and skipping on failure.
pub fn parse_sse_data<T: serde::de::DeserializeOwned>(data: &str, provider: &str) -> Option<T> {
    match serde_json::from_str(data) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!(
                provider,
                error = %e,
                data_preview = optima_core::text::truncate_str(data, 100),
                "failed to parse SSE event"
            );
            None
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

//! SSE transport for delta events.
//!
//! Both chat and document generation answer with `text/event-stream`
//! where each SSE `data:` line is one serialized
//! [`optima_core::events::DeltaEvent`].

use std::convert::Infallible;

use axum::response::Sse;
use axum::response::sse::{Event, KeepAlive};
use futures::{Stream, StreamExt};
use tokio_stream::wrappers::ReceiverStream;
use tracing::warn;

use optima_core::events::DeltaEvent;

/// Serialize one event as an SSE frame.
fn frame(event: &DeltaEvent) -> Option<Event> {
    match Event::default().json_data(event) {
        Ok(frame) => Some(frame),
        Err(e) => {
            warn!("failed to serialize delta event: {e}");
            None
        }
    }
}

/// SSE response from a stream of delta events.
pub fn sse_from_stream<S>(events: S) -> Sse<impl Stream<Item = Result<Event, Infallible>>>
where
    S: Stream<Item = DeltaEvent> + Send + 'static,
{
    let frames = events.filter_map(|event| async move { frame(&event).map(Ok) });
    Sse::new(frames).keep_alive(KeepAlive::default())
}

/// SSE response draining a channel fed by a spawned generation task.
pub fn sse_from_channel(
    rx: tokio::sync::mpsc::Receiver<DeltaEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    sse_from_stream(ReceiverStream::new(rx))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_carries_tagged_json() {
        let event = DeltaEvent::TextDelta { delta: "hi".into() };
        assert!(frame(&event).is_some());
    }
}

//! Delta writer.
//!
//! Handlers push events through a [`DeltaWriter`] wrapping the channel the
//! HTTP layer drains into the SSE response. A closed channel means the
//! client disconnected; sends after that are dropped silently so handlers
//! can run to completion and the final content still gets persisted.

use tokio::sync::mpsc;
use tracing::debug;

use optima_core::events::DeltaEvent;

use crate::kinds::DocumentKind;

/// Sender half handed to document handlers.
#[derive(Clone)]
pub struct DeltaWriter {
    tx: mpsc::Sender<DeltaEvent>,
}

impl DeltaWriter {
    /// Wrap a channel sender.
    #[must_use]
    pub fn new(tx: mpsc::Sender<DeltaEvent>) -> Self {
        Self { tx }
    }

    /// Create a writer plus the receiver the transport drains.
    #[must_use]
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<DeltaEvent>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self::new(tx), rx)
    }

    /// Send any event.
    pub async fn send(&self, event: DeltaEvent) {
        if self.tx.send(event).await.is_err() {
            debug!("delta receiver dropped, discarding event");
        }
    }

    /// Emit `start`.
    pub async fn start(&self) {
        self.send(DeltaEvent::Start).await;
    }

    /// Emit a prose fragment.
    pub async fn text_delta(&self, delta: impl Into<String>) {
        self.send(DeltaEvent::TextDelta {
            delta: delta.into(),
        })
        .await;
    }

    /// Emit a non-prose fragment for `kind`.
    pub async fn content_delta(&self, kind: DocumentKind, delta: impl Into<String>) {
        self.send(DeltaEvent::ContentDelta {
            kind: kind.as_str().to_owned(),
            delta: delta.into(),
        })
        .await;
    }

    /// Emit the terminal `finish` with the canonical content.
    pub async fn finish(&self, content: impl Into<String>) {
        self.send(DeltaEvent::finish(content)).await;
    }

    /// Emit the terminal `error`.
    pub async fn error(&self, message: impl Into<String>) {
        self.send(DeltaEvent::Error {
            error: message.into(),
        })
        .await;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn events_arrive_in_order() {
        let (writer, mut rx) = DeltaWriter::channel(16);
        writer.start().await;
        writer.text_delta("a").await;
        writer.content_delta(DocumentKind::Svg, "<svg>").await;
        writer.finish("done").await;
        drop(writer);

        let mut types = Vec::new();
        while let Some(event) = rx.recv().await {
            types.push(event.event_type());
        }
        assert_eq!(types, vec!["start", "text_delta", "content_delta", "finish"]);
    }

    #[tokio::test]
    async fn dropped_receiver_does_not_error() {
        let (writer, rx) = DeltaWriter::channel(1);
        drop(rx);
        // Must not panic or block
        writer.text_delta("into the void").await;
        writer.finish("done").await;
    }
}

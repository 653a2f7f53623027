//! Handler trait and dispatch table.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::{ArtifactError, Result};
use crate::kinds::DocumentKind;
use crate::writer::DeltaWriter;

/// A generator for one document kind.
///
/// Handlers stream fragments through the writer and return the final
/// content; the caller persists it and emits the terminal event. The
/// returned string must equal the concatenation of the streamed fragments.
#[async_trait]
pub trait DocumentHandler: Send + Sync {
    /// Which kind this handler produces.
    fn kind(&self) -> DocumentKind;

    /// Generate initial content for a new document.
    async fn on_create(&self, title: &str, writer: &DeltaWriter) -> Result<String>;

    /// Revise an existing document per the user's description.
    async fn on_update(
        &self,
        title: &str,
        current_content: &str,
        description: &str,
        writer: &DeltaWriter,
    ) -> Result<String>;
}

/// `kind → handler` dispatch table.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<DocumentKind, Arc<dyn DocumentHandler>>,
}

impl HandlerRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under its own kind.
    #[must_use]
    pub fn with(mut self, handler: Arc<dyn DocumentHandler>) -> Self {
        let _ = self.handlers.insert(handler.kind(), handler);
        self
    }

    /// Resolve a handler for a raw kind string.
    pub fn get(&self, kind: &str) -> Result<Arc<dyn DocumentHandler>> {
        let parsed = DocumentKind::parse(kind).ok_or_else(|| ArtifactError::UnknownKind {
            kind: kind.to_owned(),
        })?;
        self.handlers
            .get(&parsed)
            .cloned()
            .ok_or_else(|| ArtifactError::UnknownKind {
                kind: kind.to_owned(),
            })
    }

    /// The kinds with a registered handler.
    #[must_use]
    pub fn kinds(&self) -> Vec<DocumentKind> {
        self.handlers.keys().copied().collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    struct EchoHandler(DocumentKind);

    #[async_trait]
    impl DocumentHandler for EchoHandler {
        fn kind(&self) -> DocumentKind {
            self.0
        }

        async fn on_create(&self, title: &str, writer: &DeltaWriter) -> Result<String> {
            writer.text_delta(title).await;
            Ok(title.to_owned())
        }

        async fn on_update(
            &self,
            _title: &str,
            _current_content: &str,
            description: &str,
            writer: &DeltaWriter,
        ) -> Result<String> {
            writer.text_delta(description).await;
            Ok(description.to_owned())
        }
    }

    #[test]
    fn resolves_registered_kind() {
        let registry = HandlerRegistry::new().with(Arc::new(EchoHandler(DocumentKind::Text)));
        let handler = registry.get("text").unwrap();
        assert_eq!(handler.kind(), DocumentKind::Text);
    }

    #[test]
    fn unknown_kind_string_is_rejected() {
        let registry = HandlerRegistry::new().with(Arc::new(EchoHandler(DocumentKind::Text)));
        let err = registry.get("pdf").err().unwrap();
        assert_matches!(err, ArtifactError::UnknownKind { kind } if kind == "pdf");
    }

    #[test]
    fn known_kind_without_handler_is_rejected() {
        let registry = HandlerRegistry::new().with(Arc::new(EchoHandler(DocumentKind::Text)));
        let err = registry.get("svg").err().unwrap();
        assert_matches!(err, ArtifactError::UnknownKind { kind } if kind == "svg");
    }
}

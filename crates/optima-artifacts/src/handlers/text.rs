//! Prose document handler.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use optima_core::messages::ChatMessage;
use optima_llm::{ChatRequest, Provider};

use crate::errors::Result;
use crate::handler::DocumentHandler;
use crate::handlers::drive_text;
use crate::kinds::DocumentKind;
use crate::writer::DeltaWriter;

const CREATE_SYSTEM: &str = "Write about the given topic. Markdown is supported. \
     Use headings wherever appropriate.";

const UPDATE_SYSTEM: &str =
    "Improve the following document based on the given prompt. Return the \
     complete revised document, not a diff.";

/// Streams prose from the configured LLM provider.
pub struct TextHandler {
    provider: Arc<dyn Provider>,
}

impl TextHandler {
    /// New handler backed by `provider`.
    #[must_use]
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl DocumentHandler for TextHandler {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Text
    }

    #[instrument(skip_all, fields(kind = "text", title))]
    async fn on_create(&self, title: &str, writer: &DeltaWriter) -> Result<String> {
        let request = ChatRequest::from_prompt(title).with_system(CREATE_SYSTEM);
        drive_text(self.provider.as_ref(), &request, writer).await
    }

    #[instrument(skip_all, fields(kind = "text", title))]
    async fn on_update(
        &self,
        _title: &str,
        current_content: &str,
        description: &str,
        writer: &DeltaWriter,
    ) -> Result<String> {
        let request = ChatRequest {
            messages: vec![ChatMessage::user(description)],
            system: Some(format!("{UPDATE_SYSTEM}\n\n{current_content}")),
            max_tokens: None,
            temperature: None,
        };
        drive_text(self.provider.as_ref(), &request, writer).await
    }
}

//! SVG document handler.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use optima_core::messages::ChatMessage;
use optima_llm::{ChatRequest, Provider};

use crate::errors::Result;
use crate::handler::DocumentHandler;
use crate::handlers::drive_code;
use crate::kinds::DocumentKind;
use crate::writer::DeltaWriter;

const CREATE_SYSTEM: &str = "Generate a single self-contained SVG document for the given \
     description. Output only the SVG markup: no prose, no markdown fences. \
     The root element must be <svg> with a viewBox.";

const UPDATE_SYSTEM: &str = "Revise the following SVG document per the given prompt. Output only \
     the complete revised SVG markup: no prose, no markdown fences.";

/// Streams SVG source from the configured LLM provider, stripping any
/// markdown fences the model adds despite instructions.
pub struct SvgHandler {
    provider: Arc<dyn Provider>,
}

impl SvgHandler {
    /// New handler backed by `provider`.
    #[must_use]
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl DocumentHandler for SvgHandler {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Svg
    }

    #[instrument(skip_all, fields(kind = "svg", title))]
    async fn on_create(&self, title: &str, writer: &DeltaWriter) -> Result<String> {
        let request = ChatRequest::from_prompt(title).with_system(CREATE_SYSTEM);
        drive_code(self.provider.as_ref(), &request, DocumentKind::Svg, writer).await
    }

    #[instrument(skip_all, fields(kind = "svg", title))]
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
        drive_code(self.provider.as_ref(), &request, DocumentKind::Svg, writer).await
    }
}

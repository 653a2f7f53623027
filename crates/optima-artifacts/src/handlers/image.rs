//! Image document handler.
//!
//! Image generation is a single-shot call, not a token stream: the handler
//! emits exactly one `content_delta` carrying the whole base64 payload,
//! and the caller follows with `finish`.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use optima_llm::ImageGenerator;

use crate::errors::Result;
use crate::handler::DocumentHandler;
use crate::kinds::DocumentKind;
use crate::writer::DeltaWriter;

/// Generates a raster image from the title (or update description).
pub struct ImageHandler {
    generator: Arc<ImageGenerator>,
}

impl ImageHandler {
    /// New handler backed by `generator`.
    #[must_use]
    pub fn new(generator: Arc<ImageGenerator>) -> Self {
        Self { generator }
    }

    async fn generate(&self, prompt: &str, writer: &DeltaWriter) -> Result<String> {
        let image = self.generator.generate(prompt).await?;
        writer
            .content_delta(DocumentKind::Image, image.b64_data.clone())
            .await;
        Ok(image.b64_data)
    }
}

#[async_trait]
impl DocumentHandler for ImageHandler {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Image
    }

    #[instrument(skip_all, fields(kind = "image", title))]
    async fn on_create(&self, title: &str, writer: &DeltaWriter) -> Result<String> {
        self.generate(title, writer).await
    }

    /// Updates regenerate from scratch; raster output cannot be revised
    /// incrementally, so the description replaces the original prompt.
    #[instrument(skip_all, fields(kind = "image", title))]
    async fn on_update(
        &self,
        title: &str,
        _current_content: &str,
        description: &str,
        writer: &DeltaWriter,
    ) -> Result<String> {
        let prompt = if description.is_empty() { title } else { description };
        self.generate(prompt, writer).await
    }
}

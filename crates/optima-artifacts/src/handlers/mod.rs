//! Built-in document handlers.

pub mod diagram;
pub mod image;
pub mod svg;
pub mod text;

pub use diagram::DiagramHandler;
pub use image::ImageHandler;
pub use svg::SvgHandler;
pub use text::TextHandler;

use futures::StreamExt;

use optima_core::events::DeltaEvent;
use optima_llm::{ChatRequest, Provider, ProviderError};

use crate::errors::Result;
use crate::fences::FenceFilter;
use crate::kinds::DocumentKind;
use crate::writer::DeltaWriter;

/// Drive a provider stream as prose: forward text deltas and return the
/// accumulated content.
pub(crate) async fn drive_text(
    provider: &dyn Provider,
    request: &ChatRequest,
    writer: &DeltaWriter,
) -> Result<String> {
    let mut stream = provider.stream(request).await?;
    let mut acc = String::new();
    while let Some(event) = stream.next().await {
        match event {
            DeltaEvent::TextDelta { delta } => {
                acc.push_str(&delta);
                writer.text_delta(delta).await;
            }
            DeltaEvent::Error { error } => {
                return Err(ProviderError::Stream { message: error }.into());
            }
            _ => {}
        }
    }
    Ok(acc)
}

/// Drive a provider stream as code: strip surrounding markdown fences
/// incrementally, forward the sanitized fragments as content deltas, and
/// return the accumulated sanitized content.
pub(crate) async fn drive_code(
    provider: &dyn Provider,
    request: &ChatRequest,
    kind: DocumentKind,
    writer: &DeltaWriter,
) -> Result<String> {
    let mut stream = provider.stream(request).await?;
    let mut filter = FenceFilter::new();
    let mut acc = String::new();
    while let Some(event) = stream.next().await {
        match event {
            DeltaEvent::TextDelta { delta } => {
                if let Some(clean) = filter.push(&delta) {
                    acc.push_str(&clean);
                    writer.content_delta(kind, clean).await;
                }
            }
            DeltaEvent::Error { error } => {
                return Err(ProviderError::Stream { message: error }.into());
            }
            _ => {}
        }
    }
    if let Some(clean) = filter.finish() {
        acc.push_str(&clean);
        writer.content_delta(kind, clean).await;
    }
    Ok(acc)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod test_support {
    use async_trait::async_trait;
    use optima_core::events::DeltaEvent;
    use optima_core::messages::ProviderType;
    use optima_llm::{ChatRequest, DeltaEventStream, Provider, ProviderResult};
    use std::sync::Mutex;

    /// Provider emitting a scripted event sequence and recording requests.
    pub struct ScriptedProvider {
        pub events: Vec<DeltaEvent>,
        pub requests: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedProvider {
        pub fn text_stream(fragments: &[&str]) -> Self {
            let mut events = vec![DeltaEvent::Start];
            let mut full = String::new();
            for f in fragments {
                full.push_str(f);
                events.push(DeltaEvent::TextDelta {
                    delta: (*f).to_owned(),
                });
            }
            events.push(DeltaEvent::finish(full));
            Self {
                events,
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                events: vec![
                    DeltaEvent::Start,
                    DeltaEvent::Error {
                        error: message.to_owned(),
                    },
                ],
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Provider for ScriptedProvider {
        fn provider_type(&self) -> ProviderType {
            ProviderType::OpenAI
        }

        fn model(&self) -> &str {
            "scripted"
        }

        async fn stream(&self, request: &ChatRequest) -> ProviderResult<DeltaEventStream> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(Box::pin(futures::stream::iter(self.events.clone())))
        }
    }
}

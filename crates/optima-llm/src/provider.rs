//! The [`Provider`] trait and its error surface.

use std::pin::Pin;

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use thiserror::Error;

use optima_core::events::DeltaEvent;
use optima_core::messages::{ChatMessage, ProviderType};

/// Result alias for provider operations.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// A boxed stream of delta events from a provider.
pub type DeltaEventStream = Pin<Box<dyn Stream<Item = DeltaEvent> + Send>>;

/// A chat generation request, provider-agnostic.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChatRequest {
    /// Conversation history, oldest first.
    pub messages: Vec<ChatMessage>,
    /// System prompt, when separate from the history.
    pub system: Option<String>,
    /// Output token cap.
    pub max_tokens: Option<u32>,
    /// Sampling temperature.
    pub temperature: Option<f32>,
}

impl ChatRequest {
    /// A request with a single user message.
    #[must_use]
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::user(prompt)],
            ..Self::default()
        }
    }

    /// Set the system prompt.
    #[must_use]
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// Errors from provider calls.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport-level failure.
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request/response (de)serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Credentials missing or rejected before the call was made.
    #[error("authentication error: {message}")]
    Auth {
        /// Human-readable description.
        message: String,
    },

    /// Non-2xx API response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Vendor error message.
        message: String,
        /// Vendor error code, when present.
        code: Option<String>,
        /// Whether a retry could plausibly succeed.
        retryable: bool,
    },

    /// 429 with an optional `retry-after` hint.
    #[error("rate limited: {message}")]
    RateLimited {
        /// Suggested wait before retrying (0 when the vendor gave none).
        retry_after_ms: u64,
        /// Vendor error message.
        message: String,
    },

    /// The stream reported an error mid-generation.
    #[error("stream error: {message}")]
    Stream {
        /// Error carried by the stream.
        message: String,
    },

    /// Requested provider name is not recognized.
    #[error("unknown provider: {name}")]
    UnknownProvider {
        /// The name from the request or config.
        name: String,
    },

    /// Provider is known but has no credentials configured.
    #[error("provider not configured: {message}")]
    NotConfigured {
        /// Which provider and what is missing.
        message: String,
    },
}

/// A streaming language-model provider.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Which vendor this provider talks to.
    fn provider_type(&self) -> ProviderType;

    /// The model this provider is configured for.
    fn model(&self) -> &str;

    /// Start a streaming generation.
    ///
    /// The returned stream yields [`DeltaEvent::Start`] first and terminates
    /// with exactly one `Finish` or `Error`.
    async fn stream(&self, request: &ChatRequest) -> ProviderResult<DeltaEventStream>;

    /// Run a generation to completion and return the final content.
    ///
    /// Default implementation drives [`Provider::stream`] and returns the
    /// `Finish` content (or the accumulated fragments if the stream ended
    /// without a terminal event).
    async fn complete(&self, request: &ChatRequest) -> ProviderResult<String> {
        let mut stream = self.stream(request).await?;
        let mut acc = String::new();
        while let Some(event) = stream.next().await {
            match event {
                DeltaEvent::Finish { content, .. } => return Ok(content),
                DeltaEvent::Error { error } => {
                    return Err(ProviderError::Stream { message: error });
                }
                other => {
                    if let Some(fragment) = other.fragment() {
                        acc.push_str(fragment);
                    }
                }
            }
        }
        Ok(acc)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    /// Provider emitting a scripted event sequence.
    struct ScriptedProvider(Vec<DeltaEvent>);

    #[async_trait]
    impl Provider for ScriptedProvider {
        fn provider_type(&self) -> ProviderType {
            ProviderType::OpenAI
        }

        fn model(&self) -> &str {
            "scripted"
        }

        async fn stream(&self, _request: &ChatRequest) -> ProviderResult<DeltaEventStream> {
            Ok(Box::pin(futures::stream::iter(self.0.clone())))
        }
    }

    #[tokio::test]
    async fn complete_returns_finish_content() {
        let provider = ScriptedProvider(vec![
            DeltaEvent::Start,
            DeltaEvent::TextDelta { delta: "he".into() },
            DeltaEvent::TextDelta { delta: "llo".into() },
            DeltaEvent::finish("hello"),
        ]);
        let out = provider.complete(&ChatRequest::from_prompt("hi")).await.unwrap();
        assert_eq!(out, "hello");
    }

    #[tokio::test]
    async fn complete_surfaces_stream_error() {
        let provider = ScriptedProvider(vec![
            DeltaEvent::Start,
            DeltaEvent::Error {
                error: "boom".into(),
            },
        ]);
        let err = provider
            .complete(&ChatRequest::from_prompt("hi"))
            .await
            .unwrap_err();
        assert_matches!(err, ProviderError::Stream { message } if message == "boom");
    }

    #[tokio::test]
    async fn complete_falls_back_to_accumulated_fragments() {
        // Stream ended without a terminal event (connection cut).
        let provider = ScriptedProvider(vec![
            DeltaEvent::Start,
            DeltaEvent::TextDelta { delta: "par".into() },
            DeltaEvent::TextDelta {
                delta: "tial".into(),
            },
        ]);
        let out = provider.complete(&ChatRequest::from_prompt("hi")).await.unwrap();
        assert_eq!(out, "partial");
    }

    #[test]
    fn chat_request_builders() {
        let req = ChatRequest::from_prompt("write a poem").with_system("be terse");
        assert_eq!(req.messages.len(), 1);
        assert_eq!(req.system.as_deref(), Some("be terse"));
    }
}

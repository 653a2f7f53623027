//! [`Provider`] implementation for the OpenAI chat-completions API.
//!
//! POSTs `/v1/chat/completions` with `stream: true` and re-emits the SSE
//! chunks as delta events. The `[DONE]` marker ends the stream; the final
//! chunk before it carries the finish reason, and a trailing usage chunk
//! carries token counts (requested via `stream_options.include_usage`).

use async_trait::async_trait;
use futures::StreamExt;
use metrics::counter;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::{debug, error, instrument};

use optima_core::events::{DeltaEvent, TokenUsage};
use optima_core::messages::{ChatRole, ProviderType};

use crate::provider::{ChatRequest, DeltaEventStream, Provider, ProviderError, ProviderResult};
use crate::sse::{parse_sse_data, sse_data_stream};
use crate::{PROVIDER_ERRORS_TOTAL, PROVIDER_REQUESTS_TOTAL, stop_reason};

use super::types::{
    DEFAULT_BASE_URL, DEFAULT_MAX_OUTPUT_TOKENS, OpenAIConfig, OpenAIMessage, OpenAIRequest,
    OpenAIStreamChunk, StreamOptions,
};

/// OpenAI LLM provider.
pub struct OpenAIProvider {
    config: OpenAIConfig,
    client: reqwest::Client,
}

impl OpenAIProvider {
    /// Create a new provider.
    #[must_use]
    pub fn new(config: OpenAIConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Create a new provider with a shared HTTP client.
    #[must_use]
    pub fn with_client(config: OpenAIConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn build_headers(&self) -> ProviderResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        let _ = headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let auth_value = format!("Bearer {}", self.config.api_key);
        let _ = headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth_value).map_err(|e| ProviderError::Auth {
                message: format!("invalid API key header: {e}"),
            })?,
        );
        Ok(headers)
    }

    fn build_request(&self, request: &ChatRequest) -> OpenAIRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = &request.system {
            messages.push(OpenAIMessage {
                role: "system",
                content: system.clone(),
            });
        }
        messages.extend(request.messages.iter().map(|m| OpenAIMessage {
            role: match m.role {
                ChatRole::System => "system",
                ChatRole::User => "user",
                ChatRole::Assistant => "assistant",
            },
            content: m.content.clone(),
        }));

        OpenAIRequest {
            model: self.config.model.clone(),
            messages,
            stream: true,
            max_tokens: request.max_tokens.unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS),
            temperature: request.temperature,
            stream_options: StreamOptions {
                include_usage: true,
            },
        }
    }

    #[instrument(skip_all, fields(model = %self.config.model))]
    async fn stream_internal(&self, request: &ChatRequest) -> ProviderResult<DeltaEventStream> {
        counter!(PROVIDER_REQUESTS_TOTAL, "provider" => "openai").increment(1);

        let body = self.build_request(request);
        let base_url = self.config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let url = format!("{base_url}/v1/chat/completions");

        debug!(
            model = %body.model,
            max_tokens = body.max_tokens,
            message_count = body.messages.len(),
            "sending OpenAI request"
        );

        let response = self
            .client
            .post(&url)
            .headers(self.build_headers()?)
            .json(&body)
            .send()
            .await
            .map_err(ProviderError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(optima_core::retry::parse_retry_after_header);
            let body_text = response.text().await.unwrap_or_default();
            let err_info = crate::error_parsing::parse_api_error(&body_text, status.as_u16());
            counter!(
                PROVIDER_ERRORS_TOTAL,
                "provider" => "openai",
                "status" => status.as_u16().to_string()
            )
            .increment(1);
            error!(
                status = status.as_u16(),
                code = err_info.code.as_deref().unwrap_or("unknown"),
                retryable = err_info.retryable,
                "OpenAI API error"
            );
            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited {
                    retry_after_ms: retry_after.unwrap_or(0),
                    message: err_info.message,
                });
            }
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: err_info.message,
                code: err_info.code,
                retryable: err_info.retryable,
            });
        }

        let mut data = Box::pin(sse_data_stream(response));
        Ok(Box::pin(async_stream::stream! {
            yield DeltaEvent::Start;

            let mut acc = String::new();
            let mut finish_reason: Option<String> = None;
            let mut usage: Option<TokenUsage> = None;

            while let Some(payload) = data.next().await {
                let Some(chunk) = parse_sse_data::<OpenAIStreamChunk>(&payload, "openai") else {
                    continue;
                };
                if let Some(u) = chunk.usage {
                    usage = Some(TokenUsage {
                        input_tokens: u.prompt_tokens,
                        output_tokens: u.completion_tokens,
                    });
                }
                for choice in chunk.choices {
                    if let Some(reason) = choice.finish_reason {
                        finish_reason = Some(reason);
                    }
                    if let Some(content) = choice.delta.content {
                        if !content.is_empty() {
                            acc.push_str(&content);
                            yield DeltaEvent::TextDelta { delta: content };
                        }
                    }
                }
            }

            yield DeltaEvent::Finish {
                content: acc,
                stop_reason: Some(stop_reason::from_openai(finish_reason.as_deref()).to_owned()),
                token_usage: usage,
            };
        }))
    }
}

#[async_trait]
impl Provider for OpenAIProvider {
    fn provider_type(&self) -> ProviderType {
        ProviderType::OpenAI
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    #[instrument(skip_all, fields(provider = "openai", model = %self.config.model))]
    async fn stream(&self, request: &ChatRequest) -> ProviderResult<DeltaEventStream> {
        self.stream_internal(request).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> OpenAIConfig {
        OpenAIConfig {
            api_key: "sk-test".into(),
            base_url: Some(server.uri()),
            model: "gpt-4o".into(),
        }
    }

    async fn mount_sse(server: &MockServer, body: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(body.to_owned(), "text/event-stream"),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn streams_text_deltas_and_finishes() {
        let server = MockServer::start().await;
        mount_sse(
            &server,
            concat!(
                "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"},\"finish_reason\":null}]}\n\n",
                "data: {\"choices\":[{\"delta\":{\"content\":\"lo\"},\"finish_reason\":null}]}\n\n",
                "data: {\"choices\":[{\"delta\":{},\"finish_reason\":\"stop\"}]}\n\n",
                "data: {\"choices\":[],\"usage\":{\"prompt_tokens\":5,\"completion_tokens\":2}}\n\n",
                "data: [DONE]\n\n",
            ),
        )
        .await;

        let provider = OpenAIProvider::new(config_for(&server));
        let events: Vec<DeltaEvent> = provider
            .stream(&ChatRequest::from_prompt("hi"))
            .await
            .unwrap()
            .collect()
            .await;

        assert_eq!(events[0], DeltaEvent::Start);
        assert_eq!(
            events[1],
            DeltaEvent::TextDelta { delta: "Hel".into() }
        );
        assert_matches!(
            events.last().unwrap(),
            DeltaEvent::Finish { content, stop_reason, token_usage }
                if content == "Hello"
                    && stop_reason.as_deref() == Some("end_turn")
                    && token_usage == &Some(TokenUsage { input_tokens: 5, output_tokens: 2 })
        );
    }

    #[tokio::test]
    async fn length_finish_maps_to_max_tokens() {
        let server = MockServer::start().await;
        mount_sse(
            &server,
            concat!(
                "data: {\"choices\":[{\"delta\":{\"content\":\"x\"},\"finish_reason\":\"length\"}]}\n\n",
                "data: [DONE]\n\n",
            ),
        )
        .await;

        let provider = OpenAIProvider::new(config_for(&server));
        let events: Vec<DeltaEvent> = provider
            .stream(&ChatRequest::from_prompt("hi"))
            .await
            .unwrap()
            .collect()
            .await;

        assert_matches!(
            events.last().unwrap(),
            DeltaEvent::Finish { stop_reason, .. } if stop_reason.as_deref() == Some("max_tokens")
        );
    }

    #[tokio::test]
    async fn api_error_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string(
                r#"{"error": {"message": "Invalid API key", "code": "invalid_api_key"}}"#,
            ))
            .mount(&server)
            .await;

        let provider = OpenAIProvider::new(config_for(&server));
        let err = provider
            .stream(&ChatRequest::from_prompt("hi"))
            .await
            .err().unwrap();
        assert_matches!(
            err,
            ProviderError::Api { status: 401, retryable: false, .. }
        );
    }

    #[tokio::test]
    async fn rate_limit_carries_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(429)
                    .insert_header("retry-after", "7")
                    .set_body_string(r#"{"error": {"message": "slow down"}}"#),
            )
            .mount(&server)
            .await;

        let provider = OpenAIProvider::new(config_for(&server));
        let err = provider
            .stream(&ChatRequest::from_prompt("hi"))
            .await
            .err().unwrap();
        assert_matches!(err, ProviderError::RateLimited { retry_after_ms: 7000, .. });
    }

    #[tokio::test]
    async fn malformed_chunks_are_skipped() {
        let server = MockServer::start().await;
        mount_sse(
            &server,
            concat!(
                "data: this is not json\n\n",
                "data: {\"choices\":[{\"delta\":{\"content\":\"ok\"},\"finish_reason\":\"stop\"}]}\n\n",
                "data: [DONE]\n\n",
            ),
        )
        .await;

        let provider = OpenAIProvider::new(config_for(&server));
        let events: Vec<DeltaEvent> = provider
            .stream(&ChatRequest::from_prompt("hi"))
            .await
            .unwrap()
            .collect()
            .await;

        assert_matches!(
            events.last().unwrap(),
            DeltaEvent::Finish { content, .. } if content == "ok"
        );
    }

    #[tokio::test]
    async fn system_prompt_is_prepended() {
        let server = MockServer::start().await;
        mount_sse(&server, "data: [DONE]\n\n").await;

        let provider = OpenAIProvider::new(config_for(&server));
        let request = ChatRequest::from_prompt("hi").with_system("be terse");
        let _ = provider.stream(&request).await.unwrap().collect::<Vec<_>>().await;

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = requests[0].body_json().unwrap();
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "be terse");
        assert_eq!(body["messages"][1]["role"], "user");
    }
}

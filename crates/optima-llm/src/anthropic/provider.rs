//! [`Provider`] implementation for the Anthropic messages API.
//!
//! POSTs `/v1/messages` with `stream: true` and translates the typed SSE
//! events into delta events. Input tokens arrive on `message_start`,
//! output tokens and the stop reason on `message_delta`, and
//! `message_stop` ends the stream.

use async_trait::async_trait;
use futures::StreamExt;
use metrics::counter;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::{debug, error, instrument};

use optima_core::events::{DeltaEvent, TokenUsage};
use optima_core::messages::{ChatRole, ProviderType};

use crate::provider::{ChatRequest, DeltaEventStream, Provider, ProviderError, ProviderResult};
use crate::sse::{parse_sse_data, sse_data_stream};
use crate::{PROVIDER_ERRORS_TOTAL, PROVIDER_REQUESTS_TOTAL, stop_reason};

use super::types::{
    API_VERSION, AnthropicConfig, AnthropicMessage, AnthropicRequest, AnthropicSseEvent,
    DEFAULT_BASE_URL, DEFAULT_MAX_OUTPUT_TOKENS,
};

/// Anthropic LLM provider.
pub struct AnthropicProvider {
    config: AnthropicConfig,
    client: reqwest::Client,
}

impl AnthropicProvider {
    /// Create a new provider.
    #[must_use]
    pub fn new(config: AnthropicConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Create a new provider with a shared HTTP client.
    #[must_use]
    pub fn with_client(config: AnthropicConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn build_headers(&self) -> ProviderResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        let _ = headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let _ = headers.insert("anthropic-version", HeaderValue::from_static(API_VERSION));
        let _ = headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.config.api_key).map_err(|e| ProviderError::Auth {
                message: format!("invalid API key header: {e}"),
            })?,
        );
        Ok(headers)
    }

    /// Build the request body. System turns in the history are folded into
    /// the `system` parameter since the messages array only accepts user
    /// and assistant roles.
    fn build_request(&self, request: &ChatRequest) -> AnthropicRequest {
        let mut system_parts: Vec<String> = Vec::new();
        if let Some(system) = &request.system {
            system_parts.push(system.clone());
        }

        let mut messages = Vec::with_capacity(request.messages.len());
        for m in &request.messages {
            match m.role {
                ChatRole::System => system_parts.push(m.content.clone()),
                ChatRole::User => messages.push(AnthropicMessage {
                    role: "user",
                    content: m.content.clone(),
                }),
                ChatRole::Assistant => messages.push(AnthropicMessage {
                    role: "assistant",
                    content: m.content.clone(),
                }),
            }
        }

        AnthropicRequest {
            model: self.config.model.clone(),
            max_tokens: request.max_tokens.unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS),
            messages,
            system: (!system_parts.is_empty()).then(|| system_parts.join("\n\n")),
            stream: true,
            temperature: request.temperature,
        }
    }

    #[instrument(skip_all, fields(model = %self.config.model))]
    async fn stream_internal(&self, request: &ChatRequest) -> ProviderResult<DeltaEventStream> {
        counter!(PROVIDER_REQUESTS_TOTAL, "provider" => "anthropic").increment(1);

        let body = self.build_request(request);
        let base_url = self.config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let url = format!("{base_url}/v1/messages");

        debug!(
            model = %body.model,
            max_tokens = body.max_tokens,
            message_count = body.messages.len(),
            "sending Anthropic request"
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
                "provider" => "anthropic",
                "status" => status.as_u16().to_string()
            )
            .increment(1);
            error!(
                status = status.as_u16(),
                code = err_info.code.as_deref().unwrap_or("unknown"),
                retryable = err_info.retryable,
                "Anthropic API error"
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
            let mut input_tokens: Option<u64> = None;
            let mut output_tokens: Option<u64> = None;
            let mut vendor_stop: Option<String> = None;

            while let Some(payload) = data.next().await {
                let Some(event) = parse_sse_data::<AnthropicSseEvent>(&payload, "anthropic")
                else {
                    continue;
                };
                match event {
                    AnthropicSseEvent::MessageStart { message } => {
                        input_tokens = message.usage.and_then(|u| u.input_tokens);
                    }
                    AnthropicSseEvent::ContentBlockDelta { delta } => {
                        if let Some(text) = delta.text {
                            if !text.is_empty() {
                                acc.push_str(&text);
                                yield DeltaEvent::TextDelta { delta: text };
                            }
                        }
                    }
                    AnthropicSseEvent::MessageDelta { delta, usage } => {
                        if delta.stop_reason.is_some() {
                            vendor_stop = delta.stop_reason;
                        }
                        if let Some(out) = usage.and_then(|u| u.output_tokens) {
                            output_tokens = Some(out);
                        }
                    }
                    AnthropicSseEvent::Error { error } => {
                        yield DeltaEvent::Error {
                            error: error.message,
                        };
                        return;
                    }
                    AnthropicSseEvent::MessageStop => break,
                    AnthropicSseEvent::ContentBlockStart
                    | AnthropicSseEvent::ContentBlockStop
                    | AnthropicSseEvent::Ping
                    | AnthropicSseEvent::Unknown => {}
                }
            }

            let token_usage = match (input_tokens, output_tokens) {
                (None, None) => None,
                (i, o) => Some(TokenUsage {
                    input_tokens: i.unwrap_or(0),
                    output_tokens: o.unwrap_or(0),
                }),
            };
            yield DeltaEvent::Finish {
                content: acc,
                stop_reason: Some(
                    stop_reason::from_anthropic(vendor_stop.as_deref()).to_owned(),
                ),
                token_usage,
            };
        }))
    }
}

#[async_trait]
impl Provider for AnthropicProvider {
    fn provider_type(&self) -> ProviderType {
        ProviderType::Anthropic
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    #[instrument(skip_all, fields(provider = "anthropic", model = %self.config.model))]
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
    use optima_core::messages::ChatMessage;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> AnthropicConfig {
        AnthropicConfig {
            api_key: "ant-test".into(),
            base_url: Some(server.uri()),
            model: "claude-sonnet-4-5".into(),
        }
    }

    async fn mount_sse(server: &MockServer, body: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "ant-test"))
            .and(header("anthropic-version", API_VERSION))
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
                "data: {\"type\":\"message_start\",\"message\":{\"usage\":{\"input_tokens\":9}}}\n\n",
                "data: {\"type\":\"content_block_start\",\"index\":0}\n\n",
                "data: {\"type\":\"content_block_delta\",\"delta\":{\"type\":\"text_delta\",\"text\":\"Hel\"}}\n\n",
                "data: {\"type\":\"content_block_delta\",\"delta\":{\"type\":\"text_delta\",\"text\":\"lo\"}}\n\n",
                "data: {\"type\":\"content_block_stop\",\"index\":0}\n\n",
                "data: {\"type\":\"message_delta\",\"delta\":{\"stop_reason\":\"end_turn\"},\"usage\":{\"output_tokens\":3}}\n\n",
                "data: {\"type\":\"message_stop\"}\n\n",
            ),
        )
        .await;

        let provider = AnthropicProvider::new(config_for(&server));
        let events: Vec<DeltaEvent> = provider
            .stream(&ChatRequest::from_prompt("hi"))
            .await
            .unwrap()
            .collect()
            .await;

        assert_eq!(events[0], DeltaEvent::Start);
        assert_matches!(
            events.last().unwrap(),
            DeltaEvent::Finish { content, stop_reason, token_usage }
                if content == "Hello"
                    && stop_reason.as_deref() == Some("end_turn")
                    && token_usage == &Some(TokenUsage { input_tokens: 9, output_tokens: 3 })
        );
    }

    #[tokio::test]
    async fn max_tokens_stop_reason_is_normalized() {
        let server = MockServer::start().await;
        mount_sse(
            &server,
            concat!(
                "data: {\"type\":\"content_block_delta\",\"delta\":{\"type\":\"text_delta\",\"text\":\"x\"}}\n\n",
                "data: {\"type\":\"message_delta\",\"delta\":{\"stop_reason\":\"max_tokens\"}}\n\n",
                "data: {\"type\":\"message_stop\"}\n\n",
            ),
        )
        .await;

        let provider = AnthropicProvider::new(config_for(&server));
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
    async fn mid_stream_error_terminates_with_error_event() {
        let server = MockServer::start().await;
        mount_sse(
            &server,
            concat!(
                "data: {\"type\":\"content_block_delta\",\"delta\":{\"type\":\"text_delta\",\"text\":\"par\"}}\n\n",
                "data: {\"type\":\"error\",\"error\":{\"type\":\"overloaded_error\",\"message\":\"Overloaded\"}}\n\n",
            ),
        )
        .await;

        let provider = AnthropicProvider::new(config_for(&server));
        let events: Vec<DeltaEvent> = provider
            .stream(&ChatRequest::from_prompt("hi"))
            .await
            .unwrap()
            .collect()
            .await;

        assert_eq!(
            events.last().unwrap(),
            &DeltaEvent::Error {
                error: "Overloaded".into()
            }
        );
        // Exactly one terminal event
        assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
    }

    #[tokio::test]
    async fn api_error_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(529).set_body_string(
                r#"{"error": {"type": "overloaded_error", "message": "Overloaded"}}"#,
            ))
            .mount(&server)
            .await;

        let provider = AnthropicProvider::new(config_for(&server));
        let err = provider
            .stream(&ChatRequest::from_prompt("hi"))
            .await
            .err().unwrap();
        assert_matches!(
            err,
            ProviderError::Api { status: 529, retryable: true, .. }
        );
    }

    #[tokio::test]
    async fn system_turns_fold_into_system_param() {
        let server = MockServer::start().await;
        mount_sse(&server, "data: {\"type\":\"message_stop\"}\n\n").await;

        let provider = AnthropicProvider::new(config_for(&server));
        let request = ChatRequest {
            messages: vec![ChatMessage::system("be terse"), ChatMessage::user("hi")],
            system: None,
            max_tokens: None,
            temperature: None,
        };
        let _ = provider.stream(&request).await.unwrap().collect::<Vec<_>>().await;

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = requests[0].body_json().unwrap();
        assert_eq!(body["system"], "be terse");
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "user");
    }
}

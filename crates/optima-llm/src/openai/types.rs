//! OpenAI config and wire types.

use serde::{Deserialize, Serialize};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Default output token cap when neither request nor config sets one.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 4096;

/// OpenAI provider configuration.
#[derive(Clone, Debug)]
pub struct OpenAIConfig {
    /// API key (Bearer auth).
    pub api_key: String,
    /// Override for the API base URL.
    pub base_url: Option<String>,
    /// Model identifier, e.g. `gpt-4o`.
    pub model: String,
}

/// Chat-completions request body.
#[derive(Debug, Serialize)]
pub struct OpenAIRequest {
    /// Model identifier.
    pub model: String,
    /// Conversation, oldest first.
    pub messages: Vec<OpenAIMessage>,
    /// Always `true` here.
    pub stream: bool,
    /// Output token cap.
    pub max_tokens: u32,
    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Ask for a final usage chunk.
    pub stream_options: StreamOptions,
}

/// Stream options for the request.
#[derive(Debug, Serialize)]
pub struct StreamOptions {
    /// Emit a usage chunk at the end of the stream.
    pub include_usage: bool,
}

/// One message in the request.
#[derive(Debug, Serialize)]
pub struct OpenAIMessage {
    /// `system`, `user` or `assistant`.
    pub role: &'static str,
    /// Message text.
    pub content: String,
}

/// One SSE chunk of a streaming response.
#[derive(Debug, Deserialize)]
pub struct OpenAIStreamChunk {
    /// Choices (a single choice in practice).
    #[serde(default)]
    pub choices: Vec<OpenAIStreamChoice>,
    /// Usage, present only on the final chunk.
    #[serde(default)]
    pub usage: Option<OpenAIUsage>,
}

/// One choice within a stream chunk.
#[derive(Debug, Deserialize)]
pub struct OpenAIStreamChoice {
    /// Incremental delta.
    #[serde(default)]
    pub delta: OpenAIDelta,
    /// Finish reason, set on the last content chunk.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Incremental message delta.
#[derive(Debug, Default, Deserialize)]
pub struct OpenAIDelta {
    /// Text fragment.
    #[serde(default)]
    pub content: Option<String>,
}

/// Token usage reported by the final chunk.
#[derive(Debug, Deserialize)]
pub struct OpenAIUsage {
    /// Prompt tokens.
    #[serde(default)]
    pub prompt_tokens: u64,
    /// Completion tokens.
    #[serde(default)]
    pub completion_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_with_content_delta() {
        let chunk: OpenAIStreamChunk = serde_json::from_str(
            r#"{"choices":[{"delta":{"content":"hi"},"finish_reason":null}]}"#,
        )
        .unwrap();
        assert_eq!(chunk.choices[0].delta.content.as_deref(), Some("hi"));
        assert!(chunk.choices[0].finish_reason.is_none());
    }

    #[test]
    fn chunk_with_finish_reason() {
        let chunk: OpenAIStreamChunk =
            serde_json::from_str(r#"{"choices":[{"delta":{},"finish_reason":"stop"}]}"#).unwrap();
        assert_eq!(chunk.choices[0].finish_reason.as_deref(), Some("stop"));
    }

    #[test]
    fn usage_only_chunk() {
        let chunk: OpenAIStreamChunk = serde_json::from_str(
            r#"{"choices":[],"usage":{"prompt_tokens":12,"completion_tokens":34}}"#,
        )
        .unwrap();
        let usage = chunk.usage.unwrap();
        assert_eq!(usage.prompt_tokens, 12);
        assert_eq!(usage.completion_tokens, 34);
    }

    #[test]
    fn request_serializes_expected_shape() {
        let req = OpenAIRequest {
            model: "gpt-4o".into(),
            messages: vec![OpenAIMessage {
                role: "user",
                content: "hi".into(),
            }],
            stream: true,
            max_tokens: 100,
            temperature: None,
            stream_options: StreamOptions {
                include_usage: true,
            },
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["stream"], true);
        assert_eq!(json["stream_options"]["include_usage"], true);
        assert!(json.get("temperature").is_none());
    }
}

//! Anthropic config and wire types.

use serde::{Deserialize, Serialize};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// API version header value.
pub const API_VERSION: &str = "2023-06-01";

/// Default output token cap (`max_tokens` is required by this API).
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 4096;

/// Anthropic provider configuration.
#[derive(Clone, Debug)]
pub struct AnthropicConfig {
    /// API key (`x-api-key` auth).
    pub api_key: String,
    /// Override for the API base URL.
    pub base_url: Option<String>,
    /// Model identifier, e.g. `claude-sonnet-4-5`.
    pub model: String,
}

/// Messages-API request body.
#[derive(Debug, Serialize)]
pub struct AnthropicRequest {
    /// Model identifier.
    pub model: String,
    /// Output token cap (required).
    pub max_tokens: u32,
    /// Conversation, oldest first. System turns go in `system` instead.
    pub messages: Vec<AnthropicMessage>,
    /// System prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// Always `true` here.
    pub stream: bool,
    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// One message in the request.
#[derive(Debug, Serialize)]
pub struct AnthropicMessage {
    /// `user` or `assistant`.
    pub role: &'static str,
    /// Message text.
    pub content: String,
}

/// SSE events on an Anthropic message stream.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnthropicSseEvent {
    /// Stream opened; carries prompt-side usage.
    MessageStart {
        /// Envelope with initial usage.
        message: MessageStartEnvelope,
    },
    /// A content block opened.
    ContentBlockStart,
    /// Incremental content.
    ContentBlockDelta {
        /// The delta payload.
        delta: ContentDelta,
    },
    /// A content block closed.
    ContentBlockStop,
    /// Top-level message metadata update; carries the stop reason and
    /// output-side usage.
    MessageDelta {
        /// Metadata delta.
        delta: MessageDeltaInfo,
        /// Cumulative usage.
        #[serde(default)]
        usage: Option<AnthropicUsage>,
    },
    /// Stream closed cleanly.
    MessageStop,
    /// Keepalive.
    Ping,
    /// Mid-stream error.
    Error {
        /// Error body.
        error: AnthropicErrorBody,
    },
    /// Forward-compatible catch-all.
    #[serde(other)]
    Unknown,
}

/// `message_start` envelope.
#[derive(Debug, Deserialize)]
pub struct MessageStartEnvelope {
    /// Usage at stream start (input tokens).
    #[serde(default)]
    pub usage: Option<AnthropicUsage>,
}

/// `content_block_delta` payload. Only text deltas are consumed.
#[derive(Debug, Deserialize)]
pub struct ContentDelta {
    /// Text fragment for `text_delta` payloads.
    #[serde(default)]
    pub text: Option<String>,
}

/// `message_delta` metadata.
#[derive(Debug, Deserialize)]
pub struct MessageDeltaInfo {
    /// Vendor stop reason.
    #[serde(default)]
    pub stop_reason: Option<String>,
}

/// Usage fields (both sides optional; the API reports them at different
/// points in the stream).
#[derive(Debug, Deserialize)]
pub struct AnthropicUsage {
    /// Prompt tokens.
    #[serde(default)]
    pub input_tokens: Option<u64>,
    /// Completion tokens.
    #[serde(default)]
    pub output_tokens: Option<u64>,
}

/// Mid-stream error body.
#[derive(Debug, Deserialize)]
pub struct AnthropicErrorBody {
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
}

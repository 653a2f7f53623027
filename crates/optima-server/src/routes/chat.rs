//! Chat streaming.

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use serde::Deserialize;
use tracing::instrument;

use optima_core::messages::ChatMessage;
use optima_llm::provider::ChatRequest;

use crate::errors::ApiError;
use crate::sse::sse_from_stream;
use crate::state::AppState;

/// Body of `POST /api/chat`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatBody {
    /// Full conversation history, oldest first.
    pub messages: Vec<ChatMessage>,
    /// Provider override (`openai` | `anthropic`).
    #[serde(default)]
    pub provider: Option<String>,
    /// Model override.
    #[serde(default)]
    pub model: Option<String>,
    /// System prompt.
    #[serde(default)]
    pub system: Option<String>,
    /// Output token cap.
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Sampling temperature.
    #[serde(default)]
    pub temperature: Option<f32>,
}

/// `POST /api/chat`: stream delta events for a conversation.
#[instrument(skip_all, fields(messages = body.messages.len()))]
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatBody>,
) -> Result<impl IntoResponse, ApiError> {
    if body.messages.is_empty() {
        return Err(ApiError::InvalidParams("messages must not be empty".into()));
    }

    let provider = state
        .registry
        .build(body.provider.as_deref(), body.model.as_deref())?;
    let request = ChatRequest {
        messages: body.messages,
        system: body.system,
        max_tokens: body.max_tokens,
        temperature: body.temperature,
    };
    let stream = provider.stream(&request).await?;
    Ok(sse_from_stream(stream))
}

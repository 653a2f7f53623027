//! Video assistant routes: script generation, voice synthesis,
//! transcription.

use axum::Json;
use axum::extract::State;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use optima_media::Transcription;

use crate::errors::ApiError;
use crate::state::AppState;

/// Body of `POST /api/video/script`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptBody {
    /// What the video is about.
    pub topic: String,
    /// Target narration length.
    #[serde(default)]
    pub duration_seconds: Option<u32>,
}

/// Body of `POST /api/video/voice`.
#[derive(Debug, Deserialize)]
pub struct VoiceBody {
    /// Narration text.
    pub text: String,
    /// Voice name override.
    #[serde(default)]
    pub voice: Option<String>,
    /// Language code override.
    #[serde(default)]
    pub language: Option<String>,
}

/// Body of `POST /api/video/transcribe`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscribeBody {
    /// Base64 audio, raw or data-URI form.
    pub audio_base64: String,
    /// Audio MIME type, defaults to `audio/webm`.
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// `POST /api/video/script`: generate a narration script.
#[instrument(skip_all)]
pub async fn script(
    State(state): State<AppState>,
    Json(body): Json<ScriptBody>,
) -> Result<Json<Value>, ApiError> {
    let script = state
        .script
        .generate(&body.topic, body.duration_seconds)
        .await?;
    Ok(Json(json!({ "script": script })))
}

/// `POST /api/video/voice`: synthesize narration audio.
#[instrument(skip_all)]
pub async fn voice(
    State(state): State<AppState>,
    Json(body): Json<VoiceBody>,
) -> Result<Json<Value>, ApiError> {
    let audio = state
        .voice
        .synthesize(&body.text, body.voice.as_deref(), body.language.as_deref())
        .await?;
    Ok(Json(json!({
        "audioBase64": BASE64.encode(audio),
        "contentType": "audio/mpeg",
    })))
}

/// `POST /api/video/transcribe`: transcribe recorded audio.
#[instrument(skip_all)]
pub async fn transcribe(
    State(state): State<AppState>,
    Json(body): Json<TranscribeBody>,
) -> Result<Json<Transcription>, ApiError> {
    let transcription = state
        .transcriber
        .transcribe(&body.audio_base64, body.mime_type.as_deref())
        .await?;
    Ok(Json(transcription))
}

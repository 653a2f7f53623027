//! Audio transcription against a Deepgram-compatible API.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::errors::{MediaError, Result};

/// Upload cap on decoded audio.
pub const MAX_AUDIO_BYTES: usize = 25 * 1024 * 1024;

/// Content type used when the caller does not name one.
const DEFAULT_MIME: &str = "audio/webm";

/// A completed transcription.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcription {
    /// The transcript text.
    pub transcript: String,
    /// Model confidence, 0..=1.
    pub confidence: f64,
    /// Audio duration in seconds.
    pub duration_seconds: f64,
}

// Deepgram response shape (the parts consumed here).

#[derive(Deserialize)]
struct ListenResponse {
    #[serde(default)]
    metadata: Option<ListenMetadata>,
    results: ListenResults,
}

#[derive(Deserialize)]
struct ListenMetadata {
    #[serde(default)]
    duration: f64,
}

#[derive(Deserialize)]
struct ListenResults {
    channels: Vec<ListenChannel>,
}

#[derive(Deserialize)]
struct ListenChannel {
    alternatives: Vec<ListenAlternative>,
}

#[derive(Deserialize)]
struct ListenAlternative {
    #[serde(default)]
    transcript: String,
    #[serde(default)]
    confidence: f64,
}

/// Audio transcriber.
pub struct Transcriber {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl Transcriber {
    /// New transcriber.
    #[must_use]
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Transcribe base64-encoded audio (raw or data-URI form).
    #[instrument(skip_all, fields(mime_type))]
    pub async fn transcribe(
        &self,
        audio_base64: &str,
        mime_type: Option<&str>,
    ) -> Result<Transcription> {
        if self.api_key.is_empty() {
            return Err(MediaError::NotConfigured {
                message: "transcription: no API key configured".into(),
            });
        }

        let audio = decode_audio(audio_base64)?;
        let mime = mime_type.unwrap_or(DEFAULT_MIME);
        debug!(bytes = audio.len(), mime, "sending transcription request");

        let url = format!("{}/v1/listen", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Token {}", self.api_key))
            .header("Content-Type", mime)
            .body(audio)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MediaError::Api {
                status: status.as_u16(),
                message: optima_core::text::truncate_str(&body, 200).to_owned(),
            });
        }

        let parsed: ListenResponse = response.json().await?;
        let alternative = parsed
            .results
            .channels
            .first()
            .and_then(|c| c.alternatives.first())
            .ok_or_else(|| MediaError::Api {
                status: 0,
                message: "empty transcription response".into(),
            })?;

        Ok(Transcription {
            transcript: alternative.transcript.clone(),
            confidence: alternative.confidence,
            duration_seconds: parsed.metadata.map_or(0.0, |m| m.duration),
        })
    }
}

/// Decode base64 audio, stripping a `data:…;base64,` prefix if present,
/// and enforce the size cap.
fn decode_audio(audio_base64: &str) -> Result<Vec<u8>> {
    let raw = normalize_base64(audio_base64);
    if raw.is_empty() {
        return Err(MediaError::invalid("audio payload is empty"));
    }
    let bytes = BASE64
        .decode(raw)
        .map_err(|e| MediaError::invalid(format!("invalid base64 audio: {e}")))?;
    if bytes.len() > MAX_AUDIO_BYTES {
        return Err(MediaError::invalid(format!(
            "audio too large: {} bytes (limit {MAX_AUDIO_BYTES})",
            bytes.len()
        )));
    }
    Ok(bytes)
}

/// Strip a data-URI prefix, returning the bare base64 payload.
fn normalize_base64(input: &str) -> &str {
    let trimmed = input.trim();
    if trimmed.starts_with("data:") {
        match trimmed.split_once("base64,") {
            Some((_, payload)) => payload,
            None => trimmed,
        }
    } else {
        trimmed
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

//! Voice synthesis against a VoiceRSS-compatible API.
//!
//! The API answers 200 for everything; failures come back as a text body
//! prefixed with `ERROR`, so success is detected by content, not status.

use tracing::{debug, instrument};

use crate::errors::{MediaError, Result};

/// The vendor caps request content at 100 KB.
pub const MAX_TEXT_BYTES: usize = 100 * 1024;

/// Audio codec requested from the API.
const CODEC: &str = "MP3";

/// Sample rate / format parameter.
const FORMAT: &str = "44khz_16bit_stereo";

/// Voice synthesizer.
pub struct VoiceSynthesizer {
    api_key: String,
    base_url: String,
    default_voice: String,
    default_language: String,
    client: reqwest::Client,
}

impl VoiceSynthesizer {
    /// New synthesizer.
    #[must_use]
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        default_voice: impl Into<String>,
        default_language: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            default_voice: default_voice.into(),
            default_language: default_language.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Synthesize `text` to MP3 bytes.
    #[instrument(skip_all, fields(text_len = text.len()))]
    pub async fn synthesize(
        &self,
        text: &str,
        voice: Option<&str>,
        language: Option<&str>,
    ) -> Result<Vec<u8>> {
        if self.api_key.is_empty() {
            return Err(MediaError::NotConfigured {
                message: "voice: no API key configured".into(),
            });
        }
        if text.trim().is_empty() {
            return Err(MediaError::invalid("text must not be empty"));
        }
        if text.len() > MAX_TEXT_BYTES {
            return Err(MediaError::invalid(format!(
                "text too long: {} bytes (limit {MAX_TEXT_BYTES})",
                text.len()
            )));
        }

        let voice = voice.unwrap_or(&self.default_voice);
        let language = language.unwrap_or(&self.default_language);
        debug!(voice, language, "sending voice request");

        let response = self
            .client
            .post(&self.base_url)
            .form(&[
                ("key", self.api_key.as_str()),
                ("hl", language),
                ("v", voice),
                ("c", CODEC),
                ("f", FORMAT),
                ("src", text),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MediaError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let bytes = response.bytes().await?;
        // In-band error: 200 with a text body starting with "ERROR"
        if bytes.starts_with(b"ERROR") {
            let message = String::from_utf8_lossy(&bytes).into_owned();
            return Err(MediaError::Api { status: 0, message });
        }
        Ok(bytes.to_vec())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use wiremock::matchers::{body_string_contains, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn synthesizer(server: &MockServer) -> VoiceSynthesizer {
        VoiceSynthesizer::new("vr-key", server.uri(), "Linda", "en-us")
    }

    #[tokio::test]
    async fn returns_audio_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("key=vr-key"))
            .and(body_string_contains("hl=en-us"))
            .and(body_string_contains("v=Linda"))
            .respond_with(
                ResponseTemplate::new(200).set_body_bytes(vec![0xff, 0xfb, 0x90, 0x00]),
            )
            .mount(&server)
            .await;

        let audio = synthesizer(&server)
            .synthesize("hello world", None, None)
            .await
            .unwrap();
        assert_eq!(audio, vec![0xff, 0xfb, 0x90, 0x00]);
    }

    #[tokio::test]
    async fn voice_and_language_overrides_are_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("hl=de-de"))
            .and(body_string_contains("v=Hanna"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1]))
            .mount(&server)
            .await;

        let audio = synthesizer(&server)
            .synthesize("hallo", Some("Hanna"), Some("de-de"))
            .await
            .unwrap();
        assert_eq!(audio, vec![1]);
    }

    #[tokio::test]
    async fn in_band_error_body_is_detected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("ERROR: The API key is not available!"),
            )
            .mount(&server)
            .await;

        let err = synthesizer(&server)
            .synthesize("hello", None, None)
            .await
            .unwrap_err();
        assert_matches!(err, MediaError::Api { status: 0, message } if message.contains("API key"));
    }

    #[tokio::test]
    async fn empty_text_is_rejected() {
        let server = MockServer::start().await;
        let err = synthesizer(&server)
            .synthesize("  ", None, None)
            .await
            .unwrap_err();
        assert_matches!(err, MediaError::InvalidInput { .. });
    }

    #[tokio::test]
    async fn oversized_text_is_rejected() {
        let server = MockServer::start().await;
        let text = "a".repeat(MAX_TEXT_BYTES + 1);
        let err = synthesizer(&server)
            .synthesize(&text, None, None)
            .await
            .unwrap_err();
        assert_matches!(err, MediaError::InvalidInput { .. });
    }

    #[tokio::test]
    async fn missing_api_key_is_not_configured() {
        let server = MockServer::start().await;
        let synthesizer = VoiceSynthesizer::new("", server.uri(), "Linda", "en-us");
        let err = synthesizer.synthesize("hello", None, None).await.unwrap_err();
        assert_matches!(err, MediaError::NotConfigured { .. });
    }
}

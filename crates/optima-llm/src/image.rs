//! Image generation.
//!
//! Unlike chat, image generation is a single-shot call against an
//! OpenAI-compatible images endpoint. A generator carries one primary
//! backend and at most one fallback; the fallback is tried exactly once,
//! only after the primary fails, and its error is the one surfaced when
//! both fail.

use metrics::counter;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::error_parsing::parse_api_error;
use crate::provider::{ProviderError, ProviderResult};
use crate::{PROVIDER_ERRORS_TOTAL, PROVIDER_REQUESTS_TOTAL};

/// One image backend: endpoint, credentials, model and output size.
#[derive(Clone, Debug)]
pub struct ImageBackend {
    /// Label for logs and metrics (`primary` config name).
    pub name: String,
    /// API key (Bearer auth).
    pub api_key: String,
    /// API base URL.
    pub base_url: String,
    /// Model identifier, e.g. `dall-e-3`.
    pub model: String,
    /// Output size, e.g. `1024x1024`.
    pub size: String,
}

/// A generated image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedImage {
    /// Base64-encoded image bytes (PNG).
    pub b64_data: String,
    /// Which backend produced it.
    pub backend: String,
}

#[derive(Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u32,
    size: &'a str,
    response_format: &'a str,
}

#[derive(Deserialize)]
struct ImageResponse {
    data: Vec<ImageDatum>,
}

#[derive(Deserialize)]
struct ImageDatum {
    b64_json: String,
}

/// Image generator with a primary backend and an optional fallback.
pub struct ImageGenerator {
    primary: ImageBackend,
    fallback: Option<ImageBackend>,
    client: reqwest::Client,
}

impl ImageGenerator {
    /// Create a generator.
    #[must_use]
    pub fn new(primary: ImageBackend, fallback: Option<ImageBackend>) -> Self {
        Self {
            primary,
            fallback,
            client: reqwest::Client::new(),
        }
    }

    /// Create a generator with a shared HTTP client.
    #[must_use]
    pub fn with_client(
        primary: ImageBackend,
        fallback: Option<ImageBackend>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            primary,
            fallback,
            client,
        }
    }

    /// Generate one image for the prompt.
    #[instrument(skip_all, fields(model = %self.primary.model))]
    pub async fn generate(&self, prompt: &str) -> ProviderResult<GeneratedImage> {
        match self.generate_with(&self.primary, prompt).await {
            Ok(image) => Ok(image),
            Err(primary_err) => {
                let Some(fallback) = &self.fallback else {
                    return Err(primary_err);
                };
                warn!(
                    backend = %self.primary.name,
                    error = %primary_err,
                    "primary image backend failed, trying fallback"
                );
                self.generate_with(fallback, prompt).await
            }
        }
    }

    async fn generate_with(
        &self,
        backend: &ImageBackend,
        prompt: &str,
    ) -> ProviderResult<GeneratedImage> {
        counter!(PROVIDER_REQUESTS_TOTAL, "provider" => backend.name.clone()).increment(1);

        if backend.api_key.is_empty() {
            return Err(ProviderError::NotConfigured {
                message: format!("{}: no API key configured", backend.name),
            });
        }

        let url = format!("{}/v1/images/generations", backend.base_url);
        debug!(backend = %backend.name, model = %backend.model, "sending image request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&backend.api_key)
            .json(&ImageRequest {
                model: &backend.model,
                prompt,
                n: 1,
                size: &backend.size,
                response_format: "b64_json",
            })
            .send()
            .await
            .map_err(ProviderError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            let err_info = parse_api_error(&body_text, status.as_u16());
            counter!(
                PROVIDER_ERRORS_TOTAL,
                "provider" => backend.name.clone(),
                "status" => status.as_u16().to_string()
            )
            .increment(1);
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: err_info.message,
                code: err_info.code,
                retryable: err_info.retryable,
            });
        }

        let parsed: ImageResponse = response.json().await.map_err(ProviderError::Http)?;
        let datum = parsed
            .data
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::Stream {
                message: format!("{}: empty image response", backend.name),
            })?;

        Ok(GeneratedImage {
            b64_data: datum.b64_json,
            backend: backend.name.clone(),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

//! Shared application state.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use optima_artifacts::handlers::{DiagramHandler, ImageHandler, SvgHandler, TextHandler};
use optima_artifacts::{ArtifactService, HandlerRegistry};
use optima_auth::{AuthConfig, AuthService, Mailer};
use optima_llm::anthropic::AnthropicConfig;
use optima_llm::openai::OpenAIConfig;
use optima_llm::provider::{ChatRequest, DeltaEventStream, ProviderResult};
use optima_llm::{ImageBackend, ImageGenerator, Provider, ProviderError, ProviderRegistry};
use optima_media::{ScriptGenerator, Transcriber, VoiceSynthesizer};
use optima_settings::types::OptimaSettings;
use optima_store::StorePool;

use crate::metrics::MetricsHandle;

/// Startup failures.
#[derive(Debug, Error)]
pub enum InitError {
    /// Database could not be opened or migrated.
    #[error(transparent)]
    Store(#[from] optima_store::StoreError),

    /// SMTP transport could not be built.
    #[error(transparent)]
    Auth(#[from] optima_auth::AuthError),
}

/// Everything the routes need.
#[derive(Clone)]
pub struct AppState {
    /// Provider construction per chat request.
    pub registry: Arc<ProviderRegistry>,
    /// Document dispatch and persistence.
    pub artifacts: ArtifactService,
    /// Accounts and the password-reset flow.
    pub auth: Arc<AuthService>,
    /// Narration-script generation.
    pub script: Arc<ScriptGenerator>,
    /// Voice synthesis.
    pub voice: Arc<VoiceSynthesizer>,
    /// Audio transcription.
    pub transcriber: Arc<Transcriber>,
    /// Prometheus render handle, when the exporter is installed.
    pub metrics: MetricsHandle,
}

impl AppState {
    /// Build the full state from settings and an opened store.
    pub fn build(settings: &OptimaSettings, pool: StorePool) -> Result<Self, InitError> {
        let registry = Arc::new(build_registry(settings));

        // One default provider instance shared by the document handlers
        // and the script generator. An unconfigured default still lets the
        // server start; generation requests fail with a clear error.
        let default_provider: Arc<dyn Provider> = match registry.build(None, None) {
            Ok(provider) => provider,
            Err(e) => {
                warn!("default provider unavailable: {e}");
                Arc::new(UnconfiguredProvider(e.to_string()))
            }
        };

        let image = settings.providers.image.clone();
        let generator = ImageGenerator::new(
            ImageBackend {
                name: "primary".into(),
                api_key: image.primary.api_key,
                base_url: or_default(&image.primary.base_url, "https://api.openai.com"),
                model: image.model.clone(),
                size: image.size.clone(),
            },
            (!image.fallback.api_key.is_empty()).then(|| ImageBackend {
                name: "fallback".into(),
                api_key: image.fallback.api_key,
                base_url: or_default(&image.fallback.base_url, "https://api.openai.com"),
                model: image.model,
                size: image.size,
            }),
        );

        let handlers = HandlerRegistry::new()
            .with(Arc::new(TextHandler::new(default_provider.clone())))
            .with(Arc::new(SvgHandler::new(default_provider.clone())))
            .with(Arc::new(DiagramHandler::new(default_provider.clone())))
            .with(Arc::new(ImageHandler::new(Arc::new(generator))));
        let artifacts = ArtifactService::new(Arc::new(handlers), pool.clone());

        let email = &settings.email;
        let mailer = if email.smtp_host.is_empty() {
            Mailer::log_only(&email.from)
        } else {
            Mailer::smtp(
                &email.smtp_host,
                email.smtp_port,
                (!email.smtp_user.is_empty()).then_some(email.smtp_user.as_str()),
                (!email.smtp_pass.is_empty()).then_some(email.smtp_pass.as_str()),
                &email.from,
            )?
        };
        if settings.auth.jwt_secret.is_empty() {
            warn!("auth.jwtSecret is empty; reset tokens are not secure");
        }
        let auth = AuthService::new(
            pool,
            Arc::new(mailer),
            AuthConfig {
                jwt_secret: settings.auth.jwt_secret.clone(),
                token_ttl_minutes: i64::from(settings.auth.reset_token_ttl_minutes),
                reset_link_base: email.reset_link_base.clone(),
            },
        );

        let media = &settings.media;
        Ok(Self {
            registry,
            artifacts,
            auth: Arc::new(auth),
            script: Arc::new(ScriptGenerator::new(default_provider)),
            voice: Arc::new(VoiceSynthesizer::new(
                media.voice_api_key.clone(),
                media.voice_base_url.clone(),
                media.default_voice.clone(),
                media.default_language.clone(),
            )),
            transcriber: Arc::new(Transcriber::new(
                media.transcription_api_key.clone(),
                media.transcription_base_url.clone(),
            )),
            metrics: crate::metrics::install(),
        })
    }
}

fn build_registry(settings: &OptimaSettings) -> ProviderRegistry {
    let providers = &settings.providers;
    let default_provider = optima_core::messages::ProviderType::parse(&providers.default_provider)
        .unwrap_or_else(|| {
            warn!(
                name = %providers.default_provider,
                "unknown default provider, falling back to openai"
            );
            optima_core::messages::ProviderType::OpenAI
        });

    ProviderRegistry::new(default_provider)
        .with_openai(OpenAIConfig {
            api_key: providers.openai.api_key.clone(),
            base_url: non_empty(&providers.openai.base_url),
            model: providers.default_model.clone(),
        })
        .with_anthropic(AnthropicConfig {
            api_key: providers.anthropic.api_key.clone(),
            base_url: non_empty(&providers.anthropic.base_url),
            model: providers.default_model.clone(),
        })
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_owned())
}

fn or_default(s: &str, default: &str) -> String {
    if s.is_empty() {
        default.to_owned()
    } else {
        s.to_owned()
    }
}

/// Stand-in provider when nothing is configured; every call fails with
/// the configuration error instead of crashing startup.
struct UnconfiguredProvider(String);

#[async_trait]
impl Provider for UnconfiguredProvider {
    fn provider_type(&self) -> optima_core::messages::ProviderType {
        optima_core::messages::ProviderType::OpenAI
    }

    fn model(&self) -> &str {
        "unconfigured"
    }

    async fn stream(&self, _request: &ChatRequest) -> ProviderResult<DeltaEventStream> {
        Err(ProviderError::NotConfigured {
            message: self.0.clone(),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_from_default_settings() {
        let pool = StorePool::open_in_memory().unwrap();
        let state = AppState::build(&OptimaSettings::default(), pool).unwrap();
        // No credentials configured: nothing registered
        assert!(!state.registry.is_configured(optima_core::messages::ProviderType::OpenAI));
    }

    #[test]
    fn builds_with_credentials() {
        let mut settings = OptimaSettings::default();
        settings.providers.openai.api_key = "sk-test".into();
        let pool = StorePool::open_in_memory().unwrap();
        let state = AppState::build(&settings, pool).unwrap();
        assert!(state.registry.is_configured(optima_core::messages::ProviderType::OpenAI));
    }

    #[tokio::test]
    async fn unconfigured_provider_errors_cleanly() {
        let provider = UnconfiguredProvider("no key".into());
        let err = provider.stream(&ChatRequest::from_prompt("hi")).await.err().unwrap();
        assert!(matches!(err, ProviderError::NotConfigured { .. }));
    }
}

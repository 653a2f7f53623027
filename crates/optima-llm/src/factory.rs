//! Provider construction from configuration.
//!
//! The registry holds per-vendor credentials and a shared HTTP client,
//! and builds a boxed [`Provider`] per request. Requests may name a
//! provider and model; unset fields fall back to the configured defaults.

use std::sync::Arc;

use tracing::debug;

use optima_core::messages::ProviderType;

use crate::anthropic::{AnthropicConfig, AnthropicProvider};
use crate::openai::{OpenAIConfig, OpenAIProvider};
use crate::provider::{Provider, ProviderError, ProviderResult};

/// Registry of configured providers.
pub struct ProviderRegistry {
    default_provider: ProviderType,
    openai: Option<OpenAIConfig>,
    anthropic: Option<AnthropicConfig>,
    client: reqwest::Client,
}

impl ProviderRegistry {
    /// Create an empty registry with the given default vendor.
    #[must_use]
    pub fn new(default_provider: ProviderType) -> Self {
        Self {
            default_provider,
            openai: None,
            anthropic: None,
            client: reqwest::Client::new(),
        }
    }

    /// Register OpenAI credentials. Ignored if the API key is empty.
    #[must_use]
    pub fn with_openai(mut self, config: OpenAIConfig) -> Self {
        if !config.api_key.is_empty() {
            self.openai = Some(config);
        }
        self
    }

    /// Register Anthropic credentials. Ignored if the API key is empty.
    #[must_use]
    pub fn with_anthropic(mut self, config: AnthropicConfig) -> Self {
        if !config.api_key.is_empty() {
            self.anthropic = Some(config);
        }
        self
    }

    /// The vendor used when a request names none.
    #[must_use]
    pub fn default_provider(&self) -> ProviderType {
        self.default_provider
    }

    /// Whether the given vendor has credentials.
    #[must_use]
    pub fn is_configured(&self, provider: ProviderType) -> bool {
        match provider {
            ProviderType::OpenAI => self.openai.is_some(),
            ProviderType::Anthropic => self.anthropic.is_some(),
        }
    }

    /// Build a provider for a request.
    ///
    /// `name` falls back to the default vendor; `model` falls back to the
    /// vendor's configured model.
    pub fn build(
        &self,
        name: Option<&str>,
        model: Option<&str>,
    ) -> ProviderResult<Arc<dyn Provider>> {
        let provider_type = match name {
            Some(n) => ProviderType::parse(n).ok_or_else(|| ProviderError::UnknownProvider {
                name: n.to_owned(),
            })?,
            None => self.default_provider,
        };

        debug!(provider = %provider_type, model = model.unwrap_or("<default>"), "building provider");

        match provider_type {
            ProviderType::OpenAI => {
                let config = self.openai.as_ref().ok_or_else(|| {
                    ProviderError::NotConfigured {
                        message: "openai: no API key configured".into(),
                    }
                })?;
                let mut config = config.clone();
                if let Some(m) = model {
                    config.model = m.to_owned();
                }
                Ok(Arc::new(OpenAIProvider::with_client(
                    config,
                    self.client.clone(),
                )))
            }
            ProviderType::Anthropic => {
                let config = self.anthropic.as_ref().ok_or_else(|| {
                    ProviderError::NotConfigured {
                        message: "anthropic: no API key configured".into(),
                    }
                })?;
                let mut config = config.clone();
                if let Some(m) = model {
                    config.model = m.to_owned();
                }
                Ok(Arc::new(AnthropicProvider::with_client(
                    config,
                    self.client.clone(),
                )))
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn registry() -> ProviderRegistry {
        ProviderRegistry::new(ProviderType::OpenAI)
            .with_openai(OpenAIConfig {
                api_key: "sk-test".into(),
                base_url: None,
                model: "gpt-4o".into(),
            })
            .with_anthropic(AnthropicConfig {
                api_key: "ant-test".into(),
                base_url: None,
                model: "claude-sonnet-4-5".into(),
            })
    }

    #[test]
    fn builds_default_provider() {
        let provider = registry().build(None, None).unwrap();
        assert_eq!(provider.provider_type(), ProviderType::OpenAI);
        assert_eq!(provider.model(), "gpt-4o");
    }

    #[test]
    fn builds_named_provider_with_model_override() {
        let provider = registry()
            .build(Some("anthropic"), Some("claude-haiku-4-5"))
            .unwrap();
        assert_eq!(provider.provider_type(), ProviderType::Anthropic);
        assert_eq!(provider.model(), "claude-haiku-4-5");
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = registry().build(Some("grok"), None).err().unwrap();
        assert_matches!(err, ProviderError::UnknownProvider { name } if name == "grok");
    }

    #[test]
    fn unconfigured_vendor_is_rejected() {
        let registry = ProviderRegistry::new(ProviderType::OpenAI).with_anthropic(AnthropicConfig {
            api_key: "ant-test".into(),
            base_url: None,
            model: "claude-sonnet-4-5".into(),
        });
        let err = registry.build(Some("openai"), None).err().unwrap();
        assert_matches!(err, ProviderError::NotConfigured { .. });
    }

    #[test]
    fn empty_api_key_counts_as_unconfigured() {
        let registry = ProviderRegistry::new(ProviderType::OpenAI).with_openai(OpenAIConfig {
            api_key: String::new(),
            base_url: None,
            model: "gpt-4o".into(),
        });
        assert!(!registry.is_configured(ProviderType::OpenAI));
    }
}

//! Settings schema with compiled defaults.
//!
//! Every field has a serde default so a partial user file deep-merges
//! cleanly over the compiled values. Wire form is camelCase JSON, matching
//! the client-facing config surface.

use serde::{Deserialize, Serialize};

/// Root settings document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptimaSettings {
    /// Settings schema version.
    pub version: String,
    /// Application name.
    pub name: String,
    /// HTTP server settings.
    pub server: ServerSettings,
    /// LLM provider settings.
    pub providers: ProviderSettings,
    /// Outbound email settings.
    pub email: EmailSettings,
    /// Media (voice/transcription) settings.
    pub media: MediaSettings,
    /// Auth and reset-token settings.
    pub auth: AuthSettings,
    /// Upstream retry settings.
    pub retry: RetrySettings,
}

impl Default for OptimaSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".into(),
            name: "optima".into(),
            server: ServerSettings::default(),
            providers: ProviderSettings::default(),
            email: EmailSettings::default(),
            media: MediaSettings::default(),
            auth: AuthSettings::default(),
            retry: RetrySettings::default(),
        }
    }
}

/// HTTP server settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Path to the SQLite database file.
    pub database_path: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3100,
            database_path: "~/.optima/optima.db".into(),
        }
    }
}

/// Credentials and endpoint for one model vendor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderCredentials {
    /// API key (empty means unconfigured).
    pub api_key: String,
    /// Base URL override (empty means the vendor default).
    pub base_url: String,
}

/// LLM provider settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderSettings {
    /// Default provider name (`openai` or `anthropic`).
    pub default_provider: String,
    /// Default model for the default provider.
    pub default_model: String,
    /// OpenAI-compatible credentials.
    pub openai: ProviderCredentials,
    /// Anthropic credentials.
    pub anthropic: ProviderCredentials,
    /// Image generation settings.
    pub image: ImageProviderSettings,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            default_provider: "openai".into(),
            default_model: "gpt-4o".into(),
            openai: ProviderCredentials::default(),
            anthropic: ProviderCredentials::default(),
            image: ImageProviderSettings::default(),
        }
    }
}

/// Image generation: primary endpoint plus a single fallback.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageProviderSettings {
    /// Primary image API credentials (OpenAI-compatible `/v1/images/generations`).
    pub primary: ProviderCredentials,
    /// Fallback image API credentials, tried once when the primary fails.
    pub fallback: ProviderCredentials,
    /// Model passed to the primary endpoint.
    pub model: String,
    /// Image size requested (e.g. `1024x1024`).
    pub size: String,
}

impl Default for ImageProviderSettings {
    fn default() -> Self {
        Self {
            primary: ProviderCredentials::default(),
            fallback: ProviderCredentials::default(),
            model: "dall-e-3".into(),
            size: "1024x1024".into(),
        }
    }
}

/// Outbound SMTP settings. An empty host means "log instead of send".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailSettings {
    /// SMTP relay host (empty disables real sending).
    pub smtp_host: String,
    /// SMTP port.
    pub smtp_port: u16,
    /// SMTP username.
    pub smtp_user: String,
    /// SMTP password.
    pub smtp_pass: String,
    /// From address for outbound mail.
    pub from: String,
    /// Base URL used to build password-reset links.
    pub reset_link_base: String,
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            smtp_host: String::new(),
            smtp_port: 587,
            smtp_user: String::new(),
            smtp_pass: String::new(),
            from: "noreply@optima.local".into(),
            reset_link_base: "http://localhost:3000/reset-password".into(),
        }
    }
}

/// Media API settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaSettings {
    /// Transcription API key (Deepgram-compatible).
    pub transcription_api_key: String,
    /// Transcription API base URL.
    pub transcription_base_url: String,
    /// Voice synthesis API key (VoiceRSS-compatible).
    pub voice_api_key: String,
    /// Voice synthesis API base URL.
    pub voice_base_url: String,
    /// Default synthesis voice.
    pub default_voice: String,
    /// Default synthesis language.
    pub default_language: String,
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            transcription_api_key: String::new(),
            transcription_base_url: "https://api.deepgram.com".into(),
            voice_api_key: String::new(),
            voice_base_url: "https://api.voicerss.org".into(),
            default_voice: "Linda".into(),
            default_language: "en-us".into(),
        }
    }
}

/// Auth settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthSettings {
    /// HS256 secret for reset-token JWTs.
    pub jwt_secret: String,
    /// Reset-token lifetime in minutes.
    pub reset_token_ttl_minutes: u32,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            reset_token_ttl_minutes: 60,
        }
    }
}

/// Upstream retry settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetrySettings {
    /// Maximum retry attempts.
    pub max_retries: u32,
    /// Base backoff delay in milliseconds.
    pub base_delay_ms: u64,
    /// Backoff ceiling in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: 1,
            base_delay_ms: 1_000,
            max_delay_ms: 30_000,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let s = OptimaSettings::default();
        assert_eq!(s.name, "optima");
        assert_eq!(s.server.port, 3100);
        assert_eq!(s.providers.default_provider, "openai");
        assert_eq!(s.email.smtp_port, 587);
        assert_eq!(s.auth.reset_token_ttl_minutes, 60);
        assert_eq!(s.retry.max_retries, 1);
        assert!(s.providers.openai.api_key.is_empty());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let s: OptimaSettings =
            serde_json::from_str(r#"{"server": {"port": 9000}}"#).unwrap();
        assert_eq!(s.server.port, 9000);
        // Untouched fields keep defaults
        assert_eq!(s.server.host, "127.0.0.1");
        assert_eq!(s.providers.default_model, "gpt-4o");
    }

    #[test]
    fn camel_case_wire_form() {
        let json = serde_json::to_value(OptimaSettings::default()).unwrap();
        assert!(json["providers"]["defaultProvider"].is_string());
        assert!(json["email"]["smtpHost"].is_string());
        assert!(json["auth"]["resetTokenTtlMinutes"].is_number());
        assert!(json["providers"].get("default_provider").is_none());
    }

    #[test]
    fn round_trip() {
        let s = OptimaSettings::default();
        let json = serde_json::to_string(&s).unwrap();
        let back: OptimaSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}

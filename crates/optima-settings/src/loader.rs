//! Layered settings loading.
//!
//! Three layers, lowest to highest priority:
//! 1. Compiled defaults ([`OptimaSettings::default`])
//! 2. User file (`~/.optima/settings.json`), deep-merged over defaults
//! 3. `OPTIMA_*` environment variables

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::errors::{Result, SettingsError};
use crate::types::OptimaSettings;

/// Default settings file location (`~/.optima/settings.json`).
#[must_use]
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
    PathBuf::from(home).join(".optima").join("settings.json")
}

/// Deep-merge `overlay` into `base`.
///
/// Objects merge recursively; any other value in `overlay` replaces the
/// corresponding `base` value wholesale (arrays are not spliced).
#[must_use]
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value,
                };
                let _ = base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (_, overlay) => overlay,
    }
}

/// Load settings from the default path with env overrides applied.
pub fn load_settings() -> Result<OptimaSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific file path with env overrides applied.
///
/// A missing file is not an error — defaults plus env overrides are used.
pub fn load_settings_from_path(path: &Path) -> Result<OptimaSettings> {
    let defaults = serde_json::to_value(OptimaSettings::default())?;

    let merged = if path.exists() {
        let raw = std::fs::read_to_string(path)?;
        let file_value: Value = serde_json::from_str(&raw)?;
        deep_merge(defaults, file_value)
    } else {
        defaults
    };

    let mut settings: OptimaSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings)?;
    Ok(settings)
}

/// Apply `OPTIMA_*` environment overrides (highest priority layer).
fn apply_env_overrides(settings: &mut OptimaSettings) -> Result<()> {
    if let Ok(host) = std::env::var("OPTIMA_HOST") {
        settings.server.host = host;
    }
    if let Ok(port) = std::env::var("OPTIMA_PORT") {
        settings.server.port =
            port.parse()
                .map_err(|_| SettingsError::InvalidEnvOverride {
                    var: "OPTIMA_PORT".into(),
                    message: format!("not a port number: {port}"),
                })?;
    }
    if let Ok(path) = std::env::var("OPTIMA_DATABASE_PATH") {
        settings.server.database_path = path;
    }
    if let Ok(key) = std::env::var("OPTIMA_OPENAI_API_KEY") {
        settings.providers.openai.api_key = key;
    }
    if let Ok(key) = std::env::var("OPTIMA_ANTHROPIC_API_KEY") {
        settings.providers.anthropic.api_key = key;
    }
    if let Ok(secret) = std::env::var("OPTIMA_JWT_SECRET") {
        settings.auth.jwt_secret = secret;
    }
    if let Ok(host) = std::env::var("OPTIMA_SMTP_HOST") {
        settings.email.smtp_host = host;
    }
    if let Ok(user) = std::env::var("OPTIMA_SMTP_USER") {
        settings.email.smtp_user = user;
    }
    if let Ok(pass) = std::env::var("OPTIMA_SMTP_PASS") {
        settings.email.smtp_pass = pass;
    }
    if let Ok(key) = std::env::var("OPTIMA_DEEPGRAM_API_KEY") {
        settings.media.transcription_api_key = key;
    }
    if let Ok(key) = std::env::var("OPTIMA_VOICERSS_API_KEY") {
        settings.media.voice_api_key = key;
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

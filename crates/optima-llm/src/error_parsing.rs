//! Vendor error-body parsing.
//!
//! Both supported vendors return `{"error": {...}}` envelopes with slightly
//! different field names. This extracts a message and code without caring
//! which vendor produced the body, and classifies retryability by status.

use serde_json::Value;

/// Parsed API error info.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiErrorInfo {
    /// Best-effort human-readable message.
    pub message: String,
    /// Vendor error code or type, when present.
    pub code: Option<String>,
    /// Whether a retry could plausibly succeed.
    pub retryable: bool,
}

/// Parse a non-2xx response body into [`ApiErrorInfo`].
///
/// Falls back to the raw body (truncated) when it is not the expected JSON
/// envelope. 429 and 5xx statuses are retryable; 4xx are not.
#[must_use]
pub fn parse_api_error(body: &str, status: u16) -> ApiErrorInfo {
    let retryable = status == 429 || status >= 500;

    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let error_obj = parsed.as_ref().and_then(|v| v.get("error"));

    let message = error_obj
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .map_or_else(
            || {
                let raw = optima_core::text::truncate_str(body.trim(), 200);
                if raw.is_empty() {
                    format!("HTTP {status}")
                } else {
                    raw.to_owned()
                }
            },
            str::to_owned,
        );

    let code = error_obj
        .and_then(|e| e.get("code").or_else(|| e.get("type")))
        .and_then(Value::as_str)
        .map(str::to_owned);

    ApiErrorInfo {
        message,
        code,
        retryable,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

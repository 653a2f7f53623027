//! Retry configuration and backoff calculation.

use serde::{Deserialize, Serialize};

/// Exponential backoff configuration for upstream API calls.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryConfig {
    /// Maximum retry attempts after the initial call.
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds.
    pub base_delay_ms: u64,
    /// Ceiling on any single delay, in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 1,
            base_delay_ms: 1_000,
            max_delay_ms: 30_000,
        }
    }
}

impl RetryConfig {
    /// Delay before the given retry attempt (1-based), doubling each time
    /// and clamped to `max_delay_ms`.
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> u64 {
        if attempt == 0 {
            return 0;
        }
        let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
        self.base_delay_ms
            .saturating_mul(factor)
            .min(self.max_delay_ms)
    }
}

/// Parse a `retry-after` header value into milliseconds.
///
/// Only the delta-seconds form is handled; HTTP-date values return `None`
/// and callers fall back to their own backoff.
#[must_use]
pub fn parse_retry_after_header(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok().map(|secs| secs * 1_000)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

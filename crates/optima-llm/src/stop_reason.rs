//! Stop-reason normalization.
//!
//! Each vendor names its finish reasons differently; clients only care
//! whether the model stopped naturally or hit the output token cap. Both
//! vendors normalize to `"end_turn"` or `"max_tokens"`.

/// Normalized stop reason for a natural end of generation.
pub const END_TURN: &str = "end_turn";
/// Normalized stop reason for hitting the output token cap.
pub const MAX_TOKENS: &str = "max_tokens";

/// Normalize an OpenAI `finish_reason` value.
///
/// `"length"` means the token cap was hit; everything else (including an
/// absent reason) is treated as a natural stop.
#[must_use]
pub fn from_openai(finish_reason: Option<&str>) -> &'static str {
    match finish_reason {
        Some("length") => MAX_TOKENS,
        _ => END_TURN,
    }
}

/// Normalize an Anthropic `stop_reason` value.
#[must_use]
pub fn from_anthropic(stop_reason: Option<&str>) -> &'static str {
    match stop_reason {
        Some("max_tokens") => MAX_TOKENS,
        _ => END_TURN,
    }
}

//! Text utilities for model output.
//!
//! Models routinely wrap code output (SVG, Mermaid) in markdown fences even
//! when asked not to. [`strip_code_fences`] normalizes that before the
//! content is persisted or returned as the canonical document body.

/// Strip a surrounding markdown code fence, if present.
///
/// Handles ```` ```lang ```` openers with or without a language tag and a
/// trailing ```` ``` ```` closer. Content without fences passes through
/// unchanged. Only a fence that wraps the whole string is stripped; fences
/// embedded mid-document are left alone.
#[must_use]
pub fn strip_code_fences(content: &str) -> String {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return content.to_owned();
    };
    // Drop the language tag (rest of the opener line).
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => return content.to_owned(),
    };
    let body = body.strip_suffix("```").unwrap_or(body);
    body.trim_end().to_owned()
}

/// Truncate a string to at most `max_bytes` bytes at a char boundary.
///
/// Rust `&str[..n]` panics when `n` falls inside a multi-byte character;
/// this walks back to the nearest boundary instead.
#[inline]
#[must_use]
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

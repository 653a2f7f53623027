//! Streaming delta events.
//!
//! [`DeltaEvent`] is the client-visible data stream for any incremental
//! generation: chat responses and document/artifact handlers both emit it.
//! Events are transient (never persisted) and drive real-time UI updates
//! while the model generates content.
//!
//! Wire format: tagged JSON (`{"type": "text_delta", "delta": "..."}`)
//! with camelCase field names.

use serde::{Deserialize, Serialize};

/// Token accounting for a completed generation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    /// Tokens consumed by the prompt.
    pub input_tokens: u64,
    /// Tokens produced by the model.
    pub output_tokens: u64,
}

/// Events emitted while a generation streams.
///
/// Invariant: a well-formed stream starts with [`DeltaEvent::Start`] and
/// terminates with exactly one [`DeltaEvent::Finish`] or
/// [`DeltaEvent::Error`]. The `content` carried by `Finish` is the
/// canonical final text for the generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DeltaEvent {
    /// Stream started.
    #[serde(rename = "start")]
    Start,

    /// Incremental prose text.
    #[serde(rename = "text_delta")]
    TextDelta {
        /// Text fragment.
        delta: String,
    },

    /// Incremental non-prose content (SVG source, diagram source,
    /// base64 image data). `kind` discriminates for the client.
    #[serde(rename = "content_delta")]
    ContentDelta {
        /// Content kind (`svg`, `diagram`, `image`).
        kind: String,
        /// Content fragment.
        delta: String,
    },

    /// Stream completed successfully.
    #[serde(rename = "finish")]
    Finish {
        /// Final content for the generation.
        content: String,
        /// Normalized stop reason from the model, when known.
        #[serde(rename = "stopReason", skip_serializing_if = "Option::is_none")]
        stop_reason: Option<String>,
        /// Token usage, when the provider reports it.
        #[serde(rename = "tokenUsage", skip_serializing_if = "Option::is_none")]
        token_usage: Option<TokenUsage>,
    },

    /// Stream failed.
    #[serde(rename = "error")]
    Error {
        /// Error message.
        error: String,
    },
}

impl DeltaEvent {
    /// The tag string for this event (for logging and metrics labels).
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::TextDelta { .. } => "text_delta",
            Self::ContentDelta { .. } => "content_delta",
            Self::Finish { .. } => "finish",
            Self::Error { .. } => "error",
        }
    }

    /// Whether this event terminates the stream.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finish { .. } | Self::Error { .. })
    }

    /// The fragment this event contributes to the final content, if any.
    #[must_use]
    pub fn fragment(&self) -> Option<&str> {
        match self {
            Self::TextDelta { delta } | Self::ContentDelta { delta, .. } => Some(delta),
            _ => None,
        }
    }

    /// Shorthand for a plain finish event.
    #[must_use]
    pub fn finish(content: impl Into<String>) -> Self {
        Self::Finish {
            content: content.into(),
            stop_reason: None,
            token_usage: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn start_serde() {
        let e = DeltaEvent::Start;
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json, json!({"type": "start"}));
        let back: DeltaEvent = serde_json::from_value(json).unwrap();
        assert_eq!(e, back);
    }

    #[test]
    fn text_delta_serde() {
        let e = DeltaEvent::TextDelta {
            delta: "hello".into(),
        };
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["type"], "text_delta");
        assert_eq!(json["delta"], "hello");
    }

    #[test]
    fn content_delta_serde() {
        let e = DeltaEvent::ContentDelta {
            kind: "svg".into(),
            delta: "<svg>".into(),
        };
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["type"], "content_delta");
        assert_eq!(json["kind"], "svg");
        assert_eq!(json["delta"], "<svg>");
    }

    #[test]
    fn finish_serde_camel_case() {
        let e = DeltaEvent::Finish {
            content: "done".into(),
            stop_reason: Some("end_turn".into()),
            token_usage: Some(TokenUsage {
                input_tokens: 10,
                output_tokens: 5,
            }),
        };
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["type"], "finish");
        assert_eq!(json["stopReason"], "end_turn");
        assert_eq!(json["tokenUsage"]["inputTokens"], 10);
        assert_eq!(json["tokenUsage"]["outputTokens"], 5);
        // No snake_case keys on the wire
        assert!(json.get("stop_reason").is_none());
        assert!(json["tokenUsage"].get("input_tokens").is_none());
    }

    #[test]
    fn finish_omits_optional_fields() {
        let json = serde_json::to_value(DeltaEvent::finish("c")).unwrap();
        assert!(json.get("stopReason").is_none());
        assert!(json.get("tokenUsage").is_none());
    }

    #[test]
    fn error_serde() {
        let e = DeltaEvent::Error {
            error: "connection reset".into(),
        };
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["error"], "connection reset");
    }

    #[test]
    fn terminal_classification() {
        assert!(DeltaEvent::finish("c").is_terminal());
        assert!(DeltaEvent::Error { error: "e".into() }.is_terminal());
        assert!(!DeltaEvent::Start.is_terminal());
        assert!(!DeltaEvent::TextDelta { delta: "d".into() }.is_terminal());
    }

    #[test]
    fn fragment_extraction() {
        assert_eq!(
            DeltaEvent::TextDelta { delta: "a".into() }.fragment(),
            Some("a")
        );
        assert_eq!(
            DeltaEvent::ContentDelta {
                kind: "svg".into(),
                delta: "b".into()
            }
            .fragment(),
            Some("b")
        );
        assert_eq!(DeltaEvent::Start.fragment(), None);
        assert_eq!(DeltaEvent::finish("c").fragment(), None);
    }

    #[test]
    fn all_variants_have_distinct_types() {
        let events = vec![
            DeltaEvent::Start,
            DeltaEvent::TextDelta { delta: "d".into() },
            DeltaEvent::ContentDelta {
                kind: "image".into(),
                delta: "d".into(),
            },
            DeltaEvent::finish("c"),
            DeltaEvent::Error { error: "e".into() },
        ];
        let mut types: Vec<&str> = events.iter().map(DeltaEvent::event_type).collect();
        types.sort_unstable();
        types.dedup();
        assert_eq!(types.len(), 5);
    }

    #[test]
    fn round_trip_all_variants() {
        let events = vec![
            DeltaEvent::Start,
            DeltaEvent::TextDelta { delta: "x".into() },
            DeltaEvent::ContentDelta {
                kind: "diagram".into(),
                delta: "graph TD".into(),
            },
            DeltaEvent::Finish {
                content: "full".into(),
                stop_reason: Some("max_tokens".into()),
                token_usage: None,
            },
            DeltaEvent::Error { error: "e".into() },
        ];
        for event in events {
            let json = serde_json::to_value(&event).unwrap();
            let back: DeltaEvent = serde_json::from_value(json).unwrap();
            assert_eq!(back, event);
        }
    }
}

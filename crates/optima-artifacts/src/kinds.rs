//! Document kinds.

use serde::{Deserialize, Serialize};

/// The kinds of document the handlers can generate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Prose.
    Text,
    /// A self-contained `<svg>` document.
    Svg,
    /// Mermaid diagram source.
    Diagram,
    /// Base64-encoded raster image.
    Image,
}

impl DocumentKind {
    /// The wire/storage string for this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Svg => "svg",
            Self::Diagram => "diagram",
            Self::Image => "image",
        }
    }

    /// Parse a kind from a request or storage string.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "text" => Some(Self::Text),
            "svg" => Some(Self::Svg),
            "diagram" => Some(Self::Diagram),
            "image" => Some(Self::Image),
            _ => None,
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&DocumentKind::Diagram).unwrap(),
            r#""diagram""#
        );
        let back: DocumentKind = serde_json::from_str(r#""svg""#).unwrap();
        assert_eq!(back, DocumentKind::Svg);
    }

    #[test]
    fn parse_round_trips_display() {
        for kind in [
            DocumentKind::Text,
            DocumentKind::Svg,
            DocumentKind::Diagram,
            DocumentKind::Image,
        ] {
            assert_eq!(DocumentKind::parse(&kind.to_string()), Some(kind));
        }
        assert_eq!(DocumentKind::parse("pdf"), None);
    }
}

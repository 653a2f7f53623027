//! Branded ID newtypes.
//!
//! Every persisted entity gets a prefixed UUID v7 string ID (`usr_…`,
//! `doc_…`, `rst_…`). The prefix makes IDs self-describing in logs and
//! database rows; v7 keeps them sortable by creation time.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! branded_id {
    ($(#[doc = $doc:literal])* $name:ident, $prefix:literal) => {
        $(#[doc = $doc])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh ID (`{prefix}_{uuid-v7}`).
            #[must_use]
            pub fn generate() -> Self {
                Self(format!(concat!($prefix, "_{}"), Uuid::now_v7()))
            }

            /// Wrap an existing ID string (e.g. read back from storage).
            #[must_use]
            pub fn from_string(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// The ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the string carries this type's prefix.
            #[must_use]
            pub fn has_valid_prefix(&self) -> bool {
                self.0.starts_with(concat!($prefix, "_"))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

branded_id!(
    /// A registered user account.
    UserId,
    "usr"
);

branded_id!(
    /// A generated document/artifact.
    DocumentId,
    "doc"
);

branded_id!(
    /// A password-reset token record.
    ResetTokenId,
    "rst"
);

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_has_prefix() {
        assert!(UserId::generate().as_str().starts_with("usr_"));
        assert!(DocumentId::generate().as_str().starts_with("doc_"));
        assert!(ResetTokenId::generate().as_str().starts_with("rst_"));
    }

    #[test]
    fn generate_is_unique() {
        assert_ne!(DocumentId::generate(), DocumentId::generate());
    }

    #[test]
    fn ids_sort_by_creation_time() {
        // UUID v7 embeds a millisecond timestamp, so later IDs sort after
        // earlier ones lexicographically.
        let a = DocumentId::generate();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = DocumentId::generate();
        assert!(a.as_str() < b.as_str());
    }

    #[test]
    fn from_string_round_trip() {
        let id = DocumentId::from_string("doc_abc");
        assert_eq!(id.as_str(), "doc_abc");
        assert_eq!(String::from(id), "doc_abc");
    }

    #[test]
    fn prefix_validation() {
        assert!(UserId::from_string("usr_123").has_valid_prefix());
        assert!(!UserId::from_string("doc_123").has_valid_prefix());
    }

    #[test]
    fn serde_is_transparent() {
        let id = DocumentId::from_string("doc_42");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""doc_42""#);
        let back: DocumentId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn display_matches_inner() {
        let id = UserId::from_string("usr_x");
        assert_eq!(id.to_string(), "usr_x");
    }
}

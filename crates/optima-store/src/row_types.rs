//! Row structs returned by repositories.

use serde::{Deserialize, Serialize};

/// A user account row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserRow {
    /// Branded ID (`usr_…`).
    pub id: String,
    /// Unique email address (stored lowercased).
    pub email: String,
    /// Argon2 password hash (PHC string).
    pub password_hash: String,
    /// RFC 3339 creation time.
    pub created_at: String,
    /// RFC 3339 last update time.
    pub updated_at: String,
}

/// A generated document row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRow {
    /// Branded ID (`doc_…`).
    pub id: String,
    /// Document kind (`text`, `svg`, `diagram`, `image`).
    pub kind: String,
    /// Title the document was created with.
    pub title: String,
    /// Final generated content.
    pub content: String,
    /// Owning user, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// RFC 3339 creation time.
    pub created_at: String,
    /// RFC 3339 last update time.
    pub updated_at: String,
}

/// A password-reset token record.
///
/// Only the SHA-256 of the token is stored; the token itself travels in the
/// emailed link and is never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResetTokenRow {
    /// Branded ID (`rst_…`).
    pub id: String,
    /// Owning user ID.
    pub user_id: String,
    /// SHA-256 hex of the issued token.
    pub token_hash: String,
    /// RFC 3339 expiry time.
    pub expires_at: String,
    /// Whether the token has already been used.
    pub consumed: bool,
    /// RFC 3339 creation time.
    pub created_at: String,
}

//! User repository.

use optima_core::ids::UserId;
use rusqlite::{Connection, OptionalExtension, params};

use crate::errors::{Result, StoreError};
use crate::row_types::UserRow;

/// User repository — stateless, every method takes `&Connection`.
pub struct UserRepo;

impl UserRepo {
    /// Create a user. Email is stored lowercased; duplicates are a conflict.
    pub fn create(conn: &Connection, email: &str, password_hash: &str) -> Result<UserRow> {
        let id = UserId::generate();
        let email = email.trim().to_lowercase();
        let now = chrono::Utc::now().to_rfc3339();

        let inserted = conn.execute(
            "INSERT OR IGNORE INTO users (id, email, password_hash, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![id.as_str(), email, password_hash, now],
        )?;
        if inserted == 0 {
            return Err(StoreError::Conflict {
                message: format!("email already registered: {email}"),
            });
        }

        Ok(UserRow {
            id: id.into(),
            email,
            password_hash: password_hash.to_owned(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Look up a user by email (case-insensitive).
    pub fn get_by_email(conn: &Connection, email: &str) -> Result<Option<UserRow>> {
        let row = conn
            .query_row(
                "SELECT id, email, password_hash, created_at, updated_at
                 FROM users WHERE email = ?1",
                params![email.trim().to_lowercase()],
                Self::map_row,
            )
            .optional()?;
        Ok(row)
    }

    /// Look up a user by ID.
    pub fn get_by_id(conn: &Connection, user_id: &str) -> Result<Option<UserRow>> {
        let row = conn
            .query_row(
                "SELECT id, email, password_hash, created_at, updated_at
                 FROM users WHERE id = ?1",
                params![user_id],
                Self::map_row,
            )
            .optional()?;
        Ok(row)
    }

    /// Replace a user's password hash. Returns `false` if the user is gone.
    pub fn update_password_hash(
        conn: &Connection,
        user_id: &str,
        password_hash: &str,
    ) -> Result<bool> {
        let now = chrono::Utc::now().to_rfc3339();
        let changed = conn.execute(
            "UPDATE users SET password_hash = ?1, updated_at = ?2 WHERE id = ?3",
            params![password_hash, now, user_id],
        )?;
        Ok(changed > 0)
    }

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
        Ok(UserRow {
            id: row.get(0)?,
            email: row.get(1)?,
            password_hash: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

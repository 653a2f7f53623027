//! Password-reset token repository.
//!
//! Only the SHA-256 of a token is stored, so a database leak cannot be
//! replayed into working reset links. Consumption is a guarded UPDATE:
//! a token can be consumed exactly once.

use optima_core::ids::ResetTokenId;
use rusqlite::{Connection, OptionalExtension, params};

use crate::errors::Result;
use crate::row_types::ResetTokenRow;

/// Reset-token repository — stateless, every method takes `&Connection`.
pub struct ResetTokenRepo;

impl ResetTokenRepo {
    /// Record a newly issued token hash with its expiry.
    pub fn insert(
        conn: &Connection,
        user_id: &str,
        token_hash: &str,
        expires_at: &chrono::DateTime<chrono::Utc>,
    ) -> Result<ResetTokenRow> {
        let id = ResetTokenId::generate();
        let now = chrono::Utc::now().to_rfc3339();
        let expires = expires_at.to_rfc3339();

        let _ = conn.execute(
            "INSERT INTO reset_tokens (id, user_id, token_hash, expires_at, consumed, created_at)
             VALUES (?1, ?2, ?3, ?4, 0, ?5)",
            params![id.as_str(), user_id, token_hash, expires, now],
        )?;

        Ok(ResetTokenRow {
            id: id.into(),
            user_id: user_id.to_owned(),
            token_hash: token_hash.to_owned(),
            expires_at: expires,
            consumed: false,
            created_at: now,
        })
    }

    /// Fetch a token record by hash only if it is unconsumed and unexpired.
    pub fn get_valid(conn: &Connection, token_hash: &str) -> Result<Option<ResetTokenRow>> {
        let now = chrono::Utc::now().to_rfc3339();
        let row = conn
            .query_row(
                "SELECT id, user_id, token_hash, expires_at, consumed, created_at
                 FROM reset_tokens
                 WHERE token_hash = ?1 AND consumed = 0 AND expires_at > ?2",
                params![token_hash, now],
                Self::map_row,
            )
            .optional()?;
        Ok(row)
    }

    /// Mark a token consumed. Returns `false` if it was already consumed
    /// (or never existed) — callers treat that as an invalid token.
    pub fn consume(conn: &Connection, token_hash: &str) -> Result<bool> {
        let changed = conn.execute(
            "UPDATE reset_tokens SET consumed = 1 WHERE token_hash = ?1 AND consumed = 0",
            params![token_hash],
        )?;
        Ok(changed > 0)
    }

    /// Delete expired rows. Returns the count removed.
    pub fn purge_expired(conn: &Connection) -> Result<usize> {
        let now = chrono::Utc::now().to_rfc3339();
        let removed = conn.execute(
            "DELETE FROM reset_tokens WHERE expires_at <= ?1",
            params![now],
        )?;
        Ok(removed)
    }

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ResetTokenRow> {
        Ok(ResetTokenRow {
            id: row.get(0)?,
            user_id: row.get(1)?,
            token_hash: row.get(2)?,
            expires_at: row.get(3)?,
            consumed: row.get::<_, i64>(4)? != 0,
            created_at: row.get(5)?,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use super::*;
    use crate::migrations::run_migrations;
    use crate::repositories::UserRepo;
    use chrono::{Duration, Utc};

    fn setup() -> (Connection, String) {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();
        let user = UserRepo::create(&conn, "dave@example.com", "hash").unwrap();
        (conn, user.id)
    }

    #[test]
    fn insert_and_get_valid() {
        let (conn, user_id) = setup();
        let expires = Utc::now() + Duration::hours(1);
        ResetTokenRepo::insert(&conn, &user_id, "hash-abc", &expires).unwrap();

        let row = ResetTokenRepo::get_valid(&conn, "hash-abc").unwrap().unwrap();
        assert_eq!(row.user_id, user_id);
        assert!(!row.consumed);
    }

    #[test]
    fn expired_token_is_not_valid() {
        let (conn, user_id) = setup();
        let expires = Utc::now() - Duration::minutes(1);
        ResetTokenRepo::insert(&conn, &user_id, "hash-old", &expires).unwrap();

        assert!(ResetTokenRepo::get_valid(&conn, "hash-old").unwrap().is_none());
    }

    #[test]
    fn consume_succeeds_once() {
        let (conn, user_id) = setup();
        let expires = Utc::now() + Duration::hours(1);
        ResetTokenRepo::insert(&conn, &user_id, "hash-x", &expires).unwrap();

        assert!(ResetTokenRepo::consume(&conn, "hash-x").unwrap());
        // Second consume fails
        assert!(!ResetTokenRepo::consume(&conn, "hash-x").unwrap());
        // And the token is no longer valid
        assert!(ResetTokenRepo::get_valid(&conn, "hash-x").unwrap().is_none());
    }

    #[test]
    fn consume_unknown_hash() {
        let (conn, _) = setup();
        assert!(!ResetTokenRepo::consume(&conn, "hash-missing").unwrap());
    }

    #[test]
    fn purge_expired_removes_only_stale_rows() {
        let (conn, user_id) = setup();
        ResetTokenRepo::insert(&conn, &user_id, "live", &(Utc::now() + Duration::hours(1)))
            .unwrap();
        ResetTokenRepo::insert(&conn, &user_id, "dead", &(Utc::now() - Duration::hours(1)))
            .unwrap();

        assert_eq!(ResetTokenRepo::purge_expired(&conn).unwrap(), 1);
        assert!(ResetTokenRepo::get_valid(&conn, "live").unwrap().is_some());
    }

    #[test]
    fn deleting_user_cascades_tokens() {
        let (conn, user_id) = setup();
        ResetTokenRepo::insert(&conn, &user_id, "h", &(Utc::now() + Duration::hours(1)))
            .unwrap();

        conn.execute("DELETE FROM users WHERE id = ?1", params![user_id])
            .unwrap();
        assert!(ResetTokenRepo::get_valid(&conn, "h").unwrap().is_none());
    }
}

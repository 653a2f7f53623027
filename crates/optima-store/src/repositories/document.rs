//! Document repository.

use rusqlite::{Connection, OptionalExtension, params};

use crate::errors::Result;
use crate::row_types::DocumentRow;

/// Document repository — stateless, every method takes `&Connection`.
pub struct DocumentRepo;

impl DocumentRepo {
    /// Insert a new document with its final content.
    pub fn insert(
        conn: &Connection,
        id: &str,
        kind: &str,
        title: &str,
        content: &str,
        user_id: Option<&str>,
    ) -> Result<DocumentRow> {
        let now = chrono::Utc::now().to_rfc3339();
        let _ = conn.execute(
            "INSERT INTO documents (id, kind, title, content, user_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![id, kind, title, content, user_id, now],
        )?;
        Ok(DocumentRow {
            id: id.to_owned(),
            kind: kind.to_owned(),
            title: title.to_owned(),
            content: content.to_owned(),
            user_id: user_id.map(str::to_owned),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Replace a document's content. Returns `false` if the row is gone.
    pub fn update_content(conn: &Connection, id: &str, content: &str) -> Result<bool> {
        let now = chrono::Utc::now().to_rfc3339();
        let changed = conn.execute(
            "UPDATE documents SET content = ?1, updated_at = ?2 WHERE id = ?3",
            params![content, now, id],
        )?;
        Ok(changed > 0)
    }

    /// Look up a document by ID.
    pub fn get_by_id(conn: &Connection, id: &str) -> Result<Option<DocumentRow>> {
        let row = conn
            .query_row(
                "SELECT id, kind, title, content, user_id, created_at, updated_at
                 FROM documents WHERE id = ?1",
                params![id],
                Self::map_row,
            )
            .optional()?;
        Ok(row)
    }

    /// Most recently updated documents, newest first.
    pub fn list_recent(conn: &Connection, limit: u32) -> Result<Vec<DocumentRow>> {
        let mut stmt = conn.prepare(
            "SELECT id, kind, title, content, user_id, created_at, updated_at
             FROM documents ORDER BY updated_at DESC LIMIT ?1",
        )?;
        let rows = stmt
            .query_map(params![limit], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DocumentRow> {
        Ok(DocumentRow {
            id: row.get(0)?,
            kind: row.get(1)?,
            title: row.get(2)?,
            content: row.get(3)?,
            user_id: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
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

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn insert_and_get() {
        let conn = setup();
        DocumentRepo::insert(&conn, "doc_1", "svg", "Logo", "<svg/>", None).unwrap();

        let doc = DocumentRepo::get_by_id(&conn, "doc_1").unwrap().unwrap();
        assert_eq!(doc.kind, "svg");
        assert_eq!(doc.title, "Logo");
        assert_eq!(doc.content, "<svg/>");
        assert!(doc.user_id.is_none());
    }

    #[test]
    fn update_content() {
        let conn = setup();
        DocumentRepo::insert(&conn, "doc_1", "text", "Essay", "draft", None).unwrap();

        assert!(DocumentRepo::update_content(&conn, "doc_1", "final").unwrap());
        let doc = DocumentRepo::get_by_id(&conn, "doc_1").unwrap().unwrap();
        assert_eq!(doc.content, "final");
    }

    #[test]
    fn update_unknown_document() {
        let conn = setup();
        assert!(!DocumentRepo::update_content(&conn, "doc_missing", "x").unwrap());
    }

    #[test]
    fn get_unknown_is_none() {
        let conn = setup();
        assert!(DocumentRepo::get_by_id(&conn, "doc_nope").unwrap().is_none());
    }

    #[test]
    fn list_recent_orders_by_update() {
        let conn = setup();
        DocumentRepo::insert(&conn, "doc_a", "text", "A", "", None).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        DocumentRepo::insert(&conn, "doc_b", "text", "B", "", None).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        DocumentRepo::update_content(&conn, "doc_a", "bumped").unwrap();

        let docs = DocumentRepo::list_recent(&conn, 10).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, "doc_a");
        assert_eq!(docs[1].id, "doc_b");
    }

    #[test]
    fn list_recent_respects_limit() {
        let conn = setup();
        for i in 0..5 {
            DocumentRepo::insert(&conn, &format!("doc_{i}"), "text", "T", "", None).unwrap();
        }
        assert_eq!(DocumentRepo::list_recent(&conn, 3).unwrap().len(), 3);
    }
}

//! Connection pool.

use std::path::Path;

use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

use crate::errors::Result;
use crate::migrations::run_migrations;

/// Pooled SQLite handle shared by the server.
#[derive(Clone)]
pub struct StorePool {
    pool: r2d2::Pool<SqliteConnectionManager>,
}

impl StorePool {
    /// Open (or create) the database at `path`, run migrations, and build
    /// the pool. Every connection gets WAL mode and foreign keys enabled.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let manager = SqliteConnectionManager::file(path).with_init(|conn| {
            conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA foreign_keys = ON;")
        });
        Self::build(manager)
    }

    /// In-memory pool for tests. A single connection keeps the shared
    /// in-memory database alive for the pool's lifetime.
    pub fn open_in_memory() -> Result<Self> {
        let manager = SqliteConnectionManager::memory()
            .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
        let pool = r2d2::Pool::builder().max_size(1).build(manager)?;
        {
            let conn = pool.get()?;
            run_migrations(&conn)?;
        }
        Ok(Self { pool })
    }

    fn build(manager: SqliteConnectionManager) -> Result<Self> {
        let pool = r2d2::Pool::builder().build(manager)?;
        {
            let conn = pool.get()?;
            run_migrations(&conn)?;
        }
        Ok(Self { pool })
    }

    /// Check out a connection.
    pub fn get(&self) -> Result<r2d2::PooledConnection<SqliteConnectionManager>> {
        Ok(self.pool.get()?)
    }

    /// Run a closure with a checked-out connection.
    pub fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self.get()?;
        f(&conn)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_pool_migrated() {
        let pool = StorePool::open_in_memory().unwrap();
        let version: i64 = pool
            .with_conn(|conn| {
                Ok(conn
                    .query_row("PRAGMA user_version", [], |row| row.get(0))
                    .unwrap())
            })
            .unwrap();
        assert!(version >= 1);
    }

    #[test]
    fn file_pool_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("optima.db");
        let pool = StorePool::open(&path).unwrap();
        assert!(path.exists());
        drop(pool);
    }

    #[test]
    fn with_conn_passes_through_result() {
        let pool = StorePool::open_in_memory().unwrap();
        let n = pool
            .with_conn(|conn| Ok(conn.query_row("SELECT 41 + 1", [], |r| r.get::<_, i64>(0))?))
            .unwrap();
        assert_eq!(n, 42);
    }
}

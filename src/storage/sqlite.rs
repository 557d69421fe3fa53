//! SQLite Document Store
//!
//! Default local backend: pooled connections, WAL mode, JSON-encoded
//! entity lists and embeddings, upsert keyed by `relative_path`.

use std::path::Path;

use async_trait::async_trait;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, params};
use tracing::{debug, warn};

use super::PersistenceGateway;
use crate::types::{FileAnalysis, Result, WikiError};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS file_analysis (
    relative_path    TEXT PRIMARY KEY,
    classes          TEXT NOT NULL,
    functions        TEXT NOT NULL,
    summary          TEXT NOT NULL,
    chunk_embeddings TEXT NOT NULL,
    updated_at       TEXT NOT NULL DEFAULT (datetime('now'))
);
";

pub struct SqliteStore {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteStore {
    /// Open (or create) the database file, creating parent directories as
    /// needed, and ensure the schema exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let manager = SqliteConnectionManager::file(path).with_init(Self::configure_connection);
        Self::from_manager(manager, 4)
    }

    /// In-memory store for tests. A single pooled connection keeps every
    /// caller on the same database.
    pub fn open_in_memory() -> Result<Self> {
        let manager = SqliteConnectionManager::memory().with_init(Self::configure_connection);
        Self::from_manager(manager, 1)
    }

    fn from_manager(manager: SqliteConnectionManager, max_size: u32) -> Result<Self> {
        let pool = Pool::builder()
            .max_size(max_size)
            .build(manager)
            .map_err(|e| WikiError::Store(format!("failed to build connection pool: {}", e)))?;

        let store = Self { pool };
        store.conn()?.execute_batch(SCHEMA)?;
        Ok(store)
    }

    /// Configure a new connection with production-ready settings.
    fn configure_connection(conn: &mut Connection) -> std::result::Result<(), rusqlite::Error> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        Ok(())
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>> {
        self.pool
            .get()
            .map_err(|e| WikiError::Store(format!("failed to get connection: {}", e)))
    }

    /// Insert or replace one analysis record.
    pub fn upsert(&self, analysis: &FileAnalysis) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO file_analysis (relative_path, classes, functions, summary, chunk_embeddings)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(relative_path) DO UPDATE SET
                 classes = excluded.classes,
                 functions = excluded.functions,
                 summary = excluded.summary,
                 chunk_embeddings = excluded.chunk_embeddings,
                 updated_at = datetime('now')",
            params![
                analysis.relative_path,
                serde_json::to_string(&analysis.classes)?,
                serde_json::to_string(&analysis.functions)?,
                analysis.summary,
                serde_json::to_string(&analysis.chunk_embeddings)?,
            ],
        )?;
        Ok(())
    }

    /// Load one record by its relative path.
    pub fn load(&self, relative_path: &str) -> Result<Option<FileAnalysis>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT relative_path, classes, functions, summary, chunk_embeddings
             FROM file_analysis WHERE relative_path = ?1",
        )?;

        let mut rows = stmt.query_map(params![relative_path], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let Some(row) = rows.next() else {
            return Ok(None);
        };
        let (relative_path, classes, functions, summary, chunk_embeddings) = row?;

        Ok(Some(FileAnalysis {
            relative_path,
            classes: serde_json::from_str(&classes)?,
            functions: serde_json::from_str(&functions)?,
            summary,
            chunk_embeddings: serde_json::from_str(&chunk_embeddings)?,
        }))
    }

    /// Number of stored records.
    pub fn count(&self) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM file_analysis", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[async_trait]
impl PersistenceGateway for SqliteStore {
    async fn persist(&self, batch: &[FileAnalysis]) -> Result<usize> {
        let mut stored = 0usize;
        for analysis in batch {
            match self.upsert(analysis) {
                Ok(()) => {
                    debug!("Stored {}", analysis.relative_path);
                    stored += 1;
                }
                Err(e) => warn!("Failed to store {}: {}", analysis.relative_path, e),
            }
        }
        Ok(stored)
    }

    fn name(&self) -> &str {
        "sqlite"
    }
}

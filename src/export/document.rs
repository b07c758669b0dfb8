//! SQLite document store
//!
//! Each crawl result is stored as one JSON document tagged with a collection
//! name, so several runs can share a database file.

use super::schema::initialize_schema;
use super::{ExportResult, ExportSink};
use crate::model::{CrawlResult, Place};
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::Path;

/// Stores results as JSON documents in SQLite
pub struct DocumentSink {
    conn: Connection,
    collection: String,
}

impl DocumentSink {
    /// Opens (or creates) the database at `path`
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    /// * `collection` - Collection name attached to every stored document
    pub fn open(path: &Path, collection: impl Into<String>) -> ExportResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;
        initialize_schema(&conn)?;

        Ok(Self {
            conn,
            collection: collection.into(),
        })
    }

    /// Creates an in-memory store
    pub fn open_in_memory(collection: impl Into<String>) -> ExportResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn,
            collection: collection.into(),
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Number of documents in this sink's collection
    pub fn count(&self) -> ExportResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM documents WHERE collection = ?1",
            params![self.collection],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Loads every document of this sink's collection, oldest first
    pub fn load_all(&self) -> ExportResult<Vec<CrawlResult>> {
        let mut stmt = self
            .conn
            .prepare("SELECT body FROM documents WHERE collection = ?1 ORDER BY id")?;

        let bodies = stmt
            .query_map(params![self.collection], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        bodies
            .iter()
            .map(|body| serde_json::from_str(body).map_err(Into::into))
            .collect()
    }
}

impl ExportSink for DocumentSink {
    fn name(&self) -> &'static str {
        "database"
    }

    fn export(&mut self, place: &Place, result: &CrawlResult) -> ExportResult<()> {
        let body = serde_json::to_string(result)?;
        self.conn.execute(
            "INSERT INTO documents (collection, title, place_name, place_id, body, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                self.collection,
                result.title,
                place.name,
                place.external_id,
                body,
                Utc::now().to_rfc3339()
            ],
        )?;
        tracing::debug!(collection = %self.collection, "Document saved");
        Ok(())
    }
}

//! Export sink trait and error types

use crate::model::{CrawlResult, Place};
use thiserror::Error;

/// Errors that can occur while writing a crawl result
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("SQLite error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// A destination for crawl results
///
/// Sinks are called once per crawled place, in sequence. A sink may keep
/// state between calls (an open connection, files it already created).
pub trait ExportSink: Send {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Writes one result
    ///
    /// # Arguments
    ///
    /// * `place` - The place the result belongs to (supplies ids for CSV rows)
    /// * `result` - The crawl result
    fn export(&mut self, place: &Place, result: &CrawlResult) -> ExportResult<()>;
}

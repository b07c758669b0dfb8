//! Export sinks for crawl results
//!
//! - `JsonFileSink`: one JSON document per place
//! - `CsvSink`: place, activity and review tables as CSV
//! - `DocumentSink`: JSON documents in a SQLite collection

mod csv_files;
mod document;
mod json_file;
mod schema;
mod traits;

pub use csv_files::{
    CsvSink, ACTIVITIES_FILE, ACTIVITIES_HEADER, BNB_FILE, BNB_HEADER, REVIEWS_DIR,
    REVIEWS_HEADER,
};
pub use document::DocumentSink;
pub use json_file::JsonFileSink;
pub use traits::{ExportError, ExportResult, ExportSink};

use crate::config::{OutputConfig, SinkKind};
use std::path::Path;

/// Builds the sinks named in the output configuration, in configured order
///
/// # Returns
///
/// * `Ok(Vec<Box<dyn ExportSink>>)` - One sink per configured kind
/// * `Err(ExportError)` - The document store could not be opened
pub fn build_sinks(config: &OutputConfig) -> ExportResult<Vec<Box<dyn ExportSink>>> {
    let mut sinks: Vec<Box<dyn ExportSink>> = Vec::with_capacity(config.sinks.len());

    for kind in &config.sinks {
        let sink: Box<dyn ExportSink> = match kind {
            SinkKind::Json => Box::new(JsonFileSink::new(&config.results_dir)),
            SinkKind::Csv => Box::new(CsvSink::new(&config.results_dir)),
            SinkKind::Database => Box::new(DocumentSink::open(
                Path::new(&config.database_path),
                config.collection.clone(),
            )?),
        };
        sinks.push(sink);
    }

    Ok(sinks)
}

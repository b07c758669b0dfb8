//! CSV input of known places
//!
//! The input file has a header row. The first column holds the source id of
//! each place; `p_latitude`, `p_longitude` and `bnb_name` are looked up by
//! header name. Rows whose `bnb_name` is the literal `NULL` are skipped; every
//! other row is kept in file order, even when its coordinates are unreadable.

use crate::model::Place;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

pub const LATITUDE_COLUMN: &str = "p_latitude";
pub const LONGITUDE_COLUMN: &str = "p_longitude";
pub const NAME_COLUMN: &str = "bnb_name";

/// Marker used by the source data for rows without a place
const NULL_MARKER: &str = "NULL";

/// Errors that can occur while reading the input CSV
#[derive(Debug, Error)]
pub enum InputError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input is missing required column '{0}'")]
    MissingColumn(String),
}

/// One kept row of the input file
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    pub source_id: String,
    /// `None` when the cell is not a number (for example `NULL`)
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub bnb_name: String,
}

impl SourceRow {
    /// The row's position, if both coordinates are readable
    pub fn coordinate(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    /// Converts the row into a crawlable place
    pub fn to_place(&self, external_id: Option<String>) -> Place {
        Place {
            name: self.bnb_name.clone(),
            external_id,
            source_id: Some(self.source_id.clone()),
        }
    }
}

/// Rows to crawl, in file order, plus how many were left out
#[derive(Debug, Clone, Default)]
pub struct SourceQueue {
    pub rows: Vec<SourceRow>,
    pub skipped: usize,
}

/// Reads the input CSV at `path`
pub fn load_source_csv(path: &Path) -> Result<SourceQueue, InputError> {
    let file = std::fs::File::open(path)?;
    let queue = read_source_rows(file)?;
    tracing::info!(
        rows = queue.rows.len(),
        skipped = queue.skipped,
        "Loaded input from {}",
        path.display()
    );
    Ok(queue)
}

/// Reads source rows from any CSV reader
///
/// # Returns
///
/// * `Ok(SourceQueue)` - Every row except `NULL` rows, in order; `NULL` rows
///   are counted in `skipped`
/// * `Err(InputError::MissingColumn)` - A required header is absent
pub fn read_source_rows<R: Read>(reader: R) -> Result<SourceQueue, InputError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    if headers.is_empty() || headers[0].is_empty() {
        return Err(InputError::MissingColumn("source id".to_string()));
    }
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| InputError::MissingColumn(name.to_string()))
    };
    let lat_idx = column(LATITUDE_COLUMN)?;
    let lng_idx = column(LONGITUDE_COLUMN)?;
    let name_idx = column(NAME_COLUMN)?;

    let mut queue = SourceQueue::default();
    for (line, record) in csv_reader.records().enumerate() {
        let record = record?;
        let field = |idx: usize| record.get(idx).unwrap_or("");

        let bnb_name = field(name_idx);
        if bnb_name == NULL_MARKER {
            queue.skipped += 1;
            continue;
        }

        let latitude = field(lat_idx).parse::<f64>().ok();
        let longitude = field(lng_idx).parse::<f64>().ok();
        if latitude.is_none() || longitude.is_none() {
            tracing::debug!(row = line + 2, place = bnb_name, "Row has unreadable coordinates");
        }

        queue.rows.push(SourceRow {
            source_id: field(0).to_string(),
            latitude,
            longitude,
            bnb_name: bnb_name.to_string(),
        });
    }

    Ok(queue)
}

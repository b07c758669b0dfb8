//! CSV export in the layout downstream spreadsheets expect
//!
//! - `bnb.csv`: one row per place (appended)
//! - `bnb_things_to_do.csv`: one row per activity (appended)
//! - `reviews/<title-key>.csv`: the reviews of one place (overwritten)
//!
//! Every file starts with a UTF-8 byte order mark so spreadsheet tools pick
//! the right encoding for the Chinese text.

use super::{ExportResult, ExportSink};
use crate::model::{CrawlResult, Place};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const BNB_FILE: &str = "bnb.csv";
pub const ACTIVITIES_FILE: &str = "bnb_things_to_do.csv";
pub const REVIEWS_DIR: &str = "reviews";

pub const BNB_HEADER: [&str; 10] = [
    "p_bnb_id",
    "r5",
    "r4",
    "r3",
    "r2",
    "r1",
    "r_avg",
    "total_review",
    "location_summary",
    "location_summary_rating",
];
pub const ACTIVITIES_HEADER: [&str; 5] = ["p_bnb_id", "name", "rating", "total_review", "description"];
pub const REVIEWS_HEADER: [&str; 6] = ["p_bnb_id", "bnb_name", "c_id", "c_author", "c_rating", "c_content"];

const BOM: &str = "\u{feff}";

/// Writes results into the three CSV files under one directory
pub struct CsvSink {
    dir: PathBuf,
}

impl CsvSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the per-place reviews file
    pub fn reviews_path(&self, result: &CrawlResult) -> PathBuf {
        self.dir
            .join(REVIEWS_DIR)
            .join(format!("{}.csv", result.file_key()))
    }

    fn write_bnb(&self, id: &str, result: &CrawlResult) -> ExportResult<()> {
        let rating = &result.bnb.rating;
        let location = &result.bnb.location;
        let row = vec![
            id.to_string(),
            rating.r5.to_string(),
            rating.r4.to_string(),
            rating.r3.to_string(),
            rating.r2.to_string(),
            rating.r1.to_string(),
            rating.average_rating.to_string(),
            rating.total_review_count.to_string(),
            location.summary_text.clone(),
            location.summary_rating.to_string(),
        ];
        append_rows(&self.dir.join(BNB_FILE), &BNB_HEADER, vec![row])
    }

    fn write_activities(&self, id: &str, result: &CrawlResult) -> ExportResult<()> {
        let rows = result
            .activities
            .iter()
            .map(|item| {
                vec![
                    id.to_string(),
                    item.name.clone(),
                    item.rating.to_string(),
                    item.total_review_count.to_string(),
                    single_line(&item.description),
                ]
            })
            .collect();
        append_rows(&self.dir.join(ACTIVITIES_FILE), &ACTIVITIES_HEADER, rows)
    }

    fn write_reviews(&self, place: &Place, id: &str, result: &CrawlResult) -> ExportResult<()> {
        fs::create_dir_all(self.dir.join(REVIEWS_DIR))?;

        let mut file = File::create(self.reviews_path(result))?;
        file.write_all(BOM.as_bytes())?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record(REVIEWS_HEADER)?;
        for (index, review) in result.reviews.iter().enumerate() {
            writer.write_record([
                id,
                place.name.as_str(),
                index.to_string().as_str(),
                review.author.as_str(),
                review.rating.to_string().as_str(),
                single_line(&review.content).as_str(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl ExportSink for CsvSink {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn export(&mut self, place: &Place, result: &CrawlResult) -> ExportResult<()> {
        fs::create_dir_all(&self.dir)?;
        let id = place.export_id();

        self.write_bnb(id, result)?;
        self.write_activities(id, result)?;
        self.write_reviews(place, id, result)?;
        Ok(())
    }
}

/// Appends rows, writing the BOM and header first if the file is new
fn append_rows(path: &Path, header: &[&str], rows: Vec<Vec<String>>) -> ExportResult<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let fresh = file.metadata()?.len() == 0;
    if fresh {
        file.write_all(BOM.as_bytes())?;
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    if fresh {
        writer.write_record(header)?;
    }
    for row in rows {
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

fn single_line(text: &str) -> String {
    text.replace("\r\n", " ").replace('\n', " ")
}

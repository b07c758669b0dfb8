//! Data model for crawled places
//!
//! These are the records produced by the extractors and handed to the
//! export sinks. Field names on the wire (`data`, `bnb`, `ttd`, `r_avg`, ...)
//! match the JSON documents the crawler has always written, so existing
//! consumers keep working.

use serde::{Deserialize, Serialize};

/// A point of interest queued for crawling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    /// Display name, used as the search query
    pub name: String,

    /// Provider-assigned place id (absent when the lookup found nothing)
    pub external_id: Option<String>,

    /// Identifier from the input CSV (first column), if the place came from one
    pub source_id: Option<String>,
}

impl Place {
    /// Creates a place discovered through the search API
    pub fn new(name: impl Into<String>, external_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            external_id: Some(external_id.into()),
            source_id: None,
        }
    }

    /// Attaches the source-row identifier
    pub fn with_source_id(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }

    /// Key written into the `p_bnb_id` column of CSV exports
    pub fn export_id(&self) -> &str {
        self.source_id
            .as_deref()
            .or(self.external_id.as_deref())
            .unwrap_or("")
    }
}

/// Star-rating histogram plus the headline numbers of the reviews panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingSnapshot {
    pub r5: u64,
    pub r4: u64,
    pub r3: u64,
    pub r2: u64,
    pub r1: u64,

    #[serde(rename = "r_avg")]
    pub average_rating: f64,

    #[serde(rename = "total_review")]
    pub total_review_count: u64,
}

impl RatingSnapshot {
    /// Sum of the five histogram buckets
    pub fn histogram_total(&self) -> u64 {
        self.r5 + self.r4 + self.r3 + self.r2 + self.r1
    }

    /// Returns true if the histogram sum is within `tolerance` (a fraction of
    /// the advertised total) of `total_review_count`
    ///
    /// The site rounds and caches these numbers independently, so the two
    /// rarely agree exactly.
    pub fn histogram_matches(&self, tolerance: f64) -> bool {
        let total = self.total_review_count as f64;
        let sum = self.histogram_total() as f64;
        if total == 0.0 {
            return sum == 0.0;
        }
        ((sum - total).abs() / total) <= tolerance
    }
}

/// The "location summary" block shown on a place page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationSummary {
    #[serde(rename = "location_summary")]
    pub summary_text: String,

    #[serde(rename = "location_summary_rating")]
    pub summary_rating: f64,
}

/// Rating snapshot and location summary merged into one record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BnbRecord {
    #[serde(flatten)]
    pub rating: RatingSnapshot,

    #[serde(flatten)]
    pub location: LocationSummary,
}

/// A "things to do" suggestion attached to a place
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityItem {
    pub name: String,
    pub rating: f64,

    #[serde(rename = "total_review")]
    pub total_review_count: u64,

    /// Empty when the site shows no description
    pub description: String,
}

/// A single user review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub author: String,
    pub content: String,
    /// Star rating, always within 1..=5
    pub rating: u8,
}

/// Everything collected for one place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlResult {
    /// Page title, also used as the per-place file key
    pub title: String,

    #[serde(rename = "data")]
    pub reviews: Vec<Review>,

    pub bnb: BnbRecord,

    #[serde(rename = "ttd")]
    pub activities: Vec<ActivityItem>,
}

impl CrawlResult {
    /// File-system safe key derived from the page title
    pub fn file_key(&self) -> String {
        file_key(&self.title)
    }
}

/// Replaces characters that are not allowed in file names
pub fn file_key(title: &str) -> String {
    let key: String = title
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if key.is_empty() {
        "untitled".to_string()
    } else {
        key
    }
}

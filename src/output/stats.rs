//! Run summary collection and reporting

use crate::crawler::PlaceOutcome;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Process exit status for a run where every place was exported
pub const EXIT_CLEAN: u8 = 0;

/// Process exit status for a run where at least one place failed
pub const EXIT_PARTIAL: u8 = 2;

/// Tally of one pipeline run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Places handed to the crawler
    pub queued: usize,

    /// Places crawled and exported
    pub succeeded: usize,

    pub crawl_failures: usize,
    pub export_failures: usize,
    pub lookup_failures: usize,

    /// Input rows left out before queueing
    pub skipped_rows: usize,

    /// Failure counts keyed by stage id (`export` and `lookup` for the
    /// failures outside the crawl stages)
    pub failures_by_stage: BTreeMap<String, usize>,

    pub reviews_collected: usize,
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}

impl RunSummary {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            queued: 0,
            succeeded: 0,
            crawl_failures: 0,
            export_failures: 0,
            lookup_failures: 0,
            skipped_rows: 0,
            failures_by_stage: BTreeMap::new(),
            reviews_collected: 0,
        }
    }

    /// Adds the outcome of one place
    pub fn record(&mut self, outcome: &PlaceOutcome) {
        self.queued += 1;
        match outcome {
            PlaceOutcome::Exported { reviews } => {
                self.succeeded += 1;
                self.reviews_collected += reviews;
            }
            PlaceOutcome::LookupFailed => {
                self.lookup_failures += 1;
                self.bump("lookup");
            }
            PlaceOutcome::CrawlFailed(error) => {
                self.crawl_failures += 1;
                let stage = error.stage().map(|s| s.as_str()).unwrap_or(error.kind());
                self.bump(stage);
            }
            PlaceOutcome::ExportFailed(_) => {
                self.export_failures += 1;
                self.bump("export");
            }
        }
    }

    fn bump(&mut self, key: &str) {
        *self.failures_by_stage.entry(key.to_string()).or_insert(0) += 1;
    }

    /// Marks the run as finished
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn failed(&self) -> usize {
        self.crawl_failures + self.export_failures + self.lookup_failures
    }

    /// True when every queued place was exported
    pub fn is_clean(&self) -> bool {
        self.failed() == 0
    }

    /// Percentage of queued places that were exported
    pub fn success_rate(&self) -> f64 {
        if self.queued == 0 {
            return 100.0;
        }
        (self.succeeded as f64 / self.queued as f64) * 100.0
    }

    /// Exit status the process should report for this run
    pub fn exit_status(&self) -> u8 {
        if self.is_clean() {
            EXIT_CLEAN
        } else {
            EXIT_PARTIAL
        }
    }

    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

/// Prints the run summary to stdout
pub fn print_summary(summary: &RunSummary) {
    println!("=== Run Summary ===\n");

    println!("Overview:");
    println!("  Places queued: {}", summary.queued);
    println!("  Exported: {}", summary.succeeded);
    println!("  Reviews collected: {}", summary.reviews_collected);
    if summary.skipped_rows > 0 {
        println!("  Input rows skipped: {}", summary.skipped_rows);
    }
    if let Some(seconds) = summary.duration_seconds() {
        println!("  Duration: {}s", seconds);
    }
    println!();

    if !summary.is_clean() {
        println!("Failures:");
        println!("  Crawl: {}", summary.crawl_failures);
        println!("  Export: {}", summary.export_failures);
        println!("  Lookup: {}", summary.lookup_failures);
        println!();

        println!("Failures by Stage:");
        let mut counts: Vec<_> = summary.failures_by_stage.iter().collect();
        counts.sort_by(|a, b| b.1.cmp(a.1));
        for (stage, count) in counts {
            println!("  {}: {}", stage, count);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} places exported)",
        summary.success_rate(),
        summary.succeeded,
        summary.queued
    );
}

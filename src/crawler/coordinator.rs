//! Crawler coordinator - sequential orchestration of a run
//!
//! The coordinator owns everything that lives for the length of a run: the
//! browser page, the result cache, the export sinks and the run summary.
//! Places are processed one at a time. A failure for one place is logged and
//! tallied, and the loop moves on to the next place.

use crate::browser::PageDriver;
use crate::config::Config;
use crate::crawler::{crawl_place, ResultCache};
use crate::export::ExportSink;
use crate::input::SourceQueue;
use crate::model::Place;
use crate::output::RunSummary;
use crate::search::PlacesClient;
use crate::CrawlerError;
use std::sync::Arc;

/// What happened to one queued place
#[derive(Debug)]
pub enum PlaceOutcome {
    /// Crawled and written to every sink
    Exported { reviews: usize },

    /// No provider id, so the place was never opened
    LookupFailed,

    /// The crawl aborted; nothing was exported
    CrawlFailed(CrawlerError),

    /// The crawl succeeded but at least one sink failed
    ExportFailed(CrawlerError),
}

impl PlaceOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Exported { .. })
    }
}

/// Main crawler coordinator structure
pub struct Coordinator<D: PageDriver> {
    config: Arc<Config>,
    driver: D,
    cache: ResultCache,
    sinks: Vec<Box<dyn ExportSink>>,
    summary: RunSummary,
}

impl<D: PageDriver> Coordinator<D> {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `driver` - The page all places are crawled in
    /// * `sinks` - Export destinations, written in order
    pub fn new(config: Arc<Config>, driver: D, sinks: Vec<Box<dyn ExportSink>>) -> Self {
        Self {
            config,
            driver,
            cache: ResultCache::new(),
            sinks,
            summary: RunSummary::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// Crawls and exports one place
    ///
    /// The outcome is also recorded in the run summary.
    pub async fn process_place(&mut self, place: &Place) -> PlaceOutcome {
        let outcome = self.crawl_and_export(place).await;
        self.summary.record(&outcome);
        outcome
    }

    async fn crawl_and_export(&mut self, place: &Place) -> PlaceOutcome {
        if place.external_id.is_none() {
            let error = CrawlerError::Lookup {
                name: place.name.clone(),
            };
            tracing::warn!(place = %place.name, "Skipping place: {}", error);
            return PlaceOutcome::LookupFailed;
        }

        tracing::info!(place = %place.name, "Crawling place");
        let result = match crawl_place(&mut self.driver, &self.config.crawler, place).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(
                    place = %place.name,
                    stage = e.stage().map(|s| s.as_str()).unwrap_or("-"),
                    "Crawl failed: {}",
                    e
                );
                return PlaceOutcome::CrawlFailed(e);
            }
        };

        let reviews = result.reviews.len();
        self.cache.store(result);

        match self.cache.export_all(place, &mut self.sinks) {
            Ok(()) => PlaceOutcome::Exported { reviews },
            Err(e) => PlaceOutcome::ExportFailed(e),
        }
    }

    /// Processes `places` in order
    pub async fn run_queue(&mut self, places: &[Place]) {
        for (index, place) in places.iter().enumerate() {
            tracing::debug!("Place {} of {}", index + 1, places.len());
            self.process_place(place).await;
        }
    }

    /// Crawls every row of a CSV input, resolving provider ids first
    ///
    /// A row whose lookup fails (no candidate, a search error, no usable
    /// coordinates or name) is counted as a lookup failure and skipped.
    pub async fn run_csv(&mut self, queue: &SourceQueue, client: &PlacesClient) {
        self.summary.skipped_rows += queue.skipped;
        tracing::info!(
            places = queue.rows.len(),
            skipped = queue.skipped,
            "Starting CSV run"
        );

        for row in &queue.rows {
            let external_id = match row.coordinate() {
                Some((lat, lng)) if !row.bnb_name.is_empty() => {
                    match client.find_place(lat, lng, &row.bnb_name).await {
                        Ok(id) => id,
                        Err(e) => {
                            tracing::warn!(place = %row.bnb_name, "Place lookup failed: {}", e);
                            None
                        }
                    }
                }
                _ => {
                    tracing::warn!(
                        source_id = %row.source_id,
                        place = %row.bnb_name,
                        "No coordinates or name to look up"
                    );
                    None
                }
            };

            self.process_place(&row.to_place(external_id)).await;
        }
    }

    /// Crawls the places around a coordinate, following result pages
    ///
    /// # Returns
    ///
    /// * `Ok(())` - All pages were processed, or paging stopped early after a
    ///   failed page request (logged)
    /// * `Err(CrawlerError::Search)` - The first page could not be fetched
    pub async fn run_nearby(
        &mut self,
        client: &PlacesClient,
        lat: f64,
        lng: f64,
    ) -> Result<(), CrawlerError> {
        let search = self.config.search.clone();
        tracing::info!(
            lat,
            lng,
            radius = search.radius_meters,
            place_type = %search.place_type,
            "Starting nearby run"
        );

        let mut page = client
            .nearby(lat, lng, search.radius_meters, &search.place_type)
            .await?;
        let mut page_number = 1;

        loop {
            tracing::info!(page = page_number, places = page.places.len(), "Processing result page");
            self.run_queue(&page.places).await;

            let Some(cursor) = page.cursor.take() else {
                break;
            };

            page = match client.next_page(&cursor).await {
                Ok(next) => next,
                Err(e) => {
                    tracing::error!(page = page_number + 1, "Stopping pagination: {}", e);
                    break;
                }
            };
            page_number += 1;
        }

        Ok(())
    }

    /// Ends the run, handing back the page and the finished summary
    pub fn finish(mut self) -> (D, RunSummary) {
        if !self.cache.is_empty() {
            tracing::warn!("Dropping unexported result at shutdown");
            self.cache.clear();
        }
        self.summary.finish();
        (self.driver, self.summary)
    }
}

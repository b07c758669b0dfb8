//! Crawl state machine for a single place
//!
//! [`crawl_place`] walks the stages of [`CrawlStage`] strictly in order. Each
//! stage waits for the content it needs with an explicit timeout, then reads
//! a fresh snapshot of the page and hands it to the extractors. The result is
//! only assembled in the final stage, so a failure anywhere leaves nothing
//! half-built behind.

use crate::browser::{wait, DriverError, Locator, PageDriver};
use crate::config::CrawlerConfig;
use crate::crawler::ScrollController;
use crate::extract::{self, selectors, ExtractResult};
use crate::model::{ActivityItem, BnbRecord, CrawlResult, LocationSummary, Place};
use crate::state::{CrawlStage, StageTracker};
use crate::CrawlerError;
use scraper::Html;
use std::time::Duration;
use url::Url;

/// Builds the search URL that opens the place page
///
/// # Example
///
/// ```
/// use map_review_crawler::crawler::place_url;
/// use map_review_crawler::Place;
///
/// let place = Place::new("Blue Cafe", "ChIJ123");
/// let url = place_url("https://www.google.com/maps/search/", &place).unwrap();
/// assert_eq!(
///     url.as_str(),
///     "https://www.google.com/maps/search/?api=1&query=Blue+Cafe&query_place_id=ChIJ123"
/// );
/// ```
pub fn place_url(maps_url: &str, place: &Place) -> Result<Url, CrawlerError> {
    let mut url = Url::parse(maps_url).map_err(|e| CrawlerError::Navigation {
        url: maps_url.to_string(),
        message: e.to_string(),
    })?;

    {
        let mut query = url.query_pairs_mut();
        query.append_pair("api", "1").append_pair("query", &place.name);
        if let Some(id) = &place.external_id {
            query.append_pair("query_place_id", id);
        }
    }

    Ok(url)
}

/// Crawls one place and returns the assembled result
///
/// # Arguments
///
/// * `driver` - The browser tab to drive
/// * `config` - Timeouts, review ceiling and stage policies
/// * `place` - The place to open
///
/// # Returns
///
/// * `Ok(CrawlResult)` - Every stage completed
/// * `Err(CrawlerError)` - The first fatal failure; [`CrawlerError::stage`]
///   names the stage it happened in
pub async fn crawl_place<D: PageDriver + ?Sized>(
    driver: &mut D,
    config: &CrawlerConfig,
    place: &Place,
) -> Result<CrawlResult, CrawlerError> {
    PlaceCrawl {
        driver,
        config,
        place,
        tracker: StageTracker::new(),
    }
    .run()
    .await
}

struct PlaceCrawl<'a, D: PageDriver + ?Sized> {
    driver: &'a mut D,
    config: &'a CrawlerConfig,
    place: &'a Place,
    tracker: StageTracker,
}

impl<'a, D: PageDriver + ?Sized> PlaceCrawl<'a, D> {
    async fn run(mut self) -> Result<CrawlResult, CrawlerError> {
        self.advance(CrawlStage::NavigateToPlace)?;
        self.navigate().await?;

        self.advance(CrawlStage::AwaitLocationSummary)?;
        let location = match self.location_summary().await {
            Ok(location) => location,
            Err(e @ CrawlerError::ExtractionTimeout { .. })
                if self.config.stage_policy.location_summary.is_tolerant() =>
            {
                tracing::warn!(place = %self.place.name, "{}; continuing without location summary", e);
                LocationSummary::default()
            }
            Err(e) => return Err(e),
        };

        self.advance(CrawlStage::OpenActivitiesPanel)?;
        let activities = match self.activities().await {
            Ok(activities) => activities,
            Err(e @ CrawlerError::ExtractionTimeout { .. })
                if self.config.stage_policy.activities.is_tolerant() =>
            {
                tracing::warn!(place = %self.place.name, "{}; continuing without activities", e);
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        self.advance(CrawlStage::OpenReviewsPanel)?;
        self.open_reviews().await?;

        self.advance(CrawlStage::ExtractRatingSnapshot)?;
        let rating = self
            .extract(CrawlStage::ExtractRatingSnapshot, extract::rating_snapshot)
            .await?;
        if !rating.histogram_matches(self.config.histogram_tolerance) {
            tracing::warn!(
                place = %self.place.name,
                histogram = rating.histogram_total(),
                total = rating.total_review_count,
                "Rating histogram does not add up to the review total"
            );
        }

        self.advance(CrawlStage::ScrollAndCollect)?;
        let target = usize::try_from(rating.total_review_count).unwrap_or(usize::MAX);
        ScrollController::new(self.config)
            .expand(
                &mut *self.driver,
                target,
                self.config.max_reviews,
                &self.place.name,
            )
            .await?;

        self.advance(CrawlStage::ExtractReviews)?;
        let mut reviews = self
            .extract(CrawlStage::ExtractReviews, extract::reviews)
            .await?;
        reviews.truncate(self.config.max_reviews);

        self.advance(CrawlStage::Finalize)?;
        let title = self
            .driver
            .title()
            .await
            .map_err(|source| browser_error(CrawlStage::Finalize, source))?;

        tracing::info!(
            place = %self.place.name,
            reviews = reviews.len(),
            activities = activities.len(),
            "Crawl finished: {}",
            title
        );

        Ok(CrawlResult {
            title,
            reviews,
            bnb: BnbRecord { rating, location },
            activities,
        })
    }

    fn advance(&mut self, to: CrawlStage) -> Result<(), CrawlerError> {
        let stage = self
            .tracker
            .enter(to)
            .map_err(|(from, to)| CrawlerError::InvalidTransition { from, to })?;
        tracing::debug!(place = %self.place.name, stage = %stage, "Entering stage");
        Ok(())
    }

    async fn navigate(&mut self) -> Result<(), CrawlerError> {
        let url = place_url(&self.config.maps_url, self.place)?;
        let timeout = self.config.navigation_timeout();

        match tokio::time::timeout(timeout, self.driver.goto(url.as_str())).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(CrawlerError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            }),
            Err(_) => Err(CrawlerError::Navigation {
                url: url.to_string(),
                message: format!("timed out after {}ms", timeout.as_millis()),
            }),
        }
    }

    async fn location_summary(&mut self) -> Result<LocationSummary, CrawlerError> {
        let stage = CrawlStage::AwaitLocationSummary;
        self.wait_for(stage, &Locator::css(selectors::SUMMARY_SCORE), true)
            .await?;
        self.extract(stage, extract::location_summary).await
    }

    async fn activities(&mut self) -> Result<Vec<ActivityItem>, CrawlerError> {
        let stage = CrawlStage::OpenActivitiesPanel;
        let button = Locator::css(selectors::ACTIVITIES_BUTTON);

        self.wait_for(stage, &button, true).await?;
        self.click(stage, &button).await?;
        self.wait_for(stage, &Locator::xpath(selectors::ACTIVITY_SECTIONS_XPATH), true)
            .await?;
        self.extract(stage, extract::activities).await
    }

    async fn open_reviews(&mut self) -> Result<(), CrawlerError> {
        let stage = CrawlStage::OpenReviewsPanel;
        let button = Locator::css(selectors::REVIEWS_BUTTON);

        self.wait_for(stage, &button, true).await?;

        let before = self
            .driver
            .current_url()
            .await
            .map_err(|source| browser_error(stage, source))?;
        self.click(stage, &button).await?;

        let timeout = self.config.navigation_timeout();
        let navigated =
            wait::wait_for_url_change(&mut *self.driver, &before, timeout, self.config.poll_interval())
                .await
                .map_err(|source| browser_error(stage, source))?;
        if !navigated {
            return Err(timeout_error(stage, "reviews panel navigation", timeout));
        }

        self.wait_for(stage, &Locator::css(selectors::REVIEW_TEXT), false)
            .await
    }

    async fn wait_for(
        &mut self,
        stage: CrawlStage,
        locator: &Locator,
        visible: bool,
    ) -> Result<(), CrawlerError> {
        let timeout = self.config.wait_timeout();
        let found = wait::wait_for_locator(
            &mut *self.driver,
            locator,
            visible,
            timeout,
            self.config.poll_interval(),
        )
        .await
        .map_err(|source| browser_error(stage, source))?;

        if found {
            Ok(())
        } else {
            Err(timeout_error(stage, &locator.to_string(), timeout))
        }
    }

    async fn click(&mut self, stage: CrawlStage, locator: &Locator) -> Result<(), CrawlerError> {
        self.driver
            .click(locator)
            .await
            .map_err(|source| browser_error(stage, source))
    }

    /// Runs `extractor` over a fresh snapshot of the page
    async fn extract<T, F>(&mut self, stage: CrawlStage, extractor: F) -> Result<T, CrawlerError>
    where
        F: FnOnce(&Html) -> ExtractResult<T>,
    {
        let content = self
            .driver
            .content()
            .await
            .map_err(|source| browser_error(stage, source))?;
        let document = Html::parse_document(&content);
        extractor(&document).map_err(|source| CrawlerError::Extraction { stage, source })
    }
}

fn browser_error(stage: CrawlStage, source: DriverError) -> CrawlerError {
    CrawlerError::Browser { stage, source }
}

fn timeout_error(stage: CrawlStage, target: &str, timeout: Duration) -> CrawlerError {
    CrawlerError::ExtractionTimeout {
        stage,
        target: target.to_string(),
        timeout_ms: timeout.as_millis() as u64,
    }
}

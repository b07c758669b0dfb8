//! Infinite-scroll controller for the review feed
//!
//! The feed renders a batch of reviews each time its scroll container reaches
//! the bottom. The controller keeps scrolling until enough reviews are
//! rendered, the hard ceiling is hit, or the feed stops growing. A
//! per-place progress bar shows how far the feed has been expanded.

use crate::browser::{wait, Locator, PageDriver};
use crate::config::CrawlerConfig;
use crate::extract::selectors;
use crate::state::CrawlStage;
use crate::CrawlerError;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Drives the review feed until `min(target, max)` reviews are loaded
#[derive(Debug, Clone)]
pub struct ScrollController {
    container: String,
    item: String,
    settle_delay: Duration,
    wait_timeout: Duration,
    growth_timeout: Duration,
    poll_interval: Duration,
    max_scrolls: usize,
}

impl ScrollController {
    /// Creates a controller for the review feed selectors
    pub fn new(config: &CrawlerConfig) -> Self {
        Self {
            container: selectors::SCROLL_CONTAINER.to_string(),
            item: selectors::REVIEW_NODE.to_string(),
            settle_delay: config.settle_delay(),
            wait_timeout: config.wait_timeout(),
            growth_timeout: config.growth_timeout(),
            poll_interval: config.poll_interval(),
            max_scrolls: config.max_scrolls,
        }
    }

    /// Scrolls until at least `target` items are rendered or `max` is reached
    ///
    /// # Arguments
    ///
    /// * `driver` - The page holding the open review feed
    /// * `target` - Number of items the site says exist
    /// * `max` - Hard ceiling on items to load
    /// * `label` - Place name used in progress logs
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of rendered items when scrolling stopped
    /// * `Err(CrawlerError::ExtractionTimeout)` - The scroll container never appeared
    /// * `Err(CrawlerError::ScrollStall)` - The feed stopped growing early, or
    ///   `max_scrolls` scrolls did not load enough items
    pub async fn expand<D: PageDriver + ?Sized>(
        &self,
        driver: &mut D,
        target: usize,
        max: usize,
        label: &str,
    ) -> Result<usize, CrawlerError> {
        let wanted = target.min(max);
        let progress = progress_bar(label, wanted);
        let result = self.scroll_loop(driver, target, max, label, &progress).await;
        progress.finish_and_clear();
        result
    }

    async fn scroll_loop<D: PageDriver + ?Sized>(
        &self,
        driver: &mut D,
        target: usize,
        max: usize,
        label: &str,
        progress: &ProgressBar,
    ) -> Result<usize, CrawlerError> {
        let wanted = target.min(max);
        let container = Locator::css(self.container.as_str());
        let mut current = self.count(driver).await?;
        let mut scrolls = 0;
        progress.set_position(current.min(wanted) as u64);

        while current < target && current < max {
            if scrolls >= self.max_scrolls {
                tracing::warn!(
                    place = label,
                    loaded = current,
                    wanted,
                    scrolls,
                    "Scroll limit reached before the feed was loaded"
                );
                return Err(CrawlerError::ScrollStall {
                    loaded: current,
                    wanted,
                });
            }

            let found = wait::wait_for_locator(
                driver,
                &container,
                false,
                self.wait_timeout,
                self.poll_interval,
            )
            .await
            .map_err(browser_error)?;
            if !found {
                return Err(CrawlerError::ExtractionTimeout {
                    stage: CrawlStage::ScrollAndCollect,
                    target: container.to_string(),
                    timeout_ms: self.wait_timeout.as_millis() as u64,
                });
            }

            let previous = driver
                .scroll_height(&self.container)
                .await
                .map_err(browser_error)?
                .unwrap_or(0.0);

            driver
                .scroll_to_bottom(&self.container)
                .await
                .map_err(browser_error)?;
            scrolls += 1;

            let grew = wait::wait_for_growth(
                driver,
                &self.container,
                previous,
                self.growth_timeout,
                self.poll_interval,
            )
            .await
            .map_err(browser_error)?;
            if !grew {
                tracing::warn!(place = label, loaded = current, wanted, "Review feed stopped growing");
                return Err(CrawlerError::ScrollStall {
                    loaded: current,
                    wanted,
                });
            }

            if !self.settle_delay.is_zero() {
                tokio::time::sleep(self.settle_delay).await;
            }

            current = self.count(driver).await?;
            progress.set_position(current.min(wanted) as u64);
            tracing::debug!(
                place = label,
                loaded = current,
                wanted,
                "Progress: {:.0}%",
                progress_percent(current, wanted)
            );
        }

        tracing::info!(place = label, loaded = current, wanted, "Review feed expanded");
        Ok(current)
    }

    async fn count<D: PageDriver + ?Sized>(&self, driver: &mut D) -> Result<usize, CrawlerError> {
        driver.count(&self.item).await.map_err(browser_error)
    }
}

fn browser_error(source: crate::browser::DriverError) -> CrawlerError {
    CrawlerError::Browser {
        stage: CrawlStage::ScrollAndCollect,
        source,
    }
}

/// Progress bar for one place, sized to the number of items wanted
///
/// Drawn on stderr; hidden automatically when stderr is not a terminal.
fn progress_bar(label: &str, wanted: usize) -> ProgressBar {
    let bar = ProgressBar::new(wanted as u64);
    if let Ok(style) =
        ProgressStyle::default_bar().template("crawling : \"{msg}\" [{bar:40}] {percent}%")
    {
        bar.set_style(style.progress_chars("=> "));
    }
    bar.set_message(label.to_string());
    bar
}

fn progress_percent(current: usize, wanted: usize) -> f64 {
    if wanted == 0 {
        return 100.0;
    }
    (current.min(wanted) as f64 / wanted as f64) * 100.0
}

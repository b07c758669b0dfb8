//! Bounded polling waits on top of a [`PageDriver`]
//!
//! Every wait returns `Ok(false)` on timeout; callers decide whether that is
//! fatal. Driver errors end the wait immediately.

use super::{DriverResult, Locator, PageDriver};
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Polls until `locator` is present (and visible, if requested)
pub async fn wait_for_locator<D: PageDriver + ?Sized>(
    driver: &mut D,
    locator: &Locator,
    visible: bool,
    timeout: Duration,
    poll: Duration,
) -> DriverResult<bool> {
    let deadline = Instant::now() + timeout;
    loop {
        if driver.is_present(locator, visible).await? {
            return Ok(true);
        }
        if Instant::now() >= deadline {
            return Ok(false);
        }
        sleep(poll).await;
    }
}

/// Polls until the `scrollHeight` of `css` exceeds `previous`
pub async fn wait_for_growth<D: PageDriver + ?Sized>(
    driver: &mut D,
    css: &str,
    previous: f64,
    timeout: Duration,
    poll: Duration,
) -> DriverResult<bool> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(height) = driver.scroll_height(css).await? {
            if height > previous {
                return Ok(true);
            }
        }
        if Instant::now() >= deadline {
            return Ok(false);
        }
        sleep(poll).await;
    }
}

/// Polls until the tab URL differs from `from`
pub async fn wait_for_url_change<D: PageDriver + ?Sized>(
    driver: &mut D,
    from: &str,
    timeout: Duration,
    poll: Duration,
) -> DriverResult<bool> {
    let deadline = Instant::now() + timeout;
    loop {
        if driver.current_url().await? != from {
            return Ok(true);
        }
        if Instant::now() >= deadline {
            return Ok(false);
        }
        sleep(poll).await;
    }
}

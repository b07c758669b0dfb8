//! Browser access
//!
//! - `traits`: the [`PageDriver`] seam and its error type
//! - `wait`: bounded polling helpers used by the crawl stages
//! - `chrome`: the Chromium implementation

mod chrome;
mod traits;
pub mod wait;

pub use chrome::{BrowserSession, ChromePage};
pub use traits::{DriverError, DriverResult, Locator, PageDriver};

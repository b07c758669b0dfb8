//! Page driver trait and error types
//!
//! The crawl state machine talks to the browser only through [`PageDriver`],
//! so the same logic runs against a real Chromium tab or a fixture page in
//! tests.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Errors raised by a page driver
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Script evaluation failed: {0}")]
    Script(String),

    #[error("Browser protocol error: {0}")]
    Protocol(String),
}

/// Result type for page driver operations
pub type DriverResult<T> = Result<T, DriverError>;

/// How an element is located on the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Css(String),
    XPath(String),
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    pub fn xpath(expression: impl Into<String>) -> Self {
        Self::XPath(expression.into())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(selector) => write!(f, "css:{}", selector),
            Self::XPath(expression) => write!(f, "xpath:{}", expression),
        }
    }
}

/// A single browser tab the crawler drives
///
/// Methods take `&mut self`: one crawl owns the page exclusively for its
/// whole duration.
#[async_trait]
pub trait PageDriver: Send {
    /// Loads `url` and waits for the load event
    async fn goto(&mut self, url: &str) -> DriverResult<()>;

    /// URL currently shown in the tab
    async fn current_url(&mut self) -> DriverResult<String>;

    /// Returns true if the locator matches an element (and, when `visible` is
    /// set, the element is rendered with a non-empty box)
    async fn is_present(&mut self, locator: &Locator, visible: bool) -> DriverResult<bool>;

    /// Clicks the first element matching the locator
    async fn click(&mut self, locator: &Locator) -> DriverResult<()>;

    /// Serialized HTML of the current document
    async fn content(&mut self) -> DriverResult<String>;

    /// Document title
    async fn title(&mut self) -> DriverResult<String>;

    /// `scrollHeight` of the first element matching `css`, `None` if absent
    async fn scroll_height(&mut self, css: &str) -> DriverResult<Option<f64>>;

    /// Scrolls the first element matching `css` to its bottom
    async fn scroll_to_bottom(&mut self, css: &str) -> DriverResult<()>;

    /// Number of elements matching `css`
    async fn count(&mut self, css: &str) -> DriverResult<usize>;
}

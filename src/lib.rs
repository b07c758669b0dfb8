//! Map Review Crawler: place metadata and review extraction for a map site
//!
//! This crate drives a headless browser through a place page, waits for the
//! dynamically rendered panels, scrolls the infinite review feed and turns the
//! resulting DOM into structured records that are exported as JSON, CSV or
//! database documents.

pub mod browser;
pub mod config;
pub mod crawler;
pub mod export;
pub mod extract;
pub mod input;
pub mod model;
pub mod output;
pub mod search;
pub mod state;

use thiserror::Error;

/// Main error type for crawl operations
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Timed out after {timeout_ms}ms waiting for {target} during {stage}")]
    ExtractionTimeout {
        stage: CrawlStage,
        target: String,
        timeout_ms: u64,
    },

    #[error("Review feed stopped growing at {loaded} of {wanted} reviews")]
    ScrollStall { loaded: usize, wanted: usize },

    #[error("Extraction failed during {stage}: {source}")]
    Extraction {
        stage: CrawlStage,
        source: extract::ExtractError,
    },

    #[error("Browser error during {stage}: {source}")]
    Browser {
        stage: CrawlStage,
        source: browser::DriverError,
    },

    #[error("Browser session error: {0}")]
    Session(browser::DriverError),

    #[error("No crawl result available to export")]
    NoResult,

    #[error("Export error: {0}")]
    Export(#[from] export::ExportError),

    #[error("No provider place id found for '{name}'")]
    Lookup { name: String },

    #[error("Place search error: {0}")]
    Search(#[from] search::SearchError),

    #[error("Input error: {0}")]
    Input(#[from] input::InputError),

    #[error("Invalid stage transition: {from:?} -> {to}")]
    InvalidTransition {
        from: Option<CrawlStage>,
        to: CrawlStage,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CrawlerError {
    /// The crawl stage the error occurred in, if it is tied to one
    pub fn stage(&self) -> Option<CrawlStage> {
        match self {
            Self::Navigation { .. } => Some(CrawlStage::NavigateToPlace),
            Self::ExtractionTimeout { stage, .. }
            | Self::Extraction { stage, .. }
            | Self::Browser { stage, .. } => Some(*stage),
            Self::ScrollStall { .. } => Some(CrawlStage::ScrollAndCollect),
            Self::InvalidTransition { to, .. } => Some(*to),
            _ => None,
        }
    }

    /// Short machine-friendly name of the error kind, used in run summaries
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Navigation { .. } => "navigation",
            Self::ExtractionTimeout { .. } => "timeout",
            Self::ScrollStall { .. } => "scroll_stall",
            Self::Extraction { .. } => "extraction",
            Self::Browser { .. } => "browser",
            Self::Session(_) => "session",
            Self::NoResult => "no_result",
            Self::Export(_) => "export",
            Self::Lookup { .. } => "lookup",
            Self::Search(_) => "search",
            Self::Input(_) => "input",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::Io(_) => "io",
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Environment variable {0} holding the API key is not set")]
    MissingApiKey(String),
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use model::{ActivityItem, BnbRecord, CrawlResult, LocationSummary, Place, RatingSnapshot, Review};
pub use state::{CrawlStage, StageTracker};

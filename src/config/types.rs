use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure
///
/// Every section has defaults, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub search: SearchConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Hard ceiling on reviews collected per place
    #[serde(rename = "max-reviews")]
    pub max_reviews: usize,

    /// Pause after each feed growth before recounting reviews (milliseconds)
    #[serde(rename = "settle-delay-ms")]
    pub settle_delay_ms: u64,

    /// Timeout for element waits (milliseconds)
    #[serde(rename = "wait-timeout-ms")]
    pub wait_timeout_ms: u64,

    /// Timeout for the review feed to grow after a scroll (milliseconds)
    #[serde(rename = "growth-timeout-ms")]
    pub growth_timeout_ms: u64,

    /// Timeout for page loads and panel transitions (milliseconds)
    #[serde(rename = "navigation-timeout-ms")]
    pub navigation_timeout_ms: u64,

    /// Upper bound on scrolls per place, reached when the feed grows without
    /// rendering new reviews
    #[serde(rename = "max-scrolls")]
    pub max_scrolls: usize,

    /// Interval between DOM polls while waiting (milliseconds)
    #[serde(rename = "poll-interval-ms")]
    pub poll_interval_ms: u64,

    /// Allowed relative gap between histogram sum and advertised total
    #[serde(rename = "histogram-tolerance")]
    pub histogram_tolerance: f64,

    /// Search URL of the map site
    #[serde(rename = "maps-url")]
    pub maps_url: String,

    /// Run the browser without a window
    pub headless: bool,

    /// Browser window size as (width, height)
    #[serde(rename = "window-size")]
    pub window_size: (u32, u32),

    /// How timeouts in optional stages are treated
    #[serde(rename = "stage-policy")]
    pub stage_policy: StagePolicyConfig,
}

impl CrawlerConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }

    pub fn growth_timeout(&self) -> Duration {
        Duration::from_millis(self.growth_timeout_ms)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_reviews: 200,
            settle_delay_ms: 100,
            wait_timeout_ms: 10_000,
            growth_timeout_ms: 30_000,
            navigation_timeout_ms: 30_000,
            max_scrolls: 1000,
            poll_interval_ms: 100,
            histogram_tolerance: 0.05,
            maps_url: "https://www.google.com/maps/search/".to_string(),
            headless: true,
            window_size: (1280, 900),
            stage_policy: StagePolicyConfig::default(),
        }
    }
}

/// Whether a timeout in a stage aborts the place or yields an empty value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StagePolicy {
    Fatal,
    Tolerant,
}

impl StagePolicy {
    pub fn is_tolerant(&self) -> bool {
        matches!(self, Self::Tolerant)
    }
}

/// Per-stage timeout policies
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StagePolicyConfig {
    /// Missing location summary block
    #[serde(rename = "location-summary")]
    pub location_summary: StagePolicy,

    /// Missing activities button or activity blocks
    pub activities: StagePolicy,
}

impl Default for StagePolicyConfig {
    fn default() -> Self {
        Self {
            location_summary: StagePolicy::Fatal,
            activities: StagePolicy::Tolerant,
        }
    }
}

/// Place search API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Place type filter for nearby search
    #[serde(rename = "place-type")]
    pub place_type: String,

    /// Nearby search radius in meters
    #[serde(rename = "radius-meters")]
    pub radius_meters: u32,

    /// Base URL of the place API
    #[serde(rename = "api-base-url")]
    pub api_base_url: String,

    /// Name of the environment variable holding the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// Pause before requesting the next result page (milliseconds)
    #[serde(rename = "page-token-delay-ms")]
    pub page_token_delay_ms: u64,

    /// HTTP request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            place_type: "restaurant".to_string(),
            radius_meters: 1500,
            api_base_url: "https://maps.googleapis.com/maps/api/place/".to_string(),
            api_key_env: "API_KEY".to_string(),
            page_token_delay_ms: 2000,
            request_timeout_secs: 30,
        }
    }
}

/// CSV input configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Path to the CSV of known places
    #[serde(rename = "csv-path")]
    pub csv_path: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            csv_path: "assets/bnb_location.csv".to_string(),
        }
    }
}

/// Export destinations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    Json,
    Csv,
    Database,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving JSON and CSV files
    #[serde(rename = "results-dir")]
    pub results_dir: String,

    /// Sinks every crawl result is exported to
    pub sinks: Vec<SinkKind>,

    /// Path to the SQLite document store
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Collection name for stored documents
    pub collection: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_dir: "dist".to_string(),
            sinks: vec![SinkKind::Csv],
            database_path: "dist/reviews.db".to_string(),
            collection: "reviews".to_string(),
        }
    }
}

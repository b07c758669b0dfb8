use crate::config::types::{Config, CrawlerConfig, InputConfig, OutputConfig, SearchConfig, SinkKind};
use crate::ConfigError;
use url::Url;

/// Upper bound the place API accepts for nearby search
const MAX_RADIUS_METERS: u32 = 50_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_search_config(&config.search)?;
    validate_input_config(&config.input)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_reviews < 1 {
        return Err(ConfigError::Validation(format!(
            "max-reviews must be >= 1, got {}",
            config.max_reviews
        )));
    }

    if config.max_scrolls < 1 {
        return Err(ConfigError::Validation(format!(
            "max-scrolls must be >= 1, got {}",
            config.max_scrolls
        )));
    }

    if config.wait_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "wait-timeout-ms must be >= 100ms, got {}ms",
            config.wait_timeout_ms
        )));
    }

    if config.growth_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "growth-timeout-ms must be >= 100ms, got {}ms",
            config.growth_timeout_ms
        )));
    }

    if config.navigation_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "navigation-timeout-ms must be >= 100ms, got {}ms",
            config.navigation_timeout_ms
        )));
    }

    if config.poll_interval_ms == 0 || config.poll_interval_ms > config.wait_timeout_ms {
        return Err(ConfigError::Validation(format!(
            "poll-interval-ms must be between 1 and wait-timeout-ms ({}), got {}",
            config.wait_timeout_ms, config.poll_interval_ms
        )));
    }

    if !(0.0..=1.0).contains(&config.histogram_tolerance) {
        return Err(ConfigError::Validation(format!(
            "histogram-tolerance must be between 0 and 1, got {}",
            config.histogram_tolerance
        )));
    }

    let (width, height) = config.window_size;
    if width == 0 || height == 0 {
        return Err(ConfigError::Validation(format!(
            "window-size must be non-zero, got {}x{}",
            width, height
        )));
    }

    validate_http_url("maps-url", &config.maps_url)?;

    Ok(())
}

/// Validates place search configuration
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    if config.place_type.trim().is_empty() {
        return Err(ConfigError::Validation(
            "place-type cannot be empty".to_string(),
        ));
    }

    if config.radius_meters < 1 || config.radius_meters > MAX_RADIUS_METERS {
        return Err(ConfigError::Validation(format!(
            "radius-meters must be between 1 and {}, got {}",
            MAX_RADIUS_METERS, config.radius_meters
        )));
    }

    if config.api_key_env.trim().is_empty() {
        return Err(ConfigError::Validation(
            "api-key-env cannot be empty".to_string(),
        ));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be >= 1".to_string(),
        ));
    }

    validate_http_url("api-base-url", &config.api_base_url)?;

    Ok(())
}

/// Validates input configuration
fn validate_input_config(config: &InputConfig) -> Result<(), ConfigError> {
    if config.csv_path.is_empty() {
        return Err(ConfigError::Validation(
            "csv-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.sinks.is_empty() {
        return Err(ConfigError::Validation(
            "at least one sink must be configured".to_string(),
        ));
    }

    let writes_files = config
        .sinks
        .iter()
        .any(|sink| matches!(sink, SinkKind::Json | SinkKind::Csv));
    if writes_files && config.results_dir.is_empty() {
        return Err(ConfigError::Validation(
            "results-dir cannot be empty".to_string(),
        ));
    }

    if config.sinks.contains(&SinkKind::Database) {
        if config.database_path.is_empty() {
            return Err(ConfigError::Validation(
                "database-path cannot be empty".to_string(),
            ));
        }
        validate_collection_name(&config.collection)?;
    }

    Ok(())
}

/// Collection names become part of stored rows and log lines; keep them plain
fn validate_collection_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::Validation(
            "collection cannot be empty".to_string(),
        ));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "collection must contain only ASCII letters, digits, '_' and '-', got '{}'",
            name
        )));
    }

    Ok(())
}

/// Validates that a URL parses and uses HTTP(S)
fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {}: {}", field, e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} must use http or https, got '{}'",
            field, value
        )));
    }

    Ok(())
}

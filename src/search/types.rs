//! Place search types and wire formats

use crate::model::Place;
use serde::Deserialize;
use std::str::FromStr;
use thiserror::Error;

/// Errors returned by the place search client
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid API URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Place API returned status {status}{}", detail(.message))]
    Api {
        status: String,
        message: Option<String>,
    },
}

fn detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {}", m))
        .unwrap_or_default()
}

/// Result type for place search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// A latitude/longitude pair, written as `LAT,LNG` on the command line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl FromStr for Coordinate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| format!("expected LAT,LNG, got '{}'", s))?;
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| format!("invalid latitude '{}'", lat.trim()))?;
        let lng: f64 = lng
            .trim()
            .parse()
            .map_err(|_| format!("invalid longitude '{}'", lng.trim()))?;

        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(format!("coordinate out of range: {},{}", lat, lng));
        }

        Ok(Self { lat, lng })
    }
}

/// Continuation token for the next page of nearby results
///
/// Only constructed from a non-empty token, so holding one always means
/// another page exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor(String);

impl PageCursor {
    /// Wraps `token`, treating an empty or missing token as the last page
    pub fn new(token: Option<String>) -> Option<Self> {
        token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One page of nearby search results
#[derive(Debug, Clone, Default)]
pub struct PlacePage {
    pub places: Vec<Place>,
    pub cursor: Option<PageCursor>,
}

impl PlacePage {
    pub fn has_next(&self) -> bool {
        self.cursor.is_some()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct FindPlaceResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub status: String,
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Candidate {
    pub place_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NearbyResponse {
    #[serde(default)]
    pub results: Vec<NearbyResult>,
    pub next_page_token: Option<String>,
    pub status: String,
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NearbyResult {
    pub name: String,
    pub place_id: String,
}

/// Accepts `OK` and `ZERO_RESULTS`, rejects every other API status
pub(crate) fn check_status(status: &str, message: Option<String>) -> SearchResult<()> {
    match status {
        "OK" | "ZERO_RESULTS" => Ok(()),
        _ => Err(SearchError::Api {
            status: status.to_string(),
            message,
        }),
    }
}

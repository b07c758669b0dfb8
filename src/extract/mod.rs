//! Field extractors for place pages
//!
//! Every extractor is a pure function over a parsed `scraper::Html` snapshot of
//! the live page. The browser is never touched here, which keeps the parsing
//! rules testable against static fixtures.
//!
//! The selectors target the zh-TW rendering of the site (`建議活動`, `地點摘要`,
//! `則評論`, `顆星`), see [`selectors`].

mod activities;
pub mod numbers;
mod rating;
mod reviews;
pub mod selectors;
mod summary;

pub use activities::{activities, activity_sections};
pub use numbers::{parse_count, parse_decimal, parse_star_rating};
pub use rating::rating_snapshot;
pub use reviews::reviews;
pub use summary::location_summary;

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

/// Errors that can occur while reading fields out of a page snapshot
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Element not found: {0}")]
    MissingElement(String),

    #[error("Element '{selector}' has no '{attribute}' attribute")]
    MissingAttribute { selector: String, attribute: String },

    #[error("No digits in '{0}'")]
    NoDigits(String),

    #[error("Not a number: '{0}'")]
    InvalidNumber(String),

    #[error("No star rating in '{0}'")]
    NoRating(String),

    #[error("Star rating {0} is outside 1..=5")]
    RatingOutOfRange(u32),

    #[error("Expected 5 histogram rows, found {0}")]
    Histogram(usize),

    #[error("Invalid selector: {0}")]
    Selector(String),
}

/// Result type for extraction
pub type ExtractResult<T> = Result<T, ExtractError>;

pub(crate) fn parse_selector(css: &str) -> ExtractResult<Selector> {
    Selector::parse(css).map_err(|e| ExtractError::Selector(format!("{}: {:?}", css, e)))
}

/// Concatenated, trimmed text content of an element
pub(crate) fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Text content exactly as rendered, whitespace included
///
/// Used for free text (review bodies, activity descriptions) where leading
/// and trailing whitespace is part of what the author wrote.
pub(crate) fn raw_text(element: &ElementRef<'_>) -> String {
    element.text().collect()
}

/// Text of the first match of `css` in the document
pub(crate) fn first_text(document: &Html, css: &str) -> ExtractResult<String> {
    let selector = parse_selector(css)?;
    document
        .select(&selector)
        .next()
        .map(|element| element_text(&element))
        .ok_or_else(|| ExtractError::MissingElement(css.to_string()))
}

/// First match of `css` below `scope`, if any
pub(crate) fn first_in<'a>(scope: ElementRef<'a>, css: &str) -> ExtractResult<Option<ElementRef<'a>>> {
    let selector = parse_selector(css)?;
    Ok(scope.select(&selector).next())
}

/// Text of the first match of `css` below `scope`
pub(crate) fn first_text_in(scope: ElementRef<'_>, css: &str) -> ExtractResult<String> {
    first_in(scope, css)?
        .map(|element| element_text(&element))
        .ok_or_else(|| ExtractError::MissingElement(css.to_string()))
}

/// Untrimmed text of the first match of `css` below `scope`
pub(crate) fn first_raw_text_in(scope: ElementRef<'_>, css: &str) -> ExtractResult<String> {
    first_in(scope, css)?
        .map(|element| raw_text(&element))
        .ok_or_else(|| ExtractError::MissingElement(css.to_string()))
}

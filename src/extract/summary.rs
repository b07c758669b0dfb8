use super::{first_text, parse_decimal, selectors, ExtractResult};
use crate::model::LocationSummary;
use scraper::Html;

/// Extracts the location summary text and its score
pub fn location_summary(document: &Html) -> ExtractResult<LocationSummary> {
    let score = first_text(document, selectors::SUMMARY_SCORE)?;
    let summary_text = first_text(document, selectors::SUMMARY_TEXT)?;

    Ok(LocationSummary {
        summary_text,
        summary_rating: parse_decimal(&score)?,
    })
}

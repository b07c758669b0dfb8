use super::{first_text, parse_count, parse_decimal, parse_selector, selectors, ExtractError, ExtractResult};
use crate::model::RatingSnapshot;
use scraper::Html;

/// Extracts the star histogram, average rating and total review count from
/// the header of the reviews panel
///
/// The histogram rows are listed five stars first; only the first five
/// labelled rows are read.
pub fn rating_snapshot(document: &Html) -> ExtractResult<RatingSnapshot> {
    let total_review_count = parse_count(&first_text(document, selectors::TOTAL_REVIEWS)?)?;

    let rows = parse_selector(selectors::HISTOGRAM_ROWS)?;
    let counts = document
        .select(&rows)
        .take(5)
        .map(|row| {
            let label = row.value().attr("aria-label").ok_or_else(|| {
                ExtractError::MissingAttribute {
                    selector: selectors::HISTOGRAM_ROWS.to_string(),
                    attribute: "aria-label".to_string(),
                }
            })?;
            parse_count(label)
        })
        .collect::<ExtractResult<Vec<u64>>>()?;

    if counts.len() < 5 {
        return Err(ExtractError::Histogram(counts.len()));
    }

    let average_rating = parse_decimal(&first_text(document, selectors::AVERAGE_RATING)?)?;

    Ok(RatingSnapshot {
        r5: counts[0],
        r4: counts[1],
        r3: counts[2],
        r2: counts[3],
        r1: counts[4],
        average_rating,
        total_review_count,
    })
}

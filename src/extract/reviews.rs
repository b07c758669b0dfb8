use super::{
    element_text, first_in, first_raw_text_in, first_text_in, parse_selector, parse_star_rating,
    selectors, ExtractError, ExtractResult,
};
use crate::model::Review;
use scraper::{ElementRef, Html};

/// Extracts every rendered review in document order
pub fn reviews(document: &Html) -> ExtractResult<Vec<Review>> {
    let selector = parse_selector(selectors::REVIEW_NODE)?;
    document.select(&selector).map(review).collect()
}

fn review(node: ElementRef<'_>) -> ExtractResult<Review> {
    let author = first_text_in(node, selectors::REVIEW_AUTHOR)?;
    let content = first_raw_text_in(node, selectors::REVIEW_TEXT)?;

    Ok(Review {
        author,
        content,
        rating: parse_star_rating(&rating_text(node)?)?,
    })
}

/// The star label when present, else the numeric rating text
fn rating_text(node: ElementRef<'_>) -> ExtractResult<String> {
    if let Some(stars) = first_in(node, selectors::REVIEW_STARS)? {
        return stars
            .value()
            .attr("aria-label")
            .map(str::to_string)
            .ok_or_else(|| ExtractError::MissingAttribute {
                selector: selectors::REVIEW_STARS.to_string(),
                attribute: "aria-label".to_string(),
            });
    }

    if let Some(numeric) = first_in(node, selectors::REVIEW_NUMERICAL_RATING)? {
        return Ok(element_text(&numeric));
    }

    Err(ExtractError::NoRating(String::new()))
}

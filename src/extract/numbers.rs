//! Parsing of locale-formatted numbers found in the page text
//!
//! Counts are written with thousands separators (`1,234 則評論`), ratings with
//! a decimal point or comma (`4.5`, `4,5`) and star ratings either as an
//! aria label (`4 顆星`) or a bare digit.

use super::{ExtractError, ExtractResult};
use regex::Regex;
use std::sync::OnceLock;

fn decimal_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\s*(\d+(?:[.,]\d+)?)").expect("valid decimal pattern"))
}

fn star_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"([0-9])(?:[^0-9]|$)").expect("valid star pattern"))
}

/// Parses an integer count by discarding every non-digit character
///
/// # Examples
///
/// ```
/// use map_review_crawler::extract::parse_count;
///
/// assert_eq!(parse_count("1,234 則評論").unwrap(), 1234);
/// assert_eq!(parse_count("(87)").unwrap(), 87);
/// assert!(parse_count("無評論").is_err());
/// ```
pub fn parse_count(text: &str) -> ExtractResult<u64> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Err(ExtractError::NoDigits(text.to_string()));
    }

    digits
        .parse::<u64>()
        .map_err(|_| ExtractError::InvalidNumber(text.to_string()))
}

/// Parses the leading decimal number of `text`
///
/// Anything after the number is ignored. A comma is accepted as decimal
/// separator.
pub fn parse_decimal(text: &str) -> ExtractResult<f64> {
    let captures = decimal_pattern()
        .captures(text)
        .ok_or_else(|| ExtractError::InvalidNumber(text.to_string()))?;

    captures[1]
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| ExtractError::InvalidNumber(text.to_string()))
}

/// Parses a star rating: the first digit that is followed by a non-digit or
/// the end of the text
///
/// # Returns
///
/// * `Ok(1..=5)` - The rating
/// * `Err(ExtractError::NoRating)` - No qualifying digit
/// * `Err(ExtractError::RatingOutOfRange)` - A digit outside 1..=5
pub fn parse_star_rating(text: &str) -> ExtractResult<u8> {
    let trimmed = text.trim();
    let captures = star_pattern()
        .captures(trimmed)
        .ok_or_else(|| ExtractError::NoRating(text.to_string()))?;

    let value = captures[1]
        .parse::<u32>()
        .map_err(|_| ExtractError::NoRating(text.to_string()))?;

    if !(1..=5).contains(&value) {
        return Err(ExtractError::RatingOutOfRange(value));
    }

    Ok(value as u8)
}

//! Selectors for the zh-TW place page markup
//!
//! Class names on the site are generated with per-build prefixes, so most
//! selectors match on class suffixes or substrings instead of full names.

// Location summary block
pub const SUMMARY_SCORE: &str =
    "div[class*='__location-summary-body']>div[class$='__formatted-score-container']";
pub const SUMMARY_TEXT: &str =
    "div[class*='__location-summary-body'] div[class*='__location-summary-overview-text']";

// Suggested activities ("things to do")
pub const ACTIVITIES_BUTTON: &str = "button[aria-label='建議活動']";
pub const ACTIVITY_HEADING: &str = "地點摘要";
pub const ACTIVITY_SECTIONS_XPATH: &str = "//h2[text()='地點摘要']/../../div[contains(@class,'section-layout-inset-shadow')]/div[contains(@class,'__section')]";
pub const ACTIVITY_CONTAINER_CLASS: &str = "section-layout-inset-shadow";
pub const ACTIVITY_SECTION_CLASS: &str = "__section";
pub const ACTIVITY_TITLE: &str = "div[class*='__title']";
pub const ACTIVITY_RATING: &str = "span[class$='__rating']";
pub const ACTIVITY_REVIEWS: &str = "span[class$='__reviews']";
pub const ACTIVITY_DESCRIPTION: &str = "div[class$='__description']";

// Reviews panel
pub const REVIEWS_BUTTON: &str =
    "button[class='allxGeDnJMl__button allxGeDnJMl__button-text'][aria-label*='評論']";
pub const TOTAL_REVIEWS: &str = "div.gm2-caption";
pub const HISTOGRAM_ROWS: &str = "tr[class$='__histogram'] div[aria-label~='則評論']";
pub const AVERAGE_RATING: &str = "div.gm2-display-2";

// Review feed
pub const SCROLL_CONTAINER: &str = ".section-scrollbox.scrollable-y.scrollable-show";
pub const REVIEW_NODE: &str = ".section-review-content";
pub const REVIEW_AUTHOR: &str = ".section-review-title";
pub const REVIEW_TEXT: &str = ".section-review-text";
pub const REVIEW_STARS: &str = ".section-review-stars";
pub const REVIEW_NUMERICAL_RATING: &str = ".section-review-numerical-rating";

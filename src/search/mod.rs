//! Place search web API client
//!
//! Used in two ways: resolving the provider id of a place read from CSV
//! (`find_place`), and discovering places around a coordinate page by page
//! (`nearby` followed by `next_page` while a cursor is returned).

mod client;
mod types;

pub use client::PlacesClient;
pub use types::{Coordinate, PageCursor, PlacePage, SearchError, SearchResult};

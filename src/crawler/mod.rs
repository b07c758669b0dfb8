//! Crawler module for place pages
//!
//! This module contains the core crawling logic, including:
//! - The per-place state machine (`machine`)
//! - Infinite scrolling of the review feed (`scroll`)
//! - The single-slot result cache (`cache`)
//! - Overall run coordination (`coordinator`)

mod cache;
mod coordinator;
mod machine;
mod scroll;

pub use cache::ResultCache;
pub use coordinator::{Coordinator, PlaceOutcome};
pub use machine::{crawl_place, place_url};
pub use scroll::ScrollController;

//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlStage`: The ordered stages a single place crawl walks through
//! - `StageTracker`: Guards the forward-only transition rule for one crawl

mod crawl_stage;

pub use crawl_stage::{CrawlStage, StageTracker};

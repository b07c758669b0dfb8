//! Run reporting
//!
//! Collects per-place outcomes into a [`RunSummary`] and prints it when the
//! run ends.

pub mod stats;

pub use stats::{print_summary, RunSummary, EXIT_CLEAN, EXIT_PARTIAL};

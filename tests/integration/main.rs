//! Integration tests for the crawler
//!
//! Browser-facing tests run against `support::FixturePage`, a page driver
//! that renders synthetic place pages. The search client is tested against
//! wiremock servers.

mod support;

mod crawl_tests;
mod scroll_tests;
mod search_tests;

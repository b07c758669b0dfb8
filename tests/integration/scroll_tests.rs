//! Review feed expansion against the fixture page

use crate::support::{fast_config, FixturePage, FixturePlace};
use map_review_crawler::config::CrawlerConfig;
use map_review_crawler::crawler::ScrollController;
use map_review_crawler::{CrawlStage, CrawlerError};

fn feed(initial: usize, batch: usize, available: usize) -> FixturePage {
    FixturePage::with_reviews_open(FixturePlace {
        total_reviews: available as u64,
        available_reviews: available,
        initial_reviews: initial,
        batch,
        ..FixturePlace::default()
    })
}

#[tokio::test]
async fn test_expand_stops_exactly_at_target() {
    let mut page = feed(0, 5, 1000);
    let controller = ScrollController::new(&fast_config());

    let loaded = controller.expand(&mut page, 25, 200, "test").await.unwrap();

    assert_eq!(loaded, 25);
    assert_eq!(page.scrolls, 5);
}

#[tokio::test]
async fn test_expand_stops_at_max() {
    let mut page = feed(0, 5, usize::MAX);
    let controller = ScrollController::new(&fast_config());

    let loaded = controller.expand(&mut page, 500, 20, "test").await.unwrap();

    assert_eq!(loaded, 20);
    assert_eq!(page.scrolls, 4);
}

#[tokio::test]
async fn test_expand_without_scrolling_when_enough_loaded() {
    let mut page = feed(10, 10, 100);
    let controller = ScrollController::new(&fast_config());

    assert_eq!(controller.expand(&mut page, 0, 200, "test").await.unwrap(), 10);
    assert_eq!(controller.expand(&mut page, 8, 200, "test").await.unwrap(), 10);
    assert_eq!(controller.expand(&mut page, 50, 10, "test").await.unwrap(), 10);
    assert_eq!(page.scrolls, 0);
}

#[tokio::test]
async fn test_expand_reports_stall() {
    let mut page = feed(0, 5, 12);
    let controller = ScrollController::new(&fast_config());

    let err = controller.expand(&mut page, 30, 200, "test").await.unwrap_err();

    match err {
        CrawlerError::ScrollStall { loaded, wanted } => {
            assert_eq!(loaded, 12);
            assert_eq!(wanted, 30);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    // Three growing scrolls, then one that produced nothing
    assert_eq!(page.scrolls, 4);
}

#[tokio::test]
async fn test_expand_bounded_when_height_grows_without_reviews() {
    let mut page = FixturePage::with_reviews_open(FixturePlace {
        total_reviews: 100,
        available_reviews: 10,
        initial_reviews: 10,
        batch: 10,
        spinner: true,
        ..FixturePlace::default()
    });
    let config = CrawlerConfig {
        max_scrolls: 5,
        ..fast_config()
    };
    let controller = ScrollController::new(&config);

    let err = controller.expand(&mut page, 100, 200, "test").await.unwrap_err();

    match err {
        CrawlerError::ScrollStall { loaded, wanted } => {
            assert_eq!(loaded, 10);
            assert_eq!(wanted, 100);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(page.scrolls, 5);
}

#[tokio::test]
async fn test_expand_without_feed_times_out() {
    // Reviews panel never opened, so there is no scroll container
    let mut page = FixturePage::new(FixturePlace::default());
    let controller = ScrollController::new(&fast_config());

    let err = controller.expand(&mut page, 10, 200, "test").await.unwrap_err();

    assert!(matches!(
        err,
        CrawlerError::ExtractionTimeout {
            stage: CrawlStage::ScrollAndCollect,
            timeout_ms: 200,
            ..
        }
    ));
    assert_eq!(page.scrolls, 0);
}

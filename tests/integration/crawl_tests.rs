//! End-to-end crawls of a single place through the fixture page

use crate::support::{fast_config, review_rating, FixturePage, FixturePlace};
use map_review_crawler::config::StagePolicy;
use map_review_crawler::crawler::crawl_place;
use map_review_crawler::{CrawlStage, CrawlerError, Place};

fn place() -> Place {
    Place::new("晨光民宿", "ChIJmorning").with_source_id("17")
}

#[tokio::test]
async fn test_full_crawl_collects_everything() {
    let mut page = FixturePage::new(FixturePlace::default());
    let config = fast_config();

    let result = crawl_place(&mut page, &config, &place())
        .await
        .expect("crawl should succeed");

    assert_eq!(result.title, "晨光民宿 - Google 地圖");

    // Rating snapshot
    let rating = &result.bnb.rating;
    assert_eq!(rating.total_review_count, 3);
    assert_eq!((rating.r5, rating.r4, rating.r3, rating.r2, rating.r1), (2, 1, 0, 0, 0));
    assert_eq!(rating.average_rating, 4.7);

    // Location summary
    assert_eq!(result.bnb.location.summary_text, "交通便利，鄰近夜市");
    assert_eq!(result.bnb.location.summary_rating, 4.3);

    // Activities in page order, comma decimals accepted, description optional
    assert_eq!(result.activities.len(), 2);
    assert_eq!(result.activities[0].name, "士林夜市");
    assert_eq!(result.activities[0].total_review_count, 12345);
    assert_eq!(result.activities[0].description, "台北最大的\n夜市");
    assert_eq!(result.activities[1].rating, 4.6);
    assert_eq!(result.activities[1].description, "");

    // Reviews in document order with both rating encodings
    let authors: Vec<&str> = result.reviews.iter().map(|r| r.author.as_str()).collect();
    assert_eq!(authors, vec!["Reviewer 0", "Reviewer 1", "Reviewer 2"]);
    for (index, review) in result.reviews.iter().enumerate() {
        assert_eq!(review.rating, review_rating(index));
        assert_eq!(review.content, format!("Review text {}\nline two", index));
    }

    assert_eq!(page.scrolls, 2);
    assert_eq!(page.visited.len(), 1);
    assert!(page.visited[0].contains("query_place_id=ChIJmorning"));
}

#[tokio::test]
async fn test_reviews_capped_at_max_reviews() {
    let mut page = FixturePage::new(FixturePlace {
        total_reviews: 500,
        available_reviews: usize::MAX,
        initial_reviews: 10,
        batch: 10,
        histogram: [300, 100, 50, 30, 20],
        ..FixturePlace::default()
    });
    let config = map_review_crawler::config::CrawlerConfig {
        max_reviews: 50,
        ..fast_config()
    };

    let result = crawl_place(&mut page, &config, &place()).await.unwrap();

    assert_eq!(result.reviews.len(), 50);
    assert_eq!(page.loaded(), 50);
    assert_eq!(page.scrolls, 4);
}

#[tokio::test]
async fn test_reviews_truncated_when_last_batch_overshoots() {
    let mut page = FixturePage::new(FixturePlace {
        total_reviews: 100,
        available_reviews: 100,
        initial_reviews: 7,
        batch: 7,
        histogram: [60, 20, 10, 5, 5],
        ..FixturePlace::default()
    });
    let config = map_review_crawler::config::CrawlerConfig {
        max_reviews: 20,
        ..fast_config()
    };

    let result = crawl_place(&mut page, &config, &place()).await.unwrap();

    // The feed rendered 21 before scrolling stopped; only 20 are kept
    assert_eq!(page.loaded(), 21);
    assert_eq!(result.reviews.len(), 20);
    assert_eq!(result.reviews.last().map(|r| r.author.as_str()), Some("Reviewer 19"));
}

#[tokio::test]
async fn test_missing_activities_tolerated_by_default() {
    let mut page = FixturePage::new(FixturePlace {
        has_activities: false,
        ..FixturePlace::default()
    });

    let result = crawl_place(&mut page, &fast_config(), &place()).await.unwrap();

    assert!(result.activities.is_empty());
    assert_eq!(result.reviews.len(), 3);
}

#[tokio::test]
async fn test_missing_activities_fatal_when_configured() {
    let mut page = FixturePage::new(FixturePlace {
        has_activities: false,
        ..FixturePlace::default()
    });
    let mut config = fast_config();
    config.stage_policy.activities = StagePolicy::Fatal;

    let err = crawl_place(&mut page, &config, &place()).await.unwrap_err();

    assert!(matches!(err, CrawlerError::ExtractionTimeout { .. }));
    assert_eq!(err.stage(), Some(CrawlStage::OpenActivitiesPanel));
}

#[tokio::test]
async fn test_missing_location_summary_is_fatal_by_default() {
    let mut page = FixturePage::new(FixturePlace {
        has_summary: false,
        ..FixturePlace::default()
    });

    let err = crawl_place(&mut page, &fast_config(), &place()).await.unwrap_err();

    match err {
        CrawlerError::ExtractionTimeout {
            stage,
            ref target,
            timeout_ms,
        } => {
            assert_eq!(stage, CrawlStage::AwaitLocationSummary);
            assert!(target.contains("location-summary"));
            assert_eq!(timeout_ms, 200);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    // Nothing past the summary stage ran
    assert_eq!(page.scrolls, 0);
}

#[tokio::test]
async fn test_missing_location_summary_tolerated_when_configured() {
    let mut page = FixturePage::new(FixturePlace {
        has_summary: false,
        ..FixturePlace::default()
    });
    let mut config = fast_config();
    config.stage_policy.location_summary = StagePolicy::Tolerant;

    let result = crawl_place(&mut page, &config, &place()).await.unwrap();

    assert_eq!(result.bnb.location.summary_text, "");
    assert_eq!(result.bnb.location.summary_rating, 0.0);
    assert_eq!(result.reviews.len(), 3);
}

#[tokio::test]
async fn test_navigation_failure() {
    let mut page = FixturePage::new(FixturePlace {
        navigation_fails: true,
        ..FixturePlace::default()
    });

    let err = crawl_place(&mut page, &fast_config(), &place()).await.unwrap_err();

    assert!(matches!(err, CrawlerError::Navigation { .. }));
    assert_eq!(err.stage(), Some(CrawlStage::NavigateToPlace));
    assert!(err.to_string().contains("ERR_NAME_NOT_RESOLVED"));
}

#[tokio::test]
async fn test_stalled_feed_aborts_place() {
    let mut page = FixturePage::new(FixturePlace {
        total_reviews: 40,
        available_reviews: 40,
        initial_reviews: 5,
        batch: 5,
        stall_after: Some(2),
        histogram: [20, 10, 5, 3, 2],
        ..FixturePlace::default()
    });

    let err = crawl_place(&mut page, &fast_config(), &place()).await.unwrap_err();

    assert_eq!(err.stage(), Some(CrawlStage::ScrollAndCollect));
    match err {
        CrawlerError::ScrollStall { loaded, wanted } => {
            assert_eq!(loaded, 15);
            assert_eq!(wanted, 40);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_same_page_crawls_places_back_to_back() {
    let mut page = FixturePage::new(FixturePlace::default());
    let config = fast_config();

    let first = crawl_place(&mut page, &config, &Place::new("A", "id-a")).await.unwrap();
    let second = crawl_place(&mut page, &config, &Place::new("B", "id-b")).await.unwrap();

    assert_eq!(first.reviews, second.reviews);
    assert_eq!(page.visited.len(), 2);
    assert!(page.visited[1].contains("query=B"));
}

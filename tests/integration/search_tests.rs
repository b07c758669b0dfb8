//! Place search client against a mock API server

use map_review_crawler::config::SearchConfig;
use map_review_crawler::search::{PlacesClient, SearchError};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> PlacesClient {
    let config = SearchConfig {
        api_base_url: server.uri(),
        page_token_delay_ms: 0,
        request_timeout_secs: 5,
        ..SearchConfig::default()
    };
    PlacesClient::new(&config, "test-key").expect("client should build")
}

#[tokio::test]
async fn test_find_place_returns_first_candidate() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/findplacefromtext/json"))
        .and(query_param("input", "晨光民宿"))
        .and(query_param("inputtype", "textquery"))
        .and(query_param("locationbias", "point:25.05,121.52"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"place_id": "ChIJfirst"}, {"place_id": "ChIJsecond"}],
            "status": "OK"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let id = client.find_place(25.05, 121.52, "晨光民宿").await.unwrap();

    assert_eq!(id.as_deref(), Some("ChIJfirst"));
}

#[tokio::test]
async fn test_find_place_zero_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/findplacefromtext/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [],
            "status": "ZERO_RESULTS"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(client.find_place(0.0, 0.0, "Nowhere").await.unwrap(), None);
}

#[tokio::test]
async fn test_api_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/findplacefromtext/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [],
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid."
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.find_place(1.0, 2.0, "Inn").await.unwrap_err();

    match err {
        SearchError::Api { status, message } => {
            assert_eq!(status, "REQUEST_DENIED");
            assert_eq!(message.as_deref(), Some("The provided API key is invalid."));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_http_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/nearbysearch/json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.nearby(1.0, 2.0, 500, "lodging").await.unwrap_err();

    assert!(matches!(err, SearchError::Http(_)));
}

#[tokio::test]
async fn test_nearby_pagination() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/nearbysearch/json"))
        .and(query_param("location", "25.03,121.56"))
        .and(query_param("radius", "800"))
        .and(query_param("type", "lodging"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"name": "Inn A", "place_id": "a"},
                {"name": "Inn B", "place_id": "b"}
            ],
            "next_page_token": "page-2",
            "status": "OK"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/nearbysearch/json"))
        .and(query_param("pagetoken", "page-2"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"name": "Inn C", "place_id": "c"}],
            "next_page_token": "",
            "status": "OK"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);

    let first = client.nearby(25.03, 121.56, 800, "lodging").await.unwrap();
    let names: Vec<&str> = first.places.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Inn A", "Inn B"]);
    assert_eq!(first.places[1].external_id.as_deref(), Some("b"));
    assert!(first.has_next());

    let cursor = first.cursor.expect("first page has a cursor");
    let second = client.next_page(&cursor).await.unwrap();
    assert_eq!(second.places.len(), 1);
    assert_eq!(second.places[0].name, "Inn C");

    // An empty token ends pagination
    assert!(!second.has_next());
}

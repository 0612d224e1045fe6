//! TMDB client behavior against a mock HTTP server.

use cinebot_core::{Category, CinebotError, ClientConfig, MediaKind, TmdbApi};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> TmdbApi {
    TmdbApi::with_config(ClientConfig {
        api_key: "test-key".to_string(),
        base_url: server.uri(),
        language: "en-US".to_string(),
        requests_per_second: 1000.0,
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_multi_search_keeps_movies_and_shows_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/multi"))
        .and(query_param("query", "batman"))
        .and(query_param("page", "1"))
        .and(query_param("api_key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "total_pages": 7,
            "total_results": 130,
            "results": [
                {"id": 268, "media_type": "movie", "title": "Batman", "release_date": "1989-06-23", "vote_average": 7.2, "genre_ids": [14, 28]},
                {"id": 2661, "media_type": "tv", "name": "Batman", "first_air_date": "1966-01-12", "vote_average": 7.4},
                {"id": 3894, "media_type": "person", "name": "Christian Bale"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = api_for(&server).search_multi("batman", 1).await.unwrap();

    assert_eq!(result.total_pages, 7);
    assert_eq!(result.items.len(), 2);
    assert_eq!(result.items[0].kind, MediaKind::Movie);
    assert_eq!(result.items[0].year(), Some(1989));
    assert_eq!(result.items[1].kind, MediaKind::Tv);
    assert_eq!(result.items[1].title, "Batman");
}

#[tokio::test]
async fn test_blank_search_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = api_for(&server).search_multi("   ", 1).await.unwrap();
    assert!(result.items.is_empty());
}

#[tokio::test]
async fn test_rejected_key_surfaces_status_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/popular"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status_code": 7,
            "status_message": "Invalid API key",
            "success": false
        })))
        .mount(&server)
        .await;

    let err = api_for(&server).listing(Category::Popular, 1).await.unwrap_err();

    match &err {
        CinebotError::ApiError { status, message } => {
            assert_eq!(*status, 401);
            assert_eq!(message, "Invalid API key");
        }
        other => panic!("Expected ApiError, got {:?}", other),
    }
    assert_eq!(err.user_message(), "Invalid API key");
}

#[tokio::test]
async fn test_error_without_body_uses_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = api_for(&server).listing(Category::Upcoming, 1).await.unwrap_err();
    assert_eq!(err.user_message(), "Request failed with status 503");
}

#[tokio::test]
async fn test_category_listing_sends_fixed_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/now_playing"))
        .and(query_param("api_key", "test-key"))
        .and(query_param("language", "en-US"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 3,
            "total_pages": 12,
            "results": [{"id": 550, "title": "Fight Club", "poster_path": "/p.jpg"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = api_for(&server).listing(Category::NowPlaying, 3).await.unwrap();

    assert_eq!(result.current_page, 3);
    assert_eq!(result.total_pages, 12);
    assert_eq!(result.items[0].kind, MediaKind::Movie);
    assert_eq!(result.items[0].poster_path.as_deref(), Some("/p.jpg"));
}

#[tokio::test]
async fn test_malformed_body_is_generic_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = api_for(&server).listing(Category::TopRated, 1).await.unwrap_err();
    assert!(matches!(err, CinebotError::Parse(_)));
    assert_eq!(err.user_message(), cinebot_core::error::GENERIC_FAILURE_MESSAGE);
}

#[tokio::test]
async fn test_details_use_requested_kind() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tv/1396"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1396,
            "name": "Breaking Bad",
            "first_air_date": "2008-01-20",
            "genres": [{"id": 18, "name": "Drama"}],
            "overview": "Walter White turns to crime."
        })))
        .mount(&server)
        .await;

    let item = api_for(&server).media_details(1396, MediaKind::Tv).await.unwrap();

    assert_eq!(item.kind, MediaKind::Tv);
    assert_eq!(item.title, "Breaking Bad");
    assert_eq!(item.genre_ids, vec![18]);
}


//! Integration tests for the page-metadata fetcher.

use std::time::Duration;

use wiremock::matchers::{headers, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cast_river::metadata::MetadataFetcher;

fn fetcher() -> MetadataFetcher {
    MetadataFetcher::new(Duration::from_secs(5)).expect("Failed to build fetcher")
}

#[tokio::test]
async fn test_fetch_extracts_og_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/article"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<html><head>
                <meta property="og:title" content="Article Title">
                <meta property="og:description" content="Article description">
                <meta property="og:image" content="https://cdn.example.com/a.png">
            </head></html>"#,
            "text/html",
        ))
        .mount(&server)
        .await;

    let metadata = fetcher().fetch(&format!("{}/article", server.uri())).await;

    assert_eq!(metadata.title.as_deref(), Some("Article Title"));
    assert_eq!(metadata.description.as_deref(), Some("Article description"));
    assert_eq!(metadata.image.as_deref(), Some("https://cdn.example.com/a.png"));
}

#[tokio::test]
async fn test_fetch_sends_browser_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ua-check"))
        // wiremock's exact header matcher splits incoming values on commas,
        // so the comma inside "(KHTML, like Gecko)" makes the UA arrive as
        // two values; match both halves of the full browser UA string.
        .and(headers(
            "user-agent",
            vec![
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML",
                "like Gecko) Chrome/58.0.3029.110 Safari/537.36",
            ],
        ))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<html><head><title>UA OK</title></head></html>", "text/html"),
        )
        .mount(&server)
        .await;

    let metadata = fetcher().fetch(&format!("{}/ua-check", server.uri())).await;
    // The mock only matches when the browser UA header is present.
    assert_eq!(metadata.title.as_deref(), Some("UA OK"));
}

#[tokio::test]
async fn test_fetch_falls_back_to_title_tag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/plain"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<html><head><title>Plain Page</title></head><body>hi</body></html>",
            "text/html",
        ))
        .mount(&server)
        .await;

    let metadata = fetcher().fetch(&format!("{}/plain", server.uri())).await;

    assert_eq!(metadata.title.as_deref(), Some("Plain Page"));
    assert!(metadata.description.is_none());
    assert!(metadata.image.is_none());
}

#[tokio::test]
async fn test_non_success_status_yields_empty_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/error"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert!(fetcher()
        .fetch(&format!("{}/missing", server.uri()))
        .await
        .is_empty());
    assert!(fetcher()
        .fetch(&format!("{}/error", server.uri()))
        .await
        .is_empty());
}

#[tokio::test]
async fn test_network_error_yields_empty_metadata() {
    // Port 1 is never listening; connection is refused immediately.
    let metadata = fetcher().fetch("http://127.0.0.1:1/unreachable").await;
    assert!(metadata.is_empty());
}

#[tokio::test]
async fn test_garbage_body_yields_empty_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/garbage"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("%%% not html at all", "text/html"))
        .mount(&server)
        .await;

    let metadata = fetcher().fetch(&format!("{}/garbage", server.uri())).await;
    assert!(metadata.is_empty());
}

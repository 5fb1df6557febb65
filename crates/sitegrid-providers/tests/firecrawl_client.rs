//! Integration tests for `FirecrawlClient` against a local wiremock server.

use serde_json::json;
use sitegrid_core::{ContentProvider, ProviderError};
use sitegrid_providers::{FirecrawlClient, HttpSettings};
use wiremock::matchers::{bearer_token, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> FirecrawlClient {
    let settings = HttpSettings {
        timeout_secs: 5,
        user_agent: "sitegrid-test/0.1".to_string(),
        max_retries: 0,
        backoff_base_secs: 0,
    };
    FirecrawlClient::new("fc-test", &server.uri(), &settings)
        .expect("failed to build test FirecrawlClient")
}

// ---------------------------------------------------------------------------
// Scrape
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_returns_markdown_html_and_metadata() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/scrape"))
        .and(bearer_token("fc-test"))
        .and(body_partial_json(json!({
            "url": "https://dentpros.com",
            "formats": ["markdown", "html"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "markdown": "# Dent Pros\nCall (610) 555-0100",
                "html": "<h1>Dent Pros</h1>",
                "metadata": {"title": "Dent Pros | PDR in Bethlehem", "viewport": "width=device-width"}
            }
        })))
        .mount(&server)
        .await;

    let page = test_client(&server)
        .fetch("https://dentpros.com")
        .await
        .expect("scrape should succeed");

    assert!(page.success);
    assert!(page.markdown.contains("555-0100"));
    assert_eq!(page.title(), Some("Dent Pros | PDR in Bethlehem"));
}

#[tokio::test]
async fn unsuccessful_scrape_is_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "Site blocked"
        })))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .fetch("https://blocked.example")
        .await
        .unwrap_err();

    assert!(
        matches!(err, ProviderError::Api { provider: "firecrawl", ref message, .. } if message == "Site blocked"),
        "expected Api error, got: {err:?}"
    );
}

#[tokio::test]
async fn payment_required_is_quota_exceeded() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/scrape"))
        .respond_with(ResponseTemplate::new(402))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .fetch("https://dentpros.com")
        .await
        .unwrap_err();

    assert!(
        matches!(err, ProviderError::QuotaExceeded { provider: "firecrawl" }),
        "expected QuotaExceeded, got: {err:?}"
    );
}

#[tokio::test]
async fn rate_limit_without_retries_reports_retry_after() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/scrape"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "12"))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .fetch("https://dentpros.com")
        .await
        .unwrap_err();

    assert!(
        matches!(err, ProviderError::RateLimited { retry_after_secs: 12, .. }),
        "expected RateLimited(12), got: {err:?}"
    );
}

// ---------------------------------------------------------------------------
// Map
// ---------------------------------------------------------------------------

#[tokio::test]
async fn discover_truncates_to_limit() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/map"))
        .and(body_partial_json(json!({"url": "https://dentpros.com", "limit": 2})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "links": [
                {"url": "https://dentpros.com/services/pdr"},
                {"url": "https://dentpros.com/about"},
                {"url": "https://dentpros.com/contact"}
            ]
        })))
        .mount(&server)
        .await;

    let urls = test_client(&server)
        .discover("https://dentpros.com", 2)
        .await
        .expect("map should succeed");

    assert_eq!(
        urls,
        vec![
            "https://dentpros.com/services/pdr".to_string(),
            "https://dentpros.com/about".to_string()
        ]
    );
}

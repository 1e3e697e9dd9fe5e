// HTTP-level tests for the crawl service client

use serde_json::json;
use sitelens_client::{
    ApiError, ClientConfig, CrawlApi, CrawlClient, ListQuery, SortColumn, SortDirection, SortSpec,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> CrawlClient {
    let config = ClientConfig::new(&server.uri())
        .unwrap()
        .with_token("secret-token");
    CrawlClient::new(config).unwrap()
}

// ============================================================================
// Submission
// ============================================================================

#[tokio::test]
async fn test_submit_url_posts_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/crawl"))
        .and(header("content-type", "application/json"))
        .and(header("authorization", "Bearer secret-token"))
        .and(body_json(json!({ "url": "https://example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "message": "Crawl the url successfully"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client.submit_url("https://example.com").await.unwrap();

    assert_eq!(response.id, 42);
    assert_eq!(response.message, "Crawl the url successfully");
}

#[tokio::test]
async fn test_submit_url_error_uses_body_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/crawl"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "invalid URL format"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.submit_url("https://bad").await.unwrap_err();

    assert_eq!(err.status_code(), Some(400));
    let handled = err.handled();
    assert_eq!(handled.message, "invalid URL format");
    assert!(handled.is_http_error);
    assert_eq!(handled.status_code, Some(400));
    assert_eq!(
        handled.response_body,
        Some(json!({ "message": "invalid URL format" }))
    );
}

#[tokio::test]
async fn test_error_without_body_message_falls_back_to_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/crawl"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.submit_url("https://example.com").await.unwrap_err();

    match &err {
        ApiError::Http { status, body, .. } => {
            assert_eq!(*status, 502);
            assert!(body.is_none());
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(err.handled().message, "Request failed with status code 502");
}

// ============================================================================
// Listing
// ============================================================================

#[tokio::test]
async fn test_list_sends_query_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/crawl/list"))
        .and(query_param("currPage", "2"))
        .and(query_param("pageSize", "10"))
        .and(query_param("query", "rust"))
        .and(query_param("sorting", r#"{"page_title":true}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "list": [{
                "id": 7,
                "html_version": "HTML5",
                "url": "https://www.rust-lang.org",
                "page_title": "Rust Programming Language",
                "heading_counts": { "h1": 1, "h2": 4, "h3": 0, "h4": 0, "h5": 0, "h6": 0 },
                "internal_link_count": 30,
                "external_link_count": 12,
                "inaccessible_link_count": 0,
                "has_login_form": false,
                "error": "",
                "created_at": "2025-07-10T20:01:16Z"
            }],
            "total_count": 11
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let query = ListQuery {
        page: 2,
        page_size: 10,
        query: "rust".to_string(),
        sorting: SortSpec::by(SortColumn::PageTitle, SortDirection::Ascending),
    };
    let response = client.list(&query).await.unwrap();

    assert_eq!(response.total_count, 11);
    assert_eq!(response.list.len(), 1);
    let item = &response.list[0];
    assert_eq!(item.id, 7);
    assert_eq!(item.page_title, "Rust Programming Language");
    assert_eq!(item.heading_counts.unwrap().h2, 4);
    assert_eq!(item.internal_link_count, 30);
    assert!(item.is_success());
}

#[tokio::test]
async fn test_list_accepts_null_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/crawl/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "list": null,
            "total_count": 0
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client.list(&ListQuery::default()).await.unwrap();

    assert!(response.list.is_empty());
    assert_eq!(response.total_count, 0);
}

#[tokio::test]
async fn test_list_with_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/crawl/list"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.list(&ListQuery::default()).await.unwrap_err();

    assert!(matches!(err, ApiError::Decode(_)));
    assert!(!err.handled().is_http_error);
}

// ============================================================================
// Deletion
// ============================================================================

#[tokio::test]
async fn test_delete_sends_ids() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/crawl"))
        .and(body_json(json!({ "ids": [2, 5] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Crawl results deleted successfully"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client.delete(&[2, 5]).await.unwrap();

    assert_eq!(response.message, "Crawl results deleted successfully");
}

#[tokio::test]
async fn test_delete_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/crawl"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "no records found for the given IDs"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.delete(&[99]).await.unwrap_err();

    assert_eq!(err.status_code(), Some(404));
    assert_eq!(err.to_string(), "no records found for the given IDs");
}

#[tokio::test]
async fn test_base_url_with_path_prefix() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/backend/api/crawl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::new(&format!("{}/backend", server.uri())).unwrap();
    let client = CrawlClient::new(config).unwrap();
    let response = client.delete(&[1]).await.unwrap();

    assert_eq!(response.message, "ok");
}

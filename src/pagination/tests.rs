//! Tests for pagination module

use super::*;
use crate::error::Error;
use crate::http::{HttpClient, HttpClientConfig};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Serves canned pages in order and records every request
struct FakeEndpoint {
    pages: Mutex<VecDeque<Page<u32>>>,
    requests: Mutex<Vec<PageRequest>>,
}

impl FakeEndpoint {
    fn new(pages: Vec<Page<u32>>) -> Arc<Self> {
        Arc::new(Self {
            pages: Mutex::new(pages.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn fetch(
        self: &Arc<Self>,
        request: PageRequest,
    ) -> impl std::future::Future<Output = crate::Result<Page<u32>>> {
        let this = Arc::clone(self);
        async move {
            this.requests.lock().unwrap().push(request);
            this.pages
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| Error::Other("no more pages".to_string()))
        }
    }

    fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn numbered(range: std::ops::Range<u32>) -> Vec<u32> {
    range.collect()
}

fn test_client(server: &MockServer) -> HttpClient {
    HttpClient::with_config(
        HttpClientConfig::builder()
            .base_url(server.uri())
            .no_rate_limit()
            .build(),
    )
    .unwrap()
}

// ============================================================================
// Page Tests
// ============================================================================

#[test]
fn test_page_next_cursor() {
    let page: Page<serde_json::Value> = serde_json::from_value(json!({
        "results": [{"id": "1"}],
        "paging": {"next": {"after": "abc", "link": "https://api.hubapi.com/?after=abc"}}
    }))
    .unwrap();
    assert_eq!(page.next_cursor(), Some("abc"));
    assert_eq!(page.results.len(), 1);
}

#[test]
fn test_page_without_paging_is_last() {
    let page: Page<serde_json::Value> =
        serde_json::from_value(json!({"results": []})).unwrap();
    assert!(page.next_cursor().is_none());

    let page: Page<serde_json::Value> =
        serde_json::from_value(json!({"results": [], "paging": {}})).unwrap();
    assert!(page.next_cursor().is_none());
}

#[test]
fn test_empty_cursor_is_last() {
    let page: Page<u32> = Page::new(vec![1], Some(""));
    assert!(page.next_cursor().is_none());
}

#[test]
fn test_page_limit_shrinks_to_remaining_budget() {
    let options = FetchOptions::page_size(100).limit(Some(150));
    assert_eq!(options.page_limit(0), 100);
    assert_eq!(options.page_limit(100), 50);
    assert_eq!(options.page_limit(150), 0);

    let unlimited = FetchOptions::default();
    assert_eq!(unlimited.page_limit(10_000), MAX_PAGE_SIZE);
    assert_eq!(unlimited.remaining(10_000), None);
}

#[test]
fn test_page_request_query() {
    let request = PageRequest {
        limit: 100,
        after: Some("A".to_string()),
        remaining: None,
    };
    let config = request.apply(crate::http::RequestConfig::new());
    assert_eq!(config.query.get("limit"), Some(&"100".to_string()));
    assert_eq!(config.query.get("after"), Some(&"A".to_string()));

    let first = PageRequest {
        limit: 10,
        after: None,
        remaining: Some(10),
    };
    let config = first.apply(crate::http::RequestConfig::new());
    assert!(!config.query.contains_key("after"));
}

#[test]
fn test_page_request_trims_to_budget() {
    let request = PageRequest {
        limit: 3,
        after: None,
        remaining: Some(3),
    };
    let mut results = vec![1, 2, 3, 4, 5];
    request.trim(&mut results);
    assert_eq!(results, vec![1, 2, 3]);

    let unlimited = PageRequest {
        limit: 3,
        after: None,
        remaining: None,
    };
    let mut results = vec![1, 2, 3, 4, 5];
    unlimited.trim(&mut results);
    assert_eq!(results.len(), 5);
}

// ============================================================================
// Fetch Loop Tests
// ============================================================================

#[tokio::test]
async fn test_fetch_drains_three_pages() {
    let endpoint = FakeEndpoint::new(vec![
        Page::new(numbered(0..100), Some("A")),
        Page::new(numbered(100..200), Some("B")),
        Page::new(numbered(200..250), None),
    ]);
    let mut seen = Vec::new();

    let summary = fetch_pages(
        &FetchOptions::default(),
        &CancellationToken::new(),
        |req| endpoint.fetch(req),
        |n| seen.push(n),
    )
    .await
    .unwrap();

    assert_eq!(summary.rows, 250);
    assert_eq!(summary.pages, 3);
    assert_eq!(summary.stop, StopReason::Exhausted);
    assert_eq!(seen, numbered(0..250));

    let cursors: Vec<Option<String>> = endpoint.requests().into_iter().map(|r| r.after).collect();
    assert_eq!(
        cursors,
        vec![None, Some("A".to_string()), Some("B".to_string())]
    );
}

#[tokio::test]
async fn test_fetch_stops_at_row_limit() {
    let endpoint = FakeEndpoint::new(vec![
        Page::new(numbered(0..100), Some("A")),
        Page::new(numbered(100..200), Some("B")),
        Page::new(numbered(200..250), None),
    ]);
    let mut seen = Vec::new();

    let summary = fetch_pages(
        &FetchOptions::default().limit(Some(150)),
        &CancellationToken::new(),
        |req| endpoint.fetch(req),
        |n| seen.push(n),
    )
    .await
    .unwrap();

    assert_eq!(summary.stop, StopReason::RowLimit);
    assert_eq!(summary.rows, 150);
    assert_eq!(seen.len(), 150);

    let requests = endpoint.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].limit, 50);
    assert_eq!(requests[1].remaining, Some(50));
}

#[tokio::test]
async fn test_row_limit_is_exact_when_server_overshoots() {
    // Server ignores the requested limit
    let endpoint = FakeEndpoint::new(vec![Page::new(numbered(0..100), Some("A"))]);
    let mut seen = Vec::new();

    let summary = fetch_pages(
        &FetchOptions::default().limit(Some(7)),
        &CancellationToken::new(),
        |req| endpoint.fetch(req),
        |n| seen.push(n),
    )
    .await
    .unwrap();

    assert_eq!(seen, numbered(0..7));
    assert_eq!(summary.stop, StopReason::RowLimit);
    assert_eq!(endpoint.requests()[0].limit, 7);
}

#[tokio::test]
async fn test_zero_row_limit_makes_no_requests() {
    let endpoint = FakeEndpoint::new(vec![Page::new(numbered(0..10), None)]);
    let mut seen: Vec<u32> = Vec::new();

    let summary = fetch_pages(
        &FetchOptions::default().limit(Some(0)),
        &CancellationToken::new(),
        |req| endpoint.fetch(req),
        |n| seen.push(n),
    )
    .await
    .unwrap();

    assert_eq!(summary.rows, 0);
    assert_eq!(summary.pages, 0);
    assert!(endpoint.requests().is_empty());
}

#[tokio::test]
async fn test_empty_first_page() {
    let endpoint = FakeEndpoint::new(vec![Page::new(Vec::new(), None)]);
    let mut seen: Vec<u32> = Vec::new();

    let summary = fetch_pages(
        &FetchOptions::default(),
        &CancellationToken::new(),
        |req| endpoint.fetch(req),
        |n| seen.push(n),
    )
    .await
    .unwrap();

    assert!(seen.is_empty());
    assert_eq!(summary.pages, 1);
    assert_eq!(summary.stop, StopReason::Exhausted);
}

#[tokio::test]
async fn test_cancel_during_first_page_stops_before_second_request() {
    let endpoint = FakeEndpoint::new(vec![
        Page::new(numbered(0..100), Some("A")),
        Page::new(numbered(100..200), None),
    ]);
    let cancel = CancellationToken::new();
    let mut seen = Vec::new();

    let summary = fetch_pages(
        &FetchOptions::default(),
        &cancel,
        |req| endpoint.fetch(req),
        |n| {
            seen.push(n);
            if n == 9 {
                cancel.cancel();
            }
        },
    )
    .await
    .unwrap();

    assert_eq!(summary.stop, StopReason::Cancelled);
    assert_eq!(seen, numbered(0..10));
    assert_eq!(endpoint.requests().len(), 1);
}

#[tokio::test]
async fn test_cancel_before_start() {
    let endpoint = FakeEndpoint::new(vec![Page::new(numbered(0..10), None)]);
    let cancel = CancellationToken::new();
    cancel.cancel();
    let mut seen: Vec<u32> = Vec::new();

    let summary = fetch_pages(
        &FetchOptions::default(),
        &cancel,
        |req| endpoint.fetch(req),
        |n| seen.push(n),
    )
    .await
    .unwrap();

    assert_eq!(summary.stop, StopReason::Cancelled);
    assert!(seen.is_empty());
    assert!(endpoint.requests().is_empty());
}

#[tokio::test]
async fn test_page_error_ends_fetch() {
    let endpoint = FakeEndpoint::new(vec![Page::new(numbered(0..100), Some("A"))]);
    let mut seen = Vec::new();

    let result = fetch_pages(
        &FetchOptions::default(),
        &CancellationToken::new(),
        |req| endpoint.fetch(req),
        |n| seen.push(n),
    )
    .await;

    assert!(result.is_err());
    assert_eq!(seen.len(), 100);
}

// ============================================================================
// Association Tests
// ============================================================================

#[tokio::test]
async fn test_associations_drain_all_pages() {
    let mock_server = MockServer::start().await;
    let endpoint = "/crm/v3/objects/company/101/associations/contact";

    Mock::given(method("GET"))
        .and(path(endpoint))
        .and(query_param("limit", "500"))
        .and(query_param_is_missing("after"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"id": "1", "type": "company_to_contact"},
                {"id": 2, "type": "company_to_contact"}
            ],
            "paging": {"next": {"after": "2"}}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(endpoint))
        .and(query_param("limit", "500"))
        .and(query_param("after", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": "3", "type": "company_to_contact"}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let ids = fetch_associations(&client, "101", "company", "contact")
        .await
        .unwrap();

    let ids: Vec<&str> = ids.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
}

#[tokio::test]
async fn test_associations_error_carries_operation() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = fetch_associations(&client, "7", "deal", "company")
        .await
        .unwrap_err();

    assert!(err.to_string().contains("list_associations"));
    assert!(err.is_retryable());
}

#[test]
fn test_associations_path() {
    assert_eq!(
        associations_path("ticket", "9", "deal").as_deref(),
        Some("/crm/v3/objects/ticket/9/associations/deal")
    );
    assert_eq!(
        associations_path("ticket", "9/../../company/1", "deal").as_deref(),
        Some("/crm/v3/objects/ticket/9%2F..%2F..%2Fcompany%2F1/associations/deal")
    );
    assert_eq!(associations_path("ticket", "..", "deal"), None);
}

#[tokio::test]
async fn test_associations_reject_dot_segment_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = fetch_associations(&client, "..", "deal", "company")
        .await
        .unwrap_err();

    assert!(err.is_config());
    assert!(err.to_string().contains("record_id"));
}

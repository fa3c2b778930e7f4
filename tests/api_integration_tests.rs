//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tokio::sync::RwLock;
use tower::ServiceExt;

use doc_digest::api::create_router;
use doc_digest::cache::{current_timestamp_ms, DurableCache};
use doc_digest::dedup::DedupCache;
use doc_digest::error::Result;
use doc_digest::external::{
    ContentProcessor, ExtractiveProcessor, LogNotifier, PlainIdentityResolver,
};
use doc_digest::history::HistoryStore;
use doc_digest::models::Summary;
use doc_digest::quota::QuotaTracker;
use doc_digest::storage::MemoryStorage;
use doc_digest::AppState;

// == Helper Functions ==

/// Processor that counts invocations, for deduplication assertions.
struct CountingProcessor {
    invocations: Arc<AtomicUsize>,
}

#[async_trait]
impl ContentProcessor for CountingProcessor {
    async fn invoke(&self, input: &str) -> Result<Summary> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        Ok(Summary {
            text: format!("summary of {} chars", input.len()),
            input_chars: input.chars().count(),
            generated_at: current_timestamp_ms(),
        })
    }
}

fn build_state(
    daily_limit: u32,
    max_history: usize,
    processor: Arc<dyn ContentProcessor>,
) -> AppState {
    let quota_cache = Arc::new(RwLock::new(DurableCache::new(
        "quota",
        Box::new(MemoryStorage::new()),
    )));
    let history_cache = Arc::new(RwLock::new(DurableCache::new(
        "history",
        Box::new(MemoryStorage::new()),
    )));

    AppState::new(
        QuotaTracker::new(quota_cache, daily_limit, 60_000),
        DedupCache::new(60_000),
        HistoryStore::new(history_cache, max_history),
        processor,
        Arc::new(PlainIdentityResolver::default()),
        Arc::new(LogNotifier),
    )
}

fn create_test_app() -> Router {
    create_router(build_state(
        10,
        10,
        Arc::new(ExtractiveProcessor::default()),
    ))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn summarize_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/summarize")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// == Summarize Endpoint Tests ==

#[tokio::test]
async fn test_summarize_success() {
    let app = create_test_app();

    let response = app
        .oneshot(summarize_request(
            r#"{"user_id":"u1","content":"First sentence. Second sentence. Third one."}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert!(json["summary"].as_str().unwrap().contains("First sentence"));
    assert_eq!(json["source"].as_str().unwrap(), "fresh");
    assert_eq!(json["quota"]["used"].as_u64().unwrap(), 1);
    assert_eq!(json["quota"]["remaining"].as_u64().unwrap(), 9);
}

#[tokio::test]
async fn test_summarize_anonymous_has_no_quota() {
    let app = create_test_app();

    let response = app
        .oneshot(summarize_request(r#"{"content":"Anonymous text."}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert!(json.get("quota").is_none());
}

#[tokio::test]
async fn test_summarize_empty_content_rejected() {
    let app = create_test_app();

    let response = app
        .oneshot(summarize_request(r#"{"user_id":"u1","content":"  "}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_summarize_invalid_json_rejected() {
    let app = create_test_app();

    let response = app
        .oneshot(summarize_request("this is not json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// == Quota Flow Tests ==

#[tokio::test]
async fn test_quota_exhaustion_over_http() {
    let state = build_state(2, 10, Arc::new(ExtractiveProcessor::default()));
    let app = create_router(state);

    // Distinct content each call so deduplication plays no part
    for i in 0..2 {
        let response = app
            .clone()
            .oneshot(summarize_request(&format!(
                r#"{{"user_id":"u1","content":"Document number {}."}}"#,
                i
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .oneshot(summarize_request(
            r#"{"user_id":"u1","content":"One document too many."}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["remaining"].as_u64().unwrap(), 0);
    assert!(json["reset_at"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_quota_peek_and_reset_flow() {
    let state = build_state(5, 10, Arc::new(ExtractiveProcessor::default()));
    let app = create_router(state);

    app.clone()
        .oneshot(summarize_request(
            r#"{"user_id":"u1","content":"A document."}"#,
        ))
        .await
        .unwrap();

    // Peek reflects the consumption
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/quota/u1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["used"].as_u64().unwrap(), 1);
    assert_eq!(json["remaining"].as_u64().unwrap(), 4);

    // Administrative reset
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/quota/u1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Fresh window afterwards
    let response = app
        .oneshot(
            Request::builder()
                .uri("/quota/u1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["used"].as_u64().unwrap(), 0);
    assert_eq!(json["remaining"].as_u64().unwrap(), 5);
}

// == Deduplication Tests ==

#[tokio::test]
async fn test_repeat_content_served_from_cache() {
    let invocations = Arc::new(AtomicUsize::new(0));
    let state = build_state(
        10,
        10,
        Arc::new(CountingProcessor {
            invocations: invocations.clone(),
        }),
    );
    let app = create_router(state);

    let body = r#"{"user_id":"u1","content":"The same document twice."}"#;

    let first = app.clone().oneshot(summarize_request(body)).await.unwrap();
    let first_json = body_to_json(first.into_body()).await;
    assert_eq!(first_json["source"].as_str().unwrap(), "fresh");

    let second = app.oneshot(summarize_request(body)).await.unwrap();
    let second_json = body_to_json(second.into_body()).await;
    assert_eq!(second_json["source"].as_str().unwrap(), "cached");
    assert_eq!(
        first_json["summary"].as_str().unwrap(),
        second_json["summary"].as_str().unwrap()
    );

    // The upstream processor ran exactly once
    assert_eq!(invocations.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_whitespace_variant_hits_same_fingerprint() {
    let invocations = Arc::new(AtomicUsize::new(0));
    let state = build_state(
        10,
        10,
        Arc::new(CountingProcessor {
            invocations: invocations.clone(),
        }),
    );
    let app = create_router(state);

    app.clone()
        .oneshot(summarize_request(
            r#"{"content":"spaced   out    document"}"#,
        ))
        .await
        .unwrap();
    let response = app
        .oneshot(summarize_request(r#"{"content":"spaced out document"}"#))
        .await
        .unwrap();

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["source"].as_str().unwrap(), "cached");
    assert_eq!(invocations.load(Ordering::SeqCst), 1);
}

// == History Tests ==

#[tokio::test]
async fn test_history_returns_newest_first_and_caps() {
    let state = build_state(10, 2, Arc::new(ExtractiveProcessor::default()));
    let app = create_router(state);

    for i in 0..3 {
        app.clone()
            .oneshot(summarize_request(&format!(
                r#"{{"user_id":"u1","content":"Document number {}."}}"#,
                i
            )))
            .await
            .unwrap();
    }

    let response = app
        .oneshot(
            Request::builder()
                .uri("/history/u1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    let summaries = json["summaries"].as_array().unwrap();
    assert_eq!(summaries.len(), 2);
    assert!(summaries[0]["summary"]["text"]
        .as_str()
        .unwrap()
        .contains("number 2"));
}

#[tokio::test]
async fn test_history_empty_for_unknown_user() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/history/nobody")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert!(json["summaries"].as_array().unwrap().is_empty());
}

// == Stats and Health Tests ==

#[tokio::test]
async fn test_stats_endpoint_reflects_traffic() {
    let app = create_test_app();

    let body = r#"{"user_id":"u1","content":"Tracked document."}"#;
    app.clone().oneshot(summarize_request(body)).await.unwrap();
    app.clone().oneshot(summarize_request(body)).await.unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/stats")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["dedup"]["started"].as_u64().unwrap(), 1);
    assert_eq!(json["dedup"]["hits"].as_u64().unwrap(), 1);
    assert_eq!(json["quota_entries"].as_u64().unwrap(), 1);
    assert_eq!(json["history_users"].as_u64().unwrap(), 1);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"].as_str().unwrap(), "healthy");
}

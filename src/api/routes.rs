//! API Routes
//!
//! Configures the Axum router with all service endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    health_handler, history_handler, quota_peek_handler, quota_reset_handler, stats_handler,
    summarize_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /summarize` - Quota-gated, deduplicated summarization
/// - `GET /quota/:user_id` - Read-only usage query
/// - `DELETE /quota/:user_id` - Administrative quota reset
/// - `GET /history/:user_id` - Retained summaries, newest first
/// - `GET /stats` - Deduplication and table statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route("/summarize", post(summarize_handler))
        .route(
            "/quota/:user_id",
            get(quota_peek_handler).delete(quota_reset_handler),
        )
        .route("/history/:user_id", get(history_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::DurableCache;
    use crate::dedup::DedupCache;
    use crate::external::{ExtractiveProcessor, LogNotifier, PlainIdentityResolver};
    use crate::history::HistoryStore;
    use crate::quota::QuotaTracker;
    use crate::storage::MemoryStorage;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tokio::sync::RwLock;
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let quota_cache = Arc::new(RwLock::new(DurableCache::new(
            "quota",
            Box::new(MemoryStorage::new()),
        )));
        let history_cache = Arc::new(RwLock::new(DurableCache::new(
            "history",
            Box::new(MemoryStorage::new()),
        )));
        let state = AppState::new(
            QuotaTracker::new(quota_cache, 10, 60_000),
            DedupCache::new(60_000),
            HistoryStore::new(history_cache, 10),
            Arc::new(ExtractiveProcessor::default()),
            Arc::new(PlainIdentityResolver::default()),
            Arc::new(LogNotifier),
        );
        create_router(state)
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
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        let app = create_test_app();

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
    }

    #[tokio::test]
    async fn test_summarize_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/summarize")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"user_id":"u1","content":"A document to summarize."}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_quota_endpoint_unknown_user() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/quota/nobody")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}

//! API Handlers
//!
//! HTTP request handlers for each service endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tokio::sync::RwLock;
use tracing::warn;

use crate::cache::DurableCache;
use crate::config::Config;
use crate::dedup::{fingerprint, normalize, DedupCache};
use crate::error::{DigestError, Result};
use crate::external::{
    ContentProcessor, ExtractiveProcessor, IdentityResolver, LogNotifier, Notifier,
    PlainIdentityResolver,
};
use crate::history::HistoryStore;
use crate::models::{
    HealthResponse, HistoryResponse, QuotaExceededResponse, QuotaResponse, QuotaStatus,
    ResetResponse, StatsResponse, SummarizeRequest, SummarizeResponse,
};
use crate::quota::QuotaTracker;
use crate::storage::FileStorage;

/// Application state shared across all handlers.
///
/// Every component is an explicitly constructed instance; there are no
/// process-wide singletons, so tests get fresh state per instance.
#[derive(Clone)]
pub struct AppState {
    /// Per-user rolling-window rate limiter
    pub quota: QuotaTracker,
    /// Request deduplication cache (memory-only)
    pub dedup: DedupCache,
    /// Per-user retained results
    pub history: HistoryStore,
    /// The opaque summarization pipeline
    pub processor: Arc<dyn ContentProcessor>,
    /// Credential-to-user-id resolution
    pub identity: Arc<dyn IdentityResolver>,
    /// Outbound message delivery
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    /// Creates a new AppState from already-constructed components.
    pub fn new(
        quota: QuotaTracker,
        dedup: DedupCache,
        history: HistoryStore,
        processor: Arc<dyn ContentProcessor>,
        identity: Arc<dyn IdentityResolver>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            quota,
            dedup,
            history,
            processor,
            identity,
            notifier,
        }
    }

    /// Creates a new AppState from configuration, loading the persisted
    /// quota and history tables from the data directory.
    pub async fn from_config(config: &Config) -> Self {
        let quota_cache = Arc::new(RwLock::new(
            DurableCache::load(
                "quota",
                Box::new(FileStorage::new(config.data_dir.join("quota.json"))),
            )
            .await,
        ));
        let history_cache = Arc::new(RwLock::new(
            DurableCache::load(
                "history",
                Box::new(FileStorage::new(config.data_dir.join("history.json"))),
            )
            .await,
        ));

        Self::new(
            QuotaTracker::new(quota_cache, config.daily_limit, config.window_length_ms),
            DedupCache::new(config.dedup_ttl_ms),
            HistoryStore::new(history_cache, config.max_history_per_user),
            Arc::new(ExtractiveProcessor::default()),
            Arc::new(PlainIdentityResolver::default()),
            Arc::new(LogNotifier),
        )
    }
}

/// Handler for POST /summarize
///
/// Order of operations: validate, resolve identity, quota gate,
/// deduplicated summarization, history append, optional notification.
/// Anonymous callers skip the quota gate entirely and never create a
/// quota record.
pub async fn summarize_handler(
    State(state): State<AppState>,
    Json(req): Json<SummarizeRequest>,
) -> Result<Response> {
    // Validate request
    if let Some(error_msg) = req.validate() {
        return Err(DigestError::InvalidRequest(error_msg));
    }

    let user_id = req
        .user_id
        .as_deref()
        .and_then(|raw| state.identity.resolve_user_id(raw));

    // Quota gate for identified callers
    let quota = match &user_id {
        Some(uid) => {
            let decision = state.quota.check_and_consume(uid).await;
            if !decision.allowed {
                return Ok((
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(QuotaExceededResponse::new(decision.reset_at)),
                )
                    .into_response());
            }
            Some(QuotaStatus {
                used: state.quota.limit() - decision.remaining,
                remaining: decision.remaining,
                reset_at: decision.reset_at,
            })
        }
        None => None,
    };

    // Deduplicated summarization over the normalized content
    let content = normalize(&req.content);
    let fp = fingerprint(&content);
    let processor = state.processor.clone();
    let (summary, source) = state
        .dedup
        .get_or_compute(&fp, || async move { processor.invoke(&content).await })
        .await?;

    if let Some(uid) = &user_id {
        state.history.append(uid, summary.clone()).await;

        if req.notify {
            // Delivery is best-effort; the response does not depend on it
            if let Err(e) = state.notifier.deliver(uid, &summary.text).await {
                warn!("Notification delivery failed for '{}': {}", uid, e);
            }
        }
    }

    Ok(Json(SummarizeResponse {
        summary: summary.text,
        fingerprint: fp,
        source,
        input_chars: summary.input_chars,
        generated_at: summary.generated_at,
        quota,
    })
    .into_response())
}

/// Handler for GET /quota/:user_id
///
/// Read-only usage query; never creates or mutates a record.
pub async fn quota_peek_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<QuotaResponse> {
    let usage = state.quota.peek(&user_id).await;
    Json(QuotaResponse::new(user_id, usage))
}

/// Handler for DELETE /quota/:user_id
///
/// Administrative reset: the next check starts a fresh window.
pub async fn quota_reset_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<ResetResponse> {
    state.quota.reset(&user_id).await;
    Json(ResetResponse::new(user_id))
}

/// Handler for GET /history/:user_id
pub async fn history_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<HistoryResponse> {
    let summaries = state.history.list(&user_id).await;
    Json(HistoryResponse { user_id, summaries })
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let dedup = state.dedup.stats();
    let quota_entries = state.quota.cache().read().await.len();
    let history_users = state.history.cache().read().await.len();

    Json(StatsResponse::new(dedup, quota_entries, history_users))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

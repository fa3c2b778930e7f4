//! Doc Digest - A document summarization service
//!
//! Quota-gated, deduplicated document summarization with periodically
//! persisted counters.

mod api;
mod cache;
mod config;
mod dedup;
mod error;
mod external;
mod history;
mod models;
mod quota;
mod storage;
mod tasks;

use std::net::SocketAddr;

use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{create_router, AppState};
use config::Config;
use tasks::{spawn_dedup_sweep_task, spawn_flush_task, spawn_quota_sweep_task};

/// Main entry point for the summarization service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Load persisted quota and history tables from the data directory
/// 4. Start background flush and sweep tasks
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. On SIGINT/SIGTERM: stop tasks and force a final flush
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "doc_digest=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Doc Digest summarization service");

    // Load configuration from environment variables
    let config = Config::from_env();
    info!(
        "Configuration loaded: daily_limit={}, window={}ms, flush_interval={}ms, dedup_ttl={}ms, port={}",
        config.daily_limit,
        config.window_length_ms,
        config.flush_interval_ms,
        config.dedup_ttl_ms,
        config.server_port
    );

    // Load persisted state and build application state
    let state = AppState::from_config(&config).await;
    info!("Quota and history tables loaded from {:?}", config.data_dir);

    // Start background tasks
    let task_handles = vec![
        spawn_flush_task(state.quota.cache().clone(), config.flush_interval_ms),
        spawn_flush_task(state.history.cache().clone(), config.flush_interval_ms),
        spawn_dedup_sweep_task(state.dedup.clone(), config.dedup_sweep_interval_ms),
        spawn_quota_sweep_task(state.quota.clone(), config.dedup_sweep_interval_ms),
    ];
    info!("Background flush and sweep tasks started");

    // Create router with all endpoints
    let app = create_router(state.clone());

    // Bind to configured port
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stop background tasks and force a final flush so the last few
    // seconds of mutations are not lost
    for handle in task_handles {
        handle.abort();
    }
    if let Err(e) = state.quota.cache().write().await.flush().await {
        error!("Final quota flush failed: {}", e);
    }
    if let Err(e) = state.history.cache().write().await.flush().await {
        error!("Final history flush failed: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}

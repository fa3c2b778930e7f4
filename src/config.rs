//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::path::PathBuf;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum permitted summarizations per user per window
    pub daily_limit: u32,
    /// Quota rolling window length in milliseconds
    pub window_length_ms: u64,
    /// Durable-store flush cadence in milliseconds
    pub flush_interval_ms: u64,
    /// Lifetime of a resolved deduplication entry in milliseconds
    pub dedup_ttl_ms: u64,
    /// Deduplication cleanup cadence in milliseconds
    pub dedup_sweep_interval_ms: u64,
    /// Retained summaries per user
    pub max_history_per_user: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Directory holding the persisted cache files
    pub data_dir: PathBuf,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DAILY_LIMIT` - Summarizations per user per window (default: 10)
    /// - `WINDOW_LENGTH_MS` - Quota window length (default: 86400000, 24h)
    /// - `FLUSH_INTERVAL_MS` - Flush cadence (default: 5000)
    /// - `DEDUP_TTL_MS` - Resolved dedup entry lifetime (default: 3600000, 1h)
    /// - `DEDUP_SWEEP_INTERVAL_MS` - Dedup cleanup cadence (default: 600000, 10min)
    /// - `MAX_HISTORY_PER_USER` - Retained summaries per user (default: 10)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `DATA_DIR` - Persistence directory (default: ./data)
    pub fn from_env() -> Self {
        Self {
            daily_limit: env::var("DAILY_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            window_length_ms: env::var("WINDOW_LENGTH_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(86_400_000),
            flush_interval_ms: env::var("FLUSH_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5_000),
            dedup_ttl_ms: env::var("DEDUP_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3_600_000),
            dedup_sweep_interval_ms: env::var("DEDUP_SWEEP_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(600_000),
            max_history_per_user: env::var("MAX_HISTORY_PER_USER")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            data_dir: env::var("DATA_DIR")
                .ok()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./data")),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            daily_limit: 10,
            window_length_ms: 86_400_000,
            flush_interval_ms: 5_000,
            dedup_ttl_ms: 3_600_000,
            dedup_sweep_interval_ms: 600_000,
            max_history_per_user: 10,
            server_port: 3000,
            data_dir: PathBuf::from("./data"),
        }
    }
}

//! Request and Response models for the summarization API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies, plus the
//! core `Summary` payload shared across components.

pub mod requests;
pub mod responses;
mod summary;

// Re-export commonly used types
pub use requests::SummarizeRequest;
pub use responses::{
    ErrorResponse, HealthResponse, HistoryResponse, QuotaExceededResponse, QuotaResponse,
    QuotaStatus, ResetResponse, StatsResponse, SummarizeResponse,
};
pub use summary::Summary;

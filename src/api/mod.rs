//! API Module
//!
//! HTTP handlers and routing for the summarization service REST API.
//!
//! # Endpoints
//! - `POST /summarize` - Quota-gated, deduplicated summarization
//! - `GET /quota/:user_id` - Read-only usage query
//! - `DELETE /quota/:user_id` - Administrative quota reset
//! - `GET /history/:user_id` - Retained summaries
//! - `GET /stats` - Deduplication and table statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;

//! HTTP layer for GCP Logger.
//!
//! A small axum service that demonstrates request-scoped enrichment:
//! - `request_logging` middleware logs one entry per completed request
//! - handlers log through the shared [`LogEnricher`] with the live request

use std::sync::Arc;

use crate::enrich::LogEnricher;

pub mod handlers;
mod middleware;
mod routes;
mod types;

pub use middleware::request_logging;
pub use routes::build_router;
pub use types::*;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub enricher: Arc<LogEnricher>,
}

impl AppState {
    pub fn new(enricher: LogEnricher) -> Self {
        Self {
            enricher: Arc::new(enricher),
        }
    }
}

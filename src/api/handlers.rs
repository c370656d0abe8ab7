//! HTTP request handlers.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    Json,
};

use crate::api::types::*;
use crate::api::AppState;

/// GET /
pub async fn hello(State(state): State<AppState>, request: Request) -> &'static str {
    state.enricher.log("hello", Some(&request), None);
    "hello"
}

/// Simulated failure, logged with its cause chain.
///
/// GET /fail
pub async fn fail(
    State(state): State<AppState>,
    request: Request,
) -> (StatusCode, Json<ErrorResponse>) {
    let err = anyhow::anyhow!("payment provider unreachable").context("checkout failed");
    state.enricher.error(&err, Some(&request), None);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

/// GET /health
pub async fn health(State(_state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

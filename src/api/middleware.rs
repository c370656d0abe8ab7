//! Request logging middleware for axum.

use std::time::Instant;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use serde_json::json;

use crate::api::AppState;
use crate::context::RequestSnapshot;
use crate::domain::{LogPayload, Severity};

/// Log one entry per completed request.
///
/// Severity follows the response status. The captured [`RequestSnapshot`]
/// is attached to the response extensions so outer layers can log against
/// the same request (see [`crate::context::attached_request`]).
pub async fn request_logging(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let snapshot = RequestSnapshot::from_request(&request);
    let started = Instant::now();

    let mut response = next.run(request).await;

    let status = response.status().as_u16();
    let payload = LogPayload::from_value(json!({
        "event": "request completed",
        "responseStatus": status,
        "latencyMs": started.elapsed().as_millis() as u64,
    }));
    state.enricher.emit(
        Severity::from_http_status(status),
        payload,
        Some(&snapshot),
        None,
    );

    response.extensions_mut().insert(snapshot);
    response
}

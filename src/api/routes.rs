//! Route definitions for the API.

use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::api::handlers;
use crate::api::middleware::request_logging;
use crate::api::AppState;

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::hello))
        .route("/fail", get(handlers::fail))
        .route("/health", get(handlers::health))
        .layer(middleware::from_fn_with_state(state.clone(), request_logging))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::config::LoggerConfig;
    use crate::context::{attached_request, RequestContext};
    use crate::domain::{Severity, HTTP_REQUEST_KEY, TRACE_KEY};
    use crate::enrich::LogEnricher;
    use crate::sink::MemorySink;

    fn app(config: LoggerConfig) -> (Router, Arc<MemorySink>) {
        let memory = Arc::new(MemorySink::new());
        let enricher = LogEnricher::new(config, memory.clone());
        (build_router(AppState::new(enricher)), memory)
    }

    fn get_request(uri: &str) -> axum::http::request::Builder {
        Request::builder()
            .method("GET")
            .uri(uri)
            .header("host", "shop.example.com")
    }

    #[tokio::test]
    async fn test_hello_logs_handler_and_completion_entries() {
        let (app, memory) = app(LoggerConfig::default());

        let response = app
            .oneshot(get_request("/?page=2").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let entries = memory.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].severity, Severity::Info);
        assert_eq!(
            entries[0].message,
            "GET http://shop.example.com/?page=2 - hello"
        );
        assert_eq!(entries[0].metadata[HTTP_REQUEST_KEY]["status"], json!(200));
        assert_eq!(entries[1].metadata["event"], json!("request completed"));
        assert_eq!(entries[1].metadata["responseStatus"], json!(200));

        let attached = attached_request(&response).unwrap();
        assert_eq!(attached.original_url(), "/?page=2");
    }

    #[tokio::test]
    async fn test_fail_logs_error_with_cause_chain() {
        let (app, memory) = app(LoggerConfig::default());

        let response = app
            .oneshot(get_request("/fail").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let entries = memory.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].severity, Severity::Error);
        assert_eq!(
            entries[0].message,
            "GET http://shop.example.com/fail - checkout failed"
        );
        assert_eq!(entries[0].metadata["message"], json!("checkout failed"));
        let stack = entries[0].metadata["stack"].as_str().unwrap();
        assert!(stack.contains("payment provider unreachable"));
        assert_eq!(entries[0].metadata[HTTP_REQUEST_KEY]["status"], json!(500));

        // The completion entry follows the response status.
        assert_eq!(entries[1].severity, Severity::Error);
    }

    #[tokio::test]
    async fn test_user_header_and_trace_are_attached() {
        let config = LoggerConfig {
            project_id: Some("my-proj".to_string()),
            ..LoggerConfig::default()
        };
        let (app, memory) = app(config);
        let user = STANDARD.encode(r#"{"id":"u-7"}"#);

        let response = app
            .oneshot(
                get_request("/")
                    .header("baw-user", user)
                    .header("x-cloud-trace-context", "abc123/1;o=1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let entries = memory.entries();
        assert_eq!(entries[0].metadata["bawUser"], json!({"id": "u-7"}));
        assert_eq!(
            entries[0].metadata[HTTP_REQUEST_KEY][TRACE_KEY],
            json!("projects/my-proj/traces/abc123")
        );
    }

    #[tokio::test]
    async fn test_malformed_user_header_adds_warning() {
        let (app, memory) = app(LoggerConfig::default());

        let response = app
            .oneshot(
                get_request("/")
                    .header("baw-user", "%%%not-base64%%%")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let entries = memory.entries();
        // handler entry + warning, completion entry + warning
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].message, "GET http://shop.example.com/ - hello");
        assert!(entries[0].metadata.get("bawUser").is_none());
        assert_eq!(entries[1].severity, Severity::Warning);
        assert_eq!(entries[1].metadata["header"], json!("baw-user"));
    }

    #[tokio::test]
    async fn test_health_check() {
        let (app, memory) = app(LoggerConfig::default());

        let response = app
            .oneshot(get_request("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let health: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(health["status"], json!("healthy"));
        assert_eq!(health["version"], json!(env!("CARGO_PKG_VERSION")));

        // Only the completion entry.
        assert_eq!(memory.len(), 1);
    }
}

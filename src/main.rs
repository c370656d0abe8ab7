//! GCP Logger demo service.
//!
//! Serves a few routes whose requests are logged through the enricher, so
//! the emitted Cloud Logging records can be inspected on stdout.

use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::json;
use tokio::net::TcpListener;

use gcp_logger::api::{build_router, AppState};
use gcp_logger::{build_sink, logging, LogEnricher, LoggerConfig, RequestContext, UserIdentity};

const DEFAULT_PORT: u16 = 8080;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if present)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: No .env file loaded ({e})");
    }

    let config = LoggerConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {e}");
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    logging::init(&config);

    tracing::info!("Starting GCP Logger v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        service = ?config.service_name,
        project = ?config.project_id,
        environment = %config.environment,
        min_severity = %config.min_severity,
        output = %config.output,
        "Configuration loaded"
    );

    let sink = build_sink(&config).map_err(|e| {
        tracing::error!(error = %e, "Failed to build log sink");
        anyhow::anyhow!("Sink error: {}", e)
    })?;
    tracing::info!(transports = ?sink.transport_names(), "Log sink ready");

    // Fallback identity for requests without the user header.
    let enricher = LogEnricher::new(config, Arc::new(sink)).with_user_extractor(
        |request: &dyn RequestContext| {
            request
                .header("x-user-id")
                .map(|id| UserIdentity::new(json!({ "id": id })))
        },
    );

    let app = build_router(AppState::new(enricher));

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(address = %addr, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

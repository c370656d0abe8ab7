//! Tracing setup for GCP Logger's own diagnostics.
//!
//! Diagnostics go to stderr so they never interleave with the structured
//! records the cloud transport writes to stdout.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggerConfig;

/// Initialize the tracing subscriber.
///
/// Reads log level from RUST_LOG environment variable.
/// Defaults to `gcp_logger=info,tower_http=info`. Development uses
/// human-readable output, everything else JSON.
pub fn init(config: &LoggerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("gcp_logger=info,tower_http=info"));

    let registry = tracing_subscriber::registry().with(filter);

    if config.is_development() {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

/// Initialize tracing for tests (human-readable format, no JSON).
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("gcp_logger=debug")
        .try_init();
}

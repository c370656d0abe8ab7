//! Console transport for local development.
//!
//! Echoes entries as `tracing` events so they show up in whatever
//! subscriber the host installed (see [`crate::logging::init`]).

use crate::domain::Severity;
use crate::sink::{LogEntry, ServiceContext, Transport};

/// Target of the echoed events, for filtering with `RUST_LOG`.
pub const CONSOLE_TARGET: &str = "gcp_logger::console";

#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleTransport;

impl ConsoleTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Transport for ConsoleTransport {
    fn name(&self) -> &'static str {
        "console"
    }

    fn emit(&self, entry: &LogEntry, service_context: Option<&ServiceContext>) {
        let metadata = serde_json::to_string(&entry.metadata).unwrap_or_default();
        let service = service_context.map(|sc| sc.service.as_str()).unwrap_or("-");

        match entry.severity {
            Severity::Info => {
                tracing::info!(target: CONSOLE_TARGET, service, metadata = %metadata, "{}", entry.message)
            }
            Severity::Warning => {
                tracing::warn!(target: CONSOLE_TARGET, service, metadata = %metadata, "{}", entry.message)
            }
            Severity::Error => {
                tracing::error!(target: CONSOLE_TARGET, service, metadata = %metadata, "{}", entry.message)
            }
        }
    }
}

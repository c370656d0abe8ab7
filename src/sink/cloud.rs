//! Cloud Logging transport.
//!
//! Writes one JSON object per line in the structured logging format the
//! Cloud Run and GKE logging agents ingest from stdout. Special keys
//! (`severity`, `message`, `logging.googleapis.com/*`, `serviceContext`)
//! are promoted by the agent; everything else lands in `jsonPayload`.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use chrono::SecondsFormat;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::{Metadata, Severity, HTTP_REQUEST_KEY, TRACE_KEY};
use crate::sink::{LogEntry, ServiceContext, Transport};

/// Key Cloud Logging uses to deduplicate entries.
pub const INSERT_ID_KEY: &str = "logging.googleapis.com/insertId";
/// Marks an entry as an error event for Error Reporting.
pub const REPORTED_ERROR_EVENT: &str =
    "type.googleapis.com/google.devtools.clouderrorreporting.v1beta1.ReportedErrorEvent";

/// Transport writing structured JSON lines.
pub struct CloudTransport {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl CloudTransport {
    pub fn stdout() -> Self {
        Self::from_writer(io::stdout())
    }

    pub fn stderr() -> Self {
        Self::from_writer(io::stderr())
    }

    /// Append to a file, creating it if needed.
    pub fn file(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::from_writer(file))
    }

    pub fn from_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    /// Render an entry as a Cloud Logging structured record.
    pub fn render(entry: &LogEntry, service_context: Option<&ServiceContext>) -> Metadata {
        let mut record = entry.metadata.clone();

        // Cloud Logging only correlates traces from the top-level key.
        if let Some(trace) = record
            .get(HTTP_REQUEST_KEY)
            .and_then(|http| http.get(TRACE_KEY))
            .cloned()
        {
            record.insert(TRACE_KEY.to_string(), trace);
        }

        record.insert(
            "severity".to_string(),
            Value::String(entry.severity.as_str().to_string()),
        );
        record.insert("message".to_string(), Value::String(entry.message.clone()));
        record.insert(
            "time".to_string(),
            Value::String(entry.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        record.insert(
            INSERT_ID_KEY.to_string(),
            Value::String(Uuid::new_v4().to_string()),
        );

        if let Some(service_context) = service_context {
            let mut context = Metadata::new();
            context.insert(
                "service".to_string(),
                Value::String(service_context.service.clone()),
            );
            if let Some(version) = &service_context.version {
                context.insert("version".to_string(), Value::String(version.clone()));
            }
            record.insert("serviceContext".to_string(), Value::Object(context));

            if entry.severity == Severity::Error {
                record.insert(
                    "@type".to_string(),
                    Value::String(REPORTED_ERROR_EVENT.to_string()),
                );
                if let Some(stack) = entry.metadata.get("stack").and_then(Value::as_str) {
                    record.insert("stack_trace".to_string(), Value::String(stack.to_string()));
                }
            }
        }

        record
    }
}

impl Transport for CloudTransport {
    fn name(&self) -> &'static str {
        "cloud"
    }

    fn emit(&self, entry: &LogEntry, service_context: Option<&ServiceContext>) {
        let line = Value::Object(Self::render(entry, service_context)).to_string();
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
            tracing::debug!(error = %e, "Cloud transport write failed");
        }
    }
}

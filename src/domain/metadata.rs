//! Structured metadata attached to log entries.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::context::RequestContext;
use crate::domain::Severity;

/// Key Cloud Logging reads the trace resource name from.
pub const TRACE_KEY: &str = "logging.googleapis.com/trace";
/// Key holding [`HttpRequestMetadata`] in the entry metadata.
pub const HTTP_REQUEST_KEY: &str = "httpRequest";

/// Metadata mapping built fresh for every entry.
pub type Metadata = Map<String, Value>;

/// The `httpRequest` section of an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpRequestMetadata {
    /// Derived from severity, not the real response status.
    pub status: u16,
    pub request_url: String,
    pub request_method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_ip: Option<String>,
    pub request_size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(rename = "logging.googleapis.com/trace", skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

impl HttpRequestMetadata {
    /// Capture request fields; user agent and trace are filled by the caller.
    pub fn from_context(request: &dyn RequestContext, severity: Severity) -> Self {
        Self {
            status: severity.http_status(),
            request_url: request.request_url(),
            request_method: request.method().to_string(),
            remote_ip: request.remote_address(),
            request_size: request.bytes_read(),
            user_agent: None,
            trace: None,
        }
    }
}

/// Trace resource name from an `X-Cloud-Trace-Context` value
/// (`TRACE_ID/SPAN_ID;o=OPTIONS`).
pub fn trace_resource(project_id: &str, header_value: &str) -> Option<String> {
    let trace = header_value.split('/').next()?.trim();
    if trace.is_empty() {
        return None;
    }
    Some(format!("projects/{}/traces/{}", project_id, trace))
}

//! Entry Builder - assembles the message and metadata of one log entry.
//!
//! The builder is pure: it borrows the payload, the request and the user,
//! and returns freshly allocated values. Failures that only affect how rich
//! the entry is (a malformed user header) are returned alongside the entry
//! instead of failing the build.

use serde_json::Value;

use crate::config::LoggerConfig;
use crate::context::RequestContext;
use crate::domain::{
    trace_resource, HttpRequestMetadata, LogPayload, Metadata, Severity, UserExtractor,
    UserIdentity, HTTP_REQUEST_KEY,
};
use crate::error::LoggerError;

/// Result of building one entry.
#[derive(Debug)]
pub struct BuiltEntry {
    pub message: String,
    pub metadata: Metadata,
    /// Set when the user header was present but could not be decoded.
    pub user_header_error: Option<LoggerError>,
}

/// Builds log entries for a given configuration and user extractor.
pub struct EntryBuilder<'a> {
    config: &'a LoggerConfig,
    extractor: Option<&'a dyn UserExtractor>,
}

impl<'a> EntryBuilder<'a> {
    pub fn new(config: &'a LoggerConfig) -> Self {
        Self {
            config,
            extractor: None,
        }
    }

    pub fn with_extractor(mut self, extractor: Option<&'a dyn UserExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Build the message and metadata for `payload`.
    ///
    /// User identity priority: `explicit_user`, then the user header, then
    /// the extractor. A malformed user header disables user enrichment for
    /// this entry.
    pub fn build(
        &self,
        payload: &LogPayload,
        severity: Severity,
        request: Option<&dyn RequestContext>,
        explicit_user: Option<&UserIdentity>,
    ) -> BuiltEntry {
        let mut message = String::new();
        let mut metadata = payload.fields();
        let mut user = explicit_user.cloned();
        let mut user_header_error = None;

        match request {
            Some(request) => {
                self.describe_request(request, severity, &mut message, &mut metadata);

                if user.is_none() {
                    if let Some(raw) = request.header(&self.config.user_header) {
                        match UserIdentity::decode_header(&self.config.user_header, raw) {
                            Ok(decoded) => user = Some(decoded),
                            Err(e) => user_header_error = Some(e),
                        }
                    }
                }

                if user.is_none() && user_header_error.is_none() {
                    user = self.extractor.and_then(|extractor| extractor.extract(request));
                }
            }
            // Only a request context may supply `httpRequest`.
            None => {
                metadata.remove(HTTP_REQUEST_KEY);
            }
        }

        if let Some(user) = user {
            metadata.insert(self.config.user_field.clone(), user.into_value());
        }

        message.push_str(&payload.body());

        BuiltEntry {
            message,
            metadata,
            user_header_error,
        }
    }

    /// WARNING entry reporting a user header that could not be decoded.
    ///
    /// Carries the same request prefix, `httpRequest` and trace as the entry
    /// it refers to. No user is resolved.
    pub fn user_header_warning(
        &self,
        err: &LoggerError,
        request: Option<&dyn RequestContext>,
    ) -> BuiltEntry {
        let mut message = String::new();
        let mut metadata = Metadata::new();

        if let Some(request) = request {
            self.describe_request(request, Severity::Warning, &mut message, &mut metadata);
        }
        if let LoggerError::MalformedUserHeader { header, reason } = err {
            metadata.insert("header".to_string(), Value::String(header.clone()));
            metadata.insert("reason".to_string(), Value::String(reason.clone()));
        }
        message.push_str(&err.to_string());

        BuiltEntry {
            message,
            metadata,
            user_header_error: None,
        }
    }

    /// Message prefix and `httpRequest` for `request`.
    fn describe_request(
        &self,
        request: &dyn RequestContext,
        severity: Severity,
        message: &mut String,
        metadata: &mut Metadata,
    ) {
        message.push_str(&format!("{} {} - ", request.method(), request.request_url()));

        let http_request = self.http_request(request, severity);
        match serde_json::to_value(&http_request) {
            Ok(value) => {
                metadata.insert(HTTP_REQUEST_KEY.to_string(), value);
            }
            Err(e) => tracing::warn!(error = %e, "Failed to serialize httpRequest metadata"),
        }
    }

    fn http_request(&self, request: &dyn RequestContext, severity: Severity) -> HttpRequestMetadata {
        let mut http_request = HttpRequestMetadata::from_context(request, severity);

        http_request.user_agent = request
            .header("user-agent")
            .filter(|ua| !ua.is_empty())
            .map(str::to_string);

        if let Some(trace_header) = request.header(&self.config.trace_header) {
            match &self.config.project_id {
                Some(project_id) => http_request.trace = trace_resource(project_id, trace_header),
                None => tracing::debug!("Trace header present but no project id configured"),
            }
        }

        http_request
    }
}

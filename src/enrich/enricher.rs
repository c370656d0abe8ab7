//! Log Enricher - severity-tagged entry points over an injected sink.

use std::sync::Arc;

use crate::config::LoggerConfig;
use crate::context::RequestContext;
use crate::domain::{LogPayload, Severity, UserExtractor, UserIdentity};
use crate::enrich::builder::{BuiltEntry, EntryBuilder};
use crate::sink::{LogEntry, LogSink};

/// Formats log events and writes them to a sink.
///
/// Logging calls never fail: anything that only affects how rich an entry
/// is gets handled here, and the sink write is fire-and-forget.
#[derive(Clone)]
pub struct LogEnricher {
    config: LoggerConfig,
    sink: Arc<dyn LogSink>,
    extractor: Option<Arc<dyn UserExtractor>>,
}

impl LogEnricher {
    pub fn new(config: LoggerConfig, sink: Arc<dyn LogSink>) -> Self {
        Self {
            config,
            sink,
            extractor: None,
        }
    }

    /// Set the extractor used when neither an explicit user nor the user
    /// header identifies the caller.
    pub fn with_user_extractor<E: UserExtractor + 'static>(mut self, extractor: E) -> Self {
        self.extractor = Some(Arc::new(extractor));
        self
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    pub fn sink(&self) -> &Arc<dyn LogSink> {
        &self.sink
    }

    /// Build an entry without writing it.
    pub fn build(
        &self,
        payload: &LogPayload,
        severity: Severity,
        request: Option<&dyn RequestContext>,
        user: Option<&UserIdentity>,
    ) -> BuiltEntry {
        EntryBuilder::new(&self.config)
            .with_extractor(self.extractor.as_deref())
            .build(payload, severity, request, user)
    }

    /// Log at INFO.
    pub fn log(
        &self,
        payload: impl Into<LogPayload>,
        request: Option<&dyn RequestContext>,
        user: Option<&UserIdentity>,
    ) {
        self.emit(Severity::Info, payload, request, user);
    }

    /// Log at WARNING.
    pub fn warn(
        &self,
        payload: impl Into<LogPayload>,
        request: Option<&dyn RequestContext>,
        user: Option<&UserIdentity>,
    ) {
        self.emit(Severity::Warning, payload, request, user);
    }

    /// Log at ERROR.
    pub fn error(
        &self,
        payload: impl Into<LogPayload>,
        request: Option<&dyn RequestContext>,
        user: Option<&UserIdentity>,
    ) {
        self.emit(Severity::Error, payload, request, user);
    }

    pub fn emit(
        &self,
        severity: Severity,
        payload: impl Into<LogPayload>,
        request: Option<&dyn RequestContext>,
        user: Option<&UserIdentity>,
    ) {
        self.emit_with(self.extractor.as_deref(), severity, &payload.into(), request, user);
    }

    /// Emit using `extractor` instead of the configured one.
    pub(crate) fn emit_with(
        &self,
        extractor: Option<&dyn UserExtractor>,
        severity: Severity,
        payload: &LogPayload,
        request: Option<&dyn RequestContext>,
        user: Option<&UserIdentity>,
    ) {
        let builder = EntryBuilder::new(&self.config).with_extractor(extractor);
        let built = builder.build(payload, severity, request, user);

        self.sink
            .write(&LogEntry::new(severity, built.message, built.metadata));

        if let Some(err) = built.user_header_error {
            let warning = builder.user_header_warning(&err, request);
            self.sink
                .write(&LogEntry::new(Severity::Warning, warning.message, warning.metadata));
        }
    }
}

impl std::fmt::Debug for LogEnricher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogEnricher")
            .field("config", &self.config)
            .field("has_user_extractor", &self.extractor.is_some())
            .finish_non_exhaustive()
    }
}

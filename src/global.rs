//! Process-wide logger.
//!
//! For call sites that cannot thread a [`LogEnricher`] through, this module
//! keeps one enricher per process. It is built from [`LoggerConfig::load`]
//! on the first logging call (or installed explicitly with [`install`]) and
//! never rebuilt.
//!
//! The user extractor registry is last-write-wins: concurrent registrations
//! race and whichever lands last is used by subsequent calls.

use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::{Lazy, OnceCell};

use crate::config::LoggerConfig;
use crate::context::RequestContext;
use crate::domain::{LogPayload, Severity, UserExtractor, UserIdentity};
use crate::enrich::LogEnricher;
use crate::error::{LoggerError, LoggerResult};
use crate::sink::{build_sink, LogSink};

static ENRICHER: OnceCell<LogEnricher> = OnceCell::new();

static USER_EXTRACTOR: Lazy<RwLock<Option<Arc<dyn UserExtractor>>>> =
    Lazy::new(|| RwLock::new(None));

fn enricher() -> LoggerResult<&'static LogEnricher> {
    ENRICHER.get_or_try_init(|| {
        let config = LoggerConfig::load()?;
        let sink = build_sink(&config)?;
        tracing::debug!(
            transports = ?sink.transport_names(),
            service = ?config.service_name,
            "Global log sink initialized"
        );
        Ok(LogEnricher::new(config, Arc::new(sink)))
    })
}

/// Return the process-wide sink, building it on first use.
pub fn ensure_sink() -> LoggerResult<Arc<dyn LogSink>> {
    enricher().map(|enricher| Arc::clone(enricher.sink()))
}

/// Install a configuration and sink before the first logging call.
///
/// Fails with [`LoggerError::AlreadyInitialized`] once the global logger
/// exists.
pub fn install(config: LoggerConfig, sink: Arc<dyn LogSink>) -> LoggerResult<()> {
    ENRICHER
        .set(LogEnricher::new(config, sink))
        .map_err(|_| LoggerError::AlreadyInitialized)
}

/// Register the process-wide user extractor, replacing any previous one.
pub fn register_user_extractor<E: UserExtractor + 'static>(extractor: E) {
    let mut slot = USER_EXTRACTOR
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    *slot = Some(Arc::new(extractor));
}

fn registered_extractor() -> Option<Arc<dyn UserExtractor>> {
    USER_EXTRACTOR
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Log at INFO through the global logger.
pub fn log(
    payload: impl Into<LogPayload>,
    request: Option<&dyn RequestContext>,
    user: Option<&UserIdentity>,
) -> LoggerResult<()> {
    emit(Severity::Info, payload.into(), request, user)
}

/// Log at WARNING through the global logger.
pub fn warn(
    payload: impl Into<LogPayload>,
    request: Option<&dyn RequestContext>,
    user: Option<&UserIdentity>,
) -> LoggerResult<()> {
    emit(Severity::Warning, payload.into(), request, user)
}

/// Log at ERROR through the global logger.
pub fn error(
    payload: impl Into<LogPayload>,
    request: Option<&dyn RequestContext>,
    user: Option<&UserIdentity>,
) -> LoggerResult<()> {
    emit(Severity::Error, payload.into(), request, user)
}

fn emit(
    severity: Severity,
    payload: LogPayload,
    request: Option<&dyn RequestContext>,
    user: Option<&UserIdentity>,
) -> LoggerResult<()> {
    let enricher = enricher()?;
    let extractor = registered_extractor();
    enricher.emit_with(extractor.as_deref(), severity, &payload, request, user);
    Ok(())
}

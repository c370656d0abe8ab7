//! GCP Logger - request-aware structured logging for Google Cloud Logging
//!
//! Turns a payload plus an optional HTTP request into a severity-tagged
//! entry whose metadata carries what Cloud Logging, Cloud Trace and Error
//! Reporting expect:
//! - an `httpRequest` object with status, URL, method, client IP and trace
//! - the caller's identity from an explicit value, a base64 JSON header or
//!   a registered extractor
//! - a service context for Error Reporting
//!
//! Most hosts build a [`LogEnricher`] once and pass it around. The
//! [`global`] module offers the same operations behind a process-wide
//! logger for call sites that cannot.

pub mod api;
pub mod config;
pub mod context;
pub mod domain;
pub mod enrich;
pub mod error;
pub mod global;
pub mod logging;
pub mod sink;

pub use crate::config::LoggerConfig;
pub use crate::context::{attached_request, RequestContext, RequestSnapshot};
pub use crate::domain::{
    Failure, Fields, LogPayload, Metadata, Severity, UserExtractor, UserIdentity,
};
pub use crate::enrich::{BuiltEntry, EntryBuilder, LogEnricher};
pub use crate::error::{LoggerError, LoggerResult};
pub use crate::sink::{
    build_sink, CloudTransport, ConsoleTransport, LogEntry, LogSink, MemorySink, ServiceContext,
    Transport, TransportSink,
};

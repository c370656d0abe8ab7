//! Log sinks and transports.
//!
//! A [`LogSink`] receives finished entries. [`TransportSink`] is the
//! production sink: it filters by severity and fans out to its transports
//! (console echo in development, then the Cloud Logging transport).

mod cloud;
mod console;
mod entry;
mod init;
mod memory;

pub use cloud::*;
pub use console::*;
pub use entry::*;
pub use init::*;
pub use memory::*;

use crate::domain::Severity;

/// Destination for finished log entries.
///
/// Writes are fire-and-forget; implementations must not block on
/// acknowledgement from a remote backend.
pub trait LogSink: Send + Sync {
    fn write(&self, entry: &LogEntry);
}

/// One output of a [`TransportSink`].
pub trait Transport: Send + Sync {
    fn name(&self) -> &'static str;

    fn emit(&self, entry: &LogEntry, service_context: Option<&ServiceContext>);
}

/// Sink fanning out to a list of transports.
pub struct TransportSink {
    service_context: Option<ServiceContext>,
    min_severity: Severity,
    transports: Vec<Box<dyn Transport>>,
}

impl TransportSink {
    pub fn new(service_context: Option<ServiceContext>, min_severity: Severity) -> Self {
        Self {
            service_context,
            min_severity,
            transports: Vec::new(),
        }
    }

    /// Append a transport; transports receive entries in insertion order.
    pub fn with_transport<T: Transport + 'static>(mut self, transport: T) -> Self {
        self.transports.push(Box::new(transport));
        self
    }

    pub fn transport_names(&self) -> Vec<&'static str> {
        self.transports.iter().map(|t| t.name()).collect()
    }

    pub fn service_context(&self) -> Option<&ServiceContext> {
        self.service_context.as_ref()
    }
}

impl LogSink for TransportSink {
    fn write(&self, entry: &LogEntry) {
        if entry.severity < self.min_severity {
            return;
        }
        for transport in &self.transports {
            transport.emit(entry, self.service_context.as_ref());
        }
    }
}

//! Sink construction from configuration.

use crate::config::LoggerConfig;
use crate::error::{LoggerError, LoggerResult};
use crate::sink::{CloudTransport, ConsoleTransport, ServiceContext, TransportSink};

/// Build the production sink.
///
/// The console transport is added first, and only in development; the
/// cloud transport is always last.
pub fn build_sink(config: &LoggerConfig) -> LoggerResult<TransportSink> {
    let service_context = config.service_name.as_ref().map(|service| ServiceContext {
        service: service.clone(),
        version: config.service_version.clone(),
    });

    let mut sink = TransportSink::new(service_context, config.min_severity);

    if config.is_development() {
        sink = sink.with_transport(ConsoleTransport::new());
    }

    let cloud = match config.output.as_str() {
        "stdout" => CloudTransport::stdout(),
        "stderr" => CloudTransport::stderr(),
        path => CloudTransport::file(path).map_err(|e| {
            LoggerError::SinkInit(format!("cannot open log output '{}': {}", path, e))
        })?,
    };

    Ok(sink.with_transport(cloud))
}

//! Error types for GCP Logger.
//!
//! Only [`LoggerError::SinkInit`] and [`LoggerError::Config`] ever escape a
//! logging call. Everything else affects log richness and is handled inside
//! the enricher.

use thiserror::Error;

/// Unified error type for logger operations.
#[derive(Debug, Error)]
pub enum LoggerError {
    /// The sink (or one of its transports) could not be constructed.
    #[error("Sink initialization failed: {0}")]
    SinkInit(String),

    /// The user-identity header was not base64-encoded UTF-8 JSON.
    #[error("Malformed user header '{header}': {reason}")]
    MalformedUserHeader { header: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A request snapshot was built from an invalid URL or header.
    #[error("Invalid request context: {0}")]
    InvalidContext(String),

    #[error("Logger already initialized")]
    AlreadyInitialized,
}

/// Result type alias for logger operations.
pub type LoggerResult<T> = Result<T, LoggerError>;

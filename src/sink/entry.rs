//! Log entry and service context types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Metadata, Severity};

/// A finished entry handed to a sink.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub severity: Severity,
    pub message: String,
    pub metadata: Metadata,
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    pub fn new(severity: Severity, message: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            severity,
            message: message.into(),
            metadata,
            timestamp: Utc::now(),
        }
    }
}

/// Service identification used by Error Reporting to group errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceContext {
    pub service: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ServiceContext {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            version: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

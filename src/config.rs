//! Configuration module for GCP Logger.
//!
//! Loads configuration from an optional file and environment variables.

use config::builder::{ConfigBuilder, DefaultState};
use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

use crate::domain::Severity;

/// Header carrying the base64-encoded JSON user identity.
pub const DEFAULT_USER_HEADER: &str = "baw-user";
/// Metadata key the resolved user identity is stored under.
pub const DEFAULT_USER_FIELD: &str = "bawUser";
/// Distributed trace header set by Google front ends.
pub const DEFAULT_TRACE_HEADER: &str = "x-cloud-trace-context";

/// Platform variables read without prefix, mapped to config keys.
const PLATFORM_VARS: &[(&str, &str)] = &[
    ("service_name", "SERVICE_NAME"),
    ("service_version", "SERVICE_VERSION"),
    ("project_id", "PROJECT_ID"),
    ("environment", "NODE_ENV"),
];

/// Logger configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoggerConfig {
    /// Enables the service context used by Error Reporting.
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default)]
    pub service_version: Option<String>,
    /// Project used to build trace resource names.
    #[serde(default)]
    pub project_id: Option<String>,
    /// Runtime environment; `development` adds the console transport.
    pub environment: String,
    /// Entries below this severity are dropped by the sink.
    pub min_severity: Severity,
    /// Cloud transport output: `stdout`, `stderr` or a file path.
    pub output: String,
    pub user_header: String,
    pub user_field: String,
    pub trace_header: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            service_name: None,
            service_version: None,
            project_id: None,
            environment: "production".to_string(),
            min_severity: Severity::Info,
            output: "stdout".to_string(),
            user_header: DEFAULT_USER_HEADER.to_string(),
            user_field: DEFAULT_USER_FIELD.to_string(),
            trace_header: DEFAULT_TRACE_HEADER.to_string(),
        }
    }
}

impl LoggerConfig {
    /// Load configuration from files and environment.
    ///
    /// Priority (highest to lowest):
    /// 1. Platform variables (SERVICE_NAME, SERVICE_VERSION, PROJECT_ID, NODE_ENV)
    /// 2. Environment variables (GCP_LOGGER__*)
    /// 3. config/logger.* (if exists)
    /// 4. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Self::defaults()?
            .add_source(File::with_name("config/logger").required(false))
            .add_source(Self::environment());

        Self::with_platform_vars(builder, |var| std::env::var(var).ok())?
            .build()?
            .try_deserialize()
    }

    /// Build configuration from defaults and a platform variable lookup only.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::with_platform_vars(Self::defaults()?, lookup)?
            .build()?
            .try_deserialize()
    }

    /// Whether the console transport should echo entries. Case-sensitive.
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    // Every key is a string or a severity name, so values are never
    // parsed as numbers (`2.10` must stay `2.10`).
    fn environment() -> Environment {
        Environment::with_prefix("GCP_LOGGER").separator("__")
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let defaults = Self::default();
        ConfigLoader::builder()
            .set_default("environment", defaults.environment)?
            .set_default("min_severity", defaults.min_severity.as_str())?
            .set_default("output", defaults.output)?
            .set_default("user_header", defaults.user_header)?
            .set_default("user_field", defaults.user_field)?
            .set_default("trace_header", defaults.trace_header)
    }

    fn with_platform_vars<F>(
        mut builder: ConfigBuilder<DefaultState>,
        lookup: F,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        for (key, var) in PLATFORM_VARS {
            if let Some(value) = lookup(var).filter(|v| !v.is_empty()) {
                builder = builder.set_override(*key, value)?;
            }
        }
        Ok(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_without_vars_matches_default() {
        let config = LoggerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, LoggerConfig::default());
        assert!(!config.is_development());
    }

    #[test]
    fn test_platform_vars_override_defaults() {
        let config = LoggerConfig::from_lookup(|var| match var {
            "SERVICE_NAME" => Some("checkout".to_string()),
            "PROJECT_ID" => Some("p1".to_string()),
            "NODE_ENV" => Some("development".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.service_name.as_deref(), Some("checkout"));
        assert_eq!(config.project_id.as_deref(), Some("p1"));
        assert!(config.service_version.is_none());
        assert!(config.is_development());
        assert_eq!(config.user_header, DEFAULT_USER_HEADER);
    }

    #[test]
    fn test_empty_platform_var_is_ignored() {
        let config = LoggerConfig::from_lookup(|var| match var {
            "SERVICE_NAME" => Some(String::new()),
            _ => None,
        })
        .unwrap();
        assert!(config.service_name.is_none());
    }

    #[test]
    fn test_is_development_is_exact() {
        let config = LoggerConfig::from_lookup(|var| match var {
            "NODE_ENV" => Some("Development".to_string()),
            _ => None,
        })
        .unwrap();
        assert!(!config.is_development());
    }

    #[test]
    fn test_env_values_are_not_parsed_as_numbers() {
        let vars: std::collections::HashMap<String, String> = [
            ("GCP_LOGGER__SERVICE_VERSION", "2.10"),
            ("GCP_LOGGER__PROJECT_ID", "12345"),
            ("GCP_LOGGER__MIN_SEVERITY", "warning"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config: LoggerConfig = LoggerConfig::defaults()
            .unwrap()
            .add_source(LoggerConfig::environment().source(Some(vars)))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.service_version.as_deref(), Some("2.10"));
        assert_eq!(config.project_id.as_deref(), Some("12345"));
        assert_eq!(config.min_severity, Severity::Warning);
    }
}

//! Logging Setup
//!
//! Structured logging through the `tracing` crate. Output always goes to
//! stderr: stdout is reserved for encoded frames so replay output stays
//! pipeable. Filter directives come from the environment when set,
//! otherwise from configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::error::ConfigError;

/// Filter directives override, same syntax as `RUST_LOG`.
pub const LOG_ENV: &str = "TREESCOPE_LOG";

/// Format override: `text` or `json`.
pub const LOG_FORMAT_ENV: &str = "TREESCOPE_LOG_FORMAT";

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Module-specific log levels
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_format(),
            modules: HashMap::new(),
        }
    }
}

/// Initialize the logging system
///
/// Priority order (highest to lowest):
/// 1. Environment variables (TREESCOPE_LOG, TREESCOPE_LOG_FORMAT)
/// 2. Configuration
/// 3. Defaults
pub fn init_logging(config: &LoggingConfig) -> Result<(), ConfigError> {
    let filter = build_env_filter(config)?;
    let format = determine_format(config)?;

    let base_subscriber = Registry::default().with(filter);
    let result = if format == "json" {
        base_subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        base_subscriber
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init()
    };
    result.map_err(|e| ConfigError::LoggerInstall(e.to_string()))
}

/// Build environment filter from config or environment variables
fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, ConfigError> {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return Ok(filter);
    }
    build_filter_directives(config)
}

fn build_filter_directives(config: &LoggingConfig) -> Result<EnvFilter, ConfigError> {
    if config.level == "off" {
        return Ok(EnvFilter::new("off"));
    }
    let mut filter = EnvFilter::try_new(&config.level)
        .map_err(|_| ConfigError::InvalidLogDirective(config.level.clone()))?;
    for (module, module_level) in &config.modules {
        let directive = format!("{}={}", module, module_level);
        filter = filter.add_directive(
            directive
                .parse()
                .map_err(|_| ConfigError::InvalidLogDirective(directive.clone()))?,
        );
    }
    Ok(filter)
}

/// Determine output format from config or environment
fn determine_format(config: &LoggingConfig) -> Result<String, ConfigError> {
    if let Ok(format) = std::env::var(LOG_FORMAT_ENV) {
        if format == "json" || format == "text" {
            return Ok(format);
        }
    }
    validate_format(&config.format)
}

fn validate_format(format: &str) -> Result<String, ConfigError> {
    if format != "json" && format != "text" {
        return Err(ConfigError::InvalidLogFormat(format.to_string()));
    }
    Ok(format.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_logging_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, "text");
        assert!(config.modules.is_empty());
    }

    #[test]
    fn test_config_deserializes_from_empty_object() {
        let config: LoggingConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, "text");
    }

    #[test]
    fn test_validate_format() {
        assert_eq!(validate_format("text").unwrap(), "text");
        assert_eq!(validate_format("json").unwrap(), "json");
        let error = validate_format("yaml").unwrap_err();
        assert!(matches!(error, ConfigError::InvalidLogFormat(_)));
    }

    #[test]
    fn test_module_directives_build() {
        let mut config = LoggingConfig::default();
        config
            .modules
            .insert("treescope::traverse".to_string(), "trace".to_string());
        assert!(build_filter_directives(&config).is_ok());
    }

    #[test]
    fn test_invalid_module_directive_is_rejected() {
        let mut config = LoggingConfig::default();
        config
            .modules
            .insert("not a module".to_string(), "trace".to_string());
        let error = build_filter_directives(&config).unwrap_err();
        assert!(matches!(error, ConfigError::InvalidLogDirective(_)));
    }

    #[test]
    fn test_off_level_short_circuits() {
        let config = LoggingConfig {
            level: "off".to_string(),
            ..LoggingConfig::default()
        };
        assert!(build_filter_directives(&config).is_ok());
    }
}

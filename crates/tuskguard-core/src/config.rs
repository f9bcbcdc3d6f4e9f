//! Configuration management for the Tuskguard geofence gateway.
//!
//! This module provides the application configuration:
//! - Loading from YAML files
//! - Environment variable overrides (`TUSKGUARD__SECTION__FIELD`)
//! - Validation of all settings
//! - Monitoring constants, station file list, output, and logging

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::Level;

/// Default radio range of a gateway tower, in meters.
///
/// Estimated practical LoRa range in forest environments.
pub const DEFAULT_COMMUNICATION_RADIUS_M: f64 = 1200.0;

/// Mean Earth radius used by the spherical model, in meters.
pub const DEFAULT_EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Zone classification that enables perimeter checks by default.
pub const DEFAULT_CHECKED_ZONE: &str = "CONFLICT";

/// Main application configuration.
///
/// # Examples
///
/// ```no_run
/// use tuskguard_core::config::AppConfig;
///
/// let config = AppConfig::from_file("config/tuskguard.yaml").unwrap();
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application-wide settings
    #[serde(default)]
    pub app: ApplicationConfig,

    /// Geofence evaluation constants
    #[serde(default)]
    pub monitoring: MonitoringConfig,

    /// Station files to load at startup
    #[serde(default)]
    pub stations: Vec<PathBuf>,

    /// Where outbound telemetry events are written
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::file_not_found(path.display().to_string()).into());
        }
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::from_yaml(&contents)
    }

    /// Loads configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| {
            ConfigError::InvalidFormat {
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Loads configuration using the `config` crate, layering
    /// `TUSKGUARD__`-prefixed environment variables over the file.
    ///
    /// `TUSKGUARD__MONITORING__COMMUNICATION_RADIUS_METERS=800` overrides
    /// `monitoring.communication_radius_meters`.
    pub fn from_config_builder<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let config = config::Config::builder()
            .add_source(config::File::from(path).required(true))
            .add_source(
                config::Environment::with_prefix("TUSKGUARD")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ConfigError::LoadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        config.try_deserialize().map_err(|e| {
            ConfigError::InvalidFormat {
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Validates the configuration.
    ///
    /// Station files are checked when they are loaded, not here.
    pub fn validate(&self) -> Result<()> {
        self.monitoring.validate()?;
        self.logging.parse_level()?;
        Ok(())
    }
}

/// Application-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Application name
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Environment (development, field, production)
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_app_name() -> String {
    "tuskguard".to_string()
}

fn default_environment() -> String {
    "production".to_string()
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            environment: default_environment(),
        }
    }
}

/// Geofence evaluation constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    /// Radio range used when a station file gives none
    #[serde(default = "default_communication_radius")]
    pub communication_radius_meters: f64,

    /// Sphere radius for all distance calculations
    #[serde(default = "default_earth_radius")]
    pub earth_radius_meters: f64,

    /// Zone classifications whose stations run perimeter checks
    #[serde(default = "default_checked_zones")]
    pub checked_zones: Vec<String>,
}

fn default_communication_radius() -> f64 {
    DEFAULT_COMMUNICATION_RADIUS_M
}

fn default_earth_radius() -> f64 {
    DEFAULT_EARTH_RADIUS_M
}

fn default_checked_zones() -> Vec<String> {
    vec![DEFAULT_CHECKED_ZONE.to_string()]
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            communication_radius_meters: default_communication_radius(),
            earth_radius_meters: default_earth_radius(),
            checked_zones: default_checked_zones(),
        }
    }
}

impl MonitoringConfig {
    /// Validates the monitoring constants.
    pub fn validate(&self) -> Result<()> {
        positive_meters(
            "monitoring.communication_radius_meters",
            self.communication_radius_meters,
        )?;
        positive_meters("monitoring.earth_radius_meters", self.earth_radius_meters)?;

        if self.checked_zones.is_empty() {
            return Err(ConfigError::invalid_value(
                "monitoring.checked_zones",
                "at least one zone classification is required",
            )
            .into());
        }
        if self.checked_zones.iter().any(|z| z.trim().is_empty()) {
            return Err(ConfigError::invalid_value(
                "monitoring.checked_zones",
                "zone classifications cannot be empty",
            )
            .into());
        }

        Ok(())
    }
}

fn positive_meters(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::invalid_value(
            field,
            format!("must be a positive number of meters, got {value}"),
        )
        .into());
    }
    Ok(())
}

/// Output sink for telemetry events.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Append JSON lines to this file instead of stdout
    pub file: Option<PathBuf>,

    /// Also log every event through tracing
    #[serde(default)]
    pub log_events: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, or error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: "text" or "json"
    #[serde(default = "default_log_format")]
    pub format: LogFormat,

    /// Whether to include file/line info
    #[serde(default)]
    pub file_line: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Text
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Text,
            file_line: false,
        }
    }
}

impl LoggingConfig {
    /// Parses the log level string to a tracing Level.
    pub fn parse_level(&self) -> Result<Level> {
        self.level.parse().map_err(|_| {
            ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                reason: format!("Invalid log level: {}", self.level),
            }
            .into()
        })
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format
    Text,
    /// JSON format for structured logging
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.app.name, "tuskguard");
        assert_eq!(config.monitoring.communication_radius_meters, 1200.0);
        assert_eq!(config.monitoring.earth_radius_meters, 6_371_000.0);
        assert_eq!(config.monitoring.checked_zones, vec!["CONFLICT".to_string()]);
        assert!(config.stations.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
app:
  name: tsavo-gateway
  environment: field

monitoring:
  communication_radius_meters: 900
  checked_zones: [CONFLICT, CORRIDOR]

stations:
  - stations/tower1.json
  - stations/tower2.yaml

logging:
  level: debug
  format: json
"#;

        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.app.name, "tsavo-gateway");
        assert_eq!(config.monitoring.communication_radius_meters, 900.0);
        assert_eq!(config.monitoring.earth_radius_meters, DEFAULT_EARTH_RADIUS_M);
        assert_eq!(config.monitoring.checked_zones.len(), 2);
        assert_eq!(config.stations.len(), 2);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_radius_rejected() {
        let mut config = AppConfig::default();
        config.monitoring.communication_radius_meters = 0.0;
        assert!(config.validate().is_err());

        config.monitoring.communication_radius_meters = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_checked_zones_rejected() {
        let mut config = AppConfig::default();
        config.monitoring.checked_zones.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_logging_parse_level() {
        let logging = LoggingConfig {
            level: "debug".to_string(),
            ..Default::default()
        };
        assert!(logging.parse_level().is_ok());

        let invalid = LoggingConfig {
            level: "loud".to_string(),
            ..Default::default()
        };
        assert!(invalid.parse_level().is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = AppConfig::from_file("/nonexistent/tuskguard.yaml").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_from_config_builder() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "monitoring:\n  communication_radius_meters: 1500\n").unwrap();

        let config = AppConfig::from_config_builder(file.path()).unwrap();
        assert_eq!(config.monitoring.communication_radius_meters, 1500.0);
        assert_eq!(config.monitoring.checked_zones, vec!["CONFLICT".to_string()]);
    }
}

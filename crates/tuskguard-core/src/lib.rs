//! # Tuskguard Core
//!
//! Core types, error handling, and configuration for the Tuskguard wildlife
//! geofence gateway.
//!
//! - **Types**: `GeoPoint`, `Perimeter`, `ZoneConfig`, `StationInfo`,
//!   `LocationReport`, and the breach values produced by zone evaluation.
//! - **Errors**: `thiserror` enums for malformed geometry, missing
//!   configuration, undecodable reports, and notifier failures.
//! - **Configuration**: YAML application config with environment
//!   overrides, plus station files loaded once into a `StationRegistry`.
//!
//! ## Example
//!
//! ```
//! use tuskguard_core::types::{ContainmentMode, Perimeter, StationInfo, ZoneConfig, GeoPoint};
//!
//! let station = StationInfo {
//!     id: "T1".to_string(),
//!     station_type: "tower".to_string(),
//!     area: "Tsavo East".to_string(),
//!     position: GeoPoint::new(0.0, 0.0),
//!     zone: "CONFLICT".to_string(),
//!     communication_radius_m: None,
//!     zone_config: Some(ZoneConfig {
//!         alert: Some(Perimeter::from_bounds(0.01, -0.01, -0.01, 0.01, ContainmentMode::Inside)),
//!         warning: None,
//!     }),
//! };
//!
//! assert!(station.validate().is_ok());
//! ```

pub mod config;
pub mod error;
pub mod station;
pub mod types;

// Re-export commonly used types for convenience
pub use config::{AppConfig, MonitoringConfig};
pub use error::{ConfigError, GeometryError, NotifyError, Result, TuskguardError};
pub use station::StationRegistry;
pub use types::{
    BreachMessages, BreachResult, ContainmentMode, GeoPoint, LocationReport, Notification,
    Perimeter, Severity, StationInfo, ZoneConfig,
};

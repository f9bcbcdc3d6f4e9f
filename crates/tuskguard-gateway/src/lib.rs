//! Edge gateway for Tuskguard towers
//!
//! Takes decoded collar reports, evaluates them at every configured station,
//! and publishes telemetry events through a [`Notifier`]. Counters for every
//! stage are exported through the `metrics` facade.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use tuskguard_core::station::StationRegistry;
//! use tuskguard_core::types::{ContainmentMode, GeoPoint, LocationReport, Perimeter, StationInfo, ZoneConfig};
//! use tuskguard_gateway::{MemoryNotifier, StationGateway};
//! use tuskguard_geofence::GeofenceEngine;
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
//! let notifier = Arc::new(MemoryNotifier::new());
//! let gateway = StationGateway::new(
//!     GeofenceEngine::default(),
//!     StationRegistry::new(vec![station]).unwrap(),
//!     notifier.clone(),
//! );
//!
//! let outcome = gateway.handle_report(&LocationReport::new("Elephant7", GeoPoint::new(0.0, 0.0)));
//! assert_eq!(outcome.breaches().count(), 1);
//! assert_eq!(notifier.len(), 1);
//! ```

pub mod event;
pub mod metrics;
pub mod notifier;
pub mod pipeline;
pub mod replay;

pub use event::{EventMessage, StationSnapshot, TelemetryEvent};
pub use crate::metrics::{GatewayMetrics, GatewayStats};
pub use notifier::{FanoutNotifier, JsonLinesNotifier, LogNotifier, MemoryNotifier, Notifier};
pub use pipeline::{ReportOutcome, StationGateway, StationOutcome, StationStatus};
pub use replay::CollarSimulation;

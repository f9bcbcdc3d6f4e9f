//! Geofence evaluation for wildlife collar reports
//!
//! This crate decides whether an animal's reported position breaches a
//! station's perimeters:
//!
//! - Haversine distance and n-vector cross-track distance on a sphere
//! - Four-corner perimeter containment with INSIDE/OUTSIDE breach modes
//! - Alert-before-warning zone monitoring gated by zone classification
//! - Dashboard and local breach messages
//! - A strict communication range gate per station
//!
//! Everything here is synchronous and free of shared state; all types are
//! `Send + Sync` and can be used from any number of threads.
//!
//! # Examples
//!
//! ```rust
//! use tuskguard_core::types::{ContainmentMode, GeoPoint, LocationReport, Perimeter, StationInfo, ZoneConfig};
//! use tuskguard_geofence::{Evaluation, GeofenceEngine};
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
//! let engine = GeofenceEngine::default();
//! let report = LocationReport::new("Elephant7", GeoPoint::new(0.0, 0.0));
//!
//! match engine.evaluate(&report, &station).unwrap() {
//!     Evaluation::Breach { messages, .. } => {
//!         assert_eq!(
//!             messages.dashboard.text,
//!             "Elephant7 inside alert perimeter of: T1; type: tower; zone: CONFLICT"
//!         );
//!     }
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

pub mod engine;
pub mod geo;
pub mod message;
pub mod perimeter;
pub mod range;
pub mod zone;

pub use engine::{Evaluation, GeofenceEngine};
pub use geo::GeoMath;
pub use message::BreachMessageBuilder;
pub use perimeter::{BoundaryDistances, Containment, PerimeterEvaluator, PerimeterExtent};
pub use range::{FilterResult, RangeFilter};
pub use zone::ZoneMonitor;

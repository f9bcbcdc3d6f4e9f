//! Communication range gate
//!
//! A tower only evaluates reports from collars it can actually hear. The gate
//! is plain great-circle distance against the station's radius; perimeters
//! are not consulted.

use crate::geo::GeoMath;
use tuskguard_core::config::{MonitoringConfig, DEFAULT_COMMUNICATION_RADIUS_M};
use tuskguard_core::error::GeometryError;
use tuskguard_core::types::{LocationReport, StationInfo};

/// Result of a filter evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterResult {
    /// Report is admitted for zone evaluation
    Pass,
    /// Report is dropped
    Block,
}

impl FilterResult {
    #[inline]
    pub fn is_pass(&self) -> bool {
        matches!(self, FilterResult::Pass)
    }

    #[inline]
    pub fn is_block(&self) -> bool {
        matches!(self, FilterResult::Block)
    }
}

impl From<bool> for FilterResult {
    fn from(pass: bool) -> Self {
        if pass {
            FilterResult::Pass
        } else {
            FilterResult::Block
        }
    }
}

/// Passes reports strictly closer to the station than its radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeFilter {
    geo: GeoMath,
    default_radius_m: f64,
}

impl RangeFilter {
    /// Creates a filter with `default_radius_m` for stations that carry no
    /// radius of their own.
    pub fn new(geo: GeoMath, default_radius_m: f64) -> Self {
        Self {
            geo,
            default_radius_m,
        }
    }

    pub fn from_config(config: &MonitoringConfig) -> Self {
        Self::new(
            GeoMath::new(config.earth_radius_meters),
            config.communication_radius_meters,
        )
    }

    /// Radius in meters that applies to `station`.
    #[inline]
    pub fn radius_for(&self, station: &StationInfo) -> f64 {
        station.communication_radius_m.unwrap_or(self.default_radius_m)
    }

    /// Distance in meters between the report and the station.
    pub fn distance_to(
        &self,
        report: &LocationReport,
        station: &StationInfo,
    ) -> Result<f64, GeometryError> {
        self.geo.distance(&report.position, &station.position)
    }

    /// Returns true if the report lies strictly inside the station's radius.
    ///
    /// A report exactly at the radius is out of range.
    pub fn in_range(
        &self,
        report: &LocationReport,
        station: &StationInfo,
    ) -> Result<bool, GeometryError> {
        let distance_m = self.distance_to(report, station)?;
        Ok(self.admit(distance_m, station).is_pass())
    }

    /// Gate decision for a report already known to be `distance_m` away.
    #[inline]
    pub fn admit(&self, distance_m: f64, station: &StationInfo) -> FilterResult {
        FilterResult::from(distance_m < self.radius_for(station))
    }
}

impl Default for RangeFilter {
    fn default() -> Self {
        Self::new(GeoMath::default(), DEFAULT_COMMUNICATION_RADIUS_M)
    }
}

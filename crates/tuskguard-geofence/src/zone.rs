//! Zone monitoring
//!
//! Applies a station's alert and warning perimeters to a report. The alert
//! tier is always evaluated first and the first breach ends the check, so a
//! position that breaches both tiers is reported once, as an alert.

use crate::geo::GeoMath;
use crate::perimeter::PerimeterEvaluator;
use std::collections::HashSet;
use tracing::debug;
use tuskguard_core::config::MonitoringConfig;
use tuskguard_core::error::GeometryError;
use tuskguard_core::types::{BreachResult, LocationReport, Perimeter, Severity, StationInfo};

/// Evaluates station perimeters in alert-then-warning order.
#[derive(Debug, Clone)]
pub struct ZoneMonitor {
    evaluator: PerimeterEvaluator,
    checked_zones: HashSet<String>,
}

impl ZoneMonitor {
    /// Creates a monitor that checks stations whose zone is one of `checked_zones`.
    pub fn new<I, S>(evaluator: PerimeterEvaluator, checked_zones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            evaluator,
            checked_zones: checked_zones.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a monitor from the monitoring section of the app config.
    pub fn from_config(config: &MonitoringConfig) -> Self {
        Self::new(
            PerimeterEvaluator::new(GeoMath::new(config.earth_radius_meters)),
            config.checked_zones.iter().cloned(),
        )
    }

    /// Returns true if perimeter checks apply to this station at all.
    pub fn requires_check(&self, station: &StationInfo) -> bool {
        self.checked_zones.contains(&station.zone)
    }

    /// Returns the first perimeter breach for `report` at `station`, if any.
    ///
    /// Stations outside a checked zone, or without perimeters, never breach.
    ///
    /// # Errors
    ///
    /// Returns a [`GeometryError`] if the report position or a perimeter is
    /// malformed. The caller should treat that as "no decision", not as a
    /// breach or a clear.
    pub fn check_zone(
        &self,
        report: &LocationReport,
        station: &StationInfo,
    ) -> Result<Option<BreachResult>, GeometryError> {
        if !self.requires_check(station) {
            return Ok(None);
        }
        let Some(zone_config) = station.zone_config.as_ref() else {
            return Ok(None);
        };

        let tiers = [
            (Severity::Alert, zone_config.alert.as_ref()),
            (Severity::Warning, zone_config.warning.as_ref()),
        ];

        for (severity, perimeter) in tiers {
            let Some(perimeter) = perimeter else {
                continue;
            };
            if let Some(breach) = self.check_tier(report, station, severity, perimeter)? {
                return Ok(Some(breach));
            }
        }

        Ok(None)
    }

    fn check_tier(
        &self,
        report: &LocationReport,
        station: &StationInfo,
        severity: Severity,
        perimeter: &Perimeter,
    ) -> Result<Option<BreachResult>, GeometryError> {
        debug!(
            station = %station.id,
            subject = %report.subject,
            tier = severity.tier(),
            mode = %perimeter.mode,
            "Checking perimeter"
        );

        if self.evaluator.evaluate(&report.position, perimeter)? {
            Ok(Some(BreachResult::perimeter(severity, perimeter.mode)))
        } else {
            Ok(None)
        }
    }
}

impl Default for ZoneMonitor {
    fn default() -> Self {
        Self::from_config(&MonitoringConfig::default())
    }
}

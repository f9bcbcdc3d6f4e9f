//! Breach message rendering
//!
//! Turns a [`BreachResult`] into the two texts sent for every breach: one for
//! the operator dashboard and one for local alerting at the tower.

use crate::geo::GeoMath;
use tuskguard_core::error::GeometryError;
use tuskguard_core::types::{
    BreachMessages, BreachResult, LocationReport, Notification, StationInfo,
};

/// Builds dashboard and local breach messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct BreachMessageBuilder {
    geo: GeoMath,
}

impl BreachMessageBuilder {
    pub fn new(geo: GeoMath) -> Self {
        Self { geo }
    }

    /// Renders both messages for a breach.
    ///
    /// Dashboard: `"<subject> <breach> of: <id>; type: <type>; zone: <zone>"`.
    /// Local: `"<subject> <breach>; Approximate distance from tower: <meters>"`,
    /// with meters always carrying a fractional part (`0.0`, not `0`).
    ///
    /// # Errors
    ///
    /// Fails only if the report or station position is malformed, since the
    /// local message needs the distance between them.
    pub fn build(
        &self,
        report: &LocationReport,
        station: &StationInfo,
        breach: &BreachResult,
    ) -> Result<BreachMessages, GeometryError> {
        let distance = self.geo.distance(&report.position, &station.position)?;

        Ok(BreachMessages {
            dashboard: Notification {
                level: breach.severity,
                text: dashboard_text(report, station, breach),
            },
            local: Notification {
                level: breach.severity,
                text: format!(
                    "{} {}; Approximate distance from tower: {:?}",
                    report.subject, breach.text, distance
                ),
            },
        })
    }
}

fn dashboard_text(report: &LocationReport, station: &StationInfo, breach: &BreachResult) -> String {
    format!(
        "{} {} of: {}; type: {}; zone: {}",
        report.subject, breach.text, station.id, station.station_type, station.zone
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tuskguard_core::types::{ContainmentMode, GeoPoint, Severity};

    fn station() -> StationInfo {
        StationInfo {
            id: "T1".to_string(),
            station_type: "tower".to_string(),
            area: "Tsavo East".to_string(),
            position: GeoPoint::new(0.0, 0.0),
            zone: "CONFLICT".to_string(),
            communication_radius_m: None,
            zone_config: None,
        }
    }

    #[test]
    fn test_dashboard_message() {
        let builder = BreachMessageBuilder::default();
        let report = LocationReport::new("Elephant7", GeoPoint::new(0.0, 0.0));
        let breach = BreachResult::perimeter(Severity::Alert, ContainmentMode::Inside);

        let messages = builder.build(&report, &station(), &breach).unwrap();
        assert_eq!(messages.dashboard.level, Severity::Alert);
        assert_eq!(
            messages.dashboard.text,
            "Elephant7 inside alert perimeter of: T1; type: tower; zone: CONFLICT"
        );
    }

    #[test]
    fn test_local_message_carries_distance() {
        let builder = BreachMessageBuilder::default();
        let report = LocationReport::new("Elephant7", GeoPoint::new(0.0, 0.0));
        let breach = BreachResult::perimeter(Severity::Alert, ContainmentMode::Inside);

        let messages = builder.build(&report, &station(), &breach).unwrap();
        assert_eq!(messages.local.level, Severity::Alert);
        assert_eq!(
            messages.local.text,
            "Elephant7 inside alert perimeter; Approximate distance from tower: 0.0"
        );
    }

    #[test]
    fn test_local_distance_keeps_full_precision() {
        let builder = BreachMessageBuilder::default();
        let report = LocationReport::new("Tembo", GeoPoint::new(0.0, 0.01));
        let breach = BreachResult::perimeter(Severity::Warning, ContainmentMode::Outside);

        let messages = builder.build(&report, &station(), &breach).unwrap();
        let expected = GeoMath::default()
            .distance(&report.position, &station().position)
            .unwrap();
        assert_eq!(
            messages.local.text,
            format!("Tembo outside warning perimeter; Approximate distance from tower: {expected:?}")
        );
        assert!(messages.local.text.ends_with("tower: 1111.9492664455875"));
        assert_eq!(messages.dashboard.level, Severity::Warning);
    }

    #[test]
    fn test_malformed_position() {
        let builder = BreachMessageBuilder::default();
        let report = LocationReport::new("Tembo", GeoPoint::new(f64::NAN, 0.0));
        let breach = BreachResult::perimeter(Severity::Alert, ContainmentMode::Inside);
        assert!(builder.build(&report, &station(), &breach).is_err());
    }
}

//! Core types for the Tuskguard geofence gateway.
//!
//! Positions, perimeters, station descriptions, collar reports, and the
//! breach values produced by zone evaluation. The serde representations
//! follow the JSON documents exchanged with collars and station files.

use crate::error::{ConfigError, GeometryError};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;

/// A position on the Earth's surface in decimal degrees.
///
/// # Examples
///
/// ```
/// use tuskguard_core::types::GeoPoint;
///
/// let tower = GeoPoint::new(-1.2921, 36.8219);
/// assert!(tower.validate("tower").is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in decimal degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in decimal degrees (-180 to 180)
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a new point. Coordinates are not checked; see [`GeoPoint::validate`].
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Checks that the point is finite and within the valid lat/lon ranges.
    ///
    /// `field` names the point in the returned error.
    pub fn validate(&self, field: &str) -> Result<(), GeometryError> {
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(GeometryError::non_finite(
                field,
                self.latitude,
                self.longitude,
            ));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(GeometryError::latitude(field, self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(GeometryError::longitude(field, self.longitude));
        }
        Ok(())
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// Which side of a perimeter triggers a breach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContainmentMode {
    /// Breach while the animal is inside the perimeter
    #[serde(alias = "inside")]
    Inside,
    /// Breach while the animal is outside the perimeter
    #[serde(alias = "outside")]
    Outside,
}

impl ContainmentMode {
    /// Word used in breach text ("inside" / "outside").
    pub fn phrase(&self) -> &'static str {
        match self {
            ContainmentMode::Inside => "inside",
            ContainmentMode::Outside => "outside",
        }
    }
}

impl fmt::Display for ContainmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainmentMode::Inside => write!(f, "INSIDE"),
            ContainmentMode::Outside => write!(f, "OUTSIDE"),
        }
    }
}

/// A four-corner geofence.
///
/// The sides are the great-circle arcs NW–NE (north), SW–SE (south),
/// NW–SW (west), and NE–SE (east). Corners are expected to describe a
/// rectangle aligned with lines of latitude and longitude; this is not
/// checked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perimeter {
    pub north_west: GeoPoint,
    pub north_east: GeoPoint,
    pub south_west: GeoPoint,
    pub south_east: GeoPoint,
    pub mode: ContainmentMode,
}

impl Perimeter {
    /// Creates a perimeter from its four corners.
    pub fn new(
        north_west: GeoPoint,
        north_east: GeoPoint,
        south_west: GeoPoint,
        south_east: GeoPoint,
        mode: ContainmentMode,
    ) -> Self {
        Self {
            north_west,
            north_east,
            south_west,
            south_east,
            mode,
        }
    }

    /// Creates a perimeter from its northern and southern latitudes and its
    /// western and eastern longitudes.
    pub fn from_bounds(north: f64, south: f64, west: f64, east: f64, mode: ContainmentMode) -> Self {
        Self {
            north_west: GeoPoint::new(north, west),
            north_east: GeoPoint::new(north, east),
            south_west: GeoPoint::new(south, west),
            south_east: GeoPoint::new(south, east),
            mode,
        }
    }

    /// Returns a copy of this perimeter with a different containment mode.
    pub fn with_mode(self, mode: ContainmentMode) -> Self {
        Self { mode, ..self }
    }

    /// Validates all four corners. `field` prefixes the corner name in errors.
    pub fn validate(&self, field: &str) -> Result<(), GeometryError> {
        self.north_west.validate(&format!("{field}.north_west_corner"))?;
        self.north_east.validate(&format!("{field}.north_east_corner"))?;
        self.south_west.validate(&format!("{field}.south_west_corner"))?;
        self.south_east.validate(&format!("{field}.south_east_corner"))?;
        Ok(())
    }
}

/// Geofence configuration of one station.
///
/// Either tier may be absent. In station files this is the
/// `perimeter_info` object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "PerimeterInfo", into = "PerimeterInfo")]
pub struct ZoneConfig {
    /// Outer tier, reported as WARNING
    pub warning: Option<Perimeter>,
    /// Inner tier, reported as ALERT
    pub alert: Option<Perimeter>,
}

impl ZoneConfig {
    /// Returns true if neither tier is configured.
    pub fn is_empty(&self) -> bool {
        self.warning.is_none() && self.alert.is_none()
    }
}

/// Station-file shape of a [`ZoneConfig`].
///
/// `perimeter_check` applies to every perimeter that does not carry its own.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerimeterInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_perimeter: Option<PerimeterCorners>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning_perimeter: Option<PerimeterCorners>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perimeter_check: Option<ContainmentMode>,
}

/// Station-file shape of a single perimeter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerimeterCorners {
    #[serde(default, alias = "north_west", skip_serializing_if = "Option::is_none")]
    pub north_west_corner: Option<GeoPoint>,
    #[serde(default, alias = "north_east", skip_serializing_if = "Option::is_none")]
    pub north_east_corner: Option<GeoPoint>,
    #[serde(default, alias = "south_west", skip_serializing_if = "Option::is_none")]
    pub south_west_corner: Option<GeoPoint>,
    #[serde(default, alias = "south_east", skip_serializing_if = "Option::is_none")]
    pub south_east_corner: Option<GeoPoint>,
    /// Per-perimeter override of the shared `perimeter_check`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perimeter_check: Option<ContainmentMode>,
}

impl PerimeterCorners {
    fn into_perimeter(
        self,
        field: &str,
        shared_mode: Option<ContainmentMode>,
    ) -> Result<Perimeter, ConfigError> {
        let corner = |point: Option<GeoPoint>, name: &str| {
            point.ok_or_else(|| ConfigError::missing_field(format!("{field}.{name}")))
        };

        let north_west = corner(self.north_west_corner, "north_west_corner")?;
        let north_east = corner(self.north_east_corner, "north_east_corner")?;
        let south_west = corner(self.south_west_corner, "south_west_corner")?;
        let south_east = corner(self.south_east_corner, "south_east_corner")?;
        let mode = self
            .perimeter_check
            .or(shared_mode)
            .ok_or_else(|| ConfigError::missing_field("perimeter_info.perimeter_check"))?;

        Ok(Perimeter::new(
            north_west, north_east, south_west, south_east, mode,
        ))
    }
}

impl From<Perimeter> for PerimeterCorners {
    fn from(perimeter: Perimeter) -> Self {
        Self {
            north_west_corner: Some(perimeter.north_west),
            north_east_corner: Some(perimeter.north_east),
            south_west_corner: Some(perimeter.south_west),
            south_east_corner: Some(perimeter.south_east),
            perimeter_check: Some(perimeter.mode),
        }
    }
}

impl TryFrom<PerimeterInfo> for ZoneConfig {
    type Error = ConfigError;

    fn try_from(info: PerimeterInfo) -> Result<Self, Self::Error> {
        let shared = info.perimeter_check;
        let alert = info
            .alert_perimeter
            .map(|p| p.into_perimeter("perimeter_info.alert_perimeter", shared))
            .transpose()?;
        let warning = info
            .warning_perimeter
            .map(|p| p.into_perimeter("perimeter_info.warning_perimeter", shared))
            .transpose()?;

        Ok(ZoneConfig { warning, alert })
    }
}

impl From<ZoneConfig> for PerimeterInfo {
    fn from(config: ZoneConfig) -> Self {
        Self {
            alert_perimeter: config.alert.map(Into::into),
            warning_perimeter: config.warning.map(Into::into),
            perimeter_check: None,
        }
    }
}

/// A monitoring station (gateway tower) and its geofence setup.
///
/// Loaded once per session from a station file and treated as read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationInfo {
    /// Station identifier, also used as the dashboard device id
    pub id: String,

    /// Station type (e.g. "tower")
    #[serde(rename = "type")]
    pub station_type: String,

    /// Free-form area name
    #[serde(default)]
    pub area: String,

    /// Tower position
    pub position: GeoPoint,

    /// Zone classification (e.g. "CONFLICT")
    pub zone: String,

    /// Radio range override in meters; the configured default applies if absent
    #[serde(
        default,
        rename = "communication_radius_meters",
        skip_serializing_if = "Option::is_none"
    )]
    pub communication_radius_m: Option<f64>,

    /// Geofence perimeters
    #[serde(
        default,
        rename = "perimeter_info",
        skip_serializing_if = "Option::is_none"
    )]
    pub zone_config: Option<ZoneConfig>,
}

impl StationInfo {
    /// Validates the tower position, radius override, and every perimeter corner.
    pub fn validate(&self) -> Result<(), crate::error::TuskguardError> {
        if self.id.is_empty() {
            return Err(ConfigError::missing_field("id").into());
        }

        self.position.validate(&format!("station[{}].position", self.id))?;

        if let Some(radius) = self.communication_radius_m {
            if !radius.is_finite() || radius <= 0.0 {
                return Err(ConfigError::invalid_value(
                    format!("station[{}].communication_radius_meters", self.id),
                    format!("must be a positive number of meters, got {radius}"),
                )
                .into());
            }
        }

        if let Some(zone_config) = &self.zone_config {
            if let Some(alert) = &zone_config.alert {
                alert.validate(&format!("station[{}].alert_perimeter", self.id))?;
            }
            if let Some(warning) = &zone_config.warning {
                warning.validate(&format!("station[{}].warning_perimeter", self.id))?;
            }
        }

        Ok(())
    }
}

/// A periodic position broadcast from a collar.
///
/// Accepts both the collar field names (`animal_name`, `animal_position`)
/// and the generic ones (`subject_name`, `position`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationReport {
    /// Animal name or collar identifier
    #[serde(rename = "animal_name", alias = "subject_name")]
    pub subject: String,

    /// Reported position
    #[serde(rename = "animal_position", alias = "position")]
    pub position: GeoPoint,

    /// Events raised by on-collar sensors
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sensor_events: Vec<serde_json::Value>,

    /// Events detected by the on-collar TinyML model
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tiny_ml_detected_events: Vec<serde_json::Value>,
}

impl LocationReport {
    /// Creates a report with no auxiliary events.
    pub fn new(subject: impl Into<String>, position: GeoPoint) -> Self {
        Self {
            subject: subject.into(),
            position,
            sensor_events: Vec::new(),
            tiny_ml_detected_events: Vec::new(),
        }
    }

    /// Decodes a report from a JSON payload.
    pub fn from_json(payload: &[u8]) -> crate::error::Result<Self> {
        let text = std::str::from_utf8(payload).map_err(|e| {
            crate::error::ParseError::InvalidUtf8 {
                details: e.to_string(),
            }
        })?;
        Ok(serde_json::from_str(text)?)
    }
}

/// Breach severity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Warning,
    Alert,
}

impl Severity {
    /// Tier name used in breach text ("warning" / "alert").
    pub fn tier(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Alert => "alert",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "WARNING"),
            Severity::Alert => write!(f, "ALERT"),
        }
    }
}

/// The first perimeter breach found for a report at a station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreachResult {
    pub severity: Severity,
    pub mode: ContainmentMode,
    /// e.g. "inside alert perimeter"
    pub text: String,
}

impl BreachResult {
    /// Builds the breach for a perimeter of the given tier and mode.
    pub fn perimeter(severity: Severity, mode: ContainmentMode) -> Self {
        Self {
            severity,
            mode,
            text: format!("{} {} perimeter", mode.phrase(), severity.tier()),
        }
    }
}

/// A rendered breach message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: Severity,
    pub text: String,
}

/// Dashboard and local renderings of one breach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreachMessages {
    pub dashboard: Notification,
    pub local: Notification,
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATION_JSON: &str = r#"{
        "id": "T1",
        "type": "tower",
        "area": "Tsavo East",
        "position": {"latitude": 0.0, "longitude": 0.0},
        "zone": "CONFLICT",
        "perimeter_info": {
            "alert_perimeter": {
                "north_west_corner": {"latitude": 0.01, "longitude": -0.01},
                "north_east_corner": {"latitude": 0.01, "longitude": 0.01},
                "south_west_corner": {"latitude": -0.01, "longitude": -0.01},
                "south_east_corner": {"latitude": -0.01, "longitude": 0.01}
            },
            "perimeter_check": "INSIDE"
        }
    }"#;

    #[test]
    fn test_geo_point_validation() {
        assert!(GeoPoint::new(0.0, 0.0).validate("p").is_ok());
        assert!(GeoPoint::new(90.0, -180.0).validate("p").is_ok());
        assert!(matches!(
            GeoPoint::new(90.1, 0.0).validate("p"),
            Err(GeometryError::LatitudeOutOfRange { .. })
        ));
        assert!(matches!(
            GeoPoint::new(0.0, 180.5).validate("p"),
            Err(GeometryError::LongitudeOutOfRange { .. })
        ));
        assert!(matches!(
            GeoPoint::new(f64::NAN, 0.0).validate("p"),
            Err(GeometryError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_station_from_json() {
        let station: StationInfo = serde_json::from_str(STATION_JSON).unwrap();
        assert_eq!(station.id, "T1");
        assert_eq!(station.station_type, "tower");
        assert_eq!(station.communication_radius_m, None);

        let zone = station.zone_config.expect("perimeter_info");
        let alert = zone.alert.expect("alert perimeter");
        assert_eq!(alert.mode, ContainmentMode::Inside);
        assert_eq!(alert.north_east, GeoPoint::new(0.01, 0.01));
        assert!(zone.warning.is_none());
    }

    #[test]
    fn test_station_without_perimeters() {
        let json = r#"{
            "id": "T2", "type": "tower", "area": "Amboseli",
            "position": {"latitude": -2.6, "longitude": 37.2},
            "zone": "SAFE"
        }"#;
        let station: StationInfo = serde_json::from_str(json).unwrap();
        assert!(station.zone_config.is_none());
        assert!(station.validate().is_ok());
    }

    #[test]
    fn test_missing_corner_is_rejected() {
        let json = r#"{
            "alert_perimeter": {
                "north_west_corner": {"latitude": 0.01, "longitude": -0.01},
                "north_east_corner": {"latitude": 0.01, "longitude": 0.01},
                "south_west_corner": {"latitude": -0.01, "longitude": -0.01}
            },
            "perimeter_check": "OUTSIDE"
        }"#;
        let err = serde_json::from_str::<ZoneConfig>(json).unwrap_err();
        assert!(err.to_string().contains("south_east_corner"));
    }

    #[test]
    fn test_missing_perimeter_check_is_rejected() {
        let json = r#"{
            "warning_perimeter": {
                "north_west_corner": {"latitude": 0.01, "longitude": -0.01},
                "north_east_corner": {"latitude": 0.01, "longitude": 0.01},
                "south_west_corner": {"latitude": -0.01, "longitude": -0.01},
                "south_east_corner": {"latitude": -0.01, "longitude": 0.01}
            }
        }"#;
        let err = serde_json::from_str::<ZoneConfig>(json).unwrap_err();
        assert!(err.to_string().contains("perimeter_check"));
    }

    #[test]
    fn test_unknown_containment_mode_is_rejected() {
        let json = r#"{"perimeter_check": "AROUND"}"#;
        assert!(serde_json::from_str::<ZoneConfig>(json).is_err());
    }

    #[test]
    fn test_zone_config_keeps_per_tier_modes() {
        let config = ZoneConfig {
            alert: Some(Perimeter::from_bounds(0.01, -0.01, -0.01, 0.01, ContainmentMode::Inside)),
            warning: Some(Perimeter::from_bounds(0.02, -0.02, -0.02, 0.02, ContainmentMode::Outside)),
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""perimeter_check":"OUTSIDE""#));

        let back: ZoneConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.alert.map(|p| p.mode), Some(ContainmentMode::Inside));
        assert_eq!(back.warning.map(|p| p.mode), Some(ContainmentMode::Outside));
    }

    #[test]
    fn test_station_validation_reports_bad_corner() {
        let mut station: StationInfo = serde_json::from_str(STATION_JSON).unwrap();
        if let Some(alert) = station.zone_config.as_mut().and_then(|z| z.alert.as_mut()) {
            alert.south_east = GeoPoint::new(-95.0, 0.01);
        }
        let err = station.validate().unwrap_err();
        assert!(err.to_string().contains("south_east_corner"));
    }

    #[test]
    fn test_report_accepts_collar_and_generic_names() {
        let collar = br#"{"animal_name": "Elephant7", "animal_position": {"latitude": 0.001, "longitude": 0.002}}"#;
        let report = LocationReport::from_json(collar).unwrap();
        assert_eq!(report.subject, "Elephant7");
        assert!(report.sensor_events.is_empty());

        let generic = br#"{
            "subject_name": "Elephant8",
            "position": {"latitude": 0.0, "longitude": 0.0},
            "tiny_ml_detected_events": [{"level": "WARNING", "text": "gunshot detected"}]
        }"#;
        let report = LocationReport::from_json(generic).unwrap();
        assert_eq!(report.subject, "Elephant8");
        assert_eq!(report.tiny_ml_detected_events.len(), 1);
    }

    #[test]
    fn test_report_rejects_invalid_utf8() {
        let err = LocationReport::from_json(&[0xff, 0xfe]).unwrap_err();
        assert!(err.is_malformed_input());
    }

    #[test]
    fn test_breach_text() {
        assert_eq!(
            BreachResult::perimeter(Severity::Alert, ContainmentMode::Inside).text,
            "inside alert perimeter"
        );
        assert_eq!(
            BreachResult::perimeter(Severity::Warning, ContainmentMode::Outside).text,
            "outside warning perimeter"
        );
    }

    #[test]
    fn test_severity_serialization() {
        let n = Notification {
            level: Severity::Alert,
            text: "x".to_string(),
        };
        let json = serde_json::to_string(&n).unwrap();
        assert_eq!(json, r#"{"level":"ALERT","text":"x"}"#);
    }
}

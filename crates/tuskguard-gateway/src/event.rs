//! Outbound telemetry events
//!
//! Every event sent to the dashboard carries the station snapshot, the
//! original report, and at most one message: a breach notification, a
//! forwarded sensor event, or a forwarded on-collar detection.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tuskguard_core::types::{GeoPoint, LocationReport, Notification, StationInfo};
use uuid::Uuid;

/// Station fields included with every event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationSnapshot {
    pub id: String,
    pub area: String,
    pub position: GeoPoint,
    #[serde(rename = "type")]
    pub station_type: String,
    pub zone: String,
}

impl From<&StationInfo> for StationSnapshot {
    fn from(station: &StationInfo) -> Self {
        Self {
            id: station.id.clone(),
            area: station.area.clone(),
            position: station.position,
            station_type: station.station_type.clone(),
            zone: station.zone.clone(),
        }
    }
}

/// Payload of an event, tagged by where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", content = "payload", rename_all = "lowercase")]
pub enum EventMessage {
    /// Dashboard notification for a perimeter breach
    Breach(Notification),
    /// First sensor event carried by the report
    Sensor(Value),
    /// First TinyML detection carried by the report
    Detection(Value),
}

impl EventMessage {
    pub fn source(&self) -> &'static str {
        match self {
            EventMessage::Breach(_) => "breach",
            EventMessage::Sensor(_) => "sensor",
            EventMessage::Detection(_) => "detection",
        }
    }
}

/// One dashboard event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    pub id: Uuid,
    #[serde(with = "rfc3339_millis")]
    pub time: DateTime<Utc>,
    pub station: StationSnapshot,
    /// `None` for a position-only event
    pub event_message: Option<EventMessage>,
    pub report: LocationReport,
}

impl TelemetryEvent {
    /// Creates an event stamped with a fresh id and the current time.
    pub fn new(
        station: &StationInfo,
        report: &LocationReport,
        event_message: Option<EventMessage>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            time: Utc::now(),
            station: StationSnapshot::from(station),
            event_message,
            report: report.clone(),
        }
    }

    /// Position-only event.
    pub fn heartbeat(station: &StationInfo, report: &LocationReport) -> Self {
        Self::new(station, report, None)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

mod rfc3339_millis {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_time(time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|t| t.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// Formats a timestamp the way events carry it.
pub fn format_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

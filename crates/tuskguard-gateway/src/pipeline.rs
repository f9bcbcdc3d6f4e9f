//! Report pipeline
//!
//! Fans each collar report out over every configured station. A station that
//! can hear the collar evaluates its perimeters and forwards events to the
//! notifier:
//!
//! 1. a breach becomes one event carrying the dashboard notification, and the
//!    local notification is logged at the edge;
//! 2. the first sensor event is forwarded as its own event;
//! 3. the first TinyML detection is forwarded as its own event;
//! 4. if none of the above applied, a position-only event is sent.
//!
//! Stations are independent: a malformed perimeter at one station is logged
//! and counted, and every other station still evaluates the report.

use crate::event::{EventMessage, TelemetryEvent};
use crate::metrics::GatewayMetrics;
use crate::notifier::Notifier;
use std::sync::Arc;
use tracing::{debug, warn};
use tuskguard_core::config::MonitoringConfig;
use tuskguard_core::error::{GeometryError, Result};
use tuskguard_core::station::StationRegistry;
use tuskguard_core::types::{BreachResult, LocationReport, StationInfo};
use tuskguard_geofence::{Evaluation, GeofenceEngine};

/// What happened to one report at one station.
#[derive(Debug, Clone, PartialEq)]
pub enum StationStatus {
    OutOfRange { distance_m: f64 },
    Clear,
    Breach(BreachResult),
    /// No zone decision; the report or a perimeter was malformed
    Failed(GeometryError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StationOutcome {
    pub station_id: String,
    pub status: StationStatus,
    pub events_published: usize,
    pub publish_failures: usize,
}

/// Per-station outcomes for one report, in station order.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOutcome {
    pub subject: String,
    pub stations: Vec<StationOutcome>,
}

impl ReportOutcome {
    pub fn breaches(&self) -> impl Iterator<Item = (&str, &BreachResult)> {
        self.stations.iter().filter_map(|s| match &s.status {
            StationStatus::Breach(breach) => Some((s.station_id.as_str(), breach)),
            _ => None,
        })
    }

    pub fn events_published(&self) -> usize {
        self.stations.iter().map(|s| s.events_published).sum()
    }

    pub fn in_range_count(&self) -> usize {
        self.stations
            .iter()
            .filter(|s| !matches!(s.status, StationStatus::OutOfRange { .. }))
            .count()
    }

    pub fn station(&self, id: &str) -> Option<&StationOutcome> {
        self.stations.iter().find(|s| s.station_id == id)
    }
}

/// Evaluates reports against a fixed set of stations.
pub struct StationGateway {
    engine: GeofenceEngine,
    stations: StationRegistry,
    notifier: Arc<dyn Notifier>,
    metrics: Arc<GatewayMetrics>,
}

impl StationGateway {
    pub fn new(
        engine: GeofenceEngine,
        stations: StationRegistry,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            engine,
            stations,
            notifier,
            metrics: Arc::new(GatewayMetrics::new()),
        }
    }

    pub fn from_config(
        config: &MonitoringConfig,
        stations: StationRegistry,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self::new(GeofenceEngine::from_config(config), stations, notifier)
    }

    /// Replaces the metrics collector, e.g. to share one across gateways.
    pub fn with_metrics(mut self, metrics: Arc<GatewayMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &Arc<GatewayMetrics> {
        &self.metrics
    }

    pub fn stations(&self) -> &StationRegistry {
        &self.stations
    }

    /// Decodes a JSON payload and handles the report.
    ///
    /// # Errors
    ///
    /// Returns a parse error if the payload is not a valid report. Nothing is
    /// evaluated or published in that case.
    pub fn handle_payload(&self, payload: &[u8]) -> Result<ReportOutcome> {
        self.metrics.record_report_received();
        match LocationReport::from_json(payload) {
            Ok(report) => Ok(self.evaluate(&report)),
            Err(e) => {
                self.metrics.record_report_rejected();
                warn!(error = %e, "Discarding undecodable report");
                Err(e)
            }
        }
    }

    /// Evaluates an already decoded report at every station.
    pub fn handle_report(&self, report: &LocationReport) -> ReportOutcome {
        self.metrics.record_report_received();
        self.evaluate(report)
    }

    fn evaluate(&self, report: &LocationReport) -> ReportOutcome {
        let stations = self
            .stations
            .iter()
            .map(|station| self.handle_station(report, station))
            .collect();

        ReportOutcome {
            subject: report.subject.clone(),
            stations,
        }
    }

    fn handle_station(&self, report: &LocationReport, station: &StationInfo) -> StationOutcome {
        let mut outcome = StationOutcome {
            station_id: station.id.clone(),
            status: StationStatus::Clear,
            events_published: 0,
            publish_failures: 0,
        };

        let evaluation = match self.engine.evaluate(report, station) {
            Ok(evaluation) => evaluation,
            Err(error) => {
                self.fail_closed(report, station, &error);
                outcome.status = StationStatus::Failed(error);
                return outcome;
            }
        };

        if let Evaluation::OutOfRange { distance_m } = evaluation {
            self.metrics.record_out_of_range();
            debug!(
                station = %station.id,
                subject = %report.subject,
                distance_m,
                "Report out of communication range"
            );
            outcome.status = StationStatus::OutOfRange { distance_m };
            return outcome;
        }

        self.metrics.record_admitted();
        let mut messages = Vec::new();

        match evaluation {
            Evaluation::Breach { breach, messages: rendered } => {
                self.metrics.record_breach(breach.severity);
                warn!(
                    station = %station.id,
                    subject = %report.subject,
                    level = %rendered.local.level,
                    "{}",
                    rendered.local.text
                );
                messages.push(EventMessage::Breach(rendered.dashboard));
                outcome.status = StationStatus::Breach(breach);
            }
            Evaluation::Undecided { error } => {
                self.fail_closed(report, station, &error);
                outcome.status = StationStatus::Failed(error);
            }
            Evaluation::Clear | Evaluation::OutOfRange { .. } => {}
        }

        if let Some(sensor) = report.sensor_events.first() {
            messages.push(EventMessage::Sensor(sensor.clone()));
        }
        if let Some(detection) = report.tiny_ml_detected_events.first() {
            messages.push(EventMessage::Detection(detection.clone()));
        }

        if messages.is_empty() {
            self.publish(&TelemetryEvent::heartbeat(station, report), &mut outcome);
        }
        for message in messages {
            self.publish(&TelemetryEvent::new(station, report, Some(message)), &mut outcome);
        }

        outcome
    }

    fn publish(&self, event: &TelemetryEvent, outcome: &mut StationOutcome) {
        match self.notifier.publish(event) {
            Ok(()) => {
                self.metrics.record_published();
                outcome.events_published += 1;
            }
            Err(e) => {
                self.metrics.record_publish_failure();
                outcome.publish_failures += 1;
                warn!(
                    notifier = self.notifier.name(),
                    event_id = %event.id,
                    error = %e,
                    "Failed to publish telemetry event"
                );
            }
        }
    }

    fn fail_closed(&self, report: &LocationReport, station: &StationInfo, error: &GeometryError) {
        self.metrics.record_evaluation_error();
        warn!(
            station = %station.id,
            subject = %report.subject,
            error = %error,
            "Geofence evaluation failed, no zone decision made"
        );
    }
}

impl std::fmt::Debug for StationGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StationGateway")
            .field("stations", &self.stations.len())
            .field("notifier", &self.notifier.name())
            .finish_non_exhaustive()
    }
}

//! Gateway metrics
//!
//! Counters for report intake, range gating, breaches, and event delivery.
//! Every counter is recorded through the `metrics` facade and mirrored in an
//! atomic so tests and shutdown logging can read totals without an exporter.

use metrics::{counter, describe_counter};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tuskguard_core::types::Severity;

/// Gateway metrics collector
#[derive(Debug)]
pub struct GatewayMetrics {
    reports_received: AtomicU64,
    reports_rejected: AtomicU64,
    reports_admitted: AtomicU64,
    reports_out_of_range: AtomicU64,
    warnings: AtomicU64,
    alerts: AtomicU64,
    events_published: AtomicU64,
    publish_failures: AtomicU64,
    evaluation_errors: AtomicU64,
}

impl GatewayMetrics {
    pub fn new() -> Self {
        describe_counter!(
            "gateway_reports_received_total",
            "Total collar reports received"
        );
        describe_counter!(
            "gateway_reports_rejected_total",
            "Total collar reports that could not be decoded"
        );
        describe_counter!(
            "gateway_reports_admitted_total",
            "Report/station pairs within communication range"
        );
        describe_counter!(
            "gateway_reports_out_of_range_total",
            "Report/station pairs outside communication range"
        );
        describe_counter!(
            "gateway_breaches_total",
            "Perimeter breaches, labelled by severity"
        );
        describe_counter!(
            "gateway_events_published_total",
            "Telemetry events delivered to the notifier"
        );
        describe_counter!(
            "gateway_publish_failures_total",
            "Telemetry events the notifier failed to deliver"
        );
        describe_counter!(
            "gateway_evaluation_errors_total",
            "Evaluations aborted by malformed geometry"
        );

        Self {
            reports_received: AtomicU64::new(0),
            reports_rejected: AtomicU64::new(0),
            reports_admitted: AtomicU64::new(0),
            reports_out_of_range: AtomicU64::new(0),
            warnings: AtomicU64::new(0),
            alerts: AtomicU64::new(0),
            events_published: AtomicU64::new(0),
            publish_failures: AtomicU64::new(0),
            evaluation_errors: AtomicU64::new(0),
        }
    }

    pub fn record_report_received(&self) {
        self.reports_received.fetch_add(1, Ordering::Relaxed);
        counter!("gateway_reports_received_total").increment(1);
    }

    pub fn record_report_rejected(&self) {
        self.reports_rejected.fetch_add(1, Ordering::Relaxed);
        counter!("gateway_reports_rejected_total").increment(1);
    }

    pub fn record_admitted(&self) {
        self.reports_admitted.fetch_add(1, Ordering::Relaxed);
        counter!("gateway_reports_admitted_total").increment(1);
    }

    pub fn record_out_of_range(&self) {
        self.reports_out_of_range.fetch_add(1, Ordering::Relaxed);
        counter!("gateway_reports_out_of_range_total").increment(1);
    }

    pub fn record_breach(&self, severity: Severity) {
        match severity {
            Severity::Warning => self.warnings.fetch_add(1, Ordering::Relaxed),
            Severity::Alert => self.alerts.fetch_add(1, Ordering::Relaxed),
        };
        counter!("gateway_breaches_total", "severity" => severity.tier()).increment(1);
    }

    pub fn record_published(&self) {
        self.events_published.fetch_add(1, Ordering::Relaxed);
        counter!("gateway_events_published_total").increment(1);
    }

    pub fn record_publish_failure(&self) {
        self.publish_failures.fetch_add(1, Ordering::Relaxed);
        counter!("gateway_publish_failures_total").increment(1);
    }

    pub fn record_evaluation_error(&self) {
        self.evaluation_errors.fetch_add(1, Ordering::Relaxed);
        counter!("gateway_evaluation_errors_total").increment(1);
    }

    /// Point-in-time copy of every counter.
    pub fn snapshot(&self) -> GatewayStats {
        GatewayStats {
            reports_received: self.reports_received.load(Ordering::Relaxed),
            reports_rejected: self.reports_rejected.load(Ordering::Relaxed),
            reports_admitted: self.reports_admitted.load(Ordering::Relaxed),
            reports_out_of_range: self.reports_out_of_range.load(Ordering::Relaxed),
            warnings: self.warnings.load(Ordering::Relaxed),
            alerts: self.alerts.load(Ordering::Relaxed),
            events_published: self.events_published.load(Ordering::Relaxed),
            publish_failures: self.publish_failures.load(Ordering::Relaxed),
            evaluation_errors: self.evaluation_errors.load(Ordering::Relaxed),
        }
    }
}

impl Default for GatewayMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Counter totals at one point in time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GatewayStats {
    pub reports_received: u64,
    pub reports_rejected: u64,
    pub reports_admitted: u64,
    pub reports_out_of_range: u64,
    pub warnings: u64,
    pub alerts: u64,
    pub events_published: u64,
    pub publish_failures: u64,
    pub evaluation_errors: u64,
}

impl GatewayStats {
    pub fn breaches(&self) -> u64 {
        self.warnings + self.alerts
    }
}

impl fmt::Display for GatewayStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GatewayStats(received: {}, rejected: {}, admitted: {}, out_of_range: {}, alerts: {}, warnings: {}, published: {}, publish_failures: {}, evaluation_errors: {})",
            self.reports_received,
            self.reports_rejected,
            self.reports_admitted,
            self.reports_out_of_range,
            self.alerts,
            self.warnings,
            self.events_published,
            self.publish_failures,
            self.evaluation_errors,
        )
    }
}

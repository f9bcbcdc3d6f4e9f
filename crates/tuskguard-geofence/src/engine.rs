//! Single-station evaluation
//!
//! Chains the range gate, the zone monitor, and the message builder for one
//! report/station pair.

use crate::geo::GeoMath;
use crate::message::BreachMessageBuilder;
use crate::perimeter::PerimeterEvaluator;
use crate::range::RangeFilter;
use crate::zone::ZoneMonitor;
use tuskguard_core::config::MonitoringConfig;
use tuskguard_core::error::GeometryError;
use tuskguard_core::types::{BreachMessages, BreachResult, LocationReport, StationInfo};

/// Outcome of evaluating one report at one station.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    /// The station cannot hear the collar; nothing else was checked
    OutOfRange { distance_m: f64 },
    /// In range, no perimeter breached
    Clear,
    /// In range and a perimeter was breached
    Breach {
        breach: BreachResult,
        messages: BreachMessages,
    },
    /// In range, but a perimeter could not be evaluated
    Undecided { error: GeometryError },
}

impl Evaluation {
    #[inline]
    pub fn in_range(&self) -> bool {
        !matches!(self, Evaluation::OutOfRange { .. })
    }

    pub fn breach(&self) -> Option<&BreachResult> {
        match self {
            Evaluation::Breach { breach, .. } => Some(breach),
            _ => None,
        }
    }
}

/// Range, zone, and message logic configured from one `MonitoringConfig`.
#[derive(Debug, Clone)]
pub struct GeofenceEngine {
    range: RangeFilter,
    zones: ZoneMonitor,
    messages: BreachMessageBuilder,
}

impl GeofenceEngine {
    pub fn new(range: RangeFilter, zones: ZoneMonitor, messages: BreachMessageBuilder) -> Self {
        Self {
            range,
            zones,
            messages,
        }
    }

    pub fn from_config(config: &MonitoringConfig) -> Self {
        let geo = GeoMath::new(config.earth_radius_meters);
        Self::new(
            RangeFilter::from_config(config),
            ZoneMonitor::new(PerimeterEvaluator::new(geo), config.checked_zones.iter().cloned()),
            BreachMessageBuilder::new(geo),
        )
    }

    pub fn range(&self) -> &RangeFilter {
        &self.range
    }

    pub fn zones(&self) -> &ZoneMonitor {
        &self.zones
    }

    /// Evaluates `report` at `station`.
    ///
    /// A malformed perimeter does not make this fail: the report was heard,
    /// so the outcome is [`Evaluation::Undecided`] and no breach is claimed
    /// either way.
    ///
    /// # Errors
    ///
    /// Returns a [`GeometryError`] if the report or station position is
    /// malformed, since not even the range gate can be applied.
    pub fn evaluate(
        &self,
        report: &LocationReport,
        station: &StationInfo,
    ) -> Result<Evaluation, GeometryError> {
        let distance_m = self.range.distance_to(report, station)?;
        if self.range.admit(distance_m, station).is_block() {
            return Ok(Evaluation::OutOfRange { distance_m });
        }

        let breach = match self.zones.check_zone(report, station) {
            Ok(Some(breach)) => breach,
            Ok(None) => return Ok(Evaluation::Clear),
            Err(error) => return Ok(Evaluation::Undecided { error }),
        };

        match self.messages.build(report, station, &breach) {
            Ok(messages) => Ok(Evaluation::Breach { breach, messages }),
            Err(error) => Ok(Evaluation::Undecided { error }),
        }
    }
}

impl Default for GeofenceEngine {
    fn default() -> Self {
        Self::from_config(&MonitoringConfig::default())
    }
}

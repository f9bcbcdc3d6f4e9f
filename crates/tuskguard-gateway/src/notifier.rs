//! Notifier sinks
//!
//! The gateway never talks to a transport directly: every telemetry event
//! goes through a [`Notifier`]. Sinks provided here write JSON lines, log
//! through `tracing`, or record in memory.

use crate::event::TelemetryEvent;
use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tuskguard_core::error::NotifyError;

/// Delivers telemetry events to the dashboard or any other consumer.
pub trait Notifier: Send + Sync {
    /// Publish one event.
    fn publish(&self, event: &TelemetryEvent) -> Result<(), NotifyError>;

    /// Short name used in logs and errors.
    fn name(&self) -> &str;
}

/// Writes one JSON object per line to any writer.
pub struct JsonLinesNotifier {
    name: String,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonLinesNotifier {
    pub fn new(name: impl Into<String>, writer: Box<dyn Write + Send>) -> Self {
        Self {
            name: name.into(),
            writer: Mutex::new(writer),
        }
    }

    /// Writes to standard output.
    pub fn stdout() -> Self {
        Self::new("stdout", Box::new(io::stdout()))
    }

    /// Appends to `path`, creating the file if needed.
    pub fn append_to<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(
            path.display().to_string(),
            Box::new(BufWriter::new(file)),
        ))
    }

    pub fn flush(&self) -> Result<(), NotifyError> {
        self.writer
            .lock()
            .flush()
            .map_err(|e| NotifyError::unavailable(&self.name, e.to_string()))
    }
}

impl Notifier for JsonLinesNotifier {
    fn publish(&self, event: &TelemetryEvent) -> Result<(), NotifyError> {
        let line = event
            .to_json()
            .map_err(|e| NotifyError::encoding(&self.name, e.to_string()))?;

        let mut writer = self.writer.lock();
        writeln!(writer, "{}", line)
            .and_then(|_| writer.flush())
            .map_err(|e| NotifyError::unavailable(&self.name, e.to_string()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for JsonLinesNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLinesNotifier")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Logs every event as a structured `tracing` record.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn publish(&self, event: &TelemetryEvent) -> Result<(), NotifyError> {
        let source = event.event_message.as_ref().map(|m| m.source());
        info!(
            event_id = %event.id,
            station = %event.station.id,
            subject = %event.report.subject,
            position = %event.report.position,
            source = source.unwrap_or("position"),
            "Telemetry event"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}

/// Keeps every published event in memory.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    events: Mutex<Vec<TelemetryEvent>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Removes and returns everything recorded so far.
    pub fn drain(&self) -> Vec<TelemetryEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl Notifier for MemoryNotifier {
    fn publish(&self, event: &TelemetryEvent) -> Result<(), NotifyError> {
        self.events.lock().push(event.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Publishes to several sinks.
///
/// Every sink is attempted; the first failure is returned.
#[derive(Default)]
pub struct FanoutNotifier {
    sinks: Vec<Arc<dyn Notifier>>,
}

impl FanoutNotifier {
    pub fn new(sinks: Vec<Arc<dyn Notifier>>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: Arc<dyn Notifier>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl Notifier for FanoutNotifier {
    fn publish(&self, event: &TelemetryEvent) -> Result<(), NotifyError> {
        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(e) = sink.publish(event) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn name(&self) -> &str {
        "fanout"
    }
}

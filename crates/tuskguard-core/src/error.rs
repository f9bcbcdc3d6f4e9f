//! Error types for the Tuskguard geofence gateway.
//!
//! Every failure the core can report is a variant of [`TuskguardError`].
//! All errors implement `std::error::Error` and are serializable so they can
//! be attached to structured log records or forwarded to a dashboard.

use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// Result type alias using TuskguardError as the error type.
pub type Result<T> = std::result::Result<T, TuskguardError>;

/// Top-level error type for all Tuskguard operations.
#[derive(Debug, Error, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum TuskguardError {
    /// Malformed coordinates or perimeter geometry
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Inbound data could not be decoded
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Delivery to a notifier failed
    #[error("Notify error: {0}")]
    Notify(#[from] NotifyError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] IoError),
}

impl TuskguardError {
    /// Returns true if this error means no geofence decision could be made
    /// for the input, as opposed to the gateway itself being misconfigured.
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, TuskguardError::Geometry(_) | TuskguardError::Parse(_))
    }
}

/// Malformed geometry.
///
/// Raised when a report position or perimeter corner cannot be placed on the
/// sphere. Evaluation of the affected report fails closed.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum GeometryError {
    /// Latitude or longitude is NaN or infinite
    #[error("Non-finite coordinate in {field}: ({latitude}, {longitude})")]
    NonFinite {
        field: String,
        latitude: f64,
        longitude: f64,
    },

    /// Latitude outside [-90, 90]
    #[error("Latitude out of range in {field}: {value}")]
    LatitudeOutOfRange { field: String, value: f64 },

    /// Longitude outside [-180, 180]
    #[error("Longitude out of range in {field}: {value}")]
    LongitudeOutOfRange { field: String, value: f64 },

    /// Both endpoints of a path are the same point, so no great circle exists
    #[error("Degenerate path: {field} endpoints coincide")]
    DegeneratePath { field: String },
}

impl GeometryError {
    /// Creates a non-finite coordinate error.
    pub fn non_finite(field: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self::NonFinite {
            field: field.into(),
            latitude,
            longitude,
        }
    }

    /// Creates a latitude range error.
    pub fn latitude(field: impl Into<String>, value: f64) -> Self {
        Self::LatitudeOutOfRange {
            field: field.into(),
            value,
        }
    }

    /// Creates a longitude range error.
    pub fn longitude(field: impl Into<String>, value: f64) -> Self {
        Self::LongitudeOutOfRange {
            field: field.into(),
            value,
        }
    }

    /// Creates a degenerate path error.
    pub fn degenerate(field: impl Into<String>) -> Self {
        Self::DegeneratePath {
            field: field.into(),
        }
    }
}

/// Errors related to configuration.
///
/// These occur when loading, parsing, or validating the application config
/// and station files, and when a caller references a station that was never
/// loaded.
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {reason}")]
    LoadFailed { path: String, reason: String },

    /// Invalid configuration format
    #[error("Invalid configuration format: {reason}")]
    InvalidFormat { reason: String },

    /// Missing required configuration field
    #[error("Missing required configuration field: {field}")]
    MissingField { field: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    /// A station id was referenced but never loaded
    #[error("Unknown station: {id}")]
    UnknownStation { id: String },

    /// Two station files declare the same id
    #[error("Duplicate station id: {id}")]
    DuplicateStation { id: String },

    /// No stations configured
    #[error("No stations configured")]
    NoStations,
}

impl ConfigError {
    /// Creates a file not found error.
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Creates a missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Creates an invalid value error.
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an unknown station error.
    pub fn unknown_station(id: impl Into<String>) -> Self {
        Self::UnknownStation { id: id.into() }
    }
}

/// Errors raised while decoding inbound reports.
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum ParseError {
    /// Failed to parse JSON data
    #[error("JSON parse error at line {line}, column {column}: {message}")]
    JsonError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Payload was not valid UTF-8
    #[error("Invalid UTF-8 encoding: {details}")]
    InvalidUtf8 { details: String },
}

impl ParseError {
    /// Creates a JSON parse error.
    pub fn json(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::JsonError {
            line,
            column,
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        ParseError::json(err.line(), err.column(), err.to_string())
    }
}

impl From<serde_json::Error> for TuskguardError {
    fn from(err: serde_json::Error) -> Self {
        TuskguardError::Parse(err.into())
    }
}

/// Delivery failures reported by a notifier sink.
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum NotifyError {
    /// The sink could not be reached at all
    #[error("Notifier '{sink}' unavailable: {reason}")]
    Unavailable { sink: String, reason: String },

    /// The event could not be encoded for the sink
    #[error("Failed to encode event for '{sink}': {reason}")]
    Encoding { sink: String, reason: String },
}

impl NotifyError {
    /// Creates an unavailable error.
    pub fn unavailable(sink: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            sink: sink.into(),
            reason: reason.into(),
        }
    }

    /// Creates an encoding error.
    pub fn encoding(sink: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Encoding {
            sink: sink.into(),
            reason: reason.into(),
        }
    }
}

/// Wrapper for I/O errors to make them serializable.
#[derive(Debug, Error, Serialize, Deserialize)]
#[error("I/O error: {kind:?}: {message}")]
pub struct IoError {
    pub kind: IoErrorKind,
    pub message: String,
}

impl From<io::Error> for IoError {
    fn from(err: io::Error) -> Self {
        Self {
            kind: err.kind().into(),
            message: err.to_string(),
        }
    }
}

impl From<io::Error> for TuskguardError {
    fn from(err: io::Error) -> Self {
        TuskguardError::Io(err.into())
    }
}

/// Serializable subset of std::io::ErrorKind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IoErrorKind {
    NotFound,
    PermissionDenied,
    BrokenPipe,
    InvalidData,
    UnexpectedEof,
    Other,
}

impl From<io::ErrorKind> for IoErrorKind {
    fn from(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::NotFound => IoErrorKind::NotFound,
            io::ErrorKind::PermissionDenied => IoErrorKind::PermissionDenied,
            io::ErrorKind::BrokenPipe => IoErrorKind::BrokenPipe,
            io::ErrorKind::InvalidData => IoErrorKind::InvalidData,
            io::ErrorKind::UnexpectedEof => IoErrorKind::UnexpectedEof,
            _ => IoErrorKind::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_error_display() {
        let err = GeometryError::latitude("report.position", 91.5);
        let display = format!("{}", err);
        assert!(display.contains("report.position"));
        assert!(display.contains("91.5"));
    }

    #[test]
    fn test_malformed_input_classification() {
        let err: TuskguardError = GeometryError::degenerate("west edge").into();
        assert!(err.is_malformed_input());

        let err: TuskguardError = ConfigError::unknown_station("T9").into();
        assert!(!err.is_malformed_input());
    }

    #[test]
    fn test_error_serialization() {
        let err = TuskguardError::Config(ConfigError::missing_field(
            "perimeter_info.perimeter_check",
        ));
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("Config"));
        assert!(json.contains("perimeter_check"));
    }

    #[test]
    fn test_json_error_conversion() {
        let err = serde_json::from_str::<serde_json::Value>("{ not json").unwrap_err();
        let tg: TuskguardError = err.into();
        assert!(matches!(tg, TuskguardError::Parse(ParseError::JsonError { line: 1, .. })));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "station file missing");
        let tg_err: TuskguardError = io_err.into();
        match tg_err {
            TuskguardError::Io(inner) => assert_eq!(inner.kind, IoErrorKind::NotFound),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

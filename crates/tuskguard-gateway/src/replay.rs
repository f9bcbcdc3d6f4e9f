//! Collar simulation files
//!
//! A simulation file is a JSON object with a `data` array of collar reports,
//! replayed in order. Entries are kept as raw JSON and replayed verbatim; the
//! gateway then decodes each one into a `LocationReport`, so fields it does
//! not model (e.g. `battery`) stop there and are not part of outbound events.

use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tracing::debug;
use tuskguard_core::error::{ConfigError, Result};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CollarSimulation {
    pub data: Vec<Value>,
}

impl CollarSimulation {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::file_not_found(path.display().to_string()).into());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let simulation: Self =
            serde_json::from_str(&contents).map_err(|e| ConfigError::LoadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        debug!(path = %path.display(), reports = simulation.data.len(), "Loaded collar simulation");
        Ok(simulation)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Each report as a compact single-line JSON payload.
    pub fn payloads(&self) -> impl Iterator<Item = String> + '_ {
        self.data.iter().map(Value::to_string)
    }
}

//! Station file loading.
//!
//! Station descriptions are read once at session start into a
//! [`StationRegistry`], which callers own and pass by reference.

use crate::error::{ConfigError, Result};
use crate::types::StationInfo;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

impl StationInfo {
    /// Loads and validates a station file.
    ///
    /// `.yaml`/`.yml` files are parsed as YAML, everything else as JSON.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::file_not_found(path.display().to_string()).into());
        }
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let is_yaml = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("yaml") | Some("yml")
        );

        let station: StationInfo = if is_yaml {
            serde_yaml::from_str(&contents).map_err(|e| ConfigError::LoadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?
        } else {
            serde_json::from_str(&contents).map_err(|e| ConfigError::LoadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?
        };

        station.validate()?;

        debug!(
            path = %path.display(),
            station = %station.id,
            zone = %station.zone,
            "Loaded station file"
        );

        Ok(station)
    }
}

/// The stations monitored by one gateway session.
#[derive(Debug, Clone, Default)]
pub struct StationRegistry {
    stations: Vec<StationInfo>,
}

impl StationRegistry {
    /// Builds a registry from already-loaded stations.
    ///
    /// # Errors
    ///
    /// Fails on duplicate ids or if any station does not validate.
    pub fn new(stations: Vec<StationInfo>) -> Result<Self> {
        let mut seen = HashSet::new();
        for station in &stations {
            station.validate()?;
            if !seen.insert(station.id.as_str()) {
                return Err(ConfigError::DuplicateStation {
                    id: station.id.clone(),
                }
                .into());
            }
        }
        Ok(Self { stations })
    }

    /// Loads every station file in order.
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        if paths.is_empty() {
            return Err(ConfigError::NoStations.into());
        }

        let stations = paths
            .iter()
            .map(StationInfo::from_file)
            .collect::<Result<Vec<_>>>()?;
        let registry = Self::new(stations)?;

        info!(
            station_count = registry.len(),
            checked = registry
                .iter()
                .filter(|s| s.zone_config.is_some())
                .count(),
            "Station registry loaded"
        );

        Ok(registry)
    }

    /// Returns the station with the given id.
    pub fn get(&self, id: &str) -> Result<&StationInfo> {
        self.stations
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| ConfigError::unknown_station(id).into())
    }

    /// Iterates over the stations in load order.
    pub fn iter(&self) -> impl Iterator<Item = &StationInfo> {
        self.stations.iter()
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TuskguardError;
    use crate::types::{ContainmentMode, GeoPoint};
    use std::io::Write;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    const TOWER_YAML: &str = r#"
id: T2
type: tower
area: Amboseli
position: {latitude: -2.65, longitude: 37.25}
zone: CONFLICT
communication_radius_meters: 800
perimeter_info:
  warning_perimeter:
    north_west_corner: {latitude: -2.64, longitude: 37.24}
    north_east_corner: {latitude: -2.64, longitude: 37.26}
    south_west_corner: {latitude: -2.66, longitude: 37.24}
    south_east_corner: {latitude: -2.66, longitude: 37.26}
  perimeter_check: OUTSIDE
"#;

    const TOWER_JSON: &str = r#"{
        "id": "T1", "type": "tower", "area": "Tsavo East",
        "position": {"latitude": 0.0, "longitude": 0.0},
        "zone": "SAFE"
    }"#;

    #[test]
    fn test_load_yaml_station() {
        let file = write_temp(".yaml", TOWER_YAML);
        let station = StationInfo::from_file(file.path()).unwrap();
        assert_eq!(station.id, "T2");
        assert_eq!(station.communication_radius_m, Some(800.0));
        let warning = station.zone_config.unwrap().warning.unwrap();
        assert_eq!(warning.mode, ContainmentMode::Outside);
        assert_eq!(warning.south_west, GeoPoint::new(-2.66, 37.24));
    }

    #[test]
    fn test_load_json_station() {
        let file = write_temp(".json", TOWER_JSON);
        let station = StationInfo::from_file(file.path()).unwrap();
        assert_eq!(station.zone, "SAFE");
        assert!(station.zone_config.is_none());
    }

    #[test]
    fn test_invalid_position_fails_fast() {
        let file = write_temp(
            ".json",
            r#"{"id": "T3", "type": "tower", "position": {"latitude": 120.0, "longitude": 0.0}, "zone": "CONFLICT"}"#,
        );
        let err = StationInfo::from_file(file.path()).unwrap_err();
        assert!(matches!(err, TuskguardError::Geometry(_)));
    }

    #[test]
    fn test_registry_lookup() {
        let a = write_temp(".json", TOWER_JSON);
        let b = write_temp(".yml", TOWER_YAML);
        let registry = StationRegistry::load(&[a.path(), b.path()]).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("T2").unwrap().area, "Amboseli");
        assert!(matches!(
            registry.get("T9"),
            Err(TuskguardError::Config(ConfigError::UnknownStation { .. }))
        ));
    }

    #[test]
    fn test_registry_rejects_duplicates() {
        let a = write_temp(".json", TOWER_JSON);
        let b = write_temp(".json", TOWER_JSON);
        let err = StationRegistry::load(&[a.path(), b.path()]).unwrap_err();
        assert!(matches!(
            err,
            TuskguardError::Config(ConfigError::DuplicateStation { .. })
        ));
    }

    #[test]
    fn test_registry_requires_stations() {
        let paths: Vec<&Path> = Vec::new();
        assert!(matches!(
            StationRegistry::load(&paths),
            Err(TuskguardError::Config(ConfigError::NoStations))
        ));
    }
}

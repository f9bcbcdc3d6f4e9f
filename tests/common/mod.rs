//! Common test utilities and helpers for integration tests

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use tuskguard_core::station::StationRegistry;
use tuskguard_gateway::{MemoryNotifier, StationGateway};
use tuskguard_geofence::GeofenceEngine;

/// Get the path to test fixtures
pub fn fixtures_dir() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir).join("tests").join("fixtures")
}

/// Get the path to a station fixture
pub fn station_fixture(name: &str) -> PathBuf {
    fixtures_dir().join("stations").join(name)
}

/// Load the two conflict-zone towers used by most scenarios
pub fn load_conflict_towers() -> StationRegistry {
    StationRegistry::load(&[
        station_fixture("t1_conflict.json"),
        station_fixture("t2_river.yaml"),
    ])
    .expect("Failed to load station fixtures")
}

/// Build a gateway with default monitoring settings that records events in memory
pub fn memory_gateway(stations: StationRegistry) -> (StationGateway, Arc<MemoryNotifier>) {
    let memory = Arc::new(MemoryNotifier::new());
    let gateway = StationGateway::new(GeofenceEngine::default(), stations, memory.clone());
    (gateway, memory)
}

//! Perimeter containment
//!
//! Decides whether a point is inside or outside a four-corner perimeter.
//! The test compares the point's cross-track distance to each edge against
//! the perimeter's size in the perpendicular direction: a point inside the
//! rectangle is never farther from an edge than the opposite edge is. This
//! is an extent check, not a point-in-polygon test, and it is kept that way
//! because alert thresholds in the field were tuned against it.

use crate::geo::GeoMath;
use serde::Serialize;
use tracing::trace;
use tuskguard_core::error::GeometryError;
use tuskguard_core::types::{ContainmentMode, GeoPoint, Perimeter};

/// Reference dimensions of a perimeter in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerimeterExtent {
    /// Horizontal extent, NW to NE
    pub length_m: f64,
    /// Vertical extent, NW to SW
    pub width_m: f64,
}

/// Cross-track distance in meters from a point to each perimeter edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundaryDistances {
    pub west_m: f64,
    pub east_m: f64,
    pub north_m: f64,
    pub south_m: f64,
}

/// Full outcome of a containment test, kept for logging and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Containment {
    pub extent: PerimeterExtent,
    pub distances: BoundaryDistances,
    /// Both west and east distances are within the length
    pub within_length: bool,
    /// Both north and south distances are within the width
    pub within_width: bool,
}

impl Containment {
    fn new(extent: PerimeterExtent, distances: BoundaryDistances) -> Self {
        let within_length =
            distances.west_m <= extent.length_m && distances.east_m <= extent.length_m;
        let within_width =
            distances.north_m <= extent.width_m && distances.south_m <= extent.width_m;
        Self {
            extent,
            distances,
            within_length,
            within_width,
        }
    }

    /// Returns true if the point lies within the perimeter's extent.
    #[inline]
    pub fn contained(&self) -> bool {
        self.within_length && self.within_width
    }

    /// Returns true if this outcome breaches a perimeter with the given mode.
    #[inline]
    pub fn is_breach(&self, mode: ContainmentMode) -> bool {
        match mode {
            ContainmentMode::Inside => self.contained(),
            ContainmentMode::Outside => !self.contained(),
        }
    }
}

/// Evaluates points against perimeters on a spherical Earth.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PerimeterEvaluator {
    geo: GeoMath,
}

impl PerimeterEvaluator {
    pub fn new(geo: GeoMath) -> Self {
        Self { geo }
    }

    pub fn geo(&self) -> &GeoMath {
        &self.geo
    }

    /// Returns true if `point` breaches `perimeter` under its containment mode.
    ///
    /// # Errors
    ///
    /// Returns a [`GeometryError`] if the point or any corner is malformed, or
    /// if two adjacent corners coincide. No breach decision is made in that case.
    pub fn evaluate(&self, point: &GeoPoint, perimeter: &Perimeter) -> Result<bool, GeometryError> {
        let containment = self.containment(point, perimeter)?;
        let breach = containment.is_breach(perimeter.mode);

        trace!(
            point = %point,
            mode = %perimeter.mode,
            within_length = containment.within_length,
            within_width = containment.within_width,
            breach,
            "Perimeter evaluation"
        );

        Ok(breach)
    }

    /// Runs the containment test and returns every intermediate value.
    pub fn containment(
        &self,
        point: &GeoPoint,
        perimeter: &Perimeter,
    ) -> Result<Containment, GeometryError> {
        point.validate("position")?;
        perimeter.validate("perimeter")?;

        let extent = self.extent_unchecked(perimeter);
        let distances = self.distances_unchecked(point, perimeter)?;
        Ok(Containment::new(extent, distances))
    }

    /// Length (NW–NE) and width (NW–SW) of the perimeter.
    pub fn extent(&self, perimeter: &Perimeter) -> Result<PerimeterExtent, GeometryError> {
        perimeter.validate("perimeter")?;
        Ok(self.extent_unchecked(perimeter))
    }

    /// Cross-track distances from `point` to the four edges.
    pub fn boundary_distances(
        &self,
        point: &GeoPoint,
        perimeter: &Perimeter,
    ) -> Result<BoundaryDistances, GeometryError> {
        point.validate("position")?;
        perimeter.validate("perimeter")?;
        self.distances_unchecked(point, perimeter)
    }

    fn extent_unchecked(&self, perimeter: &Perimeter) -> PerimeterExtent {
        PerimeterExtent {
            length_m: self.geo.haversine(&perimeter.north_west, &perimeter.north_east),
            width_m: self.geo.haversine(&perimeter.north_west, &perimeter.south_west),
        }
    }

    fn distances_unchecked(
        &self,
        point: &GeoPoint,
        perimeter: &Perimeter,
    ) -> Result<BoundaryDistances, GeometryError> {
        let west = (&perimeter.north_west, &perimeter.south_west);
        let east = (&perimeter.north_east, &perimeter.south_east);
        let north = (&perimeter.north_west, &perimeter.north_east);
        let south = (&perimeter.south_west, &perimeter.south_east);

        Ok(BoundaryDistances {
            west_m: self.geo.cross_track(west, point, "west edge")?,
            east_m: self.geo.cross_track(east, point, "east edge")?,
            north_m: self.geo.cross_track(north, point, "north edge")?,
            south_m: self.geo.cross_track(south, point, "south edge")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(mode: ContainmentMode) -> Perimeter {
        Perimeter::from_bounds(0.01, -0.01, -0.01, 0.01, mode)
    }

    #[test]
    fn test_extent() {
        let evaluator = PerimeterEvaluator::default();
        let extent = evaluator.extent(&square(ContainmentMode::Inside)).unwrap();
        assert!((extent.length_m - 2223.8985).abs() < 0.001);
        assert!((extent.width_m - 2223.8985).abs() < 0.001);
    }

    #[test]
    fn test_center_is_contained() {
        let evaluator = PerimeterEvaluator::default();
        let c = evaluator
            .containment(&GeoPoint::new(0.0, 0.0), &square(ContainmentMode::Inside))
            .unwrap();
        assert!(c.contained());
        assert!((c.distances.west_m - 1111.949).abs() < 0.01);
        assert!((c.distances.north_m - 1111.949).abs() < 0.01);
    }

    #[test]
    fn test_inside_mode() {
        let evaluator = PerimeterEvaluator::default();
        let perimeter = square(ContainmentMode::Inside);
        assert!(evaluator.evaluate(&GeoPoint::new(0.0, 0.0), &perimeter).unwrap());
        assert!(evaluator.evaluate(&GeoPoint::new(0.005, 0.005), &perimeter).unwrap());
        assert!(!evaluator.evaluate(&GeoPoint::new(0.02, 0.02), &perimeter).unwrap());
        assert!(!evaluator.evaluate(&GeoPoint::new(1.0, 1.0), &perimeter).unwrap());
    }

    #[test]
    fn test_outside_mode() {
        let evaluator = PerimeterEvaluator::default();
        let perimeter = square(ContainmentMode::Outside);
        assert!(!evaluator.evaluate(&GeoPoint::new(0.0, 0.0), &perimeter).unwrap());
        assert!(evaluator.evaluate(&GeoPoint::new(0.02, 0.02), &perimeter).unwrap());
    }

    #[test]
    fn test_points_near_edges() {
        let evaluator = PerimeterEvaluator::default();
        let perimeter = square(ContainmentMode::Inside);

        // Just inside each edge
        assert!(evaluator.evaluate(&GeoPoint::new(0.0099, 0.0), &perimeter).unwrap());
        assert!(evaluator.evaluate(&GeoPoint::new(0.0, 0.0099), &perimeter).unwrap());
        assert!(evaluator.evaluate(&GeoPoint::new(-0.0099, 0.0), &perimeter).unwrap());
        assert!(evaluator.evaluate(&GeoPoint::new(0.0, -0.0099), &perimeter).unwrap());

        // Just outside
        assert!(!evaluator.evaluate(&GeoPoint::new(0.0101, 0.0), &perimeter).unwrap());
        assert!(!evaluator.evaluate(&GeoPoint::new(0.0, 0.0101), &perimeter).unwrap());

        // Beyond one edge only: that edge is close but the opposite one is too far
        let c = evaluator
            .containment(&GeoPoint::new(0.015, 0.0), &perimeter)
            .unwrap();
        assert!(c.within_length);
        assert!(!c.within_width);
        assert!(c.distances.north_m < c.extent.width_m);
        assert!(c.distances.south_m > c.extent.width_m);
    }

    #[test]
    fn test_modes_are_negations() {
        let evaluator = PerimeterEvaluator::default();
        let inside = square(ContainmentMode::Inside);
        let outside = inside.with_mode(ContainmentMode::Outside);

        for i in -6..=6 {
            for j in -6..=6 {
                let point = GeoPoint::new(i as f64 * 0.004, j as f64 * 0.004);
                let a = evaluator.evaluate(&point, &inside).unwrap();
                let b = evaluator.evaluate(&point, &outside).unwrap();
                assert_ne!(a, b, "modes agree at {point}");

                let extent = evaluator.extent(&inside).unwrap();
                let d = evaluator.boundary_distances(&point, &inside).unwrap();
                let expected = d.west_m <= extent.length_m
                    && d.east_m <= extent.length_m
                    && d.north_m <= extent.width_m
                    && d.south_m <= extent.width_m;
                assert_eq!(a, expected, "containment mismatch at {point}");
            }
        }
    }

    #[test]
    fn test_non_square_perimeter() {
        // 0.04° wide, 0.01° tall strip along a river corridor
        let evaluator = PerimeterEvaluator::default();
        let strip = Perimeter::from_bounds(-2.60, -2.61, 37.20, 37.24, ContainmentMode::Inside);

        assert!(evaluator.evaluate(&GeoPoint::new(-2.605, 37.235), &strip).unwrap());
        assert!(!evaluator.evaluate(&GeoPoint::new(-2.615, 37.22), &strip).unwrap());
        assert!(!evaluator.evaluate(&GeoPoint::new(-2.605, 37.25), &strip).unwrap());
    }

    #[test]
    fn test_containment_serializes_for_diagnostics() {
        let evaluator = PerimeterEvaluator::default();
        let c = evaluator
            .containment(&GeoPoint::new(0.015, 0.0), &square(ContainmentMode::Inside))
            .unwrap();
        let value = serde_json::to_value(c).unwrap();
        assert_eq!(value["within_length"], true);
        assert_eq!(value["within_width"], false);
        assert!(value["distances"]["south_m"].as_f64().unwrap() > 2223.0);
    }

    #[test]
    fn test_malformed_point_fails_closed() {
        let evaluator = PerimeterEvaluator::default();
        let err = evaluator
            .evaluate(&GeoPoint::new(f64::NAN, 0.0), &square(ContainmentMode::Outside))
            .unwrap_err();
        assert!(matches!(err, GeometryError::NonFinite { .. }));
    }

    #[test]
    fn test_malformed_corner() {
        let evaluator = PerimeterEvaluator::default();
        let mut perimeter = square(ContainmentMode::Inside);
        perimeter.north_east = GeoPoint::new(0.01, 200.0);
        let err = evaluator
            .evaluate(&GeoPoint::new(0.0, 0.0), &perimeter)
            .unwrap_err();
        assert_eq!(
            err,
            GeometryError::longitude("perimeter.north_east_corner", 200.0)
        );
        assert_eq!(evaluator.extent(&perimeter).unwrap_err(), err);

        perimeter.north_east = GeoPoint::new(0.01, 0.01);
        perimeter.south_west = GeoPoint::new(f64::INFINITY, -0.01);
        assert!(matches!(
            evaluator.boundary_distances(&GeoPoint::new(0.0, 0.0), &perimeter),
            Err(GeometryError::NonFinite { field, .. }) if field == "perimeter.south_west_corner"
        ));
    }

    #[test]
    fn test_collapsed_edge() {
        let evaluator = PerimeterEvaluator::default();
        let mut perimeter = square(ContainmentMode::Inside);
        perimeter.south_west = perimeter.north_west;
        let err = evaluator
            .evaluate(&GeoPoint::new(0.0, 0.0), &perimeter)
            .unwrap_err();
        assert_eq!(err, GeometryError::degenerate("west edge"));
    }
}

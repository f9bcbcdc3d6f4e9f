//! Spherical Earth primitives
//!
//! Great-circle (haversine) distance and n-vector cross-track distance on a
//! sphere. Planar approximations are avoided: at the few-kilometer scale of a
//! tower's range they drift by tens of meters near the perimeter edges.

use tuskguard_core::config::DEFAULT_EARTH_RADIUS_M;
use tuskguard_core::error::GeometryError;
use tuskguard_core::types::GeoPoint;

type Vec3 = [f64; 3];

/// Cross products shorter than this mean the path endpoints coincide
/// (or are antipodal) and no unique great circle exists.
const DEGENERATE_NORM: f64 = 1e-12;

/// Distance calculations on a sphere of fixed radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoMath {
    earth_radius_m: f64,
}

impl GeoMath {
    /// Creates a calculator for a sphere of the given radius in meters.
    pub const fn new(earth_radius_m: f64) -> Self {
        Self { earth_radius_m }
    }

    pub fn earth_radius_m(&self) -> f64 {
        self.earth_radius_m
    }

    /// Great-circle distance between two points in meters (haversine).
    ///
    /// # Errors
    ///
    /// Returns a [`GeometryError`] if either point is non-finite or out of range.
    pub fn distance(&self, a: &GeoPoint, b: &GeoPoint) -> Result<f64, GeometryError> {
        a.validate("start")?;
        b.validate("end")?;
        Ok(self.haversine(a, b))
    }

    /// Perpendicular distance in meters from `point` to the great circle
    /// through `path.0` and `path.1`.
    ///
    /// The result is a magnitude; which side of the path the point lies on
    /// is discarded.
    ///
    /// # Errors
    ///
    /// Returns a [`GeometryError`] for malformed coordinates or when the two
    /// path endpoints coincide.
    pub fn cross_track_distance(
        &self,
        path: (&GeoPoint, &GeoPoint),
        point: &GeoPoint,
    ) -> Result<f64, GeometryError> {
        path.0.validate("path.start")?;
        path.1.validate("path.end")?;
        point.validate("point")?;
        self.cross_track(path, point, "path")
    }

    /// Haversine distance without input validation.
    pub(crate) fn haversine(&self, a: &GeoPoint, b: &GeoPoint) -> f64 {
        let lat1 = a.latitude.to_radians();
        let lat2 = b.latitude.to_radians();
        let delta_lat = (b.latitude - a.latitude).to_radians();
        let delta_lon = (b.longitude - a.longitude).to_radians();

        let h = (delta_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
        let c = 2.0 * h.sqrt().atan2((1.0 - h).max(0.0).sqrt());

        self.earth_radius_m * c
    }

    /// Cross-track distance without coordinate validation.
    ///
    /// `edge` names the path in the degenerate-path error.
    pub(crate) fn cross_track(
        &self,
        path: (&GeoPoint, &GeoPoint),
        point: &GeoPoint,
        edge: &str,
    ) -> Result<f64, GeometryError> {
        let normal = cross(n_vector(path.0), n_vector(path.1));
        let norm = dot(normal, normal).sqrt();
        if norm < DEGENERATE_NORM {
            return Err(GeometryError::degenerate(edge));
        }

        let unit_normal = scale(normal, 1.0 / norm);
        let sin_theta = (-dot(unit_normal, n_vector(point))).clamp(-1.0, 1.0);

        Ok((self.earth_radius_m * sin_theta.asin()).abs())
    }
}

impl Default for GeoMath {
    fn default() -> Self {
        Self::new(DEFAULT_EARTH_RADIUS_M)
    }
}

/// Unit normal vector to the sphere at the given point.
fn n_vector(point: &GeoPoint) -> Vec3 {
    let lat = point.latitude.to_radians();
    let lon = point.longitude.to_radians();
    [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
}

fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn scale(v: Vec3, k: f64) -> Vec3 {
    [v[0] * k, v[1] * k, v[2] * k]
}

//! Great-circle proximity evaluation.
//!
//! Pure functions, no state: the engine feeds each position sample through
//! [`is_inside`] for every registered geofence.

use crate::geofence::types::{Coordinates, Geofence};

/// Earth's mean radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine great-circle distance between two points, in meters.
///
/// Deterministic and symmetric: `haversine_m(a, b) == haversine_m(b, a)`,
/// and `haversine_m(p, p) == 0.0`.
pub fn haversine_m(a: Coordinates, b: Coordinates) -> f64 {
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push h past 1.0 for near-antipodal points, which would
    // feed a negative value to the sqrt below.
    let h = h.min(1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

/// Classify a position against a geofence. The boundary is inclusive:
/// a sample at exactly `radius_m` from the center counts as inside.
pub fn is_inside(position: Coordinates, fence: &Geofence) -> bool {
    haversine_m(position, fence.center) <= fence.radius_m
}

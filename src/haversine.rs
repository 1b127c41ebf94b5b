//! Great-circle distance between coordinates.
//!
//! Straight-line distance over a spherical Earth; used to measure arc length
//! along decoded route geometries.

use crate::types::LatLng;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Haversine distance between two points in meters.
///
/// Symmetric, zero for identical points, and defined for any finite input.
pub fn distance_meters(from: LatLng, to: LatLng) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);

    // Rounding can push `a` just past 1 for antipodal points.
    2.0 * EARTH_RADIUS_METERS * a.sqrt().min(1.0).asin()
}

/// Total length of a path in meters (0 for fewer than two points).
pub fn path_length_meters(points: &[LatLng]) -> f64 {
    points
        .windows(2)
        .map(|pair| distance_meters(pair[0], pair[1]))
        .sum()
}

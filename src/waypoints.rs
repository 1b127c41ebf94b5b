//! Evenly spaced waypoint sampling along a decoded route.
//!
//! Waypoints are placed by cumulative arc length (haversine), so dense and
//! sparse stretches of a polyline get the same spacing on the ground.

use crate::haversine::{distance_meters, path_length_meters};
use crate::types::LatLng;

/// Two points closer than this in both axes (degrees) count as the same point.
pub const SAME_POINT_EPSILON: f64 = 1e-6;

/// Selects up to `max_waypoints` points along `points`, evenly spaced by arc length.
///
/// - no points or `max_waypoints == 0`: empty
/// - a single point: that point
/// - `max_waypoints == 1`: the midpoint by arc length
/// - `max_waypoints >= points.len()`: the input with adjacent duplicates
///   collapsed; the path is never up-sampled
/// - otherwise: `max_waypoints` targets from start to end, interpolated within
///   their segment, with adjacent duplicates collapsed
pub fn sample_waypoints(points: &[LatLng], max_waypoints: usize) -> Vec<LatLng> {
    if points.is_empty() || max_waypoints == 0 {
        return Vec::new();
    }
    if points.len() == 1 {
        return vec![points[0]];
    }
    if max_waypoints == 1 {
        let cumulative = cumulative_distances(points);
        let half = path_length_meters(points) / 2.0;
        return vec![point_at_cumulative(points, &cumulative, half)];
    }
    if max_waypoints >= points.len() {
        return unique_waypoints(points);
    }

    let cumulative = cumulative_distances(points);
    let total = cumulative[cumulative.len() - 1];
    if total == 0.0 {
        return vec![points[0]];
    }
    let spacing = total / (max_waypoints - 1) as f64;

    let mut sampled: Vec<LatLng> = Vec::with_capacity(max_waypoints);
    for i in 0..max_waypoints {
        let target = spacing * i as f64;
        let point = point_at_cumulative(points, &cumulative, target);
        push_unique(&mut sampled, point);
    }
    sampled
}

/// Running arc length: `table[i]` is the distance from `points[0]` to `points[i]`.
pub fn cumulative_distances(points: &[LatLng]) -> Vec<f64> {
    let mut distances = Vec::with_capacity(points.len());
    let mut running = 0.0;
    for (i, point) in points.iter().enumerate() {
        if i > 0 {
            running += distance_meters(points[i - 1], *point);
        }
        distances.push(running);
    }
    distances
}

/// The point `target` meters along the path.
///
/// `cumulative` must come from [`cumulative_distances`] over the same
/// non-empty `points`. The bracketing segment is the first index whose
/// cumulative distance is `>= target`.
pub fn point_at_cumulative(points: &[LatLng], cumulative: &[f64], target: f64) -> LatLng {
    if target <= 0.0 {
        return points[0];
    }
    let total = cumulative[cumulative.len() - 1];
    if target >= total {
        return points[points.len() - 1];
    }

    let index = cumulative.partition_point(|&distance| distance < target);
    if index == 0 {
        return points[0];
    }

    let prev = points[index - 1];
    let next = points[index];
    let segment = cumulative[index] - cumulative[index - 1];
    if segment <= 0.0 {
        return next;
    }
    let fraction = (target - cumulative[index - 1]) / segment;
    LatLng::new(
        prev.lat + (next.lat - prev.lat) * fraction,
        prev.lng + (next.lng - prev.lng) * fraction,
    )
}

/// Collapses runs of adjacent near-identical points (not a global dedupe).
pub fn unique_waypoints(points: &[LatLng]) -> Vec<LatLng> {
    let mut result = Vec::with_capacity(points.len());
    for point in points {
        push_unique(&mut result, *point);
    }
    result
}

pub fn same_point(a: LatLng, b: LatLng) -> bool {
    (a.lat - b.lat).abs() < SAME_POINT_EPSILON && (a.lng - b.lng).abs() < SAME_POINT_EPSILON
}

fn push_unique(points: &mut Vec<LatLng>, point: LatLng) {
    if points.last().is_none_or(|last| !same_point(*last, point)) {
        points.push(point);
    }
}

//! Encoded polyline codec for route geometries.
//!
//! Routes arrive as Google encoded polylines (precision 1e5). They are decoded
//! at the boundary into a [`Polyline`] of coordinates; everything downstream
//! works on the decoded points.

use serde::{Deserialize, Serialize};

use crate::error::PolylineError;
use crate::types::LatLng;

/// Fixed-point scale of the encoding (five decimal places).
pub const PRECISION: f64 = 1e5;

/// A varint longer than this cannot encode a coordinate delta.
const MAX_SHIFT: u32 = 30;

/// A route geometry as decoded coordinates, in travel order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<LatLng>,
}

impl Polyline {
    /// Creates a new Polyline from decoded coordinate points.
    pub fn new(points: Vec<LatLng>) -> Self {
        Self { points }
    }

    /// Decodes an encoded polyline string.
    ///
    /// Each point is two zig-zag varints (latitude delta, longitude delta)
    /// relative to the previous point. Fails on blank input or input that ends
    /// in the middle of a varint; no partial result is returned.
    pub fn decode(encoded: &str) -> Result<Self, PolylineError> {
        if encoded.trim().is_empty() {
            return Err(PolylineError::EmptyInput);
        }

        let bytes = encoded.as_bytes();
        let mut points = Vec::with_capacity(bytes.len() / 4);
        let mut cursor = 0;
        let mut lat: i64 = 0;
        let mut lng: i64 = 0;

        while cursor < bytes.len() {
            lat += next_delta(bytes, &mut cursor)?;
            lng += next_delta(bytes, &mut cursor)?;
            points.push(LatLng::new(lat as f64 / PRECISION, lng as f64 / PRECISION));
        }

        Ok(Self { points })
    }

    /// Encodes the points back into the compact polyline format.
    pub fn encode(&self) -> String {
        let mut out = String::with_capacity(self.points.len() * 8);
        let mut prev_lat: i64 = 0;
        let mut prev_lng: i64 = 0;

        for point in &self.points {
            let lat = (point.lat * PRECISION).round() as i64;
            let lng = (point.lng * PRECISION).round() as i64;
            push_delta(&mut out, lat - prev_lat);
            push_delta(&mut out, lng - prev_lng);
            prev_lat = lat;
            prev_lng = lng;
        }

        out
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[LatLng] {
        &self.points
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<LatLng> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Reads one zig-zag varint starting at `cursor`, advancing past it.
fn next_delta(bytes: &[u8], cursor: &mut usize) -> Result<i64, PolylineError> {
    let mut value: i64 = 0;
    let mut shift: u32 = 0;

    loop {
        let Some(&byte) = bytes.get(*cursor) else {
            return Err(PolylineError::Malformed { offset: *cursor });
        };
        if shift > MAX_SHIFT {
            return Err(PolylineError::Malformed { offset: *cursor });
        }
        let chunk = i64::from(byte) - 63;
        *cursor += 1;
        value |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
    }

    Ok((value >> 1) ^ -(value & 1))
}

fn push_delta(out: &mut String, delta: i64) {
    let mut value = (delta << 1) ^ (delta >> 63);
    while value >= 0x20 {
        out.push(char::from((((value & 0x1f) | 0x20) + 63) as u8));
        value >>= 5;
    }
    out.push(char::from((value + 63) as u8));
}

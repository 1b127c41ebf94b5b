//! Search for places along a route.
//!
//! Pipeline: defaults + validation, fetch the encoded route, decode it, sample
//! waypoints, then one biased text search per waypoint. Searches run strictly
//! in waypoint order and the first failure aborts the whole request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::MAX_SEARCH_LIMIT;
use crate::error::{Error, ValidationError};
use crate::polyline::Polyline;
use crate::traits::{PlaceSearcher, RoutePathProvider};
use crate::types::{LatLng, Locale, LocationBias, PlaceSummary};
use crate::waypoints::sample_waypoints;

pub const DEFAULT_ROUTE_LIMIT: u32 = 5;
pub const DEFAULT_ROUTE_RADIUS_M: f64 = 1000.0;
pub const DEFAULT_ROUTE_WAYPOINTS: usize = 5;
pub const MAX_ROUTE_WAYPOINTS: usize = 20;

/// Travel mode accepted by the routing backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelMode {
    #[default]
    Drive,
    Walk,
    Bicycle,
    TwoWheeler,
    Transit,
}

impl TravelMode {
    pub const ALL: [TravelMode; 5] = [
        TravelMode::Drive,
        TravelMode::Walk,
        TravelMode::Bicycle,
        TravelMode::TwoWheeler,
        TravelMode::Transit,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TravelMode::Drive => "DRIVE",
            TravelMode::Walk => "WALK",
            TravelMode::Bicycle => "BICYCLE",
            TravelMode::TwoWheeler => "TWO_WHEELER",
            TravelMode::Transit => "TRANSIT",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelMode {
    type Err = ValidationError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_uppercase();
        TravelMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == normalized)
            .ok_or_else(|| {
                ValidationError::new(
                    "mode",
                    "must be DRIVE, WALK, BICYCLE, TWO_WHEELER, or TRANSIT",
                )
            })
    }
}

/// A query to search along a route. `None` fields take their defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteRequest {
    pub query: String,
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_waypoints: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(flatten)]
    pub locale: Locale,
}

/// A defaulted and validated [`RouteRequest`].
#[derive(Debug, Clone, PartialEq)]
pub struct RouteQuery {
    pub query: String,
    pub from: String,
    pub to: String,
    pub mode: TravelMode,
    pub radius_m: f64,
    pub max_waypoints: usize,
    pub limit: u32,
    pub locale: Locale,
}

impl RouteRequest {
    /// Applies defaults, then validates. No I/O happens here.
    pub fn into_query(self) -> Result<RouteQuery, Error> {
        let query = self.query.trim().to_string();
        let from = self.from.trim().to_string();
        let to = self.to.trim().to_string();
        let mode = self
            .mode
            .as_deref()
            .map(str::trim)
            .filter(|mode| !mode.is_empty())
            .unwrap_or(TravelMode::Drive.as_str())
            .to_uppercase();
        let limit = self.limit.unwrap_or(DEFAULT_ROUTE_LIMIT);
        let radius_m = self.radius_m.unwrap_or(DEFAULT_ROUTE_RADIUS_M);
        let max_waypoints = self.max_waypoints.unwrap_or(DEFAULT_ROUTE_WAYPOINTS);

        if query.is_empty() {
            return Err(ValidationError::required("query").into());
        }
        if from.is_empty() {
            return Err(ValidationError::required("from").into());
        }
        if to.is_empty() {
            return Err(ValidationError::required("to").into());
        }
        if !(1..=MAX_SEARCH_LIMIT).contains(&limit) {
            return Err(
                ValidationError::new("limit", format!("must be 1-{}", MAX_SEARCH_LIMIT)).into(),
            );
        }
        if !(radius_m > 0.0) || !radius_m.is_finite() {
            return Err(ValidationError::new("radius_m", "must be > 0").into());
        }
        if !(1..=MAX_ROUTE_WAYPOINTS).contains(&max_waypoints) {
            return Err(ValidationError::new(
                "max_waypoints",
                format!("must be 1-{}", MAX_ROUTE_WAYPOINTS),
            )
            .into());
        }
        let mode = mode.parse::<TravelMode>()?;

        Ok(RouteQuery {
            query,
            from,
            to,
            mode,
            radius_m,
            max_waypoints,
            limit,
            locale: Locale::new(self.locale.language.as_deref(), self.locale.region.as_deref()),
        })
    }
}

/// Sampled waypoints with their search results, in route order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteResponse {
    pub waypoints: Vec<RouteWaypoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteWaypoint {
    pub location: LatLng,
    pub results: Vec<PlaceSummary>,
}

/// Runs the full route search against the given collaborators.
///
/// Makes exactly one path request plus one search per sampled waypoint.
/// Collaborator errors are returned unchanged; results gathered before a
/// failing search are discarded.
pub fn search_along_route<P, S>(
    request: RouteRequest,
    paths: &P,
    searcher: &S,
) -> Result<RouteResponse, Error>
where
    P: RoutePathProvider + ?Sized,
    S: PlaceSearcher + ?Sized,
{
    let query = request.into_query()?;

    let encoded = paths.encoded_paths(&query.from, &query.to, query.mode, &query.locale)?;
    let encoded = first_usable_path(&encoded)?;

    let polyline = Polyline::decode(encoded)?;
    let waypoints = sample_waypoints(polyline.points(), query.max_waypoints);
    if waypoints.is_empty() {
        return Err(Error::NoWaypoints);
    }
    debug!(
        points = polyline.len(),
        waypoints = waypoints.len(),
        mode = %query.mode,
        "sampled route waypoints"
    );

    let mut results = Vec::with_capacity(waypoints.len());
    for waypoint in waypoints {
        let bias = LocationBias::around(waypoint, query.radius_m);
        let places = searcher.search_near(&query.query, bias, query.limit, &query.locale)?;
        results.push(RouteWaypoint {
            location: waypoint,
            results: places,
        });
    }

    Ok(RouteResponse { waypoints: results })
}

/// Only the first path is used; it must carry a non-blank polyline.
fn first_usable_path(paths: &[String]) -> Result<&str, Error> {
    let first = paths
        .first()
        .ok_or(Error::RouteNotFound("no routes returned"))?
        .trim();
    if first.is_empty() {
        return Err(Error::RouteNotFound("empty route polyline"));
    }
    Ok(first)
}

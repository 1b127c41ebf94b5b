//! places-route: a typed Google Places client with route-aware search.
//!
//! The geometry core (polyline decoding, haversine distances, waypoint
//! sampling) is pure; HTTP lives in [`client`], and [`route`] ties them
//! together behind the collaborator traits in [`traits`].

pub mod error;
pub mod types;
pub mod price_level;
pub mod haversine;
pub mod polyline;
pub mod waypoints;
pub mod traits;
pub mod route;
pub mod client;
pub mod cli;

mod payloads;

pub use client::{Client, ClientConfig};
pub use error::{Error, PolylineError, ValidationError};
pub use route::{RouteRequest, RouteResponse, RouteWaypoint, TravelMode, search_along_route};

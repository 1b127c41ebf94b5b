//! Collaborator seams for the route pipeline.
//!
//! The route search only needs two capabilities: fetching an encoded path
//! between two places, and running a text search around a point. The HTTP
//! [`Client`](crate::client::Client) implements both; tests supply their own.

use crate::error::Error;
use crate::route::TravelMode;
use crate::types::{Locale, LocationBias, PlaceSummary};

/// Provides encoded route polylines between two free-text locations.
pub trait RoutePathProvider {
    /// Encoded polylines of the candidate routes, best first. May be empty.
    fn encoded_paths(
        &self,
        origin: &str,
        destination: &str,
        mode: TravelMode,
        locale: &Locale,
    ) -> Result<Vec<String>, Error>;
}

/// Runs a text search restricted to a circular bias.
pub trait PlaceSearcher {
    fn search_near(
        &self,
        query: &str,
        bias: LocationBias,
        limit: u32,
        locale: &Locale,
    ) -> Result<Vec<PlaceSummary>, Error>;
}

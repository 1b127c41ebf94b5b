//! Blocking HTTP client for the Places API (New) and the Routes API.
//!
//! Every call sends the API key and a field mask as headers; responses are
//! capped in size and decoded into the public models in [`crate::types`].

use std::io::Read;
use std::time::Duration;

use reqwest::blocking::RequestBuilder;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::error::{Error, ValidationError};
use crate::payloads::{
    AutocompleteBody, AutocompleteResponsePayload, CirclePayload, ComputeRoutesBody,
    LocaleFields, PhotoMediaPayload, PlacePayload, RoutesResponsePayload, SearchNearbyBody,
    SearchResponsePayload, SearchTextBody, SuggestionPayload,
};
use crate::price_level::MAX_PRICE_LEVEL;
use crate::route::{RouteRequest, RouteResponse, TravelMode, search_along_route};
use crate::traits::{PlaceSearcher, RoutePathProvider};
use crate::types::{
    AutocompleteRequest, AutocompleteResponse, DetailsRequest, Locale, LocationBias,
    LocationResolveRequest, LocationResolveResponse, NearbySearchRequest, NearbySearchResponse,
    PhotoMediaRequest, PhotoMediaResponse, PlaceDetails, PlaceSummary, ResolvedLocation,
    SearchRequest, SearchResponse,
};

pub const DEFAULT_BASE_URL: &str = "https://places.googleapis.com/v1";
pub const DEFAULT_ROUTES_BASE_URL: &str = "https://routes.googleapis.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const DEFAULT_SEARCH_LIMIT: u32 = 10;
pub const MAX_SEARCH_LIMIT: u32 = 20;
pub const DEFAULT_NEARBY_LIMIT: u32 = 10;
pub const MAX_NEARBY_LIMIT: u32 = 20;
pub const DEFAULT_AUTOCOMPLETE_LIMIT: u32 = 5;
pub const MAX_AUTOCOMPLETE_LIMIT: u32 = 20;
pub const DEFAULT_RESOLVE_LIMIT: u32 = 5;
pub const MAX_RESOLVE_LIMIT: u32 = 10;
pub const MAX_PHOTO_PX: u32 = 4800;

pub const API_KEY_HEADER: &str = "X-Goog-Api-Key";
pub const FIELD_MASK_HEADER: &str = "X-Goog-FieldMask";

pub const ROUTES_PATH: &str = "/directions/v2:computeRoutes";

pub const SEARCH_FIELD_MASK: &str = "places.id,places.displayName,places.formattedAddress,places.location,places.rating,places.priceLevel,places.types,places.currentOpeningHours,nextPageToken";
pub const NEARBY_FIELD_MASK: &str = "places.id,places.displayName,places.formattedAddress,places.location,places.rating,places.userRatingCount,places.priceLevel,places.types,places.currentOpeningHours,nextPageToken";
pub const RESOLVE_FIELD_MASK: &str =
    "places.id,places.displayName,places.formattedAddress,places.location,places.types";
pub const AUTOCOMPLETE_FIELD_MASK: &str = "suggestions.placePrediction.placeId,suggestions.placePrediction.place,suggestions.placePrediction.text,suggestions.placePrediction.structuredFormat,suggestions.placePrediction.types,suggestions.placePrediction.distanceMeters,suggestions.queryPrediction.text,suggestions.queryPrediction.structuredFormat";
pub const DETAILS_FIELD_MASK: &str = "id,displayName,formattedAddress,location,rating,priceLevel,types,regularOpeningHours,currentOpeningHours,nationalPhoneNumber,websiteUri";
pub const ROUTES_FIELD_MASK: &str = "routes.polyline.encodedPolyline";

/// Upper bound on how much of a response body is read.
const MAX_RESPONSE_BYTES: u64 = 1 << 20;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub routes_base_url: String,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            routes_base_url: DEFAULT_ROUTES_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    config: ClientConfig,
    client: reqwest::blocking::Client,
}

impl Client {
    pub fn new(mut config: ClientConfig) -> Result<Self, Error> {
        config.base_url = normalize_base(&config.base_url, DEFAULT_BASE_URL);
        config.routes_base_url = normalize_base(&config.routes_base_url, DEFAULT_ROUTES_BASE_URL);
        if config.timeout_secs == 0 {
            config.timeout_secs = DEFAULT_TIMEOUT_SECS;
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Text search with optional filters and location bias.
    #[instrument(skip_all)]
    pub fn search(&self, request: SearchRequest) -> Result<SearchResponse, Error> {
        let limit = request.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
        validate_search(&request, limit)?;

        let body = SearchTextBody::from_request(&request, limit);
        let url = format!("{}/places:searchText", self.config.base_url);
        let response: SearchResponsePayload = self.post_json(&url, &body, SEARCH_FIELD_MASK)?;
        debug!(results = response.places.len(), "search completed");

        Ok(SearchResponse {
            results: response.places.into_iter().map(PlaceSummary::from).collect(),
            next_page_token: non_empty(response.next_page_token),
        })
    }

    /// Nearby search inside a circular restriction.
    #[instrument(skip_all)]
    pub fn nearby_search(
        &self,
        request: NearbySearchRequest,
    ) -> Result<NearbySearchResponse, Error> {
        let limit = request.limit.unwrap_or(DEFAULT_NEARBY_LIMIT);
        let restriction = request
            .location_restriction
            .ok_or_else(|| ValidationError::required("location_restriction"))?;
        restriction.validate()?;
        check_limit(limit, MAX_NEARBY_LIMIT)?;

        let body = SearchNearbyBody {
            location_restriction: CirclePayload::from(&restriction),
            max_result_count: limit,
            included_types: request.included_types,
            excluded_types: request.excluded_types,
            locale: LocaleFields::from(&request.locale),
        };
        let url = format!("{}/places:searchNearby", self.config.base_url);
        let response: SearchResponsePayload = self.post_json(&url, &body, NEARBY_FIELD_MASK)?;
        debug!(results = response.places.len(), "nearby search completed");

        Ok(NearbySearchResponse {
            results: response.places.into_iter().map(PlaceSummary::from).collect(),
            next_page_token: non_empty(response.next_page_token),
        })
    }

    /// Place and query suggestions for partial input.
    #[instrument(skip_all)]
    pub fn autocomplete(
        &self,
        request: AutocompleteRequest,
    ) -> Result<AutocompleteResponse, Error> {
        let limit = request.limit.unwrap_or(DEFAULT_AUTOCOMPLETE_LIMIT);
        if request.input.trim().is_empty() {
            return Err(ValidationError::required("input").into());
        }
        check_limit(limit, MAX_AUTOCOMPLETE_LIMIT)?;
        if let Some(bias) = &request.location_bias {
            bias.validate()?;
        }

        let body = AutocompleteBody::from(&request);
        let url = format!("{}/places:autocomplete", self.config.base_url);
        let response: AutocompleteResponsePayload =
            self.post_json(&url, &body, AUTOCOMPLETE_FIELD_MASK)?;

        // The API has no page size for autocomplete; trim locally.
        let suggestions = response
            .suggestions
            .into_iter()
            .filter_map(SuggestionPayload::into_suggestion)
            .take(limit as usize)
            .collect();

        Ok(AutocompleteResponse { suggestions })
    }

    /// Full details for one place.
    #[instrument(skip_all, fields(place_id = %request.place_id))]
    pub fn details(&self, request: DetailsRequest) -> Result<PlaceDetails, Error> {
        let place_id = request.place_id.trim();
        if place_id.is_empty() {
            return Err(ValidationError::required("place_id").into());
        }

        let url = format!("{}/places/{}", self.config.base_url, place_id);
        let query = locale_query(&request.locale);
        let mask = details_field_mask(&request);
        let place: PlacePayload = self.get_json(&url, &query, Some(&mask))?;

        Ok(PlaceDetails::from(place))
    }

    /// Resolves a photo resource name to a short-lived media URI.
    #[instrument(skip_all, fields(name = %request.name))]
    pub fn photo_media(&self, request: PhotoMediaRequest) -> Result<PhotoMediaResponse, Error> {
        validate_photo(&request)?;

        let url = format!("{}/{}/media", self.config.base_url, request.name.trim());
        let mut query = vec![("skipHttpRedirect", "true".to_string())];
        if let Some(width) = request.max_width_px {
            query.push(("maxWidthPx", width.to_string()));
        }
        if let Some(height) = request.max_height_px {
            query.push(("maxHeightPx", height.to_string()));
        }
        let media: PhotoMediaPayload = self.get_json(&url, &query, None)?;

        Ok(media.into())
    }

    /// Turns a free-form location string into candidate places.
    #[instrument(skip_all)]
    pub fn resolve(
        &self,
        request: LocationResolveRequest,
    ) -> Result<LocationResolveResponse, Error> {
        let limit = request.limit.unwrap_or(DEFAULT_RESOLVE_LIMIT);
        if request.location_text.trim().is_empty() {
            return Err(ValidationError::required("location_text").into());
        }
        check_limit(limit, MAX_RESOLVE_LIMIT)?;

        let body = SearchTextBody::for_resolve(&request.location_text, limit, &request.locale);
        let url = format!("{}/places:searchText", self.config.base_url);
        let response: SearchResponsePayload = self.post_json(&url, &body, RESOLVE_FIELD_MASK)?;

        Ok(LocationResolveResponse {
            results: response
                .places
                .into_iter()
                .map(ResolvedLocation::from)
                .collect(),
        })
    }

    /// Searches for places along the route between two locations.
    #[instrument(skip_all)]
    pub fn route(&self, request: RouteRequest) -> Result<RouteResponse, Error> {
        search_along_route(request, self, self)
    }

    /// Encoded polylines for the routes between `origin` and `destination`.
    pub fn compute_route_paths(
        &self,
        origin: &str,
        destination: &str,
        mode: TravelMode,
        locale: &Locale,
    ) -> Result<Vec<String>, Error> {
        let body = ComputeRoutesBody::new(origin, destination, mode, locale);
        let url = format!("{}{}", self.config.routes_base_url, ROUTES_PATH);
        let response: RoutesResponsePayload = self.post_json(&url, &body, ROUTES_FIELD_MASK)?;
        debug!(routes = response.routes.len(), %mode, "routes computed");
        Ok(response.into_encoded_paths())
    }

    fn post_json<B, T>(&self, url: &str, body: &B, field_mask: &str) -> Result<T, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload = self.execute(self.client.post(url).json(body), Some(field_mask))?;
        Ok(serde_json::from_slice(&payload)?)
    }

    fn get_json<T>(
        &self,
        url: &str,
        query: &[(&str, String)],
        field_mask: Option<&str>,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let payload = self.execute(self.client.get(url).query(query), field_mask)?;
        Ok(serde_json::from_slice(&payload)?)
    }

    fn execute(&self, request: RequestBuilder, field_mask: Option<&str>) -> Result<Vec<u8>, Error> {
        let api_key = self.config.api_key.trim();
        if api_key.is_empty() {
            return Err(Error::MissingApiKey);
        }

        let mut request = request
            .header(CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, api_key);
        if let Some(mask) = field_mask {
            request = request.header(FIELD_MASK_HEADER, mask);
        }

        let response = request.send()?;
        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "response received");

        let mut payload = Vec::new();
        response.take(MAX_RESPONSE_BYTES).read_to_end(&mut payload)?;

        if status.is_client_error() || status.is_server_error() {
            return Err(Error::Api {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&payload).trim().to_string(),
            });
        }
        if payload.is_empty() {
            return Err(Error::EmptyResponse);
        }

        Ok(payload)
    }
}

impl RoutePathProvider for Client {
    fn encoded_paths(
        &self,
        origin: &str,
        destination: &str,
        mode: TravelMode,
        locale: &Locale,
    ) -> Result<Vec<String>, Error> {
        self.compute_route_paths(origin, destination, mode, locale)
    }
}

impl PlaceSearcher for Client {
    fn search_near(
        &self,
        query: &str,
        bias: LocationBias,
        limit: u32,
        locale: &Locale,
    ) -> Result<Vec<PlaceSummary>, Error> {
        let response = self.search(SearchRequest {
            query: query.to_string(),
            location_bias: Some(bias),
            limit: Some(limit),
            locale: locale.clone(),
            ..SearchRequest::default()
        })?;
        Ok(response.results)
    }
}

fn normalize_base(value: &str, fallback: &str) -> String {
    let trimmed = value.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn locale_query(locale: &Locale) -> Vec<(&'static str, String)> {
    let locale = Locale::new(locale.language.as_deref(), locale.region.as_deref());
    let mut query = Vec::new();
    if let Some(language) = locale.language {
        query.push(("languageCode", language));
    }
    if let Some(region) = locale.region {
        query.push(("regionCode", region));
    }
    query
}

/// Reviews and photos are heavy; they are only requested on opt-in.
pub fn details_field_mask(request: &DetailsRequest) -> String {
    let mut mask = DETAILS_FIELD_MASK.to_string();
    if request.include_reviews {
        mask.push_str(",reviews");
    }
    if request.include_photos {
        mask.push_str(",photos");
    }
    mask
}

fn check_limit(limit: u32, max: u32) -> Result<(), ValidationError> {
    if !(1..=max).contains(&limit) {
        return Err(ValidationError::new("limit", format!("must be 1-{}", max)));
    }
    Ok(())
}

fn validate_search(request: &SearchRequest, limit: u32) -> Result<(), ValidationError> {
    if request.query.trim().is_empty() {
        return Err(ValidationError::required("query"));
    }
    check_limit(limit, MAX_SEARCH_LIMIT)?;

    if let Some(filters) = &request.filters {
        if let Some(rating) = filters.min_rating {
            if !(0.0..=5.0).contains(&rating) {
                return Err(ValidationError::new("filters.min_rating", "must be 0-5"));
            }
        }
        if filters.price_levels.iter().any(|level| *level > MAX_PRICE_LEVEL) {
            return Err(ValidationError::new("filters.price_levels", "must be 0-4"));
        }
    }

    if let Some(bias) = &request.location_bias {
        bias.validate()?;
    }
    Ok(())
}

fn validate_photo(request: &PhotoMediaRequest) -> Result<(), ValidationError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(ValidationError::required("name"));
    }
    if !name.starts_with("places/") || !name.contains("/photos/") {
        return Err(ValidationError::new(
            "name",
            "must look like places/<place_id>/photos/<photo_ref>",
        ));
    }
    if request.max_width_px.is_none() && request.max_height_px.is_none() {
        return Err(ValidationError::new(
            "max_width_px",
            "max width or max height required",
        ));
    }
    for (field, value) in [
        ("max_width_px", request.max_width_px),
        ("max_height_px", request.max_height_px),
    ] {
        if let Some(px) = value {
            if !(1..=MAX_PHOTO_PX).contains(&px) {
                return Err(ValidationError::new(field, format!("must be 1-{}", MAX_PHOTO_PX)));
            }
        }
    }
    Ok(())
}

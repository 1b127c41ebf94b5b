//! Wire payloads for the Places and Routes APIs, and their mapping onto the
//! public models in [`crate::types`].
//!
//! Request bodies serialize camelCase and omit unset fields. Response
//! payloads tolerate any missing field.

use serde::{Deserialize, Serialize};

use crate::price_level::{enum_to_price_level, price_level_to_enum};
use crate::route::TravelMode;
use crate::types::{
    AuthorAttribution, AutocompleteRequest, AutocompleteSuggestion, LatLng, LocalizedText,
    Locale, LocationBias, Photo, PhotoMediaResponse, PlaceDetails, PlaceSummary,
    ResolvedLocation, Review, ReviewVisitDate, SearchRequest, SuggestionKind,
};

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub(crate) struct LatLngPayload {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

impl From<LatLngPayload> for LatLng {
    fn from(payload: LatLngPayload) -> Self {
        LatLng::new(payload.latitude, payload.longitude)
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CirclePayload {
    circle: Circle,
}

#[derive(Debug, Clone, Serialize)]
struct Circle {
    center: LatLngPayload,
    radius: f64,
}

impl From<&LocationBias> for CirclePayload {
    fn from(bias: &LocationBias) -> Self {
        Self {
            circle: Circle {
                center: LatLngPayload {
                    latitude: bias.lat,
                    longitude: bias.lng,
                },
                radius: bias.radius_m,
            },
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LocaleFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    language_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    region_code: Option<String>,
}

impl From<&Locale> for LocaleFields {
    fn from(locale: &Locale) -> Self {
        let normalized = Locale::new(locale.language.as_deref(), locale.region.as_deref());
        Self {
            language_code: normalized.language,
            region_code: normalized.region,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchTextBody {
    text_query: String,
    page_size: u32,
    #[serde(flatten)]
    locale: LocaleFields,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    location_bias: Option<CirclePayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    included_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    open_now: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_rating: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    price_levels: Vec<&'static str>,
}

impl SearchTextBody {
    pub fn from_request(request: &SearchRequest, limit: u32) -> Self {
        let mut text_query = request.query.trim().to_string();
        let filters = request.filters.clone().unwrap_or_default();
        let keyword = filters
            .keyword
            .as_deref()
            .map(str::trim)
            .filter(|keyword| !keyword.is_empty());
        if let Some(keyword) = keyword {
            // The API takes a single text query, so keywords are appended.
            text_query = format!("{} {}", text_query, keyword).trim().to_string();
        }

        Self {
            text_query,
            page_size: limit,
            locale: LocaleFields::from(&request.locale),
            page_token: request
                .page_token
                .clone()
                .filter(|token| !token.trim().is_empty()),
            location_bias: request.location_bias.as_ref().map(CirclePayload::from),
            // Only one includedType is accepted; the first wins.
            included_type: filters.types.first().cloned(),
            open_now: filters.open_now,
            min_rating: filters.min_rating,
            price_levels: filters
                .price_levels
                .iter()
                .filter_map(|level| price_level_to_enum(*level))
                .collect(),
        }
    }

    /// Body for resolving a location string: plain text query, no filters.
    pub fn for_resolve(location_text: &str, limit: u32, locale: &Locale) -> Self {
        Self {
            text_query: location_text.trim().to_string(),
            page_size: limit,
            locale: LocaleFields::from(locale),
            page_token: None,
            location_bias: None,
            included_type: None,
            open_now: None,
            min_rating: None,
            price_levels: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchNearbyBody {
    pub location_restriction: CirclePayload,
    pub max_result_count: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub included_types: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub excluded_types: Vec<String>,
    #[serde(flatten)]
    pub locale: LocaleFields,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AutocompleteBody {
    input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_token: Option<String>,
    #[serde(flatten)]
    locale: LocaleFields,
    #[serde(skip_serializing_if = "Option::is_none")]
    location_bias: Option<CirclePayload>,
}

impl From<&AutocompleteRequest> for AutocompleteBody {
    fn from(request: &AutocompleteRequest) -> Self {
        Self {
            input: request.input.trim().to_string(),
            session_token: request
                .session_token
                .as_deref()
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(str::to_string),
            locale: LocaleFields::from(&request.locale),
            location_bias: request.location_bias.as_ref().map(CirclePayload::from),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct AddressWaypoint {
    address: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ComputeRoutesBody {
    origin: AddressWaypoint,
    destination: AddressWaypoint,
    travel_mode: TravelMode,
    polyline_quality: &'static str,
    polyline_encoding: &'static str,
    #[serde(flatten)]
    locale: LocaleFields,
}

impl ComputeRoutesBody {
    pub fn new(origin: &str, destination: &str, mode: TravelMode, locale: &Locale) -> Self {
        Self {
            origin: AddressWaypoint {
                address: origin.to_string(),
            },
            destination: AddressWaypoint {
                address: destination.to_string(),
            },
            travel_mode: mode,
            polyline_quality: "OVERVIEW",
            polyline_encoding: "ENCODED_POLYLINE",
            locale: LocaleFields::from(locale),
        }
    }
}

// ---------------------------------------------------------------------------
// Response payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchResponsePayload {
    #[serde(default)]
    pub places: Vec<PlacePayload>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct PlacePayload {
    pub id: String,
    pub display_name: Option<TextPayload>,
    pub formatted_address: String,
    pub location: Option<LatLngPayload>,
    pub rating: Option<f64>,
    pub price_level: Option<String>,
    pub types: Vec<String>,
    pub current_opening_hours: Option<OpeningHoursPayload>,
    pub regular_opening_hours: Option<OpeningHoursPayload>,
    pub national_phone_number: String,
    pub website_uri: String,
    pub reviews: Vec<ReviewPayload>,
    pub photos: Vec<PhotoPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct TextPayload {
    pub text: String,
    pub language_code: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct OpeningHoursPayload {
    pub open_now: Option<bool>,
    pub weekday_descriptions: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ReviewPayload {
    pub name: String,
    pub relative_publish_time_description: String,
    pub text: Option<TextPayload>,
    pub original_text: Option<TextPayload>,
    pub rating: Option<f64>,
    pub author_attribution: Option<AuthorPayload>,
    pub publish_time: String,
    pub flag_content_uri: String,
    pub google_maps_uri: String,
    pub visit_date: Option<VisitDatePayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct AuthorPayload {
    pub display_name: String,
    pub uri: String,
    pub photo_uri: String,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub(crate) struct VisitDatePayload {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct PhotoPayload {
    pub name: String,
    pub width_px: Option<u32>,
    pub height_px: Option<u32>,
    pub author_attributions: Vec<AuthorPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AutocompleteResponsePayload {
    pub suggestions: Vec<SuggestionPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct SuggestionPayload {
    pub place_prediction: Option<PlacePredictionPayload>,
    pub query_prediction: Option<QueryPredictionPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct PlacePredictionPayload {
    pub place_id: String,
    pub place: String,
    pub text: Option<TextPayload>,
    pub structured_format: Option<StructuredFormatPayload>,
    pub types: Vec<String>,
    pub distance_meters: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct QueryPredictionPayload {
    pub text: Option<TextPayload>,
    pub structured_format: Option<StructuredFormatPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct StructuredFormatPayload {
    pub main_text: Option<TextPayload>,
    pub secondary_text: Option<TextPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RoutesResponsePayload {
    pub routes: Vec<RoutePayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RoutePayload {
    pub polyline: Option<RoutePolylinePayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct RoutePolylinePayload {
    pub encoded_polyline: String,
}

impl RoutesResponsePayload {
    /// Encoded polylines in response order; routes without geometry map to "".
    pub fn into_encoded_paths(self) -> Vec<String> {
        self.routes
            .into_iter()
            .map(|route| route.polyline.map(|p| p.encoded_polyline).unwrap_or_default())
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct PhotoMediaPayload {
    pub name: String,
    pub photo_uri: String,
}

impl From<PhotoMediaPayload> for PhotoMediaResponse {
    fn from(payload: PhotoMediaPayload) -> Self {
        Self {
            name: payload.name,
            photo_uri: payload.photo_uri,
        }
    }
}

// ---------------------------------------------------------------------------
// Mapping
// ---------------------------------------------------------------------------

fn text_of(payload: Option<TextPayload>) -> String {
    payload.map(|t| t.text).unwrap_or_default()
}

fn price_tier(value: Option<&str>) -> Option<u8> {
    value.and_then(enum_to_price_level)
}

impl From<PlacePayload> for PlaceSummary {
    fn from(place: PlacePayload) -> Self {
        Self {
            place_id: place.id,
            name: text_of(place.display_name),
            address: place.formatted_address,
            location: place.location.map(LatLng::from),
            rating: place.rating,
            price_level: price_tier(place.price_level.as_deref()),
            types: place.types,
            open_now: place.current_opening_hours.and_then(|h| h.open_now),
        }
    }
}

impl From<PlacePayload> for PlaceDetails {
    fn from(place: PlacePayload) -> Self {
        Self {
            place_id: place.id,
            name: text_of(place.display_name),
            address: place.formatted_address,
            location: place.location.map(LatLng::from),
            rating: place.rating,
            price_level: price_tier(place.price_level.as_deref()),
            types: place.types,
            phone: place.national_phone_number,
            website: place.website_uri,
            hours: place
                .regular_opening_hours
                .map(|h| h.weekday_descriptions)
                .unwrap_or_default(),
            open_now: place.current_opening_hours.and_then(|h| h.open_now),
            reviews: place.reviews.into_iter().map(Review::from).collect(),
            photos: place.photos.into_iter().map(Photo::from).collect(),
        }
    }
}

impl From<PlacePayload> for ResolvedLocation {
    fn from(place: PlacePayload) -> Self {
        Self {
            place_id: place.id,
            name: text_of(place.display_name),
            address: place.formatted_address,
            location: place.location.map(LatLng::from),
            types: place.types,
        }
    }
}

impl From<ReviewPayload> for Review {
    fn from(review: ReviewPayload) -> Self {
        Self {
            name: review.name,
            relative_publish_time_description: review.relative_publish_time_description,
            text: localized_text(review.text),
            original_text: localized_text(review.original_text),
            rating: review.rating,
            author: author(review.author_attribution),
            publish_time: review.publish_time,
            flag_content_uri: review.flag_content_uri,
            google_maps_uri: review.google_maps_uri,
            visit_date: visit_date(review.visit_date),
        }
    }
}

impl From<PhotoPayload> for Photo {
    fn from(photo: PhotoPayload) -> Self {
        Self {
            name: photo.name,
            width_px: photo.width_px,
            height_px: photo.height_px,
            authors: photo
                .author_attributions
                .into_iter()
                .filter_map(|a| author(Some(a)))
                .collect(),
        }
    }
}

/// Empty text blocks are dropped rather than emitted as `{}`.
fn localized_text(payload: Option<TextPayload>) -> Option<LocalizedText> {
    let text = payload?;
    if text.text.trim().is_empty() && text.language_code.trim().is_empty() {
        return None;
    }
    Some(LocalizedText {
        text: text.text,
        language_code: text.language_code,
    })
}

fn author(payload: Option<AuthorPayload>) -> Option<AuthorAttribution> {
    let author = payload?;
    if author.display_name.trim().is_empty()
        && author.uri.trim().is_empty()
        && author.photo_uri.trim().is_empty()
    {
        return None;
    }
    Some(AuthorAttribution {
        display_name: author.display_name,
        uri: author.uri,
        photo_uri: author.photo_uri,
    })
}

/// An all-zero visit date means "not provided".
fn visit_date(payload: Option<VisitDatePayload>) -> Option<ReviewVisitDate> {
    let date = payload?;
    if date.year == 0 && date.month == 0 && date.day == 0 {
        return None;
    }
    Some(ReviewVisitDate {
        year: date.year,
        month: date.month,
        day: date.day,
    })
}

impl SuggestionPayload {
    /// Place predictions win over query predictions; empty suggestions map to `None`.
    pub fn into_suggestion(self) -> Option<AutocompleteSuggestion> {
        if let Some(prediction) = self.place_prediction {
            let (main_text, secondary_text) = structured_texts(prediction.structured_format);
            return Some(AutocompleteSuggestion {
                kind: SuggestionKind::Place,
                place_id: prediction.place_id,
                place: prediction.place,
                text: text_of(prediction.text),
                main_text,
                secondary_text,
                types: prediction.types,
                distance_meters: prediction.distance_meters,
            });
        }
        let prediction = self.query_prediction?;
        let (main_text, secondary_text) = structured_texts(prediction.structured_format);
        Some(AutocompleteSuggestion {
            kind: SuggestionKind::Query,
            place_id: String::new(),
            place: String::new(),
            text: text_of(prediction.text),
            main_text,
            secondary_text,
            types: Vec::new(),
            distance_meters: None,
        })
    }
}

fn structured_texts(payload: Option<StructuredFormatPayload>) -> (String, String) {
    match payload {
        Some(format) => (text_of(format.main_text), text_of(format.secondary_text)),
        None => (String::new(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::Filters;

    #[test]
    fn test_search_body_full() {
        let request = SearchRequest {
            query: "pizza".to_string(),
            filters: Some(Filters {
                keyword: Some("vegan".to_string()),
                types: vec!["restaurant".to_string(), "cafe".to_string()],
                open_now: Some(true),
                min_rating: Some(4.0),
                price_levels: vec![1, 2],
            }),
            location_bias: Some(LocationBias {
                lat: 40.0,
                lng: -70.0,
                radius_m: 250.0,
            }),
            page_token: Some("next".to_string()),
            locale: Locale::new(Some("en"), Some("US")),
            ..SearchRequest::default()
        };

        let body = serde_json::to_value(SearchTextBody::from_request(&request, 7)).unwrap();
        assert_eq!(
            body,
            json!({
                "textQuery": "pizza vegan",
                "pageSize": 7,
                "languageCode": "en",
                "regionCode": "US",
                "pageToken": "next",
                "locationBias": {
                    "circle": {
                        "center": { "latitude": 40.0, "longitude": -70.0 },
                        "radius": 250.0
                    }
                },
                "includedType": "restaurant",
                "openNow": true,
                "minRating": 4.0,
                "priceLevels": ["PRICE_LEVEL_INEXPENSIVE", "PRICE_LEVEL_MODERATE"]
            })
        );
    }

    #[test]
    fn test_search_body_omits_empty_fields() {
        let request = SearchRequest {
            query: "coffee".to_string(),
            filters: Some(Filters {
                keyword: Some("  ".to_string()),
                ..Filters::default()
            }),
            page_token: Some(" ".to_string()),
            ..SearchRequest::default()
        };
        let body = serde_json::to_value(SearchTextBody::from_request(&request, 10)).unwrap();
        assert_eq!(body, json!({ "textQuery": "coffee", "pageSize": 10 }));
    }

    #[test]
    fn test_compute_routes_body() {
        let body = ComputeRoutesBody::new(
            "Seattle",
            "Portland",
            TravelMode::Bicycle,
            &Locale::new(Some("de"), None),
        );
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            json!({
                "origin": { "address": "Seattle" },
                "destination": { "address": "Portland" },
                "travelMode": "BICYCLE",
                "polylineQuality": "OVERVIEW",
                "polylineEncoding": "ENCODED_POLYLINE",
                "languageCode": "de"
            })
        );
    }

    #[test]
    fn test_place_summary_mapping() {
        let payload: PlacePayload = serde_json::from_value(json!({
            "id": "abc",
            "displayName": { "text": "Cafe" },
            "formattedAddress": "1 Main St",
            "location": { "latitude": 1.5, "longitude": 2.5 },
            "rating": 4.6,
            "priceLevel": "PRICE_LEVEL_EXPENSIVE",
            "types": ["cafe"],
            "currentOpeningHours": { "openNow": false }
        }))
        .unwrap();

        let place = PlaceSummary::from(payload);
        assert_eq!(place.place_id, "abc");
        assert_eq!(place.name, "Cafe");
        assert_eq!(place.address, "1 Main St");
        assert_eq!(place.location, Some(LatLng::new(1.5, 2.5)));
        assert_eq!(place.price_level, Some(3));
        assert_eq!(place.open_now, Some(false));
    }

    #[test]
    fn test_unknown_price_level_dropped() {
        let payload: PlacePayload = serde_json::from_value(json!({
            "id": "x",
            "priceLevel": "PRICE_LEVEL_UNSPECIFIED"
        }))
        .unwrap();
        assert_eq!(PlaceSummary::from(payload).price_level, None);
    }

    #[test]
    fn test_review_mapping_drops_empty_blocks() {
        let payload: ReviewPayload = serde_json::from_value(json!({
            "rating": 5.0,
            "text": { "text": "", "languageCode": "" },
            "originalText": { "text": "Great", "languageCode": "en" },
            "authorAttribution": { "displayName": "" },
            "visitDate": { "year": 0, "month": 0, "day": 0 }
        }))
        .unwrap();

        let review = Review::from(payload);
        assert_eq!(review.text, None);
        assert_eq!(review.original_text.unwrap().text, "Great");
        assert_eq!(review.author, None);
        assert_eq!(review.visit_date, None);
    }

    #[test]
    fn test_details_mapping() {
        let payload: PlacePayload = serde_json::from_value(json!({
            "id": "place-1",
            "nationalPhoneNumber": "+1 555",
            "websiteUri": "https://example.com",
            "regularOpeningHours": { "weekdayDescriptions": ["Mon: 9-5"] },
            "photos": [{
                "name": "places/place-1/photos/p1",
                "widthPx": 800,
                "heightPx": 600,
                "authorAttributions": [{ "displayName": "Ann" }, {}]
            }],
            "reviews": [{ "visitDate": { "year": 2024, "month": 5 } }]
        }))
        .unwrap();

        let details = PlaceDetails::from(payload);
        assert_eq!(details.phone, "+1 555");
        assert_eq!(details.hours, vec!["Mon: 9-5".to_string()]);
        assert_eq!(details.photos.len(), 1);
        assert_eq!(details.photos[0].authors.len(), 1);
        assert_eq!(
            details.reviews[0].visit_date,
            Some(ReviewVisitDate {
                year: 2024,
                month: 5,
                day: 0
            })
        );
    }

    #[test]
    fn test_autocomplete_mapping() {
        let payload: AutocompleteResponsePayload = serde_json::from_value(json!({
            "suggestions": [
                {
                    "placePrediction": {
                        "placeId": "p1",
                        "place": "places/p1",
                        "text": { "text": "Cafe Nero, Main St" },
                        "structuredFormat": {
                            "mainText": { "text": "Cafe Nero" },
                            "secondaryText": { "text": "Main St" }
                        },
                        "types": ["cafe"],
                        "distanceMeters": 120
                    }
                },
                { "queryPrediction": { "text": { "text": "cafes near me" } } },
                {}
            ]
        }))
        .unwrap();

        let suggestions: Vec<_> = payload
            .suggestions
            .into_iter()
            .filter_map(SuggestionPayload::into_suggestion)
            .collect();
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].kind, SuggestionKind::Place);
        assert_eq!(suggestions[0].main_text, "Cafe Nero");
        assert_eq!(suggestions[0].secondary_text, "Main St");
        assert_eq!(suggestions[0].distance_meters, Some(120));
        assert_eq!(suggestions[1].kind, SuggestionKind::Query);
        assert_eq!(suggestions[1].text, "cafes near me");
    }

    #[test]
    fn test_routes_payload_paths() {
        let payload: RoutesResponsePayload = serde_json::from_value(json!({
            "routes": [
                { "polyline": { "encodedPolyline": "abc" } },
                {}
            ]
        }))
        .unwrap();
        assert_eq!(payload.into_encoded_paths(), vec!["abc".to_string(), String::new()]);

        let empty: RoutesResponsePayload = serde_json::from_value(json!({})).unwrap();
        assert!(empty.into_encoded_paths().is_empty());
    }
}

//! Canned Places and Routes API payloads.
//!
//! The polyline below is the reference route from the encoded polyline
//! format documentation; it decodes to three points along the US west coast.

use serde_json::{Value, json};

use places_route::types::LatLng;

/// Decodes to [`REFERENCE_POINTS`].
pub const REFERENCE_POLYLINE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

pub const REFERENCE_POINTS: [LatLng; 3] = [
    LatLng::new(38.5, -120.2),
    LatLng::new(40.7, -120.95),
    LatLng::new(43.252, -126.453),
];

pub const TEST_API_KEY: &str = "test-key";

pub fn place(id: &str, name: &str, lat: f64, lng: f64) -> Value {
    json!({
        "id": id,
        "displayName": { "text": name, "languageCode": "en" },
        "formattedAddress": format!("{} Main St", id),
        "location": { "latitude": lat, "longitude": lng },
        "rating": 4.5,
        "priceLevel": "PRICE_LEVEL_MODERATE",
        "types": ["cafe", "food"],
        "currentOpeningHours": { "openNow": true }
    })
}

pub fn search_response(places: Vec<Value>, next_page_token: Option<&str>) -> Value {
    let mut body = json!({ "places": places });
    if let Some(token) = next_page_token {
        body["nextPageToken"] = json!(token);
    }
    body
}

pub fn details_response() -> Value {
    json!({
        "id": "place-1",
        "displayName": { "text": "Blue Bottle" },
        "formattedAddress": "1 Main St, Oakland",
        "location": { "latitude": 37.8, "longitude": -122.27 },
        "rating": 4.7,
        "priceLevel": "PRICE_LEVEL_INEXPENSIVE",
        "types": ["cafe"],
        "nationalPhoneNumber": "(510) 555-0100",
        "websiteUri": "https://example.com",
        "regularOpeningHours": {
            "weekdayDescriptions": ["Monday: 7:00 AM – 5:00 PM"]
        },
        "currentOpeningHours": { "openNow": false },
        "reviews": [
            {
                "name": "places/place-1/reviews/r1",
                "relativePublishTimeDescription": "a month ago",
                "rating": 5,
                "text": { "text": "Great pour over.", "languageCode": "en" },
                "authorAttribution": { "displayName": "Sam" },
                "publishTime": "2025-01-02T03:04:05Z",
                "visitDate": { "year": 2024, "month": 12, "day": 30 }
            }
        ],
        "photos": [
            {
                "name": "places/place-1/photos/ph1",
                "widthPx": 1200,
                "heightPx": 800,
                "authorAttributions": [{ "displayName": "Sam" }]
            }
        ]
    })
}

pub fn autocomplete_response() -> Value {
    json!({
        "suggestions": [
            {
                "placePrediction": {
                    "placeId": "p1",
                    "place": "places/p1",
                    "text": { "text": "Cafe One, Main St" },
                    "structuredFormat": {
                        "mainText": { "text": "Cafe One" },
                        "secondaryText": { "text": "Main St" }
                    },
                    "types": ["cafe"],
                    "distanceMeters": 250
                }
            },
            {
                "queryPrediction": {
                    "text": { "text": "cafes open late" }
                }
            },
            {
                "placePrediction": {
                    "placeId": "p2",
                    "place": "places/p2",
                    "text": { "text": "Cafe Two" }
                }
            }
        ]
    })
}

pub fn routes_response(polylines: &[&str]) -> Value {
    let routes: Vec<Value> = polylines
        .iter()
        .map(|encoded| json!({ "polyline": { "encodedPolyline": encoded } }))
        .collect();
    json!({ "routes": routes })
}

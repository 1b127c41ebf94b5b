//! Human-readable rendering of results.

use std::collections::BTreeSet;
use std::fmt::Write;

use crate::cli::color::Color;
use crate::route::RouteResponse;
use crate::types::{
    AutocompleteResponse, LatLng, LocationResolveResponse, Photo, PhotoMediaResponse,
    PlaceDetails, PlaceSummary, Review, SearchResponse, SuggestionKind,
};

const NO_RESULTS: &str = "No results.";
const MAX_REVIEWS: usize = 3;
const MAX_REVIEW_CHARS: usize = 200;

pub fn render_search(color: Color, response: &SearchResponse) -> String {
    render_places(color, "Results", &response.results, response.next_page_token.as_deref())
}

pub fn render_nearby(color: Color, response: &SearchResponse) -> String {
    render_places(color, "Nearby", &response.results, response.next_page_token.as_deref())
}

fn render_places(
    color: Color,
    heading: &str,
    places: &[PlaceSummary],
    next_page_token: Option<&str>,
) -> String {
    if places.is_empty() {
        return NO_RESULTS.to_string();
    }
    let mut out = String::new();
    out.push_str(&color.bold(&format!("{} ({})", heading, places.len())));
    out.push('\n');

    for (i, place) in places.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, format_title(color, &place.name, &place.address));
        write_place_summary(&mut out, color, place, "");
        if i + 1 < places.len() {
            out.push('\n');
        }
    }

    if let Some(token) = next_page_token.filter(|t| !t.trim().is_empty()) {
        out.push('\n');
        let _ = writeln!(out, "{} {}", color.dim("Next page token:"), token);
    }
    out
}

pub fn render_autocomplete(color: Color, response: &AutocompleteResponse) -> String {
    if response.suggestions.is_empty() {
        return NO_RESULTS.to_string();
    }
    let mut out = String::new();
    out.push_str(&color.bold(&format!("Suggestions ({})", response.suggestions.len())));
    out.push('\n');

    for (i, suggestion) in response.suggestions.iter().enumerate() {
        let title = if suggestion.main_text.trim().is_empty() {
            suggestion.text.as_str()
        } else {
            suggestion.main_text.as_str()
        };
        let kind = match suggestion.kind {
            SuggestionKind::Place => "place",
            SuggestionKind::Query => "query",
        };
        let _ = writeln!(
            out,
            "{}. {} {}",
            i + 1,
            format_title(color, title, &suggestion.secondary_text),
            color.dim(&format!("[{}]", kind))
        );
        write_line(&mut out, color, "", "Place ID", &suggestion.place_id);
        if let Some(distance) = suggestion.distance_meters {
            write_line(&mut out, color, "", "Distance", &format!("{} m", distance));
        }
        write_types(&mut out, color, "", &suggestion.types);
    }
    out
}

pub fn render_details(color: Color, place: &PlaceDetails) -> String {
    let mut out = String::new();
    out.push_str(&color.bold(&format_title(color, &place.name, &place.address)));
    out.push('\n');

    write_line(&mut out, color, "", "ID", &place.place_id);
    write_location(&mut out, color, "", place.location);
    write_rating(&mut out, color, "", place.rating, place.price_level);
    write_types(&mut out, color, "", &place.types);
    write_open_now(&mut out, color, "", place.open_now);
    write_line(&mut out, color, "", "Phone", &place.phone);
    write_line(&mut out, color, "", "Website", &place.website);
    write_reviews(&mut out, color, &place.reviews);
    write_photos(&mut out, color, &place.photos);
    if !place.hours.is_empty() {
        out.push_str(&color.dim("Hours:"));
        out.push('\n');
        for entry in &place.hours {
            let _ = writeln!(out, "  - {}", entry);
        }
    }
    out
}

pub fn render_resolve(color: Color, response: &LocationResolveResponse) -> String {
    if response.results.is_empty() {
        return NO_RESULTS.to_string();
    }
    let mut out = String::new();
    out.push_str(&color.bold(&format!("Resolved ({})", response.results.len())));
    out.push('\n');

    for (i, place) in response.results.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, format_title(color, &place.name, &place.address));
        write_line(&mut out, color, "", "ID", &place.place_id);
        write_location(&mut out, color, "", place.location);
        write_types(&mut out, color, "", &place.types);
        if i + 1 < response.results.len() {
            out.push('\n');
        }
    }
    out
}

pub fn render_photo(color: Color, photo: &PhotoMediaResponse) -> String {
    let mut out = String::new();
    write_line(&mut out, color, "", "Photo", &photo.name);
    write_line(&mut out, color, "", "URL", &photo.photo_uri);
    out
}

pub fn render_route(color: Color, response: &RouteResponse) -> String {
    if response.waypoints.is_empty() {
        return NO_RESULTS.to_string();
    }
    let mut out = String::new();
    out.push_str(&color.bold(&format!("Route waypoints ({})", response.waypoints.len())));
    out.push('\n');

    for (i, waypoint) in response.waypoints.iter().enumerate() {
        out.push('\n');
        let heading = format!(
            "Waypoint {}: {:.6}, {:.6}",
            i + 1,
            waypoint.location.lat,
            waypoint.location.lng
        );
        out.push_str(&color.bold(&heading));
        out.push('\n');

        if waypoint.results.is_empty() {
            let _ = writeln!(out, "   {}", NO_RESULTS);
            continue;
        }
        for (j, place) in waypoint.results.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {}. {}",
                j + 1,
                format_title(color, &place.name, &place.address)
            );
            write_place_summary(&mut out, color, place, "     ");
        }
    }
    out
}

pub fn format_title(color: Color, name: &str, address: &str) -> String {
    let display = match name.trim() {
        "" => "(no name)",
        trimmed => trimmed,
    };
    if address.trim().is_empty() {
        return color.cyan(display);
    }
    format!("{} — {}", color.cyan(display), address)
}

fn write_place_summary(out: &mut String, color: Color, place: &PlaceSummary, indent: &str) {
    write_line(out, color, indent, "ID", &place.place_id);
    write_location(out, color, indent, place.location);
    write_rating(out, color, indent, place.rating, place.price_level);
    write_types(out, color, indent, &place.types);
    write_open_now(out, color, indent, place.open_now);
}

fn write_location(out: &mut String, color: Color, indent: &str, location: Option<LatLng>) {
    if let Some(loc) = location {
        let value = format!("{:.6}, {:.6}", loc.lat, loc.lng);
        write_line(out, color, indent, "Location", &value);
    }
}

fn write_rating(
    out: &mut String,
    color: Color,
    indent: &str,
    rating: Option<f64>,
    price_level: Option<u8>,
) {
    let mut parts = Vec::with_capacity(2);
    if let Some(rating) = rating {
        parts.push(format!("{:.1}", rating));
    }
    if let Some(level) = price_level {
        parts.push(format!("${}", level));
    }
    write_line(out, color, indent, "Rating", &parts.join(" · "));
}

fn write_types(out: &mut String, color: Color, indent: &str, types: &[String]) {
    let unique = unique_strings(types);
    write_line(out, color, indent, "Types", &unique.join(", "));
}

fn write_open_now(out: &mut String, color: Color, indent: &str, open_now: Option<bool>) {
    match open_now {
        Some(true) => write_line(out, color, indent, "Open now", &color.green("yes")),
        Some(false) => write_line(out, color, indent, "Open now", &color.yellow("no")),
        None => {}
    }
}

fn write_reviews(out: &mut String, color: Color, reviews: &[Review]) {
    if reviews.is_empty() {
        return;
    }
    out.push_str(&color.dim("Reviews:"));
    out.push('\n');

    for review in reviews.iter().take(MAX_REVIEWS) {
        let line = review_line(review);
        if !line.is_empty() {
            let _ = writeln!(out, "  - {}", line);
        }
    }
    if reviews.len() > MAX_REVIEWS {
        out.push_str(&color.dim(&format!("  ... {} more", reviews.len() - MAX_REVIEWS)));
        out.push('\n');
    }
}

fn write_photos(out: &mut String, color: Color, photos: &[Photo]) {
    if photos.is_empty() {
        return;
    }
    out.push_str(&color.dim("Photos:"));
    out.push('\n');
    for photo in photos {
        match (photo.width_px, photo.height_px) {
            (Some(w), Some(h)) => {
                let _ = writeln!(out, "  - {} ({}x{})", photo.name, w, h);
            }
            _ => {
                let _ = writeln!(out, "  - {}", photo.name);
            }
        }
    }
}

/// Writes `label: value`, skipping blank values.
pub fn write_line(out: &mut String, color: Color, indent: &str, label: &str, value: &str) {
    if value.trim().is_empty() {
        return;
    }
    let _ = writeln!(out, "{}{} {}", indent, color.dim(&format!("{}:", label)), value);
}

fn review_line(review: &Review) -> String {
    let mut parts = Vec::with_capacity(4);
    if let Some(rating) = review.rating {
        parts.push(format!("{:.1} stars", rating));
    }
    if let Some(author) = &review.author {
        if !author.display_name.trim().is_empty() {
            parts.push(format!("by {}", author.display_name));
        }
    }
    if !review.relative_publish_time_description.trim().is_empty() {
        parts.push(format!("({})", review.relative_publish_time_description));
    }
    let text = review_text(review);
    if !text.is_empty() {
        parts.push(text);
    }
    parts.join(" ")
}

/// Translated text, falling back to the original when the translation is empty.
fn review_text(review: &Review) -> String {
    let translated = review.text.as_ref().map(|t| t.text.trim()).unwrap_or("");
    let text = if translated.is_empty() {
        review
            .original_text
            .as_ref()
            .map(|t| t.text.trim())
            .unwrap_or("")
    } else {
        translated
    };
    truncate_text(text, MAX_REVIEW_CHARS)
}

pub fn truncate_text(value: &str, max_chars: usize) -> String {
    if max_chars == 0 || value.chars().count() <= max_chars {
        return value.to_string();
    }
    let cut: String = value.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}

/// Trimmed, deduplicated, sorted; blanks dropped.
pub fn unique_strings(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::RouteWaypoint;
    use crate::types::{
        AuthorAttribution, AutocompleteSuggestion, LocalizedText, ResolvedLocation,
    };

    fn plain() -> Color {
        Color::new(false)
    }

    fn cafe() -> PlaceSummary {
        PlaceSummary {
            place_id: "abc".to_string(),
            name: "Cafe".to_string(),
            address: "1 Main St".to_string(),
            location: Some(LatLng::new(47.6, -122.3)),
            rating: Some(4.5),
            price_level: Some(2),
            types: vec!["cafe".to_string(), "food".to_string(), "cafe".to_string()],
            open_now: Some(true),
        }
    }

    #[test]
    fn test_render_search() {
        let response = SearchResponse {
            results: vec![cafe()],
            next_page_token: Some("tok".to_string()),
        };
        let out = render_search(plain(), &response);
        assert!(out.contains("Results (1)"));
        assert!(out.contains("1. Cafe — 1 Main St"));
        assert!(out.contains("ID: abc"));
        assert!(out.contains("Location: 47.600000, -122.300000"));
        assert!(out.contains("Rating: 4.5 · $2"));
        assert!(out.contains("Types: cafe, food"));
        assert!(out.contains("Open now: yes"));
        assert!(out.contains("Next page token: tok"));
    }

    #[test]
    fn test_render_search_empty() {
        assert_eq!(render_search(plain(), &SearchResponse::default()), "No results.");
        assert_eq!(render_nearby(plain(), &SearchResponse::default()), "No results.");
    }

    #[test]
    fn test_render_autocomplete() {
        let response = AutocompleteResponse {
            suggestions: vec![
                AutocompleteSuggestion {
                    kind: SuggestionKind::Place,
                    place_id: "p1".to_string(),
                    place: "places/p1".to_string(),
                    text: "Cafe Nero, Main St".to_string(),
                    main_text: "Cafe Nero".to_string(),
                    secondary_text: "Main St".to_string(),
                    types: vec!["cafe".to_string()],
                    distance_meters: Some(120),
                },
                AutocompleteSuggestion {
                    kind: SuggestionKind::Query,
                    place_id: String::new(),
                    place: String::new(),
                    text: "cafes near me".to_string(),
                    main_text: String::new(),
                    secondary_text: String::new(),
                    types: Vec::new(),
                    distance_meters: None,
                },
            ],
        };
        let out = render_autocomplete(plain(), &response);
        assert!(out.contains("Suggestions (2)"));
        assert!(out.contains("1. Cafe Nero — Main St [place]"));
        assert!(out.contains("Distance: 120 m"));
        assert!(out.contains("2. cafes near me [query]"));
        assert_eq!(
            render_autocomplete(plain(), &AutocompleteResponse::default()),
            "No results."
        );
    }

    #[test]
    fn test_format_title_fallback() {
        assert_eq!(format_title(plain(), " ", ""), "(no name)");
        assert_eq!(format_title(plain(), "Cafe", ""), "Cafe");
    }

    #[test]
    fn test_write_line_skips_blank() {
        let mut out = String::new();
        write_line(&mut out, plain(), "", "Phone", "  ");
        assert!(out.is_empty());
        write_open_now(&mut out, plain(), "", None);
        assert!(out.is_empty());
        write_open_now(&mut out, plain(), "", Some(false));
        assert_eq!(out, "Open now: no\n");
    }

    #[test]
    fn test_render_details() {
        let review = |text: &str| Review {
            rating: Some(5.0),
            author: Some(AuthorAttribution {
                display_name: "Ann".to_string(),
                ..AuthorAttribution::default()
            }),
            relative_publish_time_description: "a week ago".to_string(),
            text: Some(LocalizedText {
                text: text.to_string(),
                language_code: "en".to_string(),
            }),
            ..Review::default()
        };
        let place = PlaceDetails {
            place_id: "abc".to_string(),
            name: "Cafe".to_string(),
            phone: "+1 555".to_string(),
            website: "https://example.com".to_string(),
            hours: vec!["Monday: 9-5".to_string()],
            reviews: vec![review("Lovely"), review("b"), review("c"), review("d")],
            photos: vec![Photo {
                name: "places/abc/photos/p1".to_string(),
                width_px: Some(800),
                height_px: Some(600),
                authors: Vec::new(),
            }],
            ..PlaceDetails::default()
        };
        let out = render_details(plain(), &place);
        assert!(out.starts_with("Cafe\n"));
        assert!(out.contains("Phone: +1 555"));
        assert!(out.contains("Website: https://example.com"));
        assert!(out.contains("  - 5.0 stars by Ann (a week ago) Lovely"));
        assert!(out.contains("... 1 more"));
        assert!(out.contains("places/abc/photos/p1 (800x600)"));
        assert!(out.contains("Hours:\n  - Monday: 9-5"));
    }

    #[test]
    fn test_review_text_falls_back_to_original() {
        let review = Review {
            text: Some(LocalizedText::default()),
            original_text: Some(LocalizedText {
                text: "Sehr gut".to_string(),
                language_code: "de".to_string(),
            }),
            ..Review::default()
        };
        assert_eq!(review_line(&review), "Sehr gut");
    }

    #[test]
    fn test_render_resolve() {
        let response = LocationResolveResponse {
            results: vec![ResolvedLocation {
                place_id: "r1".to_string(),
                name: "Seattle".to_string(),
                address: "Seattle, WA".to_string(),
                location: Some(LatLng::new(47.6, -122.3)),
                types: vec!["locality".to_string()],
            }],
        };
        let out = render_resolve(plain(), &response);
        assert!(out.contains("Resolved (1)"));
        assert!(out.contains("1. Seattle — Seattle, WA"));
        assert!(out.contains("Types: locality"));
    }

    #[test]
    fn test_render_route() {
        let response = RouteResponse {
            waypoints: vec![
                RouteWaypoint {
                    location: LatLng::new(38.5, -120.2),
                    results: vec![cafe()],
                },
                RouteWaypoint {
                    location: LatLng::new(43.252, -126.453),
                    results: Vec::new(),
                },
            ],
        };
        let out = render_route(plain(), &response);
        assert!(out.contains("Route waypoints (2)"));
        assert!(out.contains("Waypoint 1: 38.500000, -120.200000"));
        assert!(out.contains("  1. Cafe — 1 Main St"));
        assert!(out.contains("     ID: abc"));
        assert!(out.contains("Waypoint 2: 43.252000, -126.453000\n   No results."));
    }

    #[test]
    fn test_render_photo() {
        let out = render_photo(
            plain(),
            &PhotoMediaResponse {
                name: "places/a/photos/b".to_string(),
                photo_uri: "https://img.example/b.jpg".to_string(),
            },
        );
        assert_eq!(out, "Photo: places/a/photos/b\nURL: https://img.example/b.jpg\n");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("abcdef", 3), "abc...");
        assert_eq!(truncate_text("héllo wörld", 5), "héllo...");
    }

    #[test]
    fn test_unique_strings() {
        let values = vec![
            "cafe".to_string(),
            "Cafe".to_string(),
            "cafe".to_string(),
            String::new(),
        ];
        assert_eq!(unique_strings(&values), vec!["Cafe".to_string(), "cafe".to_string()]);
    }
}

//! Test fixtures for places-route.
//!
//! Provides canned API payloads and encoded routes:
//! - Places API (New) responses for search, details and autocomplete
//! - Routes API responses wrapping known polylines

#![allow(dead_code)]

pub mod api_responses;

pub use api_responses::*;

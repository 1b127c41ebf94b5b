//! Error types for the places client and route pipeline.

use std::fmt;
use std::io;

use thiserror::Error;

/// A request field failed validation before any network call was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    pub fn required(field: &'static str) -> Self {
        Self::new(field, "required")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Failures while decoding an encoded polyline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PolylineError {
    #[error("empty polyline")]
    EmptyInput,

    /// Input ended (or overflowed) in the middle of a varint.
    #[error("invalid polyline at byte {offset}")]
    Malformed { offset: usize },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("missing API key")]
    MissingApiKey,

    #[error("api error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("read response: {0}")]
    Read(#[from] io::Error),

    #[error("decode response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("empty response")]
    EmptyResponse,

    #[error(transparent)]
    Polyline(#[from] PolylineError),

    #[error("route not found: {0}")]
    RouteNotFound(&'static str),

    #[error("no route waypoints")]
    NoWaypoints,
}

impl Error {
    /// True for errors the caller fixes by changing input (bad flags, missing key).
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::MissingApiKey)
    }

    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

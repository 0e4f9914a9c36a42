//! Error types for the geocoding client.

use thiserror::Error;

/// Errors produced by the geocoding client.
#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("geocoding service returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("invalid coordinate: lon={lon}, lat={lat}")]
    InvalidCoordinate { lon: f64, lat: f64 },

    #[error("invalid parameter: {name} ({reason})")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Result alias for geocoding operations.
pub type Result<T> = std::result::Result<T, GeocodeError>;

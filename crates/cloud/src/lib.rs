//! # Lattica Cloud
//!
//! Geocoding and reverse-geocoding over HTTP for Lattica.
//!
//! Wraps Nominatim-compatible services with the batch semantics spatial
//! workflows need: a mandatory delay between requests (public endpoints
//! rate-limit hard), bounded retry on transient failures, and per-input
//! failure annotation so one bad address never sinks a batch.

pub mod client;
pub mod error;
pub mod models;

pub use client::{GeocoderClient, GeocoderOptions, GeocodingService};
pub use error::{GeocodeError, Result};
pub use models::{AddressParts, BatchGeocode, GeocodedPoint, LookupOutcome, NominatimPlace};

//! Wire models for Nominatim-style geocoding responses.
//!
//! Lightweight serde models for the subset Lattica consumes: coordinates,
//! the display name, and common address components. Nominatim serializes
//! `lat`/`lon` as strings; parsing to f64 happens when converting to a
//! [`GeocodedPoint`].

use serde::{Deserialize, Serialize};

use crate::error::{GeocodeError, Result};

/// One place in a Nominatim `/search` or `/reverse` response.
#[derive(Debug, Clone, Deserialize)]
pub struct NominatimPlace {
    /// Latitude as a decimal string.
    pub lat: String,
    /// Longitude as a decimal string.
    pub lon: String,
    /// Human-readable place label.
    pub display_name: String,
    /// Address components, present when `addressdetails=1` is requested.
    #[serde(default)]
    pub address: Option<AddressParts>,
}

/// Address components of a geocoding hit.
///
/// Every field is optional; services fill in what they know.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddressParts {
    #[serde(default)]
    pub house_number: Option<String>,
    #[serde(default)]
    pub road: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub county: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub postcode: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
}

/// A successfully geocoded location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodedPoint {
    /// Longitude (x), WGS84.
    pub lon: f64,
    /// Latitude (y), WGS84.
    pub lat: f64,
    /// Human-readable label from the service.
    pub display_name: String,
    /// Structured address components, when provided.
    pub address: Option<AddressParts>,
}

impl TryFrom<NominatimPlace> for GeocodedPoint {
    type Error = GeocodeError;

    fn try_from(place: NominatimPlace) -> Result<Self> {
        let lat: f64 = place
            .lat
            .parse()
            .map_err(|_| GeocodeError::Malformed(format!("bad latitude {:?}", place.lat)))?;
        let lon: f64 = place
            .lon
            .parse()
            .map_err(|_| GeocodeError::Malformed(format!("bad longitude {:?}", place.lon)))?;
        Ok(GeocodedPoint {
            lon,
            lat,
            display_name: place.display_name,
            address: place.address,
        })
    }
}

/// Outcome of one lookup within a batch.
///
/// A non-success response marks the input failed without aborting the
/// rest of the batch.
#[derive(Debug, Clone)]
pub enum LookupOutcome {
    /// The service returned a location.
    Found(GeocodedPoint),
    /// The service had no match for the input.
    NoMatch,
    /// The lookup failed; the reason is kept for the caller.
    Failed(String),
}

/// One annotated entry of a batch geocode.
#[derive(Debug, Clone)]
pub struct BatchGeocode {
    /// The query as submitted.
    pub query: String,
    /// What came back for it.
    pub outcome: LookupOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_HIT: &str = r#"{
        "place_id": 100149,
        "lat": "51.5074456",
        "lon": "-0.1277653",
        "display_name": "London, Greater London, England, United Kingdom",
        "address": {
            "city": "London",
            "state": "England",
            "country": "United Kingdom",
            "country_code": "gb"
        }
    }"#;

    #[test]
    fn test_parse_place_and_convert() {
        let place: NominatimPlace = serde_json::from_str(SEARCH_HIT).unwrap();
        let point = GeocodedPoint::try_from(place).unwrap();

        assert!((point.lat - 51.5074456).abs() < 1e-9);
        assert!((point.lon + 0.1277653).abs() < 1e-9);
        assert!(point.display_name.starts_with("London"));

        let address = point.address.unwrap();
        assert_eq!(address.country_code.as_deref(), Some("gb"));
        assert_eq!(address.road, None);
    }

    #[test]
    fn test_parse_search_array() {
        let body = format!("[{}]", SEARCH_HIT);
        let places: Vec<NominatimPlace> = serde_json::from_str(&body).unwrap();
        assert_eq!(places.len(), 1);
    }

    #[test]
    fn test_empty_result_set() {
        let places: Vec<NominatimPlace> = serde_json::from_str("[]").unwrap();
        assert!(places.is_empty());
    }

    #[test]
    fn test_bad_coordinate_is_malformed() {
        let place = NominatimPlace {
            lat: "not-a-number".into(),
            lon: "0.0".into(),
            display_name: "x".into(),
            address: None,
        };
        let err = GeocodedPoint::try_from(place).unwrap_err();
        assert!(matches!(err, GeocodeError::Malformed(_)));
    }

    #[test]
    fn test_place_without_address_block() {
        let body = r#"{"lat": "1.0", "lon": "2.0", "display_name": "somewhere"}"#;
        let place: NominatimPlace = serde_json::from_str(body).unwrap();
        assert!(place.address.is_none());
    }
}

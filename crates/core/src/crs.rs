//! Coordinate Reference System handling
//!
//! Datasets carry a [`Crs`] so that mismatched reference systems are
//! detected and reported before any spatial computation. Lattica never
//! reprojects silently.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Coordinate Reference System representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Crs {
    /// EPSG code (e.g. 4326 for WGS84 geographic).
    Epsg(u32),
    /// Well-known text definition.
    Wkt(String),
    /// PROJ string definition.
    Proj(String),
}

impl Crs {
    /// WGS84 geographic CRS (EPSG:4326), the GeoJSON default.
    pub fn wgs84() -> Self {
        Crs::Epsg(4326)
    }

    /// Web Mercator (EPSG:3857).
    pub fn web_mercator() -> Self {
        Crs::Epsg(3857)
    }

    /// EPSG code if this CRS carries one.
    pub fn epsg(&self) -> Option<u32> {
        match self {
            Crs::Epsg(code) => Some(*code),
            _ => None,
        }
    }

    /// Check whether two CRS definitions are equivalent.
    ///
    /// EPSG codes compare numerically; WKT and PROJ definitions compare
    /// textually (imperfect, but never a false positive across kinds).
    pub fn is_equivalent(&self, other: &Crs) -> bool {
        match (self, other) {
            (Crs::Epsg(a), Crs::Epsg(b)) => a == b,
            (Crs::Wkt(a), Crs::Wkt(b)) => a == b,
            (Crs::Proj(a), Crs::Proj(b)) => a == b,
            _ => false,
        }
    }

    /// Short string identifier for error messages and display.
    pub fn identifier(&self) -> String {
        match self {
            Crs::Epsg(code) => format!("EPSG:{}", code),
            Crs::Proj(proj) => proj.clone(),
            // Truncate on char boundaries; WKT often quotes non-ASCII names
            Crs::Wkt(wkt) => {
                format!("WKT:{}", wkt.chars().take(50).collect::<String>())
            }
        }
    }

    /// Fail with [`Error::CrsMismatch`] unless `other` is equivalent.
    pub fn check_matches(&self, other: &Crs) -> Result<()> {
        if self.is_equivalent(other) {
            Ok(())
        } else {
            Err(Error::CrsMismatch {
                left: self.identifier(),
                right: other.identifier(),
            })
        }
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

impl Default for Crs {
    fn default() -> Self {
        Self::wgs84()
    }
}

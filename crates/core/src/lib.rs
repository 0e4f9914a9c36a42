//! # Lattica Core
//!
//! Core types and I/O for the Lattica spatial analysis library.
//!
//! This crate provides:
//! - `SpatialUnit` / `UnitCollection`: identified geometries with numeric
//!   attributes, missing values kept explicit
//! - `Crs`: coordinate reference system tagging and mismatch detection
//! - Geometry helpers (centroids, boundary extraction)
//! - I/O for GeoJSON feature collections and GAL adjacency lists

pub mod crs;
pub mod error;
pub mod geometry;
pub mod io;
pub mod units;

pub use crs::Crs;
pub use error::{Error, Result};
pub use units::{SpatialUnit, UnitCollection, UnitId};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::Crs;
    pub use crate::error::{Error, Result};
    pub use crate::units::{SpatialUnit, UnitCollection, UnitId};
}

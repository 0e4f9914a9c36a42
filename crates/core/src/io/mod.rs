//! Import/export for unit collections and neighbor relations
//!
//! - **geojson**: read spatial units from GeoJSON feature collections
//! - **gal**: read/write adjacency lists in the classic GAL text format

pub mod gal;
pub mod geojson;

pub use gal::{read_gal, write_gal, AdjacencyList};
pub use geojson::{from_geojson_str, read_geojson};

//! # Lattica Algorithms
//!
//! Spatial weights and exploratory spatial statistics for Lattica.
//!
//! ## Available modules
//!
//! - **weights**: contiguity (queen/rook), k-nearest and distance-band
//!   adjacency builders; weights matrices with binary, row-standardized
//!   and variance-stabilized normalization
//! - **lag**: spatial lag with explicit missing-value propagation
//! - **autocorrelation**: global and local Moran statistics with
//!   seeded permutation inference
//! - **kdtree**: the 2D spatial index behind the distance builders
//!
//! ## Features
//!
//! - `parallel` (default): run permutation loops on rayon

pub mod autocorrelation;
pub mod kdtree;
pub mod lag;
pub mod weights;

mod maybe_rayon;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::autocorrelation::{
        global_moran, local_moran, GlobalMoran, LocalMoran, MoranParams, Quadrant,
    };
    pub use crate::lag::spatial_lag;
    pub use crate::weights::{
        distance_band, knn, queen_contiguity, rook_contiguity, NeighborRelation,
        Transform, WeightsMatrix,
    };
    pub use lattica_core::prelude::*;
}

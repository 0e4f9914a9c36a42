//! Distance-based adjacency from unit centroids
//!
//! - [`knn`]: exactly k nearest centroids per unit (asymmetric)
//! - [`distance_band`]: all centroids within a threshold, with
//!   distance-decay raw weights d^alpha (symmetric)

use lattica_core::{Error, Result, UnitCollection};

use super::NeighborRelation;
use crate::kdtree::KdTree;

/// k-nearest-neighbor adjacency over unit centroids.
///
/// Every unit gets exactly k neighbors (self excluded), ordered by
/// ascending distance, raw weight 1.0. The relation is asymmetric: being
/// someone's nearest neighbor is not mutual. Requires `1 <= k <= n - 1`.
pub fn knn(units: &UnitCollection, k: usize) -> Result<NeighborRelation> {
    let n = units.len();
    if k == 0 || n < 2 || k > n - 1 {
        return Err(Error::InvalidParameter {
            name: "k",
            value: k.to_string(),
            reason: format!("must satisfy 1 <= k <= n - 1 (n = {})", n),
        });
    }

    let centroids = units.centroids()?;
    let tree = KdTree::build(&centroids);

    let mut links = Vec::with_capacity(n);
    for (i, &(x, y)) in centroids.iter().enumerate() {
        // Query k + 1 and drop the unit itself; with coincident centroids
        // the self hit need not be the first, so filter by index.
        let row: Vec<(usize, f64)> = tree
            .k_nearest(x, y, k + 1)
            .into_iter()
            .filter(|hit| hit.index != i)
            .take(k)
            .map(|hit| (hit.index, 1.0))
            .collect();

        debug_assert_eq!(row.len(), k);
        links.push(row);
    }

    NeighborRelation::from_parts(units.ids(), links)
}

/// Distance-band adjacency: neighbors within `threshold` of the centroid.
///
/// Raw weight is `d^alpha` with `alpha < 0` (-1.0 linear decay, -2.0
/// gravity decay). Coincident centroids (d = 0) get weight 1.0 since the
/// power law diverges there. Units with nothing in range are islands.
pub fn distance_band(
    units: &UnitCollection,
    threshold: f64,
    alpha: f64,
) -> Result<NeighborRelation> {
    if !(threshold > 0.0) {
        return Err(Error::InvalidParameter {
            name: "threshold",
            value: threshold.to_string(),
            reason: "must be positive".into(),
        });
    }
    if !(alpha < 0.0) {
        return Err(Error::InvalidParameter {
            name: "alpha",
            value: alpha.to_string(),
            reason: "distance decay exponent must be negative".into(),
        });
    }

    let centroids = units.centroids()?;
    let tree = KdTree::build(&centroids);

    let mut links = Vec::with_capacity(units.len());
    for (i, &(x, y)) in centroids.iter().enumerate() {
        let mut hits = tree.within_radius(x, y, threshold);
        hits.sort_by(|a, b| a.distance_sq.total_cmp(&b.distance_sq));

        let row: Vec<(usize, f64)> = hits
            .into_iter()
            .filter(|hit| hit.index != i)
            .map(|hit| {
                let d = hit.distance();
                let w = if d == 0.0 { 1.0 } else { d.powf(alpha) };
                (hit.index, w)
            })
            .collect();
        links.push(row);
    }

    NeighborRelation::from_parts(units.ids(), links)
}

//! Spatial weights: neighbor relations, builders and normalization
//!
//! - **contiguity**: queen/rook neighbors from shared boundary geometry
//! - **distance**: k-nearest and distance-band neighbors from centroids
//! - [`NeighborRelation`]: per-unit neighbor lists with raw weights
//! - [`WeightsMatrix`]: a relation plus a normalization mode
//!
//! Raw weights are kept immutably on the relation; every transform is
//! recomputed from them, so reapplying a mode is idempotent and
//! [`Transform::Raw`] reverts exactly.

pub mod contiguity;
pub mod distance;

pub use contiguity::{queen_contiguity, rook_contiguity};
pub use distance::{distance_band, knn};

use lattica_core::io::gal::AdjacencyList;
use lattica_core::{Error, Result, UnitId};

/// Neighbor membership and raw weights over an ordered set of units.
///
/// Contiguity builders produce symmetric relations with unit weights;
/// k-nearest is asymmetric by construction; distance-band weights carry
/// the distance-decay value. Units with no neighbors are islands and are
/// surfaced via [`NeighborRelation::islands`].
#[derive(Debug, Clone)]
pub struct NeighborRelation {
    ids: Vec<UnitId>,
    neighbors: Vec<Vec<usize>>,
    raw_weights: Vec<Vec<f64>>,
}

impl NeighborRelation {
    /// Build a relation from per-unit `(neighbor index, raw weight)` lists.
    pub fn from_parts(ids: Vec<UnitId>, links: Vec<Vec<(usize, f64)>>) -> Result<Self> {
        if ids.len() != links.len() {
            return Err(Error::LengthMismatch {
                expected: ids.len(),
                actual: links.len(),
            });
        }
        let n = ids.len();
        let mut neighbors = Vec::with_capacity(n);
        let mut raw_weights = Vec::with_capacity(n);
        for (i, row) in links.into_iter().enumerate() {
            let mut idx = Vec::with_capacity(row.len());
            let mut w = Vec::with_capacity(row.len());
            for (j, weight) in row {
                if j >= n {
                    return Err(Error::Algorithm(format!(
                        "neighbor index {} out of range for {} units",
                        j, n
                    )));
                }
                if j == i {
                    return Err(Error::Algorithm(format!(
                        "unit {} lists itself as a neighbor",
                        ids[i]
                    )));
                }
                idx.push(j);
                w.push(weight);
            }
            neighbors.push(idx);
            raw_weights.push(w);
        }
        Ok(Self {
            ids,
            neighbors,
            raw_weights,
        })
    }

    /// Number of units.
    pub fn n(&self) -> usize {
        self.ids.len()
    }

    /// Unit ids in index order.
    pub fn ids(&self) -> &[UnitId] {
        &self.ids
    }

    /// Neighbor indices of unit `i`.
    pub fn neighbors_of(&self, i: usize) -> &[usize] {
        &self.neighbors[i]
    }

    /// Raw weights of unit `i`, parallel to [`Self::neighbors_of`].
    pub fn raw_weights_of(&self, i: usize) -> &[f64] {
        &self.raw_weights[i]
    }

    /// Neighbor count per unit.
    pub fn cardinalities(&self) -> Vec<usize> {
        self.neighbors.iter().map(Vec::len).collect()
    }

    /// Indices of units with zero neighbors.
    pub fn islands(&self) -> Vec<usize> {
        self.neighbors
            .iter()
            .enumerate()
            .filter(|(_, nb)| nb.is_empty())
            .map(|(i, _)| i)
            .collect()
    }

    /// Ids of units with zero neighbors.
    pub fn island_ids(&self) -> Vec<UnitId> {
        self.islands().into_iter().map(|i| self.ids[i].clone()).collect()
    }

    /// Whether membership is symmetric (i neighbors j iff j neighbors i).
    pub fn is_symmetric(&self) -> bool {
        for (i, row) in self.neighbors.iter().enumerate() {
            for &j in row {
                if !self.neighbors[j].contains(&i) {
                    return false;
                }
            }
        }
        true
    }

    /// Membership as an id-keyed adjacency list (GAL interchange).
    pub fn to_adjacency(&self) -> AdjacencyList {
        AdjacencyList {
            ids: self.ids.clone(),
            neighbors: self
                .neighbors
                .iter()
                .map(|row| row.iter().map(|&j| self.ids[j].clone()).collect())
                .collect(),
        }
    }

    /// Rebuild a relation from an adjacency list with unit raw weights.
    pub fn from_adjacency(adjacency: &AdjacencyList) -> Result<Self> {
        let ids = adjacency.ids.clone();
        let lookup: std::collections::HashMap<&str, usize> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect();

        let mut links = Vec::with_capacity(ids.len());
        for row in &adjacency.neighbors {
            let mut out = Vec::with_capacity(row.len());
            for id in row {
                let &j = lookup
                    .get(id.as_str())
                    .ok_or_else(|| Error::UnknownUnit(id.clone()))?;
                out.push((j, 1.0));
            }
            links.push(out);
        }
        NeighborRelation::from_parts(ids, links)
    }
}

/// Weight normalization modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Weights as produced by the builder.
    Raw,
    /// Every nonzero weight becomes 1.
    Binary,
    /// Each row divided by its row sum; rows sum to 1. Errors on islands.
    RowStandardized,
    /// Rows scaled by 1/sqrt(sum of squared weights), then globally
    /// rescaled so the total weight equals the number of units.
    VarianceStabilized,
}

/// A neighbor relation plus its current normalization.
///
/// Membership never changes under a transform; only weight values do.
#[derive(Debug, Clone)]
pub struct WeightsMatrix {
    relation: NeighborRelation,
    transform: Transform,
    weights: Vec<Vec<f64>>,
}

impl WeightsMatrix {
    /// Wrap a relation with raw weights in effect.
    pub fn new(relation: NeighborRelation) -> Self {
        let weights = relation.raw_weights.clone();
        Self {
            relation,
            transform: Transform::Raw,
            weights,
        }
    }

    /// Number of units.
    pub fn n(&self) -> usize {
        self.relation.n()
    }

    /// The underlying relation.
    pub fn relation(&self) -> &NeighborRelation {
        &self.relation
    }

    /// Current normalization mode.
    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Neighbor indices of unit `i`.
    pub fn neighbors_of(&self, i: usize) -> &[usize] {
        self.relation.neighbors_of(i)
    }

    /// Current weights of unit `i`, parallel to [`Self::neighbors_of`].
    pub fn weights_of(&self, i: usize) -> &[f64] {
        &self.weights[i]
    }

    /// Indices of island units.
    pub fn islands(&self) -> Vec<usize> {
        self.relation.islands()
    }

    /// Sum of all current weights (S0).
    pub fn total_weight(&self) -> f64 {
        self.weights.iter().flatten().sum()
    }

    /// Switch the normalization mode.
    ///
    /// Always recomputed from the raw weights, so reapplying the current
    /// mode is a no-op and [`Transform::Raw`] restores the originals
    /// exactly. Row standardization fails with [`Error::IslandUnits`]
    /// while the relation has islands.
    pub fn set_transform(&mut self, transform: Transform) -> Result<()> {
        let raw = &self.relation.raw_weights;
        let next = match transform {
            Transform::Raw => raw.clone(),
            Transform::Binary => raw
                .iter()
                .map(|row| row.iter().map(|&w| if w != 0.0 { 1.0 } else { 0.0 }).collect())
                .collect(),
            Transform::RowStandardized => {
                let islands = self.relation.island_ids();
                if !islands.is_empty() {
                    return Err(Error::IslandUnits(islands));
                }
                raw.iter()
                    .map(|row| {
                        let sum: f64 = row.iter().sum();
                        row.iter().map(|&w| w / sum).collect()
                    })
                    .collect()
            }
            Transform::VarianceStabilized => {
                let mut scaled: Vec<Vec<f64>> = raw
                    .iter()
                    .map(|row| {
                        let norm: f64 = row.iter().map(|&w| w * w).sum::<f64>().sqrt();
                        if norm == 0.0 {
                            Vec::new()
                        } else {
                            row.iter().map(|&w| w / norm).collect()
                        }
                    })
                    .collect();
                let total: f64 = scaled.iter().flatten().sum();
                if total > 0.0 {
                    let factor = self.relation.n() as f64 / total;
                    for row in &mut scaled {
                        for w in row {
                            *w *= factor;
                        }
                    }
                }
                scaled
            }
        };
        self.weights = next;
        self.transform = transform;
        Ok(())
    }
}

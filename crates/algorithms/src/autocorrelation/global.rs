//! Global Moran's I
//!
//! A single scalar summarizing whether similar attribute values cluster
//! in space, with significance from a seeded permutation test. The
//! statistic is the cross-product of mean-deviations and their spatial
//! lag, normalized by the total weight and the input variance:
//!
//! ```text
//! I = (n / S0) * Σi Σj wij zi zj / Σi zi²
//! ```
//!
//! I is not confined to [-1, 1]; values beyond that range are legal for
//! some weight structures and are reported as computed.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use lattica_core::{Error, Result, UnitId};

use super::{simulated_p, MoranParams};
use crate::maybe_rayon::*;
use crate::weights::WeightsMatrix;

/// Result of the global Moran test.
#[derive(Debug, Clone)]
pub struct GlobalMoran {
    /// Observed Moran's I.
    pub i: f64,
    /// Expected value under spatial randomness, -1/(n-1).
    pub expected: f64,
    /// Simulated p-value from the permutation test.
    pub p_sim: f64,
    /// Number of permutations behind `p_sim`.
    pub permutations: usize,
    /// Ids of island units (they contribute no weight to the statistic).
    pub islands: Vec<UnitId>,
}

/// Compute global Moran's I with permutation inference.
///
/// `values` must be complete: a global scalar has nowhere to carry a
/// per-unit missing marker, so any `None` is an [`Error::MissingValues`]
/// rather than silent deletion. Islands are permitted; they simply add
/// nothing to either the cross-product or S0.
pub fn global_moran(
    weights: &WeightsMatrix,
    values: &[Option<f64>],
    params: &MoranParams,
) -> Result<GlobalMoran> {
    let n = weights.n();
    if values.len() != n {
        return Err(Error::LengthMismatch {
            expected: n,
            actual: values.len(),
        });
    }

    let missing = values.iter().filter(|v| v.is_none()).count();
    if missing > 0 {
        return Err(Error::MissingValues { count: missing });
    }
    if n < 3 {
        return Err(Error::Algorithm(
            "global Moran's I needs at least 3 units".into(),
        ));
    }

    let x: Vec<f64> = values.iter().map(|v| v.unwrap_or_default()).collect();
    let mean = x.iter().sum::<f64>() / n as f64;
    let z: Vec<f64> = x.iter().map(|v| v - mean).collect();
    let sum_sq: f64 = z.iter().map(|d| d * d).sum();

    let expected = -1.0 / (n as f64 - 1.0);
    let islands = weights.relation().island_ids();

    if sum_sq < f64::EPSILON {
        // Constant vector: no spatial structure to measure
        return Ok(GlobalMoran {
            i: 0.0,
            expected,
            p_sim: 1.0,
            permutations: params.permutations,
            islands,
        });
    }

    let s0 = weights.total_weight();
    if s0 == 0.0 {
        return Err(Error::Algorithm(
            "weights matrix has zero total weight".into(),
        ));
    }

    let observed = moran_statistic(weights, &z, sum_sq, s0);

    // Permutation test: reassign values across units and recompute.
    // Shuffling the deviations is equivalent to shuffling the values
    // since the mean is permutation-invariant. One child seed per draw
    // keeps the parallel path deterministic.
    let reference: Vec<f64> = (0..params.permutations)
        .into_par_iter()
        .map(|draw| {
            let mut rng = StdRng::seed_from_u64(params.seed.wrapping_add(draw as u64));
            let mut shuffled = z.clone();
            shuffled.shuffle(&mut rng);
            moran_statistic(weights, &shuffled, sum_sq, s0)
        })
        .collect();

    let p_sim = simulated_p(observed, expected, &reference);

    Ok(GlobalMoran {
        i: observed,
        expected,
        p_sim,
        permutations: params.permutations,
        islands,
    })
}

/// The Moran cross-product for a deviation vector.
fn moran_statistic(weights: &WeightsMatrix, z: &[f64], sum_sq: f64, s0: f64) -> f64 {
    let n = weights.n();
    let mut cross = 0.0;
    for i in 0..n {
        let zi = z[i];
        for (&j, &w) in weights.neighbors_of(i).iter().zip(weights.weights_of(i)) {
            cross += w * zi * z[j];
        }
    }
    (n as f64 / s0) * (cross / sum_sq)
}

//! Spatial lag operator
//!
//! The lag of a unit is the weighted sum of its neighbors' attribute
//! values under the matrix's current normalization. Missingness is
//! explicit: islands and units with any missing neighbor value lag to
//! `None`, never to a silent zero.

use lattica_core::{Error, Result};

use crate::weights::WeightsMatrix;

/// Compute the spatial lag of `values` under `weights`.
///
/// `values` must have one entry per unit in matrix order. Unit `i` lags
/// to `None` when it has no neighbors or any neighbor's value is
/// missing; its own value does not enter its lag.
pub fn spatial_lag(
    weights: &WeightsMatrix,
    values: &[Option<f64>],
) -> Result<Vec<Option<f64>>> {
    if values.len() != weights.n() {
        return Err(Error::LengthMismatch {
            expected: weights.n(),
            actual: values.len(),
        });
    }

    let mut lags = Vec::with_capacity(weights.n());
    for i in 0..weights.n() {
        let neighbors = weights.neighbors_of(i);
        if neighbors.is_empty() {
            lags.push(None);
            continue;
        }

        let mut sum = 0.0;
        let mut complete = true;
        for (&j, &w) in neighbors.iter().zip(weights.weights_of(i)) {
            match values[j] {
                Some(v) => sum += w * v,
                None => {
                    complete = false;
                    break;
                }
            }
        }
        lags.push(if complete { Some(sum) } else { None });
    }

    Ok(lags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weights::{NeighborRelation, Transform, WeightsMatrix};

    /// Path graph a - b - c - d, unit raw weights.
    fn path_matrix() -> WeightsMatrix {
        let rel = NeighborRelation::from_parts(
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            vec![
                vec![(1, 1.0)],
                vec![(0, 1.0), (2, 1.0)],
                vec![(1, 1.0), (3, 1.0)],
                vec![(2, 1.0)],
            ],
        )
        .unwrap();
        WeightsMatrix::new(rel)
    }

    fn dense(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn test_binary_lag_is_neighbor_sum() {
        let w = path_matrix();
        let lag = spatial_lag(&w, &dense(&[1.0, 2.0, 3.0, 4.0])).unwrap();
        assert_eq!(lag, vec![Some(2.0), Some(4.0), Some(6.0), Some(3.0)]);
    }

    #[test]
    fn test_row_standardized_lag_is_neighbor_mean() {
        let mut w = path_matrix();
        w.set_transform(Transform::RowStandardized).unwrap();
        let lag = spatial_lag(&w, &dense(&[1.0, 2.0, 3.0, 4.0])).unwrap();
        assert_eq!(lag, vec![Some(2.0), Some(2.0), Some(3.0), Some(3.0)]);
    }

    #[test]
    fn test_missing_neighbor_poisons_lag_only_locally() {
        let w = path_matrix();
        let values = vec![Some(1.0), None, Some(3.0), Some(4.0)];
        let lag = spatial_lag(&w, &values).unwrap();
        // a and c each neighbor b (missing); d does not
        assert_eq!(lag, vec![None, Some(4.0), None, Some(3.0)]);
    }

    #[test]
    fn test_island_lags_to_none() {
        let rel = NeighborRelation::from_parts(
            vec!["a".into(), "b".into(), "lone".into()],
            vec![vec![(1, 1.0)], vec![(0, 1.0)], vec![]],
        )
        .unwrap();
        let w = WeightsMatrix::new(rel);
        let lag = spatial_lag(&w, &dense(&[1.0, 2.0, 9.0])).unwrap();
        assert_eq!(lag[2], None);
    }

    #[test]
    fn test_length_mismatch() {
        let w = path_matrix();
        let err = spatial_lag(&w, &dense(&[1.0, 2.0])).unwrap_err();
        assert!(matches!(err, Error::LengthMismatch { expected: 4, actual: 2 }));
    }

    #[test]
    fn test_lag_reproduced_after_transform_round_trip() {
        let mut w = path_matrix();
        let values = dense(&[0.5, -1.5, 2.0, 7.0]);
        let before = spatial_lag(&w, &values).unwrap();

        w.set_transform(Transform::RowStandardized).unwrap();
        w.set_transform(Transform::Raw).unwrap();
        let after = spatial_lag(&w, &values).unwrap();

        assert_eq!(before, after);
    }
}

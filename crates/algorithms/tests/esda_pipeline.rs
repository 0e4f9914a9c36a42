//! End-to-end exploratory spatial data analysis pipeline tests:
//! GeoJSON units -> contiguity weights -> normalization -> lag ->
//! global/local Moran, plus GAL interchange of the neighbor relation.

use geo_types::{Geometry, LineString, Polygon};
use lattica_algorithms::prelude::*;
use lattica_core::io::gal::{format_gal, parse_gal};

fn square(x0: f64, y0: f64) -> Geometry<f64> {
    Geometry::Polygon(Polygon::new(
        LineString::from(vec![
            (x0, y0),
            (x0 + 1.0, y0),
            (x0 + 1.0, y0 + 1.0),
            (x0, y0 + 1.0),
        ]),
        vec![],
    ))
}

/// side x side grid of unit squares, row-major from the bottom-left,
/// with an `income` attribute splitting the grid into a low western and
/// high eastern half.
fn grid(side: usize) -> UnitCollection {
    let mut units = UnitCollection::new(Crs::Epsg(3857));
    for row in 0..side {
        for col in 0..side {
            let income = if col < side / 2 { 10.0 } else { 90.0 };
            units
                .push(
                    SpatialUnit::new(
                        format!("r{}c{}", row, col),
                        square(col as f64, row as f64),
                    )
                    .with_attribute("income", income),
                )
                .unwrap();
        }
    }
    units
}

#[test]
fn two_by_two_queen_and_rook_cardinalities() {
    let units = grid(2);

    // All four squares meet at the shared center vertex
    let queen = queen_contiguity(&units).unwrap();
    assert_eq!(queen.cardinalities(), vec![3, 3, 3, 3]);

    // Edge sharing only: the diagonal pairs drop out
    let rook = rook_contiguity(&units).unwrap();
    assert_eq!(rook.cardinalities(), vec![2, 2, 2, 2]);
}

#[test]
fn row_standardized_lag_equals_neighbor_mean() {
    let units = grid(4);
    let mut weights = WeightsMatrix::new(rook_contiguity(&units).unwrap());
    weights.set_transform(Transform::RowStandardized).unwrap();

    let income = units.attribute("income");
    let lag = spatial_lag(&weights, &income).unwrap();

    // Unit r0c0 (index 0) has rook neighbors r0c1 (10.0) and r1c0 (10.0)
    assert_eq!(lag[0], Some(10.0));
    // Unit r0c2 (index 2) has neighbors r0c1 (10), r0c3 (90), r1c2 (90)
    let expected = (10.0 + 90.0 + 90.0) / 3.0;
    assert!((lag[2].unwrap() - expected).abs() < 1e-12);
}

#[test]
fn split_grid_is_globally_and_locally_clustered() {
    let units = grid(6);
    let mut weights = WeightsMatrix::new(queen_contiguity(&units).unwrap());
    weights.set_transform(Transform::RowStandardized).unwrap();

    let income = units.attribute("income");
    let params = MoranParams {
        permutations: 999,
        seed: 20240601,
    };

    let global = global_moran(&weights, &income, &params).unwrap();
    assert!(global.i > 0.4, "split grid should cluster, I = {}", global.i);
    assert!(global.p_sim <= 0.01);
    assert!(global.islands.is_empty());

    let local = local_moran(&weights, &income, &params).unwrap();
    let labels = local.significant(0.05);

    // Interior west cells are low-low, interior east cells high-high
    let west = units.index_of("r3c0").unwrap();
    let east = units.index_of("r3c5").unwrap();
    assert_eq!(labels[west], Some(Quadrant::LowLow));
    assert_eq!(labels[east], Some(Quadrant::HighHigh));

    // The seam columns mix both sides; their labels may be insignificant,
    // but no unit flips to an outlier class on this clean split.
    assert!(local
        .quadrants
        .iter()
        .flatten()
        .all(|q| matches!(*q, Quadrant::LowLow | Quadrant::HighHigh)));
}

#[test]
fn gal_interchange_preserves_membership() {
    let units = grid(3);
    let relation = queen_contiguity(&units).unwrap();

    let text = format_gal(&relation.to_adjacency()).unwrap();
    let parsed = parse_gal(&text).unwrap();
    let rebuilt = NeighborRelation::from_adjacency(&parsed).unwrap();

    assert_eq!(rebuilt.ids(), relation.ids());
    for i in 0..relation.n() {
        assert_eq!(rebuilt.neighbors_of(i), relation.neighbors_of(i));
    }
}

#[test]
fn crs_mismatch_is_detected_before_analysis() {
    let projected = grid(2);
    let mut geographic = grid(2);
    geographic.set_crs(Crs::wgs84());

    let err = projected.check_same_crs(&geographic).unwrap_err();
    assert!(matches!(err, Error::CrsMismatch { .. }));
}

#[test]
fn knn_pipeline_on_centroids() {
    let units = grid(4);
    let relation = knn(&units, 4).unwrap();
    assert!(relation.cardinalities().iter().all(|&c| c == 4));

    // knn relations are not guaranteed symmetric, but they always wrap
    // into a weights matrix and row-standardize (no islands by design)
    let mut weights = WeightsMatrix::new(relation);
    weights.set_transform(Transform::RowStandardized).unwrap();
    for i in 0..weights.n() {
        let sum: f64 = weights.weights_of(i).iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }
}

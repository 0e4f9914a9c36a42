//! Contiguity-based adjacency from boundary geometry
//!
//! Queen contiguity links units whose boundaries share at least one
//! vertex; rook contiguity requires a shared edge. Both are built by
//! hashing boundary primitives to unit indices, so construction is
//! linear in the total vertex count rather than quadratic in units.

use std::collections::{BTreeSet, HashMap};

use lattica_core::geometry::{boundary_edges, boundary_vertices, Coord2};
use lattica_core::{Error, Result, UnitCollection};

use super::NeighborRelation;

/// Bit-exact hash key for a coordinate, with -0.0 folded into 0.0.
fn coord_key(c: Coord2) -> (u64, u64) {
    let x = if c.0 == 0.0 { 0.0 } else { c.0 };
    let y = if c.1 == 0.0 { 0.0 } else { c.1 };
    (x.to_bits(), y.to_bits())
}

/// Undirected hash key for an edge.
fn edge_key(a: Coord2, b: Coord2) -> ((u64, u64), (u64, u64)) {
    let ka = coord_key(a);
    let kb = coord_key(b);
    if ka <= kb {
        (ka, kb)
    } else {
        (kb, ka)
    }
}

/// Queen contiguity: neighbors share at least one boundary vertex.
///
/// Symmetric with raw weight 1.0. All geometries must be polygonal;
/// a point or line geometry is an [`Error::InvalidGeometry`]. Units that
/// touch nothing come out as islands.
pub fn queen_contiguity(units: &UnitCollection) -> Result<NeighborRelation> {
    let mut buckets: HashMap<(u64, u64), Vec<usize>> = HashMap::new();

    for (i, unit) in units.iter().enumerate() {
        let vertices =
            boundary_vertices(&unit.geometry).ok_or_else(|| Error::InvalidGeometry {
                id: unit.id.clone(),
                reason: "contiguity requires polygonal geometry".into(),
            })?;
        // Dedupe within the unit so shared buckets hold distinct units
        let keys: BTreeSet<(u64, u64)> = vertices.into_iter().map(coord_key).collect();
        for key in keys {
            buckets.entry(key).or_default().push(i);
        }
    }

    relation_from_buckets(units, buckets.into_values())
}

/// Rook contiguity: neighbors share a boundary edge.
///
/// Stricter than queen; corner-only contact does not link. Symmetric
/// with raw weight 1.0.
pub fn rook_contiguity(units: &UnitCollection) -> Result<NeighborRelation> {
    let mut buckets: HashMap<((u64, u64), (u64, u64)), Vec<usize>> = HashMap::new();

    for (i, unit) in units.iter().enumerate() {
        let edges = boundary_edges(&unit.geometry).ok_or_else(|| Error::InvalidGeometry {
            id: unit.id.clone(),
            reason: "contiguity requires polygonal geometry".into(),
        })?;
        let keys: BTreeSet<((u64, u64), (u64, u64))> =
            edges.into_iter().map(|(a, b)| edge_key(a, b)).collect();
        for key in keys {
            buckets.entry(key).or_default().push(i);
        }
    }

    relation_from_buckets(units, buckets.into_values())
}

/// Turn shared-primitive buckets into a symmetric unit-weight relation.
fn relation_from_buckets<I>(units: &UnitCollection, buckets: I) -> Result<NeighborRelation>
where
    I: IntoIterator<Item = Vec<usize>>,
{
    let n = units.len();
    let mut neighbor_sets: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); n];

    for bucket in buckets {
        if bucket.len() < 2 {
            continue;
        }
        for (a, &i) in bucket.iter().enumerate() {
            for &j in &bucket[a + 1..] {
                if i != j {
                    neighbor_sets[i].insert(j);
                    neighbor_sets[j].insert(i);
                }
            }
        }
    }

    let links: Vec<Vec<(usize, f64)>> = neighbor_sets
        .into_iter()
        .map(|set| set.into_iter().map(|j| (j, 1.0)).collect())
        .collect();

    NeighborRelation::from_parts(units.ids(), links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{Geometry, Point, Polygon};
    use lattica_core::{Crs, SpatialUnit};

    fn square(x0: f64, y0: f64) -> Geometry<f64> {
        Geometry::Polygon(Polygon::new(
            geo_types::LineString::from(vec![
                (x0, y0),
                (x0 + 1.0, y0),
                (x0 + 1.0, y0 + 1.0),
                (x0, y0 + 1.0),
            ]),
            vec![],
        ))
    }

    /// 2x2 grid of unit squares:
    ///   c d
    ///   a b
    fn grid_2x2() -> UnitCollection {
        UnitCollection::from_units(
            vec![
                SpatialUnit::new("a", square(0.0, 0.0)),
                SpatialUnit::new("b", square(1.0, 0.0)),
                SpatialUnit::new("c", square(0.0, 1.0)),
                SpatialUnit::new("d", square(1.0, 1.0)),
            ],
            Crs::Epsg(3857),
        )
        .unwrap()
    }

    #[test]
    fn test_queen_2x2_all_mutual() {
        let rel = queen_contiguity(&grid_2x2()).unwrap();
        // All four squares meet at the center vertex
        assert_eq!(rel.cardinalities(), vec![3, 3, 3, 3]);
        assert!(rel.is_symmetric());
        assert!(rel.islands().is_empty());
    }

    #[test]
    fn test_rook_2x2_edges_only() {
        let rel = rook_contiguity(&grid_2x2()).unwrap();
        // Diagonal pairs touch only at the corner, so rook drops them
        assert_eq!(rel.cardinalities(), vec![2, 2, 2, 2]);
        assert!(rel.is_symmetric());
        // a (index 0) borders b (1) and c (2) but not d (3)
        assert_eq!(rel.neighbors_of(0), &[1, 2]);
    }

    #[test]
    fn test_detached_unit_is_island() {
        let mut units = grid_2x2();
        units
            .push(SpatialUnit::new("far", square(10.0, 10.0)))
            .unwrap();
        let rel = queen_contiguity(&units).unwrap();
        assert_eq!(rel.islands(), vec![4]);
        assert_eq!(rel.island_ids(), vec!["far".to_string()]);
    }

    #[test]
    fn test_point_geometry_rejected() {
        let units = UnitCollection::from_units(
            vec![SpatialUnit::new("p", Geometry::Point(Point::new(0.0, 0.0)))],
            Crs::wgs84(),
        )
        .unwrap();
        let err = queen_contiguity(&units).unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry { ref id, .. } if id == "p"));
    }

    #[test]
    fn test_corner_neighbors_queen_only() {
        // Two squares touching at a single corner
        let units = UnitCollection::from_units(
            vec![
                SpatialUnit::new("a", square(0.0, 0.0)),
                SpatialUnit::new("d", square(1.0, 1.0)),
            ],
            Crs::Epsg(3857),
        )
        .unwrap();

        let queen = queen_contiguity(&units).unwrap();
        assert_eq!(queen.cardinalities(), vec![1, 1]);

        let rook = rook_contiguity(&units).unwrap();
        assert_eq!(rook.cardinalities(), vec![0, 0]);
        assert_eq!(rook.islands().len(), 2);
    }
}

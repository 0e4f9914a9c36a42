//! Spatial units and unit collections
//!
//! A [`SpatialUnit`] is an identified geometry with named numeric
//! attributes. A [`UnitCollection`] is an ordered set of units sharing a
//! CRS; the order defines the index space used by neighbor relations,
//! weights matrices and attribute vectors.
//!
//! Missing values are explicit: an attribute absent from a unit shows up
//! as `None` in [`UnitCollection::attribute`], never as NaN or zero.

use std::collections::HashMap;

use geo_types::Geometry;

use crate::crs::Crs;
use crate::error::{Error, Result};
use crate::geometry;

/// Opaque unit identifier (e.g. a region code).
pub type UnitId = String;

/// A spatial unit: identifier, geometry and numeric attributes.
#[derive(Debug, Clone)]
pub struct SpatialUnit {
    /// Unit identifier, unique within a collection.
    pub id: UnitId,
    /// Unit geometry (polygon, multipolygon or point).
    pub geometry: Geometry<f64>,
    /// Named numeric attributes. An absent name means the value is missing.
    pub attributes: HashMap<String, f64>,
}

impl SpatialUnit {
    /// Create a unit with no attributes.
    pub fn new(id: impl Into<UnitId>, geometry: Geometry<f64>) -> Self {
        Self {
            id: id.into(),
            geometry,
            attributes: HashMap::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attribute(mut self, name: impl Into<String>, value: f64) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    /// Attribute value, `None` if missing.
    pub fn attribute(&self, name: &str) -> Option<f64> {
        self.attributes.get(name).copied()
    }

    /// Centroid of the unit geometry, if defined for its kind.
    pub fn centroid(&self) -> Option<(f64, f64)> {
        geometry::centroid(&self.geometry)
    }
}

/// An ordered collection of spatial units sharing one CRS.
#[derive(Debug, Clone)]
pub struct UnitCollection {
    units: Vec<SpatialUnit>,
    index: HashMap<UnitId, usize>,
    crs: Crs,
}

impl UnitCollection {
    /// Create an empty collection with the given CRS.
    pub fn new(crs: Crs) -> Self {
        Self {
            units: Vec::new(),
            index: HashMap::new(),
            crs,
        }
    }

    /// Build a collection from units, rejecting duplicate ids.
    pub fn from_units(units: Vec<SpatialUnit>, crs: Crs) -> Result<Self> {
        let mut collection = Self::new(crs);
        for unit in units {
            collection.push(unit)?;
        }
        Ok(collection)
    }

    /// Append a unit. Fails on a duplicate id.
    pub fn push(&mut self, unit: SpatialUnit) -> Result<()> {
        if self.index.contains_key(&unit.id) {
            return Err(Error::DuplicateUnitId(unit.id));
        }
        self.index.insert(unit.id.clone(), self.units.len());
        self.units.push(unit);
        Ok(())
    }

    /// Number of units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// The collection's CRS.
    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    /// Replace the CRS tag (no reprojection is performed).
    pub fn set_crs(&mut self, crs: Crs) {
        self.crs = crs;
    }

    /// Unit at positional index.
    pub fn get(&self, index: usize) -> Option<&SpatialUnit> {
        self.units.get(index)
    }

    /// Unit by id.
    pub fn by_id(&self, id: &str) -> Option<&SpatialUnit> {
        self.index.get(id).map(|&i| &self.units[i])
    }

    /// Positional index of a unit id.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Iterate units in collection order.
    pub fn iter(&self) -> impl Iterator<Item = &SpatialUnit> {
        self.units.iter()
    }

    /// Unit ids in collection order.
    pub fn ids(&self) -> Vec<UnitId> {
        self.units.iter().map(|u| u.id.clone()).collect()
    }

    /// Attribute column in collection order, missing values preserved.
    pub fn attribute(&self, name: &str) -> Vec<Option<f64>> {
        self.units.iter().map(|u| u.attribute(name)).collect()
    }

    /// Centroids of all units in collection order.
    ///
    /// Fails with [`Error::InvalidGeometry`] for any unit whose geometry
    /// kind has no defined centroid.
    pub fn centroids(&self) -> Result<Vec<(f64, f64)>> {
        self.units
            .iter()
            .map(|u| {
                u.centroid().ok_or_else(|| Error::InvalidGeometry {
                    id: u.id.clone(),
                    reason: "geometry has no defined centroid".into(),
                })
            })
            .collect()
    }

    /// Fail unless `other` shares this collection's CRS.
    ///
    /// Call before any computation joining two datasets; Lattica never
    /// reprojects silently.
    pub fn check_same_crs(&self, other: &UnitCollection) -> Result<()> {
        self.crs.check_matches(other.crs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::Point;

    fn point_unit(id: &str, x: f64, y: f64) -> SpatialUnit {
        SpatialUnit::new(id, Geometry::Point(Point::new(x, y)))
    }

    #[test]
    fn test_push_and_lookup() {
        let mut c = UnitCollection::new(Crs::wgs84());
        c.push(point_unit("a", 0.0, 0.0).with_attribute("pop", 10.0))
            .unwrap();
        c.push(point_unit("b", 1.0, 0.0)).unwrap();

        assert_eq!(c.len(), 2);
        assert_eq!(c.index_of("b"), Some(1));
        assert_eq!(c.by_id("a").unwrap().attribute("pop"), Some(10.0));
        assert_eq!(c.ids(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut c = UnitCollection::new(Crs::wgs84());
        c.push(point_unit("a", 0.0, 0.0)).unwrap();
        let err = c.push(point_unit("a", 1.0, 1.0)).unwrap_err();
        assert!(matches!(err, Error::DuplicateUnitId(ref id) if id == "a"));
    }

    #[test]
    fn test_attribute_column_keeps_missing() {
        let c = UnitCollection::from_units(
            vec![
                point_unit("a", 0.0, 0.0).with_attribute("income", 5.0),
                point_unit("b", 1.0, 0.0),
                point_unit("c", 2.0, 0.0).with_attribute("income", 7.5),
            ],
            Crs::wgs84(),
        )
        .unwrap();

        assert_eq!(c.attribute("income"), vec![Some(5.0), None, Some(7.5)]);
    }

    #[test]
    fn test_crs_mismatch_detected() {
        let a = UnitCollection::new(Crs::Epsg(4326));
        let b = UnitCollection::new(Crs::Epsg(3857));
        assert!(matches!(
            a.check_same_crs(&b),
            Err(Error::CrsMismatch { .. })
        ));
        assert!(a.check_same_crs(&a.clone()).is_ok());
    }
}

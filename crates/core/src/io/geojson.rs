//! GeoJSON import for unit collections
//!
//! Reads a GeoJSON `FeatureCollection` into a [`UnitCollection`]. The
//! feature `id` member (or an `id` property) becomes the unit id, falling
//! back to the positional index. Numeric properties become attributes;
//! everything else is ignored. GeoJSON geometry is always WGS84, so the
//! collection is tagged EPSG:4326; use [`UnitCollection::set_crs`] if your
//! file abuses the format with projected coordinates.

use std::fs;
use std::path::Path;

use geojson::{feature::Id, Feature, GeoJson};
use serde_json::Value as JsonValue;

use crate::crs::Crs;
use crate::error::{Error, Result};
use crate::units::{SpatialUnit, UnitCollection};

/// Read a GeoJSON file into a unit collection.
pub fn read_geojson<P: AsRef<Path>>(path: P) -> Result<UnitCollection> {
    let text = fs::read_to_string(path)?;
    from_geojson_str(&text)
}

/// Parse GeoJSON text into a unit collection.
pub fn from_geojson_str(text: &str) -> Result<UnitCollection> {
    let geojson: GeoJson = text.parse().map_err(|e: geojson::Error| Error::Format {
        format: "GeoJSON",
        reason: e.to_string(),
    })?;

    let features: Vec<Feature> = match geojson {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(f) => vec![f],
        GeoJson::Geometry(_) => {
            return Err(Error::Format {
                format: "GeoJSON",
                reason: "bare geometry has no id or attributes".into(),
            })
        }
    };

    let mut collection = UnitCollection::new(Crs::wgs84());

    for (position, feature) in features.into_iter().enumerate() {
        let id = feature_id(&feature, position);

        let geometry = feature.geometry.ok_or_else(|| Error::InvalidGeometry {
            id: id.clone(),
            reason: "feature has no geometry".into(),
        })?;

        let geom: geo_types::Geometry<f64> =
            geometry.value.try_into().map_err(|e: geojson::Error| {
                Error::InvalidGeometry {
                    id: id.clone(),
                    reason: e.to_string(),
                }
            })?;

        let mut unit = SpatialUnit::new(id, geom);

        if let Some(properties) = feature.properties {
            for (name, value) in properties {
                if name == "id" {
                    continue;
                }
                if let Some(number) = value.as_f64() {
                    unit.attributes.insert(name, number);
                }
                // Non-numeric and null properties are missing values
            }
        }

        collection.push(unit)?;
    }

    Ok(collection)
}

/// Unit id from the feature `id` member, an `id` property, or the position.
fn feature_id(feature: &Feature, position: usize) -> String {
    match &feature.id {
        Some(Id::String(s)) => return s.clone(),
        Some(Id::Number(n)) => return n.to_string(),
        None => {}
    }

    if let Some(properties) = &feature.properties {
        match properties.get("id") {
            Some(JsonValue::String(s)) => return s.clone(),
            Some(JsonValue::Number(n)) => return n.to_string(),
            _ => {}
        }
    }

    position.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_TRACTS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "id": "tract-01",
                "properties": {"income": 42000.5, "name": "north"},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]]
                }
            },
            {
                "type": "Feature",
                "properties": {"id": "tract-02", "income": null},
                "geometry": {"type": "Point", "coordinates": [2.0, 3.0]}
            }
        ]
    }"#;

    #[test]
    fn test_parse_feature_collection() {
        let c = from_geojson_str(TWO_TRACTS).unwrap();
        assert_eq!(c.len(), 2);
        assert_eq!(c.crs(), &Crs::wgs84());

        let first = c.by_id("tract-01").unwrap();
        assert_eq!(first.attribute("income"), Some(42000.5));
        // String property is not a numeric attribute
        assert_eq!(first.attribute("name"), None);

        // Null property stays missing; id came from the property bag
        let second = c.by_id("tract-02").unwrap();
        assert_eq!(second.attribute("income"), None);
    }

    #[test]
    fn test_attribute_column_from_geojson() {
        let c = from_geojson_str(TWO_TRACTS).unwrap();
        assert_eq!(c.attribute("income"), vec![Some(42000.5), None]);
    }

    #[test]
    fn test_missing_geometry_is_error() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "id": "x", "properties": {}, "geometry": null}
            ]
        }"#;
        let err = from_geojson_str(text).unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry { ref id, .. } if id == "x"));
    }

    #[test]
    fn test_garbage_is_format_error() {
        let err = from_geojson_str("{not json").unwrap_err();
        assert!(matches!(err, Error::Format { format: "GeoJSON", .. }));
    }
}

//! JSON dataset files and `GeoJSON` geometry conversion.
//!
//! A dataset file holds all three kinds of reference data in one
//! document:
//!
//! ```json
//! {
//!   "taxonomy": [{ "name": "shopping_places", "aliases": ["shopping"], "subcategories": ["..."] }],
//!   "regions":  [{ "id": 167330, "parent_id": null, "name": "...", "boundary": { "type": "Polygon", "coordinates": [] } }],
//!   "places":   [{ "id": 17576066, "name": "...", "category": "...", "subcategory": "...",
//!                  "address": "", "keywords": [], "location": { "longitude": 86.43404, "latitude": 23.796692 } }]
//! }
//! ```
//!
//! Region boundaries are `GeoJSON` `Polygon` or `MultiPolygon` geometries.

use std::path::Path;

use geo::MultiPolygon;
use lepton_types::{Category, Place, RegionId};
use serde::Deserialize;

use crate::catalog::Catalog;
use crate::error::CatalogError;
use crate::region::Region;

/// A region as stored in a dataset file.
#[derive(Debug, Clone, Deserialize)]
pub struct RegionRecord {
    /// Unique region identifier.
    pub id: RegionId,
    /// Parent region, absent for roots.
    #[serde(default)]
    pub parent_id: Option<RegionId>,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Boundary as `GeoJSON`.
    pub boundary: geojson::Geometry,
}

/// The top-level layout of a dataset file.
#[derive(Debug, Clone, Deserialize)]
pub struct Dataset {
    /// Category taxonomy entries.
    #[serde(default)]
    pub taxonomy: Vec<Category>,
    /// Regions with `GeoJSON` boundaries.
    #[serde(default)]
    pub regions: Vec<RegionRecord>,
    /// Places of interest.
    #[serde(default)]
    pub places: Vec<Place>,
}

impl Dataset {
    /// Read and parse a dataset file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the file cannot be read or
    /// [`CatalogError::Json`] if it does not match the layout.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse a dataset from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Json`] if the string does not match the layout.
    pub fn parse(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Convert the geometries and build a validated [`Catalog`].
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidGeometry`] for a boundary that is not
    /// a polygon, or any validation error raised by [`Catalog::build`].
    pub fn into_catalog(self, source: &str) -> Result<Catalog, CatalogError> {
        let regions = self
            .regions
            .into_iter()
            .map(|record| {
                Ok(Region {
                    boundary: multi_polygon_from_geojson(record.id, record.boundary)?,
                    id: record.id,
                    parent_id: record.parent_id,
                    name: record.name,
                })
            })
            .collect::<Result<Vec<_>, CatalogError>>()?;

        Catalog::build(self.taxonomy, regions, self.places, source)
    }
}

/// Load a catalog straight from a dataset file.
///
/// # Errors
///
/// See [`Dataset::from_path`] and [`Dataset::into_catalog`].
pub fn load_file(path: &Path) -> Result<Catalog, CatalogError> {
    let dataset = Dataset::from_path(path)?;
    dataset.into_catalog(&path.display().to_string())
}

/// Convert a `GeoJSON` polygon or multi-polygon into a [`MultiPolygon`].
///
/// # Errors
///
/// Returns [`CatalogError::InvalidGeometry`] for any other geometry type or
/// malformed coordinates.
pub fn multi_polygon_from_geojson(
    region: RegionId,
    geometry: geojson::Geometry,
) -> Result<MultiPolygon<f64>, CatalogError> {
    let converted: geo::Geometry<f64> =
        geometry
            .try_into()
            .map_err(|e: geojson::Error| CatalogError::InvalidGeometry {
                region,
                reason: e.to_string(),
            })?;

    match converted {
        geo::Geometry::Polygon(polygon) => Ok(MultiPolygon::new(vec![polygon])),
        geo::Geometry::MultiPolygon(multi) => Ok(multi),
        _ => Err(CatalogError::InvalidGeometry {
            region,
            reason: String::from("expected Polygon or MultiPolygon"),
        }),
    }
}

/// Parse a `GeoJSON` geometry string (as produced by `ST_AsGeoJSON`) into a
/// [`MultiPolygon`].
///
/// # Errors
///
/// Returns [`CatalogError::InvalidGeometry`] if the text is not a polygonal
/// `GeoJSON` geometry.
pub fn multi_polygon_from_geojson_str(
    region: RegionId,
    text: &str,
) -> Result<MultiPolygon<f64>, CatalogError> {
    let geometry: geojson::Geometry =
        serde_json::from_str(text).map_err(|e| CatalogError::InvalidGeometry {
            region,
            reason: e.to_string(),
        })?;
    multi_polygon_from_geojson(region, geometry)
}

#[cfg(test)]
mod tests {
    use lepton_geo::Boundary;
    use lepton_types::Coordinate;

    use super::*;

    const DATASET: &str = r#"{
        "taxonomy": [
            { "name": "shopping_places", "aliases": ["shopping"],
              "subcategories": ["shopping_retail_shops"] }
        ],
        "regions": [
            { "id": 1, "name": "Box",
              "boundary": { "type": "Polygon",
                            "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]] } },
            { "id": 2, "parent_id": 1, "name": "Pair",
              "boundary": { "type": "MultiPolygon",
                            "coordinates": [[[[0,0],[0.2,0],[0.2,0.2],[0,0.2],[0,0]]],
                                            [[[0.8,0.8],[1,0.8],[1,1],[0.8,1],[0.8,0.8]]]] } }
        ],
        "places": [
            { "id": 5, "name": "Men Parlour", "category": "shopping_places",
              "subcategory": "shopping_retail_shops", "keywords": ["tailor"],
              "location": { "longitude": 0.9, "latitude": 0.9 } }
        ]
    }"#;

    #[test]
    fn parse_and_build() {
        let catalog = Dataset::parse(DATASET).and_then(|d| d.into_catalog("inline"));
        assert!(catalog.is_ok(), "{catalog:?}");
        if let Ok(catalog) = catalog {
            assert_eq!(catalog.regions().len(), 2);
            assert_eq!(catalog.places().len(), 1);
            let pair = catalog.regions().get(RegionId(2));
            assert_eq!(pair.map(|r| r.boundary.0.len()), Some(2));
        }
    }

    #[test]
    fn geojson_string_conversion() {
        let multi = multi_polygon_from_geojson_str(
            RegionId(9),
            r#"{"type":"Polygon","coordinates":[[[0,0],[2,0],[2,2],[0,2],[0,0]]]}"#,
        );
        assert!(multi.is_ok());
        let boundary = multi.map(|m| Boundary::from(&m)).unwrap_or_default();
        assert!(boundary.contains(Coordinate::new(1.0, 1.0)));
    }

    #[test]
    fn non_polygon_geometry_is_rejected() {
        let result = multi_polygon_from_geojson_str(
            RegionId(9),
            r#"{"type":"Point","coordinates":[0,0]}"#,
        );
        assert!(matches!(
            result,
            Err(CatalogError::InvalidGeometry { region: RegionId(9), .. })
        ));
    }

    #[test]
    fn garbage_geometry_is_rejected() {
        let result = multi_polygon_from_geojson_str(RegionId(9), "not json");
        assert!(matches!(result, Err(CatalogError::InvalidGeometry { .. })));
    }
}

//! `GeoJSON` feature assembly: field projection, coordinate rounding, and
//! the empty-result policy.
//!
//! Emitted features carry only `geometry` and `properties`; clients
//! compare responses member-for-member, so no `"type": "Feature"` tag,
//! `id` or `bbox` is written. The collection keeps its
//! `"type": "FeatureCollection"` tag.

use geo::Polygon;
use geojson::{Geometry, JsonObject, JsonValue, Value};
use lepton_types::{Coordinate, FieldSet, Place, PlaceField};
use serde::{Deserialize, Serialize};

use crate::catchment::Catchment;
use crate::config::OutputConfig;
use crate::error::QueryError;

/// Decimal places kept on emitted distances.
const DISTANCE_PRECISION: u8 = 1;

// ---------------------------------------------------------------------------
// Response shapes
// ---------------------------------------------------------------------------

/// One emitted feature: a geometry and its properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Point for places, polygon for catchments.
    pub geometry: Geometry,
    /// Always-present fields plus the requested ones.
    pub properties: JsonObject,
}

/// A `FeatureCollection` of bare features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    /// Features in emission order.
    pub features: Vec<Feature>,
}

/// Turns places and catchments into `GeoJSON` features.
#[derive(Debug, Clone, Copy)]
pub struct FeatureAssembler {
    precision: u8,
}

impl Default for FeatureAssembler {
    fn default() -> Self {
        Self::new(&OutputConfig::default())
    }
}

impl FeatureAssembler {
    /// Create an assembler from the `output` config section.
    pub const fn new(config: &OutputConfig) -> Self {
        Self {
            precision: config.coordinate_precision,
        }
    }

    /// Build a collection of place features in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::NoResults`] when `places` is empty.
    pub fn places(&self, places: &[&Place], fields: &FieldSet) -> Result<FeatureCollection, QueryError> {
        if places.is_empty() {
            return Err(QueryError::NoResults);
        }
        let features = places
            .iter()
            .map(|place| self.place_feature(place, fields, None))
            .collect();
        Ok(collection(features))
    }

    /// Build a catchment collection: the catchment polygon first, then one
    /// feature per listed place. An empty listing is not an error.
    pub fn catchment(&self, catchment: &Catchment, places: &[(&Place, f64)], fields: &FieldSet) -> FeatureCollection {
        let mut features = Vec::with_capacity(places.len() + 1);
        features.push(self.catchment_feature(catchment));
        features.extend(
            places
                .iter()
                .map(|(place, distance)| self.place_feature(place, fields, Some(*distance))),
        );
        collection(features)
    }

    /// A point feature for one place. `distance` is emitted only when it
    /// is known and requested.
    pub fn place_feature(&self, place: &Place, fields: &FieldSet, distance: Option<f64>) -> Feature {
        let mut properties = JsonObject::new();
        properties.insert(String::from("id"), JsonValue::from(place.id.into_inner()));
        properties.insert(String::from("name"), JsonValue::from(place.name.as_str()));
        properties.insert(String::from("category"), JsonValue::from(place.category.as_str()));

        for field in fields.iter() {
            let value = match field {
                PlaceField::Address => JsonValue::from(place.address.as_str()),
                PlaceField::Subcategory => JsonValue::from(place.subcategory.as_str()),
                PlaceField::Keywords => JsonValue::from(place.keywords.clone()),
                PlaceField::Distance => match distance {
                    Some(d) => JsonValue::from(round_to(d, DISTANCE_PRECISION)),
                    None => continue,
                },
                PlaceField::Id | PlaceField::Name | PlaceField::Category => continue,
            };
            properties.insert(field.as_str().to_owned(), value);
        }

        feature(Value::Point(self.position(place.location)), properties)
    }

    /// The catchment polygon feature with its centre and radius as
    /// properties.
    pub fn catchment_feature(&self, catchment: &Catchment) -> Feature {
        let mut properties = JsonObject::new();
        properties.insert(
            String::from("latitude"),
            JsonValue::from(catchment.center.latitude),
        );
        properties.insert(
            String::from("longitude"),
            JsonValue::from(catchment.center.longitude),
        );
        properties.insert(String::from("radius_m"), JsonValue::from(catchment.radius_m));

        feature(Value::Polygon(self.rings(&catchment.polygon)), properties)
    }

    fn position(&self, point: Coordinate) -> Vec<f64> {
        vec![
            round_to(point.longitude, self.precision),
            round_to(point.latitude, self.precision),
        ]
    }

    fn rings(&self, polygon: &Polygon<f64>) -> Vec<Vec<Vec<f64>>> {
        std::iter::once(polygon.exterior())
            .chain(polygon.interiors())
            .map(|ring| {
                ring.coords()
                    .map(|c| vec![round_to(c.x, self.precision), round_to(c.y, self.precision)])
                    .collect()
            })
            .collect()
    }
}

fn feature(value: Value, properties: JsonObject) -> Feature {
    Feature {
        geometry: Geometry::new(value),
        properties,
    }
}

const fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection { features }
}

/// Round `value` to `places` decimal places.
pub fn round_to(value: f64, places: u8) -> f64 {
    let factor = 10_f64.powi(i32::from(places));
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use lepton_types::PlaceId;
    use serde_json::json;

    use super::*;
    use crate::catchment::CatchmentBuilder;

    fn place() -> Place {
        Place {
            id: PlaceId(17576066),
            name: String::from("Pamicy Store"),
            category: String::from("shopping_places"),
            subcategory: String::from("other_shopping_centres"),
            address: String::new(),
            keywords: vec![String::from("tailor")],
            location: Coordinate::new(86.434_040_4, 23.796_692_2),
        }
    }

    fn to_json(feature: &Feature) -> serde_json::Value {
        serde_json::to_value(feature).unwrap_or_default()
    }

    #[test]
    fn always_fields_only_by_default() {
        let feature = FeatureAssembler::default().place_feature(&place(), &FieldSet::new(), None);
        assert_eq!(
            to_json(&feature)["properties"],
            json!({"id": 17576066, "name": "Pamicy Store", "category": "shopping_places"})
        );
    }

    #[test]
    fn requested_fields_are_projected_and_coordinates_rounded() {
        let fields = FieldSet::parse_list("address,subcategory").unwrap_or_default();
        let feature = FeatureAssembler::default().place_feature(&place(), &fields, None);
        let value = to_json(&feature);
        assert_eq!(
            value.as_object().map(|o| o.keys().cloned().collect::<Vec<_>>()),
            Some(vec![String::from("geometry"), String::from("properties")])
        );
        assert_eq!(
            value["geometry"],
            json!({"type": "Point", "coordinates": [86.43404, 23.796692]})
        );
        assert_eq!(
            value["properties"],
            json!({
                "id": 17576066,
                "name": "Pamicy Store",
                "category": "shopping_places",
                "address": "",
                "subcategory": "other_shopping_centres"
            })
        );
    }

    #[test]
    fn distance_only_emitted_when_known() {
        let fields = FieldSet::parse_list("distance,keywords").unwrap_or_default();
        let assembler = FeatureAssembler::default();

        let without = to_json(&assembler.place_feature(&place(), &fields, None));
        assert!(without["properties"].get("distance").is_none());
        assert_eq!(without["properties"]["keywords"], json!(["tailor"]));

        let with = to_json(&assembler.place_feature(&place(), &fields, Some(263.456)));
        assert_eq!(with["properties"]["distance"], json!(263.5));
    }

    #[test]
    fn empty_place_list_is_no_results() {
        let result = FeatureAssembler::default().places(&[], &FieldSet::new());
        assert!(matches!(result, Err(QueryError::NoResults)));
    }

    #[test]
    fn catchment_polygon_comes_first() {
        let catchment = CatchmentBuilder::default().build(Coordinate::new(77.1025, 28.7041), None);
        assert!(catchment.is_ok());
        let Ok(catchment) = catchment else { return };
        let p = place();
        let collection = FeatureAssembler::default().catchment(&catchment, &[(&p, 10.0)], &FieldSet::new());
        assert_eq!(collection.features.len(), 2);

        let first = serde_json::to_value(&collection.features[0]).unwrap_or_default();
        assert_eq!(first["geometry"]["type"], "Polygon");
        assert_eq!(first["properties"]["radius_m"], json!(1000.0));
        let ring = first["geometry"]["coordinates"][0].as_array().cloned().unwrap_or_default();
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn collection_is_tagged_and_features_are_bare() {
        let p = place();
        let collection = FeatureAssembler::default().places(&[&p], &FieldSet::new());
        assert!(collection.is_ok());
        let Ok(collection) = collection else { return };

        let value = serde_json::to_value(&collection).unwrap_or_default();
        assert_eq!(value["type"], "FeatureCollection");
        assert!(value["features"][0].get("type").is_none());

        let reparsed: Result<FeatureCollection, _> = serde_json::from_value(value);
        assert_eq!(reparsed.ok(), Some(collection));
    }

    #[test]
    fn rounding() {
        assert!((round_to(86.434_040_4, 6) - 86.43404).abs() < 1e-12);
        assert!((round_to(-0.000_000_4, 6)).abs() < 1e-12);
        assert!((round_to(12.25, 1) - 12.3).abs() < 1e-12);
    }
}

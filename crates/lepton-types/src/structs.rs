//! Core entity structs for the Lepton query service.
//!
//! Places and categories are plain reference data: loaded once, never
//! mutated while requests are served.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::PlaceId;

// ---------------------------------------------------------------------------
// Coordinate
// ---------------------------------------------------------------------------

/// A WGS 84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Coordinate {
    /// Longitude in degrees, east positive.
    pub longitude: f64,
    /// Latitude in degrees, north positive.
    pub latitude: f64,
}

impl Coordinate {
    /// Create a coordinate from a longitude/latitude pair.
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Whether both components are finite and inside the WGS 84 ranges
    /// (`[-180, 180]` and `[-90, 90]`).
    pub fn is_valid(&self) -> bool {
        self.longitude.is_finite()
            && self.latitude.is_finite()
            && (-180.0..=180.0).contains(&self.longitude)
            && (-90.0..=90.0).contains(&self.latitude)
    }
}

// ---------------------------------------------------------------------------
// Place
// ---------------------------------------------------------------------------

/// A point of interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Place {
    /// Unique place identifier.
    pub id: PlaceId,
    /// Display name.
    pub name: String,
    /// Canonical category name from the taxonomy.
    pub category: String,
    /// Subcategory name, a child of `category` in the taxonomy.
    pub subcategory: String,
    /// Street address. Never absent; empty when the source has none.
    #[serde(default)]
    pub address: String,
    /// Search keywords matched by the name filter alongside `name`.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Location of the place.
    pub location: Coordinate,
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// One entry of the closed category taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Category {
    /// Canonical name stored on places, e.g. `shopping_places`.
    pub name: String,
    /// Alternative spellings accepted by the category filter, e.g. `shopping`.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Valid subcategory names under this category.
    #[serde(default)]
    pub subcategories: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_range_checks() {
        assert!(Coordinate::new(77.1025, 28.7041).is_valid());
        assert!(Coordinate::new(180.0, -90.0).is_valid());
        assert!(!Coordinate::new(180.5, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, 90.1).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn place_address_defaults_to_empty() {
        let json = serde_json::json!({
            "id": 17_576_066,
            "name": "Pamicy Store",
            "category": "shopping_places",
            "subcategory": "other_shopping_centres",
            "location": { "longitude": 86.434_04, "latitude": 23.796_692 }
        });
        let place: Result<Place, _> = serde_json::from_value(json);
        assert!(place.is_ok());
        if let Ok(place) = place {
            assert_eq!(place.address, "");
            assert!(place.keywords.is_empty());
            assert_eq!(place.id, PlaceId(17_576_066));
        }
    }
}

//! Enumeration types for the Lepton query service.

use core::fmt;
use core::str::FromStr;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Place fields
// ---------------------------------------------------------------------------

/// A property a client may request on each emitted place feature.
///
/// `Id`, `Name`, and `Category` are always emitted. The remaining variants
/// are only emitted when listed in the request's `fields` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum PlaceField {
    /// Stable place identifier.
    Id,
    /// Display name.
    Name,
    /// Canonical category name, e.g. `shopping_places`.
    Category,
    /// Street address; an empty string when the source has none.
    Address,
    /// Subcategory within the category.
    Subcategory,
    /// Search keywords attached to the place.
    Keywords,
    /// Distance in metres from the catchment centre (catchment listings only).
    Distance,
}

impl PlaceField {
    /// Fields emitted on every feature regardless of the request.
    pub const ALWAYS: [Self; 3] = [Self::Id, Self::Name, Self::Category];

    /// The wire name of the field.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Category => "category",
            Self::Address => "address",
            Self::Subcategory => "subcategory",
            Self::Keywords => "keywords",
            Self::Distance => "distance",
        }
    }

    /// Whether this field is always emitted.
    pub const fn is_always(self) -> bool {
        matches!(self, Self::Id | Self::Name | Self::Category)
    }
}

impl fmt::Display for PlaceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a field name is not part of [`PlaceField`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownField(pub String);

impl fmt::Display for UnknownField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown field '{}'", self.0)
    }
}

impl std::error::Error for UnknownField {}

impl FromStr for PlaceField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "category" => Ok(Self::Category),
            "address" => Ok(Self::Address),
            "subcategory" => Ok(Self::Subcategory),
            "keywords" => Ok(Self::Keywords),
            "distance" => Ok(Self::Distance),
            _ => Err(UnknownField(s.trim().to_owned())),
        }
    }
}

/// The set of optional fields requested by a client.
///
/// Always-present fields are dropped on insertion so the set only ever
/// holds the projection-relevant extras.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet(BTreeSet<PlaceField>);

impl FieldSet {
    /// An empty projection (only the always-present fields).
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Parse a comma-separated list such as `address,subcategory`.
    ///
    /// Blank segments are skipped and duplicates collapse.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownField`] for the first unrecognised name.
    pub fn parse_list(list: &str) -> Result<Self, UnknownField> {
        let mut set = Self::new();
        for segment in list.split(',').filter(|s| !s.trim().is_empty()) {
            set.insert(segment.parse()?);
        }
        Ok(set)
    }

    /// Add a field to the projection.
    pub fn insert(&mut self, field: PlaceField) {
        if !field.is_always() {
            self.0.insert(field);
        }
    }

    /// Whether the field should be emitted.
    pub fn contains(&self, field: PlaceField) -> bool {
        field.is_always() || self.0.contains(&field)
    }

    /// Iterate the optional fields in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = PlaceField> + '_ {
        self.0.iter().copied()
    }

    /// Whether no optional field was requested.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<PlaceField> for FieldSet {
    fn from_iter<I: IntoIterator<Item = PlaceField>>(iter: I) -> Self {
        let mut set = Self::new();
        for field in iter {
            set.insert(field);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_field_list() {
        let fields = FieldSet::parse_list("address,subcategory").unwrap_or_default();
        assert!(fields.contains(PlaceField::Address));
        assert!(fields.contains(PlaceField::Subcategory));
        assert!(!fields.contains(PlaceField::Keywords));
    }

    #[test]
    fn always_fields_are_implicit() {
        let fields = FieldSet::new();
        assert!(fields.contains(PlaceField::Id));
        assert!(fields.contains(PlaceField::Name));
        assert!(fields.contains(PlaceField::Category));
        assert!(fields.is_empty());
    }

    #[test]
    fn requesting_always_fields_is_harmless() {
        let fields = FieldSet::parse_list("id, name ,category").unwrap_or_default();
        assert!(fields.is_empty());
    }

    #[test]
    fn blank_and_duplicate_segments_collapse() {
        let fields = FieldSet::parse_list("address,,address, ").unwrap_or_default();
        assert_eq!(fields.iter().collect::<Vec<_>>(), vec![PlaceField::Address]);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = FieldSet::parse_list("address,phone");
        assert_eq!(err, Err(UnknownField(String::from("phone"))));
    }

    #[test]
    fn field_names_are_case_insensitive() {
        assert_eq!("Address".parse::<PlaceField>(), Ok(PlaceField::Address));
    }
}

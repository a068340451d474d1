//! Spatial and attribute index over the place dataset.
//!
//! Places are held in a `Vec` sorted by id, and an R-tree maps each
//! place's longitude/latitude to its position in that `Vec`. Both are
//! built once at load time and only read afterwards.
//!
//! A query first asks the R-tree for candidates inside the boundary's
//! search windows, then applies the exact closed-boundary containment
//! test and the attribute filters. Surviving positions are collected in a
//! [`BTreeSet`], so the result is deduplicated and ordered by ascending
//! place id for any boundary.

use std::collections::{BTreeMap, BTreeSet};

use lepton_geo::Boundary;
use lepton_types::{Place, PlaceId};
use rstar::primitives::GeomWithData;
use rstar::{AABB, RTree};

use crate::error::CatalogError;
use crate::taxonomy::CategoryMatch;

type IndexedPoint = GeomWithData<[f64; 2], usize>;

/// Attribute predicates applied after the spatial filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceFilter {
    /// Category predicate; `None` matches every category.
    pub category: Option<CategoryMatch>,
    /// Lower-cased substring searched in the name and keywords; `None`
    /// matches every place.
    pub name: Option<String>,
}

impl PlaceFilter {
    /// A filter that keeps every place.
    pub const fn any() -> Self {
        Self {
            category: None,
            name: None,
        }
    }

    /// Set the name predicate. Blank input means "no name filter".
    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        let trimmed = name.trim();
        self.name = (!trimmed.is_empty()).then(|| trimmed.to_lowercase());
        self
    }

    /// Set the category predicate.
    #[must_use]
    pub fn with_category(mut self, category: CategoryMatch) -> Self {
        self.category = Some(category);
        self
    }
}

#[derive(Debug, Clone)]
struct Entry {
    place: Place,
    name_lower: String,
    keywords_lower: Vec<String>,
}

impl Entry {
    fn matches(&self, filter: &PlaceFilter) -> bool {
        let category_ok = match &filter.category {
            None => true,
            Some(CategoryMatch::Category(c)) => self.place.category == *c,
            Some(CategoryMatch::Subcategory(s)) => self.place.subcategory == *s,
            Some(CategoryMatch::Unknown) => false,
        };

        category_ok
            && filter.name.as_deref().is_none_or(|needle| {
                self.name_lower.contains(needle)
                    || self.keywords_lower.iter().any(|k| k.contains(needle))
            })
    }
}

/// Immutable spatial + attribute index of places.
#[derive(Debug, Clone, Default)]
pub struct PlaceIndex {
    entries: Vec<Entry>,
    tree: RTree<IndexedPoint>,
}

impl PlaceIndex {
    /// Build the index.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicatePlace`] for repeated ids and
    /// [`CatalogError::InvalidCoordinate`] for non-finite or out-of-range
    /// coordinates.
    pub fn build(mut places: Vec<Place>) -> Result<Self, CatalogError> {
        places.sort_by_key(|p| p.id);

        let mut entries = Vec::with_capacity(places.len());
        let mut points = Vec::with_capacity(places.len());
        let mut previous: Option<PlaceId> = None;

        for (pos, place) in places.into_iter().enumerate() {
            if previous == Some(place.id) {
                return Err(CatalogError::DuplicatePlace(place.id));
            }
            if !place.location.is_valid() {
                return Err(CatalogError::InvalidCoordinate(place.id));
            }
            previous = Some(place.id);

            points.push(GeomWithData::new(
                [place.location.longitude, place.location.latitude],
                pos,
            ));
            entries.push(Entry {
                name_lower: place.name.to_lowercase(),
                keywords_lower: place.keywords.iter().map(|k| k.to_lowercase()).collect(),
                place,
            });
        }

        Ok(Self {
            entries,
            tree: RTree::bulk_load(points),
        })
    }

    /// Number of indexed places.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no place.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count places per canonical category.
    pub fn category_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.place.category.as_str()).or_insert(0_usize) += 1;
        }
        counts
    }

    /// All places inside `boundary` that pass `filter`, ascending by id.
    ///
    /// An empty boundary yields an empty result; an empty result is never
    /// an error at this layer.
    pub fn query(&self, boundary: &Boundary, filter: &PlaceFilter) -> Vec<&Place> {
        let mut hits = BTreeSet::new();

        for window in boundary.search_windows() {
            let envelope = AABB::from_corners(
                [window.min().x, window.min().y],
                [window.max().x, window.max().y],
            );
            for candidate in self.tree.locate_in_envelope(&envelope) {
                let pos = candidate.data;
                if hits.contains(&pos) {
                    continue;
                }
                if let Some(entry) = self.entries.get(pos)
                    && entry.matches(filter)
                    && boundary.contains(entry.place.location)
                {
                    hits.insert(pos);
                }
            }
        }

        tracing::debug!(
            polygons = boundary.polygon_count(),
            hits = hits.len(),
            "Place index query"
        );

        hits.into_iter()
            .filter_map(|pos| self.entries.get(pos))
            .map(|e| &e.place)
            .collect()
    }
}

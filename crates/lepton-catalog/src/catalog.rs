//! The resident reference-data snapshot.
//!
//! A [`Catalog`] bundles the taxonomy, the region tree, and the place
//! index. It is built once, wrapped in an `Arc`, and shared read-only by
//! every request; a refresh builds a fresh catalog and swaps the `Arc`
//! rather than mutating this one.

use chrono::{DateTime, Utc};
use lepton_types::{Category, Place};
use serde::Serialize;

use crate::error::CatalogError;
use crate::index::{PlaceFilter, PlaceIndex};
use crate::region::{Region, RegionTree};
use crate::taxonomy::Taxonomy;

/// Counts describing a loaded catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    /// Number of indexed places.
    pub places: usize,
    /// Number of regions.
    pub regions: usize,
    /// Number of taxonomy categories.
    pub categories: usize,
    /// Where the data came from (file path or database).
    pub source: String,
    /// When the snapshot was built.
    pub loaded_at: DateTime<Utc>,
}

/// Immutable snapshot of all reference data needed to answer queries.
#[derive(Debug, Clone)]
pub struct Catalog {
    taxonomy: Taxonomy,
    regions: RegionTree,
    places: PlaceIndex,
    source: String,
    loaded_at: DateTime<Utc>,
}

impl Catalog {
    /// Build a catalog from raw records, validating every place against
    /// the taxonomy.
    ///
    /// # Errors
    ///
    /// Returns the first [`CatalogError`] raised by taxonomy, region tree,
    /// or place index construction.
    pub fn build(
        categories: Vec<Category>,
        regions: Vec<Region>,
        places: Vec<Place>,
        source: &str,
    ) -> Result<Self, CatalogError> {
        let taxonomy = Taxonomy::new(categories)?;
        for place in &places {
            taxonomy.validate_place(place)?;
        }
        let regions = RegionTree::build(regions)?;
        let places = PlaceIndex::build(places)?;

        let catalog = Self {
            taxonomy,
            regions,
            places,
            source: source.to_owned(),
            loaded_at: Utc::now(),
        };

        tracing::info!(
            places = catalog.places.len(),
            regions = catalog.regions.len(),
            categories = catalog.taxonomy.len(),
            source,
            "Catalog built"
        );

        Ok(catalog)
    }

    /// The region hierarchy.
    pub const fn regions(&self) -> &RegionTree {
        &self.regions
    }

    /// The place index.
    pub const fn places(&self) -> &PlaceIndex {
        &self.places
    }

    /// Translate raw request filters into a [`PlaceFilter`].
    ///
    /// Blank strings are treated as absent. A category filter that names
    /// nothing in the taxonomy yields a filter that matches no place.
    pub fn place_filter(&self, category: Option<&str>, name: Option<&str>) -> PlaceFilter {
        let mut filter = PlaceFilter::any();
        if let Some(category) = category.map(str::trim).filter(|c| !c.is_empty()) {
            filter = filter.with_category(self.taxonomy.resolve(category));
        }
        if let Some(name) = name {
            filter = filter.with_name(name);
        }
        filter
    }

    /// Summary counts for logging.
    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            places: self.places.len(),
            regions: self.regions.len(),
            categories: self.taxonomy.len(),
            source: self.source.clone(),
            loaded_at: self.loaded_at,
        }
    }
}

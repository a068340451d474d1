//! Error types for the `lepton-catalog` crate.
//!
//! All fallible operations in this crate return [`CatalogError`]. Every
//! variant describes reference data that failed validation at load time;
//! nothing in this crate fails while serving a query.

use lepton_types::{PlaceId, RegionId};

/// Errors raised while building a catalog from reference data.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Two places share an identifier.
    #[error("duplicate place id: {0}")]
    DuplicatePlace(PlaceId),

    /// Two regions share an identifier.
    #[error("duplicate region id: {0}")]
    DuplicateRegion(RegionId),

    /// Two taxonomy entries share a canonical name or alias.
    #[error("duplicate category name or alias: {0}")]
    DuplicateCategory(String),

    /// A region names a parent that does not exist.
    #[error("region {region} references unknown parent {parent}")]
    UnknownParent {
        /// The child region.
        region: RegionId,
        /// The missing parent.
        parent: RegionId,
    },

    /// The parent links contain a cycle.
    #[error("region hierarchy contains a cycle through region {0}")]
    RegionCycle(RegionId),

    /// A place's category is not in the taxonomy.
    #[error("place {place} has unknown category '{category}'")]
    UnknownCategory {
        /// The offending place.
        place: PlaceId,
        /// The unrecognised category.
        category: String,
    },

    /// A place's subcategory does not belong to its category.
    #[error("place {place} has subcategory '{subcategory}' outside category '{category}'")]
    UnknownSubcategory {
        /// The offending place.
        place: PlaceId,
        /// The place's category.
        category: String,
        /// The unrecognised subcategory.
        subcategory: String,
    },

    /// A place coordinate is non-finite or out of range.
    #[error("place {0} has an invalid coordinate")]
    InvalidCoordinate(PlaceId),

    /// A region boundary is not a polygon or multi-polygon.
    #[error("region {region} has invalid boundary geometry: {reason}")]
    InvalidGeometry {
        /// The offending region.
        region: RegionId,
        /// What was wrong with it.
        reason: String,
    },

    /// The dataset file could not be read.
    #[error("failed to read dataset: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The dataset file is not valid JSON for the expected layout.
    #[error("failed to parse dataset: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}

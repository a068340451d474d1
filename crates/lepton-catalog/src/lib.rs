//! Resident reference data for the Lepton query service.
//!
//! Everything in this crate is built once at load time and then only read:
//!
//! - [`taxonomy`] -- the closed category taxonomy and category-filter
//!   resolution (canonical names, aliases, subcategories)
//! - [`region`] -- the region hierarchy as an index arena, and the region
//!   resolver that turns a set of region ids into a union [`Boundary`]
//! - [`index`] -- the R-tree backed place index answering "places inside
//!   this boundary matching this filter", ordered by place id
//! - [`catalog`] -- [`Catalog`], the shared snapshot bundling all three
//! - [`dataset`] -- the JSON dataset file format and `GeoJSON` conversion
//! - [`error`] -- load-time validation errors
//!
//! [`Boundary`]: lepton_geo::Boundary

pub mod catalog;
pub mod dataset;
pub mod error;
pub mod index;
pub mod region;
pub mod taxonomy;

// Re-export primary types at crate root.
pub use catalog::{Catalog, CatalogStats};
pub use dataset::{Dataset, RegionRecord, load_file, multi_polygon_from_geojson_str};
pub use error::CatalogError;
pub use index::{PlaceFilter, PlaceIndex};
pub use region::{Region, RegionTree, Resolution, ResolveMode, UnknownRegionMode};
pub use taxonomy::{CategoryMatch, Taxonomy};

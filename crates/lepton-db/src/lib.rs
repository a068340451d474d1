//! `PostgreSQL`/PostGIS loader for the Lepton reference data.
//!
//! The query service keeps its reference data resident in memory. This
//! crate reads the `category`, `region`, and `place` tables once (and on
//! each refresh) and builds a validated
//! [`Catalog`](lepton_catalog::Catalog) from them.
//!
//! # Modules
//!
//! - [`postgres`] -- connection pool and configuration
//! - [`loader`] -- bounded, retried catalog fetch
//! - [`error`] -- shared error type

pub mod error;
pub mod loader;
pub mod postgres;

// Re-export primary types for convenience.
pub use error::DbError;
pub use loader::{CatalogLoader, CategoryRow, PlaceRow, RegionRow};
pub use postgres::{PostgresConfig, PostgresPool};

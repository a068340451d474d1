//! HTTP adapter for the Lepton place and catchment query service.
//!
//! This crate exposes the query engine over Axum:
//!
//! - `GET /geojson/places` -- places in one or more regions
//! - `GET /geojson/catchment` -- catchment polygon around a point
//!
//! Both routes are also mounted under the configured base path. Query
//! failures map to `422` (invalid input), `404` (no results), and `502`
//! (reference data unavailable) with a JSON body
//! `{"error": message, "status": code}`.

pub mod error;
pub mod handlers;
pub mod refresh;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use refresh::spawn_refresh;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::{AppState, CatalogSlot};

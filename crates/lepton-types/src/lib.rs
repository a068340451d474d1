//! Shared type definitions for the Lepton place and catchment query service.
//!
//! Types defined here are used by every other crate in the workspace and
//! flow downstream to `TypeScript` via `ts-rs` for map clients.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe integer wrappers for place and region keys
//! - [`enums`] -- Requestable place fields and the field projection set
//! - [`structs`] -- Places, coordinates, and taxonomy entries

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{FieldSet, PlaceField, UnknownField};
pub use ids::{PlaceId, RegionId};
pub use structs::{Category, Coordinate, Place};

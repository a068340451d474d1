//! Request-time query engine for the Lepton place and catchment service.
//!
//! This crate turns raw query parameters into validated queries, resolves
//! them against a [`Catalog`](lepton_catalog::Catalog) snapshot, and
//! assembles `GeoJSON` responses:
//!
//! - [`request`] parses and validates query strings
//! - [`catchment`] builds geodesic catchment polygons
//! - [`assemble`] projects fields and applies the empty-result policy
//! - [`engine`] wires the above into place and catchment queries
//! - [`config`] holds the service configuration

pub mod assemble;
pub mod catchment;
pub mod config;
pub mod engine;
pub mod error;
pub mod request;

pub use assemble::{Feature, FeatureAssembler, FeatureCollection};
pub use catchment::{Catchment, CatchmentBuilder};
pub use config::{ConfigError, LeptonConfig, LogFormat, SourceKind};
pub use engine::QueryEngine;
pub use error::QueryError;
pub use request::{CatchmentParams, CatchmentQuery, PlaceParams, PlaceQuery};

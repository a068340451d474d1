//! Request handlers.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/geojson/places` | Places in one or more regions |
//! | `GET` | `/geojson/catchment` | Catchment polygon around a point |
//!
//! Handlers only extract parameters, take a catalog snapshot, and hand
//! both to the [`QueryEngine`].

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use lepton_engine::{
    CatchmentParams, CatchmentQuery, FeatureCollection, PlaceParams, PlaceQuery, QueryEngine,
};

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /geojson/places
// ---------------------------------------------------------------------------

/// Places inside the requested regions, filtered by category and name.
pub async fn get_places(
    State(state): State<Arc<AppState>>,
    params: Result<Query<PlaceParams>, QueryRejection>,
) -> Result<Json<FeatureCollection>, ApiError> {
    let Query(params) = params?;
    let query = PlaceQuery::try_from(params)?;
    let catalog = state.snapshot().await?;
    let engine = QueryEngine::new(&catalog, &state.config);
    Ok(Json(engine.places(&query)?))
}

// ---------------------------------------------------------------------------
// GET /geojson/catchment
// ---------------------------------------------------------------------------

/// The catchment polygon around a point, optionally followed by the places
/// inside it.
pub async fn get_catchment(
    State(state): State<Arc<AppState>>,
    params: Result<Query<CatchmentParams>, QueryRejection>,
) -> Result<Json<FeatureCollection>, ApiError> {
    let Query(params) = params?;
    let query = CatchmentQuery::try_from(params)?;
    let catalog = state.snapshot().await?;
    let engine = QueryEngine::new(&catalog, &state.config);
    Ok(Json(engine.catchment(&query)?))
}

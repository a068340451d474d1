//! Axum router construction.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete router.
///
/// Routes are served both at the root and under the configured
/// `server.base_path` (e.g. `/v1/geojson/places`). Responses are
/// gzip-compressed when the client accepts it, and CORS allows any
/// origin.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes = Router::new()
        .route("/geojson/places", get(handlers::get_places))
        .route("/geojson/catchment", get(handlers::get_catchment));

    let mut router = Router::new().merge(routes.clone());
    if let Some(base) = normalize_base_path(&state.config.server.base_path) {
        router = router.nest(&base, routes);
    }

    router
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `"v1/"` → `Some("/v1")`; `""` and `"/"` → `None` (root only).
fn normalize_base_path(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_matches('/');
    (!trimmed.is_empty()).then(|| format!("/{trimmed}"))
}

//! Integration tests for the HTTP endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server, against the sample dataset in `data/`.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use lepton_api::router::build_router;
use lepton_api::state::AppState;
use lepton_catalog::Dataset;
use lepton_engine::LeptonConfig;
use serde_json::{Value, json};
use tower::ServiceExt;

const SAMPLE: &str = include_str!("../../../data/sample-dataset.json");

fn make_test_state() -> Arc<AppState> {
    let catalog = Dataset::parse(SAMPLE).unwrap().into_catalog("sample").unwrap();
    Arc::new(AppState::new(LeptonConfig::default(), catalog))
}

async fn get(state: Arc<AppState>, uri: &str) -> (StatusCode, Value) {
    let app = build_router(state);
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn feature_ids(body: &Value) -> Vec<i64> {
    body["features"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|f| f["properties"]["id"].as_i64())
        .collect()
}

// =============================================================================
// GET /geojson/catchment
// =============================================================================

#[tokio::test]
async fn catchment_without_coordinates_is_422() {
    let (status, body) = get(make_test_state(), "/geojson/catchment").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], 422);
    assert!(body["error"].as_str().unwrap().contains("latitude"));
}

#[tokio::test]
async fn catchment_for_delhi_is_200() {
    let (status, body) = get(
        make_test_state(),
        "/geojson/catchment?latitude=28.7041&longitude=77.1025",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "FeatureCollection");
    let features = body["features"].as_array().unwrap();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0]["geometry"]["type"], "Polygon");
    assert_eq!(
        features[0]["properties"],
        json!({"latitude": 28.7041, "longitude": 77.1025, "radius_m": 1000.0})
    );
}

#[tokio::test]
async fn catchment_with_places_lists_nearby_places() {
    let (status, body) = get(
        make_test_state(),
        "/v1/geojson/catchment?latitude=28.7041&longitude=77.1025&places=true&fields=distance,address",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(feature_ids(&body), vec![20010001, 20010003]);
    let listed = &body["features"][1]["properties"];
    assert_eq!(listed["address"], "Pitampura, Delhi");
    assert!(listed["distance"].as_f64().unwrap() < 1_000.0);
}

#[tokio::test]
async fn catchment_radius_out_of_range_is_422() {
    let (status, _) = get(
        make_test_state(),
        "/geojson/catchment?latitude=28.7&longitude=77.1&radius=0",
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = get(
        make_test_state(),
        "/geojson/catchment?latitude=128.7&longitude=77.1",
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

// =============================================================================
// GET /geojson/places
// =============================================================================

#[tokio::test]
async fn places_across_two_regions_is_200() {
    let (status, body) = get(
        make_test_state(),
        "/geojson/places?name=places&fields=address&category=shopping&region=181328,159333",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(feature_ids(&body), vec![20010001, 20010002, 30020001]);
}

#[tokio::test]
async fn places_in_single_region_is_200() {
    let (status, body) = get(
        make_test_state(),
        "/geojson/places?region=159333&category=shopping&name=places&fields=address",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(feature_ids(&body), vec![20010001, 20010002]);
}

#[tokio::test]
async fn places_in_empty_region_is_404() {
    let (status, body) = get(
        make_test_state(),
        "/geojson/places?name=places&fields=address&category=shopping&region=181",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
}

#[tokio::test]
async fn tailor_query_returns_fixture() {
    let (status, body) = get(
        make_test_state(),
        "/geojson/places?region=167330&category=shopping&name=Tailor&fields=address,subcategory",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let expected = json!({
        "type": "FeatureCollection",
        "features": [
            {
                "geometry": {"type": "Point", "coordinates": [86.43404, 23.796692]},
                "properties": {
                    "id": 17576066,
                    "name": "Pamicy Store",
                    "category": "shopping_places",
                    "address": "",
                    "subcategory": "other_shopping_centres",
                },
            },
            {
                "geometry": {"type": "Point", "coordinates": [86.43404, 23.796692]},
                "properties": {
                    "id": 17576130,
                    "name": "Men Parlour",
                    "category": "shopping_places",
                    "address": "",
                    "subcategory": "shopping_retail_shops",
                },
            },
        ],
    });
    assert_eq!(body, expected);
}

#[tokio::test]
async fn places_without_parameters_is_422() {
    let (status, body) = get(make_test_state(), "/geojson/places").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("region"));
}

#[tokio::test]
async fn places_with_unknown_field_is_422() {
    let (status, _) = get(make_test_state(), "/geojson/places?region=167330&fields=phone").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn places_subtree_mode_reaches_descendants() {
    let (status, body) = get(
        make_test_state(),
        "/v1/geojson/places?region=1&region_mode=subtree&category=health",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(feature_ids(&body), vec![17576302]);
}

#[tokio::test]
async fn base_path_prefix_serves_same_response() {
    let uri = "/geojson/places?region=167330&category=shopping&name=Tailor";
    let (plain_status, plain) = get(make_test_state(), uri).await;
    let (prefixed_status, prefixed) = get(make_test_state(), &format!("/v1{uri}")).await;
    assert_eq!(plain_status, StatusCode::OK);
    assert_eq!(prefixed_status, StatusCode::OK);
    assert_eq!(plain, prefixed);
}

// =============================================================================
// Ambient behaviour
// =============================================================================

#[tokio::test]
async fn unavailable_catalog_is_502() {
    let state = Arc::new(AppState::unavailable(
        LeptonConfig::default(),
        "connection refused",
    ));
    let (status, body) = get(state, "/geojson/places?region=167330").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("connection refused"));
}

#[tokio::test]
async fn responses_are_gzipped_on_request() {
    let app = build_router(make_test_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/geojson/catchment?latitude=28.7041&longitude=77.1025")
                .header(header::ACCEPT_ENCODING, "gzip")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_ENCODING).unwrap(),
        "gzip"
    );
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let app = build_router(make_test_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/geojson/places?region=167330")
                .header(header::ORIGIN, "https://maps.example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = build_router(make_test_state());
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

//! Raw query parameters and their validated counterparts.
//!
//! The parameter structs keep every value as an optional string so that a
//! malformed number surfaces as [`QueryError::InvalidInput`] from this
//! module instead of a framework-specific rejection.

use std::collections::BTreeSet;

use lepton_catalog::{ResolveMode, UnknownRegionMode};
use lepton_types::{Coordinate, FieldSet, PlaceField, RegionId};
use serde::Deserialize;
use validator::Validate;

use crate::error::QueryError;

// ---------------------------------------------------------------------------
// Raw parameters
// ---------------------------------------------------------------------------

/// Query string of `GET /geojson/places`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceParams {
    /// Comma-separated region ids. Required.
    pub region: Option<String>,
    /// `exact` (default) or `subtree`.
    pub region_mode: Option<String>,
    /// Category, alias, or subcategory filter.
    pub category: Option<String>,
    /// Case-insensitive substring filter on name and keywords.
    pub name: Option<String>,
    /// Comma-separated optional fields to emit.
    pub fields: Option<String>,
}

/// Query string of `GET /geojson/catchment`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatchmentParams {
    /// Centre latitude in degrees. Required.
    pub latitude: Option<String>,
    /// Centre longitude in degrees. Required.
    pub longitude: Option<String>,
    /// Radius in metres; the configured default when absent.
    pub radius: Option<String>,
    /// Whether to list the places inside the catchment.
    pub places: Option<String>,
    /// Category filter for the place listing.
    pub category: Option<String>,
    /// Name filter for the place listing.
    pub name: Option<String>,
    /// Optional fields for the place listing.
    pub fields: Option<String>,
}

// ---------------------------------------------------------------------------
// Validated queries
// ---------------------------------------------------------------------------

/// A validated region/place query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceQuery {
    /// Requested regions, deduplicated and ascending.
    pub region_ids: BTreeSet<RegionId>,
    /// How the regions are expanded.
    pub mode: ResolveMode,
    /// Raw category filter.
    pub category: Option<String>,
    /// Raw name filter.
    pub name: Option<String>,
    /// Optional fields to emit.
    pub fields: FieldSet,
}

/// A validated catchment query.
#[derive(Debug, Clone, PartialEq)]
pub struct CatchmentQuery {
    /// Catchment centre.
    pub center: Coordinate,
    /// Requested radius in metres, if any.
    pub radius_m: Option<f64>,
    /// Whether places inside the catchment are listed.
    pub include_places: bool,
    /// Raw category filter.
    pub category: Option<String>,
    /// Raw name filter.
    pub name: Option<String>,
    /// Optional fields to emit on listed places.
    pub fields: FieldSet,
}

#[derive(Debug, Validate)]
struct CenterInput {
    #[validate(range(min = -90.0, max = 90.0))]
    latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    longitude: f64,
}

impl TryFrom<PlaceParams> for PlaceQuery {
    type Error = QueryError;

    fn try_from(params: PlaceParams) -> Result<Self, Self::Error> {
        let region = present(params.region.as_deref())
            .ok_or_else(|| QueryError::invalid("query parameter 'region' is required"))?;
        let region_ids = parse_region_ids(region)?;

        let mode = match present(params.region_mode.as_deref()) {
            Some(raw) => raw
                .parse()
                .map_err(|e: UnknownRegionMode| QueryError::InvalidInput(e.to_string()))?,
            None => ResolveMode::default(),
        };

        let fields = parse_fields(params.fields.as_deref())?;
        if fields.contains(PlaceField::Distance) {
            return Err(QueryError::invalid(
                "field 'distance' is only available on catchment queries",
            ));
        }

        Ok(Self {
            region_ids,
            mode,
            category: params.category,
            name: params.name,
            fields,
        })
    }
}

impl TryFrom<CatchmentParams> for CatchmentQuery {
    type Error = QueryError;

    fn try_from(params: CatchmentParams) -> Result<Self, Self::Error> {
        let (Some(latitude), Some(longitude)) = (
            present(params.latitude.as_deref()),
            present(params.longitude.as_deref()),
        ) else {
            return Err(QueryError::invalid(
                "query parameters 'latitude' and 'longitude' are required",
            ));
        };

        let input = CenterInput {
            latitude: parse_float("latitude", latitude)?,
            longitude: parse_float("longitude", longitude)?,
        };
        input
            .validate()
            .map_err(|e| QueryError::invalid(format!("coordinate out of range: {e}")))?;

        let radius_m = present(params.radius.as_deref())
            .map(|raw| parse_float("radius", raw))
            .transpose()?;

        let include_places = match present(params.places.as_deref()) {
            Some(raw) => parse_bool("places", raw)?,
            None => false,
        };

        Ok(Self {
            center: Coordinate::new(input.longitude, input.latitude),
            radius_m,
            include_places,
            category: params.category,
            name: params.name,
            fields: parse_fields(params.fields.as_deref())?,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_region_ids(raw: &str) -> Result<BTreeSet<RegionId>, QueryError> {
    let ids = raw
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| {
            s.parse::<RegionId>()
                .map_err(|e| QueryError::invalid(format!("invalid region id '{}': {e}", s.trim())))
        })
        .collect::<Result<BTreeSet<_>, _>>()?;

    if ids.is_empty() {
        return Err(QueryError::invalid("query parameter 'region' is required"));
    }
    Ok(ids)
}

fn parse_fields(raw: Option<&str>) -> Result<FieldSet, QueryError> {
    raw.map_or_else(
        || Ok(FieldSet::new()),
        |list| FieldSet::parse_list(list).map_err(|e| QueryError::InvalidInput(e.to_string())),
    )
}

// NaN and infinities pass a range check, so reject them while parsing.
fn parse_float(name: &str, raw: &str) -> Result<f64, QueryError> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| QueryError::invalid(format!("'{name}' must be a finite number, got '{raw}'")))
}

fn parse_bool(name: &str, raw: &str) -> Result<bool, QueryError> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(QueryError::invalid(format!("'{name}' must be a boolean, got '{raw}'"))),
    }
}

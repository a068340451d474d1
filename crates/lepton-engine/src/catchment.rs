//! Catchment construction: a geodesic buffer around a point, packaged as
//! both an output polygon and a search boundary.

use geo::Polygon;
use lepton_geo::{Boundary, MIN_SEGMENTS, buffer_point};
use lepton_types::Coordinate;

use crate::config::CatchmentConfig;
use crate::error::QueryError;

/// A built catchment.
#[derive(Debug, Clone)]
pub struct Catchment {
    /// The point the catchment was built around.
    pub center: Coordinate,
    /// Radius in metres.
    pub radius_m: f64,
    /// The buffered polygon, emitted as the first response feature.
    pub polygon: Polygon<f64>,
    /// The same polygon as a place-index search boundary.
    pub boundary: Boundary,
}

/// Builds catchments with a configured default and maximum radius.
#[derive(Debug, Clone, Copy)]
pub struct CatchmentBuilder {
    default_radius_m: f64,
    max_radius_m: f64,
    segments: usize,
}

impl Default for CatchmentBuilder {
    fn default() -> Self {
        Self::new(&CatchmentConfig::default())
    }
}

impl CatchmentBuilder {
    /// Create a builder from the `catchment` config section. Segment counts
    /// below the kernel minimum are raised to it.
    pub fn new(config: &CatchmentConfig) -> Self {
        Self {
            default_radius_m: config.default_radius_m,
            max_radius_m: config.max_radius_m,
            segments: config.segments.max(MIN_SEGMENTS),
        }
    }

    /// Pick the effective radius for a request.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidInput`] unless the radius lies in
    /// `(0, max_radius_m]`.
    pub fn radius(&self, requested: Option<f64>) -> Result<f64, QueryError> {
        let radius = requested.unwrap_or(self.default_radius_m);
        if radius.is_finite() && radius > 0.0 && radius <= self.max_radius_m {
            Ok(radius)
        } else {
            Err(QueryError::invalid(format!(
                "radius must be greater than 0 and at most {} metres, got {radius}",
                self.max_radius_m
            )))
        }
    }

    /// Build the catchment around `center`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidInput`] for an invalid centre or
    /// radius.
    pub fn build(&self, center: Coordinate, radius_m: Option<f64>) -> Result<Catchment, QueryError> {
        if !center.is_valid() {
            return Err(QueryError::invalid(format!(
                "coordinate out of range: latitude {}, longitude {}",
                center.latitude, center.longitude
            )));
        }
        let radius_m = self.radius(radius_m)?;
        let polygon = buffer_point(center, radius_m, self.segments);
        let boundary = Boundary::from_polygon(polygon.clone());

        tracing::debug!(
            latitude = center.latitude,
            longitude = center.longitude,
            radius_m,
            vertices = polygon.exterior().0.len(),
            "Built catchment"
        );

        Ok(Catchment {
            center,
            radius_m,
            polygon,
            boundary,
        })
    }
}

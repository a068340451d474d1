//! The query engine: request → boundary → places → features.

use lepton_catalog::Catalog;
use lepton_geo::distance;

use crate::assemble::{FeatureAssembler, FeatureCollection};
use crate::catchment::CatchmentBuilder;
use crate::config::LeptonConfig;
use crate::error::QueryError;
use crate::request::{CatchmentQuery, PlaceQuery};

/// Answers place and catchment queries against one catalog snapshot.
///
/// Borrowing the catalog keeps the engine cheap to build per request;
/// callers hold the `Arc<Catalog>` for the duration of the query.
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine<'a> {
    catalog: &'a Catalog,
    catchments: CatchmentBuilder,
    assembler: FeatureAssembler,
}

impl<'a> QueryEngine<'a> {
    /// Create an engine over `catalog` configured from `config`.
    pub fn new(catalog: &'a Catalog, config: &LeptonConfig) -> Self {
        Self {
            catalog,
            catchments: CatchmentBuilder::new(&config.catchment),
            assembler: FeatureAssembler::new(&config.output),
        }
    }

    /// Places inside the union of the requested regions that pass the
    /// category and name filters, ordered by ascending id.
    ///
    /// Unknown region ids contribute nothing; if no place survives the
    /// result is [`QueryError::NoResults`].
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::NoResults`] for an empty result.
    pub fn places(&self, query: &PlaceQuery) -> Result<FeatureCollection, QueryError> {
        let resolution = self.catalog.regions().resolve(&query.region_ids, query.mode);
        let filter = self
            .catalog
            .place_filter(query.category.as_deref(), query.name.as_deref());
        let places = self.catalog.places().query(&resolution.boundary, &filter);

        tracing::debug!(
            regions = ?query.region_ids,
            unknown_regions = ?resolution.unknown,
            category = query.category.as_deref(),
            name = query.name.as_deref(),
            matched = places.len(),
            "Place query"
        );

        self.assembler.places(&places, &query.fields)
    }

    /// The catchment polygon around the query centre, followed by the
    /// places inside it when `include_places` is set.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidInput`] for an out-of-range radius.
    pub fn catchment(&self, query: &CatchmentQuery) -> Result<FeatureCollection, QueryError> {
        let catchment = self.catchments.build(query.center, query.radius_m)?;

        let places = if query.include_places {
            let filter = self
                .catalog
                .place_filter(query.category.as_deref(), query.name.as_deref());
            self.catalog
                .places()
                .query(&catchment.boundary, &filter)
                .into_iter()
                .map(|place| (place, distance(query.center, place.location)))
                .collect()
        } else {
            Vec::new()
        };

        tracing::debug!(
            latitude = query.center.latitude,
            longitude = query.center.longitude,
            radius_m = catchment.radius_m,
            places = places.len(),
            "Catchment query"
        );

        Ok(self.assembler.catchment(&catchment, &places, &query.fields))
    }
}

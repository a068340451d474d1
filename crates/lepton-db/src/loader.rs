//! Catalog loading from the `category`, `region`, and `place` tables.
//!
//! Each table is fetched with a single query under a bounded timeout.
//! Region boundaries are read as `GeoJSON` text (`ST_AsGeoJSON`) and
//! converted with the same code path as dataset files.

use std::future::Future;
use std::time::Duration;

use lepton_catalog::{Catalog, Region, multi_polygon_from_geojson_str};
use lepton_types::{Category, Coordinate, Place, PlaceId, RegionId};
use sqlx::PgPool;

use crate::error::DbError;

/// Default bound on each fetch.
const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Reads the reference tables into a [`Catalog`].
pub struct CatalogLoader<'a> {
    pool: &'a PgPool,
    fetch_timeout: Duration,
}

impl<'a> CatalogLoader<'a> {
    /// Create a loader bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            pool,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// Set the bound applied to each fetch.
    #[must_use]
    pub const fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Load and validate a full catalog, retrying once on a transient
    /// failure.
    ///
    /// # Errors
    ///
    /// Returns the second attempt's [`DbError`] if both attempts fail, or
    /// the first error immediately if it is not transient.
    pub async fn load(&self) -> Result<Catalog, DbError> {
        retry_once(|| self.load_once()).await
    }

    async fn load_once(&self) -> Result<Catalog, DbError> {
        let categories = self.fetch_categories().await?;
        let regions = self.fetch_regions().await?;
        let places = self.fetch_places().await?;
        Ok(Catalog::build(categories, regions, places, "postgres")?)
    }

    /// Fetch the category taxonomy.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] or [`DbError::Timeout`].
    pub async fn fetch_categories(&self) -> Result<Vec<Category>, DbError> {
        let rows = self
            .bounded(
                "fetch categories",
                sqlx::query_as::<_, CategoryRow>(
                    r"SELECT name, aliases, subcategories
                      FROM category
                      ORDER BY name",
                )
                .fetch_all(self.pool),
            )
            .await?;

        tracing::debug!(count = rows.len(), "Fetched categories");
        Ok(rows.into_iter().map(Category::from).collect())
    }

    /// Fetch all regions with their boundaries.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`], [`DbError::Timeout`], or
    /// [`DbError::Catalog`] for a boundary that is not polygonal.
    pub async fn fetch_regions(&self) -> Result<Vec<Region>, DbError> {
        let rows = self
            .bounded(
                "fetch regions",
                sqlx::query_as::<_, RegionRow>(
                    r"SELECT id, parent_id, name, ST_AsGeoJSON(boundary_geom) AS boundary
                      FROM region
                      ORDER BY id",
                )
                .fetch_all(self.pool),
            )
            .await?;

        tracing::debug!(count = rows.len(), "Fetched regions");
        rows.into_iter()
            .map(|row| {
                let id = RegionId(row.id);
                Ok(Region {
                    boundary: multi_polygon_from_geojson_str(id, &row.boundary)?,
                    id,
                    parent_id: row.parent_id.map(RegionId),
                    name: row.name,
                })
            })
            .collect()
    }

    /// Fetch all places.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] or [`DbError::Timeout`].
    pub async fn fetch_places(&self) -> Result<Vec<Place>, DbError> {
        let rows = self
            .bounded(
                "fetch places",
                sqlx::query_as::<_, PlaceRow>(
                    r"SELECT id, name, category, subcategory, address, keywords,
                             ST_X(geom) AS longitude, ST_Y(geom) AS latitude
                      FROM place
                      ORDER BY id",
                )
                .fetch_all(self.pool),
            )
            .await?;

        tracing::debug!(count = rows.len(), "Fetched places");
        Ok(rows.into_iter().map(Place::from).collect())
    }

    async fn bounded<T, F>(&self, operation: &'static str, fetch: F) -> Result<T, DbError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.fetch_timeout, fetch).await {
            Ok(result) => Ok(result?),
            Err(_elapsed) => Err(DbError::Timeout {
                operation,
                after_ms: self.fetch_timeout.as_millis(),
            }),
        }
    }
}

/// Run `attempt`, and run it a second time only if the first failure is
/// transient. The second result is returned as is.
async fn retry_once<T, F, Fut>(mut attempt: F) -> Result<T, DbError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbError>>,
{
    match attempt().await {
        Err(first) if first.is_transient() => {
            tracing::warn!(error = %first, "Catalog load failed, retrying once");
            attempt().await
        }
        result => result,
    }
}

/// A row from the `category` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryRow {
    /// Canonical category name.
    pub name: String,
    /// Accepted alternative names.
    pub aliases: Vec<String>,
    /// Valid subcategory names.
    pub subcategories: Vec<String>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            name: row.name,
            aliases: row.aliases,
            subcategories: row.subcategories,
        }
    }
}

/// A row from the `region` table with its boundary as `GeoJSON` text.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RegionRow {
    /// Region id.
    pub id: i64,
    /// Parent region id.
    pub parent_id: Option<i64>,
    /// Display name.
    pub name: String,
    /// `ST_AsGeoJSON(boundary_geom)`.
    pub boundary: String,
}

/// A row from the `place` table with its point split into components.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlaceRow {
    /// Place id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Canonical category.
    pub category: String,
    /// Subcategory.
    pub subcategory: String,
    /// Address; `NULL` becomes an empty string.
    pub address: Option<String>,
    /// Search keywords.
    pub keywords: Vec<String>,
    /// `ST_X(geom)`.
    pub longitude: f64,
    /// `ST_Y(geom)`.
    pub latitude: f64,
}

impl From<PlaceRow> for Place {
    fn from(row: PlaceRow) -> Self {
        Self {
            id: PlaceId(row.id),
            name: row.name,
            category: row.category,
            subcategory: row.subcategory,
            address: row.address.unwrap_or_default(),
            keywords: row.keywords,
            location: Coordinate::new(row.longitude, row.latitude),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use lepton_catalog::CatalogError;

    use super::*;

    fn timeout() -> DbError {
        DbError::Timeout {
            operation: "fetch regions",
            after_ms: 10,
        }
    }

    #[tokio::test]
    async fn transient_failure_is_retried_exactly_once() {
        let attempts = &AtomicUsize::new(0);
        let result: Result<(), DbError> = retry_once(move || async move {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err(timeout())
        })
        .await;
        assert!(matches!(result, Err(DbError::Timeout { .. })));
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn second_attempt_can_succeed() {
        let attempts = &AtomicUsize::new(0);
        let result = retry_once(move || async move {
            if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(timeout())
            } else {
                Ok(7)
            }
        })
        .await;
        assert_eq!(result.ok(), Some(7));
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalid_data_is_not_retried() {
        let attempts = &AtomicUsize::new(0);
        let result: Result<(), DbError> = retry_once(move || async move {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err(DbError::Catalog(CatalogError::DuplicateRegion(RegionId(181))))
        })
        .await;
        assert!(matches!(result, Err(DbError::Catalog(_))));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn null_address_becomes_empty() {
        let place = Place::from(PlaceRow {
            id: 17576066,
            name: String::from("Pamicy Store"),
            category: String::from("shopping_places"),
            subcategory: String::from("other_shopping_centres"),
            address: None,
            keywords: vec![String::from("tailor")],
            longitude: 86.43404,
            latitude: 23.796692,
        });
        assert_eq!(place.id, PlaceId(17576066));
        assert!(place.address.is_empty());
        assert_eq!(place.location, Coordinate::new(86.43404, 23.796692));
    }

    #[test]
    fn timeout_is_transient_but_bad_data_is_not() {
        let timeout = DbError::Timeout {
            operation: "fetch places",
            after_ms: 10,
        };
        assert!(timeout.is_transient());
        assert!(timeout.to_string().contains("fetch places"));

        let config = DbError::Config(String::from("bad url"));
        assert!(!config.is_transient());
        assert!(!DbError::Postgres(sqlx::Error::RowNotFound).is_transient());
        assert!(DbError::Postgres(sqlx::Error::PoolTimedOut).is_transient());
    }
}

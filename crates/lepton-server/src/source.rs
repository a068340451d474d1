//! Where the catalog is loaded from: a dataset file or PostGIS.

use std::path::PathBuf;
use std::time::Duration;

use lepton_catalog::{Catalog, CatalogError, load_file};
use lepton_db::{CatalogLoader, DbError, PostgresConfig, PostgresPool};
use lepton_engine::SourceKind;
use lepton_engine::config::SourceConfig;

/// Errors raised while loading the catalog.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The dataset file was unreadable or invalid.
    #[error("dataset file: {0}")]
    File(#[from] CatalogError),

    /// The database load failed.
    #[error("database: {0}")]
    Db(#[from] DbError),

    /// The blocking file load task panicked or was cancelled.
    #[error("load task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// A configured catalog source. Cheap to clone; the refresh task holds
/// its own copy.
#[derive(Debug, Clone)]
pub enum CatalogSource {
    /// A JSON dataset file.
    File(PathBuf),
    /// A PostGIS database.
    Postgres {
        /// Connection pool.
        pool: PostgresPool,
        /// Bound on each fetch.
        fetch_timeout: Duration,
    },
}

impl CatalogSource {
    /// Build the source named by the `source` config section.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Db`] if the database URL is invalid.
    pub fn from_config(config: &SourceConfig) -> Result<Self, SourceError> {
        match config.kind {
            SourceKind::File => Ok(Self::File(PathBuf::from(&config.dataset_path))),
            SourceKind::Postgres => {
                let pg = PostgresConfig::new(&config.postgres_url)
                    .with_max_connections(config.max_connections);
                Ok(Self::Postgres {
                    pool: PostgresPool::connect(&pg)?,
                    fetch_timeout: Duration::from_millis(config.fetch_timeout_ms),
                })
            }
        }
    }

    /// Short description for logs.
    pub fn describe(&self) -> String {
        match self {
            Self::File(path) => format!("file:{}", path.display()),
            Self::Postgres { .. } => String::from("postgres"),
        }
    }

    /// Load a fresh catalog.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] describing why the load failed.
    pub async fn load(&self) -> Result<Catalog, SourceError> {
        match self {
            Self::File(path) => {
                let path = path.clone();
                Ok(tokio::task::spawn_blocking(move || load_file(&path)).await??)
            }
            Self::Postgres {
                pool,
                fetch_timeout,
            } => Ok(CatalogLoader::new(pool.pool())
                .with_fetch_timeout(*fetch_timeout)
                .load()
                .await?),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_path() -> String {
        format!("{}/../../data/sample-dataset.json", env!("CARGO_MANIFEST_DIR"))
    }

    #[tokio::test]
    async fn file_source_loads_sample_dataset() {
        let config = SourceConfig {
            dataset_path: sample_path(),
            ..SourceConfig::default()
        };
        let source = CatalogSource::from_config(&config).unwrap();
        assert!(source.describe().starts_with("file:"));

        let catalog = source.load().await.unwrap();
        let stats = catalog.stats();
        assert_eq!(stats.places, 8);
        assert_eq!(stats.regions, 5);
        assert_eq!(stats.categories, 3);
    }

    #[tokio::test]
    async fn missing_file_is_file_error() {
        let source = CatalogSource::File(PathBuf::from("/nonexistent/lepton.json"));
        let result = source.load().await;
        assert!(matches!(result, Err(SourceError::File(CatalogError::Io { .. }))));
    }

    #[tokio::test]
    async fn postgres_source_with_bad_url_is_db_error() {
        let config = SourceConfig {
            kind: SourceKind::Postgres,
            postgres_url: String::from("not a url"),
            ..SourceConfig::default()
        };
        let result = CatalogSource::from_config(&config);
        assert!(matches!(result, Err(SourceError::Db(DbError::Config(_)))));
    }
}

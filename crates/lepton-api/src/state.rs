//! Shared application state for the HTTP server.
//!
//! [`AppState`] holds the service configuration and the current catalog
//! snapshot. Handlers clone the snapshot's [`Arc`] and release the lock
//! before querying, so a refresh swapping in a new catalog never blocks
//! or tears an in-flight request.

use std::sync::Arc;

use lepton_catalog::Catalog;
use lepton_engine::{LeptonConfig, QueryError};
use tokio::sync::RwLock;

/// The catalog currently served, or why there is none.
#[derive(Debug, Clone)]
pub enum CatalogSlot {
    /// A loaded catalog.
    Ready(Arc<Catalog>),
    /// No catalog has loaded yet; holds the last load error.
    Unavailable(String),
}

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Debug)]
pub struct AppState {
    /// Service configuration.
    pub config: LeptonConfig,
    catalog: RwLock<CatalogSlot>,
}

impl AppState {
    /// Create state serving `catalog`.
    pub fn new(config: LeptonConfig, catalog: Catalog) -> Self {
        Self {
            config,
            catalog: RwLock::new(CatalogSlot::Ready(Arc::new(catalog))),
        }
    }

    /// Create state with no catalog yet. Queries fail with
    /// [`QueryError::Upstream`] until [`AppState::replace`] succeeds.
    pub fn unavailable(config: LeptonConfig, reason: impl Into<String>) -> Self {
        Self {
            config,
            catalog: RwLock::new(CatalogSlot::Unavailable(reason.into())),
        }
    }

    /// The current catalog snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Upstream`] if no catalog has loaded.
    pub async fn snapshot(&self) -> Result<Arc<Catalog>, QueryError> {
        match &*self.catalog.read().await {
            CatalogSlot::Ready(catalog) => Ok(Arc::clone(catalog)),
            CatalogSlot::Unavailable(reason) => Err(QueryError::Upstream(format!(
                "reference data unavailable: {reason}"
            ))),
        }
    }

    /// Swap in a freshly loaded catalog.
    pub async fn replace(&self, catalog: Catalog) {
        let stats = catalog.stats();
        *self.catalog.write().await = CatalogSlot::Ready(Arc::new(catalog));
        tracing::info!(
            places = stats.places,
            regions = stats.regions,
            source = %stats.source,
            "Catalog snapshot replaced"
        );
    }

    /// Record a failed load. A loaded catalog is kept; otherwise the
    /// reason reported to clients is updated.
    pub async fn record_failure(&self, reason: String) {
        let mut slot = self.catalog.write().await;
        match &*slot {
            CatalogSlot::Ready(_) => {
                tracing::warn!(error = %reason, "Catalog refresh failed, keeping previous snapshot");
            }
            CatalogSlot::Unavailable(_) => {
                tracing::warn!(error = %reason, "Catalog still unavailable");
                *slot = CatalogSlot::Unavailable(reason);
            }
        }
    }
}

//! Error types for the data layer.
//!
//! All errors are propagated via [`DbError`], which wraps the underlying
//! [`sqlx`] errors and catalog validation failures with context about
//! which fetch failed.

use lepton_catalog::CatalogError;

/// Errors that can occur while loading reference data from `PostgreSQL`.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `PostgreSQL` operation failed.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// A `PostgreSQL` migration failed.
    #[error("PostgreSQL migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A fetch did not complete within the configured bound.
    #[error("{operation} timed out after {after_ms} ms")]
    Timeout {
        /// Which fetch timed out.
        operation: &'static str,
        /// The bound that was exceeded.
        after_ms: u128,
    },

    /// The rows loaded but do not form a valid catalog.
    #[error("invalid reference data: {0}")]
    Catalog(#[from] CatalogError),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DbError {
    /// Whether a second attempt could plausibly succeed.
    ///
    /// Connection failures and timeouts are transient; bad data and bad
    /// configuration are not.
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. }
                | Self::Postgres(
                    sqlx::Error::Io(_)
                        | sqlx::Error::PoolTimedOut
                        | sqlx::Error::PoolClosed
                        | sqlx::Error::Tls(_)
                        | sqlx::Error::Protocol(_)
                        | sqlx::Error::WorkerCrashed
                )
        )
    }
}

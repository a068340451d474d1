//! Error taxonomy for request-time query handling.

/// Why a query produced no feature collection.
///
/// The three variants are kept distinct so the HTTP layer can map them to
/// different status codes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// Missing or malformed request parameters. Never retried.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A well-formed query whose result set is empty, including queries
    /// naming regions that do not exist.
    #[error("no places matched the query")]
    NoResults,

    /// The backing data store failed or timed out.
    #[error("upstream failure: {0}")]
    Upstream(String),
}

impl QueryError {
    /// Shorthand for [`QueryError::InvalidInput`].
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

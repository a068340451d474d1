//! Error types for the HTTP layer.
//!
//! [`ApiError`] converts query failures into HTTP responses via its
//! [`IntoResponse`] implementation.

use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use lepton_engine::QueryError;

/// Errors returned by request handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The engine rejected or could not answer the query.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// The query string itself could not be decoded.
    #[error("malformed query string: {0}")]
    Rejection(#[from] QueryRejection),
}

impl ApiError {
    /// The status code this error maps to.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Query(QueryError::InvalidInput(_)) | Self::Rejection(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::Query(QueryError::NoResults) => StatusCode::NOT_FOUND,
            Self::Query(QueryError::Upstream(_)) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Query failed upstream");
        }

        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

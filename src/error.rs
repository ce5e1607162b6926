//! Error types for the property service
//!
//! `ApiError` is what handlers return and is rendered as a JSON error body.
//! `CacheError` never reaches a response: cache failures are logged and the
//! request proceeds without the cache.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

// == API Error Enum ==
/// Errors surfaced to HTTP callers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Property does not exist
    #[error("Property not found: {0}")]
    NotFound(i64),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ApiError::NotFound(id),
            StoreError::Constraint(msg) => ApiError::InvalidRequest(msg),
            StoreError::Backend(msg) => ApiError::Internal(msg),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for handlers.
pub type Result<T> = std::result::Result<T, ApiError>;

// == Cache Error Enum ==
/// Failures talking to the cache service.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Cache service could not be reached or rejected the command
    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    /// Cache service answered with data we could not interpret
    #[error("Malformed cache data: {0}")]
    Malformed(String),

    /// Entry rejected before it was written
    #[error("Invalid cache entry: {0}")]
    InvalidEntry(String),
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError::Unavailable(err.to_string())
    }
}

/// Result type for cache backend calls.
pub type CacheResult<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_map_to_api_errors() {
        assert!(matches!(
            ApiError::from(StoreError::NotFound(7)),
            ApiError::NotFound(7)
        ));
        assert!(matches!(
            ApiError::from(StoreError::Constraint("price".into())),
            ApiError::InvalidRequest(_)
        ));
        assert!(matches!(
            ApiError::from(StoreError::Backend("disk".into())),
            ApiError::Internal(_)
        ));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::NotFound(1).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::InvalidRequest("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Internal("x".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

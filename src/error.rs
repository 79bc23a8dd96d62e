//! Error types for the cache and insight service
//!
//! Provides unified error handling using thiserror.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Errors raised by the cache itself.
///
/// Misses and expired entries are not errors; they surface as `None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Empty, oversized or otherwise malformed key
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

// == Upstream Error Enum ==
/// Failures of the external text-generation call.
///
/// `Clone` so a single in-flight outcome can be handed to every waiter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    /// The call did not complete within the configured bound
    #[error("Upstream call timed out after {0:?}")]
    Timeout(Duration),

    /// Upstream answered with a non-success status
    #[error("Upstream returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Connection-level failure before a response was received
    #[error("Upstream network error: {0}")]
    Network(String),

    /// Response body could not be interpreted
    #[error("Malformed upstream response: {0}")]
    Malformed(String),

    /// No credentials were configured for the upstream API
    #[error("Upstream is not configured: {0}")]
    NotConfigured(String),
}

impl UpstreamError {
    /// Only connection failures are worth a second attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, UpstreamError::Network(_))
    }
}

// == API Error Enum ==
/// Unified error type for the HTTP layer.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidRequest(_) | ApiError::Cache(CacheError::InvalidKey(_)) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Upstream(UpstreamError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Upstream(UpstreamError::NotConfigured(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Aliases ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Result type for HTTP handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_network_errors_are_retryable() {
        assert!(UpstreamError::Network("reset".into()).is_retryable());
        assert!(!UpstreamError::Timeout(Duration::from_secs(30)).is_retryable());
        assert!(!UpstreamError::Status {
            status: 429,
            message: "slow down".into()
        }
        .is_retryable());
        assert!(!UpstreamError::Malformed("no choices".into()).is_retryable());
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                ApiError::Cache(CacheError::InvalidKey("empty".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Upstream(UpstreamError::Timeout(Duration::from_secs(1))),
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (
                ApiError::Upstream(UpstreamError::Network("refused".into())),
                StatusCode::BAD_GATEWAY,
            ),
            (
                ApiError::Upstream(UpstreamError::NotConfigured("no key".into())),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}

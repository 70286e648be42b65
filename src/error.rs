//! Error types for the cache engine
//!
//! Provides unified error handling using thiserror. Producer failures from
//! `get_or_set` are never wrapped here; callers receive them verbatim.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache construction and lookup by name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Rejected cache configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No cache registered under that name
    #[error("Unknown cache: {0}")]
    UnknownCache(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidConfig(_) => StatusCode::BAD_REQUEST,
            CacheError::UnknownCache(_) => StatusCode::NOT_FOUND,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache engine.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CacheError::UnknownCache("sessions".to_string());
        assert_eq!(err.to_string(), "Unknown cache: sessions");

        let err = CacheError::InvalidConfig("max_size must be positive".to_string());
        assert!(err.to_string().contains("max_size"));
    }

    #[test]
    fn test_error_status_codes() {
        let response = CacheError::UnknownCache("x".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = CacheError::InvalidConfig("x".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for group lookups and the HTTP layer.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The requested key is the empty string
    #[error("the key is empty")]
    EmptyKey,

    /// No group is registered under this name
    #[error("no such group: {0}")]
    GroupNotFound(String),

    /// The group's loader failed; its message is surfaced unchanged
    #[error(transparent)]
    Loader(#[from] anyhow::Error),

    /// Request path does not have the `<group>/<key>` shape
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::EmptyKey
            | CacheError::GroupNotFound(_)
            | CacheError::Loader(_)
            | CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

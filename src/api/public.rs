//! Public API types

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde_json::json;

// Errors

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed bearer token, or a session that doesn't decode
    #[error("{0}")]
    Unauthorized(String),
    /// The authorization code was rejected by the token endpoint
    #[error("Failed to fetch token: {0}")]
    ExchangeFailed(String),
    /// A downstream call failed or the server is misconfigured
    #[error("{0}")]
    ServerError(String),
    #[error("Something went wrong: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Convert `ApiError` into an Axum compatible response.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Always log the error
        match &self {
            ApiError::Unauthorized(_) | ApiError::ExchangeFailed(_) => tracing::warn!("{}", self),
            ApiError::ServerError(_) | ApiError::Internal(_) => tracing::error!("{}", self),
        }

        let (status, body) = match &self {
            ApiError::Unauthorized(_) => {
                (StatusCode::UNAUTHORIZED, json!({ "detail": self.to_string() }))
            }
            ApiError::ExchangeFailed(_) => {
                (StatusCode::BAD_REQUEST, json!({ "error": self.to_string() }))
            }
            ApiError::ServerError(_) | ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "detail": self.to_string() }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

// Re-export public types from each route

pub mod auth {
    pub use crate::api::routes::auth::public::*;
}

pub mod email {
    pub use crate::api::routes::email::public::*;
}

pub mod health {
    pub use crate::api::routes::health::public::*;
}

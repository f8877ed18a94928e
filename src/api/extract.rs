//! Bearer session extraction shared by every authenticated route.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use http::request::Parts;
use http::{HeaderMap, header};

use crate::api::public::ApiError;
use crate::api::state::AppState;
use crate::session::Session;

/// The decoded session of the caller. Rejects with 401 before the handler
/// body (and any provider or model call) runs.
#[derive(Debug, Clone)]
pub struct AuthSession(pub Session);

/// The token from an `Authorization: Bearer <token>` header. Anything
/// else, including other schemes or extra segments, yields `None`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?;
    if token.is_empty() || token.contains(char::is_whitespace) {
        return None;
    }
    Some(token)
}

impl FromRequestParts<Arc<AppState>> for AuthSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| ApiError::Unauthorized(String::from("Missing or invalid token")))?;

        let session = state.codec.decode(token).map_err(|err| {
            tracing::debug!("Session decode failed: {}", err);
            ApiError::Unauthorized(String::from("Invalid session"))
        })?;

        Ok(AuthSession(session))
    }
}

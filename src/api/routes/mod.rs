//! API routes module

pub mod auth;
pub mod email;
pub mod health;

use std::sync::Arc;

use crate::api::state::AppState;
use axum::Router;

type SharedState = Arc<AppState>;

/// Create the combined router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Liveness routes
        .merge(health::router())
        // OAuth login flow
        .nest("/auth", auth::router())
        // Email routes
        .nest("/api", email::router())
}

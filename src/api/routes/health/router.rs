//! Router for the liveness API

use std::sync::Arc;

use axum::{Router, response::Json};

use super::public;
use crate::api::state::AppState;

type SharedState = Arc<AppState>;

async fn root() -> Json<public::RootResponse> {
    Json(public::RootResponse {
        message: String::from("Inbox assistant backend is running"),
    })
}

async fn health() -> Json<public::HealthResponse> {
    Json(public::HealthResponse {
        status: String::from("ok"),
    })
}

/// Create the liveness router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", axum::routing::get(root))
        .route("/health", axum::routing::get(health))
}

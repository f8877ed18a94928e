//! Router for the OAuth login flow
//!
//! `/login` sends the browser to Google's consent screen, Google redirects
//! back to `/callback` with a one-time code, and the callback hands the
//! frontend a session token. `/me` reads the profile back out of that
//! token without calling Google.

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    response::{Json, Redirect},
};
use axum_extra::extract::Query;

use super::public;
use crate::api::extract::AuthSession;
use crate::api::public::ApiError;
use crate::api::state::AppState;
use crate::google::oauth::GoogleOAuth;

type SharedState = Arc<AppState>;

fn oauth_client(state: &AppState) -> Result<GoogleOAuth, ApiError> {
    GoogleOAuth::from_config(&state.config).ok_or_else(|| {
        ApiError::ServerError(String::from("Google Client ID/Secret not configured."))
    })
}

async fn login_handler(State(state): State<SharedState>) -> Result<Redirect, ApiError> {
    let oauth = oauth_client(&state)?;
    let csrf_state = uuid::Uuid::new_v4().to_string();
    Ok(Redirect::temporary(&oauth.authorization_url(&csrf_state)))
}

async fn callback_handler(
    State(state): State<SharedState>,
    Query(params): Query<public::CallbackQuery>,
) -> Result<Redirect, ApiError> {
    let oauth = oauth_client(&state)?;

    let code = match (params.code, params.error) {
        (Some(code), _) if !code.is_empty() => code,
        (_, Some(error)) => return Err(ApiError::ExchangeFailed(error)),
        _ => {
            return Err(ApiError::ExchangeFailed(String::from(
                "missing authorization code",
            )));
        }
    };

    let token = oauth
        .exchange_code(&code)
        .await
        .map_err(|err| ApiError::ExchangeFailed(err.to_string()))?;
    let credential = oauth.credential(token);

    let profile = oauth
        .fetch_profile(&credential.access_token)
        .await
        .map_err(|err| ApiError::ServerError(format!("Failed to fetch user profile: {}", err)))?;

    let session_token = state
        .codec
        .encode(&profile, &credential)
        .map_err(anyhow::Error::from)?;

    tracing::info!(
        "Signed in {}",
        profile.email.as_deref().unwrap_or("unknown user")
    );

    let redirect_url = format!(
        "{}/dashboard?token={}",
        state.config.frontend_url.trim_end_matches('/'),
        urlencoding::encode(&session_token)
    );
    Ok(Redirect::temporary(&redirect_url))
}

async fn me_handler(AuthSession(session): AuthSession) -> Json<public::UserResponse> {
    let profile = session.profile;
    Json(public::UserResponse {
        name: profile.name,
        email: profile.email,
        picture: profile.picture,
    })
}

/// Create the auth router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/login", axum::routing::get(login_handler))
        .route("/callback", axum::routing::get(callback_handler))
        .route("/me", axum::routing::get(me_handler))
}

//! Router for the email API

use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    response::Json,
};
use futures::future::join_all;

use super::public;
use crate::ai::DEFAULT_TONE;
use crate::api::extract::AuthSession;
use crate::api::public::ApiError;
use crate::api::state::AppState;
use crate::mail::OutgoingMessage;
use crate::session::Credential;

type SharedState = Arc<AppState>;

/// Number of messages shown on the dashboard.
const RECENT_LIMIT: u32 = 5;

/// Fetch one message and summarize it. Failures drop the message from the
/// listing instead of failing the whole request.
async fn summarized_email(
    state: &AppState,
    credential: &Credential,
    id: &str,
) -> Option<public::EmailResponse> {
    let record = match state.mail.get_detail(credential, id).await {
        Ok(record) => record,
        Err(err) => {
            tracing::error!("Failed to fetch message {}: {}", id, err);
            return None;
        }
    };

    let content = if record.body.is_empty() {
        &record.snippet
    } else {
        &record.body
    };
    let summary = state
        .assistant
        .summarize(content)
        .await
        .unwrap_or_else(|err| {
            tracing::error!("Summary failed for message {}: {}", id, err);
            format!("Error generating summary: {}", err)
        });

    Some(public::EmailResponse {
        id: record.id,
        subject: record.subject,
        sender: record.sender,
        snippet: record.snippet,
        summary: Some(summary),
        date: record.date,
    })
}

async fn recent_handler(
    State(state): State<SharedState>,
    AuthSession(session): AuthSession,
) -> Json<Vec<public::EmailResponse>> {
    let credential = &session.credential;
    let ids = state
        .mail
        .list_recent(credential, RECENT_LIMIT)
        .await
        .unwrap_or_else(|err| {
            tracing::error!("Failed to list messages: {}", err);
            Vec::new()
        });

    // Fetch and summarize concurrently, `join_all` keeps the provider's
    // ordering
    let emails: Vec<public::EmailResponse> =
        join_all(ids.iter().map(|id| summarized_email(&state, credential, id)))
            .await
            .into_iter()
            .flatten()
            .collect();

    Json(emails)
}

async fn generate_reply_handler(
    State(state): State<SharedState>,
    AuthSession(_session): AuthSession,
    Json(req): Json<public::ReplyRequest>,
) -> Json<public::ReplyResponse> {
    let tone = req.instructions.as_deref().unwrap_or(DEFAULT_TONE);
    let reply = state
        .assistant
        .draft_reply(&req.original_content, tone)
        .await
        .unwrap_or_else(|err| {
            tracing::error!("Reply generation failed for {}: {}", req.email_id, err);
            format!("Error generating reply: {}", err)
        });

    Json(public::ReplyResponse { reply })
}

fn compose(req: &public::SendRequest) -> Option<OutgoingMessage> {
    OutgoingMessage::compose(&req.to, &req.subject, &req.body, req.thread_id.as_deref())
        .map_err(|err| tracing::error!("Failed to compose message to {}: {}", req.to, err))
        .ok()
}

async fn send_handler(
    State(state): State<SharedState>,
    AuthSession(session): AuthSession,
    Json(req): Json<public::SendRequest>,
) -> Result<Json<public::SendResponse>, ApiError> {
    let failed = || ApiError::ServerError(String::from("Failed to send email"));

    let message = compose(&req).ok_or_else(failed)?;
    let id = state
        .mail
        .send(&session.credential, &message)
        .await
        .map_err(|err| {
            tracing::error!("Send failed: {}", err);
            failed()
        })?;

    Ok(Json(public::SendResponse {
        status: String::from("sent"),
        id,
    }))
}

async fn draft_handler(
    State(state): State<SharedState>,
    AuthSession(session): AuthSession,
    Json(req): Json<public::SendRequest>,
) -> Result<Json<public::SendResponse>, ApiError> {
    let failed = || ApiError::ServerError(String::from("Failed to create draft"));

    let message = compose(&req).ok_or_else(failed)?;
    let id = state
        .mail
        .create_draft(&session.credential, &message)
        .await
        .map_err(|err| {
            tracing::error!("Draft failed: {}", err);
            failed()
        })?;

    Ok(Json(public::SendResponse {
        status: String::from("drafted"),
        id,
    }))
}

async fn delete_handler(
    State(state): State<SharedState>,
    AuthSession(session): AuthSession,
    Path(msg_id): Path<String>,
) -> Result<Json<public::StatusResponse>, ApiError> {
    state
        .mail
        .trash(&session.credential, &msg_id)
        .await
        .map_err(|err| {
            tracing::error!("Failed to trash message {}: {}", msg_id, err);
            ApiError::ServerError(String::from("Failed to delete email"))
        })?;

    Ok(Json(public::StatusResponse {
        status: String::from("deleted"),
    }))
}

/// Create the email router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/recent", axum::routing::get(recent_handler))
        .route("/generate-reply", axum::routing::post(generate_reply_handler))
        .route("/send", axum::routing::post(send_handler))
        .route("/drafts", axum::routing::post(draft_handler))
        .route("/{msg_id}", axum::routing::delete(delete_handler))
}

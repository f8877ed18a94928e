//! Public types for the email API
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EmailResponse {
    pub id: String,
    pub subject: String,
    pub sender: String,
    pub snippet: String,
    pub summary: Option<String>,
    pub date: String,
}

#[derive(Deserialize)]
pub struct ReplyRequest {
    pub email_id: String,
    pub original_content: String,
    pub instructions: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct ReplyResponse {
    pub reply: String,
}

/// Payload for sending a message and for saving it as a draft.
#[derive(Deserialize)]
pub struct SendRequest {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub thread_id: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct SendResponse {
    pub status: String,
    pub id: String,
}

#[derive(Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

//! Gmail API client for listing recent mail, fetching a message,
//! sending, drafting and trashing.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::mail::{MailProvider, MessageRecord, OutgoingMessage, ProviderError};
use crate::session::Credential;

const NO_SUBJECT: &str = "No Subject";
const UNKNOWN_SENDER: &str = "Unknown Sender";

/// Message structures from Gmail API documentation
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MessageResponse {
    pub id: String,
    #[serde(rename = "threadId")]
    pub thread_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListMessagesResponse {
    pub messages: Option<Vec<MessageResponse>>,
}

#[derive(Debug, Deserialize)]
pub struct DraftResponse {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    #[serde(rename = "threadId")]
    pub thread_id: String,
    pub snippet: Option<String>,
    pub payload: Option<MessagePayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagePartBody {
    #[serde(rename = "attachmentId")]
    pub attachment_id: Option<String>,
    #[serde(default)]
    pub size: u64,
    // Base64 encoded
    pub data: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagePart {
    #[serde(rename = "partId")]
    pub part_id: Option<String>,
    #[serde(rename = "mimeType")]
    pub mimetype: String,
    pub body: Option<MessagePartBody>,
    // Nested multipart containers (e.g. multipart/alternative inside
    // multipart/mixed)
    pub parts: Option<Vec<MessagePart>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagePayload {
    pub headers: Option<Vec<MessageHeader>>,
    #[serde(rename = "mimeType")]
    pub mimetype: Option<String>,
    pub body: Option<MessagePartBody>,
    pub parts: Option<Vec<MessagePart>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageHeader {
    pub name: String,
    pub value: String,
}

/// Request body for `messages.send`. `threadId` is left out entirely
/// when the message doesn't belong to a thread.
#[derive(Debug, Serialize)]
pub struct SendMessageRequest<'a> {
    pub raw: &'a str,
    #[serde(rename = "threadId", skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<&'a str>,
}

impl<'a> From<&'a OutgoingMessage> for SendMessageRequest<'a> {
    fn from(message: &'a OutgoingMessage) -> Self {
        Self {
            raw: &message.raw,
            thread_id: message.thread_id.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
struct CreateDraftRequest<'a> {
    message: SendMessageRequest<'a>,
}

/// Gmail returns base64url data, sometimes with padding and sometimes
/// without.
fn decode_base64(data: &str) -> Result<String, ProviderError> {
    let bytes = URL_SAFE_NO_PAD.decode(data.trim_end_matches('='))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn header_value<'a>(headers: &'a [MessageHeader], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case(name))
        .map(|h| h.value.as_str())
}

fn collect_plain_text(parts: &[MessagePart], body: &mut String) -> Result<(), ProviderError> {
    for part in parts {
        if part.mimetype == "text/plain"
            && let Some(data) = part.body.as_ref().and_then(|b| b.data.as_deref())
        {
            body.push_str(&decode_base64(data)?);
        }
        if let Some(children) = &part.parts {
            collect_plain_text(children, body)?;
        }
    }
    Ok(())
}

/// Extract the plain text body from the Gmail API message payload.
///
/// - Multipart messages have a tree of `parts`. Every `text/plain` part is
///   decoded and concatenated in part order; HTML alternatives and
///   attachments (which carry an `attachmentId` instead of `data`) are
///   skipped.
/// - Single part messages carry the content in `payload.body.data`.
pub fn extract_body(payload: &MessagePayload) -> Result<String, ProviderError> {
    if let Some(parts) = &payload.parts {
        let mut body = String::new();
        collect_plain_text(parts, &mut body)?;
        return Ok(body);
    }

    match payload.body.as_ref().and_then(|b| b.data.as_deref()) {
        Some(data) => decode_base64(data),
        None => Ok(String::new()),
    }
}

/// Normalize a full Gmail message into a `MessageRecord`.
pub fn to_record(message: Message) -> Result<MessageRecord, ProviderError> {
    let (subject, sender, date, body) = match &message.payload {
        Some(payload) => {
            let headers = payload.headers.as_deref().unwrap_or_default();
            (
                header_value(headers, "Subject").unwrap_or(NO_SUBJECT),
                header_value(headers, "From").unwrap_or(UNKNOWN_SENDER),
                header_value(headers, "Date").unwrap_or_default(),
                extract_body(payload)?,
            )
        }
        None => (NO_SUBJECT, UNKNOWN_SENDER, "", String::new()),
    };

    Ok(MessageRecord {
        subject: subject.to_string(),
        sender: sender.to_string(),
        date: date.to_string(),
        body,
        id: message.id,
        thread_id: message.thread_id,
        snippet: message.snippet.unwrap_or_default(),
        summary: None,
    })
}

async fn read_json<T: DeserializeOwned>(res: Response) -> Result<T, ProviderError> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        return Err(ProviderError::Api { status, body: text });
    }
    Ok(serde_json::from_str(&text)?)
}

#[derive(Clone)]
pub struct GmailClient {
    client: Client,
    base_url: String,
}

impl GmailClient {
    /// `base_url` is the API host, e.g. `https://gmail.googleapis.com`.
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/gmail/v1/users/me/{}", self.base_url, path)
    }
}

#[async_trait]
impl MailProvider for GmailClient {
    async fn list_recent(
        &self,
        credential: &Credential,
        limit: u32,
    ) -> Result<Vec<String>, ProviderError> {
        let res = self
            .client
            .get(self.url("messages"))
            .query(&[("maxResults", limit)])
            .bearer_auth(&credential.access_token)
            .send()
            .await?;
        let msgs: ListMessagesResponse = read_json(res).await?;
        let ids: Vec<String> = msgs
            .messages
            .unwrap_or_default()
            .into_iter()
            .map(|m| m.id)
            .collect();
        tracing::debug!("Listed {} recent messages", ids.len());
        Ok(ids)
    }

    async fn get_detail(
        &self,
        credential: &Credential,
        id: &str,
    ) -> Result<MessageRecord, ProviderError> {
        let url = self.url(&format!("messages/{}", urlencoding::encode(id)));
        let res = self
            .client
            .get(url)
            .query(&[("format", "full")])
            .bearer_auth(&credential.access_token)
            .send()
            .await?;
        let message: Message = read_json(res).await?;
        to_record(message)
    }

    async fn send(
        &self,
        credential: &Credential,
        message: &OutgoingMessage,
    ) -> Result<String, ProviderError> {
        let res = self
            .client
            .post(self.url("messages/send"))
            .bearer_auth(&credential.access_token)
            .json(&SendMessageRequest::from(message))
            .send()
            .await?;
        let sent: MessageResponse = read_json(res).await?;
        tracing::info!("Sent message {}", sent.id);
        Ok(sent.id)
    }

    async fn trash(&self, credential: &Credential, id: &str) -> Result<(), ProviderError> {
        let url = self.url(&format!("messages/{}/trash", urlencoding::encode(id)));
        let res = self
            .client
            .post(url)
            .bearer_auth(&credential.access_token)
            .send()
            .await?;
        let _trashed: MessageResponse = read_json(res).await?;
        tracing::info!("Moved message {} to trash", id);
        Ok(())
    }

    async fn create_draft(
        &self,
        credential: &Credential,
        message: &OutgoingMessage,
    ) -> Result<String, ProviderError> {
        let res = self
            .client
            .post(self.url("drafts"))
            .bearer_auth(&credential.access_token)
            .json(&CreateDraftRequest {
                message: SendMessageRequest::from(message),
            })
            .send()
            .await?;
        let draft: DraftResponse = read_json(res).await?;
        tracing::info!("Created draft {}", draft.id);
        Ok(draft.id)
    }
}

//! Provider-neutral mail types and the `MailProvider` seam handlers talk
//! to. Gmail is the only implementation; tests substitute their own.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::URL_SAFE};
use mail_builder::MessageBuilder;
use mail_builder::headers::address::Address;
use mailparse::{MailAddr, addrparse};

use crate::session::Credential;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Provider responded with {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("Unexpected response body: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid base64 body data: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("Failed to build message: {0}")]
    Compose(#[from] std::io::Error),
    #[error("Invalid recipient: {0}")]
    Recipient(String),
}

/// Parse an RFC 5322 address list (`bob@example.com`,
/// `Alice <alice@example.com>`, comma separated lists, groups) into the
/// builder's address type. Group members are flattened into the list.
fn recipients(to: &str) -> Result<Address<'static>, ProviderError> {
    let parsed = addrparse(to).map_err(|err| ProviderError::Recipient(err.to_string()))?;
    let mut addresses: Vec<Address<'static>> = Vec::new();
    for addr in parsed.iter() {
        match addr {
            MailAddr::Single(info) => {
                addresses.push(Address::new_address(
                    info.display_name.clone(),
                    info.addr.clone(),
                ));
            }
            MailAddr::Group(group) => {
                addresses.extend(group.addrs.iter().map(|info| {
                    Address::new_address(info.display_name.clone(), info.addr.clone())
                }));
            }
        }
    }

    match addresses.len() {
        0 => Err(ProviderError::Recipient(format!("no address in {:?}", to))),
        1 => Ok(addresses.remove(0)),
        _ => Ok(Address::new_list(addresses)),
    }
}

/// Normalized projection of a provider message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    pub id: String,
    pub thread_id: String,
    pub subject: String,
    pub sender: String,
    pub date: String,
    pub snippet: String,
    pub body: String,
    pub summary: Option<String>,
}

/// A message ready for submission: the RFC 5322 text encoded as base64url
/// plus the thread it replies to, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub raw: String,
    pub thread_id: Option<String>,
}

impl OutgoingMessage {
    /// Build a plain text message. An empty thread id is treated as no
    /// thread at all.
    pub fn compose(
        to: &str,
        subject: &str,
        body: &str,
        thread_id: Option<&str>,
    ) -> Result<Self, ProviderError> {
        let bytes = MessageBuilder::new()
            .to(recipients(to)?)
            .subject(subject)
            .text_body(body)
            .write_to_vec()?;

        Ok(Self {
            raw: URL_SAFE.encode(bytes),
            thread_id: thread_id
                .filter(|id| !id.is_empty())
                .map(|id| id.to_string()),
        })
    }
}

/// Operations on the user's mailbox. Every call is a single attempt; the
/// caller decides how a failure degrades.
#[async_trait]
pub trait MailProvider: Send + Sync {
    /// Ids of the most recent messages, newest first as the provider
    /// returns them.
    async fn list_recent(
        &self,
        credential: &Credential,
        limit: u32,
    ) -> Result<Vec<String>, ProviderError>;

    async fn get_detail(
        &self,
        credential: &Credential,
        id: &str,
    ) -> Result<MessageRecord, ProviderError>;

    /// Submit a message and return the provider's id for it.
    async fn send(
        &self,
        credential: &Credential,
        message: &OutgoingMessage,
    ) -> Result<String, ProviderError>;

    /// Move a message to the trash. Not a permanent delete.
    async fn trash(&self, credential: &Credential, id: &str) -> Result<(), ProviderError>;

    async fn create_draft(
        &self,
        credential: &Credential,
        message: &OutgoingMessage,
    ) -> Result<String, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_raw(message: &OutgoingMessage) -> String {
        String::from_utf8(URL_SAFE.decode(&message.raw).unwrap()).unwrap()
    }

    #[test]
    fn it_composes_a_plain_text_message() {
        let message =
            OutgoingMessage::compose("bob@example.com", "Lunch", "See you at noon", None).unwrap();
        let text = decode_raw(&message);

        assert!(text.contains("To: "));
        assert!(text.contains("bob@example.com"));
        assert!(text.contains("Subject: Lunch"));
        assert!(text.contains("See you at noon"));
        assert_eq!(message.thread_id, None);
    }

    fn to_header(text: &str) -> &str {
        text.lines().find(|line| line.starts_with("To: ")).unwrap()
    }

    #[test]
    fn it_writes_a_bare_recipient() {
        let message = OutgoingMessage::compose("bob@example.com", "Lunch", "Hi", None).unwrap();
        assert_eq!(to_header(&decode_raw(&message)), "To: <bob@example.com>");
    }

    #[test]
    fn it_keeps_the_display_name_of_a_recipient() {
        let message =
            OutgoingMessage::compose("Alice <alice@example.com>", "Re: Lunch", "Sure", None)
                .unwrap();
        assert_eq!(
            to_header(&decode_raw(&message)),
            "To: \"Alice\" <alice@example.com>"
        );
    }

    #[test]
    fn it_accepts_a_quoted_display_name() {
        let message = OutgoingMessage::compose(
            "\"Lovelace, Ada\" <ada@example.com>",
            "Re: Notes",
            "Thanks",
            None,
        )
        .unwrap();
        let text = decode_raw(&message);
        let header = to_header(&text);
        assert!(header.contains("Lovelace, Ada"));
        assert!(header.contains("<ada@example.com>"));
    }

    #[test]
    fn it_rejects_an_empty_recipient() {
        let err = OutgoingMessage::compose("", "Lunch", "Hi", None).unwrap_err();
        assert!(matches!(err, ProviderError::Recipient(_)));
    }

    #[test]
    fn it_keeps_the_thread_id() {
        let message =
            OutgoingMessage::compose("bob@example.com", "Re: Lunch", "Sure", Some("T1")).unwrap();
        assert_eq!(message.thread_id.as_deref(), Some("T1"));
    }

    #[test]
    fn it_drops_an_empty_thread_id() {
        let message =
            OutgoingMessage::compose("bob@example.com", "Lunch", "Hi", Some("")).unwrap();
        assert_eq!(message.thread_id, None);
    }

    #[test]
    fn it_encodes_raw_as_url_safe_base64() {
        let message =
            OutgoingMessage::compose("bob@example.com", "???", "~~~ >>> ???", None).unwrap();
        assert!(!message.raw.contains('+'));
        assert!(!message.raw.contains('/'));
    }
}

//! Signed session tokens.
//!
//! The server keeps no session storage. Everything needed to call Gmail on
//! the user's behalf (plus a little profile info for the UI) is serialized
//! into a token the client holds and presents as a bearer token:
//!
//! ```text
//! base64url(json session document) "." base64url(HMAC-SHA256(secret, first segment))
//! ```
//!
//! Both segments are unpadded. The token is signed, not encrypted, so the
//! wrapped credential is readable by whoever holds it. Tokens never expire on
//! their own; Gmail rejects a stale access token and rotating the secret
//! invalidates every outstanding token.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Malformed session token")]
    Malformed,
    #[error("Session signature does not match")]
    BadSignature,
    #[error("Invalid session payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("Invalid signing key: {0}")]
    Key(#[from] hmac::digest::InvalidLength),
}

/// Delegated access to the user's Gmail account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub token_uri: String,
    pub client_id: String,
    pub client_secret: String,
    pub scopes: Vec<String>,
}

/// Profile fields as returned by Google's userinfo endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub credential: Credential,
    pub profile: Profile,
}

// Wire format of the token payload. Key names are kept stable so tokens
// minted by older deployments still decode.
#[derive(Serialize, Deserialize)]
struct SessionDocument {
    token: String,
    refresh_token: Option<String>,
    token_uri: String,
    client_id: String,
    client_secret: String,
    scopes: Vec<String>,
    user_email: Option<String>,
    user_name: Option<String>,
    picture: Option<String>,
}

#[derive(Clone)]
pub struct SessionCodec {
    key: Vec<u8>,
}

impl SessionCodec {
    pub fn new(secret: &str) -> Self {
        Self {
            key: secret.as_bytes().to_vec(),
        }
    }

    pub fn encode(&self, profile: &Profile, credential: &Credential) -> Result<String, SessionError> {
        let doc = SessionDocument {
            token: credential.access_token.clone(),
            refresh_token: credential.refresh_token.clone(),
            token_uri: credential.token_uri.clone(),
            client_id: credential.client_id.clone(),
            client_secret: credential.client_secret.clone(),
            scopes: credential.scopes.clone(),
            user_email: profile.email.clone(),
            user_name: profile.name.clone(),
            picture: profile.picture.clone(),
        };
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&doc)?);
        let signature = self.signature(&payload)?;
        Ok(format!("{}.{}", payload, signature))
    }

    /// Verify the token's signature and rebuild the session. Fails if the
    /// token was not produced by a codec with the same secret, was
    /// altered, or is missing required credential fields.
    pub fn decode(&self, token: &str) -> Result<Session, SessionError> {
        let (payload, signature) = token.split_once('.').ok_or(SessionError::Malformed)?;
        if payload.is_empty() || signature.is_empty() || signature.contains('.') {
            return Err(SessionError::Malformed);
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| SessionError::Malformed)?;
        let mut mac = HmacSha256::new_from_slice(&self.key)?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| SessionError::BadSignature)?;

        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| SessionError::Malformed)?;
        let doc: SessionDocument = serde_json::from_slice(&json)?;

        Ok(Session {
            credential: Credential {
                access_token: doc.token,
                refresh_token: doc.refresh_token,
                token_uri: doc.token_uri,
                client_id: doc.client_id,
                client_secret: doc.client_secret,
                scopes: doc.scopes,
            },
            profile: Profile {
                email: doc.user_email,
                name: doc.user_name,
                picture: doc.picture,
            },
        })
    }

    fn signature(&self, payload: &str) -> Result<String, SessionError> {
        let mut mac = HmacSha256::new_from_slice(&self.key)?;
        mac.update(payload.as_bytes());
        Ok(URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()))
    }
}

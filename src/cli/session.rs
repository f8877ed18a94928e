use anyhow::Result;
use serde_json::{Value, json};

use crate::core::AppConfig;
use crate::session::{Session, SessionCodec};

/// What an operator gets to see of a session. Access and refresh tokens
/// and the client secret are left out.
pub fn describe(session: &Session) -> Value {
    json!({
        "profile": session.profile,
        "client_id": session.credential.client_id,
        "token_uri": session.credential.token_uri,
        "scopes": session.credential.scopes,
        "has_refresh_token": session.credential.refresh_token.is_some(),
    })
}

/// Verify a session token against the configured secret and print what it
/// carries.
pub async fn run(token: String) -> Result<()> {
    let config = AppConfig::default();
    let codec = SessionCodec::new(&config.secret_key);
    let session = codec.decode(token.trim())?;

    println!("{}", describe(&session));
    Ok(())
}

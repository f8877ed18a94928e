//! Google OAuth web flow: consent URL, code exchange, and profile lookup.

use reqwest::Client;
use serde::Deserialize;

use crate::core::AppConfig;
use crate::session::{Credential, Profile};

pub const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/gmail.readonly",
    "https://www.googleapis.com/auth/gmail.send",
    // Includes moving messages to the trash
    "https://www.googleapis.com/auth/gmail.modify",
    "openid",
    "https://www.googleapis.com/auth/userinfo.email",
    "https://www.googleapis.com/auth/userinfo.profile",
];

#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("({error}) {description}")]
    Rejected { error: String, description: String },
    #[error("Unexpected response body: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    // Space separated list of the scopes actually granted
    pub scope: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
    error_description: Option<String>,
}

impl OAuthError {
    fn from_response(status: reqwest::StatusCode, body: &str) -> Self {
        match serde_json::from_str::<ErrorResponse>(body) {
            Ok(err) => OAuthError::Rejected {
                description: err.error_description.unwrap_or_default(),
                error: err.error,
            },
            Err(_) => OAuthError::Rejected {
                error: status.to_string(),
                description: body.to_string(),
            },
        }
    }
}

#[derive(Clone)]
pub struct GoogleOAuth {
    client: Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    auth_url: String,
    token_url: String,
    userinfo_url: String,
}

impl GoogleOAuth {
    /// Returns `None` when the client id or secret is not configured.
    pub fn from_config(config: &AppConfig) -> Option<Self> {
        let (client_id, client_secret) = config.google_client()?;
        Some(Self {
            client: Client::new(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            redirect_uri: config.redirect_uri.clone(),
            auth_url: config.google_auth_url.clone(),
            token_url: config.google_token_url.clone(),
            userinfo_url: config.google_userinfo_url.clone(),
        })
    }

    /// Consent screen URL asking for offline access so the token response
    /// includes a refresh token.
    pub fn authorization_url(&self, state: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline&include_granted_scopes=true&state={}",
            self.auth_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(&SCOPES.join(" ")),
            urlencoding::encode(state),
        )
    }

    /// Trade a one-time authorization code for tokens. Codes can't be
    /// reused so there is nothing to retry on failure.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, OAuthError> {
        let res = self
            .client
            .post(&self.token_url)
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;
        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            return Err(OAuthError::from_response(status, &text));
        }
        Ok(serde_json::from_str(&text)?)
    }

    pub fn credential(&self, token: TokenResponse) -> Credential {
        let scopes = match token.scope.as_deref() {
            Some(scope) if !scope.trim().is_empty() => {
                scope.split_whitespace().map(String::from).collect()
            }
            _ => SCOPES.iter().map(|s| s.to_string()).collect(),
        };
        Credential {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            token_uri: self.token_url.clone(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            scopes,
        }
    }

    pub async fn fetch_profile(&self, access_token: &str) -> Result<Profile, OAuthError> {
        let res = self
            .client
            .get(&self.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await?;
        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            return Err(OAuthError::from_response(status, &text));
        }
        Ok(serde_json::from_str(&text)?)
    }
}

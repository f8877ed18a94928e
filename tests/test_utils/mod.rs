//! Test utilities for integration tests
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use axum::{Router, body::Body};

use inboxpilot::ai::LanguageModel;
use inboxpilot::api::AppState;
use inboxpilot::api::app;
use inboxpilot::core::AppConfig;
use inboxpilot::mail::{MailProvider, MessageRecord, OutgoingMessage, ProviderError};
use inboxpilot::session::{Credential, Profile, Session, SessionCodec};

pub const TEST_SECRET: &str = "test-secret-key";

/// In-memory mail provider. Every trait call bumps `calls` so tests can
/// assert that rejected requests never reach the provider.
#[derive(Default)]
pub struct StubMail {
    /// `None` makes `list_recent` fail
    pub ids: Option<Vec<String>>,
    pub records: HashMap<String, MessageRecord>,
    /// Per-id delay applied in `get_detail`
    pub delays: HashMap<String, Duration>,
    pub fail_send: bool,
    pub fail_trash: bool,
    pub calls: AtomicUsize,
    /// `limit` passed to each `list_recent` call
    pub limits: Mutex<Vec<u32>>,
    pub sent: Mutex<Vec<OutgoingMessage>>,
    pub drafted: Mutex<Vec<OutgoingMessage>>,
    pub trashed: Mutex<Vec<String>>,
}

fn stub_failure(what: &str) -> ProviderError {
    ProviderError::Api {
        status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        body: format!("{} failed", what),
    }
}

impl StubMail {
    pub fn with_messages(records: Vec<MessageRecord>) -> Self {
        Self {
            ids: Some(records.iter().map(|r| r.id.clone()).collect()),
            records: records.into_iter().map(|r| (r.id.clone(), r)).collect(),
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MailProvider for StubMail {
    async fn list_recent(
        &self,
        _credential: &Credential,
        limit: u32,
    ) -> Result<Vec<String>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.limits.lock().unwrap().push(limit);
        let ids = self.ids.clone().ok_or_else(|| stub_failure("list"))?;
        Ok(ids.into_iter().take(limit as usize).collect())
    }

    async fn get_detail(
        &self,
        _credential: &Credential,
        id: &str,
    ) -> Result<MessageRecord, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(id) {
            tokio::time::sleep(*delay).await;
        }
        self.records
            .get(id)
            .cloned()
            .ok_or_else(|| stub_failure("detail"))
    }

    async fn send(
        &self,
        _credential: &Credential,
        message: &OutgoingMessage,
    ) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_send {
            return Err(stub_failure("send"));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(String::from("sent-1"))
    }

    async fn trash(&self, _credential: &Credential, id: &str) -> Result<(), ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_trash {
            return Err(stub_failure("trash"));
        }
        self.trashed.lock().unwrap().push(id.to_string());
        Ok(())
    }

    async fn create_draft(
        &self,
        _credential: &Credential,
        message: &OutgoingMessage,
    ) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_send {
            return Err(stub_failure("draft"));
        }
        self.drafted.lock().unwrap().push(message.clone());
        Ok(String::from("draft-1"))
    }
}

/// Language model that echoes a fixed prefix plus the first line of the
/// prompt, or fails every call.
#[derive(Default)]
pub struct StubModel {
    pub fail: bool,
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
}

impl StubModel {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LanguageModel for StubModel {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail {
            return Err(anyhow!("model unavailable"));
        }
        Ok(String::from("  Generated text.  "))
    }
}

pub fn test_config(server_url: &str) -> AppConfig {
    AppConfig {
        google_client_id: Some(String::from("test_client_id")),
        google_client_secret: Some(String::from("test_client_secret")),
        google_auth_url: String::from("https://accounts.google.com/o/oauth2/auth"),
        google_token_url: format!("{}/token", server_url),
        google_userinfo_url: format!("{}/oauth2/v2/userinfo", server_url),
        gmail_api_base_url: server_url.to_string(),
        redirect_uri: String::from("http://localhost:8000/auth/callback"),
        frontend_url: String::from("http://localhost:3000"),
        secret_key: String::from(TEST_SECRET),
        openai_model: String::from("gpt-4.1-mini"),
        openai_api_hostname: server_url.to_string(),
        openai_api_key: String::from("test-api-key"),
    }
}

/// Creates a test application router backed by the given stubs.
pub fn test_app_with(config: AppConfig, mail: Arc<StubMail>, model: Arc<StubModel>) -> Router {
    let app_state = AppState::new(config, mail, model).expect("Failed to build app state");
    app(Arc::new(app_state))
}

pub fn test_app(mail: Arc<StubMail>, model: Arc<StubModel>) -> Router {
    test_app_with(test_config("http://localhost:1"), mail, model)
}

pub fn test_session() -> Session {
    Session {
        credential: Credential {
            access_token: String::from("ya29.test-access"),
            refresh_token: Some(String::from("1//test-refresh")),
            token_uri: String::from("https://oauth2.googleapis.com/token"),
            client_id: String::from("test_client_id"),
            client_secret: String::from("test_client_secret"),
            scopes: vec![String::from("openid")],
        },
        profile: Profile {
            email: Some(String::from("ada@example.com")),
            name: Some(String::from("Ada Lovelace")),
            picture: Some(String::from("https://example.com/ada.png")),
        },
    }
}

/// A token signed with the test secret.
pub fn session_token() -> String {
    let session = test_session();
    SessionCodec::new(TEST_SECRET)
        .encode(&session.profile, &session.credential)
        .unwrap()
}

pub fn record(id: &str, subject: &str, body: &str) -> MessageRecord {
    MessageRecord {
        id: id.to_string(),
        thread_id: format!("thread-{}", id),
        subject: subject.to_string(),
        sender: String::from("Bob <bob@example.com>"),
        date: String::from("Mon, 1 Jan 2024 10:00:00 +0000"),
        snippet: format!("snippet {}", id),
        body: body.to_string(),
        summary: None,
    }
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_to_json(body: Body) -> serde_json::Value {
    let body = body_to_string(body).await;
    serde_json::from_str(&body).unwrap()
}

use std::sync::Arc;

use anyhow::Result;

use crate::ai::{Assistant, LanguageModel};
use crate::core::AppConfig;
use crate::google::gmail::GmailClient;
use crate::mail::MailProvider;
use crate::openai::OpenAiModel;
use crate::session::SessionCodec;

/// Services shared by every request. Nothing in here is mutated after
/// startup; per-user state travels in the session token.
pub struct AppState {
    pub config: AppConfig,
    pub codec: SessionCodec,
    pub mail: Arc<dyn MailProvider>,
    pub assistant: Assistant,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        mail: Arc<dyn MailProvider>,
        model: Arc<dyn LanguageModel>,
    ) -> Result<Self> {
        Ok(Self {
            codec: SessionCodec::new(&config.secret_key),
            assistant: Assistant::new(model)?,
            mail,
            config,
        })
    }

    /// Wire up the real Gmail and OpenAI clients.
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let mail = Arc::new(GmailClient::new(&config.gmail_api_base_url));
        let model = Arc::new(OpenAiModel::new(
            &config.openai_api_hostname,
            &config.openai_api_key,
            &config.openai_model,
        ));
        Self::new(config, mail, model)
    }
}

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use handlebars::Handlebars;
use serde_json::json;

use super::prompt::{self, Prompt};

/// Longest email content, in characters, that goes into a prompt.
pub const MAX_CONTENT_CHARS: usize = 5000;
pub const NO_CONTENT_MESSAGE: &str = "No content to summarize.";
pub const DEFAULT_TONE: &str = "positive";

/// Text generation backend. Implemented by the OpenAI client and by test
/// stubs.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// First `MAX_CONTENT_CHARS` characters of `content`.
pub fn truncate(content: &str) -> &str {
    match content.char_indices().nth(MAX_CONTENT_CHARS) {
        Some((idx, _)) => &content[..idx],
        None => content,
    }
}

/// Summarizes emails and drafts replies.
#[derive(Clone)]
pub struct Assistant {
    model: Arc<dyn LanguageModel>,
    templates: Arc<Handlebars<'static>>,
}

impl Assistant {
    pub fn new(model: Arc<dyn LanguageModel>) -> Result<Self> {
        Ok(Self {
            model,
            templates: Arc::new(prompt::templates()?),
        })
    }

    pub async fn summarize(&self, content: &str) -> Result<String> {
        if content.is_empty() {
            return Ok(NO_CONTENT_MESSAGE.to_string());
        }
        let prompt = self.templates.render(
            &Prompt::EmailSummary.to_string(),
            &json!({ "content": truncate(content) }),
        )?;
        let summary = self.model.generate(&prompt).await?;
        Ok(summary.trim().to_string())
    }

    /// Unlike `summarize`, empty content still goes to the model.
    pub async fn draft_reply(&self, content: &str, tone: &str) -> Result<String> {
        let prompt = self.templates.render(
            &Prompt::DraftReply.to_string(),
            &json!({ "content": truncate(content), "tone": tone }),
        )?;
        let reply = self.model.generate(&prompt).await?;
        Ok(reply.trim().to_string())
    }
}

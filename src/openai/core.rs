use std::time::Duration;

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::ai::LanguageModel;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub enum Role {
    #[serde(rename = "user")]
    User,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Message {
    role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Self {
        Message {
            role,
            content: Some(content.to_string()),
        }
    }
}

pub async fn completion(
    messages: &Vec<Message>,
    api_hostname: &str,
    api_key: &str,
    model: &str,
) -> Result<Value, Error> {
    let payload = json!({
        "model": model,
        "messages": messages,
    });
    let url = format!("{}/v1/chat/completions", api_hostname.trim_end_matches("/"));
    let response = reqwest::Client::new()
        .post(url)
        .bearer_auth(api_key)
        .header("Content-Type", "application/json")
        .timeout(Duration::from_secs(60 * 10))
        .json(&payload)
        .send()
        .await?;
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        // Error bodies are JSON from the API itself but may be HTML from a
        // proxy in front of it
        let message = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|body| body["error"]["message"].as_str().map(String::from))
            .unwrap_or(text);
        anyhow::bail!("Completion request failed: {} ({})", status, message);
    }

    Ok(serde_json::from_str(&text)?)
}

/// Text of the first choice in a chat completion response.
pub fn first_choice_content(response: &Value) -> Result<String> {
    response["choices"][0]["message"]["content"]
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| anyhow!("Completion response has no message content"))
}

/// `LanguageModel` backed by an OpenAI compatible chat completions API.
#[derive(Clone, Debug)]
pub struct OpenAiModel {
    api_hostname: String,
    api_key: String,
    model: String,
}

impl OpenAiModel {
    pub fn new(api_hostname: &str, api_key: &str, model: &str) -> Self {
        Self {
            api_hostname: api_hostname.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl LanguageModel for OpenAiModel {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let messages = vec![Message::new(Role::User, prompt)];
        let response = completion(&messages, &self.api_hostname, &self.api_key, &self.model).await?;
        first_choice_content(&response)
    }
}

//! Anthropic Messages API backend.

use super::{resolve_setting, ContentProvider};
use crate::config::AnthropicSettings;
use crate::error::{Result, SkriveError};
use crate::openai::http_client;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

const DEFAULT_API_BASE: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";
const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Anthropic-based content provider.
pub struct AnthropicProvider {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
}

/// Messages API request.
#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

/// Messages API response.
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicProvider {
    /// Create a provider from settings, resolving the key from `ANTHROPIC_API_KEY`
    /// when it is not configured.
    pub fn from_settings(settings: &AnthropicSettings, timeout: Duration) -> Result<Self> {
        let api_key = resolve_setting(settings.api_key.as_deref(), API_KEY_ENV).ok_or_else(|| {
            SkriveError::Config(format!(
                "Anthropic API key missing. Set ai.anthropic.api_key or export {}",
                API_KEY_ENV
            ))
        })?;

        let model = settings
            .model
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_MODEL);
        let api_base = settings
            .api_base
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .unwrap_or(DEFAULT_API_BASE);

        Ok(Self {
            client: http_client(timeout)?,
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.api_base)
    }
}

#[async_trait]
impl ContentProvider for AnthropicProvider {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn generate_content(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| SkriveError::Provider(format!("Anthropic request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(status_error(status, &error_text));
        }

        let body: MessagesResponse = response.json().await.map_err(|e| {
            SkriveError::Provider(format!("Failed to read Anthropic response: {}", e))
        })?;

        let text = collect_text(body);
        debug!("Received {} chars from {}", text.len(), self.model);
        Ok(text)
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}

/// Map a non-success status to an error. Rejected credentials are fatal.
fn status_error(status: StatusCode, body: &str) -> SkriveError {
    let message = format!("Anthropic API returned {}: {}", status, body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SkriveError::Config(message),
        _ => SkriveError::Provider(message),
    }
}

/// Concatenate the text blocks of a response, ignoring other block types.
fn collect_text(response: MessagesResponse) -> String {
    response
        .content
        .into_iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text)
        .collect::<Vec<_>>()
        .join("")
}

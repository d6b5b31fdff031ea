//! OpenAI chat completions backend.

use super::{resolve_setting, ContentProvider};
use crate::config::OpenAiSettings;
use crate::error::{Result, SkriveError};
use crate::openai::create_client;
use async_openai::config::{Config, OpenAIConfig};
use async_openai::error::{ApiError, OpenAIError};
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o";

const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// OpenAI-based content provider.
pub struct OpenAiProvider {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiProvider {
    /// Create a provider from settings, resolving the key from `OPENAI_API_KEY`
    /// when it is not configured.
    pub fn from_settings(settings: &OpenAiSettings, timeout: Duration) -> Result<Self> {
        let api_key = resolve_setting(settings.api_key.as_deref(), API_KEY_ENV).ok_or_else(|| {
            SkriveError::Config(format!(
                "OpenAI API key missing. Set ai.openai.api_key or export {}",
                API_KEY_ENV
            ))
        })?;

        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(base) = settings.api_base.as_deref().filter(|b| !b.trim().is_empty()) {
            config = config.with_api_base(base.trim());
        }

        let model = settings
            .model
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_MODEL);

        Ok(Self {
            client: create_client(config, timeout)?,
            model: model.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ContentProvider for OpenAiProvider {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn generate_content(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        chat_completion(&self.client, &self.model, prompt, max_tokens)
            .await
            .map_err(|e| e.with_context("OpenAI"))
    }

    fn name(&self) -> &str {
        "openai"
    }
}

/// Single-turn chat completion shared by the OpenAI and Azure backends.
///
/// A response without message content yields an empty string.
pub(super) async fn chat_completion<C: Config>(
    client: &Client<C>,
    model: &str,
    prompt: &str,
    max_tokens: u32,
) -> Result<String> {
    let messages: Vec<ChatCompletionRequestMessage> = vec![
        ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| SkriveError::Provider(format!("Failed to build message: {}", e)))?
            .into(),
    ];

    let request = CreateChatCompletionRequestArgs::default()
        .model(model)
        .messages(messages)
        .max_completion_tokens(max_tokens)
        .build()
        .map_err(|e| SkriveError::Provider(format!("Failed to build request: {}", e)))?;

    let response = client
        .chat()
        .create(request)
        .await
        .map_err(classify_error)?;

    let content = response
        .choices
        .first()
        .and_then(|c| c.message.content.clone())
        .unwrap_or_default();

    debug!("Received {} chars from {}", content.len(), model);
    Ok(content)
}

/// Map an async-openai error to a crate error. Rejected credentials are fatal.
fn classify_error(error: OpenAIError) -> SkriveError {
    let message = format!("Chat completion failed: {}", error);
    match &error {
        OpenAIError::ApiError(api) if is_auth_error(api) => SkriveError::Config(message),
        _ => SkriveError::Provider(message),
    }
}

fn is_auth_error(api: &ApiError) -> bool {
    matches!(api.code.as_deref(), Some("invalid_api_key" | "401" | "403"))
        || matches!(
            api.r#type.as_deref(),
            Some("authentication_error" | "invalid_authentication" | "permission_error")
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(code: Option<&str>, kind: Option<&str>) -> OpenAIError {
        OpenAIError::ApiError(ApiError {
            message: "Incorrect API key provided".to_string(),
            r#type: kind.map(str::to_string),
            param: None,
            code: code.map(str::to_string),
        })
    }

    #[test]
    fn test_rejected_key_is_config_error() {
        let err = classify_error(api_error(Some("invalid_api_key"), Some("invalid_request_error")));
        assert!(matches!(err, SkriveError::Config(_)));
        assert!(!err.is_retryable());

        let err = classify_error(api_error(Some("401"), None));
        assert!(matches!(err, SkriveError::Config(_)));
    }

    #[test]
    fn test_other_api_errors_stay_retryable() {
        let err = classify_error(api_error(Some("rate_limit_exceeded"), Some("requests")));
        assert!(matches!(err, SkriveError::Provider(_)));
        assert!(err.is_retryable());

        let err = classify_error(OpenAIError::StreamError("connection reset".to_string()));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_model_fallback_and_override() {
        let settings = OpenAiSettings {
            api_key: Some("sk-test".to_string()),
            model: None,
            api_base: None,
        };
        let provider = OpenAiProvider::from_settings(&settings, Duration::from_secs(5)).unwrap();
        assert_eq!(provider.model(), DEFAULT_MODEL);

        let settings = OpenAiSettings {
            api_key: Some("sk-test".to_string()),
            model: Some("gpt-4.1-mini".to_string()),
            api_base: Some("http://localhost:8080/v1".to_string()),
        };
        let provider = OpenAiProvider::from_settings(&settings, Duration::from_secs(5)).unwrap();
        assert_eq!(provider.model(), "gpt-4.1-mini");
    }
}

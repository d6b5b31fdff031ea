//! Azure OpenAI backend.

use super::openai::chat_completion;
use super::{resolve_setting, ContentProvider};
use crate::config::AzureSettings;
use crate::error::{Result, SkriveError};
use crate::openai::create_client;
use async_openai::config::AzureConfig;
use async_openai::Client;
use async_trait::async_trait;
use std::time::Duration;
use tracing::instrument;

const API_KEY_ENV: &str = "AZURE_OPENAI_API_KEY";
const ENDPOINT_ENV: &str = "AZURE_OPENAI_ENDPOINT";
const DEPLOYMENT_ENV: &str = "AZURE_OPENAI_DEPLOYMENT";

/// Azure-hosted OpenAI deployment.
pub struct AzureProvider {
    client: Client<AzureConfig>,
    deployment: String,
}

impl AzureProvider {
    /// Create a provider from settings. Key, endpoint and deployment must all
    /// resolve, from settings or their environment variables.
    pub fn from_settings(settings: &AzureSettings, timeout: Duration) -> Result<Self> {
        let api_key = resolve_setting(settings.api_key.as_deref(), API_KEY_ENV).ok_or_else(|| {
            SkriveError::Config(format!(
                "Azure OpenAI API key missing. Set ai.azure.api_key or export {}",
                API_KEY_ENV
            ))
        })?;
        let endpoint =
            resolve_setting(settings.endpoint.as_deref(), ENDPOINT_ENV).ok_or_else(|| {
                SkriveError::Config(format!(
                    "Azure OpenAI endpoint missing. Set ai.azure.endpoint or export {}",
                    ENDPOINT_ENV
                ))
            })?;
        let deployment = resolve_setting(settings.deployment.as_deref(), DEPLOYMENT_ENV)
            .ok_or_else(|| {
                SkriveError::Config(format!(
                    "Azure OpenAI deployment missing. Set ai.azure.deployment or export {}",
                    DEPLOYMENT_ENV
                ))
            })?;
        if settings.api_version.trim().is_empty() {
            return Err(SkriveError::Config(
                "Azure OpenAI api_version must not be empty".to_string(),
            ));
        }

        let config = AzureConfig::new()
            .with_api_base(endpoint.trim_end_matches('/'))
            .with_api_key(api_key)
            .with_deployment_id(deployment.clone())
            .with_api_version(settings.api_version.trim());

        Ok(Self {
            client: create_client(config, timeout)?,
            deployment,
        })
    }

    pub fn deployment(&self) -> &str {
        &self.deployment
    }
}

#[async_trait]
impl ContentProvider for AzureProvider {
    #[instrument(skip(self, prompt), fields(deployment = %self.deployment, prompt_len = prompt.len()))]
    async fn generate_content(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        chat_completion(&self.client, &self.deployment, prompt, max_tokens)
            .await
            .map_err(|e| e.with_context("Azure OpenAI"))
    }

    fn name(&self) -> &str {
        "azure"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_settings_build_provider() {
        let settings = AzureSettings {
            api_key: Some("key".to_string()),
            endpoint: Some("https://example.openai.azure.com/".to_string()),
            deployment: Some("gpt-4o-prod".to_string()),
            ..Default::default()
        };
        let provider = AzureProvider::from_settings(&settings, Duration::from_secs(5)).unwrap();
        assert_eq!(provider.deployment(), "gpt-4o-prod");
        assert_eq!(provider.name(), "azure");
    }

    #[test]
    fn test_empty_api_version_is_config_error() {
        let settings = AzureSettings {
            api_key: Some("key".to_string()),
            endpoint: Some("https://example.openai.azure.com".to_string()),
            deployment: Some("gpt-4o".to_string()),
            api_version: " ".to_string(),
        };
        let result = AzureProvider::from_settings(&settings, Duration::from_secs(5));
        assert!(matches!(result, Err(SkriveError::Config(_))));
    }
}

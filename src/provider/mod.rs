//! Language model backends.
//!
//! The only contract the generation pipeline relies on is [`ContentProvider`]:
//! a prompt and a token budget in, plain text out. Each backend owns its
//! credential resolution, endpoint and model selection, and the translation of
//! its vendor's response shape into text.
//!
//! Backends form a closed set ([`Provider`]) selected once from configuration at
//! startup. Callers hand the chosen provider to a
//! [`Generator`](crate::generation::Generator) explicitly; nothing resolves a
//! provider from global state.

mod anthropic;
mod azure;
mod mock;
mod openai;

pub use anthropic::AnthropicProvider;
pub use azure::AzureProvider;
pub use mock::{MockProvider, MockReply};
pub use openai::OpenAiProvider;

use crate::config::{AiSettings, ProviderKind};
use crate::error::Result;
use async_trait::async_trait;
use tracing::info;

/// Trait for text generation backends.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Generate text for a prompt, bounded by `max_tokens`.
    ///
    /// A successful call may return an empty string; classifying that is the
    /// caller's job.
    async fn generate_content(&self, prompt: &str, max_tokens: u32) -> Result<String>;

    /// Short backend name for logs.
    fn name(&self) -> &str;
}

/// The configured backend.
pub enum Provider {
    OpenAi(OpenAiProvider),
    Azure(AzureProvider),
    Anthropic(AnthropicProvider),
}

impl Provider {
    /// Build the backend selected in settings.
    ///
    /// Incomplete credentials fail here, before any request is made.
    pub fn from_settings(settings: &AiSettings) -> Result<Self> {
        let timeout = settings.timeout();
        let provider = match settings.provider {
            ProviderKind::OpenAi => {
                Provider::OpenAi(OpenAiProvider::from_settings(&settings.openai, timeout)?)
            }
            ProviderKind::Azure => {
                Provider::Azure(AzureProvider::from_settings(&settings.azure, timeout)?)
            }
            ProviderKind::Anthropic => Provider::Anthropic(AnthropicProvider::from_settings(
                &settings.anthropic,
                timeout,
            )?),
        };
        info!("Using {} provider ({})", provider.kind(), provider.model());
        Ok(provider)
    }

    pub fn kind(&self) -> ProviderKind {
        match self {
            Provider::OpenAi(_) => ProviderKind::OpenAi,
            Provider::Azure(_) => ProviderKind::Azure,
            Provider::Anthropic(_) => ProviderKind::Anthropic,
        }
    }

    /// Model (or Azure deployment) the backend sends requests to.
    pub fn model(&self) -> &str {
        match self {
            Provider::OpenAi(p) => p.model(),
            Provider::Azure(p) => p.deployment(),
            Provider::Anthropic(p) => p.model(),
        }
    }
}

#[async_trait]
impl ContentProvider for Provider {
    async fn generate_content(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        match self {
            Provider::OpenAi(p) => p.generate_content(prompt, max_tokens).await,
            Provider::Azure(p) => p.generate_content(prompt, max_tokens).await,
            Provider::Anthropic(p) => p.generate_content(prompt, max_tokens).await,
        }
    }

    fn name(&self) -> &str {
        match self {
            Provider::OpenAi(p) => p.name(),
            Provider::Azure(p) => p.name(),
            Provider::Anthropic(p) => p.name(),
        }
    }
}

/// Resolve a setting: explicit non-empty value first, then the environment.
pub(crate) fn resolve_setting(configured: Option<&str>, env_var: &str) -> Option<String> {
    configured
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| {
            std::env::var(env_var)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SkriveError;

    #[test]
    fn test_resolve_setting_prefers_configured_value() {
        std::env::set_var("SKRIVE_TEST_RESOLVE_A", "from-env");
        assert_eq!(
            resolve_setting(Some("from-config"), "SKRIVE_TEST_RESOLVE_A").as_deref(),
            Some("from-config")
        );
        assert_eq!(
            resolve_setting(Some("  "), "SKRIVE_TEST_RESOLVE_A").as_deref(),
            Some("from-env")
        );
        assert_eq!(resolve_setting(None, "SKRIVE_TEST_RESOLVE_UNSET"), None);
    }

    #[test]
    fn test_azure_without_endpoint_fails_before_network() {
        let mut settings = AiSettings {
            provider: ProviderKind::Azure,
            ..Default::default()
        };
        settings.azure.api_key = Some("key".to_string());
        settings.azure.deployment = Some("gpt-4o".to_string());
        // Endpoint would come from AZURE_OPENAI_ENDPOINT when unset
        if std::env::var("AZURE_OPENAI_ENDPOINT").is_ok() {
            return;
        }
        let result = Provider::from_settings(&settings);
        assert!(matches!(result, Err(SkriveError::Config(ref m)) if m.contains("endpoint")));
    }

    #[test]
    fn test_configured_openai_provider() {
        let mut settings = AiSettings::default();
        settings.openai.api_key = Some("sk-test".to_string());
        settings.openai.model = Some("gpt-test".to_string());
        let provider = Provider::from_settings(&settings).unwrap();
        assert_eq!(provider.kind(), ProviderKind::OpenAi);
        assert_eq!(provider.model(), "gpt-test");
        assert_eq!(provider.name(), "openai");
    }

    #[test]
    fn test_configured_anthropic_provider_uses_default_model() {
        let mut settings = AiSettings {
            provider: ProviderKind::Anthropic,
            ..Default::default()
        };
        settings.anthropic.api_key = Some("sk-ant-test".to_string());
        let provider = Provider::from_settings(&settings).unwrap();
        assert_eq!(provider.kind(), ProviderKind::Anthropic);
        assert_eq!(provider.model(), anthropic::DEFAULT_MODEL);
    }
}

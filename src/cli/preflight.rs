//! Pre-flight setup before generation.
//!
//! Resolves the configured provider and prompt set up front so missing
//! credentials or a broken prompt override fail before any request is made.

use crate::config::{Prompts, Settings};
use crate::error::Result;
use crate::generation::Generator;
use crate::provider::Provider;
use crate::retry::RetryPolicy;
use std::sync::Arc;
use tracing::debug;

/// Load the prompt set, applying the custom directory and variables from settings.
pub fn load_prompts(settings: &Settings) -> Result<Prompts> {
    let variables = (!settings.prompts.variables.is_empty()).then_some(&settings.prompts.variables);
    Prompts::load(settings.prompts.custom_dir.as_deref(), variables)
}

/// Build a generator for the configured provider, prompts and retry policy.
pub fn build_generator(settings: &Settings) -> Result<Generator> {
    let provider = Provider::from_settings(&settings.ai)?;
    let prompts = load_prompts(settings)?;
    let retry = RetryPolicy::from(&settings.retry);
    debug!("Retry policy: {:?}", retry);

    Ok(Generator::new(Arc::new(provider))
        .with_prompts(prompts)
        .with_retry(retry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderKind;
    use crate::error::SkriveError;
    use tempfile::TempDir;

    #[test]
    fn test_incomplete_azure_settings_fail_early() {
        let mut settings = Settings::default();
        settings.ai.provider = ProviderKind::Azure;
        settings.ai.azure.api_key = Some("key".to_string());
        settings.ai.azure.endpoint = None;
        settings.ai.azure.deployment = Some("gpt-4o".to_string());

        // Only fails when AZURE_OPENAI_ENDPOINT is absent from the environment.
        if std::env::var("AZURE_OPENAI_ENDPOINT").is_err() {
            assert!(matches!(
                build_generator(&settings),
                Err(SkriveError::Config(_))
            ));
        }
    }

    #[test]
    fn test_generator_uses_settings() {
        let mut settings = Settings::default();
        settings.ai.openai.api_key = Some("sk-test".to_string());
        settings.retry.max_retries = 4;

        let generator = build_generator(&settings).unwrap();
        assert_eq!(generator.provider().name(), "openai");
        assert_eq!(generator.retry_policy().max_retries, 4);
    }

    #[test]
    fn test_prompt_override_is_loaded() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("prompts.toml"),
            "title = \"Title in {{channel}} style: {{manuscript}}\"\n",
        )
        .unwrap();

        let mut settings = Settings::default();
        settings.prompts.custom_dir = Some(dir.path().to_string_lossy().to_string());
        settings
            .prompts
            .variables
            .insert("channel".to_string(), "DevOps Toolkit".to_string());

        let prompts = load_prompts(&settings).unwrap();
        assert_eq!(prompts.title, "Title in {{channel}} style: {{manuscript}}");
        assert_eq!(prompts.variables.get("channel").unwrap(), "DevOps Toolkit");
    }
}

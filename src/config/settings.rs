//! Configuration settings for Skrive.

use crate::error::{Result, SkriveError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable selecting the active provider.
pub const PROVIDER_ENV: &str = "SKRIVE_AI_PROVIDER";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub ai: AiSettings,
    pub retry: RetrySettings,
    pub shorts: ShortsSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Language model backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    OpenAi,
    /// Azure-hosted OpenAI deployment.
    Azure,
    Anthropic,
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "azure" | "azure-openai" | "azureopenai" => Ok(ProviderKind::Azure),
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            _ => Err(format!("Unknown AI provider: {}", s)),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::OpenAi => write!(f, "openai"),
            ProviderKind::Azure => write!(f, "azure"),
            ProviderKind::Anthropic => write!(f, "anthropic"),
        }
    }
}

/// Language model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    /// Active backend, fixed for the lifetime of the process.
    pub provider: ProviderKind,
    /// HTTP timeout for a single provider request.
    pub timeout_seconds: u64,
    pub openai: OpenAiSettings,
    pub azure: AzureSettings,
    pub anthropic: AnthropicSettings,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::OpenAi,
            timeout_seconds: crate::openai::DEFAULT_TIMEOUT_SECS,
            openai: OpenAiSettings::default(),
            azure: AzureSettings::default(),
            anthropic: AnthropicSettings::default(),
        }
    }
}

impl AiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// OpenAI backend settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OpenAiSettings {
    /// API key. Falls back to `OPENAI_API_KEY`.
    pub api_key: Option<String>,
    /// Chat model. Falls back to the backend default.
    pub model: Option<String>,
    /// Alternative API base for OpenAI-compatible gateways.
    pub api_base: Option<String>,
}

/// Azure OpenAI backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AzureSettings {
    /// API key. Falls back to `AZURE_OPENAI_API_KEY`.
    pub api_key: Option<String>,
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`.
    /// Falls back to `AZURE_OPENAI_ENDPOINT`.
    pub endpoint: Option<String>,
    /// Deployment name. Falls back to `AZURE_OPENAI_DEPLOYMENT`.
    pub deployment: Option<String>,
    pub api_version: String,
}

impl Default for AzureSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: None,
            deployment: None,
            api_version: "2024-10-21".to_string(),
        }
    }
}

/// Anthropic backend settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnthropicSettings {
    /// API key. Falls back to `ANTHROPIC_API_KEY`.
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub api_base: Option<String>,
}

/// Retry policy around provider calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Retries after the first attempt. Zero disables retrying.
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay_ms: 500,
            max_delay_ms: 8_000,
        }
    }
}

/// Short-form clip candidate settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShortsSettings {
    /// Maximum words in a candidate's text segment.
    pub max_words: usize,
    /// How many candidates to ask the model for.
    pub candidate_count: usize,
}

impl Default for ShortsSettings {
    fn default() -> Self {
        Self {
            max_words: 150,
            candidate_count: 10,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory holding a `prompts.toml` that overrides the built-in templates.
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    ///
    /// Environment overrides are applied after the file is read.
    pub fn load_from(path: Option<&PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let mut settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str::<Settings>(&content)?
        } else {
            Settings::default()
        };

        settings.apply_env()?;
        Ok(settings)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(value) = std::env::var(PROVIDER_ENV) {
            if !value.trim().is_empty() {
                self.ai.provider = value.parse().map_err(SkriveError::Config)?;
            }
        }
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skrive")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }
}

//! Configuration module for Skrive.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{placeholders, Prompts, PROMPTS_FILE};
pub use settings::{
    AiSettings, AnthropicSettings, AzureSettings, GeneralSettings, OpenAiSettings,
    PromptSettings, ProviderKind, RetrySettings, Settings, ShortsSettings, PROVIDER_ENV,
};

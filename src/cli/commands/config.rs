//! Config command implementation.

use super::doctor::mask_key;
use crate::cli::ConfigAction;
use crate::config::Settings;
use anyhow::Result;

/// Run the config command.
///
/// `Show` prints the effective settings, after environment and CLI overrides,
/// with API keys masked.
pub fn run_config(
    action: &ConfigAction,
    settings: &Settings,
    config_path: Option<&str>,
) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(&masked(settings))
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            println!("{}", toml_str);
        }

        ConfigAction::Path => {
            let config_path = match config_path {
                Some(p) => Settings::expand_path(p),
                None => Settings::default_config_path(),
            };
            println!("{}", config_path.display());
        }
    }

    Ok(())
}

/// A copy of `settings` safe to print.
fn masked(settings: &Settings) -> Settings {
    let mut settings = settings.clone();
    for key in [
        &mut settings.ai.openai.api_key,
        &mut settings.ai.azure.api_key,
        &mut settings.ai.anthropic.api_key,
    ] {
        if let Some(value) = key.as_mut() {
            *value = mask_key(value);
        }
    }
    settings
}

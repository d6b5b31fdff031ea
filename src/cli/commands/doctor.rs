//! Doctor command - verify configuration and provider credentials.

use crate::cli::preflight::load_prompts;
use crate::cli::Output;
use crate::config::{ProviderKind, Settings, PROMPTS_FILE, PROVIDER_ENV};
use crate::provider::{resolve_setting, Provider};
use console::style;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings, config_path: Option<&str>) -> anyhow::Result<()> {
    Output::header("Skrive Doctor");
    println!();
    println!("Checking configuration and provider credentials...\n");

    let mut checks = Vec::new();

    println!("{}", style("Configuration").bold());
    let mut section = vec![check_config_file(config_path), check_prompts(settings)];
    section.extend(check_limits(settings));
    print_all(&section);
    checks.extend(section);

    println!();

    println!("{}", style("AI Provider").bold());
    let section = vec![
        check_api_key(settings),
        check_provider(settings),
    ];
    print_all(&section);
    checks.extend(section);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Skrive.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Skrive is ready to use.");
    }

    Ok(())
}

fn print_all(checks: &[CheckResult]) {
    for check in checks {
        check.print();
    }
}

/// Check if config file exists.
fn check_config_file(config_path: Option<&str>) -> CheckResult {
    let path = match config_path {
        Some(p) => Settings::expand_path(p),
        None => Settings::default_config_path(),
    };
    if path.exists() {
        CheckResult::ok("Config file", &format!("{}", path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            &format!("Create {} to customize providers and prompts", path.display()),
        )
    }
}

/// Check that prompt templates (including overrides) are well-formed.
fn check_prompts(settings: &Settings) -> CheckResult {
    let source = match &settings.prompts.custom_dir {
        Some(dir) => format!("{}/{}", dir, PROMPTS_FILE),
        None => "built-in".to_string(),
    };
    match load_prompts(settings) {
        Ok(_) => CheckResult::ok("Prompts", &source),
        Err(e) => CheckResult::error(
            "Prompts",
            &e.to_string(),
            "Fix the placeholders in your prompts.toml or define the variable under [prompts.variables]",
        ),
    }
}

/// Check retry and shorts limits.
fn check_limits(settings: &Settings) -> Vec<CheckResult> {
    let mut results = Vec::new();

    let retry = &settings.retry;
    if retry.max_retries > 0 && retry.base_delay_ms > retry.max_delay_ms {
        results.push(CheckResult::warning(
            "Retry",
            &format!(
                "base delay {}ms exceeds max delay {}ms",
                retry.base_delay_ms, retry.max_delay_ms
            ),
            "Every retry will wait the max delay",
        ));
    } else {
        results.push(CheckResult::ok(
            "Retry",
            &format!("{} retries, {}ms base delay", retry.max_retries, retry.base_delay_ms),
        ));
    }

    let shorts = &settings.shorts;
    if shorts.max_words == 0 || shorts.candidate_count == 0 {
        results.push(CheckResult::error(
            "Shorts",
            "max_words and candidate_count must be positive",
            "Set [shorts] max_words and candidate_count in the config file",
        ));
    } else {
        results.push(CheckResult::ok(
            "Shorts",
            &format!(
                "up to {} candidates of at most {} words",
                shorts.candidate_count, shorts.max_words
            ),
        ));
    }

    results
}

/// Check the API key of the active provider, masking it in the output.
fn check_api_key(settings: &Settings) -> CheckResult {
    let (configured, env_var) = match settings.ai.provider {
        ProviderKind::OpenAi => (settings.ai.openai.api_key.as_deref(), "OPENAI_API_KEY"),
        ProviderKind::Azure => (settings.ai.azure.api_key.as_deref(), "AZURE_OPENAI_API_KEY"),
        ProviderKind::Anthropic => (
            settings.ai.anthropic.api_key.as_deref(),
            "ANTHROPIC_API_KEY",
        ),
    };

    match resolve_setting(configured, env_var) {
        Some(key) => CheckResult::ok("API key", &format!("configured ({})", mask_key(&key))),
        None => CheckResult::error(
            "API key",
            "not set",
            &format!("Set with: export {}='...'", env_var),
        ),
    }
}

/// Check that the active provider can be built from settings.
fn check_provider(settings: &Settings) -> CheckResult {
    match Provider::from_settings(&settings.ai) {
        Ok(provider) => CheckResult::ok(
            "Provider",
            &format!("{} ({})", provider.kind(), provider.model()),
        ),
        Err(e) => CheckResult::error(
            "Provider",
            &e.to_string(),
            &format!(
                "Select a provider with ai.provider, {} or --provider",
                PROVIDER_ENV
            ),
        ),
    }
}

/// Show the first and last four characters of a key.
pub(crate) fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 12 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_ok() {
        let result = CheckResult::ok("test", "passed");
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.hint.is_none());
    }

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("sk-abcdefghijklmnop"), "sk-a...mnop");
        assert_eq!(mask_key("short"), "****");
    }

    #[test]
    fn test_zero_shorts_limit_is_error() {
        let mut settings = Settings::default();
        settings.shorts.max_words = 0;
        let results = check_limits(&settings);
        assert!(results.iter().any(|r| r.name == "Shorts" && r.status == CheckStatus::Error));
    }

    #[test]
    fn test_configured_key_is_found() {
        let mut settings = Settings::default();
        settings.ai.provider = ProviderKind::Anthropic;
        settings.ai.anthropic.api_key = Some("sk-ant-0123456789".to_string());
        assert_eq!(check_api_key(&settings).status, CheckStatus::Ok);
    }
}

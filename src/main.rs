//! Skrive CLI entry point.

use anyhow::Result;
use clap::Parser;
use skrive::cli::{commands, Cli, Commands};
use skrive::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&Settings::expand_path(path)))?,
        None => Settings::load()?,
    };
    if let Some(provider) = &cli.provider {
        settings.ai.provider = provider.parse().map_err(anyhow::Error::msg)?;
    }

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("skrive={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    // Execute command
    match &cli.command {
        Commands::Generate {
            task,
            input,
            language,
            json,
        } => {
            commands::run_generate(*task, input, language.as_deref(), *json, settings).await?;
        }

        Commands::Package { manuscript, json } => {
            commands::run_package(manuscript, *json, settings).await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings, cli.config.as_deref())?;
        }

        Commands::Config { action } => {
            commands::run_config(action, &settings, cli.config.as_deref())?;
        }
    }

    Ok(())
}

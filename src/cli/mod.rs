//! CLI module for Skrive.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use crate::generation::TaskKind;
use clap::{Parser, Subcommand};

/// Skrive - publishing metadata for video creators
///
/// Turns manuscripts, transcripts and channel analytics into titles, descriptions,
/// tags, timecodes, social posts, shorts candidates and publish-timing advice.
/// The name "Skrive" is the Norwegian word for "write."
#[derive(Parser, Debug)]
#[command(name = "skrive")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// AI provider to use (openai, azure, anthropic); overrides config and SKRIVE_AI_PROVIDER
    #[arg(short, long, global = true)]
    pub provider: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a single generation task
    Generate {
        /// Task to run (title, description, tags, description-tags, highlights,
        /// timecodes, tweets, shorts, timing, translation, ama)
        #[arg(value_parser = parse_task)]
        task: TaskKind,

        /// Input file: manuscript or transcript text, JSON analytics for `timing`,
        /// JSON metadata for `translation`
        input: String,

        /// Target language (translation only)
        #[arg(short, long)]
        language: Option<String>,

        /// Print the artifact as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate the full publishing package for a manuscript
    Package {
        /// Manuscript file
        manuscript: String,

        /// Print the package as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check configuration and provider credentials
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}

fn parse_task(s: &str) -> Result<TaskKind, String> {
    s.parse()
}

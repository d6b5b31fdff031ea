//! Generate command - run a single task against an input file.

use crate::cli::preflight::build_generator;
use crate::cli::Output;
use crate::config::Settings;
use crate::generation::{GenerationContext, TaskKind};
use crate::tasks::{ShortsConfig, VideoAnalytics, VideoMetadata};
use anyhow::{Context, Result};
use serde::Serialize;
use tokio::sync::watch;

/// Run one generation task.
pub async fn run_generate(
    task: TaskKind,
    input: &str,
    language: Option<&str>,
    json: bool,
    settings: Settings,
) -> Result<()> {
    let content = std::fs::read_to_string(Settings::expand_path(input))
        .with_context(|| format!("Failed to read input file: {}", input))?;
    let generator = build_generator(&settings)?;
    let ctx = cancel_on_ctrl_c();

    // Structured inputs are decoded before the spinner starts.
    let analytics: Vec<VideoAnalytics> = match task {
        TaskKind::Timing => parse_json(&content, input, "analytics")?,
        _ => Vec::new(),
    };
    let (metadata, language) = match task {
        TaskKind::Translation => (
            parse_json::<VideoMetadata>(&content, input, "metadata")?,
            language.context("--language is required for the translation task")?,
        ),
        _ => (VideoMetadata::default(), ""),
    };

    let spinner = Output::spinner(&format!("Generating {}...", task));

    match task {
        TaskKind::Title => {
            let title = generator.generate_title(&ctx, &content).await;
            spinner.finish_and_clear();
            emit(json, &title?, |t| println!("{}", t))?;
        }
        TaskKind::Description => {
            let description = generator.generate_description(&ctx, &content).await;
            spinner.finish_and_clear();
            emit(json, &description?, |d| println!("{}", d))?;
        }
        TaskKind::Tags => {
            let tags = generator.generate_tags(&ctx, &content).await;
            spinner.finish_and_clear();
            let tags = tags?;
            if tags.truncated && !json {
                Output::warning("Tag list was truncated to fit the character limit.");
            }
            emit(json, &tags, |t| println!("{}", t.value))?;
        }
        TaskKind::DescriptionTags => {
            let tags = generator.generate_description_tags(&ctx, &content).await;
            spinner.finish_and_clear();
            emit(json, &tags?, |t| println!("{}", t))?;
        }
        TaskKind::Highlights => {
            let highlights = generator.generate_highlights(&ctx, &content).await;
            spinner.finish_and_clear();
            emit(json, &highlights?, |items| {
                Output::header("Highlights");
                for item in items {
                    Output::list_item(item);
                }
            })?;
        }
        TaskKind::Timecodes => {
            let timecodes = generator.generate_timecodes(&ctx, &content).await;
            spinner.finish_and_clear();
            emit(json, &timecodes?, |t| println!("{}", t))?;
        }
        TaskKind::Tweets => {
            let tweets = generator.generate_tweets(&ctx, &content).await;
            spinner.finish_and_clear();
            emit(json, &tweets?, |items| {
                Output::header("Tweets");
                for item in items {
                    Output::list_item(item);
                }
            })?;
        }
        TaskKind::Shorts => {
            let config = ShortsConfig::from(&settings.shorts);
            let candidates = generator.generate_shorts(&ctx, &content, config).await;
            spinner.finish_and_clear();
            emit(json, &candidates?, |items| {
                Output::header(&format!("{} shorts candidates", items.len()));
                for c in items {
                    Output::short_candidate(&c.id, &c.title, c.word_count(), &c.text, &c.rationale);
                }
            })?;
        }
        TaskKind::Timing => {
            let recommendations = generator.generate_timing(&ctx, &analytics).await;
            spinner.finish_and_clear();
            emit(json, &recommendations?, |items| {
                Output::header("Recommended publishing slots (UTC)");
                for r in items {
                    Output::list_item(&format!("{} {} - {}", r.day, r.time, r.reasoning));
                }
            })?;
        }
        TaskKind::Translation => {
            let translated = generator.translate_metadata(&ctx, &metadata, language).await;
            spinner.finish_and_clear();
            // Translations are structured; always print JSON.
            emit(true, &translated?, |_| {})?;
        }
        TaskKind::Ama => {
            let content = generator.generate_ama(&ctx, &content).await;
            spinner.finish_and_clear();
            emit(json, &content?, |c| {
                Output::header("Title");
                Output::block(&c.title);
                Output::header("Description");
                Output::block(&c.description);
                Output::header("Tags");
                Output::block(&c.tags);
                Output::header("Timecodes");
                Output::block(&c.timecodes);
            })?;
        }
    }

    Ok(())
}

fn parse_json<T: serde::de::DeserializeOwned>(content: &str, path: &str, what: &str) -> Result<T> {
    serde_json::from_str(content)
        .with_context(|| format!("Failed to parse {} JSON: {}", what, path))
}

/// Print `value` as pretty JSON, or through `human` for terminal output.
pub(crate) fn emit<T: Serialize>(json: bool, value: &T, human: impl FnOnce(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        human(value);
    }
    Ok(())
}

/// A context cancelled when the user presses Ctrl-C.
pub(crate) fn cancel_on_ctrl_c() -> GenerationContext {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = tx.send(true);
        }
    });
    GenerationContext::new().with_cancel(rx)
}

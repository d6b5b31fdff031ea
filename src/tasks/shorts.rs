//! Short-form clip candidates cut from a manuscript.

use crate::config::ShortsSettings;
use crate::error::{Result, SkriveError};
use crate::generation::decode::ListShape;
use crate::generation::normalize::extract_payload;
use crate::generation::validate::{
    max_words, non_empty, word_count, Validation, ValidationRule, Violation,
};
use crate::generation::{require_input, vars, GenerationContext, Generator, TaskKind};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

/// Object field wrapping the candidate array.
pub const SHORTS_FIELD: &str = "candidates";

/// Bounds for a shorts request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortsConfig {
    /// Maximum words in a candidate's text.
    pub max_words: usize,
    /// Number of candidates requested from the model.
    pub candidate_count: usize,
}

impl Default for ShortsConfig {
    fn default() -> Self {
        Self {
            max_words: 150,
            candidate_count: 10,
        }
    }
}

impl From<&ShortsSettings> for ShortsConfig {
    fn from(settings: &ShortsSettings) -> Self {
        Self {
            max_words: settings.max_words,
            candidate_count: settings.candidate_count,
        }
    }
}

/// A manuscript segment that can stand alone as a short video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortCandidate {
    pub id: String,
    pub title: String,
    /// Verbatim excerpt from the manuscript.
    pub text: String,
    /// Why the segment works; shown to the user but never stored.
    #[serde(default, skip_serializing)]
    pub rationale: String,
}

impl ShortCandidate {
    pub fn word_count(&self) -> usize {
        word_count(&self.text)
    }
}

impl Generator {
    /// Find segments of `manuscript` suitable for short-form videos.
    #[instrument(skip(self, ctx, manuscript), fields(task = "shorts"))]
    pub async fn generate_shorts(
        &self,
        ctx: &GenerationContext,
        manuscript: &str,
        config: ShortsConfig,
    ) -> Result<Vec<ShortCandidate>> {
        let task = TaskKind::Shorts;
        let manuscript = require_input(task, "manuscript", manuscript)?;
        if config.max_words == 0 || config.candidate_count == 0 {
            return Err(SkriveError::InvalidInput(format!(
                "{}: max_words and candidate_count must be positive",
                task
            )));
        }

        let prompt = self.render(
            task,
            &vars([
                ("manuscript", manuscript.to_string()),
                ("max_words", config.max_words.to_string()),
                ("candidate_count", config.candidate_count.to_string()),
            ]),
        )?;
        let raw = self.invoke(ctx, task, &prompt).await?;

        let candidates =
            parse_shorts(&raw, config.max_words).map_err(|e| e.with_context(task.name()))?;
        if candidates.len() > config.candidate_count {
            warn!(
                "Model returned {} candidates, {} requested",
                candidates.len(),
                config.candidate_count
            );
        }
        info!("Generated {} short candidates", candidates.len());
        Ok(candidates)
    }
}

/// Decode candidates from a bare array or a `candidates` object and check them
/// against `max_words`.
pub fn parse_shorts(raw: &str, max_words: usize) -> Result<Vec<ShortCandidate>> {
    let payload = extract_payload(raw);
    let candidates = ListShape::<ShortCandidate>::decode(&payload, SHORTS_FIELD)?.into_items();
    validate_shorts(&candidates, max_words)?;
    Ok(candidates)
}

fn validate_shorts(candidates: &[ShortCandidate], limit: usize) -> Validation<()> {
    if candidates.is_empty() {
        return Err(Violation::new("shorts", ValidationRule::NonEmptyList, "[]"));
    }

    for (i, candidate) in candidates.iter().enumerate() {
        non_empty(&format!("shorts[{}].id", i), &candidate.id)?;
        non_empty(&format!("shorts[{}].title", i), &candidate.title)?;
        let text_field = format!("shorts[{}].text", i);
        non_empty(&text_field, &candidate.text)?;
        max_words(&text_field, &candidate.text, limit)?;
    }
    Ok(())
}

//! Manuscript phrases worth emphasizing.

use crate::error::Result;
use crate::generation::decode::ListShape;
use crate::generation::normalize::extract_payload;
use crate::generation::validate::{Validation, ValidationRule, Violation};
use crate::generation::{require_input, vars, GenerationContext, Generator, TaskKind};
use tracing::{debug, info, instrument};

/// Object field wrapping the highlight array.
pub const HIGHLIGHTS_FIELD: &str = "suggested_highlights";

impl Generator {
    /// Suggest phrases from `manuscript` to emphasize.
    ///
    /// The phrases are not checked against the manuscript; see [`apply_highlights`]
    /// for marking the ones that do occur.
    #[instrument(skip(self, ctx, manuscript), fields(task = "highlights"))]
    pub async fn generate_highlights(
        &self,
        ctx: &GenerationContext,
        manuscript: &str,
    ) -> Result<Vec<String>> {
        let task = TaskKind::Highlights;
        let manuscript = require_input(task, "manuscript", manuscript)?;

        let prompt = self.render(task, &vars([("manuscript", manuscript.to_string())]))?;
        let raw = self.invoke(ctx, task, &prompt).await?;

        let highlights = parse_highlights(&raw).map_err(|e| e.with_context(task.name()))?;
        info!("Generated {} highlights", highlights.len());
        Ok(highlights)
    }
}

/// Decode a highlight list from a bare array or a `suggested_highlights` object.
pub fn parse_highlights(raw: &str) -> Result<Vec<String>> {
    let payload = extract_payload(raw);
    let highlights = ListShape::<String>::decode(&payload, HIGHLIGHTS_FIELD)?.into_items();
    validate_highlights(&highlights)?;
    Ok(highlights)
}

fn validate_highlights(highlights: &[String]) -> Validation<()> {
    for (i, phrase) in highlights.iter().enumerate() {
        if phrase.trim().is_empty() {
            return Err(Violation::new(
                format!("highlights[{}]", i),
                ValidationRule::NonEmpty,
                phrase,
            ));
        }
    }
    Ok(())
}

/// Bold the first occurrence of each highlight in `manuscript` with `**`.
///
/// Phrases that do not occur, or whose first occurrence is already bold, are
/// skipped. Returns the marked text and how many phrases were applied.
pub fn apply_highlights(manuscript: &str, highlights: &[String]) -> (String, usize) {
    let mut text = manuscript.to_string();
    let mut applied = 0;

    for phrase in highlights {
        let phrase = phrase.trim();
        if phrase.is_empty() {
            continue;
        }
        let Some(start) = text.find(phrase) else {
            debug!("Highlight not found in manuscript: {:?}", phrase);
            continue;
        };
        let end = start + phrase.len();
        if text[..start].ends_with("**") && text[end..].starts_with("**") {
            continue;
        }
        text.replace_range(start..end, &format!("**{}**", phrase));
        applied += 1;
    }

    (text, applied)
}

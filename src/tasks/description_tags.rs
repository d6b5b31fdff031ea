//! The three hashtags appended to a video description.

use crate::error::{Result, SkriveError};
use crate::generation::normalize::extract_text;
use crate::generation::validate::{non_empty, Validation, ValidationRule, Violation};
use crate::generation::{require_input, vars, GenerationContext, Generator, TaskKind};
use serde::Serialize;
use tracing::{info, instrument};

/// Number of hashtags a description carries.
pub const DESCRIPTION_TAG_COUNT: usize = 3;

const MARKER: char = '#';

/// Exactly three `#`-prefixed tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DescriptionTags {
    tags: Vec<String>,
}

impl DescriptionTags {
    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

impl std::fmt::Display for DescriptionTags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tags.join(" "))
    }
}

impl Generator {
    /// Generate the three hashtags for the video described by `manuscript`.
    #[instrument(skip(self, ctx, manuscript), fields(task = "description-tags"))]
    pub async fn generate_description_tags(
        &self,
        ctx: &GenerationContext,
        manuscript: &str,
    ) -> Result<DescriptionTags> {
        let task = TaskKind::DescriptionTags;
        let manuscript = require_input(task, "manuscript", manuscript)?;

        let prompt = self.render(task, &vars([("manuscript", manuscript.to_string())]))?;
        let raw = self.invoke(ctx, task, &prompt).await?;

        let tags = parse_description_tags(&raw)?;
        info!("Generated description tags: {}", tags);
        Ok(tags)
    }
}

/// Normalize and validate a raw hashtag response.
///
/// Tokens are split on whitespace and commas, so `#a, #b, #c` is accepted and
/// re-joined with single spaces.
pub fn parse_description_tags(raw: &str) -> Result<DescriptionTags> {
    let text = extract_text(raw);
    validate_description_tags(&text).map_err(SkriveError::from)
}

fn validate_description_tags(text: &str) -> Validation<DescriptionTags> {
    const FIELD: &str = "description_tags";
    non_empty(FIELD, text)?;

    let tokens: Vec<&str> = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.len() != DESCRIPTION_TAG_COUNT {
        return Err(Violation::new(
            FIELD,
            ValidationRule::ExactTokenCount {
                expected: DESCRIPTION_TAG_COUNT,
                actual: tokens.len(),
            },
            text,
        ));
    }

    let well_formed = tokens
        .iter()
        .all(|t| t.strip_prefix(MARKER).is_some_and(|rest| !rest.is_empty()));
    if !well_formed {
        return Err(Violation::new(
            FIELD,
            ValidationRule::TokenPrefix { marker: MARKER },
            text,
        ));
    }

    Ok(DescriptionTags {
        tags: tokens.into_iter().map(str::to_string).collect(),
    })
}

//! Comma-separated video tags.

use crate::error::Result;
use crate::generation::normalize::extract_text;
use crate::generation::validate::{non_empty, truncate_at_separator, Validation};
use crate::generation::{require_input, vars, GenerationContext, Generator, TaskKind};
use serde::Serialize;
use tracing::{info, instrument, warn};

/// Upper bound on the tag list length, in characters.
pub const TAGS_MAX_CHARS: usize = 450;

/// A tag list that fits within [`TAGS_MAX_CHARS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tags {
    pub value: String,
    /// Whether trailing tags were dropped to fit the limit.
    pub truncated: bool,
}

impl Tags {
    /// Individual tags, trimmed, without empty entries.
    pub fn list(&self) -> Vec<&str> {
        self.value
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }
}

impl Generator {
    /// Generate a comma-separated tag list for the video described by `manuscript`.
    #[instrument(skip(self, ctx, manuscript), fields(task = "tags"))]
    pub async fn generate_tags(&self, ctx: &GenerationContext, manuscript: &str) -> Result<Tags> {
        let task = TaskKind::Tags;
        let manuscript = require_input(task, "manuscript", manuscript)?;

        let prompt = self.render(
            task,
            &vars([
                ("manuscript", manuscript.to_string()),
                ("max_chars", TAGS_MAX_CHARS.to_string()),
            ]),
        )?;
        let raw = self.invoke(ctx, task, &prompt).await?;

        let tags = parse_tags(&raw)?;
        info!("Generated {} tags ({} chars)", tags.list().len(), tags.value.chars().count());
        Ok(tags)
    }
}

/// Normalize a raw tag response and fit it within [`TAGS_MAX_CHARS`].
pub fn parse_tags(raw: &str) -> Result<Tags> {
    let text = extract_text(raw);
    let joined = if text.contains('\n') {
        text.lines()
            .map(|l| l.trim().trim_end_matches(','))
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    } else {
        text
    };
    Ok(fit_tags(&joined)?)
}

/// Truncate a tag list at the last comma within [`TAGS_MAX_CHARS`].
///
/// Stray separators at either end are dropped first, and the fitted list must
/// still hold at least one tag.
pub(crate) fn fit_tags(value: &str) -> Validation<Tags> {
    let (value, truncated) = truncate_at_separator(trim_separators(value), TAGS_MAX_CHARS, ',');
    let value = trim_separators(&value).to_string();
    non_empty("tags", &value)?;
    if truncated {
        warn!(
            "Tag list exceeded {} characters, truncated to {}",
            TAGS_MAX_CHARS,
            value.chars().count()
        );
    }
    Ok(Tags { value, truncated })
}

fn trim_separators(value: &str) -> &str {
    value.trim_matches(|c: char| c == ',' || c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SkriveError;
    use crate::generation::validate::ValidationRule;
    use crate::provider::MockProvider;
    use std::sync::Arc;

    #[test]
    fn test_short_tags_untouched() {
        let tags = parse_tags("kubernetes, devops, gitops").unwrap();
        assert_eq!(tags.value, "kubernetes, devops, gitops");
        assert!(!tags.truncated);
        assert_eq!(tags.list(), vec!["kubernetes", "devops", "gitops"]);
    }

    #[test]
    fn test_line_per_tag_is_joined() {
        let tags = parse_tags("kubernetes\ndevops,\n\ngitops").unwrap();
        assert_eq!(tags.value, "kubernetes, devops, gitops");
    }

    #[test]
    fn test_long_tags_truncated_at_comma() {
        let raw: Vec<String> = (0..100).map(|i| format!("tag-number-{}", i)).collect();
        let raw = raw.join(",");

        let tags = parse_tags(&raw).unwrap();
        assert!(tags.truncated);
        assert!(tags.value.chars().count() <= TAGS_MAX_CHARS);
        assert!(!tags.value.ends_with(','));
        assert!(raw.starts_with(&tags.value));
        // the cut lands on a tag boundary
        assert_eq!(raw.as_bytes()[tags.value.len()], b',');
    }

    #[test]
    fn test_blank_tags_rejected() {
        assert!(matches!(parse_tags("\"\""), Err(SkriveError::Validation(_))));
    }

    #[test]
    fn test_stray_separators_dropped() {
        let tags = parse_tags(", kubernetes, devops,").unwrap();
        assert_eq!(tags.value, "kubernetes, devops");
        assert!(!tags.truncated);
    }

    #[test]
    fn test_leading_comma_before_oversized_tag() {
        let tags = parse_tags(&format!(",{}", "x".repeat(600))).unwrap();
        assert!(tags.truncated);
        assert_eq!(tags.value, "x".repeat(TAGS_MAX_CHARS));
    }

    #[test]
    fn test_separators_only_rejected() {
        match parse_tags(", , ,") {
            Err(SkriveError::Validation(v)) => {
                assert_eq!(v.field, "tags");
                assert_eq!(v.rule, ValidationRule::NonEmpty);
            }
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_prompt_carries_limit() {
        let provider = Arc::new(MockProvider::returning("rust, async"));
        let generator = Generator::new(provider.clone());
        generator
            .generate_tags(&GenerationContext::new(), "manuscript")
            .await
            .unwrap();
        assert!(provider.last_prompt().unwrap().contains("450"));
    }
}

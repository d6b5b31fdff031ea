//! Video title generation.

use crate::error::Result;
use crate::generation::normalize::extract_text;
use crate::generation::validate::{non_empty, Validation, ValidationRule, Violation};
use crate::generation::{require_input, vars, GenerationContext, Generator, TaskKind};
use tracing::{info, instrument};

impl Generator {
    /// Generate a single title for the video described by `manuscript`.
    #[instrument(skip(self, ctx, manuscript), fields(task = "title"))]
    pub async fn generate_title(&self, ctx: &GenerationContext, manuscript: &str) -> Result<String> {
        let task = TaskKind::Title;
        let manuscript = require_input(task, "manuscript", manuscript)?;

        let prompt = self.render(task, &vars([("manuscript", manuscript.to_string())]))?;
        let raw = self.invoke(ctx, task, &prompt).await?;

        let title = parse_title(&raw).map_err(|e| e.with_context(task.name()))?;
        info!("Generated title ({} chars)", title.chars().count());
        Ok(title)
    }
}

/// Normalize and validate a raw title response.
pub fn parse_title(raw: &str) -> Result<String> {
    let title = extract_text(raw);
    validate_title(&title)?;
    Ok(title)
}

fn validate_title(title: &str) -> Validation<()> {
    non_empty("title", title)?;
    if title.lines().count() > 1 {
        return Err(Violation::new("title", ValidationRule::SingleLine, title));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SkriveError;
    use crate::provider::MockProvider;
    use std::sync::Arc;

    #[test]
    fn test_parse_title_strips_quotes() {
        assert_eq!(
            parse_title("\"Stop Writing YAML by Hand\"\n").unwrap(),
            "Stop Writing YAML by Hand"
        );
    }

    #[test]
    fn test_apostrophe_in_single_quoted_title() {
        assert_eq!(
            parse_title("'Don't Deploy on Fridays'").unwrap(),
            "Don't Deploy on Fridays"
        );
    }

    #[test]
    fn test_multiline_title_is_rejected() {
        let err = parse_title("Title one\nTitle two").unwrap_err();
        match err {
            SkriveError::Validation(v) => assert_eq!(v.rule, ValidationRule::SingleLine),
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_quotes_only_title_is_rejected() {
        let err = parse_title("\"\"").unwrap_err();
        assert!(matches!(err, SkriveError::Validation(ref v) if v.rule == ValidationRule::NonEmpty));
    }

    #[tokio::test]
    async fn test_generate_title_end_to_end() {
        let provider = Arc::new(MockProvider::returning("```\n\"Crossplane Explained\"\n```"));
        let generator = Generator::new(provider.clone());

        let title = generator
            .generate_title(&GenerationContext::new(), "A manuscript about Crossplane.")
            .await
            .unwrap();

        assert_eq!(title, "Crossplane Explained");
        let prompt = provider.last_prompt().unwrap();
        assert!(prompt.contains("A manuscript about Crossplane."));
        assert_eq!(provider.last_max_tokens(), Some(TaskKind::Title.max_tokens()));
    }
}

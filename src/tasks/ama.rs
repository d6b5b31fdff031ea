//! Publishing package for an "Ask Me Anything" recording.

use super::tags::{fit_tags, TAGS_MAX_CHARS};
use crate::error::{Result, SkriveError};
use crate::generation::decode::decode_object;
use crate::generation::normalize::extract_payload;
use crate::generation::validate::{non_empty, Validation, ValidationRule, Violation};
use crate::generation::{require_input, vars, GenerationContext, Generator, TaskKind};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Title, description, tags and timecodes for an AMA video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmaContent {
    pub title: String,
    pub description: String,
    pub tags: String,
    pub timecodes: String,
    /// Whether `tags` was cut to fit [`TAGS_MAX_CHARS`].
    #[serde(default, skip_deserializing)]
    pub tags_truncated: bool,
}

impl Generator {
    /// Build the publishing package for an AMA from its `transcript`.
    #[instrument(skip(self, ctx, transcript), fields(task = "ama"))]
    pub async fn generate_ama(&self, ctx: &GenerationContext, transcript: &str) -> Result<AmaContent> {
        let task = TaskKind::Ama;
        let transcript = require_input(task, "transcript", transcript)?;

        let prompt = self.render(
            task,
            &vars([
                ("transcript", transcript.to_string()),
                ("tags_max_chars", TAGS_MAX_CHARS.to_string()),
            ]),
        )?;
        let raw = self.invoke(ctx, task, &prompt).await?;

        let content = parse_ama(&raw).map_err(|e| e.with_context(task.name()))?;
        info!("Generated AMA content: {:?}", content.title);
        Ok(content)
    }
}

/// Decode an AMA object, check every field and fit the tags.
pub fn parse_ama(raw: &str) -> Result<AmaContent> {
    let payload = extract_payload(raw);
    let mut content: AmaContent = decode_object(&payload, "AMA content")?;
    content.title = content.title.trim().to_string();
    content.timecodes = content.timecodes.trim().to_string();
    validate_ama(&content).map_err(SkriveError::from)?;

    let tags = fit_tags(&content.tags).map_err(SkriveError::from)?;
    content.tags = tags.value;
    content.tags_truncated = tags.truncated;
    Ok(content)
}

fn validate_ama(content: &AmaContent) -> Validation<()> {
    non_empty("title", &content.title)?;
    if content.title.lines().count() > 1 {
        return Err(Violation::new("title", ValidationRule::SingleLine, &content.title));
    }
    non_empty("description", &content.description)?;
    non_empty("tags", &content.tags)?;
    non_empty("timecodes", &content.timecodes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_object_accepted() {
        let raw = r#"```json
{"title": " AMA: Platform Engineering ", "description": "Questions about IDPs.", "tags": "ama, platform", "timecodes": "00:00:00 Intro\n00:04:10 Backstage"}
```"#;
        let content = parse_ama(raw).unwrap();
        assert_eq!(content.title, "AMA: Platform Engineering");
        assert_eq!(content.tags, "ama, platform");
        assert!(!content.tags_truncated);
    }

    #[test]
    fn test_long_tags_truncated() {
        let tags: Vec<String> = (0..80).map(|i| format!("question-{}", i)).collect();
        let raw = serde_json::json!({
            "title": "AMA",
            "description": "d",
            "tags": tags.join(", "),
            "timecodes": "00:00:00 Intro",
        })
        .to_string();

        let content = parse_ama(&raw).unwrap();
        assert!(content.tags_truncated);
        assert!(content.tags.chars().count() <= TAGS_MAX_CHARS);
        assert!(!content.tags.ends_with(','));
    }

    #[test]
    fn test_blank_field_rejected() {
        let raw = r#"{"title": "AMA", "description": "", "tags": "a", "timecodes": "00:00:00 Intro"}"#;
        match parse_ama(raw).unwrap_err() {
            SkriveError::Validation(v) => {
                assert_eq!(v.field, "description");
                assert_eq!(v.rule, ValidationRule::NonEmpty);
            }
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_separator_only_tags_rejected() {
        let raw = r#"{"title": "AMA", "description": "d", "tags": " , ,", "timecodes": "00:00:00 Intro"}"#;
        match parse_ama(raw).unwrap_err() {
            SkriveError::Validation(v) => {
                assert_eq!(v.field, "tags");
                assert_eq!(v.rule, ValidationRule::NonEmpty);
            }
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_tags_truncated_flag_not_read_from_payload() {
        let raw = r#"{"title": "AMA", "description": "d", "tags": "a", "timecodes": "t", "tags_truncated": true}"#;
        assert!(!parse_ama(raw).unwrap().tags_truncated);
    }
}

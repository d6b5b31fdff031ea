//! Translation of video metadata.

use crate::error::{Result, SkriveError};
use crate::generation::decode::decode_object;
use crate::generation::normalize::extract_payload;
use crate::generation::validate::{Validation, ValidationRule, Violation};
use crate::generation::{require_input, vars, GenerationContext, Generator, TaskKind};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// The translatable metadata of a video.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    pub description: String,
    pub tags: String,
    pub timecodes: String,
    #[serde(default)]
    pub short_titles: Vec<String>,
}

impl VideoMetadata {
    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty()
            && self.description.trim().is_empty()
            && self.tags.trim().is_empty()
            && self.timecodes.trim().is_empty()
            && self.short_titles.iter().all(|t| t.trim().is_empty())
    }

    fn text_fields(&self) -> [(&'static str, &str); 4] {
        [
            ("title", self.title.as_str()),
            ("description", self.description.as_str()),
            ("tags", self.tags.as_str()),
            ("timecodes", self.timecodes.as_str()),
        ]
    }
}

impl Generator {
    /// Translate `metadata` into `target_language`, keeping its structure.
    #[instrument(skip(self, ctx, metadata), fields(task = "translation"))]
    pub async fn translate_metadata(
        &self,
        ctx: &GenerationContext,
        metadata: &VideoMetadata,
        target_language: &str,
    ) -> Result<VideoMetadata> {
        let task = TaskKind::Translation;
        let target_language = require_input(task, "target language", target_language)?;
        if metadata.is_empty() {
            return Err(SkriveError::InvalidInput(format!(
                "{}: metadata has no content",
                task
            )));
        }

        let metadata_json = serde_json::to_string_pretty(metadata).map_err(|e| {
            SkriveError::Template(format!("{}: cannot encode metadata: {}", task, e))
        })?;
        let prompt = self.render(
            task,
            &vars([
                ("target_language", target_language.to_string()),
                ("metadata_json", metadata_json),
            ]),
        )?;
        let raw = self.invoke(ctx, task, &prompt).await?;

        let translated =
            parse_translation(&raw, metadata).map_err(|e| e.with_context(task.name()))?;
        info!("Translated metadata into {}", target_language);
        Ok(translated)
    }
}

/// Decode a translated metadata object and check it mirrors `source`.
pub fn parse_translation(raw: &str, source: &VideoMetadata) -> Result<VideoMetadata> {
    let payload = extract_payload(raw);
    let translated: VideoMetadata = decode_object(&payload, "translated metadata")?;
    validate_translation(source, &translated)?;
    Ok(translated)
}

fn validate_translation(source: &VideoMetadata, translated: &VideoMetadata) -> Validation<()> {
    let pairs = source.text_fields().into_iter().zip(translated.text_fields());
    for ((field, input), (_, output)) in pairs {
        if !input.trim().is_empty() && output.trim().is_empty() {
            return Err(Violation::new(field, ValidationRule::PreservesContent, output));
        }
    }

    let expected = source.short_titles.len();
    let actual = translated.short_titles.len();
    if expected != actual {
        return Err(Violation::new(
            "short_titles",
            ValidationRule::ItemCount { expected, actual },
            &translated.short_titles.join(" | "),
        ));
    }
    for (i, (input, output)) in source
        .short_titles
        .iter()
        .zip(&translated.short_titles)
        .enumerate()
    {
        if !input.trim().is_empty() && output.trim().is_empty() {
            return Err(Violation::new(
                format!("short_titles[{}]", i),
                ValidationRule::PreservesContent,
                output,
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockProvider;
    use std::sync::Arc;

    fn source() -> VideoMetadata {
        VideoMetadata {
            title: "Crossplane Explained".to_string(),
            description: "What Crossplane is and why it matters.".to_string(),
            tags: "crossplane, kubernetes".to_string(),
            timecodes: String::new(),
            short_titles: vec!["Why compositions".to_string()],
        }
    }

    fn violation(err: SkriveError) -> Violation {
        match err {
            SkriveError::Validation(v) => v,
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_mirrored_translation_accepted() {
        let raw = r#"```json
{"title": "Crossplane forklart", "description": "Hva Crossplane er.", "tags": "crossplane, kubernetes", "timecodes": "", "short_titles": ["Hvorfor komposisjoner"]}
```"#;
        let translated = parse_translation(raw, &source()).unwrap();
        assert_eq!(translated.title, "Crossplane forklart");
        assert_eq!(translated.timecodes, "");
    }

    #[test]
    fn test_dropped_content_rejected() {
        let raw = r#"{"title": "Crossplane forklart", "description": "", "tags": "x", "timecodes": "", "short_titles": ["y"]}"#;
        let v = violation(parse_translation(raw, &source()).unwrap_err());
        assert_eq!(v.field, "description");
        assert_eq!(v.rule, ValidationRule::PreservesContent);
    }

    #[test]
    fn test_short_title_count_must_match() {
        let raw = r#"{"title": "a", "description": "b", "tags": "c", "timecodes": "", "short_titles": []}"#;
        let v = violation(parse_translation(raw, &source()).unwrap_err());
        assert_eq!(
            v.rule,
            ValidationRule::ItemCount {
                expected: 1,
                actual: 0
            }
        );
    }

    #[test]
    fn test_missing_field_is_parse_error() {
        let raw = r#"{"title": "a", "description": "b"}"#;
        assert!(matches!(
            parse_translation(raw, &source()),
            Err(SkriveError::Parse { .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_metadata_rejected_before_call() {
        let provider = Arc::new(MockProvider::returning("{}"));
        let generator = Generator::new(provider.clone());

        let err = generator
            .translate_metadata(&GenerationContext::new(), &VideoMetadata::default(), "Norwegian")
            .await
            .unwrap_err();
        assert!(matches!(err, SkriveError::InvalidInput(_)));

        let err = generator
            .translate_metadata(&GenerationContext::new(), &source(), "  ")
            .await
            .unwrap_err();
        assert!(matches!(err, SkriveError::InvalidInput(_)));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_prompt_embeds_metadata_json() {
        let reply = serde_json::to_string(&source()).unwrap();
        let provider = Arc::new(MockProvider::returning(reply));
        let generator = Generator::new(provider.clone());

        generator
            .translate_metadata(&GenerationContext::new(), &source(), "Spanish")
            .await
            .unwrap();
        let prompt = provider.last_prompt().unwrap();
        assert!(prompt.contains("into Spanish"));
        assert!(prompt.contains("\"short_titles\""));
    }
}

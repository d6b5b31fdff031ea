//! Generation tasks.
//!
//! Each task is an async method on [`Generator`](crate::generation::Generator)
//! plus a `parse_*` function that turns raw model text into the task's
//! validated artifact.

mod ama;
mod description;
mod description_tags;
mod highlights;
mod shorts;
mod tags;
mod timecodes;
mod timing;
mod title;
mod translation;
mod tweets;

pub use ama::{parse_ama, AmaContent};
pub use description_tags::{parse_description_tags, DescriptionTags, DESCRIPTION_TAG_COUNT};
pub use highlights::{apply_highlights, parse_highlights, HIGHLIGHTS_FIELD};
pub use shorts::{parse_shorts, ShortCandidate, ShortsConfig, SHORTS_FIELD};
pub use tags::{parse_tags, Tags, TAGS_MAX_CHARS};
pub use timecodes::parse_timecodes;
pub use timing::{
    parse_timing, render_analytics, TimingRecommendation, VideoAnalytics, RECOMMENDATION_COUNT,
    TIMING_FIELD, WEEKDAYS,
};
pub use title::parse_title;
pub use translation::{parse_translation, VideoMetadata};
pub use tweets::{parse_tweets, TWEETS_FIELD, TWEET_MAX_CHARS};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, SkriveError};
    use crate::generation::validate::ValidationRule;
    use crate::generation::{GenerationContext, Generator, TaskKind};
    use crate::provider::MockProvider;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;
    use tokio_test::{assert_err, assert_ok};

    fn analytics() -> Vec<VideoAnalytics> {
        vec![VideoAnalytics {
            video_id: "v1".to_string(),
            title: "Video".to_string(),
            published_at: Utc.with_ymd_and_hms(2024, 1, 2, 15, 0, 0).unwrap(),
            views: 100,
            click_through_rate: 4.0,
            average_view_duration_seconds: 90,
            likes: 10,
            comments: 1,
        }]
    }

    fn metadata(text: &str) -> VideoMetadata {
        VideoMetadata {
            title: text.to_string(),
            description: text.to_string(),
            tags: text.to_string(),
            timecodes: text.to_string(),
            short_titles: Vec::new(),
        }
    }

    /// Run `task` with `input` as its free-text input, discarding the artifact.
    async fn run(generator: &Generator, task: TaskKind, input: &str) -> Result<()> {
        let ctx = GenerationContext::new();
        match task {
            TaskKind::Title => generator.generate_title(&ctx, input).await.map(drop),
            TaskKind::Description => generator.generate_description(&ctx, input).await.map(drop),
            TaskKind::Tags => generator.generate_tags(&ctx, input).await.map(drop),
            TaskKind::DescriptionTags => generator
                .generate_description_tags(&ctx, input)
                .await
                .map(drop),
            TaskKind::Highlights => generator.generate_highlights(&ctx, input).await.map(drop),
            TaskKind::Timecodes => generator.generate_timecodes(&ctx, input).await.map(drop),
            TaskKind::Tweets => generator.generate_tweets(&ctx, input).await.map(drop),
            TaskKind::Shorts => generator
                .generate_shorts(&ctx, input, ShortsConfig::default())
                .await
                .map(drop),
            TaskKind::Timing => {
                let records = if input.trim().is_empty() {
                    Vec::new()
                } else {
                    analytics()
                };
                generator.generate_timing(&ctx, &records).await.map(drop)
            }
            TaskKind::Translation => generator
                .translate_metadata(&ctx, &metadata(input), "German")
                .await
                .map(drop),
            TaskKind::Ama => generator.generate_ama(&ctx, input).await.map(drop),
        }
    }

    #[tokio::test]
    async fn test_blank_input_never_reaches_provider() {
        for task in TaskKind::ALL {
            let provider = Arc::new(MockProvider::returning("unused"));
            let generator = Generator::new(provider.clone());

            let err = run(&generator, task, " \n\t ").await.unwrap_err();
            assert!(
                matches!(err, SkriveError::InvalidInput(_)),
                "{}: expected InvalidInput, got {:?}",
                task,
                err
            );
            assert_eq!(provider.call_count(), 0, "{} called the provider", task);
        }
    }

    #[tokio::test]
    async fn test_provider_error_keeps_message() {
        for task in TaskKind::ALL {
            let provider = Arc::new(MockProvider::failing("quota exhausted for key"));
            let generator = Generator::new(provider);

            let err = run(&generator, task, "input").await.unwrap_err();
            match err {
                SkriveError::Provider(message) => {
                    assert!(message.contains("quota exhausted for key"), "{}: {}", task, message)
                }
                other => panic!("{}: expected Provider, got {:?}", task, other),
            }
        }
    }

    #[tokio::test]
    async fn test_empty_provider_output_is_empty_response() {
        for task in TaskKind::ALL {
            let provider = Arc::new(MockProvider::returning(""));
            let generator = Generator::new(provider);

            let err = run(&generator, task, "input").await.unwrap_err();
            assert!(
                matches!(err, SkriveError::EmptyResponse(_)),
                "{}: expected EmptyResponse, got {:?}",
                task,
                err
            );
        }
    }

    #[tokio::test]
    async fn test_highlights_accepts_both_shapes() {
        let generator = Generator::new(Arc::new(MockProvider::returning(r#"["a","b","c"]"#)));
        let highlights = assert_ok!(
            generator
                .generate_highlights(&GenerationContext::new(), "manuscript")
                .await
        );
        assert_eq!(highlights, vec!["a", "b", "c"]);

        let generator = Generator::new(Arc::new(MockProvider::returning(
            r#"{"suggested_highlights":["x"]}"#,
        )));
        let highlights = assert_ok!(
            generator
                .generate_highlights(&GenerationContext::new(), "manuscript")
                .await
        );
        assert_eq!(highlights, vec!["x"]);
    }

    #[tokio::test]
    async fn test_description_tags_need_exactly_three() {
        let generator = Generator::new(Arc::new(MockProvider::returning("#go #programming")));
        let err = assert_err!(
            generator
                .generate_description_tags(&GenerationContext::new(), "manuscript")
                .await
        );
        match err {
            SkriveError::Validation(v) => assert_eq!(
                v.rule,
                ValidationRule::ExactTokenCount {
                    expected: 3,
                    actual: 2
                }
            ),
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_shorts_rejects_empty_array() {
        let generator = Generator::new(Arc::new(MockProvider::returning("```json\n[]\n```")));
        let err = assert_err!(
            generator
                .generate_shorts(&GenerationContext::new(), "manuscript", ShortsConfig::default())
                .await
        );
        assert!(matches!(err, SkriveError::Validation(ref v) if v.rule == ValidationRule::NonEmptyList));
    }

    #[tokio::test]
    async fn test_invalid_output_is_never_returned() {
        let cases = [
            (TaskKind::Title, "Line one\nLine two"),
            (TaskKind::Tweets, "Here are your tweets!"),
            (TaskKind::Timing, "[]"),
            (TaskKind::Ama, r#"{"title": "t"}"#),
        ];
        for (task, reply) in cases {
            let generator = Generator::new(Arc::new(MockProvider::returning(reply)));
            let err = run(&generator, task, "input").await.unwrap_err();
            assert!(
                matches!(err, SkriveError::Parse { .. } | SkriveError::Validation(_)),
                "{}: {:?}",
                task,
                err
            );
        }
    }
}

//! Promotional social posts.

use crate::error::Result;
use crate::generation::decode::ListShape;
use crate::generation::normalize::extract_payload;
use crate::generation::validate::{max_chars, non_empty, Validation};
use crate::generation::{require_input, vars, GenerationContext, Generator, TaskKind};
use tracing::{info, instrument};

/// Per-post character limit.
pub const TWEET_MAX_CHARS: usize = 280;

/// Object field wrapping the post array.
pub const TWEETS_FIELD: &str = "tweets";

impl Generator {
    /// Write social posts promoting the video described by `manuscript`.
    #[instrument(skip(self, ctx, manuscript), fields(task = "tweets"))]
    pub async fn generate_tweets(
        &self,
        ctx: &GenerationContext,
        manuscript: &str,
    ) -> Result<Vec<String>> {
        let task = TaskKind::Tweets;
        let manuscript = require_input(task, "manuscript", manuscript)?;

        let prompt = self.render(
            task,
            &vars([
                ("manuscript", manuscript.to_string()),
                ("max_chars", TWEET_MAX_CHARS.to_string()),
            ]),
        )?;
        let raw = self.invoke(ctx, task, &prompt).await?;

        let tweets = parse_tweets(&raw).map_err(|e| e.with_context(task.name()))?;
        info!("Generated {} posts", tweets.len());
        Ok(tweets)
    }
}

/// Decode posts from a bare array or a `tweets` object, trimming each one.
pub fn parse_tweets(raw: &str) -> Result<Vec<String>> {
    let payload = extract_payload(raw);
    let tweets: Vec<String> = ListShape::<String>::decode(&payload, TWEETS_FIELD)?
        .into_items()
        .into_iter()
        .map(|t| t.trim().to_string())
        .collect();
    validate_tweets(&tweets)?;
    Ok(tweets)
}

fn validate_tweets(tweets: &[String]) -> Validation<()> {
    for (i, tweet) in tweets.iter().enumerate() {
        let field = format!("tweets[{}]", i);
        non_empty(&field, tweet)?;
        max_chars(&field, tweet, TWEET_MAX_CHARS)?;
    }
    Ok(())
}

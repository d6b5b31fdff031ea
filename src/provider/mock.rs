//! Scripted in-memory provider.
//!
//! Useful for exercising generation pipelines without network access.

use super::ContentProvider;
use crate::error::{Result, SkriveError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// A scripted reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    /// Fails the call with a provider error carrying this message.
    Error(String),
}

/// Provider returning scripted replies in order.
///
/// Once the script is exhausted the last reply is repeated.
pub struct MockProvider {
    replies: Mutex<VecDeque<MockReply>>,
    last_reply: Mutex<Option<MockReply>>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
    max_tokens: Mutex<Vec<u32>>,
    delay: Option<Duration>,
}

impl MockProvider {
    /// Create a provider with the given script.
    pub fn new(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            last_reply: Mutex::new(None),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            max_tokens: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Always answer with `text`.
    pub fn returning(text: impl Into<String>) -> Self {
        Self::new(vec![MockReply::Text(text.into())])
    }

    /// Always fail with a provider error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(vec![MockReply::Error(message.into())])
    }

    /// Wait this long before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `generate_content` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent prompt received.
    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().ok().and_then(|p| p.last().cloned())
    }

    /// The most recent token budget received.
    pub fn last_max_tokens(&self) -> Option<u32> {
        self.max_tokens.lock().ok().and_then(|t| t.last().copied())
    }

    fn next_reply(&self) -> Option<MockReply> {
        let mut replies = self.replies.lock().ok()?;
        let mut last = self.last_reply.lock().ok()?;
        if let Some(reply) = replies.pop_front() {
            *last = Some(reply);
        }
        last.clone()
    }
}

#[async_trait]
impl ContentProvider for MockProvider {
    async fn generate_content(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        if let Ok(mut budgets) = self.max_tokens.lock() {
            budgets.push(max_tokens);
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.next_reply() {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Error(message)) => Err(SkriveError::Provider(message)),
            None => Err(SkriveError::Provider("mock provider has no script".to_string())),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_script_then_repeat_last() {
        let provider = MockProvider::new(vec![
            MockReply::Error("boom".to_string()),
            MockReply::Text("ok".to_string()),
        ]);

        assert!(provider.generate_content("p1", 10).await.is_err());
        assert_eq!(provider.generate_content("p2", 20).await.unwrap(), "ok");
        assert_eq!(provider.generate_content("p3", 30).await.unwrap(), "ok");
        assert_eq!(provider.call_count(), 3);
        assert_eq!(provider.last_prompt().as_deref(), Some("p3"));
        assert_eq!(provider.last_max_tokens(), Some(30));
    }

    #[tokio::test]
    async fn test_empty_script_errors() {
        let provider = MockProvider::new(Vec::new());
        let err = provider.generate_content("p", 1).await.unwrap_err();
        assert!(matches!(err, SkriveError::Provider(_)));
    }
}

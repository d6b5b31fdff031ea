//! Structured content generation pipeline.
//!
//! Every task follows the same path:
//!
//! 1. reject empty input before touching the provider
//! 2. render the task's prompt template
//! 3. call the provider with the task's fixed token budget (optionally retried)
//! 4. classify blank output as an empty response
//! 5. normalize the raw text into a payload ([`normalize`])
//! 6. decode it into the expected shape ([`decode`])
//! 7. check the task's acceptance rule ([`validate`])
//!
//! Nothing reaches the caller without passing step 7. The task entry points live
//! in [`crate::tasks`] as methods on [`Generator`].

pub mod decode;
pub mod normalize;
pub mod validate;

use crate::config::Prompts;
use crate::error::{Result, SkriveError};
use crate::provider::ContentProvider;
use crate::retry::RetryPolicy;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::debug;

/// The generation tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Title,
    Description,
    Tags,
    DescriptionTags,
    Highlights,
    Timecodes,
    Tweets,
    Shorts,
    Timing,
    Translation,
    /// Publishing package for an "Ask Me Anything" recording.
    Ama,
}

impl TaskKind {
    pub const ALL: [TaskKind; 11] = [
        TaskKind::Title,
        TaskKind::Description,
        TaskKind::Tags,
        TaskKind::DescriptionTags,
        TaskKind::Highlights,
        TaskKind::Timecodes,
        TaskKind::Tweets,
        TaskKind::Shorts,
        TaskKind::Timing,
        TaskKind::Translation,
        TaskKind::Ama,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TaskKind::Title => "title",
            TaskKind::Description => "description",
            TaskKind::Tags => "tags",
            TaskKind::DescriptionTags => "description-tags",
            TaskKind::Highlights => "highlights",
            TaskKind::Timecodes => "timecodes",
            TaskKind::Tweets => "tweets",
            TaskKind::Shorts => "shorts",
            TaskKind::Timing => "timing",
            TaskKind::Translation => "translation",
            TaskKind::Ama => "ama",
        }
    }

    /// Token budget for the task's provider call, sized to its expected output.
    pub fn max_tokens(&self) -> u32 {
        match self {
            TaskKind::Title => 512,
            TaskKind::Description => 1024,
            TaskKind::Tags => 512,
            TaskKind::DescriptionTags => 256,
            TaskKind::Highlights => 2048,
            TaskKind::Timecodes => 2048,
            TaskKind::Tweets => 1024,
            TaskKind::Shorts => 4096,
            TaskKind::Timing => 2048,
            TaskKind::Translation => 4096,
            TaskKind::Ama => 4096,
        }
    }

    /// Variables the task binds into its template.
    pub fn variables(&self) -> &'static [&'static str] {
        match self {
            TaskKind::Title
            | TaskKind::Description
            | TaskKind::DescriptionTags
            | TaskKind::Highlights
            | TaskKind::Timecodes => &["manuscript"],
            TaskKind::Tags | TaskKind::Tweets => &["manuscript", "max_chars"],
            TaskKind::Shorts => &["manuscript", "max_words", "candidate_count"],
            TaskKind::Timing => &["analytics", "video_count"],
            TaskKind::Translation => &["target_language", "metadata_json"],
            TaskKind::Ama => &["transcript", "tags_max_chars"],
        }
    }
}

impl std::str::FromStr for TaskKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        TaskKind::ALL
            .into_iter()
            .find(|t| t.name() == normalized)
            .ok_or_else(|| format!("Unknown task: {}", s))
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Per-call cancellation and deadline.
///
/// Cancellation is signalled by sending `true` on the watch channel paired with
/// the receiver. Both signals abort the in-flight provider call, including any
/// pending retries, with [`SkriveError::Cancelled`].
#[derive(Debug, Clone, Default)]
pub struct GenerationContext {
    cancel_rx: Option<watch::Receiver<bool>>,
    timeout: Option<Duration>,
}

impl GenerationContext {
    /// A context that never cancels.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set cancellation signal.
    pub fn with_cancel(mut self, cancel_rx: watch::Receiver<bool>) -> Self {
        self.cancel_rx = Some(cancel_rx);
        self
    }

    /// Set a deadline for the provider call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_rx
            .as_ref()
            .map(|rx| *rx.borrow())
            .unwrap_or(false)
    }

    /// Resolves once cancellation is signalled; never resolves without a signal.
    async fn cancelled(&self) {
        if let Some(rx) = &self.cancel_rx {
            let mut rx = rx.clone();
            let sender_dropped = rx.wait_for(|cancelled| *cancelled).await.is_err();
            if !sender_dropped {
                return;
            }
        }
        std::future::pending::<()>().await
    }

    /// Drive `operation` unless cancellation or the deadline comes first.
    pub async fn run<T, F>(&self, operation: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.is_cancelled() {
            return Err(SkriveError::Cancelled(
                "cancelled before the provider call".to_string(),
            ));
        }

        let bounded = async {
            match self.timeout {
                Some(timeout) => tokio::time::timeout(timeout, operation)
                    .await
                    .map_err(|_| {
                        SkriveError::Cancelled(format!("deadline of {:?} exceeded", timeout))
                    })?,
                None => operation.await,
            }
        };

        tokio::select! {
            result = bounded => result,
            _ = self.cancelled() => Err(SkriveError::Cancelled("cancelled by caller".to_string())),
        }
    }
}

/// Runs generation tasks against an injected provider.
///
/// Holds no per-call state, so one generator can serve concurrent tasks.
pub struct Generator {
    provider: Arc<dyn ContentProvider>,
    prompts: Prompts,
    retry: RetryPolicy,
}

impl Generator {
    /// Create a generator with built-in prompts and no retries.
    pub fn new(provider: Arc<dyn ContentProvider>) -> Self {
        Self {
            provider,
            prompts: Prompts::default(),
            retry: RetryPolicy::none(),
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Set the retry policy applied around provider calls.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn provider(&self) -> &dyn ContentProvider {
        self.provider.as_ref()
    }

    pub fn prompts(&self) -> &Prompts {
        &self.prompts
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Render the prompt for a task.
    pub(crate) fn render(&self, task: TaskKind, vars: &HashMap<String, String>) -> Result<String> {
        self.prompts.render_task(task, vars)
    }

    /// Call the provider for a task and reject blank output.
    pub(crate) async fn invoke(
        &self,
        ctx: &GenerationContext,
        task: TaskKind,
        prompt: &str,
    ) -> Result<String> {
        debug!(
            "Calling {} for {} ({} prompt chars, {} max tokens)",
            self.provider.name(),
            task,
            prompt.len(),
            task.max_tokens()
        );

        let raw = ctx
            .run(self.retry.run(task.name(), || {
                self.provider.generate_content(prompt, task.max_tokens())
            }))
            .await
            .map_err(|e| e.with_context(task.name()))?;

        if raw.trim().is_empty() {
            return Err(SkriveError::EmptyResponse(format!(
                "{}: {} returned no text",
                task,
                self.provider.name()
            )));
        }

        Ok(raw)
    }
}

/// Reject empty or whitespace-only input for a task.
pub(crate) fn require_input<'a>(task: TaskKind, field: &str, input: &'a str) -> Result<&'a str> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(SkriveError::InvalidInput(format!(
            "{}: {} is empty",
            task, field
        )));
    }
    Ok(trimmed)
}

/// Template variables from key/value pairs.
pub(crate) fn vars<const N: usize>(pairs: [(&str, String); N]) -> HashMap<String, String> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

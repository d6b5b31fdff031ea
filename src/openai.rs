//! async-openai client construction with sensible defaults.

use crate::error::{Result, SkriveError};
use async_openai::{config::Config, Client};
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use std::time::Duration;

/// Default timeout for provider requests (5 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Build the HTTP client shared by every backend, with a request timeout.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| SkriveError::Config(format!("Failed to create HTTP client: {}", e)))
}

/// Backoff that gives up immediately, so async-openai never retries on its own.
///
/// Retries belong to [`RetryPolicy`](crate::retry::RetryPolicy).
pub fn no_backoff() -> ExponentialBackoff {
    ExponentialBackoffBuilder::new()
        .with_max_elapsed_time(Some(Duration::ZERO))
        .build()
}

/// Create an async-openai client for any config flavour (OpenAI or Azure).
pub fn create_client<C: Config>(config: C, timeout: Duration) -> Result<Client<C>> {
    Ok(Client::with_config(config)
        .with_http_client(http_client(timeout)?)
        .with_backoff(no_backoff()))
}

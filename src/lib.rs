//! Skrive - publishing metadata for video creators
//!
//! Turns manuscripts, transcripts and channel analytics into the artifacts needed to
//! publish a video: titles, descriptions, tags, timecodes, social posts, shorts
//! candidates, publish-timing recommendations and translations.
//!
//! The name "Skrive" is the Norwegian word for "write."
//!
//! # Architecture
//!
//! - `config` - Settings and prompt templates
//! - `provider` - Language model backends (OpenAI, Azure OpenAI, Anthropic)
//! - `generation` - The shared pipeline: normalization, decoding and validation
//! - `tasks` - One generation task per artifact
//! - `retry` - Backoff policy around provider calls
//!
//! Every artifact returned by a task has passed its validator. Invalid model output
//! surfaces as [`SkriveError::Parse`] or [`SkriveError::Validation`].
//!
//! # Example
//!
//! ```rust,no_run
//! use skrive::config::Settings;
//! use skrive::generation::{GenerationContext, Generator};
//! use skrive::provider::Provider;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let provider = Provider::from_settings(&settings.ai)?;
//!     let generator = Generator::new(Arc::new(provider));
//!
//!     let manuscript = std::fs::read_to_string("manuscript.md")?;
//!     let title = generator
//!         .generate_title(&GenerationContext::new(), &manuscript)
//!         .await?;
//!     println!("{}", title);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod generation;
pub mod openai;
pub mod provider;
pub mod retry;
pub mod tasks;

pub use error::{Result, SkriveError};

//! Error types for Skrive.

use crate::generation::validate::Violation;
use thiserror::Error;

/// Longest excerpt of a payload carried by a parse error.
pub const MAX_EXCERPT_CHARS: usize = 200;

/// Library-level error type for Skrive operations.
#[derive(Error, Debug)]
pub enum SkriveError {
    /// Missing or invalid backend credentials or settings.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A prompt template could not be rendered.
    #[error("Template error: {0}")]
    Template(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Vendor or network failure.
    #[error("Provider error: {0}")]
    Provider(String),

    /// The provider call succeeded but returned blank text.
    #[error("Empty response: {0}")]
    EmptyResponse(String),

    #[error("Parse error: {message} (payload excerpt: {excerpt:?})")]
    Parse { message: String, excerpt: String },

    #[error("Validation failed: {0}")]
    Validation(Violation),

    #[error("Cancelled: {0}")]
    Cancelled(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl SkriveError {
    /// Build a parse error carrying a bounded excerpt of the offending payload.
    pub fn parse(message: impl Into<String>, payload: &str) -> Self {
        SkriveError::Parse {
            message: message.into(),
            excerpt: excerpt(payload, MAX_EXCERPT_CHARS),
        }
    }

    /// Prefix stage context onto the message while keeping the variant.
    pub fn with_context(self, context: &str) -> Self {
        match self {
            SkriveError::Config(m) => SkriveError::Config(format!("{}: {}", context, m)),
            SkriveError::Template(m) => SkriveError::Template(format!("{}: {}", context, m)),
            SkriveError::InvalidInput(m) => {
                SkriveError::InvalidInput(format!("{}: {}", context, m))
            }
            SkriveError::Provider(m) => SkriveError::Provider(format!("{}: {}", context, m)),
            SkriveError::EmptyResponse(m) => {
                SkriveError::EmptyResponse(format!("{}: {}", context, m))
            }
            SkriveError::Parse { message, excerpt } => SkriveError::Parse {
                message: format!("{}: {}", context, message),
                excerpt,
            },
            SkriveError::Cancelled(m) => SkriveError::Cancelled(format!("{}: {}", context, m)),
            other => other,
        }
    }

    /// Whether an outer retry policy may try the failed call again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SkriveError::Provider(_))
    }
}

impl From<Violation> for SkriveError {
    fn from(violation: Violation) -> Self {
        SkriveError::Validation(violation)
    }
}

/// First `max_chars` characters of `text`, with an ellipsis when cut.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Result type alias for Skrive operations.
pub type Result<T> = std::result::Result<T, SkriveError>;

//! Acceptance rules shared by the task validators.

use crate::error::excerpt;
use std::fmt;

/// Longest offending value echoed in a violation.
const MAX_VALUE_CHARS: usize = 120;

/// A structural rule a decoded artifact must satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationRule {
    NonEmpty,
    SingleLine,
    /// Exactly `expected` whitespace-separated tokens.
    ExactTokenCount { expected: usize, actual: usize },
    /// Every token starts with `marker` followed by at least one character.
    TokenPrefix { marker: char },
    MaxChars { limit: usize, actual: usize },
    MaxWords { limit: usize, actual: usize },
    NonEmptyList,
    ListLength { min: usize, max: usize, actual: usize },
    /// One of the seven canonical English weekday names.
    Weekday,
    /// 24-hour `HH:MM`.
    TimeOfDay,
    /// A field that had content in the input must have content in the output.
    PreservesContent,
    /// A list must keep the input's number of entries.
    ItemCount { expected: usize, actual: usize },
}

impl fmt::Display for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationRule::NonEmpty => write!(f, "must not be empty"),
            ValidationRule::SingleLine => write!(f, "must be a single line"),
            ValidationRule::ExactTokenCount { expected, actual } => {
                write!(f, "must contain exactly {} tokens (found {})", expected, actual)
            }
            ValidationRule::TokenPrefix { marker } => {
                write!(f, "every token must start with '{}' followed by text", marker)
            }
            ValidationRule::MaxChars { limit, actual } => {
                write!(f, "must be at most {} characters (found {})", limit, actual)
            }
            ValidationRule::MaxWords { limit, actual } => {
                write!(f, "must be at most {} words (found {})", limit, actual)
            }
            ValidationRule::NonEmptyList => write!(f, "must contain at least one entry"),
            ValidationRule::ListLength { min, max, actual } => write!(
                f,
                "must contain between {} and {} entries (found {})",
                min, max, actual
            ),
            ValidationRule::Weekday => write!(f, "must be a weekday name (Monday..Sunday)"),
            ValidationRule::TimeOfDay => write!(f, "must be a 24-hour HH:MM time"),
            ValidationRule::PreservesContent => {
                write!(f, "must not be empty when the input field has content")
            }
            ValidationRule::ItemCount { expected, actual } => write!(
                f,
                "must contain {} entries like the input (found {})",
                expected, actual
            ),
        }
    }
}

/// Which field broke which rule, and with what value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub rule: ValidationRule,
    pub value: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, rule: ValidationRule, value: &str) -> Self {
        Self {
            field: field.into(),
            rule,
            value: excerpt(value, MAX_VALUE_CHARS),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` {} (value: {:?})", self.field, self.rule, self.value)
    }
}

pub type Validation<T> = std::result::Result<T, Violation>;

/// Reject blank text.
pub fn non_empty(field: &str, value: &str) -> Validation<()> {
    if value.trim().is_empty() {
        Err(Violation::new(field, ValidationRule::NonEmpty, value))
    } else {
        Ok(())
    }
}

/// Reject text longer than `limit` characters.
pub fn max_chars(field: &str, value: &str, limit: usize) -> Validation<()> {
    let actual = value.chars().count();
    if actual > limit {
        Err(Violation::new(
            field,
            ValidationRule::MaxChars { limit, actual },
            value,
        ))
    } else {
        Ok(())
    }
}

/// Reject text with more than `limit` whitespace-separated words.
pub fn max_words(field: &str, value: &str, limit: usize) -> Validation<()> {
    let actual = word_count(value);
    if actual > limit {
        Err(Violation::new(
            field,
            ValidationRule::MaxWords { limit, actual },
            value,
        ))
    } else {
        Ok(())
    }
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Cut `text` to at most `limit` characters.
///
/// When the text is too long, the cut lands immediately before the last
/// `separator` within the first `limit` characters, or at exactly `limit`
/// characters when no separator occurs in that range. The flag reports
/// whether anything was dropped.
pub fn truncate_at_separator(text: &str, limit: usize, separator: char) -> (String, bool) {
    let cut = match text.char_indices().nth(limit) {
        Some((idx, _)) => idx,
        None => return (text.to_string(), false),
    };

    let window = &text[..cut];
    match window.rfind(separator) {
        Some(idx) => (window[..idx].to_string(), true),
        None => (window.to_string(), true),
    }
}

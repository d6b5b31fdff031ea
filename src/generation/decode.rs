//! Structural decoding of normalized payloads.

use crate::error::{Result, SkriveError};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// A list payload in one of the two accepted shapes.
///
/// Models return either the array itself or an object wrapping it under a
/// task-specific field. Decoding tries the bare array first and the wrapped
/// object second; nothing else about the content is inspected.
#[derive(Debug, Clone, PartialEq)]
pub enum ListShape<T> {
    /// `[ ... ]`
    Bare(Vec<T>),
    /// `{ "<field>": [ ... ] }`
    Wrapped(Vec<T>),
}

impl<T: DeserializeOwned> ListShape<T> {
    /// Decode `payload` as a bare array, or as an object holding the array under `field`.
    pub fn decode(payload: &str, field: &str) -> Result<Self> {
        let bare_err = match serde_json::from_str::<Vec<T>>(payload) {
            Ok(items) => {
                debug!("Decoded bare array of {} items", items.len());
                return Ok(ListShape::Bare(items));
            }
            Err(e) => e,
        };

        let mut object = match serde_json::from_str::<serde_json::Map<String, Value>>(payload) {
            Ok(object) => object,
            Err(_) => {
                return Err(SkriveError::parse(
                    format!(
                        "expected a JSON array or an object with a `{}` array: {}",
                        field, bare_err
                    ),
                    payload,
                ))
            }
        };

        let value = object.remove(field).ok_or_else(|| {
            SkriveError::parse(format!("object has no `{}` field", field), payload)
        })?;

        let items: Vec<T> = serde_json::from_value(value).map_err(|e| {
            SkriveError::parse(format!("`{}` is not a valid array: {}", field, e), payload)
        })?;

        debug!("Decoded `{}`-wrapped array of {} items", field, items.len());
        Ok(ListShape::Wrapped(items))
    }
}

impl<T> ListShape<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            ListShape::Bare(items) | ListShape::Wrapped(items) => items,
        }
    }

    pub fn is_wrapped(&self) -> bool {
        matches!(self, ListShape::Wrapped(_))
    }
}

/// Decode a JSON object payload.
pub fn decode_object<T: DeserializeOwned>(payload: &str, what: &str) -> Result<T> {
    serde_json::from_str(payload)
        .map_err(|e| SkriveError::parse(format!("invalid {} object: {}", what, e), payload))
}

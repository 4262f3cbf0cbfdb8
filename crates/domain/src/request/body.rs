//! HTTP Request body types

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DomainError, DomainResult};

/// Content type sent with every non-empty body.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Request body of a test case.
///
/// Bodies are either a structured JSON value or a literal JSON string as the
/// suite author wrote it. Both are sent as `application/json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum RequestBody {
    /// No body
    #[default]
    Empty,
    /// Structured JSON mapping
    Json(Value),
    /// Literal JSON text
    Raw(String),
}

impl RequestBody {
    /// Creates an empty body.
    #[must_use]
    pub const fn empty() -> Self {
        Self::Empty
    }

    /// Creates a structured JSON body.
    #[must_use]
    pub const fn json(value: Value) -> Self {
        Self::Json(value)
    }

    /// Creates a body from literal JSON text.
    #[must_use]
    pub fn raw(content: impl Into<String>) -> Self {
        Self::Raw(content.into())
    }

    /// Returns whether there is nothing to send.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns the content type if a body is present.
    #[must_use]
    pub const fn content_type(&self) -> Option<&'static str> {
        match self {
            Self::Empty => None,
            Self::Json(_) | Self::Raw(_) => Some(JSON_CONTENT_TYPE),
        }
    }

    /// Parses the body into a JSON value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidBody` if a raw body is not valid JSON.
    pub fn to_value(&self) -> DomainResult<Option<Value>> {
        match self {
            Self::Empty => Ok(None),
            Self::Json(value) => Ok(Some(value.clone())),
            Self::Raw(text) => serde_json::from_str(text)
                .map(Some)
                .map_err(|e| DomainError::InvalidBody(format!("Invalid JSON: {e}"))),
        }
    }

    /// Renders the bytes that go on the wire.
    ///
    /// Raw bodies are validated and then sent as written.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidBody` if the body cannot be serialized or
    /// a raw body is not valid JSON.
    pub fn encode(&self) -> DomainResult<Option<String>> {
        match self {
            Self::Empty => Ok(None),
            Self::Json(value) => serde_json::to_string(value)
                .map(Some)
                .map_err(|e| DomainError::InvalidBody(e.to_string())),
            Self::Raw(text) => {
                self.to_value()?;
                Ok(Some(text.clone()))
            }
        }
    }

    /// Compares two bodies by JSON value, ignoring key order and whitespace.
    ///
    /// Bodies that fail to parse are never equal to anything.
    #[must_use]
    pub fn semantic_eq(&self, other: &Self) -> bool {
        match (self.to_value(), other.to_value()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

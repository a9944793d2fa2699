//! Configuration input resolution
//!
//! A dashboard body arrives either as JSON text or as an already-decoded
//! mapping. Text is parsed exactly once, here, so everything downstream
//! works on a [`ConfigInput`] and never re-inspects the raw text.

use serde_json::{Map, Value};

/// A dashboard body, resolved at the boundary
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigInput {
    /// Text that is not a JSON object. Passed through untouched.
    Raw(String),
    /// A decoded JSON object
    Structured(Map<String, Value>),
}

impl ConfigInput {
    /// Resolve text into a structured body when it parses as a JSON object
    ///
    /// Anything else (invalid JSON, arrays, scalars) stays [`ConfigInput::Raw`].
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => Self::Structured(map),
            _ => Self::Raw(text),
        }
    }

    /// Borrow the structured body, if any
    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Structured(map) => Some(map),
            Self::Raw(_) => None,
        }
    }

    /// Mutably borrow the structured body, if any
    pub fn as_object_mut(&mut self) -> Option<&mut Map<String, Value>> {
        match self {
            Self::Structured(map) => Some(map),
            Self::Raw(_) => None,
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Structured(_))
    }

    /// Look up a top-level string field of a structured body
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.as_object()?.get(key)?.as_str()
    }
}

impl From<&str> for ConfigInput {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

impl From<String> for ConfigInput {
    fn from(text: String) -> Self {
        Self::from_text(text)
    }
}

impl From<Map<String, Value>> for ConfigInput {
    fn from(map: Map<String, Value>) -> Self {
        Self::Structured(map)
    }
}

impl From<Value> for ConfigInput {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::Structured(map),
            Value::String(text) => Self::from_text(text),
            other => Self::Raw(other.to_string()),
        }
    }
}

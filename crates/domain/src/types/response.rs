//! Decoded response bodies

use serde_json::Value;

/// Body of a successful remote response
///
/// Only the `Json` variant is ever key-normalized; text and binary bodies pass
/// through untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ResponsePayload {
    #[default]
    Empty,
    Json(Value),
    Text(String),
    Binary(Vec<u8>),
}

impl ResponsePayload {
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Collapse into a structured value: empty becomes `null`, text becomes a
    /// string. Binary bodies have no structured form and yield `None`.
    pub fn into_json(self) -> Option<Value> {
        match self {
            Self::Empty => Some(Value::Null),
            Self::Json(value) => Some(value),
            Self::Text(text) => Some(Value::String(text)),
            Self::Binary(_) => None,
        }
    }

    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

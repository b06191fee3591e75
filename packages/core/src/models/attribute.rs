//! Typed Attribute Values
//!
//! Elements carry their scalar data in a generic attribute map instead of
//! per-element structs. An attribute is tri-state:
//!
//! - **absent** — no entry in the map,
//! - **valid** — one of the typed variants below,
//! - **invalid** — [`AttributeValue::Invalid`], the side-channel marker a
//!   reader leaves behind when a scalar was present in the source but could
//!   not be parsed as its declared type.
//!
//! The distinction matters to the validation engine: a rule that tolerates a
//! missing attribute must still be able to flag one that was present but
//! unreadable.

use serde::{Deserialize, Serialize};

/// A single typed attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum AttributeValue {
    Text(String),
    Int(i64),
    Double(f64),
    Bool(bool),
    /// Present in the source but unparsable as its declared type; `raw`
    /// preserves the original text for round trips and diagnostics.
    Invalid {
        raw: String,
    },
}

impl AttributeValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttributeValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            AttributeValue::Double(d) => Some(*d),
            AttributeValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// True for the present-but-unparsable marker.
    pub fn is_invalid(&self) -> bool {
        matches!(self, AttributeValue::Invalid { .. })
    }

    /// The value as it would be written back out.
    pub fn lexical(&self) -> String {
        match self {
            AttributeValue::Text(s) => s.clone(),
            AttributeValue::Int(i) => i.to_string(),
            AttributeValue::Double(d) => d.to_string(),
            AttributeValue::Bool(b) => b.to_string(),
            AttributeValue::Invalid { raw } => raw.clone(),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Double(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

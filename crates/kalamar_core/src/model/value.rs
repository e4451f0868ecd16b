//! Property value kinds.
//!
//! # Responsibility
//! - Define the closed set of value kinds an item property can hold.
//! - Provide typed accessors so callers never need dynamic downcasts.
//!
//! # Invariants
//! - `Null` is a present-but-empty value. An absent key is represented by
//!   `Option::None` at the item API, never by `Null`.

use serde::{Deserialize, Serialize};

/// One property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyValue {
    /// Declared by the schema but not filled yet.
    Null,
    /// Text value, already decoded.
    Text(String),
    /// Raw byte content.
    Bytes(Vec<u8>),
    /// Numeric value.
    Number(f64),
    /// Reference to another item, by its storage identifier.
    ItemRef(String),
}

impl PropertyValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Returns the value as bytes.
    ///
    /// Text values are viewed through their UTF-8 encoding.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(value) => Some(value.as_slice()),
            Self::Text(value) => Some(value.as_bytes()),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_item_ref(&self) -> Option<&str> {
        match self {
            Self::ItemRef(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Short kind name used in error messages and log events.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::Number(_) => "number",
            Self::ItemRef(_) => "item_ref",
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<u8>> for PropertyValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<&[u8]> for PropertyValue {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

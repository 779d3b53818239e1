//! Payload values for custom artifact states and extras.
//!
//! The engine never interprets these; game modules pick the shape.
//!
//! ## StateValue Types
//!
//! - `Int`: Numbers (cash, score, counters)
//! - `Bool`: Flags (mortgaged, has-moved)
//! - `Text`: Strings (labels, colors)
//! - `IntList` / `TextList`: Ordered lists (deck order, owned deeds)
//! - `Record`: Nested named fields for aggregate records

use std::sync::Arc;

use im::OrdMap;
use serde::{Deserialize, Serialize};

/// Immutable value stored in custom states and extras.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateValue {
    Int(i64),
    Bool(bool),
    Text(String),
    IntList(Vec<i64>),
    TextList(Vec<String>),
    Record(OrdMap<Arc<str>, StateValue>),
}

impl StateValue {
    /// Create an empty record.
    #[must_use]
    pub fn record() -> Self {
        StateValue::Record(OrdMap::new())
    }

    /// Return a copy of this record with `key` set.
    ///
    /// Non-record values are replaced by a single-field record.
    #[must_use]
    pub fn with_field(&self, key: &str, value: impl Into<StateValue>) -> Self {
        let mut fields = match self {
            StateValue::Record(fields) => fields.clone(),
            _ => OrdMap::new(),
        };
        fields.insert(Arc::from(key), value.into());
        StateValue::Record(fields)
    }

    /// Get a record field.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&StateValue> {
        match self {
            StateValue::Record(fields) => fields.get(key),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            StateValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StateValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            StateValue::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int_list(&self) -> Option<&[i64]> {
        match self {
            StateValue::IntList(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text_list(&self) -> Option<&[String]> {
        match self {
            StateValue::TextList(v) => Some(v),
            _ => None,
        }
    }
}

impl From<i64> for StateValue {
    fn from(v: i64) -> Self {
        StateValue::Int(v)
    }
}

impl From<i32> for StateValue {
    fn from(v: i32) -> Self {
        StateValue::Int(i64::from(v))
    }
}

impl From<bool> for StateValue {
    fn from(v: bool) -> Self {
        StateValue::Bool(v)
    }
}

impl From<String> for StateValue {
    fn from(v: String) -> Self {
        StateValue::Text(v)
    }
}

impl From<&str> for StateValue {
    fn from(v: &str) -> Self {
        StateValue::Text(v.to_string())
    }
}

impl From<Vec<i64>> for StateValue {
    fn from(v: Vec<i64>) -> Self {
        StateValue::IntList(v)
    }
}

impl From<Vec<String>> for StateValue {
    fn from(v: Vec<String>) -> Self {
        StateValue::TextList(v)
    }
}

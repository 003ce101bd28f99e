//! Native attribute values.
//!
//! [`Value`] is what callers put into and get back out of items. The codec in
//! [`crate::codec`] maps it to and from the wire [`AttributeValue`](crate::AttributeValue).

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde_json::Number;

use crate::error::MarshalError;

/// A native item: attribute name to value.
pub type Item = HashMap<String, Value>;

/// A native attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value. Never stored.
    Null,
    /// Boolean, stored as the string `"true"` or `"false"`.
    Bool(bool),
    /// Number.
    Number(Number),
    /// String.
    String(String),
    /// Timestamp, stored as an RFC 3339 string.
    Date(DateTime<Utc>),
    /// Array, stored as a string or number set.
    List(Vec<Value>),
    /// Nested object. The `2011-12-05` API has no map type, so these cannot
    /// be stored.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Returns `true` for values that are dropped when marshalling an item:
    /// null, the empty string and the empty array.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::String(s) => s.is_empty(),
            Self::List(v) => v.is_empty(),
            _ => false,
        }
    }

    /// Returns the string if this is a `String` variant.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number as `i64` when it has an exact integer representation.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// Returns the number as `f64`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Returns the elements if this is a `List` variant.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    /// Short name of the variant, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Date(_) => "date",
            Self::List(_) => "array",
            Self::Map(_) => "object",
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl TryFrom<f64> for Value {
    type Error = MarshalError;

    /// NaN and the infinities have no number representation and are rejected.
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Number::from_f64(value)
            .map(Self::Number)
            .ok_or_else(|| MarshalError::NonFiniteNumber(value.to_string()))
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Date(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(v) => Self::List(v.into_iter().map(Self::from).collect()),
            serde_json::Value::Object(m) => {
                Self::Map(m.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

/// Build an [`Item`] from a JSON object.
///
/// # Examples
///
/// ```
/// use rustdyn_model::value::{Value, item_from_json};
///
/// let item = item_from_json(serde_json::json!({"id": "a", "age": 3})).unwrap();
/// assert_eq!(item["id"], Value::from("a"));
/// assert_eq!(item["age"].as_i64(), Some(3));
/// ```
pub fn item_from_json(value: serde_json::Value) -> Result<Item, MarshalError> {
    match value {
        serde_json::Value::Object(m) => Ok(m.into_iter().map(|(k, v)| (k, v.into())).collect()),
        other => Err(MarshalError::UnsupportedType(
            Value::from(other).kind().to_owned(),
        )),
    }
}

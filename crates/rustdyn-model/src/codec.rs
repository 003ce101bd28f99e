//! Conversion between native [`Value`]s and wire [`AttributeValue`]s.
//!
//! Marshalling rules:
//!
//! - Null, the empty string and the empty array are *absent*: the attribute is
//!   left out of the wire item entirely.
//! - Numbers become `N`. Strings, booleans and dates become `S`.
//! - Arrays become `NS` when their first element is a number and `SS`
//!   otherwise.
//! - Nested objects have no wire representation and are rejected.
//!
//! Parsing maps `S`, `N`, `SS` and `NS` back. An empty or missing wire item
//! parses to `None`, which callers treat as "not found".

use std::collections::HashMap;

use chrono::SecondsFormat;
use serde_json::Number;

use crate::attribute_value::{AttributeValue, WireItem};
use crate::error::MarshalError;
use crate::types::{AttributeAction, AttributeValueUpdate, Key};
use crate::value::{Item, Value};

/// Marshal a native item. Absent values are omitted.
///
/// # Examples
///
/// ```
/// use rustdyn_model::{AttributeValue, Item, Value, stringify};
///
/// let mut item = Item::new();
/// item.insert("name".to_owned(), Value::from("Bob"));
/// item.insert("age".to_owned(), Value::from(42));
/// item.insert("nickname".to_owned(), Value::from(""));
///
/// let wire = stringify(&item).unwrap();
/// assert_eq!(wire["age"], AttributeValue::N("42".to_owned()));
/// assert!(!wire.contains_key("nickname"));
/// ```
pub fn stringify(item: &Item) -> Result<WireItem, MarshalError> {
    let mut wire = WireItem::with_capacity(item.len());
    for (name, value) in item {
        if let Some(attribute) = to_attribute_value(value)? {
            wire.insert(name.clone(), attribute);
        }
    }
    Ok(wire)
}

/// Marshal one value. Returns `None` for absent values.
pub fn to_attribute_value(value: &Value) -> Result<Option<AttributeValue>, MarshalError> {
    if value.is_empty() {
        return Ok(None);
    }

    let attribute = match value {
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::List(members) => match members.first() {
            Some(Value::Number(_)) => AttributeValue::Ns(
                members
                    .iter()
                    .map(|member| match member {
                        Value::Number(n) => Ok(n.to_string()),
                        other => Err(MarshalError::UnsupportedType(format!(
                            "{} in number set",
                            other.kind()
                        ))),
                    })
                    .collect::<Result<_, _>>()?,
            ),
            _ => AttributeValue::Ss(members.iter().map(scalar_text).collect::<Result<_, _>>()?),
        },
        other => AttributeValue::S(scalar_text(other)?),
    };
    Ok(Some(attribute))
}

/// Parse a wire item. Empty and missing items parse to `None`.
///
/// # Examples
///
/// ```
/// use rustdyn_model::{WireItem, parse};
///
/// assert_eq!(parse(None).unwrap(), None);
/// assert_eq!(parse(Some(&WireItem::new())).unwrap(), None);
/// ```
pub fn parse(item: Option<&WireItem>) -> Result<Option<Item>, MarshalError> {
    let Some(item) = item.filter(|item| !item.is_empty()) else {
        return Ok(None);
    };

    item.iter()
        .map(|(name, attribute)| Ok((name.clone(), from_attribute_value(attribute)?)))
        .collect::<Result<Item, _>>()
        .map(Some)
}

/// Parse one wire value.
pub fn from_attribute_value(attribute: &AttributeValue) -> Result<Value, MarshalError> {
    match attribute {
        AttributeValue::S(s) => Ok(Value::String(s.clone())),
        AttributeValue::N(n) => parse_number(n).map(Value::Number),
        AttributeValue::Ss(members) => Ok(Value::List(
            members.iter().cloned().map(Value::String).collect(),
        )),
        AttributeValue::Ns(members) => members
            .iter()
            .map(|n| parse_number(n).map(Value::Number))
            .collect::<Result<_, _>>()
            .map(Value::List),
        other => Err(MarshalError::UnsupportedType(
            other.type_descriptor().to_owned(),
        )),
    }
}

/// Parse a wire number into the narrowest native representation: unsigned,
/// then signed, then floating point.
fn parse_number(text: &str) -> Result<Number, MarshalError> {
    let trimmed = text.trim();
    if let Ok(n) = trimmed.parse::<u64>() {
        return Ok(n.into());
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return Ok(n.into());
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| MarshalError::InvalidNumber(text.to_owned()))
}

fn scalar_text(value: &Value) -> Result<String, MarshalError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Date(d) => Ok(d.to_rfc3339_opts(SecondsFormat::Millis, true)),
        other => Err(MarshalError::UnsupportedType(other.kind().to_owned())),
    }
}

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// A caller-supplied primary key.
#[derive(Debug, Clone, PartialEq)]
pub enum KeySpec {
    /// Hash-only key.
    Hash(Value),
    /// Hash and range key.
    Composite {
        /// Hash key value.
        hash: Value,
        /// Range key value.
        range: Value,
    },
}

impl KeySpec {
    /// A hash-only key.
    pub fn hash(value: impl Into<Value>) -> Self {
        Self::Hash(value.into())
    }

    /// A composite key.
    pub fn composite(hash: impl Into<Value>, range: impl Into<Value>) -> Self {
        Self::Composite {
            hash: hash.into(),
            range: range.into(),
        }
    }

    /// Interpret a JSON key: a bare scalar is a hash key and an object with
    /// `hash` (and optionally `range`) is a composite key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rustdyn_model::KeySpec;
    /// use serde_json::json;
    ///
    /// assert_eq!(KeySpec::from_json(json!("X")).unwrap(), KeySpec::hash("X"));
    /// assert_eq!(
    ///     KeySpec::from_json(json!({"hash": "a", "range": 5})).unwrap(),
    ///     KeySpec::composite("a", 5)
    /// );
    /// ```
    pub fn from_json(value: serde_json::Value) -> Result<Self, MarshalError> {
        match value {
            serde_json::Value::Object(mut map) => {
                let Some(hash) = map.remove("hash") else {
                    return Err(MarshalError::InvalidKey(
                        "object key must have a `hash` field".to_owned(),
                    ));
                };
                match map.remove("range") {
                    Some(range) if !range.is_null() => Ok(Self::composite(hash, range)),
                    _ => Ok(Self::hash(hash)),
                }
            }
            serde_json::Value::Array(_) => Err(MarshalError::InvalidKey(
                "arrays cannot be keys".to_owned(),
            )),
            scalar => Ok(Self::hash(scalar)),
        }
    }
}

impl From<&str> for KeySpec {
    fn from(value: &str) -> Self {
        Self::hash(value)
    }
}

impl From<String> for KeySpec {
    fn from(value: String) -> Self {
        Self::hash(value)
    }
}

impl From<i64> for KeySpec {
    fn from(value: i64) -> Self {
        Self::hash(value)
    }
}

impl From<Value> for KeySpec {
    fn from(value: Value) -> Self {
        Self::Hash(value)
    }
}

impl<H: Into<Value>, R: Into<Value>> From<(H, R)> for KeySpec {
    fn from((hash, range): (H, R)) -> Self {
        Self::composite(hash, range)
    }
}

/// Build the wire key for `spec`.
///
/// Key values must be non-empty scalars.
pub fn to_keys(spec: &KeySpec) -> Result<Key, MarshalError> {
    match spec {
        KeySpec::Hash(hash) => Ok(Key::hash(key_element("hash", hash)?)),
        KeySpec::Composite { hash, range } => Ok(Key::composite(
            key_element("hash", hash)?,
            key_element("range", range)?,
        )),
    }
}

fn key_element(role: &str, value: &Value) -> Result<AttributeValue, MarshalError> {
    match to_attribute_value(value) {
        Ok(Some(attribute)) if attribute.is_scalar() => Ok(attribute),
        Ok(Some(attribute)) => Err(MarshalError::InvalidKey(format!(
            "{role} key cannot be a {} set",
            attribute.type_descriptor()
        ))),
        Ok(None) => Err(MarshalError::InvalidKey(format!("{role} key is empty"))),
        Err(_) => Err(MarshalError::InvalidKey(format!(
            "{role} key cannot be a {}",
            value.kind()
        ))),
    }
}

// ---------------------------------------------------------------------------
// Updates
// ---------------------------------------------------------------------------

/// A caller-supplied change to one attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateAction {
    /// Replace the attribute.
    Put(Value),
    /// Add to a number or union into a set.
    Add(Value),
    /// Remove the attribute.
    Delete,
    /// Remove the given members from a set attribute.
    DeleteFromSet(Value),
}

impl From<Value> for UpdateAction {
    /// A bare value is a put; an absent value is a delete.
    fn from(value: Value) -> Self {
        if value.is_empty() {
            Self::Delete
        } else {
            Self::Put(value)
        }
    }
}

impl UpdateAction {
    /// Classify a JSON update value.
    ///
    /// Objects with a recognized action key (`add`, `put`, `delete`, or
    /// `"Action": "DELETE"`) select that action; anything else is a bare value
    /// and classified by [`From<Value>`].
    pub fn from_json(value: serde_json::Value) -> Self {
        let mut map = match value {
            serde_json::Value::Object(map) => map,
            literal => return Value::from(literal).into(),
        };

        if let Some(operand) = map.remove("add") {
            return Self::Add(operand.into());
        }
        if let Some(operand) = map.remove("put") {
            return Value::from(operand).into();
        }
        if let Some(operand) = map.remove("delete") {
            return Self::delete_members(operand.into());
        }
        let is_delete = map
            .get("Action")
            .and_then(serde_json::Value::as_str)
            .is_some_and(|action| action.eq_ignore_ascii_case("DELETE"));
        if is_delete {
            return map
                .remove("Value")
                .map_or(Self::Delete, |operand| Self::delete_members(operand.into()));
        }

        Self::Put(Value::from(serde_json::Value::Object(map)))
    }

    fn delete_members(operand: Value) -> Self {
        if operand.is_empty() {
            Self::Delete
        } else {
            Self::DeleteFromSet(operand)
        }
    }
}

/// Build the `AttributeUpdates` map for `UpdateItem`.
///
/// A put of an absent value deletes the attribute. `Add` and `DeleteFromSet`
/// need a value.
pub fn update_attributes(
    updates: &HashMap<String, UpdateAction>,
) -> Result<HashMap<String, AttributeValueUpdate>, MarshalError> {
    let mut wire = HashMap::with_capacity(updates.len());
    for (name, update) in updates {
        let descriptor = match update {
            UpdateAction::Put(value) => match to_attribute_value(value)? {
                Some(attribute) => AttributeValueUpdate {
                    value: Some(attribute),
                    action: AttributeAction::Put,
                },
                None => delete_descriptor(),
            },
            UpdateAction::Add(value) => AttributeValueUpdate {
                value: Some(required_operand(name, value)?),
                action: AttributeAction::Add,
            },
            UpdateAction::Delete => delete_descriptor(),
            UpdateAction::DeleteFromSet(value) => AttributeValueUpdate {
                value: Some(required_operand(name, value)?),
                action: AttributeAction::Delete,
            },
        };
        wire.insert(name.clone(), descriptor);
    }
    Ok(wire)
}

/// Classify every field of a JSON object with [`UpdateAction::from_json`].
pub fn updates_from_json(
    value: serde_json::Value,
) -> Result<HashMap<String, UpdateAction>, MarshalError> {
    match value {
        serde_json::Value::Object(map) => Ok(map
            .into_iter()
            .map(|(name, update)| (name, UpdateAction::from_json(update)))
            .collect()),
        other => Err(MarshalError::UnsupportedType(
            Value::from(other).kind().to_owned(),
        )),
    }
}

fn delete_descriptor() -> AttributeValueUpdate {
    AttributeValueUpdate {
        value: None,
        action: AttributeAction::Delete,
    }
}

fn required_operand(name: &str, value: &Value) -> Result<AttributeValue, MarshalError> {
    to_attribute_value(value)?.ok_or_else(|| MarshalError::EmptyUpdateValue(name.to_owned()))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;
    use crate::value::item_from_json;

    fn item(value: serde_json::Value) -> Item {
        item_from_json(value).unwrap()
    }

    #[test]
    fn test_should_roundtrip_supported_items() {
        let original = item(json!({
            "name": "Bob",
            "age": 42,
            "balance": -17,
            "ratio": 0.25,
            "big": 18_446_744_073_709_551_615_u64,
            "tags": ["a", "b"],
            "scores": [1, 2.5, -3],
            "zero": 0
        }));
        let wire = stringify(&original).unwrap();
        assert_eq!(parse(Some(&wire)).unwrap(), Some(original));
    }

    #[test]
    fn test_should_omit_absent_values() {
        let wire = stringify(&item(json!({
            "a": null,
            "b": "",
            "c": [],
            "d": 0,
            "e": false
        })))
        .unwrap();
        let mut names: Vec<&str> = wire.keys().map(String::as_str).collect();
        names.sort_unstable();
        assert_eq!(names, ["d", "e"]);
        assert_eq!(wire["d"], AttributeValue::N("0".to_owned()));
    }

    #[test]
    fn test_should_pick_set_type_from_first_element() {
        assert_eq!(
            to_attribute_value(&Value::from(vec![1, 2])).unwrap(),
            Some(AttributeValue::Ns(vec!["1".to_owned(), "2".to_owned()]))
        );
        assert_eq!(
            to_attribute_value(&Value::from(json!(["a", 1]))).unwrap(),
            Some(AttributeValue::Ss(vec!["a".to_owned(), "1".to_owned()]))
        );
        assert!(matches!(
            to_attribute_value(&Value::from(json!([1, "a"]))),
            Err(MarshalError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_should_stringify_booleans_and_dates() {
        let when = Utc.with_ymd_and_hms(2012, 2, 28, 2, 22, 10).unwrap();
        assert_eq!(
            to_attribute_value(&Value::from(true)).unwrap(),
            Some(AttributeValue::S("true".to_owned()))
        );
        assert_eq!(
            to_attribute_value(&Value::from(when)).unwrap(),
            Some(AttributeValue::S("2012-02-28T02:22:10.000Z".to_owned()))
        );
    }

    #[test]
    fn test_should_reject_nested_objects() {
        let err = stringify(&item(json!({"profile": {"a": 1}}))).unwrap_err();
        assert_eq!(err, MarshalError::UnsupportedType("object".to_owned()));
        assert_eq!(err.to_string(), "Unsupported Data type: object");
    }

    #[test]
    fn test_should_parse_empty_or_missing_item_as_none() {
        assert_eq!(parse(None).unwrap(), None);
        assert_eq!(parse(Some(&WireItem::new())).unwrap(), None);
    }

    #[test]
    fn test_should_reject_binary_attributes() {
        let mut wire = WireItem::new();
        wire.insert(
            "blob".to_owned(),
            AttributeValue::B(bytes::Bytes::from_static(b"x")),
        );
        assert_eq!(
            parse(Some(&wire)).unwrap_err(),
            MarshalError::UnsupportedType("B".to_owned())
        );
    }

    #[test]
    fn test_should_reject_malformed_numbers() {
        assert!(matches!(
            from_attribute_value(&AttributeValue::N("abc".to_owned())),
            Err(MarshalError::InvalidNumber(_))
        ));
        assert!(matches!(
            from_attribute_value(&AttributeValue::N("NaN".to_owned())),
            Err(MarshalError::InvalidNumber(_))
        ));
    }

    #[test]
    fn test_should_build_equivalent_hash_keys() {
        let bare = to_keys(&KeySpec::from_json(json!("X")).unwrap()).unwrap();
        let object = to_keys(&KeySpec::from_json(json!({"hash": "X"})).unwrap()).unwrap();
        assert_eq!(bare, object);
        assert_eq!(bare, Key::hash(AttributeValue::S("X".to_owned())));
    }

    #[test]
    fn test_should_tag_composite_key_elements() {
        let key = to_keys(&KeySpec::from(("a", 5))).unwrap();
        assert_eq!(
            serde_json::to_value(&key).unwrap(),
            json!({"HashKeyElement": {"S": "a"}, "RangeKeyElement": {"N": "5"}})
        );
    }

    #[test]
    fn test_should_reject_invalid_keys() {
        assert!(matches!(
            KeySpec::from_json(json!({"range": 1})),
            Err(MarshalError::InvalidKey(_))
        ));
        assert!(matches!(
            KeySpec::from_json(json!([1])),
            Err(MarshalError::InvalidKey(_))
        ));
        assert!(matches!(
            to_keys(&KeySpec::hash("")),
            Err(MarshalError::InvalidKey(_))
        ));
        assert!(matches!(
            to_keys(&KeySpec::hash(vec!["a"])),
            Err(MarshalError::InvalidKey(_))
        ));
        assert!(matches!(
            to_keys(&KeySpec::hash(json!({"a": 1}))),
            Err(MarshalError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_should_classify_updates() {
        let updates = updates_from_json(json!({
            "gone": null,
            "blank": "",
            "none": [],
            "counter": {"add": 5},
            "plain": 5,
            "explicit": {"put": "x"},
            "removed": {"Action": "DELETE"},
            "trimmed": {"delete": ["a"]}
        }))
        .unwrap();
        let wire = update_attributes(&updates).unwrap();

        for name in ["gone", "blank", "none", "removed"] {
            assert_eq!(
                serde_json::to_value(&wire[name]).unwrap(),
                json!({"Action": "DELETE"}),
                "{name}"
            );
        }
        assert_eq!(
            serde_json::to_value(&wire["counter"]).unwrap(),
            json!({"Value": {"N": "5"}, "Action": "ADD"})
        );
        assert_eq!(
            serde_json::to_value(&wire["plain"]).unwrap(),
            json!({"Value": {"N": "5"}, "Action": "PUT"})
        );
        assert_eq!(
            serde_json::to_value(&wire["explicit"]).unwrap(),
            json!({"Value": {"S": "x"}, "Action": "PUT"})
        );
        assert_eq!(
            serde_json::to_value(&wire["trimmed"]).unwrap(),
            json!({"Value": {"SS": ["a"]}, "Action": "DELETE"})
        );
    }

    #[test]
    fn test_should_prefer_action_object_over_literal() {
        assert_eq!(
            UpdateAction::from_json(json!({"add": 1, "other": 2})),
            UpdateAction::Add(Value::from(1))
        );
    }

    #[test]
    fn test_should_require_value_for_add() {
        let mut updates = HashMap::new();
        updates.insert("n".to_owned(), UpdateAction::Add(Value::Null));
        assert_eq!(
            update_attributes(&updates).unwrap_err(),
            MarshalError::EmptyUpdateValue("n".to_owned())
        );
    }
}

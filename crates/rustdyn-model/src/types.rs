//! Shared DynamoDB types for the `2011-12-05` API.
//!
//! Structs use `#[serde(rename_all = "PascalCase")]` to match the wire
//! format. Enum variants use Rust naming with `#[serde(rename)]` to map to the
//! `SCREAMING_SNAKE_CASE` strings DynamoDB sends.
//!
//! This API version predates secondary indexes: keys are described by a fixed
//! `HashKeyElement` and optional `RangeKeyElement` rather than a list of key
//! schema elements.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::attribute_value::{AttributeValue, WireItem};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Scalar attribute types allowed for key attributes.
///
/// Unrecognized strings are kept in `Unknown` rather than failing the whole
/// response.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScalarAttributeType {
    /// String type.
    S,
    /// Number type.
    N,
    /// Binary type.
    B,
    /// A type string this client does not know.
    Unknown(String),
}

impl ScalarAttributeType {
    /// Returns the wire-format string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::S => "S",
            Self::N => "N",
            Self::B => "B",
            Self::Unknown(s) => s.as_str(),
        }
    }
}

impl Serialize for ScalarAttributeType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ScalarAttributeType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "S" => Ok(Self::S),
            "N" => Ok(Self::N),
            "B" => Ok(Self::B),
            _ => Ok(Self::Unknown(s)),
        }
    }
}

impl std::fmt::Display for ScalarAttributeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current status of a table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableStatus {
    /// The table is being created.
    #[serde(rename = "CREATING")]
    Creating,
    /// The table is ready for use.
    #[serde(rename = "ACTIVE")]
    Active,
    /// The table is being deleted.
    #[serde(rename = "DELETING")]
    Deleting,
    /// The provisioned throughput is being changed.
    #[serde(rename = "UPDATING")]
    Updating,
}

impl TableStatus {
    /// Returns the wire-format string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Creating => "CREATING",
            Self::Active => "ACTIVE",
            Self::Deleting => "DELETING",
            Self::Updating => "UPDATING",
        }
    }
}

impl std::fmt::Display for TableStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which item attributes a write returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReturnValue {
    /// Nothing is returned.
    #[serde(rename = "NONE")]
    None,
    /// All attributes as they were before the write.
    #[serde(rename = "ALL_OLD")]
    AllOld,
    /// Updated attributes as they were before the update.
    #[serde(rename = "UPDATED_OLD")]
    UpdatedOld,
    /// All attributes as they are after the update.
    #[serde(rename = "ALL_NEW")]
    AllNew,
    /// Updated attributes as they are after the update.
    #[serde(rename = "UPDATED_NEW")]
    UpdatedNew,
}

/// Action applied to one attribute by `UpdateItem`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeAction {
    /// Replace the attribute value.
    #[serde(rename = "PUT")]
    Put,
    /// Add to a number or union into a set.
    #[serde(rename = "ADD")]
    Add,
    /// Remove the attribute, or the given members from a set.
    #[serde(rename = "DELETE")]
    Delete,
}

impl AttributeAction {
    /// Returns the wire-format string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Put => "PUT",
            Self::Add => "ADD",
            Self::Delete => "DELETE",
        }
    }
}

/// Comparison operator for range key conditions and scan filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOperator {
    /// Equal to.
    #[serde(rename = "EQ")]
    Eq,
    /// Not equal to.
    #[serde(rename = "NE")]
    Ne,
    /// Less than or equal to.
    #[serde(rename = "LE")]
    Le,
    /// Less than.
    #[serde(rename = "LT")]
    Lt,
    /// Greater than or equal to.
    #[serde(rename = "GE")]
    Ge,
    /// Greater than.
    #[serde(rename = "GT")]
    Gt,
    /// Attribute exists.
    #[serde(rename = "NOT_NULL")]
    NotNull,
    /// Attribute does not exist.
    #[serde(rename = "NULL")]
    Null,
    /// Attribute value contains the substring or set member.
    #[serde(rename = "CONTAINS")]
    Contains,
    /// Attribute value does not contain the substring or set member.
    #[serde(rename = "NOT_CONTAINS")]
    NotContains,
    /// Attribute value begins with the substring.
    #[serde(rename = "BEGINS_WITH")]
    BeginsWith,
    /// Attribute value is a member of the list.
    #[serde(rename = "IN")]
    In,
    /// Attribute value is between two values (inclusive).
    #[serde(rename = "BETWEEN")]
    Between,
}

// ---------------------------------------------------------------------------
// Structs - Keys & Schema
// ---------------------------------------------------------------------------

/// The primary key of one item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Key {
    /// Hash key value.
    pub hash_key_element: AttributeValue,
    /// Range key value for composite keys.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_key_element: Option<AttributeValue>,
}

impl Key {
    /// A hash-only key.
    #[must_use]
    pub fn hash(value: AttributeValue) -> Self {
        Self {
            hash_key_element: value,
            range_key_element: None,
        }
    }

    /// A composite hash and range key.
    #[must_use]
    pub fn composite(hash: AttributeValue, range: AttributeValue) -> Self {
        Self {
            hash_key_element: hash,
            range_key_element: Some(range),
        }
    }
}

/// Name and type of one key attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeySchemaElement {
    /// The name of the key attribute.
    pub attribute_name: String,
    /// The type of the key attribute.
    pub attribute_type: ScalarAttributeType,
}

impl KeySchemaElement {
    /// Build a schema element.
    #[must_use]
    pub fn new(attribute_name: impl Into<String>, attribute_type: ScalarAttributeType) -> Self {
        Self {
            attribute_name: attribute_name.into(),
            attribute_type,
        }
    }
}

/// A table's primary key layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeySchema {
    /// The hash key.
    pub hash_key_element: KeySchemaElement,
    /// The range key, for composite keys.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_key_element: Option<KeySchemaElement>,
}

impl Default for KeySchema {
    /// A hash key named `id` of type `S`.
    fn default() -> Self {
        Self {
            hash_key_element: KeySchemaElement::new("id", ScalarAttributeType::S),
            range_key_element: None,
        }
    }
}

impl KeySchema {
    /// Extract the primary key of `item` according to this schema.
    ///
    /// Returns `None` if a key attribute is missing.
    #[must_use]
    pub fn key_of(&self, item: &WireItem) -> Option<Key> {
        let hash = item.get(&self.hash_key_element.attribute_name)?.clone();
        let range = match &self.range_key_element {
            Some(element) => Some(item.get(&element.attribute_name)?.clone()),
            None => None,
        };
        Some(Key {
            hash_key_element: hash,
            range_key_element: range,
        })
    }
}

/// Requested read and write capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProvisionedThroughput {
    /// Read capacity units.
    pub read_capacity_units: i64,
    /// Write capacity units.
    pub write_capacity_units: i64,
}

impl Default for ProvisionedThroughput {
    fn default() -> Self {
        Self {
            read_capacity_units: 10,
            write_capacity_units: 5,
        }
    }
}

/// Provisioned capacity as reported by `DescribeTable`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProvisionedThroughputDescription {
    /// Time of the last increase, in epoch seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_increase_date_time: Option<f64>,
    /// Time of the last decrease, in epoch seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_decrease_date_time: Option<f64>,
    /// Read capacity units.
    #[serde(default)]
    pub read_capacity_units: i64,
    /// Write capacity units.
    #[serde(default)]
    pub write_capacity_units: i64,
}

/// Table metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TableDescription {
    /// The table name.
    pub table_name: String,
    /// Primary key layout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_schema: Option<KeySchema>,
    /// Current status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_status: Option<TableStatus>,
    /// Creation time, in epoch seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date_time: Option<f64>,
    /// Provisioned capacity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioned_throughput: Option<ProvisionedThroughputDescription>,
    /// Approximate size in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_size_bytes: Option<i64>,
    /// Approximate item count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_count: Option<i64>,
}

// ---------------------------------------------------------------------------
// Structs - Writes, conditions, batches
// ---------------------------------------------------------------------------

/// One attribute's change in `UpdateItem`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttributeValueUpdate {
    /// The operand. Absent for a whole-attribute delete.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<AttributeValue>,
    /// The action.
    pub action: AttributeAction,
}

/// A precondition on one attribute for a conditional write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExpectedAttributeValue {
    /// The attribute must currently hold this value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<AttributeValue>,
    /// `false` requires the attribute to be absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exists: Option<bool>,
}

/// A comparison used by range key conditions and scan filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Condition {
    /// Operands. Their number depends on the operator.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attribute_value_list: Vec<AttributeValue>,
    /// The comparison.
    pub comparison_operator: ComparisonOperator,
}

/// Put half of a `BatchWriteItem` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutRequest {
    /// The item to write.
    pub item: WireItem,
}

/// Delete half of a `BatchWriteItem` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteRequest {
    /// The key to delete.
    pub key: Key,
}

/// A single put or delete in a `BatchWriteItem` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WriteRequest {
    /// Set for puts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put_request: Option<PutRequest>,
    /// Set for deletes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_request: Option<DeleteRequest>,
}

impl WriteRequest {
    /// A put entry.
    #[must_use]
    pub fn put(item: WireItem) -> Self {
        Self {
            put_request: Some(PutRequest { item }),
            delete_request: None,
        }
    }

    /// A delete entry.
    #[must_use]
    pub fn delete(key: Key) -> Self {
        Self {
            put_request: None,
            delete_request: Some(DeleteRequest { key }),
        }
    }
}

/// Keys to fetch from one table in a `BatchGetItem` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeysAndAttributes {
    /// The keys to fetch.
    pub keys: Vec<Key>,
    /// Attributes to return. All when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes_to_get: Vec<String>,
}

/// Per-table part of a `BatchGetItem` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchGetResponse {
    /// Items found.
    #[serde(default)]
    pub items: Vec<WireItem>,
    /// Capacity consumed on this table.
    #[serde(default)]
    pub consumed_capacity_units: f64,
}

/// Per-table part of a `BatchWriteItem` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchWriteResponse {
    /// Capacity consumed on this table.
    #[serde(default)]
    pub consumed_capacity_units: f64,
}

/// Table name to `BatchWriteItem` entries.
pub type BatchWriteRequestItems = HashMap<String, Vec<WriteRequest>>;

/// Table name to `BatchGetItem` keys.
pub type BatchGetRequestItems = HashMap<String, KeysAndAttributes>;

//! Per-call options and result metadata for [`Client`](crate::Client).

use std::collections::HashMap;
use std::time::Duration;

use rustdyn_model::codec::to_attribute_value;
use rustdyn_model::types::{
    BatchGetRequestItems, ComparisonOperator, Condition, ExpectedAttributeValue, Key, KeySchema,
    KeySchemaElement, ProvisionedThroughput, ReturnValue, ScalarAttributeType,
};
use rustdyn_model::value::item_from_json;
use rustdyn_model::{Item, KeySpec, MarshalError, Value};

/// Key schema and throughput of a new table.
///
/// Defaults to a string hash key named `id`, 10 read and 5 write units.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateTableOptions {
    /// Primary key layout.
    pub key_schema: KeySchema,
    /// Provisioned capacity.
    pub throughput: ProvisionedThroughput,
}

impl CreateTableOptions {
    /// Use `name` of type `ty` as the hash key.
    #[must_use]
    pub fn with_hash_key(mut self, name: impl Into<String>, ty: ScalarAttributeType) -> Self {
        self.key_schema.hash_key_element = KeySchemaElement::new(name, ty);
        self
    }

    /// Add a range key.
    #[must_use]
    pub fn with_range_key(mut self, name: impl Into<String>, ty: ScalarAttributeType) -> Self {
        self.key_schema.range_key_element = Some(KeySchemaElement::new(name, ty));
        self
    }

    /// Set read and write capacity units.
    #[must_use]
    pub fn with_throughput(mut self, read: i64, write: i64) -> Self {
        self.throughput = ProvisionedThroughput {
            read_capacity_units: read,
            write_capacity_units: write,
        };
        self
    }
}

/// Options for `ListTables`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListTablesOptions {
    /// Maximum names per page.
    pub limit: Option<i32>,
    /// Continue after this table.
    pub exclusive_start_table_name: Option<String>,
}

/// Options for `GetItem`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetItemOptions {
    /// Attributes to return. Empty returns all of them.
    pub attributes_to_get: Vec<String>,
    /// Request a strongly consistent read.
    pub consistent_read: bool,
}

/// Options shared by `PutItem`, `UpdateItem` and `DeleteItem`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Conditions on the stored item.
    pub expected: HashMap<String, ExpectedAttributeValue>,
    /// Which attributes the response should carry.
    pub return_values: Option<ReturnValue>,
}

impl WriteOptions {
    /// Only write if `name` currently equals `value`.
    pub fn expect_value(
        mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Self, MarshalError> {
        let name = name.into();
        let value = to_attribute_value(&value.into())?
            .ok_or_else(|| MarshalError::InvalidKey(format!("expected value for {name} is empty")))?;
        self.expected.insert(
            name,
            ExpectedAttributeValue {
                value: Some(value),
                exists: None,
            },
        );
        Ok(self)
    }

    /// Only write if `name` is absent.
    #[must_use]
    pub fn expect_absent(mut self, name: impl Into<String>) -> Self {
        self.expected.insert(
            name.into(),
            ExpectedAttributeValue {
                value: None,
                exists: Some(false),
            },
        );
        self
    }

    /// Ask for `return_values` in the response.
    #[must_use]
    pub fn returning(mut self, return_values: ReturnValue) -> Self {
        self.return_values = Some(return_values);
        self
    }
}

/// Options for `Query`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    /// Condition on the range key.
    pub range_key_condition: Option<Condition>,
    /// Attributes to return.
    pub attributes_to_get: Vec<String>,
    /// Maximum items to evaluate.
    pub limit: Option<i32>,
    /// Request a strongly consistent read.
    pub consistent_read: Option<bool>,
    /// Return only the count.
    pub count: Option<bool>,
    /// Ascending (`true`) or descending range order.
    pub scan_index_forward: Option<bool>,
    /// Continue after this key.
    pub exclusive_start_key: Option<Key>,
}

/// Options for `Scan`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanOptions {
    /// Filters applied to every scanned item.
    pub scan_filter: HashMap<String, Condition>,
    /// Attributes to return.
    pub attributes_to_get: Vec<String>,
    /// Maximum items to evaluate.
    pub limit: Option<i32>,
    /// Return only the count.
    pub count: Option<bool>,
    /// Continue after this key.
    pub exclusive_start_key: Option<Key>,
}

/// Build a condition from native operands.
///
/// ```
/// use rustdyn_client::options::condition;
/// use rustdyn_model::types::ComparisonOperator;
///
/// let between = condition(ComparisonOperator::Between, [1.into(), 9.into()]).unwrap();
/// assert_eq!(between.attribute_value_list.len(), 2);
/// ```
pub fn condition(
    operator: ComparisonOperator,
    operands: impl IntoIterator<Item = Value>,
) -> Result<Condition, MarshalError> {
    let attribute_value_list = operands
        .into_iter()
        .map(|value| {
            to_attribute_value(&value)?.ok_or_else(|| {
                MarshalError::UnsupportedType(format!("empty {} operand", value.kind()))
            })
        })
        .collect::<Result<_, _>>()?;
    Ok(Condition {
        attribute_value_list,
        comparison_operator: operator,
    })
}

/// Polling cadence for the table wait helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Pause between polls.
    pub interval: Duration,
    /// Polls before giving up.
    pub max_polls: u32,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_polls: 150,
        }
    }
}

/// One entry of a batch write.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchWrite {
    /// Store an item.
    Put(Item),
    /// Delete the item with this key.
    Delete(KeySpec),
}

impl BatchWrite {
    /// Read the `{"put": item}` / `{"del": key}` shape.
    pub fn from_json(value: serde_json::Value) -> Result<Self, MarshalError> {
        let serde_json::Value::Object(mut entry) = value else {
            return Err(MarshalError::UnsupportedType(
                "batch write entry must be an object".to_owned(),
            ));
        };
        if let Some(item) = entry.remove("put") {
            return Ok(Self::Put(item_from_json(item)?));
        }
        if let Some(key) = entry.remove("del") {
            return Ok(Self::Delete(KeySpec::from_json(key)?));
        }
        Err(MarshalError::UnsupportedType(
            "batch write entry needs `put` or `del`".to_owned(),
        ))
    }
}

/// Keys to fetch from one table in a batch get.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchGetRequest {
    /// Keys to fetch.
    pub keys: Vec<KeySpec>,
    /// Attributes to return.
    pub attributes_to_get: Vec<String>,
}

impl BatchGetRequest {
    /// Fetch `keys` with all attributes.
    pub fn new(keys: impl IntoIterator<Item = impl Into<KeySpec>>) -> Self {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            attributes_to_get: Vec::new(),
        }
    }
}

/// Metadata of a `GetItem` response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemMeta {
    /// Capacity consumed.
    pub consumed_capacity_units: Option<f64>,
}

/// Result of `PutItem`, `UpdateItem` and `DeleteItem`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteResult {
    /// Attributes requested with `return_values`.
    pub attributes: Option<Item>,
    /// Capacity consumed.
    pub consumed_capacity_units: Option<f64>,
}

/// A `Query` response without its items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryMeta {
    /// Matching items.
    pub count: Option<i64>,
    /// Continuation key when more pages exist.
    pub last_evaluated_key: Option<Key>,
    /// Capacity consumed.
    pub consumed_capacity_units: Option<f64>,
}

/// A `Scan` response without its items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanMeta {
    /// Items that passed the filter.
    pub count: Option<i64>,
    /// Items evaluated.
    pub scanned_count: Option<i64>,
    /// Continuation key when more pages exist.
    pub last_evaluated_key: Option<Key>,
    /// Capacity consumed.
    pub consumed_capacity_units: Option<f64>,
}

/// A `BatchGetItem` response without its items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchGetMeta {
    /// Keys the service did not process, by table.
    pub unprocessed_keys: BatchGetRequestItems,
    /// Capacity consumed, by table.
    pub consumed_capacity_units: HashMap<String, f64>,
}

/// Outcome of a batch write after all resubmissions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchWriteMeta {
    /// Capacity consumed, by table, summed over every request sent.
    pub consumed_capacity_units: HashMap<String, f64>,
    /// `BatchWriteItem` requests sent.
    pub rounds: usize,
}

impl BatchWriteMeta {
    pub(crate) fn absorb(&mut self, other: Self) {
        self.rounds += other.rounds;
        for (table, units) in other.consumed_capacity_units {
            *self.consumed_capacity_units.entry(table).or_default() += units;
        }
    }
}

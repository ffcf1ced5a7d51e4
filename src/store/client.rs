//! Store transport contract
//!
//! The operations the backend consumes from a schemaless key-value store:
//! primary-key get/put/delete, a paged full scan and a paged index-scoped
//! equality query.

use std::collections::BTreeMap;

use crate::document::{Value, ID_FIELD};

use super::errors::StoreResult;

/// Wire form of a stored document
pub type Item = BTreeMap<String, Value>;

/// Primary key of an item
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PrimaryKey(String);

impl PrimaryKey {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extract the key from an item's `_id` attribute
    pub fn of_item(item: &Item) -> Option<Self> {
        item.get(ID_FIELD)
            .and_then(Value::as_str)
            .map(|id| Self(id.to_string()))
    }
}

/// Equality key condition `attribute = value`
#[derive(Debug, Clone, PartialEq)]
pub struct KeyCondition {
    pub attribute: String,
    pub value: Value,
}

impl KeyCondition {
    pub fn eq(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
        }
    }
}

/// One page of a full table scan
#[derive(Debug, Clone, Default)]
pub struct ScanRequest {
    /// Maximum items per page (store default when `None`)
    pub limit: Option<usize>,
    /// Continue after this key
    pub exclusive_start_key: Option<PrimaryKey>,
}

/// An equality query against the primary key or a named secondary index
#[derive(Debug, Clone)]
pub struct QueryRequest {
    /// Secondary index name; `None` queries the primary key
    pub index_name: Option<String>,
    pub condition: KeyCondition,
    pub limit: Option<usize>,
    pub exclusive_start_key: Option<PrimaryKey>,
}

impl QueryRequest {
    pub fn primary(condition: KeyCondition) -> Self {
        Self {
            index_name: None,
            condition,
            limit: None,
            exclusive_start_key: None,
        }
    }

    pub fn index(index_name: impl Into<String>, condition: KeyCondition) -> Self {
        Self {
            index_name: Some(index_name.into()),
            condition,
            limit: None,
            exclusive_start_key: None,
        }
    }
}

/// A page of items plus the continuation key. The result set is complete
/// once `last_evaluated_key` is `None`.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub items: Vec<Item>,
    pub last_evaluated_key: Option<PrimaryKey>,
}

impl Page {
    pub fn is_last(&self) -> bool {
        self.last_evaluated_key.is_none()
    }
}

/// Transport to a key-value table store
pub trait TableClient {
    /// Fetch one item by primary key
    fn get_item(&self, table: &str, key: &PrimaryKey) -> StoreResult<Option<Item>>;

    /// Insert or replace an item keyed by its `_id`
    fn put_item(&self, table: &str, item: Item) -> StoreResult<()>;

    /// Remove an item. Absent keys are not an error.
    fn delete_item(&self, table: &str, key: &PrimaryKey) -> StoreResult<()>;

    /// Read one page of a full table scan
    fn scan(&self, table: &str, request: &ScanRequest) -> StoreResult<Page>;

    /// Read one page of an equality query
    fn query(&self, table: &str, request: &QueryRequest) -> StoreResult<Page>;
}

impl<C: TableClient + ?Sized> TableClient for std::sync::Arc<C> {
    fn get_item(&self, table: &str, key: &PrimaryKey) -> StoreResult<Option<Item>> {
        (**self).get_item(table, key)
    }

    fn put_item(&self, table: &str, item: Item) -> StoreResult<()> {
        (**self).put_item(table, item)
    }

    fn delete_item(&self, table: &str, key: &PrimaryKey) -> StoreResult<()> {
        (**self).delete_item(table, key)
    }

    fn scan(&self, table: &str, request: &ScanRequest) -> StoreResult<Page> {
        (**self).scan(table, request)
    }

    fn query(&self, table: &str, request: &QueryRequest) -> StoreResult<Page> {
        (**self).query(table, request)
    }
}


//! In-memory table store
//!
//! Behaves like the schemaless key-value store the backend targets:
//! named tables keyed by `_id`, sparse secondary indexes, paged scans and
//! queries, exact-decimal numbers only.
//!
//! # Invariants
//!
//! - Unknown tables fail with `ResourceNotFound`
//! - Items must carry a string `_id` and no binary floats
//! - Indexes are updated in the same critical section as the item map
//! - Scan and query pages are ordered by ascending `_id`

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::ops::Bound;
use std::sync::RwLock;

use crate::document::ID_FIELD;

use super::client::{Item, Page, PrimaryKey, QueryRequest, ScanRequest, TableClient};
use super::errors::{StoreError, StoreResult};
use super::index::{IndexSpec, SecondaryIndex};

/// Table declaration: name plus secondary indexes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub name: String,
    pub indexes: Vec<IndexSpec>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            indexes: Vec::new(),
        }
    }

    /// Add a conventionally-named index over `field`
    pub fn with_index(mut self, field: impl Into<String>) -> Self {
        self.indexes.push(IndexSpec::for_field(field));
        self
    }

    pub fn with_index_spec(mut self, spec: IndexSpec) -> Self {
        self.indexes.push(spec);
        self
    }
}

#[derive(Debug, Default)]
struct MemoryTable {
    items: BTreeMap<String, Item>,
    indexes: HashMap<String, SecondaryIndex>,
}

impl MemoryTable {
    fn from_schema(schema: &TableSchema) -> Self {
        let indexes = schema
            .indexes
            .iter()
            .map(|spec| (spec.name.clone(), SecondaryIndex::new(spec.field.clone())))
            .collect();
        Self {
            items: BTreeMap::new(),
            indexes,
        }
    }

    fn put(&mut self, id: String, item: Item) {
        if let Some(old) = self.items.get(&id) {
            for index in self.indexes.values_mut() {
                index.remove(&id, old);
            }
        }
        for index in self.indexes.values_mut() {
            index.insert(&id, &item);
        }
        self.items.insert(id, item);
    }

    fn delete(&mut self, id: &str) {
        if let Some(old) = self.items.remove(id) {
            for index in self.indexes.values_mut() {
                index.remove(id, &old);
            }
        }
    }
}

/// Thread-safe in-memory implementation of `TableClient`
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, MemoryTable>>,
    /// Page cap applied when a request carries no limit
    default_page_size: Option<usize>,
}

impl MemoryStore {
    /// Create an empty store with unbounded pages
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that caps every page at `page_size` items, the way a
    /// remote store caps response size
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            default_page_size: Some(page_size.max(1)),
        }
    }

    /// Create a table. Recreating an existing table replaces it.
    pub fn create_table(&self, schema: TableSchema) -> StoreResult<()> {
        let mut tables = self.write_tables()?;
        tables.insert(schema.name.clone(), MemoryTable::from_schema(&schema));
        Ok(())
    }

    /// Drop a table; unknown tables fail with `ResourceNotFound`
    pub fn drop_table(&self, name: &str) -> StoreResult<()> {
        let mut tables = self.write_tables()?;
        tables
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::resource_not_found(name))
    }

    /// Existing table names, sorted
    pub fn table_names(&self) -> StoreResult<Vec<String>> {
        let tables = self.read_tables()?;
        let mut names: Vec<String> = tables.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    /// Number of items in a table
    pub fn item_count(&self, table: &str) -> StoreResult<usize> {
        let tables = self.read_tables()?;
        let table = lookup(&tables, table)?;
        Ok(table.items.len())
    }

    fn read_tables(
        &self,
    ) -> StoreResult<std::sync::RwLockReadGuard<'_, HashMap<String, MemoryTable>>> {
        self.tables
            .read()
            .map_err(|e| StoreError::Service(e.to_string()))
    }

    fn write_tables(
        &self,
    ) -> StoreResult<std::sync::RwLockWriteGuard<'_, HashMap<String, MemoryTable>>> {
        self.tables
            .write()
            .map_err(|e| StoreError::Service(e.to_string()))
    }

    fn page_limit(&self, requested: Option<usize>) -> Option<usize> {
        requested.or(self.default_page_size).map(|n| n.max(1))
    }
}

fn lookup<'a>(tables: &'a HashMap<String, MemoryTable>, name: &str) -> StoreResult<&'a MemoryTable> {
    tables
        .get(name)
        .ok_or_else(|| StoreError::resource_not_found(name))
}

fn validate_item(item: &Item) -> StoreResult<String> {
    let id = PrimaryKey::of_item(item).ok_or_else(|| {
        StoreError::Validation(format!("item is missing string key attribute '{}'", ID_FIELD))
    })?;

    if let Some((name, _)) = item.iter().find(|(_, v)| v.is_float()) {
        return Err(StoreError::Validation(format!(
            "attribute '{}' is a binary float; numbers must be exact decimals",
            name
        )));
    }

    Ok(id.as_str().to_string())
}

/// Collect one page from ids already in ascending order
fn collect_page<'a>(
    ids: impl Iterator<Item = &'a String>,
    items: &BTreeMap<String, Item>,
    start: Option<&PrimaryKey>,
    limit: Option<usize>,
) -> Page {
    let mut remaining = ids
        .filter(|id| start.map_or(true, |s| id.as_str() > s.as_str()))
        .filter_map(|id| items.get(id).map(|item| (id, item)))
        .peekable();

    let mut page = Page::default();
    while let Some((id, item)) = remaining.next() {
        page.items.push(item.clone());
        if limit.map_or(false, |n| page.items.len() >= n) {
            if remaining.peek().is_some() {
                page.last_evaluated_key = Some(PrimaryKey::new(id.clone()));
            }
            break;
        }
    }
    page
}

impl TableClient for MemoryStore {
    fn get_item(&self, table: &str, key: &PrimaryKey) -> StoreResult<Option<Item>> {
        let tables = self.read_tables()?;
        let table = lookup(&tables, table)?;
        Ok(table.items.get(key.as_str()).cloned())
    }

    fn put_item(&self, table: &str, item: Item) -> StoreResult<()> {
        let id = validate_item(&item)?;
        let mut tables = self.write_tables()?;
        let table = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::resource_not_found(table))?;
        table.put(id, item);
        Ok(())
    }

    fn delete_item(&self, table: &str, key: &PrimaryKey) -> StoreResult<()> {
        let mut tables = self.write_tables()?;
        let table = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::resource_not_found(table))?;
        table.delete(key.as_str());
        Ok(())
    }

    fn scan(&self, table: &str, request: &ScanRequest) -> StoreResult<Page> {
        let tables = self.read_tables()?;
        let table = lookup(&tables, table)?;

        let lower = match &request.exclusive_start_key {
            Some(key) => Bound::Excluded(key.as_str().to_string()),
            None => Bound::Unbounded,
        };
        let ids = table
            .items
            .range::<String, _>((lower, Bound::Unbounded))
            .map(|(id, _)| id);

        Ok(collect_page(
            ids,
            &table.items,
            None,
            self.page_limit(request.limit),
        ))
    }

    fn query(&self, table: &str, request: &QueryRequest) -> StoreResult<Page> {
        let tables = self.read_tables()?;
        let table = lookup(&tables, table)?;
        let condition = &request.condition;
        let limit = self.page_limit(request.limit);
        let start = request.exclusive_start_key.as_ref();

        let key = condition.value.canonical_text().ok_or_else(|| {
            StoreError::Validation(format!(
                "key condition value of type {} is not a valid key",
                condition.value.type_name()
            ))
        })?;

        match &request.index_name {
            None => {
                if condition.attribute != ID_FIELD {
                    return Err(StoreError::Validation(format!(
                        "query condition on '{}' does not match key attribute '{}'",
                        condition.attribute, ID_FIELD
                    )));
                }
                let ids: BTreeSet<String> = std::iter::once(key).collect();
                Ok(collect_page(ids.iter(), &table.items, start, limit))
            }
            Some(name) => {
                let index = table.indexes.get(name).ok_or_else(|| {
                    StoreError::Validation(format!(
                        "the table does not have the specified index: {}",
                        name
                    ))
                })?;
                if condition.attribute != index.field() {
                    return Err(StoreError::Validation(format!(
                        "query condition on '{}' does not match index key '{}'",
                        condition.attribute,
                        index.field()
                    )));
                }
                let empty = BTreeSet::new();
                let ids = index.lookup_eq(&key).unwrap_or(&empty);
                Ok(collect_page(ids.iter(), &table.items, start, limit))
            }
        }
    }
}

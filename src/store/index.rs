//! Secondary index structures for the in-memory store
//!
//! Each index maps the canonical text of one field to the ordered set of
//! item ids carrying that value. BTree containers keep lookups and paging
//! deterministic.

use std::collections::{BTreeMap, BTreeSet};

use super::client::Item;

/// Declaration of a secondary index over one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSpec {
    /// Index name, conventionally `"<field>-index"`
    pub name: String,
    /// Indexed attribute
    pub field: String,
}

impl IndexSpec {
    pub fn new(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field: field.into(),
        }
    }

    /// Index over `field` named with the conventional `-index` suffix
    pub fn for_field(field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            name: format!("{}-index", field),
            field,
        }
    }
}

/// A single secondary index
#[derive(Debug, Default)]
pub struct SecondaryIndex {
    field: String,
    tree: BTreeMap<String, BTreeSet<String>>,
}

impl SecondaryIndex {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            tree: BTreeMap::new(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// Index an item under its field value. Items without the field, or
    /// with a null value, are not indexed (sparse index).
    pub fn insert(&mut self, id: &str, item: &Item) {
        if let Some(key) = item.get(&self.field).and_then(|v| v.canonical_text()) {
            self.tree.entry(key).or_default().insert(id.to_string());
        }
    }

    /// Drop an item's entry. Empty keys are pruned.
    pub fn remove(&mut self, id: &str, item: &Item) {
        if let Some(key) = item.get(&self.field).and_then(|v| v.canonical_text()) {
            if let Some(ids) = self.tree.get_mut(&key) {
                ids.remove(id);
                if ids.is_empty() {
                    self.tree.remove(&key);
                }
            }
        }
    }

    /// Ids whose field value has the given canonical text, ascending
    pub fn lookup_eq(&self, key: &str) -> Option<&BTreeSet<String>> {
        self.tree.get(key)
    }

    /// Number of distinct keys
    pub fn key_count(&self) -> usize {
        self.tree.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Value;

    fn item(id: &str, name: &str) -> Item {
        let mut item = Item::new();
        item.insert("_id".to_string(), Value::from(id));
        item.insert("name".to_string(), Value::from(name));
        item
    }

    #[test]
    fn test_for_field_naming() {
        let spec = IndexSpec::for_field("email");
        assert_eq!(spec.name, "email-index");
        assert_eq!(spec.field, "email");
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut index = SecondaryIndex::new("name");
        index.insert("b", &item("b", "Alice"));
        index.insert("a", &item("a", "Alice"));
        index.insert("c", &item("c", "Bob"));

        let ids: Vec<_> = index.lookup_eq("Alice").unwrap().iter().cloned().collect();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(index.key_count(), 2);
    }

    #[test]
    fn test_remove_prunes_empty_keys() {
        let mut index = SecondaryIndex::new("name");
        let doc = item("a", "Alice");
        index.insert("a", &doc);
        index.remove("a", &doc);

        assert!(index.lookup_eq("Alice").is_none());
        assert_eq!(index.key_count(), 0);
    }

    #[test]
    fn test_sparse_index_skips_missing_and_null() {
        let mut index = SecondaryIndex::new("email");
        index.insert("a", &item("a", "Alice"));

        let mut nulled = item("b", "Bob");
        nulled.insert("email".to_string(), Value::Null);
        index.insert("b", &nulled);

        assert_eq!(index.key_count(), 0);
    }
}

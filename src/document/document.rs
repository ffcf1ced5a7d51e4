//! Raw document mapping
//!
//! A document is a flat mapping from field name to scalar value. The adapter
//! only ever borrows it for the duration of one operation.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::errors::{DocumentError, DocumentResult};
use super::value::Value;

/// Name of the primary key field
pub const ID_FIELD: &str = "_id";

/// A flat field mapping, keyed deterministically by field name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    fields: BTreeMap<String, Value>,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document carrying only an `_id`
    pub fn with_id(id: impl Into<String>) -> Self {
        let mut doc = Self::new();
        doc.insert(ID_FIELD, Value::Str(id.into()));
        doc
    }

    /// Builder-style field insertion
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Returns the document identifier, if it is present and a string
    pub fn id(&self) -> Option<&str> {
        self.fields.get(ID_FIELD).and_then(Value::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(name.into(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.fields.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    pub fn into_fields(self) -> BTreeMap<String, Value> {
        self.fields
    }

    /// Required string field accessor for model factories
    pub fn require_str(&self, name: &str) -> DocumentResult<&str> {
        let value = self
            .get(name)
            .ok_or_else(|| DocumentError::MissingField(name.to_string()))?;
        value.as_str().ok_or_else(|| DocumentError::InvalidField {
            field: name.to_string(),
            expected: "string",
            actual: value.type_name(),
        })
    }

    /// Converts a JSON object into a document.
    ///
    /// Integers that fit `i64` become `Int`, larger unsigned integers become
    /// an exact `Decimal`, and fractional numbers become `Float`. Arrays and
    /// nested objects are rejected.
    pub fn from_json(json: serde_json::Value) -> DocumentResult<Self> {
        let object = match json {
            serde_json::Value::Object(map) => map,
            other => return Err(DocumentError::NotAnObject(json_kind(&other))),
        };

        let mut doc = Self::new();
        for (name, raw) in object {
            let value = match raw {
                serde_json::Value::Null => Value::Null,
                serde_json::Value::Bool(b) => Value::Bool(b),
                serde_json::Value::String(s) => Value::Str(s),
                serde_json::Value::Number(n) => match (n.as_i64(), n.as_u64()) {
                    (Some(i), _) => Value::Int(i),
                    (None, Some(u)) => Value::Decimal(Decimal::from(u)),
                    (None, None) => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
                },
                other => {
                    return Err(DocumentError::UnsupportedValue {
                        field: name,
                        kind: json_kind(&other),
                    })
                }
            };
            doc.fields.insert(name, value);
        }
        Ok(doc)
    }
}

impl From<BTreeMap<String, Value>> for Document {
    fn from(fields: BTreeMap<String, Value>) -> Self {
        Self { fields }
    }
}

impl TryFrom<serde_json::Value> for Document {
    type Error = DocumentError;

    fn try_from(json: serde_json::Value) -> DocumentResult<Self> {
        Self::from_json(json)
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_scalar_mapping() {
        let doc = Document::from_json(json!({
            "_id": "a1",
            "name": "Alice",
            "age": 30,
            "score": 9.5,
            "active": true,
            "nickname": null
        }))
        .unwrap();

        assert_eq!(doc.id(), Some("a1"));
        assert_eq!(doc.get("age"), Some(&Value::Int(30)));
        assert_eq!(doc.get("score"), Some(&Value::Float(9.5)));
        assert_eq!(doc.get("active"), Some(&Value::Bool(true)));
        assert_eq!(doc.get("nickname"), Some(&Value::Null));
    }

    #[test]
    fn test_from_json_large_unsigned_is_exact() {
        let doc = Document::from_json(json!({"_id": "a", "n": u64::MAX})).unwrap();
        let expected: Decimal = "18446744073709551615".parse().unwrap();
        assert_eq!(doc.get("n"), Some(&Value::Decimal(expected)));
    }

    #[test]
    fn test_field_mutation() {
        let mut doc = Document::with_id("a").field("tmp", 1i64);
        assert_eq!(doc.len(), 2);
        assert!(doc.contains("tmp"));

        assert_eq!(doc.remove("tmp"), Some(Value::Int(1)));
        assert!(!doc.contains("tmp"));
        assert_eq!(doc.remove("_id"), Some(Value::Str("a".into())));
        assert!(doc.is_empty());
    }

    #[test]
    fn test_from_json_rejects_nested() {
        let err = Document::from_json(json!({"_id": "a", "tags": ["x"]})).unwrap_err();
        assert_eq!(
            err,
            DocumentError::UnsupportedValue {
                field: "tags".to_string(),
                kind: "array"
            }
        );
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        let err = Document::from_json(json!("nope")).unwrap_err();
        assert_eq!(err.code(), "DOCKV_DOCUMENT_NOT_OBJECT");
    }

    #[test]
    fn test_id_requires_string() {
        let doc = Document::new().field("_id", 7i64);
        assert_eq!(doc.id(), None);
    }

    #[test]
    fn test_require_str() {
        let doc = Document::with_id("x").field("age", 3i64);
        assert_eq!(doc.require_str("_id").unwrap(), "x");
        assert!(matches!(
            doc.require_str("age"),
            Err(DocumentError::InvalidField { .. })
        ));
        assert!(matches!(
            doc.require_str("name"),
            Err(DocumentError::MissingField(_))
        ));
    }
}

//! Numeric normalization for writes
//!
//! The store only accepts exact decimals. Each float is rebuilt from its
//! shortest round-trip decimal text, not from its binary value, so `0.1`
//! is stored as `0.1` rather than `0.1000000000000000055511151231257827`.

use rust_decimal::Decimal;

use crate::document::{Document, Value};

use super::errors::{BackendError, BackendResult};

/// Replace every float field with its exact decimal equivalent
pub fn normalize_document(doc: &Document) -> BackendResult<Document> {
    let mut normalized = Document::new();
    for (name, value) in doc.iter() {
        let value = match value {
            Value::Float(x) => Value::Decimal(float_to_decimal(name, *x)?),
            other => other.clone(),
        };
        normalized.insert(name.clone(), value);
    }
    Ok(normalized)
}

/// Convert one float through its decimal text. Text that needs more than
/// 28 fractional digits or exceeds the 96-bit range fails rather than
/// rounding.
fn float_to_decimal(field: &str, x: f64) -> BackendResult<Decimal> {
    if !x.is_finite() {
        return Err(BackendError::Normalize {
            field: field.to_string(),
            reason: format!("{} has no decimal representation", x),
        });
    }

    let text = x.to_string();
    Decimal::from_str_exact(&text).map_err(|e| BackendError::Normalize {
        field: field.to_string(),
        reason: e.to_string(),
    })
}

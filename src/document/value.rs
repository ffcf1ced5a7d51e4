//! Scalar field values
//!
//! `Float` only exists in process. The store speaks exact decimals, so every
//! float is normalized to `Decimal` before it reaches the wire.

use std::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// A scalar document field value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Explicit null
    Null,
    /// Boolean
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Binary floating point (in-process only)
    Float(f64),
    /// Exact fixed-point decimal (wire numeric form)
    Decimal(Decimal),
    /// UTF-8 string
    Str(String),
}

impl Value {
    /// Returns the type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Decimal(_) => "decimal",
            Value::Str(_) => "string",
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer view. Decimals convert only when they carry no fraction.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Decimal(d) if d.fract().is_zero() => d.to_i64(),
            _ => None,
        }
    }

    /// Exact decimal view of an integer or decimal value
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Int(i) => Some(Decimal::from(*i)),
            Value::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Canonical text used as the secondary index key.
    ///
    /// Numbers render without trailing zeros so `Int(30)`, `Decimal(30.0)`
    /// and the descriptor text `"30"` all meet on the same key. Null and
    /// float values are never indexed.
    pub fn canonical_text(&self) -> Option<String> {
        match self {
            Value::Str(s) => Some(s.clone()),
            Value::Int(i) => Some(i.to_string()),
            Value::Decimal(d) => Some(d.normalize().to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Float(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Decimal(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_canonical_text_numbers_agree() {
        let int = Value::Int(30);
        let dec = Value::Decimal(Decimal::from_str("30.00").unwrap());
        assert_eq!(int.canonical_text().as_deref(), Some("30"));
        assert_eq!(dec.canonical_text().as_deref(), Some("30"));
    }

    #[test]
    fn test_canonical_text_skips_null_and_float() {
        assert!(Value::Null.canonical_text().is_none());
        assert!(Value::Float(1.5).canonical_text().is_none());
    }

    #[test]
    fn test_bool_canonical_text() {
        assert_eq!(Value::Bool(true).canonical_text().as_deref(), Some("true"));
    }

    #[test]
    fn test_as_i64_from_integral_decimal() {
        let dec = Value::Decimal(Decimal::from_str("42.0").unwrap());
        assert_eq!(dec.as_i64(), Some(42));

        let frac = Value::Decimal(Decimal::from_str("42.5").unwrap());
        assert_eq!(frac.as_i64(), None);
    }
}

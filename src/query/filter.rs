//! Filter descriptor parsing
//!
//! A descriptor is an opaque colon-delimited string produced by the document
//! layer. Only segments 3 and 4 (0-indexed) are read: the index (field) name
//! and the target value. Segments past the fifth are ignored.
//!
//! The value segment is compared verbatim against the canonical text of the
//! stored field: integers and decimals without trailing zeros or leading
//! zeros (`1968`, `2.5`), booleans as lowercase `true`/`false`. Values like
//! `1968.0`, `01968` or `True` are treated as strings and will not match a
//! numeric or boolean field.

use std::collections::BTreeSet;

use crate::backend::{BackendError, BackendResult};

/// Segment delimiter
pub const DELIMITER: char = ':';

/// Minimum number of segments in a well-formed descriptor
pub const MIN_SEGMENTS: usize = 5;

const INDEX_SEGMENT: usize = 3;
const VALUE_SEGMENT: usize = 4;

/// The `(index, value)` pair carried by one descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterDescriptor {
    index: String,
    value: String,
}

impl FilterDescriptor {
    /// Extract `(index, value)` from a descriptor string
    pub fn parse(descriptor: &str) -> BackendResult<Self> {
        let segments: Vec<&str> = descriptor.split(DELIMITER).collect();
        if segments.len() < MIN_SEGMENTS {
            return Err(BackendError::MalformedFilter {
                descriptor: descriptor.to_string(),
                segments: segments.len(),
            });
        }

        Ok(Self {
            index: segments[INDEX_SEGMENT].to_string(),
            value: segments[VALUE_SEGMENT].to_string(),
        })
    }

    /// Field (index) name
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Target value, as text
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Deduplicate descriptors.
///
/// Duplicates collapse to one; result order is not part of the contract
/// (this implementation returns them sorted). No shape validation happens
/// here.
pub fn parse_filters<S: AsRef<str>>(descriptors: &[S]) -> Vec<String> {
    descriptors
        .iter()
        .map(|d| d.as_ref().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

//! Document backend over a schemaless key-value store
//!
//! Exposes the uniform CRUD and query contract (`DocBackend`) and its
//! key-value implementation (`KeyValueBackend`).
//!
//! # Invariants
//!
//! - Every persisted document carries exactly one string `_id`
//! - Floats never reach the store; they are written as exact decimals
//! - A missing table on write surfaces as `Resource`
//! - Any other store failure surfaces unchanged as `Store`
//! - Scans and queries follow continuation keys to completion
//!
//! # Execution Flow (query)
//!
//! ```text
//! filters -> parse/dedupe -> per-filter index query -> intersect -> materialize
//! ```

mod contract;
mod errors;
mod keyvalue;
mod materialize;
mod normalize;
mod scan;

pub use contract::{DocBackend, DocStream};
pub use errors::{BackendError, BackendResult};
pub use keyvalue::KeyValueBackend;
pub use materialize::{materialize, Materialized};
pub use normalize::normalize_document;
pub use scan::{collect_scan, TableScan};

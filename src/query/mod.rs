//! Query resolution engine
//!
//! Translates a list of equality filter descriptors into one result set:
//! each filter is looked up independently against its index, then the
//! per-filter id sets are intersected.
//!
//! # Invariants
//!
//! - AND semantics: a document must match every filter
//! - Documents are correlated across filters by `_id` only
//! - Duplicate descriptors collapse to one
//! - An empty filter list is an input error, never an empty or full result

mod filter;
mod resolver;

pub use filter::{parse_filters, FilterDescriptor, DELIMITER, MIN_SEGMENTS};
pub use resolver::{intersect_candidates, CandidateSet, QueryResolver};

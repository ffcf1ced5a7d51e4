//! Key-value store transport
//!
//! The backend talks to its store only through `TableClient`. The store is
//! schemaless apart from the `_id` primary key and any declared secondary
//! indexes.
//!
//! `MemoryStore` is a complete in-process implementation used for tests and
//! embedded deployments.

mod client;
mod errors;
mod index;
mod memory;

pub use client::{Item, KeyCondition, Page, PrimaryKey, QueryRequest, ScanRequest, TableClient};
pub use errors::{StoreError, StoreResult};
pub use index::{IndexSpec, SecondaryIndex};
pub use memory::{MemoryStore, TableSchema};

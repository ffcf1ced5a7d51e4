//! Configuration Tests
//!
//! Tests for a backend opened from a config file:
//! - Index suffix and page sizes reach the store requests
//! - Invalid configs never open a backend

use std::io::Write;

use dockv::store::{MemoryStore, TableSchema};
use dockv::{BackendConfig, BackendError, DocBackend, Document, KeyValueBackend};
use tempfile::NamedTempFile;

fn write_config(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

/// A custom index suffix routes filters to the matching index.
#[test]
fn test_custom_suffix_from_file() {
    let file = write_config(
        r#"{ "table": "users", "index_suffix": "_gsi", "scan_page_size": 2, "log_level": "warn" }"#,
    );
    let config = BackendConfig::from_file(file.path()).unwrap();
    assert_eq!(config.index_name("email"), "email_gsi");

    let store = MemoryStore::new();
    store
        .create_table(TableSchema::new("users").with_index_spec(
            dockv::store::IndexSpec::new("email_gsi", "email"),
        ))
        .unwrap();
    let backend = KeyValueBackend::new(store, config).unwrap();

    for (id, email) in [("u1", "a@x.io"), ("u2", "b@x.io"), ("u3", "a@x.io")] {
        backend
            .save(&Document::with_id(id).field("email", email))
            .unwrap();
    }

    let docs = backend
        .get_doc_list(&["app:User:indexes:email:a@x.io"])
        .unwrap();
    let ids: Vec<&str> = docs.iter().filter_map(Document::id).collect();
    assert_eq!(ids, vec!["u1", "u3"]);

    assert_eq!(backend.all::<Document>().unwrap().count(), 3);
    assert_eq!(backend.metrics().snapshot().scan_pages, 2);
}

/// The default suffix is `-index`.
#[test]
fn test_default_suffix_mismatch_is_store_error() {
    let store = MemoryStore::new();
    store
        .create_table(TableSchema::new("users").with_index_spec(
            dockv::store::IndexSpec::new("email_gsi", "email"),
        ))
        .unwrap();
    let backend = KeyValueBackend::new(store, BackendConfig::new("users")).unwrap();

    let err = backend
        .get_doc_list(&["app:User:indexes:email:a@x.io"])
        .unwrap_err();
    assert!(matches!(err, BackendError::Store(_)));
}

/// An invalid config is rejected at open.
#[test]
fn test_invalid_config_never_opens() {
    let file = write_config(r#"{ "table": "users", "query_page_size": 0 }"#);
    assert!(BackendConfig::from_file(file.path()).is_err());

    let config = BackendConfig {
        log_level: "loud".into(),
        ..BackendConfig::new("users")
    };
    let err = KeyValueBackend::new(MemoryStore::new(), config).err().unwrap();
    assert_eq!(err.code(), "DOCKV_CONFIG_INVALID");
}

//! Observable backend events
//!
//! Events are explicit and typed; each maps to one stable log name.

use std::fmt;

/// Observable events in the document backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Backend constructed around a store client
    BackendOpen,
    /// Store client released
    BackendClose,
    /// Configuration loaded
    ConfigLoaded,

    // CRUD
    /// Item written
    ItemSaved,
    /// Item fetched by primary key
    ItemFetched,
    /// Primary-key lookup missed
    ItemMissing,
    /// Item deleted
    ItemDeleted,
    /// Write target table absent
    ResourceMissing,

    // Scan
    /// One scan page read
    ScanPage,
    /// Scan reached the end of the table
    ScanComplete,

    // Query
    /// One filter evaluated against its index
    IndexQuery,
    /// Candidate sets intersected
    QueryResolved,
    /// Filter list rejected before reaching the store
    QueryRejected,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BackendOpen => "BACKEND_OPEN",
            Event::BackendClose => "BACKEND_CLOSE",
            Event::ConfigLoaded => "CONFIG_LOADED",

            Event::ItemSaved => "ITEM_SAVED",
            Event::ItemFetched => "ITEM_FETCHED",
            Event::ItemMissing => "ITEM_MISSING",
            Event::ItemDeleted => "ITEM_DELETED",
            Event::ResourceMissing => "RESOURCE_MISSING",

            Event::ScanPage => "SCAN_PAGE",
            Event::ScanComplete => "SCAN_COMPLETE",

            Event::IndexQuery => "INDEX_QUERY",
            Event::QueryResolved => "QUERY_RESOLVED",
            Event::QueryRejected => "QUERY_REJECTED",
        }
    }

    /// Severity this event is logged at
    pub fn severity(&self) -> super::Severity {
        use super::Severity;
        match self {
            Event::ResourceMissing => Severity::Error,
            Event::QueryRejected | Event::ItemMissing => Severity::Warn,
            Event::BackendOpen | Event::BackendClose | Event::ConfigLoaded => Severity::Info,
            _ => Severity::Trace,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::Severity;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::BackendOpen,
            Event::BackendClose,
            Event::ConfigLoaded,
            Event::ItemSaved,
            Event::ItemFetched,
            Event::ItemMissing,
            Event::ItemDeleted,
            Event::ResourceMissing,
            Event::ScanPage,
            Event::ScanComplete,
            Event::IndexQuery,
            Event::QueryResolved,
            Event::QueryRejected,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_event_severity() {
        assert_eq!(Event::ResourceMissing.severity(), Severity::Error);
        assert_eq!(Event::QueryRejected.severity(), Severity::Warn);
        assert_eq!(Event::ItemSaved.severity(), Severity::Trace);
        assert_eq!(Event::BackendOpen.severity(), Severity::Info);
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::IndexQuery), "INDEX_QUERY");
    }
}

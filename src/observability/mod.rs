//! Observability for the document backend
//!
//! Structured JSON-line logging of typed events, per-backend counters and
//! begin/complete scopes around multi-step operations. Nothing here feeds
//! back into execution.
//!
//! ```ignore
//! use dockv::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::ItemSaved, &[("id", "a1"), ("table", "people")]);
//! ```

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
pub use scope::ObservationScope;

pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log an event at its own severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_line_format() {
        let line = logger::render_line(
            Event::ItemDeleted.severity(),
            Event::ItemDeleted.as_str(),
            &[("id", "a1")],
        );
        assert!(line.starts_with("{\"event\":\"ITEM_DELETED\",\"severity\":\"TRACE\""));
    }

    #[test]
    fn test_log_event_without_fields() {
        log_event(Event::BackendClose);
    }
}

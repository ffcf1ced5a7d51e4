//! Begin/outcome logging around a multi-step operation
//!
//! Creating a scope logs `<NAME>_BEGIN`. Consuming it logs `<NAME>_COMPLETE`
//! or `<NAME>_FAILED`. A scope dropped without either logs
//! `<NAME>_INCOMPLETE`.

use std::time::Instant;

use super::logger::{Logger, Severity};

/// Logs the start and outcome of one operation
///
/// ```ignore
/// let scope = ObservationScope::with_fields("FLUSH", &[("table", "people")]);
/// scope.complete_with_fields(&[("deleted", "12")]);
/// ```
pub struct ObservationScope {
    name: String,
    fields: Vec<(String, String)>,
    started: Instant,
    closed: bool,
}

impl ObservationScope {
    pub fn new(name: &str) -> Self {
        Self::with_fields(name, &[])
    }

    pub fn with_fields(name: &str, fields: &[(&str, &str)]) -> Self {
        let scope = Self {
            name: name.to_string(),
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            started: Instant::now(),
            closed: false,
        };
        scope.emit(Severity::Info, "BEGIN", &[]);
        scope
    }

    /// Close successfully, adding `extra` and `elapsed_ms` to the line
    pub fn complete_with_fields(mut self, extra: &[(&str, &str)]) {
        let elapsed = self.started.elapsed().as_millis().to_string();
        let mut fields = extra.to_vec();
        fields.push(("elapsed_ms", elapsed.as_str()));
        self.emit(Severity::Info, "COMPLETE", &fields);
        self.closed = true;
    }

    /// Close with an error
    pub fn fail(mut self, reason: &str) {
        self.emit(Severity::Error, "FAILED", &[("reason", reason)]);
        self.closed = true;
    }

    fn emit(&self, severity: Severity, phase: &str, extra: &[(&str, &str)]) {
        let event = format!("{}_{}", self.name, phase);
        let mut fields: Vec<(&str, &str)> = self
            .fields
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        fields.extend_from_slice(extra);
        Logger::log(severity, &event, &fields);
    }
}

impl Drop for ObservationScope {
    fn drop(&mut self) {
        if !self.closed {
            self.emit(Severity::Warn, "INCOMPLETE", &[]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_complete() {
        let scope = ObservationScope::with_fields("FLUSH", &[("table", "people")]);
        assert!(!scope.closed);
        scope.complete_with_fields(&[("deleted", "3")]);
    }

    #[test]
    fn test_scope_fail() {
        ObservationScope::new("FLUSH").fail("injected");
    }

    #[test]
    fn test_scope_dropped_open() {
        let scope = ObservationScope::new("FLUSH");
        drop(scope);
    }
}

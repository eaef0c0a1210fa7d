//! Diagnostics sinks for categorized failures
//!
//! Engine handles report every failed operation as a [`DiagnosticEvent`]
//! carrying the operation name, the error kind and the message. Sinks are
//! pure consumers; nothing they do feeds back into the operation.

use crate::error::{Error, ErrorKind, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// One reported failure
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticEvent {
    /// Correlates the event with log lines emitted by the same call
    pub trace_id: Uuid,
    /// Operation that failed, e.g. `"process"`
    pub operation: &'static str,
    pub kind: ErrorKind,
    pub message: String,
}

impl DiagnosticEvent {
    /// Build an event from a failed operation
    pub fn from_error(operation: &'static str, error: &Error) -> Self {
        Self {
            trace_id: Uuid::new_v4(),
            operation,
            kind: error.kind(),
            message: error.message().to_string(),
        }
    }
}

/// Trait for consumers of diagnostic events
pub trait DiagnosticsSink: Send + Sync {
    /// Receive an event
    fn record(&self, event: &DiagnosticEvent);

    /// Get the name of this sink for debugging
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Fan-out to several sinks
#[derive(Clone, Default)]
pub struct DiagnosticsBus {
    sinks: Arc<Mutex<Vec<Arc<dyn DiagnosticsSink>>>>,
}

impl DiagnosticsBus {
    /// Create an empty bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sink
    pub fn register(&self, sink: Arc<dyn DiagnosticsSink>) -> Result<()> {
        let mut sinks = self
            .sinks
            .lock()
            .map_err(|e| Error::RuntimeFailure(format!("Failed to lock sinks: {e}")))?;
        sinks.push(sink);
        Ok(())
    }

    /// Get the number of registered sinks
    pub fn sink_count(&self) -> usize {
        self.sinks.lock().map(|s| s.len()).unwrap_or(0)
    }
}

impl DiagnosticsSink for DiagnosticsBus {
    fn record(&self, event: &DiagnosticEvent) {
        let Ok(sinks) = self.sinks.lock() else {
            log::error!("Failed to lock diagnostics sinks");
            return;
        };
        for sink in sinks.iter() {
            sink.record(event);
        }
    }
}

/// Forwards events to the `log` facade
pub struct LoggingSink {
    level: log::Level,
}

impl LoggingSink {
    /// Create a new logging sink
    pub fn new(level: log::Level) -> Self {
        Self { level }
    }
}

impl Default for LoggingSink {
    fn default() -> Self {
        Self::new(log::Level::Warn)
    }
}

impl DiagnosticsSink for LoggingSink {
    fn record(&self, event: &DiagnosticEvent) {
        log::log!(
            self.level,
            "{} failed [{}]: {} (trace: {})",
            event.operation,
            event.kind,
            event.message,
            event.trace_id
        );
    }
}

/// Keeps every event in memory
#[derive(Default)]
pub struct CollectingSink {
    events: Mutex<Vec<DiagnosticEvent>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all recorded events
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Failure counts per error kind
    pub fn counts_by_kind(&self) -> HashMap<ErrorKind, usize> {
        let mut counts = HashMap::new();
        for event in self.events() {
            *counts.entry(event.kind).or_insert(0) += 1;
        }
        counts
    }
}

impl DiagnosticsSink for CollectingSink {
    fn record(&self, event: &DiagnosticEvent) {
        let Ok(mut events) = self.events.lock() else {
            log::error!("Failed to lock collected events");
            return;
        };
        events.push(event.clone());
    }
}

/// Discards everything
#[derive(Default, Clone)]
pub struct NullSink;

impl DiagnosticsSink for NullSink {
    fn record(&self, _event: &DiagnosticEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_from_error() {
        let event = DiagnosticEvent::from_error("process", &Error::checksum_mismatch());
        assert_eq!(event.operation, "process");
        assert_eq!(event.kind, ErrorKind::RuntimeFailure);
        assert_eq!(event.message, "checksum mismatch");
    }

    #[test]
    fn test_bus_fans_out() {
        let bus = DiagnosticsBus::new();
        let a = Arc::new(CollectingSink::new());
        let b = Arc::new(CollectingSink::new());
        bus.register(a.clone()).unwrap();
        bus.register(b.clone()).unwrap();
        bus.register(Arc::new(LoggingSink::default())).unwrap();
        assert_eq!(bus.sink_count(), 3);

        bus.record(&DiagnosticEvent::from_error(
            "reset",
            &Error::RuntimeFailure("still processing".to_string()),
        ));

        assert_eq!(a.events().len(), 1);
        assert_eq!(b.events()[0].operation, "reset");
    }

    #[test]
    fn test_counts_by_kind() {
        let sink = CollectingSink::new();
        sink.record(&DiagnosticEvent::from_error("a", &Error::busy()));
        sink.record(&DiagnosticEvent::from_error("b", &Error::busy()));
        sink.record(&DiagnosticEvent::from_error(
            "c",
            &Error::InvalidArgument("x".to_string()),
        ));

        let counts = sink.counts_by_kind();
        assert_eq!(counts[&ErrorKind::RuntimeFailure], 2);
        assert_eq!(counts[&ErrorKind::InvalidArgument], 1);
        assert!(!counts.contains_key(&ErrorKind::NotInitialized));
    }

    #[test]
    fn test_null_sink() {
        NullSink.record(&DiagnosticEvent::from_error("x", &Error::busy()));
    }
}

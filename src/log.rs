//! The logger capability handlers write to.
//!
//! The interceptor only ever makes two calls: [`Logger::debug`] with an event
//! name and a structured `extra` payload, and [`Logger::exception`] when an
//! endpoint faults. Where those records go is the implementation's business:
//!
//! - [`TracingLogger`] forwards them to `tracing`; install a subscriber
//!   (JSON or text) in `main`.
//! - [`RecordingLogger`] keeps them in memory so tests can assert on the
//!   exact sequence.
//!
//! [`install_panic_hook`] sends the process panic report to `tracing` as
//! well, so a panicking endpoint leaves no stray stderr line next to its
//! `request failed` record.

use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;

use crate::error::{panic_message, Fault};

/// Structured logger injected into every request [`Context`](crate::Context).
///
/// Shared by all concurrent requests, hence `Send + Sync`.
pub trait Logger: Send + Sync + 'static {
    /// A debug-level event carrying structured context.
    fn debug(&self, event: &str, extra: Value);

    /// An error-level event raised while handling `fault`.
    fn exception(&self, event: &str, fault: &Fault);
}

/// The form loggers are passed around in.
pub type SharedLogger = Arc<dyn Logger>;

// ── TracingLogger ─────────────────────────────────────────────────────────────

/// Emits records as `tracing` events, tagged with the logger's name.
///
/// `debug` records carry the payload in an `extra` field; `exception`
/// records carry the fault message and its traceback.
pub struct TracingLogger {
    name: String,
}

impl TracingLogger {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Logger for TracingLogger {
    fn debug(&self, event: &str, extra: Value) {
        tracing::debug!(logger = %self.name, %extra, "{event}");
    }

    fn exception(&self, event: &str, fault: &Fault) {
        tracing::error!(
            logger = %self.name,
            error = %fault,
            traceback = %fault.traceback(),
            "{event}"
        );
    }
}

/// Replaces the default panic hook, which prints to stderr, with one that
/// emits an `error` event through `tracing`.
///
/// Panics caught by the interceptor still run the hook before unwinding.
/// Call this once, after the subscriber is installed.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let message = panic_message(info.payload()).unwrap_or("Box<dyn Any>");
        match info.location() {
            Some(location) => tracing::error!(%location, "panicked: {message}"),
            None => tracing::error!("panicked: {message}"),
        }
    }));
}

// ── RecordingLogger ───────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Level {
    Debug,
    Exception,
}

/// One call made against a [`RecordingLogger`].
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub level: Level,
    pub event: String,
    /// `None` for exception records.
    pub extra: Option<Value>,
}

/// Keeps every record in memory, in call order.
#[derive(Default)]
pub struct RecordingLogger {
    records: Mutex<Vec<Record>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything logged so far.
    pub fn records(&self) -> Vec<Record> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn clear(&self) {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    fn push(&self, record: Record) {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).push(record);
    }
}

impl Logger for RecordingLogger {
    fn debug(&self, event: &str, extra: Value) {
        self.push(Record { level: Level::Debug, event: event.to_owned(), extra: Some(extra) });
    }

    fn exception(&self, event: &str, _fault: &Fault) {
        self.push(Record { level: Level::Exception, event: event.to_owned(), extra: None });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn recording_logger_keeps_call_order() {
        let logger = RecordingLogger::new();
        logger.debug("request", json!({"a": 1}));
        logger.exception("request failed", &Fault::msg("whoops"));

        assert_eq!(logger.records(), vec![
            Record { level: Level::Debug, event: "request".into(), extra: Some(json!({"a": 1})) },
            Record { level: Level::Exception, event: "request failed".into(), extra: None },
        ]);

        logger.clear();
        assert!(logger.records().is_empty());
    }
}

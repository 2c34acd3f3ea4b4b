//! Logging port handed to each pipeline component
//!
//! Components never log through global state directly. They hold an
//! `Arc<dyn LogSink>` that defaults to [`NullSink`]; the binary installs a
//! [`LogFacadeSink`] which forwards to the `log` crate.

use log::Level;
use std::sync::{Arc, Mutex};

pub trait LogSink: Send + Sync {
    /// Records one message for the given component target
    fn log(&self, target: &str, level: Level, message: &str);
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl LogSink for NullSink {
    fn log(&self, _target: &str, _level: Level, _message: &str) {}
}

/// Forwards to the `log` facade, keeping the component as the log target
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFacadeSink;

impl LogSink for LogFacadeSink {
    fn log(&self, target: &str, level: Level, message: &str) {
        log::log!(target: target, level, "{}", message);
    }
}

/// Keeps every message in memory; used by tests to assert on log output
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<(Level, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Returns true if any message at `level` contains `needle`
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.entries()
            .iter()
            .any(|(l, message)| *l == level && message.contains(needle))
    }
}

impl LogSink for MemorySink {
    fn log(&self, _target: &str, level: Level, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((level, message.to_string()));
        }
    }
}

pub fn null_sink() -> Arc<dyn LogSink> {
    Arc::new(NullSink)
}

/// A sink bound to one component target
#[derive(Clone)]
pub(crate) struct Logger {
    target: &'static str,
    sink: Arc<dyn LogSink>,
}

impl Logger {
    pub(crate) fn new(target: &'static str) -> Self {
        Self {
            target,
            sink: null_sink(),
        }
    }

    pub(crate) fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    pub(crate) fn debug(&self, message: impl AsRef<str>) {
        self.sink.log(self.target, Level::Debug, message.as_ref());
    }

    pub(crate) fn info(&self, message: impl AsRef<str>) {
        self.sink.log(self.target, Level::Info, message.as_ref());
    }

    pub(crate) fn warn(&self, message: impl AsRef<str>) {
        self.sink.log(self.target, Level::Warn, message.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_records_messages() {
        let sink = Arc::new(MemorySink::new());
        let logger = Logger::new("vcd::test").with_sink(sink.clone());

        logger.debug("first");
        logger.warn(format!("second {}", 2));

        let entries = sink.entries();
        assert_eq!(entries.len(), 2);
        assert!(sink.contains(Level::Debug, "first"));
        assert!(sink.contains(Level::Warn, "second 2"));
        assert!(!sink.contains(Level::Info, "first"));
    }

    #[test]
    fn test_default_logger_discards() {
        // Must not panic without a sink installed
        Logger::new("vcd::test").info("ignored");
    }
}

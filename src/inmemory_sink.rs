// SPDX-License-Identifier: MIT OR Apache-2.0

//! # In-Memory Sink
//!
//! This module provides a sink that keeps every record it receives, for tests and for
//! programmatically examining log output.  Records are stored as values rather than text, so
//! assertions can look at data and errors directly instead of parsing JSON.
//!
//! The sink uses a `Mutex<Vec<LogRecord>>` internally, so many threads may log to it at once.

use crate::Level;
use crate::log_record::LogRecord;
use crate::sink::Sink;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A sink that stores log records in memory.
///
/// # Example
///
/// ```rust
/// use lager::{InMemorySink, Level, Logger};
/// use std::sync::Arc;
///
/// let sink = Arc::new(InMemorySink::new());
/// let logger = Logger::new("api");
/// logger.register_sink(sink.clone());
///
/// logger.info("started", &[]);
///
/// let records = sink.drain_records();
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].message(), "api.started");
/// assert_eq!(records[0].level(), Level::Info);
/// ```
#[derive(Debug, Default)]
pub struct InMemorySink {
    records: Mutex<Vec<LogRecord>>,
}

// ============================================================================
// BOILERPLATE TRAIT IMPLEMENTATIONS
// ============================================================================
//
// - Debug: Derived, required by Sink
// - Default: Derived, an empty buffer
// - Clone: NOT implemented - two handles should share records, use Arc
// - PartialEq/Eq/Hash: NOT implemented - comparing mutex state is not meaningful
// - Send/Sync: Automatic through Mutex

impl InMemorySink {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// A copy of every record received so far.
    pub fn records(&self) -> Vec<LogRecord> {
        self.lock().clone()
    }

    /// Takes every record received so far, leaving the sink empty.
    pub fn drain_records(&self) -> Vec<LogRecord> {
        std::mem::take(&mut *self.lock())
    }

    /// The messages of every record received so far, in arrival order.
    pub fn messages(&self) -> Vec<String> {
        self.lock().iter().map(|r| r.message().to_string()).collect()
    }

    /// Records at exactly `level`.
    pub fn logs_at(&self, level: Level) -> Vec<LogRecord> {
        self.lock()
            .iter()
            .filter(|r| r.level() == level)
            .cloned()
            .collect()
    }
}

impl Sink for InMemorySink {
    fn log(&self, record: &LogRecord) {
        self.lock().push(record.clone());
    }
}

// SPDX-License-Identifier: MIT OR Apache-2.0

//! A [Sink] that writes JSON lines to any [std::io::Write].
//!
//! Records below the sink's level return before anything is allocated.  Records that pass
//! are encoded into a pooled buffer outside of any lock; only the final `write_all` to the
//! destination is serialised by a mutex, so concurrent callers never tear each other's lines.
//!
//! # Failures
//!
//! If a record's data holds something the encoder cannot represent (an opaque value or a
//! non-finite float), the data is replaced by a dump of the original under `data_dump` and
//! the encoder's complaint under [SERIALISATION_ERROR_KEY], and the record is encoded once
//! more.  Every other failure, including a failing retry or a failing destination, panics:
//! a log that silently loses what it was asked to record is worse than no log.
//!
//! The sink never flushes or closes the destination; whoever supplied it owns it.

use crate::Level;
use crate::buffer_pool::BufferPool;
use crate::data::{Data, Value};
use crate::log_record::LogRecord;
use crate::sink::{Sink, SinkLevel};
use std::io::Write;
use std::sync::{Mutex, PoisonError};

/// Key under which the fallback record explains what could not be encoded.
pub const SERIALISATION_ERROR_KEY: &str = "lager serialisation error";
/// Key under which the fallback record carries a printable dump of the original data.
pub const DATA_DUMP_KEY: &str = "data_dump";

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("lager serialisation error: {0}")]
    Serialisation(#[from] serde_json::Error),
    #[error("failed to write log record: {0}")]
    Write(#[from] std::io::Error),
}

impl SinkError {
    /// Whether the failure came from data the encoder cannot introspect.
    ///
    /// Only this class is worth a retry with substituted data.
    pub fn is_unsupported_data(&self) -> bool {
        matches!(self, SinkError::Serialisation(e) if e.is_data())
    }
}

pub struct WriterSink<W> {
    writer: Mutex<W>,
    min_level: Level,
    pool: BufferPool,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W, min_level: Level) -> Self {
        WriterSink {
            writer: Mutex::new(writer),
            min_level,
            pool: BufferPool::new(),
        }
    }

    /// Returns the destination, for example to inspect an in-memory buffer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Encodes one record and appends it, with its newline, to the destination.
    fn encode(&self, record: &LogRecord) -> Result<(), SinkError> {
        let mut buf = self.pool.checkout();
        serde_json::to_writer(&mut *buf, record)?;
        buf.push(b'\n');
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.write_all(&buf)?;
        Ok(())
    }

    fn handle_err(&self, record: &LogRecord, err: SinkError) {
        if !err.is_unsupported_data() {
            panic!("{err}");
        }
        let fallback = record.with_data(Some(fallback_data(record.data(), &err)));
        //one retry only
        if let Err(retry) = self.encode(&fallback) {
            panic!("{retry}");
        }
    }
}

impl WriterSink<std::io::Stdout> {
    pub fn stdout(min_level: Level) -> Self {
        Self::new(std::io::stdout(), min_level)
    }
}

impl WriterSink<std::io::Stderr> {
    pub fn stderr(min_level: Level) -> Self {
        Self::new(std::io::stderr(), min_level)
    }
}

fn fallback_data(original: Option<&Data>, err: &SinkError) -> Data {
    let message = match err {
        SinkError::Serialisation(encoder) => encoder.to_string(),
        other => other.to_string(),
    };
    let dump = match original {
        Some(data) => format!("{data:?}"),
        None => "None".to_string(),
    };
    let mut data = Data::new();
    data.insert(
        SERIALISATION_ERROR_KEY.to_string(),
        Value::String(message),
    );
    data.insert(DATA_DUMP_KEY.to_string(), Value::String(dump));
    data
}

impl<W: Write + Send> Sink for WriterSink<W> {
    #[inline]
    fn log(&self, record: &LogRecord) {
        if record.level() < self.min_level {
            return;
        }
        if let Err(err) = self.encode(record) {
            self.handle_err(record, err);
        }
    }
}

impl<W: Write + Send> SinkLevel for WriterSink<W> {
    fn level(&self) -> Level {
        self.min_level
    }
}

impl<W> std::fmt::Debug for WriterSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriterSink")
            .field("min_level", &self.min_level)
            .field("idle_buffers", &self.pool.idle_buffers())
            .finish_non_exhaustive()
    }
}

/*
Boilerplate notes.

Debug: implemented by hand, the destination need not be Debug.
Clone: no, two sinks sharing a destination would have two locks.  Share the sink through Arc.
Default: there is no sensible default destination; stdout()/stderr() are explicit.
PartialEq/Hash: not meaningful for a destination.
Send/Sync: automatic when W: Send, the mutex provides Sync.
*/

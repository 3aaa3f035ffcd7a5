// SPDX-License-Identifier: MIT OR Apache-2.0

//! Log record type for the lager logging system.
//!
//! A [`LogRecord`] is the immutable value a [`Logger`](crate::Logger) builds for every emitted
//! event and hands, by reference, to each registered [`Sink`](crate::Sink).  Serialised, it is
//! one JSON object:
//!
//! ```text
//! {"timestamp":"1700000000.123456789","source":"api","message":"api.boot.start","log_level":1,"data":{...},"error":"..."}
//! ```
//!
//! `data` and `error` are omitted when absent.

use crate::Level;
use crate::data::Data;
use serde::{Serialize, Serializer};
use std::error::Error;
use std::fmt::{Debug, Display};
use std::sync::Arc;

/**
An error attached to an Error or Fatal record.

This is a cheaply clonable handle to any `std::error::Error`.  Anything implementing
`Error + Send + Sync + 'static` converts into it with `into()`.
*/
#[derive(Clone)]
pub struct ErrorValue(Arc<dyn Error + Send + Sync>);

impl ErrorValue {
    pub fn new<E: Error + Send + Sync + 'static>(err: E) -> Self {
        ErrorValue(Arc::new(err))
    }

    pub fn get(&self) -> &(dyn Error + Send + Sync + 'static) {
        &*self.0
    }

    /// Returns the wrapped error if it is of type `E`.
    pub fn downcast_ref<E: Error + 'static>(&self) -> Option<&E> {
        self.0.downcast_ref::<E>()
    }
}

impl<E: Error + Send + Sync + 'static> From<E> for ErrorValue {
    fn from(err: E) -> Self {
        ErrorValue::new(err)
    }
}

impl Debug for ErrorValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&*self.0, f)
    }
}

impl Display for ErrorValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&*self.0, f)
    }
}

impl Serialize for ErrorValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

/**
A log record.

Records are built once per emit call and never modified afterwards; sinks that need a
different shape (for example the fallback written after a serialisation failure) build
their own copy.
*/
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    pub(crate) timestamp: String,
    pub(crate) source: String,
    pub(crate) message: String,
    #[serde(rename = "log_level")]
    pub(crate) level: Level,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) data: Option<Data>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) error: Option<ErrorValue>,
}

impl LogRecord {
    /// Creates a record stamped with the current time.
    pub fn new(
        source: impl Into<String>,
        message: impl Into<String>,
        level: Level,
        data: Option<Data>,
        error: Option<ErrorValue>,
    ) -> Self {
        Self {
            timestamp: current_timestamp(),
            source: source.into(),
            message: message.into(),
            level,
            data,
            error,
        }
    }

    /// Seconds since the unix epoch, fixed 9-decimal precision.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }
    pub fn source(&self) -> &str {
        &self.source
    }
    pub fn message(&self) -> &str {
        &self.message
    }
    pub fn level(&self) -> Level {
        self.level
    }
    pub fn data(&self) -> Option<&Data> {
        self.data.as_ref()
    }
    pub fn error(&self) -> Option<&ErrorValue> {
        self.error.as_ref()
    }

    /// A copy of this record carrying different context data.
    pub(crate) fn with_data(&self, data: Option<Data>) -> Self {
        Self {
            data,
            ..self.clone()
        }
    }
}

/// Formats the current wall-clock time as `<secs>.<9 digit nanos>`.
///
/// Integer arithmetic keeps full nanosecond resolution; a float would lose it.
pub(crate) fn current_timestamp() -> String {
    let since_epoch = crate::sys::SystemTime::now()
        .duration_since(crate::sys::UNIX_EPOCH)
        .unwrap_or_default();
    format_timestamp(since_epoch)
}

pub(crate) fn format_timestamp(since_epoch: crate::sys::Duration) -> String {
    format!(
        "{}.{:09}",
        since_epoch.as_secs(),
        since_epoch.subsec_nanos()
    )
}

/*
Boilerplate notes for LogRecord:

IMPLEMENTED:
- Debug/Clone: Derived - records are forwarded to several sinks
- Serialize: Derived - the JSON-lines wire format

NOT IMPLEMENTED:
- PartialEq/Eq/Hash: the attached error has no equality, and Value::F64 has no Eq
- Default: a record without a source or message is meaningless
- Display: sinks choose the text form
*/

// SPDX-License-Identifier: MIT OR Apache-2.0

//! The logger façade.
//!
//! A [Logger] is an immutable value: a component name, a task lineage, an optional session
//! id and some context data.  [Logger::session] and [Logger::with_data] derive new loggers
//! and never touch the one they are called on.  All loggers derived from one root share that
//! root's sink list, so a sink registered on any of them is seen by every one of them,
//! including loggers derived before the registration.
//!
//! # Data precedence
//!
//! For each emitted record, data is merged from lowest to highest precedence:
//!
//! 1. data accumulated through `session`/`with_data`
//! 2. data passed to the emit call, in order
//! 3. injected keys: `session`, `error`, `trace`
//!
//! A record with no keys at all carries no data, and the `data` field is omitted on the wire.

use crate::Level;
use crate::data::{self, Data, Value};
use crate::fatal::{self, Fatal};
use crate::log_record::{ErrorValue, LogRecord};
use crate::sink::Sink;
use crate::spinlock::Spinlock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Injected key holding the logger's session id.
pub const SESSION_KEY: &str = "session";
/// Injected key holding the message of the error passed to `error`/`fatal`.
pub const ERROR_KEY: &str = "error";
/// Injected key holding the stack trace captured by `fatal`.
pub const TRACE_KEY: &str = "trace";

//copy-on-write: emitters clone the inner Arc and dispatch without holding the lock
type SinkList = Arc<Spinlock<Arc<[Arc<dyn Sink>]>>>;

#[derive(Debug)]
struct LoggerInner {
    component: String,
    task: String,
    sinks: SinkList,
    session_id: Option<String>,
    next_session: AtomicU32,
    data: Data,
}

/**
A structured, leveled logger.

Clones are cheap and share everything, including the counter that numbers child sessions.

```rust
use lager::{data, Level, Logger, WriterSink};
use std::sync::Arc;

let logger = Logger::new("api");
logger.register_sink(Arc::new(WriterSink::stdout(Level::Info)));

let request = logger
    .session("request", &[data! { "path" => "/pkg" }])
    .with_data(data! { "user" => 42 });
request.info("start", &[]);
request.debug("headers", &[data! { "count" => 3 }]);
```
*/
#[derive(Debug, Clone)]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

impl Logger {
    /// Creates a root logger for `component`, with no sinks.
    pub fn new(component: impl Into<String>) -> Self {
        let component = component.into();
        Logger {
            inner: Arc::new(LoggerInner {
                task: component.clone(),
                component,
                sinks: Arc::new(Spinlock::new(Arc::from(Vec::new()))),
                session_id: None,
                next_session: AtomicU32::new(0),
                data: Data::new(),
            }),
        }
    }

    /**
    Appends a sink to the list shared by this logger and every logger derived from the same root.

    Registration is meant for setup, before the loggers are in use.  An emit already in
    progress keeps dispatching to the list it started with.
    */
    pub fn register_sink(&self, sink: Arc<dyn Sink>) {
        let mut sinks = self.inner.sinks.write();
        let mut grown = Vec::with_capacity(sinks.len() + 1);
        grown.extend(sinks.iter().cloned());
        grown.push(sink);
        *sinks = Arc::from(grown);
    }

    pub fn component(&self) -> &str {
        &self.inner.component
    }

    /// The task lineage: the component followed by each session name, dot-joined.
    pub fn session_name(&self) -> &str {
        &self.inner.task
    }

    pub fn session_id(&self) -> Option<&str> {
        self.inner.session_id.as_deref()
    }

    /// The data accumulated through `session` and `with_data`, without injected keys.
    pub fn data(&self) -> &Data {
        &self.inner.data
    }

    /**
    Derives a child logger for a nested unit of work.

    The child's task lineage is `<parent lineage>.<task>` and its session id is
    `<parent session id>.<n>`, or just `<n>` under a logger without one, where `n` counts the
    sessions derived from this logger (starting at 1, wrapping on `u32` overflow).  Concurrent
    calls get distinct ids.  `data` is merged over this logger's data; later maps win.
    */
    pub fn session(&self, task: &str, data: &[Data]) -> Logger {
        let n = self
            .inner
            .next_session
            .fetch_add(1, Ordering::Relaxed)
            .wrapping_add(1);
        let session_id = match &self.inner.session_id {
            Some(parent) => format!("{parent}.{n}"),
            None => n.to_string(),
        };
        Logger {
            inner: Arc::new(LoggerInner {
                component: self.inner.component.clone(),
                task: format!("{}.{}", self.inner.task, task),
                sinks: self.inner.sinks.clone(),
                session_id: Some(session_id),
                next_session: AtomicU32::new(0),
                data: self.merged(data),
            }),
        }
    }

    /// Derives a logger with the same lineage and session, and `data` merged over this one's.
    pub fn with_data(&self, data: Data) -> Logger {
        Logger {
            inner: Arc::new(LoggerInner {
                component: self.inner.component.clone(),
                task: self.inner.task.clone(),
                sinks: self.inner.sinks.clone(),
                session_id: self.inner.session_id.clone(),
                next_session: AtomicU32::new(0),
                data: self.merged(std::slice::from_ref(&data)),
            }),
        }
    }

    fn merged(&self, data: &[Data]) -> Data {
        data::merge(std::iter::once(&self.inner.data).chain(data)).unwrap_or_default()
    }

    pub fn debug(&self, action: &str, data: &[Data]) {
        self.emit(Level::Debug, action, data, None, None);
    }

    pub fn info(&self, action: &str, data: &[Data]) {
        self.emit(Level::Info, action, data, None, None);
    }

    /// Logs at [Level::Error].  When `err` is given, its message is injected under `error`
    /// and the error itself travels with the record.
    pub fn error(&self, action: &str, err: Option<ErrorValue>, data: &[Data]) {
        self.emit(Level::Error, action, data, err, None);
    }

    /**
    Logs at [Level::Fatal] with a stack trace under `trace`, then terminates the calling
    path by panicking with a [Fatal] payload.

    The panic happens even if `err` is `None` and even if no sink is registered.
    */
    pub fn fatal(&self, action: &str, err: Option<ErrorValue>, data: &[Data]) -> ! {
        let trace = fatal::stack_trace();
        self.emit(Level::Fatal, action, data, err.clone(), Some(trace));
        std::panic::panic_any(Fatal {
            message: self.message(action),
            error: err,
        })
    }

    fn message(&self, action: &str) -> String {
        format!("{}.{}", self.inner.task, action)
    }

    fn emit(
        &self,
        level: Level,
        action: &str,
        call_data: &[Data],
        error: Option<ErrorValue>,
        trace: Option<String>,
    ) {
        let sinks = Arc::clone(&*self.inner.sinks.read());
        if sinks.is_empty() {
            return;
        }

        let mut data = data::merge(std::iter::once(&self.inner.data).chain(call_data));
        if let Some(session_id) = &self.inner.session_id {
            inject(&mut data, SESSION_KEY, Value::String(session_id.clone()));
        }
        if let Some(err) = &error {
            inject(&mut data, ERROR_KEY, Value::String(err.to_string()));
        }
        if let Some(trace) = trace {
            inject(&mut data, TRACE_KEY, Value::String(trace));
        }

        let record = LogRecord::new(
            self.inner.component.as_str(),
            self.message(action),
            level,
            data,
            error,
        );
        for sink in sinks.iter() {
            sink.log(&record);
        }
    }
}

fn inject(data: &mut Option<Data>, key: &str, value: Value) {
    data.get_or_insert_with(Data::new)
        .insert(key.to_string(), value);
}

/*
Boilerplate notes.

Clone: shares the inner Arc.  A clone is the same logger, including its session counter,
so sessions derived from either never collide.
PartialEq/Eq/Hash: data equality or provenance?  Unclear, not implemented.
Default: a logger needs a component name.
Display: not meaningful; session_name() is the closest thing.
Send/Sync: automatic, sinks are Send + Sync.
*/

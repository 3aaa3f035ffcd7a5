// SPDX-License-Identifier: MIT OR Apache-2.0

//! The termination signal raised by [Logger::fatal](crate::Logger::fatal).
//!
//! `fatal` dispatches its record and then panics with a [Fatal] payload via
//! [std::panic::panic_any].  Nothing after the call runs.  Code that supervises threads
//! (`JoinHandle::join`, `catch_unwind`) can downcast the payload to tell a deliberate fatal
//! log apart from an ordinary panic, but must not resume the failed work.
//!
//! ```rust
//! use lager::{Fatal, Logger};
//!
//! let logger = Logger::new("worker");
//! let outcome = std::thread::spawn(move || -> () { logger.fatal("boom", None, &[]) }).join();
//! let payload = outcome.unwrap_err();
//! let fatal = payload.downcast_ref::<Fatal>().unwrap();
//! assert_eq!(fatal.message, "worker.boom");
//! ```

use crate::log_record::ErrorValue;

/// Size cap for the stack trace injected into fatal records.  Longer traces are truncated.
pub const STACK_TRACE_BUFFER_SIZE: usize = 1024 * 100;

#[derive(Debug, Clone, thiserror::Error)]
#[error("fatal: {message}{}", error_suffix(.error))]
pub struct Fatal {
    /// The record's message, `<task lineage>.<action>`.
    pub message: String,
    /// The error passed to `fatal`, if any.
    pub error: Option<ErrorValue>,
}

fn error_suffix(error: &Option<ErrorValue>) -> String {
    match error {
        Some(e) => format!(": {e}"),
        None => String::new(),
    }
}

/// Captures the current stack, bounded by [STACK_TRACE_BUFFER_SIZE].
pub(crate) fn stack_trace() -> String {
    let mut trace = std::backtrace::Backtrace::force_capture().to_string();
    truncate_on_char_boundary(&mut trace, STACK_TRACE_BUFFER_SIZE);
    if trace.is_empty() {
        trace.push_str("<stack trace unavailable>");
    }
    trace
}

fn truncate_on_char_boundary(s: &mut String, max: usize) {
    if s.len() <= max {
        return;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s.truncate(end);
}

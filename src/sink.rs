// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::Level;
use crate::log_record::LogRecord;
use std::fmt::Debug;

/// A write destination for a [Logger](crate::Logger).
///
/// Implementations must be safe to call from many threads at once.
pub trait Sink: Debug + Send + Sync {
    /**
        Submits the record to the sink.

        Best effort: there is nothing to return.  A sink deals with its own failures, by
        recovering or, when it cannot represent the record truthfully, by panicking.
    */
    fn log(&self, record: &LogRecord);
}

/// A [Sink] that can report its minimum level.
///
/// Useful to tooling that composes several sinks and wants to know what each one admits.
pub trait SinkLevel: Sink {
    fn level(&self) -> Level;
}

/*
Boilerplate notes.

# Sink

Clone on Sink is not sensible: sinks usually own a destination, so they are shared through Arc instead.
PartialEq/Eq/Hash: unclear whether we would mean the destination or the configuration; not implemented.
Default: who knows what the destination is.
Send/Sync are supertraits since a logger's sinks are reached from every thread that logs.
*/

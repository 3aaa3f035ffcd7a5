//SPDX-License-Identifier: MIT OR Apache-2.0
/*!
# lager

lager is a structured, leveled logging library.

# The model

A [Logger] emits *actions* at one of four [Level]s: `debug`, `info`, `error` and `fatal`.
Each emit builds one [LogRecord] and hands it, synchronously and in registration order, to
every [Sink] registered on the logger.  The bundled [WriterSink] encodes records as JSON
lines onto any `std::io::Write`:

```text
{"timestamp":"1700000000.123456789","source":"api","message":"api.request.start","log_level":1,"data":{"session":"1"}}
```

# Sessions

Work nests.  [Logger::session] derives a child logger whose messages are prefixed by the
parent's lineage and whose records carry a generated, dot-joined session id, so everything
logged on behalf of one request can be correlated.  [Logger::with_data] binds extra context
without starting a session.  Derivation never changes the parent; the sink list is the one
thing all loggers of a family share.

```rust
use lager::{data, InMemorySink, Logger};
use std::sync::Arc;

let sink = Arc::new(InMemorySink::new());
let logger = Logger::new("api");
logger.register_sink(sink.clone());

let request = logger.session("request", &[data! { "path" => "/pkg" }]);
request.info("start", &[]);

let record = &sink.records()[0];
assert_eq!(record.message(), "api.request.start");
assert_eq!(record.data().unwrap()["session"], lager::Value::from("1"));
```

# Failure

Logging calls return nothing.  A sink that cannot write what it was given either recovers
(the [WriterSink] substitutes a dump for data it cannot encode) or panics.  [Logger::fatal]
panics on purpose, with a [Fatal] payload, after logging.

# Multithreading

Loggers and sinks are `Send + Sync`.  Session ids stay unique under concurrent derivation,
and the [WriterSink] keeps lines whole under concurrent writers.  Register sinks during setup;
a sink registered while another thread is logging may or may not see that thread's record.
*/

mod buffer_pool;
mod config;
pub mod data;
mod fatal;
mod inmemory_sink;
mod level;
mod log_record;
mod logger;
mod reconfigurable_sink;
mod sink;
mod spinlock;
mod sys;
mod writer_sink;

pub use buffer_pool::{BufferPool, PooledBuffer};
pub use config::{LOG_LEVEL_ENV, LagerConfig};
pub use data::{Data, Value};
pub use fatal::{Fatal, STACK_TRACE_BUFFER_SIZE};
pub use inmemory_sink::InMemorySink;
pub use level::{Level, ParseLevelError};
pub use log_record::{ErrorValue, LogRecord};
pub use logger::{ERROR_KEY, Logger, SESSION_KEY, TRACE_KEY};
pub use reconfigurable_sink::ReconfigurableSink;
pub use sink::{Sink, SinkLevel};
pub use writer_sink::{DATA_DUMP_KEY, SERIALISATION_ERROR_KEY, SinkError, WriterSink};

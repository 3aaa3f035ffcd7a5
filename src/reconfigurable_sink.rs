// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::Level;
use crate::log_record::LogRecord;
use crate::sink::{Sink, SinkLevel};
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

/**
A [Sink] whose minimum level can be changed while the program runs.

Wrap a sink that admits everything (for example a [WriterSink](crate::WriterSink) at
[Level::Debug]) and raise or lower the threshold here, e.g. from an admin endpoint.

```rust
use lager::{Level, ReconfigurableSink, SinkLevel, WriterSink};
use std::sync::Arc;

let sink = ReconfigurableSink::new(Arc::new(WriterSink::stdout(Level::Debug)), Level::Info);
sink.set_min_level(Level::Debug);
assert_eq!(sink.level(), Level::Debug);
```
*/
#[derive(Debug)]
pub struct ReconfigurableSink {
    inner: Arc<dyn Sink>,
    min_level: AtomicU8,
}

impl ReconfigurableSink {
    pub fn new(inner: Arc<dyn Sink>, min_level: Level) -> Self {
        ReconfigurableSink {
            inner,
            min_level: AtomicU8::new(min_level.as_u8()),
        }
    }

    pub fn set_min_level(&self, level: Level) {
        self.min_level.store(level.as_u8(), Ordering::Relaxed);
    }

    pub fn min_level(&self) -> Level {
        //only ever stores values produced by Level::as_u8
        Level::from_u8(self.min_level.load(Ordering::Relaxed)).unwrap_or(Level::Debug)
    }
}

impl Sink for ReconfigurableSink {
    #[inline]
    fn log(&self, record: &LogRecord) {
        if record.level() < self.min_level() {
            return;
        }
        self.inner.log(record);
    }
}

impl SinkLevel for ReconfigurableSink {
    fn level(&self) -> Level {
        self.min_level()
    }
}

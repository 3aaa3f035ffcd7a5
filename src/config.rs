// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-level configuration.
//!
//! Most programs want one thing: a root logger writing JSON lines to stdout at a level chosen
//! by configuration, adjustable later.  [LagerConfig] holds that choice and
//! [Logger::from_config] builds it.
//!
//! ```rust
//! use lager::{LagerConfig, Level, Logger};
//!
//! let config: LagerConfig = serde_json::from_str(r#"{"log_level":"debug"}"#).unwrap();
//! let (logger, sink) = Logger::from_config("api", &config);
//! logger.debug("configured", &[]);
//! sink.set_min_level(Level::Error);
//! ```

use crate::Level;
use crate::logger::Logger;
use crate::reconfigurable_sink::ReconfigurableSink;
use crate::writer_sink::WriterSink;
use serde::Deserialize;
use std::sync::Arc;

/// Environment variable read by [LagerConfig::from_env].
pub const LOG_LEVEL_ENV: &str = "LAGER_LOG_LEVEL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct LagerConfig {
    /// Minimum level written; `info` unless configured.
    pub log_level: Level,
}

impl LagerConfig {
    /// Reads [LOG_LEVEL_ENV].  Unset means the default.
    pub fn from_env() -> Result<Self, crate::level::ParseLevelError> {
        Self::from_level_var(std::env::var(LOG_LEVEL_ENV).ok().as_deref())
    }

    fn from_level_var(value: Option<&str>) -> Result<Self, crate::level::ParseLevelError> {
        match value {
            None => Ok(Self::default()),
            Some(name) => Ok(LagerConfig {
                log_level: name.parse()?,
            }),
        }
    }
}

impl Logger {
    /// A root logger for `component` writing to stdout at the configured level.
    ///
    /// The returned sink is already registered; keep it to change the level at runtime.
    pub fn from_config(component: &str, config: &LagerConfig) -> (Logger, Arc<ReconfigurableSink>) {
        let sink = Arc::new(ReconfigurableSink::new(
            Arc::new(WriterSink::stdout(Level::Debug)),
            config.log_level,
        ));
        let logger = Logger::new(component);
        logger.register_sink(sink.clone());
        (logger, sink)
    }
}

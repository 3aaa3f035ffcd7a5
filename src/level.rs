// SPDX-License-Identifier: MIT OR Apache-2.0

//! Severity levels.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::Display;
use std::str::FromStr;

/// Ordered severity of a log record.
///
/// Sinks admit any record whose level is greater than or equal to their threshold.
/// On the wire a level is its ordinal: Debug=0, Info=1, Error=2, Fatal=3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum Level {
    /// Detailed diagnostics, usually filtered out in production
    Debug = 0,
    /// Normal operation
    #[default]
    Info = 1,
    /// A failure the program can continue past
    Error = 2,
    /// A failure after which the calling path terminates
    Fatal = 3,
}

impl Level {
    pub const ALL: [Level; 4] = [Level::Debug, Level::Info, Level::Error, Level::Fatal];

    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Inverse of [Level::as_u8].
    pub const fn from_u8(value: u8) -> Option<Level> {
        match value {
            0 => Some(Level::Debug),
            1 => Some(Level::Info),
            2 => Some(Level::Error),
            3 => Some(Level::Fatal),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Error => "error",
            Level::Fatal => "fatal",
        }
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level `{0}`, expected one of debug, info, error, fatal")]
pub struct ParseLevelError(pub String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Level::ALL
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseLevelError(s.to_string()))
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

//configuration files name levels; the wire format numbers them
impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/*
Boilerplate notes.

Copy/Clone/Eq/Ord/Hash: derived, levels are plain ordinals and ordering is the whole point.
Default: Info, the level a freshly configured sink uses.
Display/FromStr: the lowercase names used by configuration.
Serialize is numeric while Deserialize is by name; records are written and config is read.
*/

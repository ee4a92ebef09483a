//! Severity levels and their textual encodings

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Log severity, ordered from least to most verbose.
///
/// `Off` is a filter-only sentinel: a channel filtered to `Off` emits
/// nothing, and logging *at* `Off` is an error. Every other level is valid
/// both to filter with and to log at. A channel configured to level `L`
/// emits everything at `L` or terser.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Emit nothing (not a valid level to log at)
    Off,
    /// Unrecoverable failure
    Fatal,
    /// Recoverable failure
    Error,
    /// Something looks wrong but execution continues
    Warning,
    /// High-level flow of the application
    Info,
    /// Function entry/exit and other fine-grained flow
    Trace,
    /// Developer detail
    Debug,
    /// Extra developer detail
    Debug1,
    /// Extra developer detail
    Debug2,
    /// Extra developer detail
    Debug3,
    /// Extra developer detail
    Debug4,
}

impl Level {
    /// All levels in filter order, `Off` first.
    pub const ALL: [Level; 11] = [
        Level::Off,
        Level::Fatal,
        Level::Error,
        Level::Warning,
        Level::Info,
        Level::Trace,
        Level::Debug,
        Level::Debug1,
        Level::Debug2,
        Level::Debug3,
        Level::Debug4,
    ];

    /// Fixed-width four-character code used in plain-text headers.
    pub fn code(self) -> &'static str {
        match self {
            Level::Off => "OFF ",
            Level::Fatal => "FATL",
            Level::Error => "ERRR",
            Level::Warning => "WARN",
            Level::Info => "INFO",
            Level::Trace => "TRCE",
            Level::Debug => "DBUG",
            Level::Debug1 => "DBG1",
            Level::Debug2 => "DBG2",
            Level::Debug3 => "DBG3",
            Level::Debug4 => "DBG4",
        }
    }

    /// Lowercase full-length name, as used in filter specs and JSON output.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Off => "off",
            Level::Fatal => "fatal",
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Info => "info",
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Debug1 => "debug1",
            Level::Debug2 => "debug2",
            Level::Debug3 => "debug3",
            Level::Debug4 => "debug4",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = crate::error::Error;

    /// Parse a level name. Matching is exact and case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" => Ok(Level::Off),
            "fatal" => Ok(Level::Fatal),
            "error" => Ok(Level::Error),
            "warning" => Ok(Level::Warning),
            "info" => Ok(Level::Info),
            "trace" => Ok(Level::Trace),
            "debug" => Ok(Level::Debug),
            "debug1" => Ok(Level::Debug1),
            "debug2" => Ok(Level::Debug2),
            "debug3" => Ok(Level::Debug3),
            "debug4" => Ok(Level::Debug4),
            _ => Err(crate::error::Error::InvalidLevel(s.to_string())),
        }
    }
}

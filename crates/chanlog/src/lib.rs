//! Channel/level structured logging with serialized sinks
//!
//! This crate provides a thread-safe logging core built around a registry
//! that multiplexes formatted entries to shared output streams:
//! - Free-text channels filtered per-channel or against a default level
//! - Plain-text and single-line JSON formatters
//! - Multiple shared sinks with per-sink write locking
//! - Per-thread indentation and metadata with RAII scope guards
//! - Start/End scope bracketing and scoped timers
//!
//! Most call sites go through the process-wide registry:
//!
//! ```
//! use chanlog::{registry, Level};
//!
//! registry().setup_filters("MAIN:debug", "info").unwrap();
//! registry().add_sink(chanlog::stderr_sink());
//! chanlog::log("MAIN", Level::Debug, "starting up").unwrap();
//! # registry().reset();
//! ```

#![warn(missing_docs, unreachable_pub)]
#![forbid(unsafe_code)]

pub mod compat;
mod entry;
mod error;
mod format;
mod level;
mod registry;
mod scope;
mod sink;
pub mod test_support;

pub use entry::{Entry, MapData};
pub use error::{Error, Result};
pub use format::{
    JsonFormatter, LogFormatter, PlainTextFormatter, CHANNEL_DISPLAY_WIDTH, INDENT_UNIT,
};
pub use level::Level;
pub use registry::{registry, FilterMap, LogRegistry};
pub use scope::{LogScope, ScopedIndent, ScopedMetadata, ScopedTimer, SharedMapData};
pub use sink::{file_sink, stderr_sink, stdout_sink, writer_sink, SharedSink};

/// Log `message` on the process-wide registry if `channel`/`level` is
/// enabled.
pub fn log(channel: &str, level: Level, message: &str) -> Result<()> {
    if registry().should_log(channel, level)? {
        registry().log(channel, level, message, MapData::new());
    }
    Ok(())
}

/// Log a structured map with no message text.
pub fn log_map(channel: &str, level: Level, map_data: MapData) -> Result<()> {
    if registry().should_log(channel, level)? {
        registry().log(channel, level, "", map_data);
    }
    Ok(())
}

/// Log lazily: `build` runs only if the filter check passes, so disabled
/// calls never pay for message construction.
pub fn log_with<F>(channel: &str, level: Level, build: F) -> Result<()>
where
    F: FnOnce() -> String,
{
    if registry().should_log(channel, level)? {
        registry().log(channel, level, &build(), MapData::new());
    }
    Ok(())
}

//! Bridge from the `log` crate into a registry channel

use crate::entry::MapData;
use crate::registry::LogRegistry;
use crate::Level;
use log::{Log, Metadata, Record};

/// Implements the log crate's `Log` trait, forwarding every record to a
/// registry on a fixed channel.
pub struct LogBridge {
    registry: &'static LogRegistry,
    channel: String,
}

impl LogBridge {
    /// Create a bridge forwarding to `registry` on `channel`.
    pub fn new(registry: &'static LogRegistry, channel: impl Into<String>) -> Self {
        Self {
            registry,
            channel: channel.into(),
        }
    }
}

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.registry
            .should_log(&self.channel, map_level(metadata.level()))
            .unwrap_or(false)
    }

    fn log(&self, record: &Record) {
        let level = map_level(record.level());
        if self
            .registry
            .should_log(&self.channel, level)
            .unwrap_or(false)
        {
            self.registry.log(
                &self.channel,
                level,
                &record.args().to_string(),
                MapData::new(),
            );
        }
    }

    fn flush(&self) {}
}

/// Map log crate levels onto ours.
fn map_level(level: log::Level) -> Level {
    match level {
        log::Level::Error => Level::Error,
        log::Level::Warn => Level::Warning,
        log::Level::Info => Level::Info,
        log::Level::Debug => Level::Debug,
        log::Level::Trace => Level::Trace,
    }
}

/// Install a bridge on the process-wide registry, capturing all output from
/// crates using the `log` macros onto `channel`.
///
/// Filtering stays with the registry, so the max level handed to the log
/// crate is permissive.
pub fn init_log_bridge(channel: impl Into<String>) -> Result<(), log::SetLoggerError> {
    // log::set_logger requires 'static
    let bridge = Box::leak(Box::new(LogBridge::new(crate::registry(), channel)));
    log::set_logger(bridge)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

//! RAII scope guards: Start/End blocks, timers, indentation, metadata
//!
//! Each guard pairs a setup action at construction with a teardown action
//! that runs exactly once when the guard is dropped, however the enclosing
//! scope exits. Construction never fails: a guard handed [`Level::Off`]
//! treats its scope as disabled rather than raising the log-at-off error,
//! which belongs to plain log calls.

use crate::entry::MapData;
use crate::registry::LogRegistry;
use crate::Level;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A structured map shared between a call site and a scope guard.
///
/// The guard reads the map's current contents at emission time, so
/// mutations made through the caller's clone between scope entry and exit
/// show up in the exit-time line.
pub type SharedMapData = Arc<Mutex<MapData>>;

/// Brackets a lexical scope with `Start:` and `End:` log lines.
///
/// The filter is checked independently at entry and at exit, so either line
/// may be suppressed on its own if the configuration changes mid-scope.
pub struct LogScope<'a> {
    registry: &'a LogRegistry,
    channel: String,
    level: Level,
    message: String,
    map_data: Option<SharedMapData>,
}

impl<'a> LogScope<'a> {
    /// Open a scope, emitting the `Start:` line if enabled.
    pub fn new(
        registry: &'a LogRegistry,
        channel: impl Into<String>,
        level: Level,
        message: impl Into<String>,
    ) -> Self {
        Self::build(registry, channel, level, message, None)
    }

    /// Open a scope carrying a shared map payload emitted with both lines.
    pub fn with_map(
        registry: &'a LogRegistry,
        channel: impl Into<String>,
        level: Level,
        message: impl Into<String>,
        map_data: SharedMapData,
    ) -> Self {
        Self::build(registry, channel, level, message, Some(map_data))
    }

    fn build(
        registry: &'a LogRegistry,
        channel: impl Into<String>,
        level: Level,
        message: impl Into<String>,
        map_data: Option<SharedMapData>,
    ) -> Self {
        let scope = Self {
            registry,
            channel: channel.into(),
            level,
            message: message.into(),
            map_data,
        };
        scope.emit("Start: ");
        scope
    }

    fn emit(&self, prefix: &str) {
        if self
            .registry
            .should_log(&self.channel, self.level)
            .unwrap_or(false)
        {
            let map_data = self
                .map_data
                .as_ref()
                .map(|map| map.lock().clone())
                .unwrap_or_default();
            let message = format!("{prefix}{}", self.message);
            self.registry.log(&self.channel, self.level, &message, map_data);
        }
    }
}

impl Drop for LogScope<'_> {
    fn drop(&mut self) {
        self.emit("End: ");
    }
}

/// Times a lexical scope and reports the elapsed duration at exit.
///
/// The terminal line carries the message with a human-friendly
/// `<value><unit>` suffix and always injects an integer `duration_ms` key,
/// in milliseconds regardless of the display unit. When the channel/level is
/// disabled at entry no start time is captured and exit emits nothing.
pub struct ScopedTimer<'a> {
    registry: &'a LogRegistry,
    channel: String,
    level: Level,
    message: String,
    map_data: Option<SharedMapData>,
    start: Option<Instant>,
}

impl<'a> ScopedTimer<'a> {
    /// Start a timer scope.
    pub fn new(
        registry: &'a LogRegistry,
        channel: impl Into<String>,
        level: Level,
        message: impl Into<String>,
    ) -> Self {
        Self::build(registry, channel, level, message, None)
    }

    /// Start a timer scope carrying a shared map payload.
    pub fn with_map(
        registry: &'a LogRegistry,
        channel: impl Into<String>,
        level: Level,
        message: impl Into<String>,
        map_data: SharedMapData,
    ) -> Self {
        Self::build(registry, channel, level, message, Some(map_data))
    }

    fn build(
        registry: &'a LogRegistry,
        channel: impl Into<String>,
        level: Level,
        message: impl Into<String>,
        map_data: Option<SharedMapData>,
    ) -> Self {
        let channel = channel.into();
        let start = registry
            .should_log(&channel, level)
            .unwrap_or(false)
            .then(Instant::now);
        Self {
            registry,
            channel,
            level,
            message: message.into(),
            map_data,
            start,
        }
    }

    /// Elapsed time since the scope opened, without closing it.
    ///
    /// Zero when the timer was disabled at entry. Monotonically
    /// non-decreasing across repeated calls.
    pub fn elapsed(&self) -> Duration {
        self.start.map(|start| start.elapsed()).unwrap_or_default()
    }
}

impl Drop for ScopedTimer<'_> {
    fn drop(&mut self) {
        let Some(start) = self.start else {
            return;
        };
        if !self
            .registry
            .should_log(&self.channel, self.level)
            .unwrap_or(false)
        {
            return;
        }
        let elapsed = start.elapsed();
        let (value, unit) = display_duration(elapsed);
        let mut map_data = self
            .map_data
            .as_ref()
            .map(|map| map.lock().clone())
            .unwrap_or_default();
        map_data.insert(
            "duration_ms".to_string(),
            Value::from(elapsed.as_millis() as u64),
        );
        let message = format!("{}{value}{unit}", self.message);
        self.registry.log(&self.channel, self.level, &message, map_data);
    }
}

/// Pick the coarsest unit whose magnitude is at least one.
fn display_duration(elapsed: Duration) -> (u128, &'static str) {
    let nanos = elapsed.as_nanos();
    if nanos >= 100_000_000 {
        (u128::from(elapsed.as_secs()), "s")
    } else if nanos >= 1_000_000 {
        (elapsed.as_millis(), "ms")
    } else if nanos >= 1_000 {
        (elapsed.as_micros(), "us")
    } else {
        (nanos, "ns")
    }
}

/// Adds one level of indentation for the current thread for the lifetime of
/// the guard.
pub struct ScopedIndent<'a> {
    registry: &'a LogRegistry,
    enabled: bool,
}

impl<'a> ScopedIndent<'a> {
    /// Indent unconditionally.
    pub fn new(registry: &'a LogRegistry) -> Self {
        registry.add_indent();
        Self {
            registry,
            enabled: true,
        }
    }

    /// Indent only if `channel`/`level` is enabled right now.
    ///
    /// The decision is captured once at construction and reused at drop, so
    /// a filter change mid-scope cannot leave the indent counter skewed.
    pub fn new_if(registry: &'a LogRegistry, channel: &str, level: Level) -> Self {
        let enabled = registry.should_log(channel, level).unwrap_or(false);
        if enabled {
            registry.add_indent();
        }
        Self { registry, enabled }
    }
}

impl Drop for ScopedIndent<'_> {
    fn drop(&mut self) {
        if self.enabled {
            self.registry.remove_indent();
        }
    }
}

/// Attaches metadata keys to the current thread for the lifetime of the
/// guard, removing exactly those keys at drop.
pub struct ScopedMetadata<'a> {
    registry: &'a LogRegistry,
    keys: Vec<String>,
}

impl<'a> ScopedMetadata<'a> {
    /// Attach a single key/value pair.
    pub fn new(registry: &'a LogRegistry, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        registry.add_metadata(key.clone(), value);
        Self {
            registry,
            keys: vec![key],
        }
    }

    /// Attach every key of `map_data`.
    pub fn with_map(registry: &'a LogRegistry, map_data: MapData) -> Self {
        let keys = map_data.keys().cloned().collect();
        for (key, value) in map_data {
            registry.add_metadata(key, value);
        }
        Self { registry, keys }
    }
}

impl Drop for ScopedMetadata<'_> {
    fn drop(&mut self) {
        for key in &self.keys {
            self.registry.remove_metadata(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_unit_ladder() {
        assert_eq!(display_duration(Duration::from_nanos(999)), (999, "ns"));
        assert_eq!(display_duration(Duration::from_nanos(1_000)), (1, "us"));
        assert_eq!(display_duration(Duration::from_nanos(2_500_000)), (2, "ms"));
        assert_eq!(
            display_duration(Duration::from_millis(250)),
            (0, "s")
        );
        assert_eq!(display_duration(Duration::from_secs(3)), (3, "s"));
    }
}

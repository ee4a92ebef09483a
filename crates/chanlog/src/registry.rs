//! The process-wide log registry: filtering, sinks, per-thread scope state

use crate::entry::{Entry, MapData};
use crate::error::{Error, Result};
use crate::format::{LogFormatter, PlainTextFormatter};
use crate::sink::SharedSink;
use crate::Level;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use std::thread::{self, ThreadId};

/// Mapping from channel name to the minimum level it emits at
pub type FilterMap = HashMap<String, Level>;

/// Everything the registry guards with its one state lock.
///
/// Filter map and default level are always read together, so a filter check
/// sees one consistent configuration snapshot.
struct RegistryState {
    filters: FilterMap,
    default_level: Level,
    thread_id_enabled: bool,
    metadata_enabled: bool,
    service_name: String,
    formatter: Arc<dyn LogFormatter>,
    sinks: Vec<SharedSink>,
    indents: HashMap<ThreadId, u32>,
    metadata: HashMap<ThreadId, MapData>,
}

impl RegistryState {
    fn unconfigured() -> Self {
        Self {
            filters: FilterMap::new(),
            default_level: Level::Off,
            thread_id_enabled: false,
            metadata_enabled: false,
            service_name: String::new(),
            formatter: Arc::new(PlainTextFormatter),
            sinks: Vec::new(),
            indents: HashMap::new(),
            metadata: HashMap::new(),
        }
    }
}

/// Thread-safe multiplexer of log entries to shared sinks.
///
/// A registry owns the filter configuration, the active formatter, the sink
/// list and the per-thread indent/metadata state. All of it sits behind one
/// mutex; the actual sink writes happen outside that lock, under each sink's
/// own lock, so configuration reads and writes to distinct sinks are never
/// serialized against a slow stream.
///
/// Most applications use the process-wide instance via [`registry`];
/// constructing dedicated instances is supported and is how the tests keep
/// isolated state.
pub struct LogRegistry {
    state: Mutex<RegistryState>,
}

impl LogRegistry {
    /// Create a registry in the unconfigured state: no filters, default
    /// level `off`, no sinks, plain-text formatter.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RegistryState::unconfigured()),
        }
    }

    /// Parse and install filter configuration, replacing the previous one
    /// atomically.
    ///
    /// `filter_spec` has the form `"CH1:lvl1,CH2:lvl2"`; an empty string
    /// means no per-channel overrides. `default_level_spec` is a bare level
    /// name applied to channels absent from the spec. Fails without touching
    /// the current configuration if either string is malformed.
    pub fn setup_filters(&self, filter_spec: &str, default_level_spec: &str) -> Result<()> {
        let filters = parse_filter_spec(filter_spec)?;
        let default_level = default_level_spec.parse()?;
        let mut state = self.state.lock();
        state.filters = filters;
        state.default_level = default_level;
        Ok(())
    }

    /// Check whether a log call on `channel` at `level` would emit.
    ///
    /// Fails if `level` is [`Level::Off`]: logging *at* off is disallowed,
    /// distinct from filtering *to* off. A channel's configured level (or
    /// the default, for unconfigured channels) enables everything at that
    /// level and terser, exact match included.
    pub fn should_log(&self, channel: &str, level: Level) -> Result<bool> {
        if level == Level::Off {
            return Err(Error::LogAtOff);
        }
        let state = self.state.lock();
        let effective = state
            .filters
            .get(channel)
            .copied()
            .unwrap_or(state.default_level);
        Ok(effective >= level)
    }

    /// Register a sink. Every formatted entry is written to every
    /// registered sink.
    pub fn add_sink(&self, sink: SharedSink) {
        self.state.lock().sinks.push(sink);
    }

    /// Wrap `writer` as a sink, register it, and return the shared handle.
    pub fn add_writer<W: std::io::Write + Send + 'static>(&self, writer: W) -> SharedSink {
        let sink = crate::sink::writer_sink(writer);
        self.add_sink(Arc::clone(&sink));
        sink
    }

    /// Swap the active formatter.
    pub fn set_formatter(&self, formatter: Arc<dyn LogFormatter>) {
        self.state.lock().formatter = formatter;
    }

    /// Switch to the plain-text formatter.
    pub fn use_plain_formatter(&self) {
        self.set_formatter(Arc::new(PlainTextFormatter));
    }

    /// Switch to the single-line JSON formatter.
    pub fn use_json_formatter(&self) {
        self.set_formatter(Arc::new(crate::format::JsonFormatter));
    }

    /// Include the logging thread's id in emitted entries.
    pub fn enable_thread_id(&self) {
        self.state.lock().thread_id_enabled = true;
    }

    /// Stop including thread ids in emitted entries.
    pub fn disable_thread_id(&self) {
        self.state.lock().thread_id_enabled = false;
    }

    /// Whether thread-id logging is currently enabled.
    pub fn thread_id_enabled(&self) -> bool {
        self.state.lock().thread_id_enabled
    }

    /// Enable per-thread metadata collection and emission.
    pub fn enable_metadata(&self) {
        self.state.lock().metadata_enabled = true;
    }

    /// Disable per-thread metadata; mutation calls become no-ops.
    pub fn disable_metadata(&self) {
        self.state.lock().metadata_enabled = false;
    }

    /// Whether metadata collection is currently enabled.
    pub fn metadata_enabled(&self) -> bool {
        self.state.lock().metadata_enabled
    }

    /// Set the service name stamped on every subsequent entry.
    pub fn set_service_name(&self, name: impl Into<String>) {
        self.state.lock().service_name = name.into();
    }

    /// The currently configured service name (empty when unset).
    pub fn service_name(&self) -> String {
        self.state.lock().service_name.clone()
    }

    /// Format and write one entry to every sink.
    ///
    /// No filtering happens here; callers check [`should_log`] first so that
    /// message construction can be skipped entirely for disabled calls.
    /// Entry assembly (metadata injection, context capture, formatter and
    /// sink-list snapshot) happens under the state lock; formatting and sink
    /// writes happen outside it. All lines of one entry are written under a
    /// single acquisition of each sink's lock, so multi-line entries stay
    /// contiguous per sink. Stream write failures are ignored.
    ///
    /// [`should_log`]: LogRegistry::should_log
    pub fn log(&self, channel: &str, level: Level, message: &str, mut map_data: MapData) {
        let (entry, formatter, sinks) = {
            let state = self.state.lock();
            let thread_id = thread::current().id();
            if state.metadata_enabled
                && let Some(metadata) = state.metadata.get(&thread_id)
                && !metadata.is_empty()
            {
                map_data.insert("metadata".to_string(), Value::Object(metadata.clone()));
            }
            let mut entry = Entry::new(channel, level, message, map_data)
                .with_service_name(state.service_name.clone())
                .with_indent(state.indents.get(&thread_id).copied().unwrap_or(0));
            if state.thread_id_enabled {
                entry = entry.with_thread_id(format!("{thread_id:?}"));
            }
            (entry, Arc::clone(&state.formatter), state.sinks.clone())
        };

        let lines = formatter.format_entry(&entry);
        for sink in &sinks {
            let mut stream = sink.lock();
            for line in &lines {
                let _ = stream.write_all(line.as_bytes());
            }
            let _ = stream.flush();
        }
    }

    /// Add one level of indentation for the current thread.
    pub fn add_indent(&self) {
        let mut state = self.state.lock();
        *state.indents.entry(thread::current().id()).or_insert(0) += 1;
    }

    /// Remove one level of indentation for the current thread.
    ///
    /// The thread's counter entry is dropped from the map when it reaches
    /// zero, bounding memory for short-lived threads. A no-op at depth zero.
    pub fn remove_indent(&self) {
        let mut state = self.state.lock();
        let thread_id = thread::current().id();
        if let Some(depth) = state.indents.get_mut(&thread_id) {
            *depth -= 1;
            if *depth == 0 {
                state.indents.remove(&thread_id);
            }
        }
    }

    /// The current thread's indent depth.
    pub fn indent_depth(&self) -> u32 {
        self.state
            .lock()
            .indents
            .get(&thread::current().id())
            .copied()
            .unwrap_or(0)
    }

    /// Attach a metadata key to the current thread. A no-op while metadata
    /// is disabled.
    pub fn add_metadata(&self, key: impl Into<String>, value: Value) {
        let mut state = self.state.lock();
        if !state.metadata_enabled {
            return;
        }
        state
            .metadata
            .entry(thread::current().id())
            .or_default()
            .insert(key.into(), value);
    }

    /// Remove a metadata key from the current thread. The thread's map entry
    /// is dropped when its last key goes. A no-op while metadata is disabled.
    pub fn remove_metadata(&self, key: &str) {
        let mut state = self.state.lock();
        if !state.metadata_enabled {
            return;
        }
        let thread_id = thread::current().id();
        if let Some(map) = state.metadata.get_mut(&thread_id) {
            map.remove(key);
            if map.is_empty() {
                state.metadata.remove(&thread_id);
            }
        }
    }

    /// Drop all metadata for the current thread. A no-op while metadata is
    /// disabled.
    pub fn clear_metadata(&self) {
        let mut state = self.state.lock();
        if !state.metadata_enabled {
            return;
        }
        state.metadata.remove(&thread::current().id());
    }

    /// A copy of the current thread's metadata map (empty when none).
    pub fn metadata(&self) -> MapData {
        self.state
            .lock()
            .metadata
            .get(&thread::current().id())
            .cloned()
            .unwrap_or_default()
    }

    /// Restore the unconfigured state: empty filters, default level `off`,
    /// no sinks, thread-id and metadata disabled, empty service name, empty
    /// per-thread maps, plain-text formatter. Intended for test isolation.
    pub fn reset(&self) {
        *self.state.lock() = RegistryState::unconfigured();
    }
}

impl Default for LogRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_filter_spec(spec: &str) -> Result<FilterMap> {
    let mut filters = FilterMap::new();
    if spec.is_empty() {
        return Ok(filters);
    }
    for pair in spec.split(',') {
        let mut tokens = pair.split(':');
        match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(channel), Some(level), None) => {
                filters.insert(channel.to_string(), level.parse()?);
            }
            _ => return Err(Error::InvalidFilterSpec(spec.to_string())),
        }
    }
    Ok(filters)
}

static GLOBAL: LazyLock<LogRegistry> = LazyLock::new(LogRegistry::new);

/// The process-wide registry instance, lazily created on first access.
pub fn registry() -> &'static LogRegistry {
    &GLOBAL
}

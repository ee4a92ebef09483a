//! Captured log events

use crate::Level;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// Structured key/value payload attached to a log entry
pub type MapData = Map<String, Value>;

/// An immutable record of a single log event.
///
/// Everything an entry carries is captured at construction time on the
/// logging thread; formatters never read registry state. The thread id is
/// present only when thread-id logging was enabled at capture, so the
/// enablement decision is snapshotted along with the rest of the entry.
#[derive(Debug, Clone, Serialize)]
pub struct Entry {
    /// Channel the entry was logged on
    pub channel: String,
    /// Severity the entry was logged at
    pub level: Level,
    /// Message text, possibly spanning multiple lines
    pub message: String,
    /// UTC capture time, millisecond precision when rendered
    pub timestamp: DateTime<Utc>,
    /// Service name configured at capture time (empty when unset)
    pub service_name: String,
    /// Indent depth of the logging thread at capture time
    pub num_indent: u32,
    /// Logging thread's identity, when thread-id logging was enabled
    pub thread_id: Option<String>,
    /// Structured key/value payload (empty by default)
    pub map_data: MapData,
}

impl Entry {
    /// Create an entry, capturing the current time.
    pub fn new(
        channel: impl Into<String>,
        level: Level,
        message: impl Into<String>,
        map_data: MapData,
    ) -> Self {
        Self {
            channel: channel.into(),
            level,
            message: message.into(),
            timestamp: Utc::now(),
            service_name: String::new(),
            num_indent: 0,
            thread_id: None,
            map_data,
        }
    }

    /// Builder-style method for setting the service name
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }

    /// Builder-style method for setting the indent depth
    pub fn with_indent(mut self, depth: u32) -> Self {
        self.num_indent = depth;
        self
    }

    /// Builder-style method for setting the thread identity
    pub fn with_thread_id(mut self, id: impl Into<String>) -> Self {
        self.thread_id = Some(id.into());
        self
    }

    /// Capture time in the fixed `YYYY-MM-DDTHH:MM:SS.mmmZ` form.
    pub fn timestamp_str(&self) -> String {
        self.timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
    }
}

//! Test support utilities
//!
//! Provides an in-memory sink for capturing log output during tests.

use crate::registry::LogRegistry;
use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

/// A sink that captures all output in memory.
///
/// Clones share the same buffer, so a test can register one clone with a
/// registry and inspect the other.
#[derive(Clone, Default)]
pub struct CaptureSink {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CaptureSink {
    /// Create an empty capture sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a capture sink and register it with `registry`.
    pub fn install(registry: &LogRegistry) -> Self {
        let sink = Self::new();
        registry.add_writer(sink.clone());
        sink
    }

    /// Everything captured so far.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }

    /// Captured output split into lines, terminators stripped.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    /// Number of captured lines.
    pub fn line_count(&self) -> usize {
        self.lines().len()
    }

    /// Whether the captured output contains `text`.
    pub fn contains(&self, text: &str) -> bool {
        self.contents().contains(text)
    }

    /// Discard everything captured so far.
    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl Write for CaptureSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

//! Output sinks and their construction helpers

use crate::error::Result;
use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

/// A writable output stream shared between the registry and its owner.
///
/// The mutex is the sink's private write lock: two threads writing to the
/// same sink are serialized, while writes to distinct sinks proceed
/// independently. Callers keep a clone of the handle; the registry never
/// assumes exclusive ownership of the underlying stream.
pub type SharedSink = Arc<Mutex<Box<dyn Write + Send>>>;

/// Wrap an arbitrary writer as a registrable sink.
pub fn writer_sink<W: Write + Send + 'static>(writer: W) -> SharedSink {
    Arc::new(Mutex::new(Box::new(writer)))
}

/// Open `path` for appending and wrap it as a sink.
///
/// The file is created if missing and the path is used as given; callers
/// supply any extension themselves. This is the only fallible sink
/// constructor; open errors surface as [`crate::Error::Io`].
pub fn file_sink(path: impl AsRef<Path>) -> Result<SharedSink> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(writer_sink(file))
}

/// Wrap the process stdout stream as a sink.
pub fn stdout_sink() -> SharedSink {
    writer_sink(io::stdout())
}

/// Wrap the process stderr stream as a sink.
pub fn stderr_sink() -> SharedSink {
    writer_sink(io::stderr())
}

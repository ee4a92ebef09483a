//! Error types for logging configuration and setup

use std::io;

/// Result type for fallible logging operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by configuration and filter-check operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A filter spec entry did not split into exactly `CHANNEL:level`
    #[error("invalid filter spec [{0}]")]
    InvalidFilterSpec(String),

    /// A level token did not match any known level name
    #[error("invalid log level [{0}]")]
    InvalidLevel(String),

    /// A log call was made at the `off` sentinel level
    #[error("logging at level 'off' is not allowed")]
    LogAtOff,

    /// I/O error opening a file sink
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

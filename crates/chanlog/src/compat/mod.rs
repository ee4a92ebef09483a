//! Compatibility bridges for other logging ecosystems

#[cfg(feature = "log-compat")]
mod log_bridge;

#[cfg(feature = "log-compat")]
pub use log_bridge::{init_log_bridge, LogBridge};

//! Runtime configuration for the warpfield starfield.
//!
//! Settings persist to disk as a RON file. Every section falls back to its
//! defaults when missing, so older or partial files keep loading.

mod config;
mod error;

pub use config::{CONFIG_FILE, CaptureConfig, Config, DebugConfig, DisplayConfig};
pub use error::ConfigError;

//! pomo-core - Shared functionality for the pomo tools
//!
//! Paths, configuration and display formatting used by both the focus
//! engine and its notification adapter.

pub mod config;
pub mod format;
pub mod paths;

pub use config::{Config, ConfigError};
pub use paths::Paths;

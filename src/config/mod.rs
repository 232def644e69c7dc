//! Configuration Module
//!
//! Loads and validates configuration from TOML files.

pub mod loader;

pub use loader::{
    Config, ConfigError, LoggingSection, ScanSection, load_config, load_or_default, SNAPSHOT_DIR_ENV,
};

//! Adapters Layer - External System Implementations
//!
//! This module contains implementations of the port traits:
//! - Snapshot files: JSON snapshots on disk behind `SnapshotSource`
//! - CLI: Command-line interface handlers

pub mod cli;
pub mod snapshot_file;

pub use cli::CliApp;
pub use snapshot_file::{load_snapshot_file, parse_snapshot, validate_address, JsonFileSource};

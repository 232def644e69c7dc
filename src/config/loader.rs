//! Configuration Loader
//!
//! Loads and validates configuration from TOML files matching tokenscope.toml structure.
//! Every section is optional; missing keys fall back to the built-in defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::application::ScanFilter;
use crate::domain::SignalClass;
use crate::strategy::EngineParams;

/// Environment override for the snapshot directory
pub const SNAPSHOT_DIR_ENV: &str = "TOKENSCOPE_SNAPSHOT_DIR";

/// Main configuration structure matching tokenscope.toml
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineParams,
    pub scan: ScanSection,
    pub logging: LoggingSection,
}

/// Watchlist scan configuration section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSection {
    /// Directory holding `<address>.json` snapshots
    pub snapshot_dir: String,
    /// Maximum snapshot fetches in flight
    pub concurrency: usize,
    /// Minimum combined score for an opportunity
    pub min_score: f64,
    /// Signal classes that count as opportunities ("buy", "strong_buy", ...)
    pub signal_classes: Vec<String>,
}

impl Default for ScanSection {
    fn default() -> Self {
        Self {
            snapshot_dir: "./snapshots".to_string(),
            concurrency: 8,
            min_score: 65.0,
            signal_classes: vec!["buy".to_string(), "strong_buy".to_string()],
        }
    }
}

impl ScanSection {
    /// Snapshot directory with `TOKENSCOPE_SNAPSHOT_DIR` override and `~` expanded
    pub fn snapshot_dir(&self) -> PathBuf {
        let raw = std::env::var(SNAPSHOT_DIR_ENV).unwrap_or_else(|_| self.snapshot_dir.clone());
        PathBuf::from(shellexpand::tilde(&raw).to_string())
    }

    /// Parsed signal classes
    pub fn classes(&self) -> Result<Vec<SignalClass>, ConfigError> {
        self.signal_classes
            .iter()
            .map(|label| {
                SignalClass::parse(label)
                    .ok_or_else(|| ConfigError::ValidationError(format!("unknown signal class '{label}'")))
            })
            .collect()
    }

    pub fn filter(&self) -> Result<ScanFilter, ConfigError> {
        Ok(ScanFilter::new(self.min_score, self.classes()?))
    }
}

/// Logging configuration section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = shellexpand::tilde(&path.as_ref().to_string_lossy()).to_string();
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Load from `path` when given, otherwise use the defaults
pub fn load_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            let config = Config::default();
            config.validate()?;
            Ok(config)
        }
    }
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        if !(1..=64).contains(&self.scan.concurrency) {
            return Err(ConfigError::ValidationError(format!(
                "scan.concurrency must be 1-64, got {}",
                self.scan.concurrency
            )));
        }

        if !(0.0..=100.0).contains(&self.scan.min_score) {
            return Err(ConfigError::ValidationError(format!(
                "scan.min_score must be 0-100, got {}",
                self.scan.min_score
            )));
        }

        self.scan.classes()?;

        if self.scan.snapshot_dir.is_empty() {
            return Err(ConfigError::ValidationError(
                "scan.snapshot_dir cannot be empty".to_string(),
            ));
        }

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(ConfigError::ValidationError(format!(
                "logging.level must be trace/debug/info/warn/error, got '{other}'"
            ))),
        }
    }
}

//! Snapshot Source Port
//!
//! Ingestion collaborator that hands the engine fully defaulted snapshots.
//! Implementations own all I/O, retries and rate limiting.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::AnalysisSnapshot;

/// Snapshot ingestion error type
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("No snapshot found for {0}")]
    NotFound(String),

    #[error("Invalid token address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Snapshot ingestion port
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetch a complete snapshot for one token mint
    async fn fetch(&self, address: &str) -> Result<AnalysisSnapshot, SourceError>;

    /// Name of the backing source, for logs
    fn source_name(&self) -> &str;
}

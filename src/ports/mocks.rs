use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::snapshot_source::{SnapshotSource, SourceError};
use crate::domain::AnalysisSnapshot;

/// In-memory snapshot source that records calls and serves canned snapshots
#[derive(Debug, Default, Clone)]
pub struct MockSnapshotSource {
    calls: Arc<Mutex<Vec<String>>>,
    snapshots: Arc<Mutex<HashMap<String, AnalysisSnapshot>>>,
}

impl MockSnapshotSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to register a snapshot under its token address
    pub fn with_snapshot(self, snapshot: AnalysisSnapshot) -> Self {
        if let Ok(mut map) = self.snapshots.lock() {
            map.insert(snapshot.address().to_string(), snapshot);
        }
        self
    }

    /// Get all recorded calls
    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl SnapshotSource for MockSnapshotSource {
    async fn fetch(&self, address: &str) -> Result<AnalysisSnapshot, SourceError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(address.to_string());
        }
        self.snapshots
            .lock()
            .ok()
            .and_then(|map| map.get(address).cloned())
            .ok_or_else(|| SourceError::NotFound(address.to_string()))
    }

    fn source_name(&self) -> &str {
        "mock"
    }
}

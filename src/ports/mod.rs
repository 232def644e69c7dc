//! Ports Layer - Trait definitions for external dependencies
//!
//! This module defines the interfaces (ports) that adapters must implement.
//! Following hexagonal architecture, these traits abstract:
//! - Smart money classification (holding-size heuristic today, P&L service later)
//! - Snapshot ingestion (files today, RPC/market-data providers later)

pub mod mocks;
pub mod smart_money;
pub mod snapshot_source;

pub use smart_money::{SmartMoneyClassifier, WalletHolding};
pub use snapshot_source::{SnapshotSource, SourceError};

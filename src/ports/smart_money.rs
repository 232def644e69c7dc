//! Smart Money Classification Port
//!
//! Decides whether a wallet counts as "smart money". The engine ships a
//! holding-size heuristic (`domain::holder_profiler::HoldingSizeClassifier`);
//! a historical P&L service can replace it without touching the profiler.

use serde::{Deserialize, Serialize};

/// A holder position as seen by a classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletHolding {
    pub address: String,
    /// Balance in whole tokens
    pub balance: f64,
    /// Balance valued at the snapshot price
    pub balance_usd: f64,
    pub percent_of_supply: f64,
}

/// Wallet -> is-smart-money decision
#[cfg_attr(test, mockall::automock)]
pub trait SmartMoneyClassifier: Send + Sync {
    fn is_smart_money(&self, wallet: &WalletHolding) -> bool;

    /// Short label used in logs
    fn name(&self) -> &str {
        "custom"
    }
}

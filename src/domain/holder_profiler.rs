//! Holder Profiler
//!
//! Classifies the top holders of a token as whales and/or smart money and
//! aggregates concentration and net flow.
//!
//! Smart money is decided by a pluggable [`SmartMoneyClassifier`]. The
//! default [`HoldingSizeClassifier`] approximates profitability by holding
//! size only; there is no trade history behind it.
//!
//! "Selling" and holder growth need an earlier holder list. That comparison
//! is off unless `holders.flow_history_enabled` is set, in which case both
//! stay undetermined (false / `None`) whenever no prior snapshot is supplied.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::ratio::{clamp_score, safe_ratio};
use super::snapshot::{AnalysisSnapshot, HolderEntry, PriorSnapshot};
use crate::ports::smart_money::{SmartMoneyClassifier, WalletHolding};
use crate::strategy::params::HolderParams;

/// Top-10 concentration bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConcentrationRisk {
    Low,
    Medium,
    High,
}

impl fmt::Display for ConcentrationRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConcentrationRisk::Low => write!(f, "low"),
            ConcentrationRisk::Medium => write!(f, "medium"),
            ConcentrationRisk::High => write!(f, "high"),
        }
    }
}

/// Direction of smart money flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetFlow {
    Buying,
    Selling,
    Neutral,
}

impl NetFlow {
    /// +1 / -1 / 0
    pub fn sign(&self) -> i8 {
        match self {
            NetFlow::Buying => 1,
            NetFlow::Selling => -1,
            NetFlow::Neutral => 0,
        }
    }
}

/// One profiled holder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HolderProfile {
    pub address: String,
    pub balance: f64,
    pub balance_usd: f64,
    pub percent_of_supply: f64,
    pub is_smart_money: bool,
    pub is_whale: bool,
}

/// Aggregated holder behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HolderMetrics {
    /// Holders in the ranked list
    pub total_holders: usize,
    pub smart_money_count: usize,
    pub whale_count: usize,
    /// Percent of supply held by smart money wallets
    pub smart_money_holdings_pct: f64,
    /// Combined percent of supply held by the top-N holders
    pub top10_concentration_pct: f64,
    pub concentration_risk: ConcentrationRisk,
    pub smart_money_buying: bool,
    pub smart_money_selling: bool,
    pub net_flow: NetFlow,
    /// Percent change in holder count vs the prior snapshot
    pub holder_growth_rate: Option<f64>,
}

/// Profiler output: metrics plus the profiled holders, largest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HolderAnalysis {
    pub metrics: HolderMetrics,
    pub profiles: Vec<HolderProfile>,
}

/// Default smart money heuristic: large enough share and large enough bag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoldingSizeClassifier {
    pub min_percent: f64,
    pub min_usd: f64,
}

impl HoldingSizeClassifier {
    pub fn from_params(params: &HolderParams) -> Self {
        Self {
            min_percent: params.smart_money_min_pct,
            min_usd: params.smart_money_min_usd,
        }
    }
}

impl Default for HoldingSizeClassifier {
    fn default() -> Self {
        Self::from_params(&HolderParams::default())
    }
}

impl SmartMoneyClassifier for HoldingSizeClassifier {
    fn is_smart_money(&self, wallet: &WalletHolding) -> bool {
        wallet.percent_of_supply >= self.min_percent && wallet.balance_usd >= self.min_usd
    }

    fn name(&self) -> &str {
        "holding_size"
    }
}

/// Holder profiler
#[derive(Clone)]
pub struct HolderProfiler {
    params: HolderParams,
    classifier: Arc<dyn SmartMoneyClassifier>,
}

impl fmt::Debug for HolderProfiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HolderProfiler")
            .field("params", &self.params)
            .field("classifier", &self.classifier.name())
            .finish()
    }
}

impl HolderProfiler {
    /// Profiler using the holding-size heuristic built from `params`
    pub fn new(params: HolderParams) -> Self {
        let classifier = Arc::new(HoldingSizeClassifier::from_params(&params));
        Self { params, classifier }
    }

    /// Profiler with a custom smart money classifier
    pub fn with_classifier(params: HolderParams, classifier: Arc<dyn SmartMoneyClassifier>) -> Self {
        Self { params, classifier }
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    /// Profile the holders of a snapshot
    pub fn profile(&self, snapshot: &AnalysisSnapshot) -> HolderAnalysis {
        self.profile_holders(&snapshot.holders, snapshot.price(), snapshot.prior.as_ref())
    }

    /// Profile a ranked holder list valued at `price`
    pub fn profile_holders(
        &self,
        holders: &[HolderEntry],
        price: f64,
        prior: Option<&PriorSnapshot>,
    ) -> HolderAnalysis {
        let profiles: Vec<HolderProfile> = holders
            .iter()
            .take(self.params.profile_limit)
            .map(|holder| self.profile_one(holder, price))
            .collect();

        let smart: Vec<&HolderProfile> = profiles.iter().filter(|p| p.is_smart_money).collect();
        let smart_money_holdings_pct: f64 = smart.iter().map(|p| p.percent_of_supply).sum();
        let whale_count = profiles.iter().filter(|p| p.is_whale).count();

        let top10_concentration_pct = self.top_concentration(holders);
        let concentration_risk = self.concentration_risk(holders, top10_concentration_pct);

        let large_smart_wallets = smart
            .iter()
            .filter(|p| p.balance_usd > self.params.buying_wallet_usd)
            .count();
        let smart_money_buying = large_smart_wallets > self.params.buying_wallet_count;

        let (smart_money_selling, holder_growth_rate) = match prior {
            Some(prior) if self.params.flow_history_enabled => (
                self.detect_selling(&smart, prior),
                Self::growth_rate(holders.len(), prior.total_holders),
            ),
            _ => (false, None),
        };

        let net_flow = if smart_money_buying {
            NetFlow::Buying
        } else if smart_money_selling {
            NetFlow::Selling
        } else {
            NetFlow::Neutral
        };

        HolderAnalysis {
            metrics: HolderMetrics {
                total_holders: holders.len(),
                smart_money_count: smart.len(),
                whale_count,
                smart_money_holdings_pct,
                top10_concentration_pct,
                concentration_risk,
                smart_money_buying,
                smart_money_selling,
                net_flow,
                holder_growth_rate,
            },
            profiles,
        }
    }

    fn profile_one(&self, holder: &HolderEntry, price: f64) -> HolderProfile {
        let wallet = WalletHolding {
            address: holder.address.clone(),
            balance: holder.balance,
            balance_usd: holder.balance * price,
            percent_of_supply: holder.percent_of_supply,
        };
        let is_smart_money = self.classifier.is_smart_money(&wallet);
        HolderProfile {
            is_whale: wallet.percent_of_supply >= self.params.whale_pct,
            is_smart_money,
            address: wallet.address,
            balance: wallet.balance,
            balance_usd: wallet.balance_usd,
            percent_of_supply: wallet.percent_of_supply,
        }
    }

    /// Combined percent of the top-N holders, capped at 100. An empty list
    /// is treated as fully concentrated.
    fn top_concentration(&self, holders: &[HolderEntry]) -> f64 {
        if holders.is_empty() {
            return 100.0;
        }
        clamp_score(
            holders
                .iter()
                .take(self.params.concentration_top_n)
                .map(|h| h.percent_of_supply)
                .sum(),
        )
    }

    fn concentration_risk(&self, holders: &[HolderEntry], top_pct: f64) -> ConcentrationRisk {
        if holders.is_empty() || top_pct > self.params.high_concentration_pct {
            ConcentrationRisk::High
        } else if top_pct > self.params.medium_concentration_pct {
            ConcentrationRisk::Medium
        } else {
            ConcentrationRisk::Low
        }
    }

    /// Smart wallets whose balance dropped by at least the configured share
    fn detect_selling(&self, smart: &[&HolderProfile], prior: &PriorSnapshot) -> bool {
        let previous: HashMap<&str, f64> = prior
            .holders
            .iter()
            .map(|h| (h.address.as_str(), h.balance))
            .collect();

        let sellers = smart
            .iter()
            .filter(|p| {
                previous.get(p.address.as_str()).is_some_and(|&before| {
                    let drop_pct = safe_ratio(before - p.balance, before, 0.0) * 100.0;
                    drop_pct >= self.params.selling_drop_pct
                })
            })
            .count();

        sellers > self.params.selling_wallet_count
    }

    fn growth_rate(current: usize, previous: usize) -> Option<f64> {
        if previous == 0 {
            return None;
        }
        Some(safe_ratio(current as f64 - previous as f64, previous as f64, 0.0) * 100.0)
    }
}

impl Default for HolderProfiler {
    fn default() -> Self {
        Self::new(HolderParams::default())
    }
}

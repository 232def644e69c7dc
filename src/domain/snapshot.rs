//! Analysis Snapshots
//!
//! Point-in-time input records handed to the scoring engine. Every field is
//! populated: the ingestion boundary (see `adapters::snapshot_file`) fills
//! gaps with conservative defaults before anything here is constructed.
//! Where a default would read as a good value (a flat 24h price, no volume)
//! the gap is also recorded in [`MissingMarketData`] so scorers can charge
//! the worst case.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ratio::safe_ratio;

/// State of a mint or freeze authority on an SPL token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "address", rename_all = "snake_case")]
pub enum Authority {
    /// Authority set to null on-chain
    Revoked,
    /// Authority held by the given address
    Active(String),
    /// Token account could not be read; scored as if active
    Unknown,
}

impl Authority {
    /// Build from a nullable on-chain authority field
    pub fn from_option(authority: Option<String>) -> Self {
        match authority {
            Some(address) if !address.is_empty() => Authority::Active(address),
            _ => Authority::Revoked,
        }
    }

    /// Whether this authority must be treated as live for risk purposes
    pub fn is_present(&self) -> bool {
        !matches!(self, Authority::Revoked)
    }
}

/// Token metadata captured from the mint account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenSnapshot {
    /// Token mint address (base58)
    pub address: String,
    /// Capture time of the snapshot
    pub timestamp: DateTime<Utc>,
    /// Token name (metadata), "Unknown" when unavailable
    pub name: String,
    /// Token symbol (metadata), "UNKNOWN" when unavailable
    pub symbol: String,
    pub mint_authority: Authority,
    pub freeze_authority: Authority,
    /// Raw supply in base units
    pub supply: u64,
    pub decimals: u8,
    pub is_initialized: bool,
}

impl TokenSnapshot {
    /// Conservative token record used when the mint account is unreadable
    pub fn unknown(address: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            address: address.into(),
            timestamp,
            name: "Unknown".to_string(),
            symbol: "UNKNOWN".to_string(),
            mint_authority: Authority::Unknown,
            freeze_authority: Authority::Unknown,
            supply: 0,
            decimals: 0,
            is_initialized: false,
        }
    }

    /// Supply expressed in whole tokens
    pub fn ui_supply(&self) -> f64 {
        self.supply as f64 / 10f64.powi(self.decimals as i32)
    }
}

/// Market data timeframes reported by the pair feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "5m")]
    M5,
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "30m")]
    M30,
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "6h")]
    H6,
    #[serde(rename = "24h")]
    H24,
}

impl Timeframe {
    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::M5 => "5m",
            Timeframe::M15 => "15m",
            Timeframe::M30 => "30m",
            Timeframe::H1 => "1h",
            Timeframe::H6 => "6h",
            Timeframe::H24 => "24h",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Volume and price change over one timeframe
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameStats {
    pub volume_usd: f64,
    pub price_change_pct: f64,
}

/// Per-timeframe stats for the top pair. Zero when the feed had no bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeframes {
    pub m5: FrameStats,
    pub m15: FrameStats,
    pub m30: FrameStats,
    pub h1: FrameStats,
    pub h6: FrameStats,
    pub h24: FrameStats,
}

impl Timeframes {
    pub fn get(&self, timeframe: Timeframe) -> FrameStats {
        match timeframe {
            Timeframe::M5 => self.m5,
            Timeframe::M15 => self.m15,
            Timeframe::M30 => self.m30,
            Timeframe::H1 => self.h1,
            Timeframe::H6 => self.h6,
            Timeframe::H24 => self.h24,
        }
    }

    /// Frames inspected for volume anomalies, shortest first
    pub fn anomaly_frames(&self) -> [(Timeframe, FrameStats); 5] {
        [
            (Timeframe::M5, self.m5),
            (Timeframe::M15, self.m15),
            (Timeframe::M30, self.m30),
            (Timeframe::H1, self.h1),
            (Timeframe::H24, self.h24),
        ]
    }

    /// Frames whose price change feeds the volatility estimate
    pub fn volatility_frames(&self) -> [FrameStats; 4] {
        [self.m5, self.h1, self.h6, self.h24]
    }
}

/// One DEX pair trading the token
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairSnapshot {
    pub pair_address: String,
    pub dex_id: String,
    pub liquidity_usd: f64,
    pub volume_h24: f64,
    pub volume_h6: f64,
    pub price_change_h24: f64,
}

/// Market fields the feed did not report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissingMarketData {
    pub price_change_24h: bool,
    pub volume_24h: bool,
}

impl MissingMarketData {
    pub fn all() -> Self {
        Self {
            price_change_24h: true,
            volume_24h: true,
        }
    }
}

/// Market metrics for the token. All-zero when no market exists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub price_usd: f64,
    pub price_change_24h: f64,
    /// 7-day change, `None` when the feed does not report it
    pub price_change_7d: Option<f64>,
    pub market_cap_usd: f64,
    pub fdv_usd: f64,
    pub liquidity_usd: f64,
    pub volume_24h_usd: f64,
    pub pair_count: u32,
    pub dex_platform: Option<String>,
    pub timeframes: Timeframes,
    /// Pairs ordered by liquidity, highest first
    pub pairs: Vec<PairSnapshot>,
    /// Recent close prices, oldest first (may be empty)
    pub close_prices: Vec<f64>,
    #[serde(default)]
    pub missing: MissingMarketData,
}

impl MarketSnapshot {
    /// Empty market for a feed that returned nothing at all
    pub fn unreported() -> Self {
        Self {
            missing: MissingMarketData::all(),
            ..Self::default()
        }
    }

    /// 24h volume divided by liquidity; 0 when there is no liquidity
    pub fn vol_liq_ratio(&self) -> f64 {
        safe_ratio(self.volume_24h_usd, self.liquidity_usd, 0.0)
    }
}

/// A ranked holder account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HolderEntry {
    pub address: String,
    /// Balance in whole tokens
    pub balance: f64,
    /// Percent of total supply held
    pub percent_of_supply: f64,
}

/// Earlier holder list used for flow comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorSnapshot {
    pub timestamp: DateTime<Utc>,
    pub total_holders: usize,
    pub holders: Vec<HolderEntry>,
}

/// Everything the engine needs for one analysis call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSnapshot {
    pub token: TokenSnapshot,
    pub market: MarketSnapshot,
    /// Top holders ranked by balance, largest first
    pub holders: Vec<HolderEntry>,
    /// Days since the mint's first transaction; 0 when unknown
    pub contract_age_days: f64,
    pub prior: Option<PriorSnapshot>,
}

impl AnalysisSnapshot {
    /// Fully conservative snapshot for a token nothing could be fetched for
    pub fn empty(address: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            token: TokenSnapshot::unknown(address, timestamp),
            market: MarketSnapshot::default(),
            holders: Vec::new(),
            contract_age_days: 0.0,
            prior: None,
        }
    }

    pub fn address(&self) -> &str {
        &self.token.address
    }

    pub fn price(&self) -> f64 {
        self.market.price_usd
    }
}

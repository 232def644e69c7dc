//! JSON Snapshot Files
//!
//! Reads `<dir>/<address>.json` snapshot files and normalizes them into
//! fully populated [`AnalysisSnapshot`]s. Missing or malformed fields are
//! replaced with conservative defaults here so the scorers never see a gap:
//!
//! - missing token block: unknown token, authorities scored as active
//! - missing authority field: `Unknown`; explicit `null`: revoked
//! - missing market block: all-zero market, every gap recorded
//! - missing 24h change or volume: 0, recorded as missing so risk is worst case
//! - 7-day change of exactly 0: unavailable
//! - missing holder percent: derived from balance and supply
//! - missing contract age: 0 days

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

use crate::domain::ratio::{finite_or_zero, safe_ratio};
use crate::domain::{
    AnalysisSnapshot, Authority, HolderEntry, MarketSnapshot, MissingMarketData, PairSnapshot, PriorSnapshot,
    Timeframes, TokenSnapshot,
};
use crate::ports::{SnapshotSource, SourceError};

/// Length of a decoded Solana public key
const PUBKEY_BYTES: usize = 32;

/// Check that `address` is a base58-encoded 32-byte public key
pub fn validate_address(address: &str) -> Result<(), SourceError> {
    let invalid = |reason: String| SourceError::InvalidAddress {
        address: address.to_string(),
        reason,
    };
    let bytes = bs58::decode(address)
        .into_vec()
        .map_err(|e| invalid(e.to_string()))?;
    if bytes.len() != PUBKEY_BYTES {
        return Err(invalid(format!("decoded to {} bytes, expected {}", bytes.len(), PUBKEY_BYTES)));
    }
    Ok(())
}

/// Snapshot source backed by a directory of JSON files
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    dir: PathBuf,
}

impl JsonFileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, address: &str) -> PathBuf {
        self.dir.join(format!("{address}.json"))
    }
}

#[async_trait]
impl SnapshotSource for JsonFileSource {
    async fn fetch(&self, address: &str) -> Result<AnalysisSnapshot, SourceError> {
        validate_address(address)?;
        let path = self.path_for(address);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SourceError::NotFound(path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(address, path = %path.display(), "Loaded snapshot file");
        parse_snapshot(Some(address), &content)
    }

    fn source_name(&self) -> &str {
        "json_file"
    }
}

/// Load a single snapshot file. The token address comes from the file,
/// falling back to the file stem.
pub fn load_snapshot_file(path: impl AsRef<Path>) -> Result<AnalysisSnapshot, SourceError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let fallback = path.file_stem().map(|s| s.to_string_lossy().to_string());
    let raw: RawSnapshot = serde_json::from_str(&content)?;
    let address = raw
        .token
        .as_ref()
        .and_then(|t| t.address.clone())
        .or(fallback)
        .ok_or_else(|| SourceError::InvalidAddress {
            address: String::new(),
            reason: "no token address in file or file name".to_string(),
        })?;
    validate_address(&address)?;
    Ok(raw.normalize(&address))
}

/// Parse snapshot JSON. When `address` is given it wins over the file's own.
pub fn parse_snapshot(address: Option<&str>, content: &str) -> Result<AnalysisSnapshot, SourceError> {
    let raw: RawSnapshot = serde_json::from_str(content)?;
    let address = match (address, raw.token.as_ref().and_then(|t| t.address.as_deref())) {
        (Some(requested), Some(found)) if requested != found => {
            tracing::warn!(requested, found, "Snapshot address mismatch, using requested address");
            requested.to_string()
        }
        (Some(requested), _) => requested.to_string(),
        (None, Some(found)) => found.to_string(),
        (None, None) => {
            return Err(SourceError::InvalidAddress {
                address: String::new(),
                reason: "snapshot has no token address".to_string(),
            })
        }
    };
    Ok(raw.normalize(&address))
}

// ============================================================================
// Raw file records
// ============================================================================

/// Distinguishes a missing field (`None`) from an explicit `null` (`Some(None)`)
fn nullable<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
struct RawSnapshot {
    timestamp: Option<DateTime<Utc>>,
    token: Option<RawToken>,
    market: Option<RawMarket>,
    #[serde(default)]
    holders: Vec<RawHolder>,
    contract_age_days: Option<f64>,
    prior: Option<RawPrior>,
}

#[derive(Debug, Deserialize)]
struct RawToken {
    address: Option<String>,
    name: Option<String>,
    symbol: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    mint_authority: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    freeze_authority: Option<Option<String>>,
    supply: Option<u64>,
    decimals: Option<u8>,
    is_initialized: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMarket {
    price_usd: Option<f64>,
    price_change_24h: Option<f64>,
    price_change_7d: Option<f64>,
    market_cap_usd: Option<f64>,
    fdv_usd: Option<f64>,
    liquidity_usd: Option<f64>,
    volume_24h_usd: Option<f64>,
    pair_count: Option<u32>,
    dex_platform: Option<String>,
    timeframes: Option<Timeframes>,
    pairs: Vec<PairSnapshot>,
    close_prices: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct RawHolder {
    address: String,
    balance: Option<f64>,
    percent_of_supply: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawPrior {
    timestamp: DateTime<Utc>,
    total_holders: Option<usize>,
    #[serde(default)]
    holders: Vec<RawHolder>,
}

fn authority(field: Option<Option<String>>) -> Authority {
    match field {
        None => Authority::Unknown,
        Some(value) => Authority::from_option(value),
    }
}

fn non_negative(value: Option<f64>) -> f64 {
    finite_or_zero(value.unwrap_or(0.0)).max(0.0)
}

impl RawSnapshot {
    fn normalize(self, address: &str) -> AnalysisSnapshot {
        let timestamp = self.timestamp.unwrap_or_else(|| {
            tracing::warn!(address, "Snapshot has no timestamp, using current time");
            Utc::now()
        });

        let token = match self.token {
            Some(raw) => raw.normalize(address, timestamp),
            None => {
                tracing::warn!(address, "Snapshot has no token block, scoring as unknown token");
                TokenSnapshot::unknown(address, timestamp)
            }
        };

        let market = match self.market {
            Some(raw) => raw.normalize(address),
            None => {
                tracing::warn!(address, "Snapshot has no market block, using empty market");
                MarketSnapshot::unreported()
            }
        };

        let supply = token.ui_supply();
        let holders = normalize_holders(self.holders, supply);

        let contract_age_days = match self.contract_age_days {
            Some(days) => non_negative(Some(days)),
            None => {
                tracing::warn!(address, "Contract age unknown, scoring as brand new");
                0.0
            }
        };

        let prior = self.prior.map(|raw| {
            let holders = normalize_holders(raw.holders, supply);
            PriorSnapshot {
                timestamp: raw.timestamp,
                total_holders: raw.total_holders.unwrap_or(holders.len()),
                holders,
            }
        });

        AnalysisSnapshot {
            token,
            market,
            holders,
            contract_age_days,
            prior,
        }
    }
}

impl RawToken {
    fn normalize(self, address: &str, timestamp: DateTime<Utc>) -> TokenSnapshot {
        if self.mint_authority.is_none() || self.freeze_authority.is_none() {
            tracing::warn!(address, "Authority state missing, scoring as active");
        }
        TokenSnapshot {
            address: address.to_string(),
            timestamp,
            name: self.name.filter(|n| !n.is_empty()).unwrap_or_else(|| "Unknown".to_string()),
            symbol: self
                .symbol
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "UNKNOWN".to_string()),
            mint_authority: authority(self.mint_authority),
            freeze_authority: authority(self.freeze_authority),
            supply: self.supply.unwrap_or(0),
            decimals: self.decimals.unwrap_or(0),
            is_initialized: self.is_initialized.unwrap_or(false),
        }
    }
}

impl RawMarket {
    fn normalize(self, address: &str) -> MarketSnapshot {
        let price_change_24h = self.price_change_24h.filter(|v| v.is_finite());
        let volume_24h_usd = self.volume_24h_usd.filter(|v| v.is_finite());
        let missing = MissingMarketData {
            price_change_24h: price_change_24h.is_none(),
            volume_24h: volume_24h_usd.is_none(),
        };
        if missing.price_change_24h {
            tracing::warn!(address, "24h price change missing, scoring volatility as worst case");
        }
        if missing.volume_24h {
            tracing::warn!(address, "24h volume missing, scoring volume as worst case");
        }

        let mut pairs: Vec<PairSnapshot> = self
            .pairs
            .into_iter()
            .map(|p| PairSnapshot {
                liquidity_usd: non_negative(Some(p.liquidity_usd)),
                volume_h24: non_negative(Some(p.volume_h24)),
                volume_h6: non_negative(Some(p.volume_h6)),
                price_change_h24: finite_or_zero(p.price_change_h24),
                ..p
            })
            .collect();
        pairs.sort_by(|a, b| b.liquidity_usd.total_cmp(&a.liquidity_usd));

        let pair_count = self
            .pair_count
            .unwrap_or_else(|| u32::try_from(pairs.len()).unwrap_or(u32::MAX));

        MarketSnapshot {
            price_usd: non_negative(self.price_usd),
            price_change_24h: price_change_24h.unwrap_or(0.0),
            // Feeds report 0 when the 7-day window is unavailable
            price_change_7d: self.price_change_7d.filter(|v| v.is_finite() && *v != 0.0),
            market_cap_usd: non_negative(self.market_cap_usd),
            fdv_usd: non_negative(self.fdv_usd),
            liquidity_usd: non_negative(self.liquidity_usd),
            volume_24h_usd: non_negative(volume_24h_usd),
            pair_count,
            dex_platform: self.dex_platform,
            timeframes: self.timeframes.unwrap_or_default(),
            pairs,
            close_prices: self.close_prices.into_iter().filter(|p| p.is_finite() && *p > 0.0).collect(),
            missing,
        }
    }
}

fn normalize_holders(raw: Vec<RawHolder>, ui_supply: f64) -> Vec<HolderEntry> {
    let mut holders: Vec<HolderEntry> = raw
        .into_iter()
        .map(|h| {
            let balance = non_negative(h.balance);
            let percent_of_supply = match h.percent_of_supply {
                Some(pct) => non_negative(Some(pct)),
                None => safe_ratio(balance, ui_supply, 0.0) * 100.0,
            };
            HolderEntry {
                address: h.address,
                balance,
                percent_of_supply,
            }
        })
        .collect();
    holders.sort_by(|a, b| {
        b.percent_of_supply
            .total_cmp(&a.percent_of_supply)
            .then_with(|| b.balance.total_cmp(&a.balance))
    });
    holders
}

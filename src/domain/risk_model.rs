//! Risk Factor Model
//!
//! Converts a token/market snapshot into ten bounded risk sub-scores and a
//! weighted overall score with a four-step rating. Alongside the scores it
//! reports typed red and green flags, per-timeframe volume anomalies, a
//! recommendation and short volume insights.
//!
//! Missing inputs are normalized upstream to their most conservative value,
//! so zero liquidity scores as maximal liquidity risk and an unreadable
//! authority scores as active.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::holder_profiler::HolderMetrics;
use super::ratio::clamp_points;
use super::snapshot::{AnalysisSnapshot, Timeframe, Timeframes};
use crate::strategy::params::{RatingThresholds, RiskParams, RiskWeights};

/// Slack added before flooring the weighted sum so 10.1 stays 10 and an
/// exact 20.0 computed as 19.999... still lands on 20
const SCORE_EPSILON: f64 = 1e-6;

/// 5m volume is scaled by this to compare against 1h volume
const FIVE_MINUTE_BUCKETS_PER_HOUR: f64 = 12.0;

/// Overall risk rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskRating {
    Low,
    Medium,
    High,
    Extreme,
}

impl RiskRating {
    /// Step function over the overall score (upper bounds inclusive)
    pub fn from_score(score: u8, thresholds: &RatingThresholds) -> Self {
        if score <= thresholds.low_max {
            RiskRating::Low
        } else if score <= thresholds.medium_max {
            RiskRating::Medium
        } else if score <= thresholds.high_max {
            RiskRating::High
        } else {
            RiskRating::Extreme
        }
    }

    pub fn recommendation(&self) -> Recommendation {
        match self {
            RiskRating::Low => Recommendation::Favorable,
            RiskRating::Medium => Recommendation::Neutral,
            RiskRating::High => Recommendation::Caution,
            RiskRating::Extreme => Recommendation::Avoid,
        }
    }

    /// Qualitative risk/reward label
    pub fn risk_reward(&self) -> &'static str {
        match self {
            RiskRating::Low => "Favorable (Lower Risk / Better Risk-Adjusted Returns)",
            RiskRating::Medium => "Moderate (Manageable Risk / Moderate Return Potential)",
            RiskRating::High => "Poor (Significant Risk / Uncertain Return)",
            RiskRating::Extreme => "Unfavorable (High Risk / Low Expected Return)",
        }
    }
}

impl fmt::Display for RiskRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskRating::Low => write!(f, "LOW"),
            RiskRating::Medium => write!(f, "MEDIUM"),
            RiskRating::High => write!(f, "HIGH"),
            RiskRating::Extreme => write!(f, "EXTREME"),
        }
    }
}

/// Recommendation derived from the rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recommendation {
    Avoid,
    Caution,
    Neutral,
    Favorable,
}

impl Recommendation {
    pub fn description(&self) -> &'static str {
        match self {
            Recommendation::Avoid => {
                "AVOID - High probability of loss. Multiple critical risk factors detected."
            }
            Recommendation::Caution => {
                "CAUTION - Significant risks present. Only consider with thorough due diligence."
            }
            Recommendation::Neutral => "NEUTRAL - Moderate risks. Proceed with caution and position sizing.",
            Recommendation::Favorable => {
                "FAVORABLE - Lower risk profile. Still conduct due diligence before investing."
            }
        }
    }
}

/// Ten independent risk sub-scores, each within 0-100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactors {
    pub mint_authority: u8,
    pub freeze_authority: u8,
    pub liquidity: u8,
    pub holder_concentration: u8,
    pub contract_age: u8,
    pub verification: u8,
    pub scam_pattern: u8,
    pub volume: u8,
    pub volatility: u8,
    pub price_manipulation: u8,
}

impl RiskFactors {
    /// Sub-scores in weight order
    pub fn as_array(&self) -> [u8; 10] {
        [
            self.mint_authority,
            self.freeze_authority,
            self.liquidity,
            self.holder_concentration,
            self.contract_age,
            self.verification,
            self.scam_pattern,
            self.volume,
            self.volatility,
            self.price_manipulation,
        ]
    }

    pub fn weighted_sum(&self, weights: &RiskWeights) -> f64 {
        self.as_array()
            .iter()
            .zip(weights.as_array())
            .map(|(factor, weight)| f64::from(*factor) * weight)
            .sum()
    }
}

/// Overall score plus its rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverallRisk {
    pub score: u8,
    pub rating: RiskRating,
}

/// A specific reason for concern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "timeframe", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RedFlag {
    ContractInBlacklist,
    MintAuthorityActive,
    FreezeAuthorityActive,
    ExtremeWhaleConcentration,
    HighWhaleConcentration,
    VeryLowLiquidity,
    LowLiquidity,
    VolumeSpike(Timeframe),
    SuspiciousTokenName,
}

impl RedFlag {
    /// Flags that describe the market rather than the contract
    pub fn is_market_flag(&self) -> bool {
        matches!(
            self,
            RedFlag::VeryLowLiquidity | RedFlag::LowLiquidity | RedFlag::VolumeSpike(_)
        )
    }
}

impl fmt::Display for RedFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RedFlag::ContractInBlacklist => write!(f, "CONTRACT_IN_BLACKLIST"),
            RedFlag::MintAuthorityActive => write!(f, "MINT_AUTHORITY_ACTIVE - Can inflate supply"),
            RedFlag::FreezeAuthorityActive => write!(f, "FREEZE_AUTHORITY_ACTIVE - Can freeze transfers"),
            RedFlag::ExtremeWhaleConcentration => {
                write!(f, "EXTREME_WHALE_CONCENTRATION - Top 10 holders >80%")
            }
            RedFlag::HighWhaleConcentration => write!(f, "HIGH_WHALE_CONCENTRATION - Top 10 holders >50%"),
            RedFlag::VeryLowLiquidity => write!(f, "VERY_LOW_LIQUIDITY - < $10k, high slippage risk"),
            RedFlag::LowLiquidity => write!(f, "LOW_LIQUIDITY - < $50k"),
            RedFlag::VolumeSpike(tf) => write!(f, "VOLUME_SPIKE_{} - Unusual volume activity", tf),
            RedFlag::SuspiciousTokenName => write!(f, "SUSPICIOUS_TOKEN_NAME"),
        }
    }
}

/// A positive signal about the token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GreenFlag {
    MintAuthorityRevoked,
    FreezeAuthorityRevoked,
    MatureContract,
    GoodHolderDistribution,
    HealthyLiquidity,
    MultipleDexListings,
}

impl fmt::Display for GreenFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GreenFlag::MintAuthorityRevoked => write!(f, "Mint authority revoked - Supply is fixed"),
            GreenFlag::FreezeAuthorityRevoked => {
                write!(f, "Freeze authority revoked - Transfers cannot be frozen")
            }
            GreenFlag::MatureContract => write!(f, "Contract is mature (>90 days old)"),
            GreenFlag::GoodHolderDistribution => write!(f, "Good holder distribution"),
            GreenFlag::HealthyLiquidity => write!(f, "Healthy liquidity (>$100k)"),
            GreenFlag::MultipleDexListings => write!(f, "Listed on multiple DEXs"),
        }
    }
}

/// Volume anomaly read for one timeframe
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeframeAnomaly {
    pub timeframe: Timeframe,
    pub volume_usd: f64,
    pub price_change_pct: f64,
    /// 5m volume out of line with the hour
    pub volume_spike: bool,
    /// Spike or wash pattern; each one adds manipulation risk
    pub suspicious: bool,
}

/// Full output of the risk factor model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub factors: RiskFactors,
    pub overall: OverallRisk,
    pub red_flags: Vec<RedFlag>,
    pub green_flags: Vec<GreenFlag>,
    pub anomalies: Vec<TimeframeAnomaly>,
    pub recommendation: Recommendation,
    pub risk_reward: String,
    pub volume_insights: Vec<String>,
}

impl RiskAssessment {
    pub fn score(&self) -> u8 {
        self.overall.score
    }

    pub fn rating(&self) -> RiskRating {
        self.overall.rating
    }

    pub fn red_flag_labels(&self) -> Vec<String> {
        self.red_flags.iter().map(ToString::to_string).collect()
    }

    pub fn green_flag_labels(&self) -> Vec<String> {
        self.green_flags.iter().map(ToString::to_string).collect()
    }

    pub fn suspicious_timeframes(&self) -> usize {
        self.anomalies.iter().filter(|a| a.suspicious).count()
    }
}

/// Risk factor model
#[derive(Debug, Clone, Default)]
pub struct RiskFactorModel {
    params: RiskParams,
}

impl RiskFactorModel {
    pub fn new(params: RiskParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &RiskParams {
        &self.params
    }

    /// Assess a snapshot given the holder profiler's concentration read
    pub fn assess(&self, snapshot: &AnalysisSnapshot, holders: &HolderMetrics) -> RiskAssessment {
        let top10_pct = holders.top10_concentration_pct;
        let anomalies = self.detect_anomalies(&snapshot.market.timeframes);
        let red_flags = self.red_flags(snapshot, top10_pct, &anomalies);
        let green_flags = self.green_flags(snapshot, top10_pct);
        let suspicious = anomalies.iter().filter(|a| a.suspicious).count();

        let factors = self.factors(snapshot, top10_pct, red_flags.len(), suspicious);
        let overall = self.overall(&factors);
        let volume_insights = self.volume_insights(snapshot, &anomalies);

        RiskAssessment {
            factors,
            overall,
            red_flags,
            green_flags,
            anomalies,
            recommendation: overall.rating.recommendation(),
            risk_reward: overall.rating.risk_reward().to_string(),
            volume_insights,
        }
    }

    /// Compute the ten sub-scores
    pub fn factors(
        &self,
        snapshot: &AnalysisSnapshot,
        top10_pct: f64,
        red_flag_count: usize,
        suspicious_timeframes: usize,
    ) -> RiskFactors {
        let p = &self.params;
        let token = &snapshot.token;
        let market = &snapshot.market;

        let red_flag_count = u32::try_from(red_flag_count).unwrap_or(u32::MAX);
        let suspicious_timeframes = u32::try_from(suspicious_timeframes).unwrap_or(u32::MAX);

        RiskFactors {
            mint_authority: if token.mint_authority.is_present() { p.mint_authority_risk } else { 0 },
            freeze_authority: if token.freeze_authority.is_present() { p.freeze_authority_risk } else { 0 },
            liquidity: p.liquidity.score(market.liquidity_usd),
            holder_concentration: p.concentration.score(top10_pct),
            contract_age: p.contract_age.score(snapshot.contract_age_days),
            verification: if token.is_initialized { 0 } else { p.unverified_risk },
            scam_pattern: clamp_points(red_flag_count.saturating_mul(p.red_flag_points)),
            volume: if market.missing.volume_24h {
                p.volume.worst()
            } else {
                self.volume_risk(market.vol_liq_ratio())
            },
            volatility: if market.missing.price_change_24h {
                p.volatility.worst()
            } else {
                p.volatility.score(market.price_change_24h.abs())
            },
            price_manipulation: clamp_points(suspicious_timeframes.saturating_mul(p.manipulation_points)),
        }
    }

    /// Volume risk from the 24h volume / liquidity ratio
    pub fn volume_risk(&self, vol_liq_ratio: f64) -> u8 {
        let v = &self.params.volume;
        if vol_liq_ratio > v.wash_ratio {
            v.wash_risk
        } else if vol_liq_ratio > v.elevated_ratio {
            v.elevated_risk
        } else if vol_liq_ratio < v.dead_ratio {
            v.dead_risk
        } else {
            v.normal_risk
        }
    }

    /// Weighted overall score, floored to an integer and capped at 100
    pub fn overall(&self, factors: &RiskFactors) -> OverallRisk {
        let weighted = factors.weighted_sum(&self.params.weights);
        let score = (weighted + SCORE_EPSILON).floor().clamp(0.0, 100.0) as u8;
        OverallRisk {
            score,
            rating: RiskRating::from_score(score, &self.params.rating),
        }
    }

    pub fn rating(&self, score: u8) -> RiskRating {
        RiskRating::from_score(score, &self.params.rating)
    }

    /// Flag spike and wash-trading patterns per timeframe
    pub fn detect_anomalies(&self, timeframes: &Timeframes) -> Vec<TimeframeAnomaly> {
        let flags = &self.params.flags;
        let hour_volume = timeframes.h1.volume_usd;

        timeframes
            .anomaly_frames()
            .iter()
            .map(|(timeframe, stats)| {
                let volume_spike = *timeframe == Timeframe::M5
                    && hour_volume > 0.0
                    && stats.volume_usd * FIVE_MINUTE_BUCKETS_PER_HOUR / hour_volume > flags.spike_ratio;
                let wash = stats.volume_usd > flags.wash_volume_usd
                    && stats.price_change_pct.abs() < flags.wash_max_change_pct;
                TimeframeAnomaly {
                    timeframe: *timeframe,
                    volume_usd: stats.volume_usd,
                    price_change_pct: stats.price_change_pct,
                    volume_spike,
                    suspicious: volume_spike || wash,
                }
            })
            .collect()
    }

    pub fn red_flags(
        &self,
        snapshot: &AnalysisSnapshot,
        top10_pct: f64,
        anomalies: &[TimeframeAnomaly],
    ) -> Vec<RedFlag> {
        let flags = &self.params.flags;
        let token = &snapshot.token;
        let liquidity = snapshot.market.liquidity_usd;
        let mut red = Vec::new();

        if flags.blacklist.iter().any(|a| a == &token.address) {
            red.push(RedFlag::ContractInBlacklist);
        }
        if token.mint_authority.is_present() {
            red.push(RedFlag::MintAuthorityActive);
        }
        if token.freeze_authority.is_present() {
            red.push(RedFlag::FreezeAuthorityActive);
        }

        if top10_pct > flags.extreme_concentration_pct {
            red.push(RedFlag::ExtremeWhaleConcentration);
        } else if top10_pct > flags.high_concentration_pct {
            red.push(RedFlag::HighWhaleConcentration);
        }

        if liquidity < flags.very_low_liquidity_usd {
            red.push(RedFlag::VeryLowLiquidity);
        } else if liquidity < flags.low_liquidity_usd {
            red.push(RedFlag::LowLiquidity);
        }

        red.extend(
            anomalies
                .iter()
                .filter(|a| a.suspicious && a.volume_spike)
                .map(|a| RedFlag::VolumeSpike(a.timeframe)),
        );

        let name = token.name.to_lowercase();
        if flags.suspicious_names.iter().any(|n| n.to_lowercase() == name) {
            red.push(RedFlag::SuspiciousTokenName);
        }
        red
    }

    pub fn green_flags(&self, snapshot: &AnalysisSnapshot, top10_pct: f64) -> Vec<GreenFlag> {
        let flags = &self.params.flags;
        let mut green = Vec::new();

        if !snapshot.token.mint_authority.is_present() {
            green.push(GreenFlag::MintAuthorityRevoked);
        }
        if !snapshot.token.freeze_authority.is_present() {
            green.push(GreenFlag::FreezeAuthorityRevoked);
        }
        if snapshot.contract_age_days > flags.mature_age_days {
            green.push(GreenFlag::MatureContract);
        }
        if top10_pct < flags.distributed_concentration_pct {
            green.push(GreenFlag::GoodHolderDistribution);
        }
        if snapshot.market.liquidity_usd > flags.healthy_liquidity_usd {
            green.push(GreenFlag::HealthyLiquidity);
        }
        if snapshot.market.pair_count > flags.multi_dex_pairs {
            green.push(GreenFlag::MultipleDexListings);
        }
        green
    }

    fn volume_insights(&self, snapshot: &AnalysisSnapshot, anomalies: &[TimeframeAnomaly]) -> Vec<String> {
        let market = &snapshot.market;
        let v = &self.params.volume;
        let mut insights = Vec::new();

        if market.volume_24h_usd > 0.0 {
            insights.push(format!("24h Volume: ${:.2}", market.volume_24h_usd));
            if market.liquidity_usd > 0.0 {
                let ratio = market.vol_liq_ratio();
                insights.push(format!("Volume/Liquidity Ratio: {:.2}x", ratio));
                if ratio > v.elevated_ratio {
                    insights.push("Very high volume relative to liquidity (possible wash trading)".to_string());
                } else if ratio < v.dead_ratio {
                    insights.push("Very low trading activity".to_string());
                }
            }
        }

        if market.timeframes.h1.volume_usd > 0.0 {
            insights.push(format!("1h Volume: ${:.2}", market.timeframes.h1.volume_usd));
        }

        if anomalies
            .iter()
            .any(|a| a.timeframe == Timeframe::M5 && a.suspicious)
        {
            insights.push("Recent volume spike detected in 5m timeframe".to_string());
        }

        let change = market.price_change_24h;
        if change.abs() > self.params.flags.extreme_move_pct {
            insights.push(format!("Extreme 24h price movement: {:+.2}%", change));
        }
        insights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::holder_profiler::{ConcentrationRisk, NetFlow};
    use crate::domain::snapshot::{Authority, FrameStats, MissingMarketData};
    use chrono::{TimeZone, Utc};

    fn create_safe_token() -> AnalysisSnapshot {
        let ts = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let mut snapshot = AnalysisSnapshot::empty("So11111111111111111111111111111111111111112", ts);
        snapshot.token.name = "Safe Token".to_string();
        snapshot.token.mint_authority = Authority::Revoked;
        snapshot.token.freeze_authority = Authority::Revoked;
        snapshot.token.is_initialized = true;
        snapshot.market.price_usd = 1.0;
        snapshot.market.liquidity_usd = 1_200_000.0;
        snapshot.market.volume_24h_usd = 3_000_000.0;
        snapshot.market.price_change_24h = 4.0;
        snapshot.market.pair_count = 3;
        snapshot.contract_age_days = 120.0;
        snapshot
    }

    fn metrics(top10_pct: f64) -> HolderMetrics {
        HolderMetrics {
            total_holders: 10,
            smart_money_count: 0,
            whale_count: 0,
            smart_money_holdings_pct: 0.0,
            top10_concentration_pct: top10_pct,
            concentration_risk: ConcentrationRisk::Low,
            smart_money_buying: false,
            smart_money_selling: false,
            net_flow: NetFlow::Neutral,
            holder_growth_rate: None,
        }
    }

    fn factors_with(value: u8) -> RiskFactors {
        RiskFactors {
            mint_authority: value,
            freeze_authority: value,
            liquidity: value,
            holder_concentration: value,
            contract_age: value,
            verification: value,
            scam_pattern: value,
            volume: value,
            volatility: value,
            price_manipulation: value,
        }
    }

    #[test]
    fn test_safe_token_scores_low() {
        let model = RiskFactorModel::default();
        let assessment = model.assess(&create_safe_token(), &metrics(25.0));

        let f = assessment.factors;
        assert_eq!(f.mint_authority, 0);
        assert_eq!(f.freeze_authority, 0);
        assert_eq!(f.liquidity, 10);
        assert_eq!(f.holder_concentration, 20);
        assert_eq!(f.contract_age, 10);
        assert_eq!(f.volume, 30);
        assert_eq!(f.volatility, 30);
        assert_eq!(f.scam_pattern, 0);
        assert_eq!(assessment.overall.score, 10);
        assert_eq!(assessment.rating(), RiskRating::Low);
        assert_eq!(assessment.recommendation, Recommendation::Favorable);
        assert!(assessment.red_flags.is_empty());
    }

    #[test]
    fn test_rug_profile_rates_at_least_high() {
        let model = RiskFactorModel::default();
        let mut snapshot = create_safe_token();
        snapshot.token.mint_authority = Authority::Active("Auth".to_string());
        snapshot.token.freeze_authority = Authority::Active("Auth".to_string());
        snapshot.market.liquidity_usd = 5_000.0;
        let assessment = model.assess(&snapshot, &metrics(95.0));

        assert_eq!(assessment.factors.mint_authority, 100);
        assert_eq!(assessment.factors.freeze_authority, 80);
        assert_eq!(assessment.factors.liquidity, 100);
        assert_eq!(assessment.factors.holder_concentration, 100);
        assert!(assessment.overall.score > 40);
        assert!(assessment.rating() >= RiskRating::High);
        assert!(assessment.red_flags.contains(&RedFlag::ExtremeWhaleConcentration));
        assert!(assessment.red_flags.contains(&RedFlag::VeryLowLiquidity));
    }

    #[test]
    fn test_liquidity_tiers() {
        let model = RiskFactorModel::default();
        let tiers = &model.params().liquidity;
        assert_eq!(tiers.score(1_000_000.01), 10);
        assert_eq!(tiers.score(1_000_000.0), 20);
        assert_eq!(tiers.score(500_000.0), 40);
        assert_eq!(tiers.score(100_000.0), 60);
        assert_eq!(tiers.score(50_000.0), 80);
        assert_eq!(tiers.score(10_000.0), 100);
    }

    #[test]
    fn test_concentration_tiers() {
        let model = RiskFactorModel::default();
        let tiers = &model.params().concentration;
        assert_eq!(tiers.score(90.1), 100);
        assert_eq!(tiers.score(90.0), 80);
        assert_eq!(tiers.score(70.0), 60);
        assert_eq!(tiers.score(50.0), 40);
        assert_eq!(tiers.score(30.0), 20);
    }

    #[test]
    fn test_age_tiers() {
        let model = RiskFactorModel::default();
        let tiers = &model.params().contract_age;
        assert_eq!(tiers.score(0.0), 90);
        assert_eq!(tiers.score(1.0), 70);
        assert_eq!(tiers.score(7.0), 50);
        assert_eq!(tiers.score(30.0), 30);
        assert_eq!(tiers.score(90.0), 10);
    }

    #[test]
    fn test_volume_risk_bands() {
        let model = RiskFactorModel::default();
        assert_eq!(model.volume_risk(10.01), 80);
        assert_eq!(model.volume_risk(10.0), 60);
        assert_eq!(model.volume_risk(5.0), 30);
        assert_eq!(model.volume_risk(0.1), 30);
        assert_eq!(model.volume_risk(0.09), 70);
        assert_eq!(model.volume_risk(0.0), 70);
    }

    #[test]
    fn test_volatility_tiers() {
        let model = RiskFactorModel::default();
        let tiers = &model.params().volatility;
        assert_eq!(tiers.score(100.1), 90);
        assert_eq!(tiers.score(100.0), 70);
        assert_eq!(tiers.score(50.0), 50);
        assert_eq!(tiers.score(20.0), 30);
    }

    #[test]
    fn test_rating_boundaries() {
        let model = RiskFactorModel::default();
        assert_eq!(model.rating(0), RiskRating::Low);
        assert_eq!(model.rating(20), RiskRating::Low);
        assert_eq!(model.rating(21), RiskRating::Medium);
        assert_eq!(model.rating(40), RiskRating::Medium);
        assert_eq!(model.rating(41), RiskRating::High);
        assert_eq!(model.rating(60), RiskRating::High);
        assert_eq!(model.rating(61), RiskRating::Extreme);
        assert_eq!(model.rating(100), RiskRating::Extreme);
    }

    #[test]
    fn test_overall_uniform_factors() {
        let model = RiskFactorModel::default();
        assert_eq!(model.overall(&factors_with(0)).score, 0);
        assert_eq!(model.overall(&factors_with(20)).score, 20);
        assert_eq!(model.overall(&factors_with(100)).score, 100);
    }

    #[test]
    fn test_unknown_authority_scored_as_active() {
        let model = RiskFactorModel::default();
        let mut snapshot = create_safe_token();
        snapshot.token.mint_authority = Authority::Unknown;
        let assessment = model.assess(&snapshot, &metrics(25.0));
        assert_eq!(assessment.factors.mint_authority, 100);
        assert!(assessment.red_flags.contains(&RedFlag::MintAuthorityActive));
        assert!(!assessment.green_flags.contains(&GreenFlag::MintAuthorityRevoked));
    }

    #[test]
    fn test_scam_pattern_caps_at_100() {
        let model = RiskFactorModel::default();
        let factors = model.factors(&create_safe_token(), 25.0, 14, 0);
        assert_eq!(factors.scam_pattern, 100);
        let factors = model.factors(&create_safe_token(), 25.0, 3, 9);
        assert_eq!(factors.scam_pattern, 30);
        assert_eq!(factors.price_manipulation, 100);
    }

    #[test]
    fn test_five_minute_spike_detection() {
        let model = RiskFactorModel::default();
        let timeframes = Timeframes {
            m5: FrameStats { volume_usd: 5_000.0, price_change_pct: 3.0 },
            h1: FrameStats { volume_usd: 15_000.0, price_change_pct: 6.0 },
            ..Timeframes::default()
        };
        // 5k * 12 / 15k = 4 > 3
        let anomalies = model.detect_anomalies(&timeframes);
        let m5 = anomalies.iter().find(|a| a.timeframe == Timeframe::M5).unwrap();
        assert!(m5.volume_spike);
        assert!(m5.suspicious);
        let h1 = anomalies.iter().find(|a| a.timeframe == Timeframe::H1).unwrap();
        assert!(!h1.suspicious);
    }

    #[test]
    fn test_wash_pattern_detection() {
        let model = RiskFactorModel::default();
        let timeframes = Timeframes {
            h1: FrameStats { volume_usd: 20_000.0, price_change_pct: 0.2 },
            h24: FrameStats { volume_usd: 400_000.0, price_change_pct: -0.4 },
            ..Timeframes::default()
        };
        let anomalies = model.detect_anomalies(&timeframes);
        let suspicious: Vec<Timeframe> = anomalies.iter().filter(|a| a.suspicious).map(|a| a.timeframe).collect();
        assert_eq!(suspicious, vec![Timeframe::H1, Timeframe::H24]);
        assert!(anomalies.iter().all(|a| !a.volume_spike));

        let mut snapshot = create_safe_token();
        snapshot.market.timeframes = timeframes;
        let assessment = model.assess(&snapshot, &metrics(25.0));
        assert_eq!(assessment.factors.price_manipulation, 30);
        assert!(!assessment.red_flags.iter().any(|f| matches!(f, RedFlag::VolumeSpike(_))));
    }

    #[test]
    fn test_volume_spike_red_flag_label() {
        let flag = RedFlag::VolumeSpike(Timeframe::M5);
        assert_eq!(flag.to_string(), "VOLUME_SPIKE_5m - Unusual volume activity");
        assert!(flag.is_market_flag());
    }

    #[test]
    fn test_suspicious_name_and_blacklist() {
        let mut params = RiskParams::default();
        params.flags.blacklist = vec!["So11111111111111111111111111111111111111112".to_string()];
        let model = RiskFactorModel::new(params);
        let mut snapshot = create_safe_token();
        snapshot.token.name = "SCAM".to_string();
        let red = model.red_flags(&snapshot, 25.0, &[]);
        assert_eq!(red, vec![RedFlag::ContractInBlacklist, RedFlag::SuspiciousTokenName]);
    }

    #[test]
    fn test_green_flags() {
        let model = RiskFactorModel::default();
        let green = model.green_flags(&create_safe_token(), 25.0);
        assert_eq!(
            green,
            vec![
                GreenFlag::MintAuthorityRevoked,
                GreenFlag::FreezeAuthorityRevoked,
                GreenFlag::MatureContract,
                GreenFlag::GoodHolderDistribution,
                GreenFlag::HealthyLiquidity,
                GreenFlag::MultipleDexListings,
            ]
        );
    }

    #[test]
    fn test_empty_snapshot_is_worst_case() {
        let model = RiskFactorModel::default();
        let ts = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let snapshot = AnalysisSnapshot::empty("Mint", ts);
        let assessment = model.assess(&snapshot, &metrics(100.0));
        assert_eq!(assessment.factors.liquidity, 100);
        assert_eq!(assessment.factors.mint_authority, 100);
        assert_eq!(assessment.factors.volume, 70);
        assert_eq!(assessment.rating(), RiskRating::Extreme);
        assert_eq!(assessment.recommendation, Recommendation::Avoid);
    }

    #[test]
    fn test_unreported_market_fields_score_worst_case() {
        let model = RiskFactorModel::default();
        let mut snapshot = create_safe_token();
        let reported = model.factors(&snapshot, 25.0, 0, 0);
        assert_eq!(reported.volume, 30);
        assert_eq!(reported.volatility, 30);

        snapshot.market.missing = MissingMarketData::all();
        let unreported = model.factors(&snapshot, 25.0, 0, 0);
        assert_eq!(unreported.volume, 80);
        assert_eq!(unreported.volatility, 90);
        assert!(model.overall(&unreported).score > model.overall(&reported).score);
    }

    #[test]
    fn test_extreme_move_threshold_is_configurable() {
        let mut params = RiskParams::default();
        params.flags.extreme_move_pct = 80.0;
        let model = RiskFactorModel::new(params);
        let mut snapshot = create_safe_token();
        snapshot.market.price_change_24h = -62.5;
        let assessment = model.assess(&snapshot, &metrics(25.0));
        assert!(!assessment
            .volume_insights
            .iter()
            .any(|i| i.starts_with("Extreme 24h price movement")));
    }

    #[test]
    fn test_volume_insights() {
        let model = RiskFactorModel::default();
        let mut snapshot = create_safe_token();
        snapshot.market.volume_24h_usd = 7_000_000.0;
        snapshot.market.price_change_24h = -62.5;
        let assessment = model.assess(&snapshot, &metrics(25.0));
        assert!(assessment.volume_insights.contains(&"Volume/Liquidity Ratio: 5.83x".to_string()));
        assert!(assessment
            .volume_insights
            .iter()
            .any(|i| i.contains("possible wash trading")));
        assert!(assessment
            .volume_insights
            .contains(&"Extreme 24h price movement: -62.50%".to_string()));
    }
}

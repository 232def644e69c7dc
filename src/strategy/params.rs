//! Engine Parameters
//!
//! Every weight, tier cut-off and percentage step used by the scoring
//! engine. Defaults reproduce the reference scoring tables; any section can
//! be overridden from the `[engine]` table of the config file.

use serde::{Deserialize, Serialize};

/// Tolerance used when checking that a weight set sums to 1.0
const WEIGHT_SUM_TOLERANCE: f64 = 0.001;

// ============================================================================
// Step tables
// ============================================================================

/// One step of a step-function table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub threshold: f64,
    pub score: u8,
}

impl Tier {
    pub const fn new(threshold: f64, score: u8) -> Self {
        Self { threshold, score }
    }
}

/// Table matched top-down: the first tier with `value > threshold` wins.
/// Thresholds must be strictly descending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AboveTiers {
    pub tiers: Vec<Tier>,
    pub otherwise: u8,
}

impl AboveTiers {
    pub fn score(&self, value: f64) -> u8 {
        if value.is_nan() {
            return self.worst();
        }
        self.tiers
            .iter()
            .find(|t| value > t.threshold)
            .map(|t| t.score)
            .unwrap_or(self.otherwise)
    }

    /// Highest score the table can produce
    pub fn worst(&self) -> u8 {
        self.tiers.iter().map(|t| t.score).fold(self.otherwise, u8::max)
    }

    fn validate(&self, table: &'static str) -> Result<(), ParamsError> {
        let descending = self.tiers.windows(2).all(|w| w[0].threshold > w[1].threshold);
        if !descending {
            return Err(ParamsError::UnorderedTiers(table));
        }
        if self.tiers.iter().any(|t| t.score > 100) || self.otherwise > 100 {
            return Err(ParamsError::ScoreOutOfRange(table));
        }
        Ok(())
    }
}

/// Table matched bottom-up: the first tier with `value < threshold` wins.
/// Thresholds must be strictly ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BelowTiers {
    pub tiers: Vec<Tier>,
    pub otherwise: u8,
}

impl BelowTiers {
    pub fn score(&self, value: f64) -> u8 {
        if value.is_nan() {
            return self.worst();
        }
        self.tiers
            .iter()
            .find(|t| value < t.threshold)
            .map(|t| t.score)
            .unwrap_or(self.otherwise)
    }

    pub fn worst(&self) -> u8 {
        self.tiers.iter().map(|t| t.score).fold(self.otherwise, u8::max)
    }

    fn validate(&self, table: &'static str) -> Result<(), ParamsError> {
        let ascending = self.tiers.windows(2).all(|w| w[0].threshold < w[1].threshold);
        if !ascending {
            return Err(ParamsError::UnorderedTiers(table));
        }
        if self.tiers.iter().any(|t| t.score > 100) || self.otherwise > 100 {
            return Err(ParamsError::ScoreOutOfRange(table));
        }
        Ok(())
    }
}

// ============================================================================
// Top-level
// ============================================================================

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineParams {
    pub risk: RiskParams,
    pub holders: HolderParams,
    pub volume: VolumeParams,
    pub technical: TechnicalParams,
    pub patterns: PatternParams,
    pub signal: SignalParams,
    pub setup: SetupParams,
}

impl EngineParams {
    /// Replace the risk factor weights
    pub fn with_risk_weights(mut self, weights: RiskWeights) -> Self {
        self.risk.weights = weights;
        self
    }

    /// Replace the combined signal weights
    pub fn with_signal_weights(mut self, weights: SignalWeights) -> Self {
        self.signal.weights = weights;
        self
    }

    /// Turn on prior-snapshot holder flow comparison
    pub fn with_flow_history(mut self, enabled: bool) -> Self {
        self.holders.flow_history_enabled = enabled;
        self
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), ParamsError> {
        self.risk.validate()?;
        self.holders.validate()?;
        self.volume.validate()?;
        self.technical.validate()?;
        self.patterns.validate()?;
        self.signal.validate()?;
        self.setup.validate()?;
        Ok(())
    }
}

// ============================================================================
// Risk factor model
// ============================================================================

/// Weights of the ten risk factors in the overall score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskWeights {
    pub mint_authority: f64,
    pub freeze_authority: f64,
    pub liquidity: f64,
    pub holder_concentration: f64,
    pub contract_age: f64,
    pub verification: f64,
    pub scam_pattern: f64,
    pub volume: f64,
    pub volatility: f64,
    pub price_manipulation: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            mint_authority: 0.15,
            freeze_authority: 0.08,
            liquidity: 0.15,
            holder_concentration: 0.12,
            contract_age: 0.08,
            verification: 0.07,
            scam_pattern: 0.12,
            volume: 0.10,
            volatility: 0.08,
            price_manipulation: 0.05,
        }
    }
}

impl RiskWeights {
    pub fn as_array(&self) -> [f64; 10] {
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

    pub fn sum(&self) -> f64 {
        self.as_array().iter().sum()
    }
}

/// Volume/liquidity ratio bands for volume risk
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeRiskParams {
    /// Ratio above which wash trading is suspected
    pub wash_ratio: f64,
    pub wash_risk: u8,
    pub elevated_ratio: f64,
    pub elevated_risk: u8,
    /// Ratio below which the market is considered dead
    pub dead_ratio: f64,
    pub dead_risk: u8,
    pub normal_risk: u8,
}

impl Default for VolumeRiskParams {
    fn default() -> Self {
        Self {
            wash_ratio: 10.0,
            wash_risk: 80,
            elevated_ratio: 5.0,
            elevated_risk: 60,
            dead_ratio: 0.1,
            dead_risk: 70,
            normal_risk: 30,
        }
    }
}

impl VolumeRiskParams {
    /// Charged when the 24h volume was not reported
    pub fn worst(&self) -> u8 {
        [self.wash_risk, self.elevated_risk, self.dead_risk, self.normal_risk]
            .into_iter()
            .fold(0, u8::max)
    }
}

/// Upper bounds (inclusive) of the LOW / MEDIUM / HIGH ratings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingThresholds {
    pub low_max: u8,
    pub medium_max: u8,
    pub high_max: u8,
}

impl Default for RatingThresholds {
    fn default() -> Self {
        Self {
            low_max: 20,
            medium_max: 40,
            high_max: 60,
        }
    }
}

/// Thresholds for red and green flag detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlagParams {
    pub extreme_concentration_pct: f64,
    pub high_concentration_pct: f64,
    pub very_low_liquidity_usd: f64,
    pub low_liquidity_usd: f64,
    /// 5m volume annualized to 1h, relative to actual 1h volume
    pub spike_ratio: f64,
    /// Minimum volume for a flat-price timeframe to look like wash trading
    pub wash_volume_usd: f64,
    pub wash_max_change_pct: f64,
    pub mature_age_days: f64,
    pub distributed_concentration_pct: f64,
    pub healthy_liquidity_usd: f64,
    pub multi_dex_pairs: u32,
    /// Absolute 24h change reported as extreme in volume insights
    pub extreme_move_pct: f64,
    pub blacklist: Vec<String>,
    pub suspicious_names: Vec<String>,
}

impl Default for FlagParams {
    fn default() -> Self {
        Self {
            extreme_concentration_pct: 80.0,
            high_concentration_pct: 50.0,
            very_low_liquidity_usd: 10_000.0,
            low_liquidity_usd: 50_000.0,
            spike_ratio: 3.0,
            wash_volume_usd: 10_000.0,
            wash_max_change_pct: 0.5,
            mature_age_days: 90.0,
            distributed_concentration_pct: 30.0,
            healthy_liquidity_usd: 100_000.0,
            multi_dex_pairs: 2,
            extreme_move_pct: 50.0,
            blacklist: Vec::new(),
            suspicious_names: vec!["test".to_string(), "fake".to_string(), "scam".to_string()],
        }
    }
}

/// Risk factor model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskParams {
    pub weights: RiskWeights,
    pub mint_authority_risk: u8,
    pub freeze_authority_risk: u8,
    /// Liquidity USD, highest tier first
    pub liquidity: AboveTiers,
    /// Top-10 concentration percent, highest tier first
    pub concentration: AboveTiers,
    /// Contract age in days, youngest tier first
    pub contract_age: BelowTiers,
    pub unverified_risk: u8,
    pub red_flag_points: u32,
    pub volume: VolumeRiskParams,
    /// Absolute 24h price change percent, highest tier first
    pub volatility: AboveTiers,
    pub manipulation_points: u32,
    pub rating: RatingThresholds,
    pub flags: FlagParams,
}

impl Default for RiskParams {
    fn default() -> Self {
        Self {
            weights: RiskWeights::default(),
            mint_authority_risk: 100,
            freeze_authority_risk: 80,
            liquidity: AboveTiers {
                tiers: vec![
                    Tier::new(1_000_000.0, 10),
                    Tier::new(500_000.0, 20),
                    Tier::new(100_000.0, 40),
                    Tier::new(50_000.0, 60),
                    Tier::new(10_000.0, 80),
                ],
                otherwise: 100,
            },
            concentration: AboveTiers {
                tiers: vec![
                    Tier::new(90.0, 100),
                    Tier::new(70.0, 80),
                    Tier::new(50.0, 60),
                    Tier::new(30.0, 40),
                ],
                otherwise: 20,
            },
            contract_age: BelowTiers {
                tiers: vec![
                    Tier::new(1.0, 90),
                    Tier::new(7.0, 70),
                    Tier::new(30.0, 50),
                    Tier::new(90.0, 30),
                ],
                otherwise: 10,
            },
            unverified_risk: 50,
            red_flag_points: 10,
            volume: VolumeRiskParams::default(),
            volatility: AboveTiers {
                tiers: vec![Tier::new(100.0, 90), Tier::new(50.0, 70), Tier::new(20.0, 50)],
                otherwise: 30,
            },
            manipulation_points: 15,
            rating: RatingThresholds::default(),
            flags: FlagParams::default(),
        }
    }
}

impl RiskParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        let sum = self.weights.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ParamsError::InvalidWeights("risk", sum));
        }
        if self.weights.as_array().iter().any(|w| *w < 0.0) {
            return Err(ParamsError::InvalidWeights("risk", sum));
        }
        self.liquidity.validate("risk.liquidity")?;
        self.concentration.validate("risk.concentration")?;
        self.contract_age.validate("risk.contract_age")?;
        self.volatility.validate("risk.volatility")?;

        if self.mint_authority_risk > 100 || self.freeze_authority_risk > 100 || self.unverified_risk > 100 {
            return Err(ParamsError::ScoreOutOfRange("risk.authority"));
        }
        let v = &self.volume;
        if !(v.dead_ratio < v.elevated_ratio && v.elevated_ratio < v.wash_ratio) {
            return Err(ParamsError::InvalidRange(
                "risk.volume",
                format!("need dead < elevated < wash, got {} / {} / {}", v.dead_ratio, v.elevated_ratio, v.wash_ratio),
            ));
        }
        let r = &self.rating;
        if !(r.low_max < r.medium_max && r.medium_max < r.high_max && r.high_max < 100) {
            return Err(ParamsError::InvalidRange(
                "risk.rating",
                format!("need low < medium < high < 100, got {} / {} / {}", r.low_max, r.medium_max, r.high_max),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Holder profiler
// ============================================================================

/// Holder classification and concentration settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HolderParams {
    /// Percent of supply at or above which a holder is a whale
    pub whale_pct: f64,
    /// Minimum percent held for the holding-size smart money heuristic
    pub smart_money_min_pct: f64,
    /// Minimum USD balance for the holding-size smart money heuristic
    pub smart_money_min_usd: f64,
    /// Number of top holders profiled
    pub profile_limit: usize,
    /// Number of top holders summed for concentration
    pub concentration_top_n: usize,
    pub high_concentration_pct: f64,
    pub medium_concentration_pct: f64,
    /// A smart wallet above this USD balance counts toward "buying"
    pub buying_wallet_usd: f64,
    /// Buying requires strictly more than this many such wallets
    pub buying_wallet_count: usize,
    /// Compare against the prior snapshot for selling and growth
    pub flow_history_enabled: bool,
    /// Balance drop (percent) that counts a smart wallet as selling
    pub selling_drop_pct: f64,
    /// Selling requires strictly more than this many such wallets
    pub selling_wallet_count: usize,
}

impl Default for HolderParams {
    fn default() -> Self {
        Self {
            whale_pct: 1.0,
            smart_money_min_pct: 0.5,
            smart_money_min_usd: 5_000.0,
            profile_limit: 20,
            concentration_top_n: 10,
            high_concentration_pct: 50.0,
            medium_concentration_pct: 30.0,
            buying_wallet_usd: 10_000.0,
            buying_wallet_count: 2,
            flow_history_enabled: false,
            selling_drop_pct: 10.0,
            selling_wallet_count: 2,
        }
    }
}

impl HolderParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.whale_pct <= 0.0 || self.whale_pct > 100.0 {
            return Err(ParamsError::InvalidPercent("holders.whale_pct", self.whale_pct));
        }
        if self.medium_concentration_pct >= self.high_concentration_pct {
            return Err(ParamsError::InvalidRange(
                "holders.concentration",
                format!(
                    "medium ({}) must be below high ({})",
                    self.medium_concentration_pct, self.high_concentration_pct
                ),
            ));
        }
        if self.concentration_top_n == 0 || self.profile_limit < self.concentration_top_n {
            return Err(ParamsError::InvalidRange(
                "holders.profile_limit",
                format!(
                    "profile_limit ({}) must cover concentration_top_n ({}) and be > 0",
                    self.profile_limit, self.concentration_top_n
                ),
            ));
        }
        if self.selling_drop_pct <= 0.0 || self.selling_drop_pct > 100.0 {
            return Err(ParamsError::InvalidPercent("holders.selling_drop_pct", self.selling_drop_pct));
        }
        Ok(())
    }
}

// ============================================================================
// Volume momentum
// ============================================================================

/// Volume trend and pressure settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeParams {
    /// Pairs aggregated, in liquidity order
    pub max_pairs: usize,
    pub spike_ratio: f64,
    pub increasing_ratio: f64,
    pub decreasing_ratio: f64,
    /// Share of a pair's volume attributed to buys on an up day
    pub up_day_buy_share: f64,
    /// Net pressure needed for an accumulation/distribution call
    pub pressure_threshold: f64,
    pub dominant_score: f64,
    pub recessive_score: f64,
    pub neutral_score: f64,
    /// Net pressure reported as strong in insights
    pub strong_pressure: f64,
}

impl Default for VolumeParams {
    fn default() -> Self {
        Self {
            max_pairs: 5,
            spike_ratio: 2.5,
            increasing_ratio: 1.5,
            decreasing_ratio: 0.7,
            up_day_buy_share: 0.6,
            pressure_threshold: 20.0,
            dominant_score: 80.0,
            recessive_score: 20.0,
            neutral_score: 50.0,
            strong_pressure: 30.0,
        }
    }
}

impl VolumeParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.max_pairs == 0 {
            return Err(ParamsError::InvalidRange("volume.max_pairs", "must be > 0".to_string()));
        }
        if !(self.decreasing_ratio < 1.0 && self.increasing_ratio > 1.0 && self.spike_ratio > self.increasing_ratio) {
            return Err(ParamsError::InvalidRange(
                "volume.ratios",
                format!(
                    "need decreasing < 1 < increasing < spike, got {} / {} / {}",
                    self.decreasing_ratio, self.increasing_ratio, self.spike_ratio
                ),
            ));
        }
        if !(0.0..=1.0).contains(&self.up_day_buy_share) {
            return Err(ParamsError::InvalidRange(
                "volume.up_day_buy_share",
                format!("must be within 0-1, got {}", self.up_day_buy_share),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Technical momentum
// ============================================================================

/// RSI approximation and trend settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechnicalParams {
    /// 24h change beyond which RSI leaves the linear band
    pub rsi_extreme_change_pct: f64,
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
    pub rsi_change_divisor: f64,
    pub rsi_max_extension: f64,
    /// Period for RSI from close prices
    pub rsi_period: usize,
    /// 24h change needed to call a trend
    pub trend_change_pct: f64,
    pub strength_multiplier: f64,
    pub sideways_strength: f64,
    pub uptrend_support: f64,
    pub default_support: f64,
    pub downtrend_resistance: f64,
    pub default_resistance: f64,
    /// Volatility above which the trading horizon is scalping
    pub scalping_volatility_pct: f64,
}

impl Default for TechnicalParams {
    fn default() -> Self {
        Self {
            rsi_extreme_change_pct: 10.0,
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
            rsi_change_divisor: 2.0,
            rsi_max_extension: 25.0,
            rsi_period: 14,
            trend_change_pct: 5.0,
            strength_multiplier: 3.0,
            sideways_strength: 20.0,
            uptrend_support: 0.90,
            default_support: 0.95,
            downtrend_resistance: 1.10,
            default_resistance: 1.05,
            scalping_volatility_pct: 50.0,
        }
    }
}

impl TechnicalParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if !(0.0 < self.rsi_oversold && self.rsi_oversold < self.rsi_overbought && self.rsi_overbought < 100.0) {
            return Err(ParamsError::InvalidRange(
                "technical.rsi",
                format!("need 0 < oversold < overbought < 100, got {} / {}", self.rsi_oversold, self.rsi_overbought),
            ));
        }
        if self.rsi_change_divisor <= 0.0 || self.rsi_period == 0 {
            return Err(ParamsError::InvalidRange(
                "technical.rsi",
                "divisor and period must be > 0".to_string(),
            ));
        }
        if self.uptrend_support >= 1.0 || self.default_support >= 1.0 {
            return Err(ParamsError::InvalidRange("technical.support", "support must sit below price".to_string()));
        }
        if self.downtrend_resistance <= 1.0 || self.default_resistance <= 1.0 {
            return Err(ParamsError::InvalidRange(
                "technical.resistance",
                "resistance must sit above price".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Pattern detection
// ============================================================================

/// Target and stop as multiples of current price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternLevels {
    pub target: f64,
    pub stop: f64,
}

impl PatternLevels {
    pub const fn new(target: f64, stop: f64) -> Self {
        Self { target, stop }
    }
}

/// Pattern rule thresholds, confidences and levels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternParams {
    pub breakout_min_momentum_pct: f64,
    pub breakout_confidence_bonus: f64,
    pub breakout_max_confidence: f64,
    pub breakout: PatternLevels,
    pub accumulation_min_score: f64,
    pub accumulation_confidence: f64,
    pub accumulation: PatternLevels,
    pub consolidation_confidence: f64,
    pub consolidation: PatternLevels,
    pub distribution_min_score: f64,
    pub distribution_confidence: f64,
    pub distribution: PatternLevels,
    pub breakdown_confidence_bonus: f64,
    pub breakdown_max_confidence: f64,
    pub breakdown: PatternLevels,
}

impl Default for PatternParams {
    fn default() -> Self {
        Self {
            breakout_min_momentum_pct: 10.0,
            breakout_confidence_bonus: 10.0,
            breakout_max_confidence: 95.0,
            breakout: PatternLevels::new(1.20, 0.92),
            accumulation_min_score: 70.0,
            accumulation_confidence: 75.0,
            accumulation: PatternLevels::new(1.15, 0.88),
            consolidation_confidence: 60.0,
            consolidation: PatternLevels::new(1.10, 0.90),
            distribution_min_score: 70.0,
            distribution_confidence: 70.0,
            distribution: PatternLevels::new(0.85, 1.05),
            breakdown_confidence_bonus: 10.0,
            breakdown_max_confidence: 90.0,
            breakdown: PatternLevels::new(0.80, 1.08),
        }
    }
}

impl PatternParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        let confidences = [
            self.breakout_max_confidence,
            self.accumulation_confidence,
            self.consolidation_confidence,
            self.distribution_confidence,
            self.breakdown_max_confidence,
        ];
        if confidences.iter().any(|c| !(0.0..=100.0).contains(c)) {
            return Err(ParamsError::InvalidRange(
                "patterns.confidence",
                "confidences must be within 0-100".to_string(),
            ));
        }
        let bullish = [self.breakout, self.accumulation, self.consolidation];
        if bullish.iter().any(|l| l.target <= 1.0 || l.stop >= 1.0) {
            return Err(ParamsError::InvalidRange(
                "patterns.levels",
                "bullish patterns need target above and stop below price".to_string(),
            ));
        }
        let bearish = [self.distribution, self.breakdown];
        if bearish.iter().any(|l| l.target >= 1.0 || l.stop <= 1.0) {
            return Err(ParamsError::InvalidRange(
                "patterns.levels",
                "bearish patterns need target below and stop above price".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Signal synthesis
// ============================================================================

/// Blend weights of the combined score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalWeights {
    pub smart_money: f64,
    pub momentum: f64,
    pub pattern: f64,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            smart_money: 0.35,
            momentum: 0.40,
            pattern: 0.25,
        }
    }
}

impl SignalWeights {
    pub fn sum(&self) -> f64 {
        self.smart_money + self.momentum + self.pattern
    }
}

/// Lower bounds (inclusive) of each signal class
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalThresholds {
    pub strong_buy: f64,
    pub buy: f64,
    pub hold: f64,
    pub sell: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            strong_buy: 75.0,
            buy: 60.0,
            hold: 45.0,
            sell: 30.0,
        }
    }
}

/// Confidence from the spread across the three sub-scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceParams {
    pub high_agreement_spread: f64,
    pub moderate_agreement_spread: f64,
    pub high: f64,
    pub moderate: f64,
    pub low: f64,
}

impl Default for ConfidenceParams {
    fn default() -> Self {
        Self {
            high_agreement_spread: 20.0,
            moderate_agreement_spread: 40.0,
            high: 85.0,
            moderate: 70.0,
            low: 55.0,
        }
    }
}

/// Smart money sub-score adjustments
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmartMoneyScoreParams {
    pub base: f64,
    pub many_wallets: usize,
    pub many_bonus: f64,
    pub several_wallets: usize,
    pub several_bonus: f64,
    pub single_bonus: f64,
    pub buying_bonus: f64,
    pub selling_penalty: f64,
    pub major_holdings_pct: f64,
    pub major_holdings_bonus: f64,
    pub minor_holdings_pct: f64,
    pub minor_holdings_bonus: f64,
    pub high_concentration_penalty: f64,
    pub low_concentration_bonus: f64,
}

impl Default for SmartMoneyScoreParams {
    fn default() -> Self {
        Self {
            base: 50.0,
            many_wallets: 5,
            many_bonus: 15.0,
            several_wallets: 3,
            several_bonus: 10.0,
            single_bonus: 5.0,
            buying_bonus: 20.0,
            selling_penalty: 15.0,
            major_holdings_pct: 10.0,
            major_holdings_bonus: 10.0,
            minor_holdings_pct: 5.0,
            minor_holdings_bonus: 5.0,
            high_concentration_penalty: 10.0,
            low_concentration_bonus: 5.0,
        }
    }
}

/// Momentum sub-score adjustments
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumScoreParams {
    pub base: f64,
    pub spiking_bonus: f64,
    pub increasing_bonus: f64,
    pub decreasing_penalty: f64,
    /// Net pressure is divided by this and added
    pub pressure_divisor: f64,
    pub strong_move_pct: f64,
    pub strong_move_points: f64,
    pub move_pct: f64,
    pub move_points: f64,
    pub rsi_points: f64,
    pub trend_points: f64,
}

impl Default for MomentumScoreParams {
    fn default() -> Self {
        Self {
            base: 50.0,
            spiking_bonus: 20.0,
            increasing_bonus: 10.0,
            decreasing_penalty: 10.0,
            pressure_divisor: 5.0,
            strong_move_pct: 20.0,
            strong_move_points: 15.0,
            move_pct: 10.0,
            move_points: 10.0,
            rsi_points: 10.0,
            trend_points: 10.0,
        }
    }
}

/// Signal synthesizer configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalParams {
    pub weights: SignalWeights,
    pub thresholds: SignalThresholds,
    pub confidence: ConfidenceParams,
    pub smart_money: SmartMoneyScoreParams,
    pub momentum: MomentumScoreParams,
}

impl SignalParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        let sum = self.weights.sum();
        let negative = [self.weights.smart_money, self.weights.momentum, self.weights.pattern]
            .iter()
            .any(|w| *w < 0.0);
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE || negative {
            return Err(ParamsError::InvalidWeights("signal", sum));
        }
        let t = &self.thresholds;
        if !(t.strong_buy > t.buy && t.buy > t.hold && t.hold > t.sell && t.sell > 0.0) {
            return Err(ParamsError::InvalidRange(
                "signal.thresholds",
                format!(
                    "need strong_buy > buy > hold > sell > 0, got {} / {} / {} / {}",
                    t.strong_buy, t.buy, t.hold, t.sell
                ),
            ));
        }
        let c = &self.confidence;
        if !(c.high_agreement_spread < c.moderate_agreement_spread && c.high >= c.moderate && c.moderate >= c.low) {
            return Err(ParamsError::InvalidRange(
                "signal.confidence",
                "spreads must ascend and confidences must not ascend".to_string(),
            ));
        }
        if self.momentum.pressure_divisor <= 0.0 {
            return Err(ParamsError::InvalidRange(
                "signal.momentum.pressure_divisor",
                "must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Trade setup
// ============================================================================

/// Stop distance and staged targets, all in percent from entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetupLevels {
    pub stop_pct: f64,
    pub targets_pct: [f64; 3],
}

impl SetupLevels {
    pub const fn new(stop_pct: f64, targets_pct: [f64; 3]) -> Self {
        Self { stop_pct, targets_pct }
    }
}

/// Levels per setup type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetupLevelTable {
    pub pump_continuation: SetupLevels,
    pub dip_buy: SetupLevels,
    pub range_play: SetupLevels,
    pub momentum: SetupLevels,
    pub standard: SetupLevels,
}

impl Default for SetupLevelTable {
    fn default() -> Self {
        Self {
            pump_continuation: SetupLevels::new(5.0, [2.0, 5.0, 10.0]),
            dip_buy: SetupLevels::new(7.0, [3.0, 8.0, 15.0]),
            range_play: SetupLevels::new(3.0, [1.5, 3.0, 5.0]),
            momentum: SetupLevels::new(4.0, [2.5, 6.0, 12.0]),
            standard: SetupLevels::new(4.0, [2.0, 5.0, 10.0]),
        }
    }
}

impl SetupLevelTable {
    fn all(&self) -> [SetupLevels; 5] {
        [self.pump_continuation, self.dip_buy, self.range_play, self.momentum, self.standard]
    }
}

/// Position size applied up to (and including) a risk score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeTier {
    pub max_risk: u8,
    pub position_pct: f64,
}

impl SizeTier {
    pub const fn new(max_risk: u8, position_pct: f64) -> Self {
        Self { max_risk, position_pct }
    }
}

/// Maximum holding window in minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldWindow {
    pub min_minutes: u32,
    pub max_minutes: u32,
}

impl HoldWindow {
    pub const fn minutes(min_minutes: u32, max_minutes: u32) -> Self {
        Self { min_minutes, max_minutes }
    }

    pub const fn hours(min_hours: u32, max_hours: u32) -> Self {
        Self {
            min_minutes: min_hours * 60,
            max_minutes: max_hours * 60,
        }
    }
}

/// Holding windows by risk tier and setup type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoldParams {
    pub low_risk: HoldWindow,
    pub medium_risk: HoldWindow,
    pub high_risk: HoldWindow,
    /// Applies to pump continuation regardless of risk
    pub pump_continuation: HoldWindow,
    /// Applies to dip buys regardless of risk
    pub dip_buy: HoldWindow,
}

impl Default for HoldParams {
    fn default() -> Self {
        Self {
            low_risk: HoldWindow::hours(2, 6),
            medium_risk: HoldWindow::hours(1, 4),
            high_risk: HoldWindow::minutes(30, 90),
            pump_continuation: HoldWindow::minutes(15, 45),
            dip_buy: HoldWindow::hours(2, 8),
        }
    }
}

/// Points summed into the setup confidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetupConfidenceParams {
    pub low_risk_points: i32,
    pub medium_risk_points: i32,
    pub high_risk_points: i32,
    /// Liquidity USD, deepest tier first
    pub liquidity_points: AboveTiers,
    /// Vol/liq band (exclusive) that counts as healthy trading
    pub healthy_vol_liq: (f64, f64),
    pub healthy_vol_liq_points: i32,
    /// Vol/liq below this still earns `acceptable_vol_liq_points`
    pub acceptable_vol_liq: f64,
    pub acceptable_vol_liq_points: i32,
    /// Dip buys and range plays
    pub patient_setup_points: i32,
    pub standard_setup_points: i32,
    pub high_min_points: i32,
    pub medium_min_points: i32,
}

impl Default for SetupConfidenceParams {
    fn default() -> Self {
        Self {
            low_risk_points: 3,
            medium_risk_points: 2,
            high_risk_points: 1,
            liquidity_points: AboveTiers {
                tiers: vec![Tier::new(500_000.0, 3), Tier::new(200_000.0, 2), Tier::new(50_000.0, 1)],
                otherwise: 0,
            },
            healthy_vol_liq: (1.0, 5.0),
            healthy_vol_liq_points: 2,
            acceptable_vol_liq: 10.0,
            acceptable_vol_liq_points: 1,
            patient_setup_points: 2,
            standard_setup_points: 1,
            high_min_points: 7,
            medium_min_points: 5,
        }
    }
}

/// Cut-offs behind the setup reasoning and warning lines
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetupNoteParams {
    pub good_liquidity_usd: f64,
    pub moderate_liquidity_usd: f64,
    pub active_vol_liq: f64,
    pub wash_vol_liq: f64,
    pub extreme_pump_pct: f64,
    pub deep_dip_pct: f64,
    pub mild_dip_pct: f64,
    pub extreme_volatility_pct: f64,
    pub high_volatility_pct: f64,
    pub many_green_flags: usize,
}

impl Default for SetupNoteParams {
    fn default() -> Self {
        Self {
            good_liquidity_usd: 500_000.0,
            moderate_liquidity_usd: 100_000.0,
            active_vol_liq: 2.0,
            wash_vol_liq: 10.0,
            extreme_pump_pct: 100.0,
            deep_dip_pct: -30.0,
            mild_dip_pct: -10.0,
            extreme_volatility_pct: 200.0,
            high_volatility_pct: 100.0,
            many_green_flags: 3,
        }
    }
}

/// Trade setup configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetupParams {
    /// 24h change above which the setup is a pump continuation
    pub pump_change_pct: f64,
    /// 24h change below which the setup is a dip buy
    pub dip_change_pct: f64,
    /// Absolute 24h change below which the setup is a range play
    pub range_change_pct: f64,
    /// Vol/liq ratio above which the setup is a momentum play
    pub momentum_vol_liq: f64,
    pub levels: SetupLevelTable,
    /// Risk score up to which all three targets are kept
    pub full_targets_max_risk: u8,
    /// Risk score up to which target 3 collapses into target 2
    pub trimmed_targets_max_risk: u8,
    /// Above the trimmed tier target 2/3 become target 1 times this
    pub scalp_target_factor: f64,
    /// Ascending by `max_risk`
    pub position_tiers: Vec<SizeTier>,
    pub fallback_position_pct: f64,
    pub hold: HoldParams,
    pub confidence: SetupConfidenceParams,
    pub notes: SetupNoteParams,
}

impl Default for SetupParams {
    fn default() -> Self {
        Self {
            pump_change_pct: 50.0,
            dip_change_pct: -20.0,
            range_change_pct: 10.0,
            momentum_vol_liq: 5.0,
            levels: SetupLevelTable::default(),
            full_targets_max_risk: 30,
            trimmed_targets_max_risk: 40,
            scalp_target_factor: 1.02,
            position_tiers: vec![
                SizeTier::new(30, 3.0),
                SizeTier::new(35, 2.5),
                SizeTier::new(40, 2.0),
            ],
            fallback_position_pct: 1.0,
            hold: HoldParams::default(),
            confidence: SetupConfidenceParams::default(),
            notes: SetupNoteParams::default(),
        }
    }
}

impl SetupParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        for levels in self.levels.all() {
            if levels.stop_pct <= 0.0 || levels.stop_pct >= 100.0 {
                return Err(ParamsError::InvalidPercent("setup.levels.stop_pct", levels.stop_pct));
            }
            let t = levels.targets_pct;
            if !(t[0] > 0.0 && t[0] <= t[1] && t[1] <= t[2]) {
                return Err(ParamsError::InvalidRange(
                    "setup.levels.targets_pct",
                    format!("targets must be positive and ascending, got {:?}", t),
                ));
            }
        }
        if self.full_targets_max_risk > self.trimmed_targets_max_risk {
            return Err(ParamsError::InvalidRange(
                "setup.targets",
                "full_targets_max_risk must not exceed trimmed_targets_max_risk".to_string(),
            ));
        }
        if self.scalp_target_factor < 1.0 {
            return Err(ParamsError::InvalidRange(
                "setup.scalp_target_factor",
                format!("must be >= 1.0, got {}", self.scalp_target_factor),
            ));
        }
        let ascending = self.position_tiers.windows(2).all(|w| w[0].max_risk < w[1].max_risk);
        let non_increasing = self
            .position_tiers
            .windows(2)
            .all(|w| w[0].position_pct >= w[1].position_pct);
        let floor_ok = self
            .position_tiers
            .last()
            .map_or(true, |t| t.position_pct >= self.fallback_position_pct);
        if !(ascending && non_increasing && floor_ok) {
            return Err(ParamsError::UnorderedTiers("setup.position_tiers"));
        }
        if self
            .position_tiers
            .iter()
            .map(|t| t.position_pct)
            .chain(std::iter::once(self.fallback_position_pct))
            .any(|p| p <= 0.0 || p > 100.0)
        {
            return Err(ParamsError::InvalidPercent(
                "setup.position_tiers",
                self.fallback_position_pct,
            ));
        }
        let h = &self.hold;
        let windows = [h.low_risk, h.medium_risk, h.high_risk, h.pump_continuation, h.dip_buy];
        if windows.iter().any(|w| w.min_minutes > w.max_minutes) {
            return Err(ParamsError::InvalidRange(
                "setup.hold",
                "hold windows need min <= max".to_string(),
            ));
        }
        let c = &self.confidence;
        c.liquidity_points.validate("setup.confidence.liquidity_points")?;
        if c.healthy_vol_liq.0 >= c.healthy_vol_liq.1 || c.high_min_points < c.medium_min_points {
            return Err(ParamsError::InvalidRange(
                "setup.confidence",
                "need healthy_vol_liq low < high and high_min_points >= medium_min_points".to_string(),
            ));
        }
        let n = &self.notes;
        if !(n.deep_dip_pct < n.mild_dip_pct
            && n.moderate_liquidity_usd < n.good_liquidity_usd
            && n.high_volatility_pct < n.extreme_volatility_pct)
        {
            return Err(ParamsError::InvalidRange(
                "setup.notes",
                "need deep_dip < mild_dip, moderate < good liquidity, high < extreme volatility".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Parameter validation errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParamsError {
    #[error("Invalid {0} weights: sum is {1:.4} (must be 1.0 with no negatives)")]
    InvalidWeights(&'static str, f64),
    #[error("Tier table {0} is not ordered")]
    UnorderedTiers(&'static str),
    #[error("Tier table {0} has a score above 100")]
    ScoreOutOfRange(&'static str),
    #[error("Invalid percentage for {0}: {1}")]
    InvalidPercent(&'static str, f64),
    #[error("Invalid range for {0}: {1}")]
    InvalidRange(&'static str, String),
}

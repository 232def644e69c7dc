//! Trade Setup Generator
//!
//! Turns the overall risk score, current price and a setup classification
//! into entry, stop, three staged take-profits, position size and a maximum
//! holding window, with human-readable reasoning and warnings.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::risk_model::{RedFlag, RiskAssessment, RiskRating};
use super::snapshot::AnalysisSnapshot;
use crate::strategy::params::{HoldWindow, SetupLevels, SetupParams};

/// Setup classification from price and volume behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetupType {
    PumpContinuation,
    DipBuy,
    RangePlay,
    Momentum,
    Standard,
}

impl fmt::Display for SetupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupType::PumpContinuation => write!(f, "pump_continuation"),
            SetupType::DipBuy => write!(f, "dip_buy"),
            SetupType::RangePlay => write!(f, "range_play"),
            SetupType::Momentum => write!(f, "momentum"),
            SetupType::Standard => write!(f, "standard"),
        }
    }
}

/// How much the setup itself can be trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SetupConfidence {
    Low,
    Medium,
    High,
}

/// Maximum holding window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxHold {
    pub min_minutes: u32,
    pub max_minutes: u32,
    pub note: Option<String>,
}

impl MaxHold {
    fn new(window: HoldWindow, note: Option<&str>) -> Self {
        Self {
            min_minutes: window.min_minutes,
            max_minutes: window.max_minutes,
            note: note.map(str::to_string),
        }
    }
}

impl fmt::Display for MaxHold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole_hours = self.min_minutes >= 60 && self.min_minutes % 60 == 0 && self.max_minutes % 60 == 0;
        if whole_hours {
            write!(f, "{}-{} hours", self.min_minutes / 60, self.max_minutes / 60)?;
        } else {
            write!(f, "{}-{} minutes", self.min_minutes, self.max_minutes)?;
        }
        if let Some(note) = &self.note {
            write!(f, " ({})", note)?;
        }
        Ok(())
    }
}

/// Executable trade plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSetup {
    pub setup_type: SetupType,
    pub risk_score: u8,
    pub risk_rating: RiskRating,
    pub entry_price: f64,
    pub stop_loss: f64,
    /// Staged take-profits, nearest first
    pub take_profits: [f64; 3],
    /// Reward per unit of risk for each take-profit
    pub reward_risk: [f64; 3],
    pub position_size_pct: f64,
    pub max_hold: MaxHold,
    pub vol_liq_ratio: f64,
    pub confidence: SetupConfidence,
    pub reasoning: Vec<String>,
    pub warnings: Vec<String>,
}

/// Trade setup generator
#[derive(Debug, Clone, Default)]
pub struct TradeSetupGenerator {
    params: SetupParams,
}

impl TradeSetupGenerator {
    pub fn new(params: SetupParams) -> Self {
        Self { params }
    }

    /// Build a setup; `None` when there is no usable price
    pub fn generate(&self, snapshot: &AnalysisSnapshot, risk: &RiskAssessment) -> Option<TradeSetup> {
        let market = &snapshot.market;
        let price = market.price_usd;
        if !(price.is_finite() && price > 0.0) {
            return None;
        }

        let vol_liq = market.vol_liq_ratio();
        let setup_type = self.classify(market.price_change_24h, vol_liq);
        let score = risk.score();

        let (stop_loss, take_profits) = self.levels(price, setup_type, score);
        let risk_per_unit = price - stop_loss;
        let reward_risk = take_profits.map(|tp| {
            if risk_per_unit > 0.0 {
                (tp - price) / risk_per_unit
            } else {
                0.0
            }
        });

        Some(TradeSetup {
            setup_type,
            risk_score: score,
            risk_rating: risk.rating(),
            entry_price: price,
            stop_loss,
            take_profits,
            reward_risk,
            position_size_pct: self.position_size(score),
            max_hold: self.max_hold(score, setup_type),
            vol_liq_ratio: vol_liq,
            confidence: self.confidence(score, market.liquidity_usd, vol_liq, setup_type, risk.red_flags.len()),
            reasoning: self.reasoning(snapshot, risk, vol_liq),
            warnings: self.warnings(snapshot, risk, vol_liq),
        })
    }

    /// First matching rule wins: pump, dip, range, momentum, standard
    pub fn classify(&self, price_change_24h: f64, vol_liq: f64) -> SetupType {
        let p = &self.params;
        if price_change_24h > p.pump_change_pct {
            SetupType::PumpContinuation
        } else if price_change_24h < p.dip_change_pct {
            SetupType::DipBuy
        } else if price_change_24h.abs() < p.range_change_pct {
            SetupType::RangePlay
        } else if vol_liq > p.momentum_vol_liq {
            SetupType::Momentum
        } else {
            SetupType::Standard
        }
    }

    fn table(&self, setup_type: SetupType) -> SetupLevels {
        let t = &self.params.levels;
        match setup_type {
            SetupType::PumpContinuation => t.pump_continuation,
            SetupType::DipBuy => t.dip_buy,
            SetupType::RangePlay => t.range_play,
            SetupType::Momentum => t.momentum,
            SetupType::Standard => t.standard,
        }
    }

    /// Stop and take-profits, with targets trimmed as risk rises
    pub fn levels(&self, price: f64, setup_type: SetupType, risk_score: u8) -> (f64, [f64; 3]) {
        let levels = self.table(setup_type);
        let stop = price * (1.0 - levels.stop_pct / 100.0);
        let [t1, t2, t3] = levels.targets_pct.map(|pct| price * (1.0 + pct / 100.0));

        let targets = if risk_score <= self.params.full_targets_max_risk {
            [t1, t2, t3]
        } else if risk_score <= self.params.trimmed_targets_max_risk {
            [t1, t2, t2]
        } else {
            let scalp = t1 * self.params.scalp_target_factor;
            [t1, scalp, scalp]
        };
        (stop, targets)
    }

    pub fn position_size(&self, risk_score: u8) -> f64 {
        self.params
            .position_tiers
            .iter()
            .find(|tier| risk_score <= tier.max_risk)
            .map(|tier| tier.position_pct)
            .unwrap_or(self.params.fallback_position_pct)
    }

    pub fn max_hold(&self, risk_score: u8, setup_type: SetupType) -> MaxHold {
        let hold = &self.params.hold;
        match setup_type {
            SetupType::PumpContinuation => MaxHold::new(hold.pump_continuation, Some("pump can reverse fast")),
            SetupType::DipBuy => MaxHold::new(hold.dip_buy, Some("recovery takes time")),
            _ if risk_score <= self.params.full_targets_max_risk => MaxHold::new(hold.low_risk, None),
            _ if risk_score <= self.params.trimmed_targets_max_risk => MaxHold::new(hold.medium_risk, None),
            _ => MaxHold::new(hold.high_risk, None),
        }
    }

    pub fn confidence(
        &self,
        risk_score: u8,
        liquidity_usd: f64,
        vol_liq: f64,
        setup_type: SetupType,
        red_flags: usize,
    ) -> SetupConfidence {
        let c = &self.params.confidence;
        let mut points = if risk_score <= self.params.full_targets_max_risk {
            c.low_risk_points
        } else if risk_score <= self.params.trimmed_targets_max_risk {
            c.medium_risk_points
        } else {
            c.high_risk_points
        };

        points += i32::from(c.liquidity_points.score(liquidity_usd));

        let (healthy_low, healthy_high) = c.healthy_vol_liq;
        points += if vol_liq > healthy_low && vol_liq < healthy_high {
            c.healthy_vol_liq_points
        } else if vol_liq < c.acceptable_vol_liq {
            c.acceptable_vol_liq_points
        } else {
            0
        };

        points += match setup_type {
            SetupType::DipBuy | SetupType::RangePlay => c.patient_setup_points,
            SetupType::Standard => c.standard_setup_points,
            SetupType::PumpContinuation | SetupType::Momentum => 0,
        };

        points = points.saturating_sub(i32::try_from(red_flags).unwrap_or(i32::MAX));

        if points >= c.high_min_points {
            SetupConfidence::High
        } else if points >= c.medium_min_points {
            SetupConfidence::Medium
        } else {
            SetupConfidence::Low
        }
    }

    fn reasoning(&self, snapshot: &AnalysisSnapshot, risk: &RiskAssessment, vol_liq: f64) -> Vec<String> {
        let n = &self.params.notes;
        let mut reasoning = Vec::new();
        let score = risk.score();
        let liquidity = snapshot.market.liquidity_usd;
        let change = snapshot.market.price_change_24h;

        reasoning.push(
            if score <= self.params.full_targets_max_risk {
                "Low risk score allows for larger position size"
            } else if score <= self.params.trimmed_targets_max_risk {
                "Medium risk - use moderate position size"
            } else {
                "Higher risk - minimal position only"
            }
            .to_string(),
        );

        reasoning.push(
            if liquidity > n.good_liquidity_usd {
                "Good liquidity - easy entry/exit"
            } else if liquidity > n.moderate_liquidity_usd {
                "Moderate liquidity - watch slippage"
            } else {
                "Low liquidity - difficult to exit large positions"
            }
            .to_string(),
        );

        reasoning.push(
            if vol_liq > self.params.momentum_vol_liq {
                "High volume/liquidity ratio - possible wash trading"
            } else if vol_liq > n.active_vol_liq {
                "Good trading activity"
            } else {
                "Low volume - might be hard to sell"
            }
            .to_string(),
        );

        reasoning.push(
            if change > n.extreme_pump_pct {
                "Extreme pump - high risk of dump"
            } else if change > self.params.pump_change_pct {
                "Strong momentum - ride the wave with tight stops"
            } else if change < n.deep_dip_pct {
                "Deep dip - potential bounce play"
            } else if change < n.mild_dip_pct {
                "Mild correction - possible entry"
            } else {
                "Sideways action - range trade"
            }
            .to_string(),
        );

        if risk.green_flags.len() >= n.many_green_flags {
            reasoning.push("Multiple green flags - contract is relatively safe".to_string());
        }
        match risk.red_flags.as_slice() {
            [] => reasoning.push("No red flags detected".to_string()),
            [RedFlag::ExtremeWhaleConcentration | RedFlag::HighWhaleConcentration] => {
                reasoning.push("Only risk is whale concentration - use small size".to_string())
            }
            flags => reasoning.push(format!("{} red flags present", flags.len())),
        }
        reasoning
    }

    fn warnings(&self, snapshot: &AnalysisSnapshot, risk: &RiskAssessment, vol_liq: f64) -> Vec<String> {
        let n = &self.params.notes;
        let mut warnings = Vec::new();

        for flag in &risk.red_flags {
            let warning = match flag {
                RedFlag::ExtremeWhaleConcentration | RedFlag::HighWhaleConcentration => {
                    "WHALE ALERT: Top 10 holders control a large share - can dump anytime"
                }
                RedFlag::VeryLowLiquidity | RedFlag::LowLiquidity => {
                    "LOW LIQUIDITY: High slippage expected on entry/exit"
                }
                RedFlag::VolumeSpike(_) => "VOLUME SPIKE: Possible manipulation",
                _ => continue,
            };
            warnings.push(warning.to_string());
        }

        let change = snapshot.market.price_change_24h.abs();
        if change > n.extreme_volatility_pct {
            warnings.push(format!(
                "EXTREME VOLATILITY: Price moved >{:.0}% in 24h - highly dangerous",
                n.extreme_volatility_pct
            ));
        } else if change > n.high_volatility_pct {
            warnings.push("HIGH VOLATILITY: Major price swing - use tight stops".to_string());
        }

        if vol_liq > n.wash_vol_liq {
            warnings.push(format!(
                "WASH TRADING SUSPECTED: Volume {:.0}x+ liquidity - artificial activity",
                n.wash_vol_liq
            ));
        } else if vol_liq > self.params.momentum_vol_liq {
            warnings.push("SUSPICIOUS VOLUME: Unusual volume patterns".to_string());
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::risk_model::{OverallRisk, Recommendation, RiskFactors};
    use approx::assert_relative_eq;
    use chrono::{TimeZone, Utc};

    fn create_snapshot(price: f64, change: f64, liquidity: f64, volume: f64) -> AnalysisSnapshot {
        let ts = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let mut snapshot = AnalysisSnapshot::empty("Mint", ts);
        snapshot.market.price_usd = price;
        snapshot.market.price_change_24h = change;
        snapshot.market.liquidity_usd = liquidity;
        snapshot.market.volume_24h_usd = volume;
        snapshot
    }

    fn create_risk(score: u8, red_flags: Vec<RedFlag>) -> RiskAssessment {
        let rating = if score <= 20 {
            RiskRating::Low
        } else if score <= 40 {
            RiskRating::Medium
        } else if score <= 60 {
            RiskRating::High
        } else {
            RiskRating::Extreme
        };
        RiskAssessment {
            factors: RiskFactors {
                mint_authority: 0,
                freeze_authority: 0,
                liquidity: 0,
                holder_concentration: 0,
                contract_age: 0,
                verification: 0,
                scam_pattern: 0,
                volume: 0,
                volatility: 0,
                price_manipulation: 0,
            },
            overall: OverallRisk { score, rating },
            red_flags,
            green_flags: Vec::new(),
            anomalies: Vec::new(),
            recommendation: rating.recommendation(),
            risk_reward: rating.risk_reward().to_string(),
            volume_insights: Vec::new(),
        }
    }

    #[test]
    fn test_setup_type_classification() {
        let generator = TradeSetupGenerator::default();
        assert_eq!(generator.classify(50.1, 0.0), SetupType::PumpContinuation);
        assert_eq!(generator.classify(50.0, 0.0), SetupType::Standard);
        assert_eq!(generator.classify(-20.1, 0.0), SetupType::DipBuy);
        assert_eq!(generator.classify(-20.0, 0.0), SetupType::Standard);
        assert_eq!(generator.classify(9.9, 20.0), SetupType::RangePlay);
        assert_eq!(generator.classify(15.0, 5.1), SetupType::Momentum);
        assert_eq!(generator.classify(15.0, 5.0), SetupType::Standard);
    }

    #[test]
    fn test_levels_low_risk_keep_all_targets() {
        let generator = TradeSetupGenerator::default();
        let (stop, targets) = generator.levels(1.0, SetupType::DipBuy, 30);
        assert_relative_eq!(stop, 0.93, epsilon = 1e-12);
        assert_relative_eq!(targets[0], 1.03, epsilon = 1e-12);
        assert_relative_eq!(targets[1], 1.08, epsilon = 1e-12);
        assert_relative_eq!(targets[2], 1.15, epsilon = 1e-12);
    }

    #[test]
    fn test_levels_medium_risk_collapse_third_target() {
        let generator = TradeSetupGenerator::default();
        let (_, targets) = generator.levels(1.0, SetupType::Standard, 31);
        assert_relative_eq!(targets[1], 1.05, epsilon = 1e-12);
        assert_relative_eq!(targets[2], targets[1]);
    }

    #[test]
    fn test_levels_high_risk_scalp_only() {
        let generator = TradeSetupGenerator::default();
        let (stop, targets) = generator.levels(2.0, SetupType::RangePlay, 41);
        assert_relative_eq!(stop, 1.94, epsilon = 1e-12);
        assert_relative_eq!(targets[0], 2.03, epsilon = 1e-12);
        assert_relative_eq!(targets[1], 2.03 * 1.02, epsilon = 1e-12);
        assert_relative_eq!(targets[2], targets[1]);
    }

    #[test]
    fn test_position_size_tiers() {
        let generator = TradeSetupGenerator::default();
        assert_relative_eq!(generator.position_size(0), 3.0);
        assert_relative_eq!(generator.position_size(30), 3.0);
        assert_relative_eq!(generator.position_size(31), 2.5);
        assert_relative_eq!(generator.position_size(35), 2.5);
        assert_relative_eq!(generator.position_size(36), 2.0);
        assert_relative_eq!(generator.position_size(40), 2.0);
        assert_relative_eq!(generator.position_size(41), 1.0);
        assert_relative_eq!(generator.position_size(100), 1.0);
    }

    #[test]
    fn test_max_hold_windows() {
        let generator = TradeSetupGenerator::default();
        assert_eq!(generator.max_hold(10, SetupType::Standard).to_string(), "2-6 hours");
        assert_eq!(generator.max_hold(35, SetupType::RangePlay).to_string(), "1-4 hours");
        assert_eq!(generator.max_hold(80, SetupType::Momentum).to_string(), "30-90 minutes");
        assert_eq!(
            generator.max_hold(10, SetupType::PumpContinuation).to_string(),
            "15-45 minutes (pump can reverse fast)"
        );
        assert_eq!(
            generator.max_hold(80, SetupType::DipBuy).to_string(),
            "2-8 hours (recovery takes time)"
        );
    }

    #[test]
    fn test_confidence_levels() {
        let generator = TradeSetupGenerator::default();
        // 3 + 3 + 2 + 2 = 10
        assert_eq!(
            generator.confidence(20, 600_000.0, 2.0, SetupType::RangePlay, 0),
            SetupConfidence::High
        );
        // 2 + 1 + 1 + 1 = 5
        assert_eq!(
            generator.confidence(35, 60_000.0, 0.5, SetupType::Standard, 0),
            SetupConfidence::Medium
        );
        // 1 + 0 + 0 + 0 - 3 = -2
        assert_eq!(
            generator.confidence(70, 5_000.0, 12.0, SetupType::PumpContinuation, 3),
            SetupConfidence::Low
        );
    }

    #[test]
    fn test_confidence_and_notes_follow_params() {
        let mut params = SetupParams::default();
        params.confidence.high_min_points = 11;
        params.notes.extreme_volatility_pct = 300.0;
        params.notes.wash_vol_liq = 20.0;
        let generator = TradeSetupGenerator::new(params);

        assert_eq!(
            generator.confidence(20, 600_000.0, 2.0, SetupType::RangePlay, 0),
            SetupConfidence::Medium
        );

        let snapshot = create_snapshot(1.0, 250.0, 20_000.0, 300_000.0);
        let setup = generator
            .generate(&snapshot, &create_risk(55, vec![RedFlag::HighWhaleConcentration]))
            .unwrap();
        assert_eq!(
            setup.warnings,
            vec![
                "WHALE ALERT: Top 10 holders control a large share - can dump anytime",
                "HIGH VOLATILITY: Major price swing - use tight stops",
                "SUSPICIOUS VOLUME: Unusual volume patterns",
            ]
        );
    }

    #[test]
    fn test_no_setup_without_price() {
        let generator = TradeSetupGenerator::default();
        let snapshot = create_snapshot(0.0, 0.0, 100_000.0, 50_000.0);
        assert!(generator.generate(&snapshot, &create_risk(10, Vec::new())).is_none());
    }

    #[test]
    fn test_generate_full_setup() {
        let generator = TradeSetupGenerator::default();
        let snapshot = create_snapshot(1.0, 4.0, 1_200_000.0, 3_000_000.0);
        let setup = generator.generate(&snapshot, &create_risk(10, Vec::new())).unwrap();

        assert_eq!(setup.setup_type, SetupType::RangePlay);
        assert_eq!(setup.risk_rating, RiskRating::Low);
        assert_relative_eq!(setup.entry_price, 1.0);
        assert_relative_eq!(setup.stop_loss, 0.97, epsilon = 1e-12);
        assert_relative_eq!(setup.reward_risk[0], 0.5, epsilon = 1e-9);
        assert_relative_eq!(setup.reward_risk[2], 5.0 / 3.0, epsilon = 1e-9);
        assert_relative_eq!(setup.position_size_pct, 3.0);
        assert_eq!(setup.confidence, SetupConfidence::High);
        assert_eq!(
            setup.reasoning,
            vec![
                "Low risk score allows for larger position size",
                "Good liquidity - easy entry/exit",
                "Good trading activity",
                "Sideways action - range trade",
                "No red flags detected",
            ]
        );
        assert!(setup.warnings.is_empty());
    }

    #[test]
    fn test_whale_only_reasoning_and_warnings() {
        let generator = TradeSetupGenerator::default();
        let snapshot = create_snapshot(1.0, 250.0, 20_000.0, 300_000.0);
        let risk = create_risk(55, vec![RedFlag::HighWhaleConcentration]);
        let setup = generator.generate(&snapshot, &risk).unwrap();

        assert_eq!(setup.setup_type, SetupType::PumpContinuation);
        assert!(setup
            .reasoning
            .contains(&"Only risk is whale concentration - use small size".to_string()));
        assert!(setup.reasoning.contains(&"Extreme pump - high risk of dump".to_string()));
        assert_eq!(
            setup.warnings,
            vec![
                "WHALE ALERT: Top 10 holders control a large share - can dump anytime",
                "EXTREME VOLATILITY: Price moved >200% in 24h - highly dangerous",
                "WASH TRADING SUSPECTED: Volume 10x+ liquidity - artificial activity",
            ]
        );
        assert_eq!(risk.recommendation, Recommendation::Caution);
    }
}

//! Signal Synthesizer
//!
//! Blends three independent reads (smart money, momentum, patterns) into one
//! combined score, a discrete signal class and an agreement-based confidence.
//! Risk is deliberately not an input; the risk rating only shapes the trade
//! setup.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::holder_profiler::{ConcentrationRisk, HolderMetrics};
use super::patterns::ChartPattern;
use super::ratio::{clamp_score, safe_ratio};
use super::technical::{MomentumIndicators, RsiZone, TrendDirection};
use super::volume_momentum::{VolumeMomentum, VolumeTrend};
use crate::strategy::params::SignalParams;

/// Discrete trade signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalClass {
    StrongSell,
    Sell,
    Hold,
    Buy,
    StrongBuy,
}

impl SignalClass {
    pub fn is_buy(&self) -> bool {
        matches!(self, SignalClass::Buy | SignalClass::StrongBuy)
    }

    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "strong_buy" => Some(SignalClass::StrongBuy),
            "buy" => Some(SignalClass::Buy),
            "hold" => Some(SignalClass::Hold),
            "sell" => Some(SignalClass::Sell),
            "strong_sell" => Some(SignalClass::StrongSell),
            _ => None,
        }
    }
}

impl fmt::Display for SignalClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalClass::StrongBuy => write!(f, "strong_buy"),
            SignalClass::Buy => write!(f, "buy"),
            SignalClass::Hold => write!(f, "hold"),
            SignalClass::Sell => write!(f, "sell"),
            SignalClass::StrongSell => write!(f, "strong_sell"),
        }
    }
}

/// Combined trading signal for one token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedSignal {
    pub smart_money_score: f64,
    pub momentum_score: f64,
    pub pattern_score: f64,
    pub combined_score: f64,
    pub signal: SignalClass,
    pub confidence: f64,
    pub key_insights: Vec<String>,
    pub green_flags: Vec<String>,
    pub red_flags: Vec<String>,
    pub suggested_entry: Option<f64>,
    pub suggested_stop: Option<f64>,
    pub suggested_target: Option<f64>,
    /// Reward per unit of risk, formatted "1:x.x"
    pub risk_reward: Option<String>,
}

impl CombinedSignal {
    /// Validates that every score is a finite value within 0-100
    pub fn validate(&self) -> Result<(), String> {
        let scores = [
            ("smart_money_score", self.smart_money_score),
            ("momentum_score", self.momentum_score),
            ("pattern_score", self.pattern_score),
            ("combined_score", self.combined_score),
            ("confidence", self.confidence),
        ];
        for (name, value) in scores {
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                return Err(format!("Invalid {}: {}", name, value));
            }
        }
        Ok(())
    }
}

/// Signal synthesizer
#[derive(Debug, Clone, Default)]
pub struct SignalSynthesizer {
    params: SignalParams,
}

impl SignalSynthesizer {
    pub fn new(params: SignalParams) -> Self {
        Self { params }
    }

    pub fn synthesize(
        &self,
        holders: &HolderMetrics,
        volume: &VolumeMomentum,
        indicators: &MomentumIndicators,
        patterns: &[ChartPattern],
        price: f64,
    ) -> CombinedSignal {
        let smart_money_score = self.smart_money_score(holders);
        let momentum_score = self.momentum_score(volume, indicators);
        let pattern_score = Self::pattern_score(patterns);

        let w = &self.params.weights;
        let combined_score = clamp_score(
            smart_money_score * w.smart_money + momentum_score * w.momentum + pattern_score * w.pattern,
        );
        let signal = self.classify(combined_score);
        let confidence = self.confidence(&[smart_money_score, momentum_score, pattern_score]);

        let (key_insights, green_flags, red_flags) = Self::narrative(holders, volume, indicators, patterns);

        let mut result = CombinedSignal {
            smart_money_score,
            momentum_score,
            pattern_score,
            combined_score,
            signal,
            confidence,
            key_insights,
            green_flags,
            red_flags,
            suggested_entry: (price > 0.0).then_some(price),
            suggested_stop: None,
            suggested_target: None,
            risk_reward: None,
        };

        if signal.is_buy() {
            let best = patterns
                .iter()
                .filter(|p| p.is_bullish())
                .max_by(|a, b| a.confidence.total_cmp(&b.confidence));
            if let Some(best) = best {
                result.suggested_stop = best.stop_loss;
                result.suggested_target = best.price_target;
            }
        }
        if let (Some(stop), Some(target)) = (result.suggested_stop, result.suggested_target) {
            result.risk_reward = Self::risk_reward(price, stop, target);
        }
        result
    }

    pub fn smart_money_score(&self, holders: &HolderMetrics) -> f64 {
        let p = &self.params.smart_money;
        let mut score = p.base;

        if holders.smart_money_count >= p.many_wallets {
            score += p.many_bonus;
        } else if holders.smart_money_count >= p.several_wallets {
            score += p.several_bonus;
        } else if holders.smart_money_count >= 1 {
            score += p.single_bonus;
        }

        if holders.smart_money_buying {
            score += p.buying_bonus;
        }
        if holders.smart_money_selling {
            score -= p.selling_penalty;
        }

        if holders.smart_money_holdings_pct >= p.major_holdings_pct {
            score += p.major_holdings_bonus;
        } else if holders.smart_money_holdings_pct >= p.minor_holdings_pct {
            score += p.minor_holdings_bonus;
        }

        match holders.concentration_risk {
            ConcentrationRisk::High => score -= p.high_concentration_penalty,
            ConcentrationRisk::Low => score += p.low_concentration_bonus,
            ConcentrationRisk::Medium => {}
        }

        clamp_score(score)
    }

    pub fn momentum_score(&self, volume: &VolumeMomentum, indicators: &MomentumIndicators) -> f64 {
        let p = &self.params.momentum;
        let mut score = p.base;

        score += match volume.trend {
            VolumeTrend::Spiking => p.spiking_bonus,
            VolumeTrend::Increasing => p.increasing_bonus,
            VolumeTrend::Decreasing => -p.decreasing_penalty,
            VolumeTrend::Stable => 0.0,
        };

        score += safe_ratio(volume.net_pressure, p.pressure_divisor, 0.0);

        // Stronger moves are checked first in both directions
        let change = indicators.price_momentum_24h;
        if change > p.strong_move_pct {
            score += p.strong_move_points;
        } else if change > p.move_pct {
            score += p.move_points;
        } else if change < -p.strong_move_pct {
            score -= p.strong_move_points;
        } else if change < -p.move_pct {
            score -= p.move_points;
        }

        match indicators.rsi_zone {
            RsiZone::Oversold => score += p.rsi_points,
            RsiZone::Overbought => score -= p.rsi_points,
            RsiZone::Neutral => {}
        }

        match indicators.trend {
            TrendDirection::Up => score += p.trend_points,
            TrendDirection::Down => score -= p.trend_points,
            TrendDirection::Sideways => {}
        }

        clamp_score(score)
    }

    /// 50 when nothing directional was found; consolidation counts as neutral
    pub fn pattern_score(patterns: &[ChartPattern]) -> f64 {
        let average = |bullish: bool| -> Option<f64> {
            let confidences: Vec<f64> = patterns
                .iter()
                .filter(|p| if bullish { p.is_bullish() } else { p.is_bearish() })
                .map(|p| p.confidence)
                .collect();
            if confidences.is_empty() {
                None
            } else {
                Some(confidences.iter().sum::<f64>() / confidences.len() as f64)
            }
        };

        let score = match (average(true), average(false)) {
            (Some(bull), None) => 50.0 + bull / 2.0,
            (None, Some(bear)) => 50.0 - bear / 2.0,
            (Some(bull), Some(bear)) => 50.0 + (bull - bear) / 2.0,
            (None, None) => 50.0,
        };
        clamp_score(score)
    }

    pub fn classify(&self, combined: f64) -> SignalClass {
        let t = &self.params.thresholds;
        if combined >= t.strong_buy {
            SignalClass::StrongBuy
        } else if combined >= t.buy {
            SignalClass::Buy
        } else if combined >= t.hold {
            SignalClass::Hold
        } else if combined >= t.sell {
            SignalClass::Sell
        } else {
            SignalClass::StrongSell
        }
    }

    /// Confidence from the spread between the highest and lowest sub-score
    pub fn confidence(&self, scores: &[f64]) -> f64 {
        let c = &self.params.confidence;
        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
        let spread = if scores.is_empty() { 0.0 } else { max - min };

        if spread < c.high_agreement_spread {
            c.high
        } else if spread < c.moderate_agreement_spread {
            c.moderate
        } else {
            c.low
        }
    }

    fn risk_reward(price: f64, stop: f64, target: f64) -> Option<String> {
        let risk = (price - stop).abs();
        let reward = (target - price).abs();
        if risk > 0.0 {
            Some(format!("1:{:.1}", reward / risk))
        } else {
            None
        }
    }

    fn narrative(
        holders: &HolderMetrics,
        volume: &VolumeMomentum,
        indicators: &MomentumIndicators,
        patterns: &[ChartPattern],
    ) -> (Vec<String>, Vec<String>, Vec<String>) {
        let mut insights = Vec::new();
        let mut green = Vec::new();
        let mut red = Vec::new();

        if holders.smart_money_buying {
            insights.push(format!("{} smart money wallets accumulating", holders.smart_money_count));
            green.push("Smart money buying".to_string());
        }
        if holders.smart_money_selling {
            red.push("Smart money selling".to_string());
        }

        insights.extend(volume.insights.iter().cloned());
        if volume.trend == VolumeTrend::Spiking {
            green.push(format!("Volume spike ({:.1}x)", volume.volume_ratio));
        }

        match indicators.trend {
            TrendDirection::Up => green.push(format!("Uptrend (+{:.1}%)", indicators.price_momentum_24h)),
            TrendDirection::Down => red.push(format!("Downtrend ({:.1}%)", indicators.price_momentum_24h)),
            TrendDirection::Sideways => {}
        }
        match indicators.rsi_zone {
            RsiZone::Oversold => green.push("Oversold (potential bounce)".to_string()),
            RsiZone::Overbought => red.push("Overbought (potential pullback)".to_string()),
            RsiZone::Neutral => {}
        }

        for pattern in patterns {
            insights.push(format!(
                "{}: {}",
                pattern.pattern_type.label().to_uppercase(),
                pattern.description
            ));
            let title = title_case(pattern.pattern_type.label());
            if pattern.is_bullish() {
                green.push(format!("{} pattern", title));
            } else if pattern.is_bearish() {
                red.push(format!("{} pattern", title));
            }
        }

        if holders.concentration_risk == ConcentrationRisk::High {
            red.push("High holder concentration".to_string());
        }

        (insights, green, red)
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

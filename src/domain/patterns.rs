//! Pattern Detector
//!
//! Rule-based chart pattern classifier. Every rule is evaluated on its own,
//! so several patterns (including conflicting ones) can be reported together.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::technical::{MomentumIndicators, RsiZone, TrendDirection};
use super::volume_momentum::{VolumeMomentum, VolumeTrend};
use crate::strategy::params::{PatternLevels, PatternParams};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternType {
    Breakout,
    Breakdown,
    Accumulation,
    Distribution,
    Consolidation,
}

/// Directional bias of a pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternBias {
    Bullish,
    Bearish,
    Neutral,
}

impl PatternType {
    pub fn bias(&self) -> PatternBias {
        match self {
            PatternType::Breakout | PatternType::Accumulation => PatternBias::Bullish,
            PatternType::Breakdown | PatternType::Distribution => PatternBias::Bearish,
            PatternType::Consolidation => PatternBias::Neutral,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PatternType::Breakout => "breakout",
            PatternType::Breakdown => "breakdown",
            PatternType::Accumulation => "accumulation",
            PatternType::Distribution => "distribution",
            PatternType::Consolidation => "consolidation",
        }
    }
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One detected pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPattern {
    pub pattern_type: PatternType,
    pub confidence: f64,
    pub price_target: Option<f64>,
    pub stop_loss: Option<f64>,
    /// Expected playout window, e.g. "1h-4h"
    pub timeframe: String,
    pub description: String,
    pub supporting_indicators: Vec<String>,
}

impl ChartPattern {
    pub fn is_bullish(&self) -> bool {
        self.pattern_type.bias() == PatternBias::Bullish
    }

    pub fn is_bearish(&self) -> bool {
        self.pattern_type.bias() == PatternBias::Bearish
    }
}

/// Chart pattern detector
#[derive(Debug, Clone, Default)]
pub struct PatternDetector {
    params: PatternParams,
}

impl PatternDetector {
    pub fn new(params: PatternParams) -> Self {
        Self { params }
    }

    /// Evaluate every rule against the momentum and volume reads
    pub fn detect(&self, indicators: &MomentumIndicators, volume: &VolumeMomentum, price: f64) -> Vec<ChartPattern> {
        let p = &self.params;
        let spiking = volume.trend == VolumeTrend::Spiking;
        let mut patterns = Vec::new();

        if indicators.trend == TrendDirection::Up
            && spiking
            && indicators.price_momentum_24h > p.breakout_min_momentum_pct
        {
            patterns.push(Self::pattern(
                PatternType::Breakout,
                (indicators.trend_strength + p.breakout_confidence_bonus).min(p.breakout_max_confidence),
                price,
                p.breakout,
                "1h-4h",
                format!("Strong breakout with {:.1}x volume spike", volume.volume_ratio),
                &["Volume spike", "Momentum up", "RSI momentum"],
            ));
        }

        if volume.accumulation_score > p.accumulation_min_score && indicators.rsi_zone == RsiZone::Oversold {
            patterns.push(Self::pattern(
                PatternType::Accumulation,
                p.accumulation_confidence,
                price,
                p.accumulation,
                "4h-24h",
                "Accumulation phase with oversold RSI".to_string(),
                &["Buy pressure", "Oversold RSI", "Volume building"],
            ));
        }

        if indicators.trend == TrendDirection::Sideways && volume.trend == VolumeTrend::Decreasing {
            patterns.push(Self::pattern(
                PatternType::Consolidation,
                p.consolidation_confidence,
                price,
                p.consolidation,
                "1h-6h",
                "Price consolidating, awaiting breakout".to_string(),
                &["Low volatility", "Volume contraction"],
            ));
        }

        if volume.distribution_score > p.distribution_min_score && indicators.rsi_zone == RsiZone::Overbought {
            patterns.push(Self::pattern(
                PatternType::Distribution,
                p.distribution_confidence,
                price,
                p.distribution,
                "1h-4h",
                "Distribution pattern with overbought RSI".to_string(),
                &["Sell pressure", "Overbought RSI"],
            ));
        }

        if indicators.trend == TrendDirection::Down && spiking {
            patterns.push(Self::pattern(
                PatternType::Breakdown,
                (indicators.trend_strength + p.breakdown_confidence_bonus).min(p.breakdown_max_confidence),
                price,
                p.breakdown,
                "1h-4h",
                "Breakdown with volume confirmation".to_string(),
                &["Volume spike", "Down momentum"],
            ));
        }

        patterns
    }

    fn pattern(
        pattern_type: PatternType,
        confidence: f64,
        price: f64,
        levels: PatternLevels,
        timeframe: &str,
        description: String,
        supporting: &[&str],
    ) -> ChartPattern {
        // Levels only make sense against a real price
        let priced = price > 0.0;
        ChartPattern {
            pattern_type,
            confidence,
            price_target: priced.then(|| price * levels.target),
            stop_loss: priced.then(|| price * levels.stop),
            timeframe: timeframe.to_string(),
            description,
            supporting_indicators: supporting.iter().map(|s| s.to_string()).collect(),
        }
    }
}

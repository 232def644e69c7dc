//! Technical Momentum Analyzer
//!
//! Derives an RSI-style oscillator, trend direction/strength and naive
//! support/resistance from the price changes a pair feed reports.
//!
//! Without a close-price series the RSI is an approximation from the 24h
//! change alone. Support and resistance are fixed offsets from the current
//! price biased by trend, not pivot levels from price history.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::fmt;

use super::ratio::{clamp_score, safe_ratio};
use super::snapshot::MarketSnapshot;
use crate::strategy::params::TechnicalParams;

/// Position of the oscillator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsiZone {
    Oversold,
    Neutral,
    Overbought,
}

/// MACD-style direction label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MacdSignal {
    Bullish,
    Bearish,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Sideways,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Up => write!(f, "up"),
            TrendDirection::Down => write!(f, "down"),
            TrendDirection::Sideways => write!(f, "sideways"),
        }
    }
}

/// Suggested trading horizon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradingTimeframe {
    Scalping,
    Swing,
}

/// Where the RSI value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsiSource {
    /// Estimated from the 24h change
    Approximation,
    /// Computed from close prices
    CloseSeries,
}

/// Momentum indicators for one token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumIndicators {
    pub rsi: f64,
    pub rsi_zone: RsiZone,
    pub rsi_source: RsiSource,
    pub macd: MacdSignal,
    pub price_momentum_24h: f64,
    pub price_momentum_7d: Option<f64>,
    /// Mean absolute change across the non-zero 5m/1h/6h/24h buckets
    pub volatility: f64,
    pub support: f64,
    pub resistance: f64,
    pub trend: TrendDirection,
    pub trend_strength: f64,
    pub timeframe: TradingTimeframe,
}

/// Technical momentum analyzer
#[derive(Debug, Clone, Default)]
pub struct TechnicalMomentumAnalyzer {
    params: TechnicalParams,
}

impl TechnicalMomentumAnalyzer {
    pub fn new(params: TechnicalParams) -> Self {
        Self { params }
    }

    pub fn analyze(&self, market: &MarketSnapshot) -> MomentumIndicators {
        let change_24h = market.price_change_24h;
        let change_7d = market.price_change_7d;
        let price = market.price_usd;

        let (rsi, rsi_source) = match self.series_rsi(&market.close_prices) {
            Some(rsi) => (rsi, RsiSource::CloseSeries),
            None => (self.approximate_rsi(change_24h), RsiSource::Approximation),
        };

        let trend = self.trend_direction(change_24h, change_7d);
        let (trend_strength, macd) = match trend {
            TrendDirection::Up => (self.trend_strength(change_24h), MacdSignal::Bullish),
            TrendDirection::Down => (self.trend_strength(change_24h), MacdSignal::Bearish),
            TrendDirection::Sideways => (self.params.sideways_strength, MacdSignal::Neutral),
        };

        let volatility = Self::volatility(market);
        let support = if trend == TrendDirection::Up {
            price * self.params.uptrend_support
        } else {
            price * self.params.default_support
        };
        let resistance = if trend == TrendDirection::Down {
            price * self.params.downtrend_resistance
        } else {
            price * self.params.default_resistance
        };

        MomentumIndicators {
            rsi,
            rsi_zone: self.rsi_zone(rsi),
            rsi_source,
            macd,
            price_momentum_24h: change_24h,
            price_momentum_7d: change_7d,
            volatility,
            support,
            resistance,
            trend,
            trend_strength,
            timeframe: if volatility > self.params.scalping_volatility_pct {
                TradingTimeframe::Scalping
            } else {
                TradingTimeframe::Swing
            },
        }
    }

    /// RSI estimated from the 24h change
    pub fn approximate_rsi(&self, change_24h: f64) -> f64 {
        let p = &self.params;
        let rsi = if change_24h > p.rsi_extreme_change_pct {
            p.rsi_overbought + (change_24h / p.rsi_change_divisor).min(p.rsi_max_extension)
        } else if change_24h < -p.rsi_extreme_change_pct {
            p.rsi_oversold - (change_24h.abs() / p.rsi_change_divisor).min(p.rsi_max_extension)
        } else {
            50.0 + change_24h
        };
        clamp_score(rsi)
    }

    /// Simple-average RSI over the last `rsi_period` moves. `None` when the
    /// series is too short.
    pub fn series_rsi(&self, closes: &[f64]) -> Option<f64> {
        let period = self.params.rsi_period;
        if closes.len() < period + 1 {
            return None;
        }
        let window = &closes[closes.len() - period - 1..];
        let moves: Vec<f64> = window.windows(2).map(|w| w[1] - w[0]).collect();
        let avg_gain = moves.iter().map(|m| m.max(0.0)).mean();
        let avg_loss = moves.iter().map(|m| (-m).max(0.0)).mean();

        if avg_loss == 0.0 {
            return Some(100.0);
        }
        let rs = safe_ratio(avg_gain, avg_loss, 0.0);
        Some(clamp_score(100.0 - 100.0 / (1.0 + rs)))
    }

    pub fn rsi_zone(&self, rsi: f64) -> RsiZone {
        if rsi < self.params.rsi_oversold {
            RsiZone::Oversold
        } else if rsi > self.params.rsi_overbought {
            RsiZone::Overbought
        } else {
            RsiZone::Neutral
        }
    }

    /// A 7-day change of exactly 0 counts as unavailable
    pub fn trend_direction(&self, change_24h: f64, change_7d: Option<f64>) -> TrendDirection {
        let threshold = self.params.trend_change_pct;
        let change_7d = change_7d.filter(|c| *c != 0.0);
        if change_24h > threshold && change_7d.map_or(true, |c| c > 0.0) {
            TrendDirection::Up
        } else if change_24h < -threshold && change_7d.map_or(true, |c| c < 0.0) {
            TrendDirection::Down
        } else {
            TrendDirection::Sideways
        }
    }

    fn trend_strength(&self, change_24h: f64) -> f64 {
        (change_24h.abs() * self.params.strength_multiplier).min(100.0)
    }

    fn volatility(market: &MarketSnapshot) -> f64 {
        let changes: Vec<f64> = market
            .timeframes
            .volatility_frames()
            .iter()
            .map(|frame| frame.price_change_pct.abs())
            .filter(|c| *c != 0.0)
            .collect();
        if changes.is_empty() {
            return 0.0;
        }
        changes.iter().mean()
    }
}

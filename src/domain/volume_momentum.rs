//! Volume Momentum Analyzer
//!
//! Aggregates volume across the most liquid pairs and classifies the volume
//! trend, buy/sell pressure and accumulation/distribution.
//!
//! Buy and sell volume are *estimated*, not observed: a pair that closed the
//! day up has `up_day_buy_share` of its volume counted as buys, and the split
//! is inverted on flat or down days. The trailing average is the mean of
//! whatever non-zero 6h/24h buckets the pairs report.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ratio::{clamp_score, safe_ratio};
use super::snapshot::{MarketSnapshot, PairSnapshot};
use crate::strategy::params::VolumeParams;

/// Current volume relative to its trailing average
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeTrend {
    Spiking,
    Increasing,
    Stable,
    Decreasing,
}

impl VolumeTrend {
    /// Spiking or increasing
    pub fn is_rising(&self) -> bool {
        matches!(self, VolumeTrend::Spiking | VolumeTrend::Increasing)
    }
}

impl fmt::Display for VolumeTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VolumeTrend::Spiking => "spiking",
            VolumeTrend::Increasing => "increasing",
            VolumeTrend::Stable => "stable",
            VolumeTrend::Decreasing => "decreasing",
        };
        f.write_str(label)
    }
}

/// Volume momentum read for one token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeMomentum {
    pub current_volume_24h: f64,
    pub trailing_average: f64,
    pub volume_ratio: f64,
    pub trend: VolumeTrend,
    pub spike_count: u32,
    /// Percent of estimated volume that was buys
    pub buy_pressure: f64,
    pub sell_pressure: f64,
    /// `buy_pressure - sell_pressure`
    pub net_pressure: f64,
    pub accumulation_score: f64,
    pub distribution_score: f64,
    pub unusual_activity: bool,
    pub insights: Vec<String>,
}

/// Volume momentum analyzer
#[derive(Debug, Clone, Default)]
pub struct VolumeMomentumAnalyzer {
    params: VolumeParams,
}

impl VolumeMomentumAnalyzer {
    pub fn new(params: VolumeParams) -> Self {
        Self { params }
    }

    pub fn analyze(&self, market: &MarketSnapshot) -> VolumeMomentum {
        if market.pairs.is_empty() {
            // Market-level totals stand in for a single pair
            let aggregate = PairSnapshot {
                liquidity_usd: market.liquidity_usd,
                volume_h24: market.volume_24h_usd,
                price_change_h24: market.price_change_24h,
                ..PairSnapshot::default()
            };
            return self.analyze_pairs(std::slice::from_ref(&aggregate));
        }
        self.analyze_pairs(&market.pairs)
    }

    /// Analyze pairs ordered by liquidity, highest first
    pub fn analyze_pairs(&self, pairs: &[PairSnapshot]) -> VolumeMomentum {
        let mut total_volume = 0.0;
        let mut buy_volume = 0.0;
        let mut sell_volume = 0.0;
        let mut history = Vec::new();

        let buy_share = self.params.up_day_buy_share;
        for pair in pairs.iter().take(self.params.max_pairs) {
            total_volume += pair.volume_h24;
            if pair.price_change_h24 > 0.0 {
                buy_volume += pair.volume_h24 * buy_share;
                sell_volume += pair.volume_h24 * (1.0 - buy_share);
            } else {
                buy_volume += pair.volume_h24 * (1.0 - buy_share);
                sell_volume += pair.volume_h24 * buy_share;
            }
            history.extend([pair.volume_h6, pair.volume_h24].into_iter().filter(|v| *v != 0.0));
        }

        let trailing_average = if history.is_empty() {
            total_volume
        } else {
            history.iter().sum::<f64>() / history.len() as f64
        };
        let volume_ratio = safe_ratio(total_volume, trailing_average, 1.0);
        let trend = self.classify_trend(volume_ratio);

        let estimated = buy_volume + sell_volume;
        let buy_pressure = clamp_score(safe_ratio(buy_volume, estimated, 0.5) * 100.0);
        let sell_pressure = 100.0 - buy_pressure;
        let net_pressure = buy_pressure - sell_pressure;

        let (accumulation_score, distribution_score) = self.accumulation_distribution(net_pressure, trend);
        let spiking = trend == VolumeTrend::Spiking;

        let mut momentum = VolumeMomentum {
            current_volume_24h: total_volume,
            trailing_average,
            volume_ratio,
            trend,
            spike_count: u32::from(spiking),
            buy_pressure,
            sell_pressure,
            net_pressure,
            accumulation_score,
            distribution_score,
            unusual_activity: spiking,
            insights: Vec::new(),
        };
        momentum.insights = self.insights(&momentum);
        momentum
    }

    pub fn classify_trend(&self, ratio: f64) -> VolumeTrend {
        if ratio >= self.params.spike_ratio {
            VolumeTrend::Spiking
        } else if ratio >= self.params.increasing_ratio {
            VolumeTrend::Increasing
        } else if ratio <= self.params.decreasing_ratio {
            VolumeTrend::Decreasing
        } else {
            VolumeTrend::Stable
        }
    }

    /// Accumulation and distribution scores, mirrored around net pressure
    fn accumulation_distribution(&self, net_pressure: f64, trend: VolumeTrend) -> (f64, f64) {
        let p = &self.params;
        if net_pressure > p.pressure_threshold && trend.is_rising() {
            (p.dominant_score, p.recessive_score)
        } else if net_pressure < -p.pressure_threshold && trend.is_rising() {
            (p.recessive_score, p.dominant_score)
        } else {
            (p.neutral_score, p.neutral_score)
        }
    }

    fn insights(&self, m: &VolumeMomentum) -> Vec<String> {
        let mut insights = Vec::new();
        if m.trend == VolumeTrend::Spiking {
            insights.push(format!("Volume spike detected ({:.1}x average)", m.volume_ratio));
        }
        if m.net_pressure > self.params.strong_pressure {
            insights.push(format!("Strong buy pressure ({:.0}%)", m.buy_pressure));
        } else if m.net_pressure < -self.params.strong_pressure {
            insights.push(format!("Strong sell pressure ({:.0}%)", m.sell_pressure));
        }
        if m.accumulation_score > self.params.neutral_score {
            insights.push("Accumulation pattern detected".to_string());
        } else if m.distribution_score > self.params.neutral_score {
            insights.push("Distribution pattern detected".to_string());
        }
        insights
    }
}

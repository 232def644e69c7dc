//! Domain Layer - Scoring and signal synthesis for Solana tokens
//!
//! This module contains pure domain types and logic with no I/O.
//! All external interactions happen through the ports layer.
//!
//! ## Components (leaf first)
//!
//! - `risk_model`: Ten bounded risk sub-scores, weighted overall score and rating
//! - `holder_profiler`: Whale / smart money classification and concentration
//! - `volume_momentum`: Volume trend, estimated buy/sell pressure
//! - `technical`: RSI-style oscillator, trend and naive support/resistance
//! - `patterns`: Rule-based chart pattern detection
//! - `signal`: Combined score, signal class and confidence
//! - `trade_setup`: Entry, stop, staged targets, size and hold window

pub mod holder_profiler;
pub mod patterns;
pub mod ratio;
pub mod risk_model;
pub mod signal;
pub mod snapshot;
pub mod technical;
pub mod trade_setup;
pub mod volume_momentum;

pub use holder_profiler::{
    ConcentrationRisk, HolderAnalysis, HolderMetrics, HolderProfile, HolderProfiler, HoldingSizeClassifier, NetFlow,
};
pub use patterns::{ChartPattern, PatternBias, PatternDetector, PatternType};
pub use ratio::{clamp_score, safe_ratio};
pub use risk_model::{
    GreenFlag, OverallRisk, Recommendation, RedFlag, RiskAssessment, RiskFactorModel, RiskFactors, RiskRating,
    TimeframeAnomaly,
};
pub use signal::{CombinedSignal, SignalClass, SignalSynthesizer};
pub use snapshot::{
    AnalysisSnapshot, Authority, FrameStats, HolderEntry, MarketSnapshot, MissingMarketData, PairSnapshot,
    PriorSnapshot, Timeframe, Timeframes, TokenSnapshot,
};
pub use technical::{
    MacdSignal, MomentumIndicators, RsiSource, RsiZone, TechnicalMomentumAnalyzer, TradingTimeframe, TrendDirection,
};
pub use trade_setup::{MaxHold, SetupConfidence, SetupType, TradeSetup, TradeSetupGenerator};
pub use volume_momentum::{VolumeMomentum, VolumeMomentumAnalyzer, VolumeTrend};

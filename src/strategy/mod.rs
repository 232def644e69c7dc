//! Strategy Layer - Engine parameters
//!
//! Every weight, tier cut-off and percentage step the scoring engine uses,
//! injected into the analyzers at construction time.

pub mod params;

pub use params::{
    AboveTiers, BelowTiers, EngineParams, HolderParams, HoldWindow, ParamsError, PatternParams, RiskParams,
    RiskWeights, SetupParams, SignalParams, SignalWeights, TechnicalParams, Tier, VolumeParams,
};

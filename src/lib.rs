//! tokenscope - Scoring and signal synthesis for Solana tokens
//!
//! Turns a point-in-time token snapshot into a risk assessment, holder
//! profile, volume and price momentum reads, detected chart patterns, a
//! combined trade signal and a trade setup.
//!
//! # Modules
//!
//! - `domain`: Scorers and analyzers (RiskFactorModel, HolderProfiler, SignalSynthesizer, ...)
//! - `ports`: Trait abstractions (SnapshotSource, SmartMoneyClassifier)
//! - `strategy`: Engine parameters (weights, tiers, thresholds)
//! - `adapters`: External implementations (JSON snapshot files, CLI)
//! - `config`: Configuration loading and validation
//! - `application`: Analysis pipeline and watchlist scans

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod strategy;

//! Analysis Pipeline
//!
//! Runs the scoring engine over one snapshot:
//! holders -> risk, volume, technical -> patterns -> signal -> trade setup.
//! Also scans a watchlist through a [`SnapshotSource`] with bounded
//! concurrency and ranks the results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::domain::{
    AnalysisSnapshot, ChartPattern, CombinedSignal, HolderMetrics, HolderProfile, HolderProfiler, MomentumIndicators,
    PatternDetector, RiskAssessment, RiskFactorModel, SignalClass, SignalSynthesizer, TechnicalMomentumAnalyzer,
    TradeSetup, TradeSetupGenerator, VolumeMomentum, VolumeMomentumAnalyzer,
};
use crate::ports::{SmartMoneyClassifier, SnapshotSource, SourceError};
use crate::strategy::{EngineParams, ParamsError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid engine parameters: {0}")]
    InvalidParams(#[from] ParamsError),
    #[error("Snapshot source error: {0}")]
    Source(#[from] SourceError),
    #[error("Scan task failed: {0}")]
    Task(String),
}

/// Everything the engine produced for one token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenReport {
    pub address: String,
    pub symbol: String,
    pub name: String,
    /// Capture time of the analyzed snapshot
    pub timestamp: DateTime<Utc>,
    pub price_usd: f64,
    pub risk: RiskAssessment,
    pub holders: HolderMetrics,
    pub top_holders: Vec<HolderProfile>,
    pub volume: VolumeMomentum,
    pub indicators: MomentumIndicators,
    pub patterns: Vec<ChartPattern>,
    pub signal: CombinedSignal,
    pub trade_setup: Option<TradeSetup>,
}

impl TokenReport {
    pub fn combined_score(&self) -> f64 {
        self.signal.combined_score
    }
}

/// Which reports a scan keeps
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScanFilter {
    pub min_score: f64,
    /// Empty means every class
    pub classes: Vec<SignalClass>,
}

impl ScanFilter {
    pub fn new(min_score: f64, classes: Vec<SignalClass>) -> Self {
        Self { min_score, classes }
    }

    pub fn matches(&self, report: &TokenReport) -> bool {
        report.combined_score() >= self.min_score
            && (self.classes.is_empty() || self.classes.contains(&report.signal.signal))
    }
}

/// Scoring engine with all components wired from one parameter set
#[derive(Debug, Clone)]
pub struct AnalysisPipeline {
    risk: RiskFactorModel,
    holders: HolderProfiler,
    volume: VolumeMomentumAnalyzer,
    technical: TechnicalMomentumAnalyzer,
    patterns: PatternDetector,
    signal: SignalSynthesizer,
    setup: TradeSetupGenerator,
}

impl AnalysisPipeline {
    /// Create a pipeline using the holding-size smart money heuristic
    pub fn new(params: EngineParams) -> Result<Self, PipelineError> {
        params.validate()?;
        let holders = HolderProfiler::new(params.holders.clone());
        Ok(Self::assemble(params, holders))
    }

    /// Create a pipeline with a custom smart money classifier
    pub fn with_classifier(
        params: EngineParams,
        classifier: Arc<dyn SmartMoneyClassifier>,
    ) -> Result<Self, PipelineError> {
        params.validate()?;
        let holders = HolderProfiler::with_classifier(params.holders.clone(), classifier);
        Ok(Self::assemble(params, holders))
    }

    fn assemble(params: EngineParams, holders: HolderProfiler) -> Self {
        Self {
            risk: RiskFactorModel::new(params.risk),
            holders,
            volume: VolumeMomentumAnalyzer::new(params.volume),
            technical: TechnicalMomentumAnalyzer::new(params.technical),
            patterns: PatternDetector::new(params.patterns),
            signal: SignalSynthesizer::new(params.signal),
            setup: TradeSetupGenerator::new(params.setup),
        }
    }

    /// Analyze one snapshot. Pure: identical input yields identical output.
    pub fn analyze(&self, snapshot: &AnalysisSnapshot) -> TokenReport {
        let price = snapshot.price();

        let holder_analysis = self.holders.profile(snapshot);
        let risk = self.risk.assess(snapshot, &holder_analysis.metrics);
        let volume = self.volume.analyze(&snapshot.market);
        let indicators = self.technical.analyze(&snapshot.market);

        let patterns = self.patterns.detect(&indicators, &volume, price);
        let signal = self
            .signal
            .synthesize(&holder_analysis.metrics, &volume, &indicators, &patterns, price);
        let trade_setup = self.setup.generate(snapshot, &risk);

        TokenReport {
            address: snapshot.address().to_string(),
            symbol: snapshot.token.symbol.clone(),
            name: snapshot.token.name.clone(),
            timestamp: snapshot.token.timestamp,
            price_usd: price,
            risk,
            holders: holder_analysis.metrics,
            top_holders: holder_analysis.profiles,
            volume,
            indicators,
            patterns,
            signal,
            trade_setup,
        }
    }

    /// Fetch one token from `source` and analyze it
    pub async fn analyze_address(
        &self,
        source: &dyn SnapshotSource,
        address: &str,
    ) -> Result<TokenReport, PipelineError> {
        let snapshot = source.fetch(address).await?;
        let report = self.analyze(&snapshot);
        log_report(&report);
        Ok(report)
    }

    /// Analyze a watchlist with at most `concurrency` fetches in flight.
    /// Failed tokens are logged and dropped; results are sorted by combined
    /// score, highest first.
    pub async fn scan(
        &self,
        source: Arc<dyn SnapshotSource>,
        addresses: &[String],
        concurrency: usize,
    ) -> Vec<TokenReport> {
        let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
        let mut seen = HashSet::new();
        let mut tasks = JoinSet::new();

        // One fetch per address
        for address in addresses.iter().filter(|a| seen.insert(a.as_str())) {
            let pipeline = self.clone();
            let source = Arc::clone(&source);
            let semaphore = Arc::clone(&semaphore);
            let address = address.clone();
            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| PipelineError::Task(e.to_string()))?;
                pipeline.analyze_address(source.as_ref(), &address).await.map_err(|e| {
                    tracing::warn!(address = %address, source = source.source_name(), "Skipping token: {}", e);
                    e
                })
            });
        }

        let mut reports = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(report)) => reports.push(report),
                Ok(Err(_)) => {}
                Err(e) => tracing::warn!("Scan task panicked or was cancelled: {}", e),
            }
        }

        reports.sort_by(|a, b| {
            b.combined_score()
                .total_cmp(&a.combined_score())
                .then_with(|| a.address.cmp(&b.address))
        });
        reports
    }

    /// Scan and keep only reports passing `filter`
    pub async fn find_opportunities(
        &self,
        source: Arc<dyn SnapshotSource>,
        addresses: &[String],
        concurrency: usize,
        filter: &ScanFilter,
    ) -> Vec<TokenReport> {
        let reports = self.scan(source, addresses, concurrency).await;
        let total = reports.len();
        let kept: Vec<TokenReport> = reports.into_iter().filter(|r| filter.matches(r)).collect();
        tracing::info!(
            scanned = total,
            kept = kept.len(),
            min_score = filter.min_score,
            "Opportunity scan complete"
        );
        kept
    }
}

fn log_report(report: &TokenReport) {
    tracing::info!(
        address = %report.address,
        symbol = %report.symbol,
        risk_score = report.risk.score(),
        rating = %report.risk.rating(),
        signal = %report.signal.signal,
        combined = report.signal.combined_score,
        "Token analyzed"
    );
    for pattern in &report.patterns {
        tracing::debug!(
            address = %report.address,
            pattern = %pattern.pattern_type,
            confidence = pattern.confidence,
            "Pattern detected"
        );
    }
    match &report.trade_setup {
        Some(setup) => tracing::debug!(
            address = %report.address,
            setup_type = %setup.setup_type,
            position_size_pct = setup.position_size_pct,
            max_hold = %setup.max_hold,
            "Trade setup generated"
        ),
        None => tracing::debug!(address = %report.address, "No trade setup (no usable price)"),
    }
}

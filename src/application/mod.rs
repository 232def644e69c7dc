//! Application Layer - Analysis pipeline and watchlist scans

pub mod pipeline;

pub use pipeline::{AnalysisPipeline, PipelineError, ScanFilter, TokenReport};

//! CLI Command Handlers
//!
//! Implementation of all CLI commands for tokenscope.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::adapters::snapshot_file::{load_snapshot_file, JsonFileSource};
use crate::application::{AnalysisPipeline, ScanFilter, TokenReport};
use crate::config::{load_or_default, Config};

/// tokenscope - Solana token scoring and signal synthesis
#[derive(Parser, Debug)]
#[command(
    name = "tokenscope",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "Risk scoring and trade signals for Solana tokens",
    long_about = "tokenscope scores token snapshots for rug-pull risk, profiles holders, \
                  reads volume and price momentum, and combines them into a trade signal \
                  with a concrete entry, stop and staged targets."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a single snapshot file
    Analyze(AnalyzeCmd),

    /// Analyze every token on a watchlist and rank the opportunities
    Scan(ScanCmd),

    /// Load and validate the configuration
    CheckConfig,
}

/// Analyze one snapshot
#[derive(Parser, Debug)]
pub struct AnalyzeCmd {
    /// Snapshot JSON file
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Print single-line JSON
    #[arg(long)]
    pub compact: bool,
}

/// Scan a watchlist
#[derive(Parser, Debug)]
pub struct ScanCmd {
    /// File with one token address per line ('#' starts a comment)
    #[arg(short, long, value_name = "FILE")]
    pub watchlist: PathBuf,

    /// Override the snapshot directory
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Override the minimum combined score
    #[arg(long, value_name = "SCORE")]
    pub min_score: Option<f64>,

    /// Override the number of concurrent fetches
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Report every analyzed token, not just opportunities
    #[arg(long)]
    pub all: bool,

    /// Output JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Execute the CLI command
pub async fn execute(app: CliApp) -> Result<()> {
    let config = load_or_default(app.config.as_deref()).with_context(|| match &app.config {
        Some(path) => format!("Failed to load configuration from {}", path.display()),
        None => "Default configuration is invalid".to_string(),
    })?;

    init_logging(app.verbose, app.debug, &config.logging.level)?;

    match app.command {
        Command::Analyze(cmd) => analyze_command(cmd, &config),
        Command::Scan(cmd) => scan_command(cmd, &config).await,
        Command::CheckConfig => check_config_command(app.config.as_deref(), &config),
    }
}

/// Initialize logging system
fn init_logging(verbose: bool, debug: bool, configured_level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(configured_level))
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Handle analyze command
fn analyze_command(cmd: AnalyzeCmd, config: &Config) -> Result<()> {
    tracing::info!("Analyzing snapshot {}", cmd.snapshot.display());

    let snapshot = load_snapshot_file(&cmd.snapshot)
        .with_context(|| format!("Failed to load snapshot {}", cmd.snapshot.display()))?;
    let pipeline = AnalysisPipeline::new(config.engine.clone()).context("Failed to build analysis pipeline")?;
    let report = pipeline.analyze(&snapshot);

    let output = if cmd.compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    println!("{}", output);
    Ok(())
}

/// Handle scan command
async fn scan_command(cmd: ScanCmd, config: &Config) -> Result<()> {
    let content = std::fs::read_to_string(&cmd.watchlist)
        .with_context(|| format!("Failed to read watchlist {}", cmd.watchlist.display()))?;
    let addresses = parse_watchlist(&content);
    if addresses.is_empty() {
        anyhow::bail!("Watchlist {} contains no addresses", cmd.watchlist.display());
    }

    let dir = cmd.dir.clone().unwrap_or_else(|| config.scan.snapshot_dir());
    let concurrency = cmd.concurrency.unwrap_or(config.scan.concurrency).clamp(1, 64);
    tracing::info!(
        tokens = addresses.len(),
        concurrency,
        "Scanning snapshots in {}",
        dir.display()
    );

    let pipeline = AnalysisPipeline::new(config.engine.clone()).context("Failed to build analysis pipeline")?;
    let source = Arc::new(JsonFileSource::new(dir));

    let reports = if cmd.all {
        pipeline.scan(source, &addresses, concurrency).await
    } else {
        let mut filter = config.scan.filter()?;
        if let Some(min_score) = cmd.min_score {
            filter.min_score = min_score;
        }
        pipeline
            .find_opportunities(source, &addresses, concurrency, &filter)
            .await
    };

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        print_table(&reports);
    }
    Ok(())
}

/// Handle check-config command
fn check_config_command(path: Option<&Path>, config: &Config) -> Result<()> {
    let filter: ScanFilter = config.scan.filter()?;
    match path {
        Some(path) => println!("✓ Configuration valid: {}", path.display()),
        None => println!("✓ Built-in defaults valid"),
    }
    println!("  Snapshot dir: {}", config.scan.snapshot_dir().display());
    println!("  Concurrency:  {}", config.scan.concurrency);
    println!("  Min score:    {:.1}", filter.min_score);
    println!(
        "  Signals:      {}",
        filter.classes.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(", ")
    );
    let w = &config.engine.signal.weights;
    println!(
        "  Weights:      smart money {:.2} / momentum {:.2} / pattern {:.2}",
        w.smart_money, w.momentum, w.pattern
    );
    Ok(())
}

/// Parse a watchlist: one address per line, blank lines and `#` comments skipped
pub fn parse_watchlist(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn print_table(reports: &[TokenReport]) {
    if reports.is_empty() {
        println!("No tokens matched.");
        return;
    }
    println!(
        "{:>3}  {:<10} {:<44} {:>6} {:<11} {:>5} {:>5} {:<8} {:<18}",
        "#", "SYMBOL", "ADDRESS", "SCORE", "SIGNAL", "CONF", "RISK", "RATING", "SETUP"
    );
    for (rank, report) in reports.iter().enumerate() {
        let setup = report
            .trade_setup
            .as_ref()
            .map(|s| s.setup_type.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>3}  {:<10} {:<44} {:>6.1} {:<11} {:>5.0} {:>5} {:<8} {:<18}",
            rank + 1,
            report.symbol,
            report.address,
            report.signal.combined_score,
            report.signal.signal.to_string(),
            report.signal.confidence,
            report.risk.score(),
            report.risk.rating().to_string(),
            setup
        );
    }
}

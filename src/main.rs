//! tokenscope - Solana token scoring and signal synthesis
//!
//! Scores token snapshots for risk and combines holder, volume and price
//! momentum reads into a trade signal with a concrete setup.

use anyhow::Result;

use tokenscope::adapters::cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (TOKENSCOPE_SNAPSHOT_DIR, RUST_LOG)
    dotenvy::dotenv().ok();

    let app = cli::init();
    cli::execute(app).await
}

//! Scoring Engine Integration Tests
//!
//! End-to-end checks over the full pipeline:
//! 1. Risk scoring scenarios and rating boundaries
//! 2. Bounds, monotonicity and idempotence over randomized snapshots
//! 3. Signal confidence and trade setup sizing tiers
//! 4. Snapshot file loading and watchlist scans
//!
//! All tests are deterministic (seeded randomness, no network) and use local data.

use std::io::Write;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;
use tempfile::TempDir;

use tokenscope::adapters::snapshot_file::{load_snapshot_file, JsonFileSource};
use tokenscope::application::{AnalysisPipeline, ScanFilter};
use tokenscope::domain::{
    AnalysisSnapshot, Authority, FrameStats, HolderEntry, PairSnapshot, RiskFactorModel, RiskFactors, RiskRating,
    SignalClass, SignalSynthesizer, Timeframes, TradeSetupGenerator,
};
use tokenscope::ports::mocks::MockSnapshotSource;
use tokenscope::strategy::{EngineParams, RiskParams, SetupParams, SignalParams};

// ============================================================================
// Test Fixtures
// ============================================================================

const BONK: &str = "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263";
const WSOL: &str = "So11111111111111111111111111111111111111112";
const USDC: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

fn create_pipeline() -> AnalysisPipeline {
    AnalysisPipeline::new(EngineParams::default()).unwrap()
}

fn create_base_snapshot(address: &str) -> AnalysisSnapshot {
    let ts = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    let mut snapshot = AnalysisSnapshot::empty(address, ts);
    snapshot.token.name = "Fixture".to_string();
    snapshot.token.symbol = "FIX".to_string();
    snapshot.token.is_initialized = true;
    snapshot.token.supply = 1_000_000_000_000;
    snapshot.token.decimals = 6;
    snapshot
}

/// Ten holders with an equal share each
fn create_even_holders(pct_each: f64, balance_each: f64) -> Vec<HolderEntry> {
    (0..10)
        .map(|i| HolderEntry {
            address: format!("Holder{i}"),
            balance: balance_each,
            percent_of_supply: pct_each,
        })
        .collect()
}

/// Clean, liquid, mature token: authorities revoked, 25% top-10 concentration
fn create_clean_snapshot() -> AnalysisSnapshot {
    let mut snapshot = create_base_snapshot(BONK);
    snapshot.token.mint_authority = Authority::Revoked;
    snapshot.token.freeze_authority = Authority::Revoked;
    snapshot.market.price_usd = 0.02;
    snapshot.market.price_change_24h = 5.0;
    snapshot.market.liquidity_usd = 1_200_000.0;
    snapshot.market.volume_24h_usd = 3_000_000.0;
    snapshot.market.pair_count = 1;
    snapshot.holders = create_even_holders(2.5, 25_000.0);
    snapshot.contract_age_days = 120.0;
    snapshot
}

/// Live authorities, thin liquidity, a single holder with 95%
fn create_rug_snapshot() -> AnalysisSnapshot {
    let mut snapshot = create_base_snapshot(WSOL);
    snapshot.token.mint_authority = Authority::Active("Minter1111111111111111111111111111111111111".to_string());
    snapshot.token.freeze_authority = Authority::Active("Freezer111111111111111111111111111111111111".to_string());
    snapshot.market.price_usd = 0.0001;
    snapshot.market.liquidity_usd = 5_000.0;
    snapshot.market.volume_24h_usd = 2_000.0;
    snapshot.holders = vec![HolderEntry {
        address: "Dev".to_string(),
        balance: 950_000.0,
        percent_of_supply: 95.0,
    }];
    snapshot.contract_age_days = 0.5;
    snapshot
}

/// Smart money buying into a spiking breakout
fn create_breakout_snapshot() -> AnalysisSnapshot {
    let mut snapshot = create_base_snapshot(USDC);
    snapshot.token.mint_authority = Authority::Revoked;
    snapshot.token.freeze_authority = Authority::Revoked;
    snapshot.market.price_usd = 0.05;
    snapshot.market.price_change_24h = 15.0;
    snapshot.market.liquidity_usd = 1_000_000.0;
    snapshot.market.volume_24h_usd = 5_000_000.0;
    snapshot.market.pair_count = 5;
    snapshot.market.pairs = (0..5)
        .map(|i| PairSnapshot {
            pair_address: format!("Pair{i}"),
            dex_id: "raydium".to_string(),
            liquidity_usd: 200_000.0,
            volume_h24: 1_000_000.0,
            volume_h6: 0.0,
            price_change_h24: 15.0,
        })
        .collect();
    snapshot.holders = create_even_holders(2.0, 400_000.0);
    snapshot.contract_age_days = 200.0;
    snapshot
}

fn random_frame(rng: &mut StdRng) -> FrameStats {
    FrameStats {
        volume_usd: rng.gen_range(0.0..500_000.0),
        price_change_pct: rng.gen_range(-80.0..200.0),
    }
}

fn random_authority(rng: &mut StdRng) -> Authority {
    match rng.gen_range(0..3) {
        0 => Authority::Revoked,
        1 => Authority::Active("Auth".to_string()),
        _ => Authority::Unknown,
    }
}

fn create_random_snapshot(rng: &mut StdRng, index: usize) -> AnalysisSnapshot {
    let mut snapshot = create_base_snapshot(&format!("Random{index}"));
    snapshot.token.mint_authority = random_authority(rng);
    snapshot.token.freeze_authority = random_authority(rng);
    snapshot.token.is_initialized = rng.gen_bool(0.8);

    let market = &mut snapshot.market;
    market.price_usd = if rng.gen_bool(0.1) { 0.0 } else { rng.gen_range(0.000_001..50.0) };
    market.price_change_24h = rng.gen_range(-95.0..400.0);
    market.price_change_7d = rng.gen_bool(0.5).then(|| rng.gen_range(-90.0..900.0));
    market.liquidity_usd = if rng.gen_bool(0.1) { 0.0 } else { rng.gen_range(0.0..5_000_000.0) };
    market.volume_24h_usd = rng.gen_range(0.0..80_000_000.0);
    market.timeframes = Timeframes {
        m5: random_frame(rng),
        m15: random_frame(rng),
        m30: random_frame(rng),
        h1: random_frame(rng),
        h6: random_frame(rng),
        h24: random_frame(rng),
    };
    let pair_count = rng.gen_range(0..8);
    market.pairs = (0..pair_count)
        .map(|i| PairSnapshot {
            pair_address: format!("Pair{i}"),
            dex_id: "orca".to_string(),
            liquidity_usd: rng.gen_range(0.0..1_000_000.0),
            volume_h24: rng.gen_range(0.0..10_000_000.0),
            volume_h6: rng.gen_range(0.0..3_000_000.0),
            price_change_h24: rng.gen_range(-90.0..300.0),
        })
        .collect();
    market.pair_count = pair_count;
    if rng.gen_bool(0.3) {
        market.close_prices = (0..20).map(|_| rng.gen_range(0.5..1.5)).collect();
    }

    let holder_count = rng.gen_range(0..25);
    let mut holders: Vec<HolderEntry> = (0..holder_count)
        .map(|i| HolderEntry {
            address: format!("H{i}"),
            balance: rng.gen_range(0.0..10_000_000.0),
            percent_of_supply: rng.gen_range(0.0..40.0),
        })
        .collect();
    holders.sort_by(|a, b| b.percent_of_supply.total_cmp(&a.percent_of_supply));
    snapshot.holders = holders;
    snapshot.contract_age_days = rng.gen_range(0.0..500.0);
    snapshot
}

fn factors_from(values: [u8; 10]) -> RiskFactors {
    RiskFactors {
        mint_authority: values[0],
        freeze_authority: values[1],
        liquidity: values[2],
        holder_concentration: values[3],
        contract_age: values[4],
        verification: values[5],
        scam_pattern: values[6],
        volume: values[7],
        volatility: values[8],
        price_manipulation: values[9],
    }
}

fn write_snapshot(dir: &TempDir, address: &str, body: &str) {
    let path = dir.path().join(format!("{address}.json"));
    let mut file = std::fs::File::create(path).unwrap();
    file.write_all(body.as_bytes()).unwrap();
}

fn snapshot_json(address: &str, symbol: &str, change_24h: f64) -> String {
    format!(
        r#"{{
            "timestamp": "2026-03-01T12:00:00Z",
            "token": {{
                "address": "{address}",
                "name": "{symbol} Token",
                "symbol": "{symbol}",
                "mint_authority": null,
                "freeze_authority": null,
                "supply": 1000000000000,
                "decimals": 6,
                "is_initialized": true
            }},
            "market": {{
                "price_usd": 0.05,
                "price_change_24h": {change_24h},
                "liquidity_usd": 900000.0,
                "volume_24h_usd": 1800000.0
            }},
            "holders": [
                {{"address": "A", "balance": 40000.0, "percent_of_supply": 4.0}},
                {{"address": "B", "balance": 30000.0}}
            ],
            "contract_age_days": 150.0
        }}"#
    )
}

// ============================================================================
// Risk Scoring
// ============================================================================

mod risk_tests {
    use super::*;

    #[test]
    fn test_clean_token_scores_low() {
        let report = create_pipeline().analyze(&create_clean_snapshot());
        let f = report.risk.factors;

        assert_eq!(f.mint_authority, 0);
        assert_eq!(f.freeze_authority, 0);
        assert_eq!(f.liquidity, 10);
        assert_eq!(f.holder_concentration, 20);
        assert_eq!(f.contract_age, 10);
        assert_eq!(f.verification, 0);
        assert_eq!(f.scam_pattern, 0);
        assert_eq!(f.volume, 30);
        assert_eq!(f.volatility, 30);
        assert_eq!(f.price_manipulation, 0);

        assert_eq!(report.risk.score(), 10);
        assert_eq!(report.risk.rating(), RiskRating::Low);
        assert!(report.risk.red_flags.is_empty());
    }

    #[test]
    fn test_rug_profile_scores_at_least_high() {
        let report = create_pipeline().analyze(&create_rug_snapshot());
        let f = report.risk.factors;

        assert_eq!(f.mint_authority, 100);
        assert_eq!(f.freeze_authority, 80);
        assert_eq!(f.liquidity, 100);
        assert_eq!(f.holder_concentration, 100);
        assert!(report.risk.score() >= 48);
        assert!(report.risk.rating() >= RiskRating::High);
        assert!(report.risk.red_flag_labels().len() >= 4);
    }

    #[test]
    fn test_rating_boundaries() {
        let model = RiskFactorModel::new(RiskParams::default());
        let cases = [
            (0, RiskRating::Low),
            (20, RiskRating::Low),
            (21, RiskRating::Medium),
            (40, RiskRating::Medium),
            (41, RiskRating::High),
            (60, RiskRating::High),
            (61, RiskRating::Extreme),
            (100, RiskRating::Extreme),
        ];
        for (score, expected) in cases {
            assert_eq!(model.rating(score), expected, "score {score}");
        }
    }

    #[test]
    fn test_overall_monotonic_in_each_factor() {
        let model = RiskFactorModel::new(RiskParams::default());
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..500 {
            let base: [u8; 10] = std::array::from_fn(|_| rng.gen_range(0..=100));
            let before = model.overall(&factors_from(base)).score;
            for i in 0..10 {
                let mut raised = base;
                raised[i] = rng.gen_range(base[i]..=100);
                let after = model.overall(&factors_from(raised)).score;
                assert!(after >= before, "factor {i}: {before} -> {after} for {base:?}");
            }
        }
    }

    #[test]
    fn test_empty_snapshot_is_maximally_conservative() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let report = create_pipeline().analyze(&AnalysisSnapshot::empty(BONK, ts));

        assert_eq!(report.risk.factors.mint_authority, 100);
        assert_eq!(report.risk.factors.freeze_authority, 80);
        assert_eq!(report.risk.factors.liquidity, 100);
        assert_eq!(report.risk.factors.holder_concentration, 100);
        assert_eq!(report.risk.rating(), RiskRating::Extreme);
        assert!(report.trade_setup.is_none());
        assert!(!report.signal.signal.is_buy());
        assert!(report.signal.validate().is_ok());
    }
}

// ============================================================================
// Pipeline Properties
// ============================================================================

mod property_tests {
    use super::*;

    #[test]
    fn test_all_outputs_bounded() {
        let pipeline = create_pipeline();
        let mut rng = StdRng::seed_from_u64(42);

        for i in 0..300 {
            let snapshot = create_random_snapshot(&mut rng, i);
            let report = pipeline.analyze(&snapshot);

            for (n, value) in report.risk.factors.as_array().iter().enumerate() {
                assert!(*value <= 100, "factor {n} = {value}");
            }
            assert!(report.risk.score() <= 100);
            assert!(report.signal.validate().is_ok(), "{:?}", report.signal);

            let indicators = &report.indicators;
            assert!((0.0..=100.0).contains(&indicators.rsi));
            assert!((0.0..=100.0).contains(&indicators.trend_strength));
            assert!((0.0..=100.0).contains(&report.volume.buy_pressure));
            assert!(report.volume.volume_ratio.is_finite());
            assert!((0.0..=100.0).contains(&report.holders.top10_concentration_pct));

            for pattern in &report.patterns {
                assert!((0.0..=100.0).contains(&pattern.confidence));
            }

            if let Some(setup) = &report.trade_setup {
                assert!(setup.stop_loss < setup.entry_price);
                assert!(setup.take_profits.iter().all(|tp| tp.is_finite() && *tp > setup.entry_price));
                assert!(setup.position_size_pct > 0.0 && setup.position_size_pct <= 3.0);
            } else {
                assert!(snapshot.market.price_usd <= 0.0);
            }
        }
    }

    #[test]
    fn test_pipeline_is_idempotent() {
        let pipeline = create_pipeline();
        let mut rng = StdRng::seed_from_u64(1234);

        for i in 0..50 {
            let snapshot = create_random_snapshot(&mut rng, i);
            let first = pipeline.analyze(&snapshot);
            let second = pipeline.analyze(&snapshot);
            assert_eq!(first, second);
            assert_eq!(
                serde_json::to_string(&first).unwrap(),
                serde_json::to_string(&second).unwrap()
            );
        }
    }

    #[test]
    fn test_confidence_tracks_subscore_agreement() {
        let synthesizer = SignalSynthesizer::new(SignalParams::default());

        assert_eq!(synthesizer.confidence(&[50.0, 60.0, 69.9]), 85.0);
        assert_eq!(synthesizer.confidence(&[40.0, 55.0, 70.0]), 70.0);
        assert_eq!(synthesizer.confidence(&[20.0, 50.0, 60.0]), 55.0);
        assert_eq!(synthesizer.confidence(&[10.0, 50.0, 90.0]), 55.0);
    }

    #[test]
    fn test_position_size_non_increasing_with_risk() {
        let generator = TradeSetupGenerator::new(SetupParams::default());
        let sizes: Vec<f64> = (0..=100u8).map(|risk| generator.position_size(risk)).collect();

        assert!(sizes.windows(2).all(|w| w[1] <= w[0]));
        assert_eq!(generator.position_size(30), 3.0);
        assert_eq!(generator.position_size(31), 2.5);
        assert_eq!(generator.position_size(35), 2.5);
        assert_eq!(generator.position_size(40), 2.0);
        assert_eq!(generator.position_size(41), 1.0);
    }

    #[test]
    fn test_breakout_signal_carries_levels() {
        let report = create_pipeline().analyze(&create_breakout_snapshot());

        assert!(report.signal.signal.is_buy());
        assert!(report.patterns.iter().any(|p| p.is_bullish()));

        let risk_reward = report.signal.risk_reward.as_deref().unwrap();
        let format = Regex::new(r"^1:\d+\.\d$").unwrap();
        assert!(format.is_match(risk_reward), "{risk_reward}");
        assert!(report.signal.suggested_stop.unwrap() < 0.05);
        assert!(report.signal.suggested_target.unwrap() > 0.05);
    }
}

// ============================================================================
// Snapshot Sources and Scans
// ============================================================================

mod scan_tests {
    use super::*;

    #[test]
    fn test_file_snapshot_round_trip_into_report() {
        let dir = TempDir::new().unwrap();
        write_snapshot(&dir, BONK, &snapshot_json(BONK, "BONK", 8.0));

        let snapshot = load_snapshot_file(dir.path().join(format!("{BONK}.json"))).unwrap();
        assert_eq!(snapshot.holders[1].percent_of_supply, 3.0);

        let report = create_pipeline().analyze(&snapshot);
        assert_eq!(report.symbol, "BONK");
        assert_eq!(report.risk.factors.mint_authority, 0);
        assert!(report.trade_setup.is_some());
    }

    #[test]
    fn test_scan_json_directory() {
        let dir = TempDir::new().unwrap();
        write_snapshot(&dir, BONK, &snapshot_json(BONK, "BONK", 18.0));
        write_snapshot(&dir, WSOL, &snapshot_json(WSOL, "WSOL", -30.0));
        write_snapshot(&dir, USDC, "{ this is not json");

        let source = Arc::new(JsonFileSource::new(dir.path()));
        let addresses = vec![
            BONK.to_string(),
            WSOL.to_string(),
            USDC.to_string(),
            "not-an-address".to_string(),
        ];

        let reports = tokio_test::block_on(create_pipeline().scan(source, &addresses, 2));
        assert_eq!(reports.len(), 2);
        assert!(reports[0].combined_score() >= reports[1].combined_score());
        assert_eq!(reports[0].symbol, "BONK");
    }

    #[test]
    fn test_scan_with_mock_source_fetches_each_address_once() {
        let source = MockSnapshotSource::new()
            .with_snapshot(create_clean_snapshot())
            .with_snapshot(create_rug_snapshot());
        let addresses = vec![BONK.to_string(), WSOL.to_string(), BONK.to_string()];

        let reports = tokio_test::block_on(create_pipeline().scan(Arc::new(source.clone()), &addresses, 8));
        assert_eq!(reports.len(), 2);

        let mut calls = source.get_calls();
        calls.sort();
        assert_eq!(calls, vec![BONK.to_string(), WSOL.to_string()]);
    }

    #[test]
    fn test_find_opportunities_applies_filter() {
        let source = MockSnapshotSource::new()
            .with_snapshot(create_breakout_snapshot())
            .with_snapshot(create_rug_snapshot());
        let addresses = vec![USDC.to_string(), WSOL.to_string()];
        let filter = ScanFilter::new(60.0, vec![SignalClass::Buy, SignalClass::StrongBuy]);

        let kept = tokio_test::block_on(create_pipeline().find_opportunities(
            Arc::new(source),
            &addresses,
            4,
            &filter,
        ));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].address, USDC);
    }
}

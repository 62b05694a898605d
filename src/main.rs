// =============================================================================
// stockscope — Main Entry Point
// =============================================================================
//
// Starts the market snapshot scheduler, runs one analysis pass over the
// configured symbols, then serves until Ctrl+C.
// =============================================================================

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use stockscope::analysis::Analyzer;
use stockscope::market::{MarketAggregator, SeriesSource, SyntheticSeriesSource};
use stockscope::prediction::PredictionProjector;
use stockscope::runtime_config::RuntimeConfig;
use stockscope::scheduler::RefreshScheduler;

const CONFIG_PATH: &str = "stockscope_config.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("stockscope starting up");

    let mut config = RuntimeConfig::load(CONFIG_PATH).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });

    let env_symbols = std::env::var("STOCKSCOPE_SYMBOLS").ok();
    let env_refresh = std::env::var("STOCKSCOPE_REFRESH_SECS").ok();
    config.apply_overrides(env_symbols.as_deref(), env_refresh.as_deref());

    info!(
        universe = config.universe.len(),
        refresh_interval_secs = config.refresh_interval_secs,
        ranking_size = config.ranking_size,
        sector_mode = ?config.sector_mode,
        "Configuration resolved"
    );

    // ── 2. Market snapshot scheduler ─────────────────────────────────────
    let aggregator = Arc::new(MarketAggregator::from_config(&config));
    let scheduler = RefreshScheduler::new(aggregator.clone(), config.refresh_interval());
    let token = CancellationToken::new();
    let scheduler_handle = scheduler.start(token.clone());

    // ── 3. Single-instrument analysis pass ───────────────────────────────
    let source = SyntheticSeriesSource::new(config.rng_seed.unwrap_or_default());
    let analyzer = Analyzer::new(
        config.indicator_params.clone(),
        PredictionProjector::new(config.horizons.clone()),
    );

    for symbol in &config.analysis_symbols {
        let series = match source.series(symbol, config.history_bars) {
            Ok(s) => s,
            Err(e) => {
                error!(symbol = %symbol, error = %e, "series unavailable, skipping analysis");
                continue;
            }
        };
        let report = analyzer.analyze(symbol, &series);
        info!(
            symbol = %report.symbol,
            price = ?report.current_price,
            rsi = report.indicators.rsi,
            trend = %report.indicators.trend,
            strength = %report.indicators.strength,
            risk_score = ?report.risk.as_ref().map(|r| r.risk_score),
            signal = %report.recommendation.signal,
            "analysis report"
        );
        match serde_json::to_string(&report) {
            Ok(json) => tracing::debug!(symbol = %symbol, report = %json, "analysis report json"),
            Err(e) => warn!(symbol = %symbol, error = %e, "failed to serialise report"),
        }
    }

    info!("All subsystems running. Press Ctrl+C to stop.");

    // ── 4. Graceful shutdown ─────────────────────────────────────────────
    tokio::signal::ctrl_c().await?;
    warn!("Shutdown signal received, stopping gracefully");

    token.cancel();
    if let Err(e) = scheduler_handle.await {
        error!(error = %e, "scheduler task ended abnormally");
    }

    let status = scheduler.status();
    info!(
        completed = status.completed,
        failed = status.failed,
        skipped = status.skipped,
        "scheduler stopped"
    );
    if let Ok(snapshot) = aggregator.current_snapshot() {
        info!(sequence = snapshot.sequence, "last published market snapshot");
    }

    if let Err(e) = config.save(CONFIG_PATH) {
        error!(error = %e, "Failed to save runtime config on shutdown");
    }

    info!("stockscope shut down complete.");
    Ok(())
}

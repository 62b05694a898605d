// =============================================================================
// Synthetic price series — deterministic random-walk adapter
// =============================================================================
//
// Stands in for a live data feed. Each symbol gets its own RNG stream seeded
// from `seed ^ stable_hash(symbol)`, so a given (seed, symbol, bars, anchor)
// always yields the same series.
//
//   start price = 100 + hash % 400
//   close_t     = close_{t-1} * (1 + U(-5%, +6%))
//   open = 0.99 c, high = 1.02 c, low = 0.98 c, volume = U[1M, 10M]
//
// Bars are daily and end at `anchor`.
// =============================================================================

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::symbol_hash::stable_hash;
use crate::types::{round2, PriceBar, PriceSeries};

/// Anything that can hand the analysis path an assembled price series.
pub trait SeriesSource: Send + Sync {
    fn series(&self, symbol: &str, bars: usize) -> Result<PriceSeries>;
}

#[derive(Debug, Clone)]
pub struct SyntheticSeriesSource {
    seed: u64,
}

impl SyntheticSeriesSource {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Generate `bars` daily bars for `symbol` ending at `anchor`.
    pub fn generate(&self, symbol: &str, bars: usize, anchor: DateTime<Utc>) -> Result<PriceSeries> {
        let hash = stable_hash(symbol);
        let mut rng = StdRng::seed_from_u64(self.seed ^ hash);
        let mut close = 100.0 + (hash % 400) as f64;

        let mut out = Vec::with_capacity(bars);
        for i in 0..bars {
            close *= 1.0 + rng.gen_range(-0.05..0.06);
            let days_back = (bars - 1 - i) as i64;
            out.push(PriceBar {
                timestamp: anchor - Duration::days(days_back),
                open: round2(close * 0.99),
                high: round2(close * 1.02),
                low: round2(close * 0.98),
                close: round2(close),
                volume: rng.gen_range(1_000_000_u64..=10_000_000) as f64,
            });
        }

        PriceSeries::new(out)
            .with_context(|| format!("synthetic series for {symbol} violated bar invariants"))
    }
}

impl SeriesSource for SyntheticSeriesSource {
    fn series(&self, symbol: &str, bars: usize) -> Result<PriceSeries> {
        // Anchor to midnight so repeated calls on the same day agree.
        let today = Utc::now().date_naive().and_hms_opt(0, 0, 0).unwrap_or_default();
        self.generate(symbol, bars, today.and_utc())
    }
}

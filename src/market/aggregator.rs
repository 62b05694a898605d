// =============================================================================
// Market Aggregator — universe quotes, rankings and summary snapshot
// =============================================================================
//
// One refresh:
//   1. Quote every symbol: base price from a stable hash of the symbol
//      (50 + hash % 300), then a random daily change in [-5%, +5%], a random
//      volume in [1M, 50M] and a market cap of price * random share count.
//   2. Rank: gainers (top N by change%), losers (bottom N), most active (top
//      N by volume).
//   3. Sector performance (independent draws, or derived from the quotes).
//   4. Four headline indices with a random change in [-2%, +2%].
//   5. Breadth summary.
//   6. Publish the finished snapshot with a single pointer swap.
//
// Readers only ever see a complete snapshot: the new `Arc` is built off to the
// side and swapped in under one short write lock.
// =============================================================================

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::snapshot::{
    IndexQuote, MarketSnapshot, MarketSummary, Quote, Rankings, SectorPerformance,
};
use super::universe::{SymbolDirectory, SECTORS};
use crate::runtime_config::RuntimeConfig;
use crate::scheduler::RefreshSource;
use crate::symbol_hash::stable_hash;
use crate::types::round2;

/// Bounds of the simulated per-symbol daily move, in percent.
const DAILY_CHANGE_PCT: f64 = 5.0;
/// Bounds of the simulated per-sector move, in percent.
const SECTOR_CHANGE_PCT: f64 = 3.0;
/// Bounds of the simulated index move, in percent.
const INDEX_CHANGE_PCT: f64 = 2.0;

/// Headline indices: (name, ticker, base level).
const INDICES: [(&str, &str, f64); 4] = [
    ("S&P 500", "^GSPC", 4500.0),
    ("Dow Jones", "^DJI", 35000.0),
    ("NASDAQ", "^IXIC", 14000.0),
    ("Russell 2000", "^RUT", 2000.0),
];

/// How sector performance is produced on each refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectorMode {
    /// Each sector draws its own change and company count, unrelated to the
    /// per-symbol quotes.
    #[default]
    Independent,
    /// Sector change is the mean change of the quotes in that sector and the
    /// company count is the number of those quotes.
    DerivedFromQuotes,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarketError {
    #[error("market data not yet available: no refresh has completed")]
    NotYetAvailable,
}

/// Deterministic base price for `symbol`, in [50, 350).
pub fn base_price(symbol: &str) -> f64 {
    50.0 + (stable_hash(symbol) % 300) as f64
}

// =============================================================================
// Pure building blocks
// =============================================================================

/// Split quotes into gainers, losers and most-active lists of at most `n`.
///
/// Quotes are ordered by `(change_percent, symbol)`; gainers are taken from
/// the top of that order and losers from the bottom, never overlapping. With
/// at least `2 * n` quotes both lists hold exactly `n`.
pub fn rank_quotes(quotes: &[Quote], n: usize) -> Rankings {
    let mut by_change: Vec<&Quote> = quotes.iter().collect();
    by_change.sort_by(|a, b| {
        a.change_percent
            .total_cmp(&b.change_percent)
            .then_with(|| a.symbol.cmp(&b.symbol))
    });

    let gainer_count = n.min(by_change.len());
    let loser_count = n.min(by_change.len() - gainer_count);

    let gainers = by_change.iter().rev().take(gainer_count).map(|q| (*q).clone()).collect();
    let losers = by_change.iter().take(loser_count).map(|q| (*q).clone()).collect();

    let mut by_volume: Vec<&Quote> = quotes.iter().collect();
    by_volume.sort_by(|a, b| b.volume.cmp(&a.volume).then_with(|| a.symbol.cmp(&b.symbol)));
    let most_active = by_volume.into_iter().take(n).cloned().collect();

    Rankings {
        gainers,
        losers,
        most_active,
    }
}

/// Breadth summary over `quotes`.
pub fn summarize(quotes: &[Quote]) -> MarketSummary {
    let advancing = quotes.iter().filter(|q| q.change_percent > 0.0).count();
    let declining = quotes.iter().filter(|q| q.change_percent < 0.0).count();
    let unchanged = quotes.len() - advancing - declining;

    let average_change_percent = if quotes.is_empty() {
        0.0
    } else {
        quotes.iter().map(|q| q.change_percent).sum::<f64>() / quotes.len() as f64
    };

    MarketSummary {
        total_companies: quotes.len(),
        total_market_cap: quotes.iter().map(|q| q.market_cap).sum::<f64>().round(),
        average_change_percent: round2(average_change_percent),
        advancing,
        declining,
        unchanged,
        advance_decline_ratio: round2(advancing as f64 / declining.max(1) as f64),
    }
}

/// Sector performance computed from the quotes themselves.
///
/// Every known sector is reported; sectors without quotes show zero change
/// and zero companies. Sorted by change descending.
pub fn derive_sector_performance(quotes: &[Quote]) -> Vec<SectorPerformance> {
    let mut groups: BTreeMap<&str, (f64, usize)> =
        SECTORS.iter().map(|&s| (s, (0.0, 0))).collect();
    for q in quotes {
        let entry = groups.entry(q.sector.as_str()).or_insert((0.0, 0));
        entry.0 += q.change_percent;
        entry.1 += 1;
    }

    let mut sectors: Vec<SectorPerformance> = groups
        .into_iter()
        .map(|(sector, (sum, count))| SectorPerformance {
            sector: sector.to_string(),
            change_percent: if count == 0 { 0.0 } else { round2(sum / count as f64) },
            companies_count: count,
        })
        .collect();
    sort_sectors(&mut sectors);
    sectors
}

fn sort_sectors(sectors: &mut [SectorPerformance]) {
    sectors.sort_by(|a, b| {
        b.change_percent
            .total_cmp(&a.change_percent)
            .then_with(|| a.sector.cmp(&b.sector))
    });
}

// =============================================================================
// MarketAggregator
// =============================================================================

/// Periodically refreshed aggregate view of a fixed universe.
pub struct MarketAggregator {
    universe: Vec<String>,
    directory: SymbolDirectory,
    ranking_size: usize,
    sector_mode: SectorMode,
    rng: Mutex<StdRng>,
    current: RwLock<Option<Arc<MarketSnapshot>>>,
    sequence: AtomicU64,
}

impl MarketAggregator {
    pub fn new(
        universe: Vec<String>,
        directory: SymbolDirectory,
        ranking_size: usize,
        sector_mode: SectorMode,
        rng_seed: Option<u64>,
    ) -> Self {
        let rng = match rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        info!(
            universe = universe.len(),
            ranking_size,
            sector_mode = ?sector_mode,
            seeded = rng_seed.is_some(),
            "MarketAggregator initialised"
        );
        Self {
            universe,
            directory,
            ranking_size,
            sector_mode,
            rng: Mutex::new(rng),
            current: RwLock::new(None),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self::new(
            config.universe.clone(),
            SymbolDirectory::default(),
            config.ranking_size,
            config.sector_mode,
            config.rng_seed,
        )
    }

    pub fn universe(&self) -> &[String] {
        &self.universe
    }

    /// Build a new snapshot and publish it, replacing the previous one.
    ///
    /// On error nothing is published and the previous snapshot stays visible.
    pub fn refresh(&self) -> Result<Arc<MarketSnapshot>> {
        if self.universe.is_empty() {
            bail!("cannot refresh market snapshot: universe is empty");
        }

        let (quotes, sector_performance, indices) = {
            let mut rng = self.rng.lock();
            let quotes: Vec<Quote> = self
                .universe
                .iter()
                .map(|symbol| self.quote(symbol, &mut *rng))
                .collect();
            let sectors = match self.sector_mode {
                SectorMode::Independent => independent_sector_performance(&mut *rng),
                SectorMode::DerivedFromQuotes => derive_sector_performance(&quotes),
            };
            let indices = index_quotes(&mut *rng);
            (quotes, sectors, indices)
        };

        let rankings = rank_quotes(&quotes, self.ranking_size);
        let summary = summarize(&quotes);
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;

        let snapshot = Arc::new(MarketSnapshot {
            timestamp: Utc::now(),
            sequence,
            quotes,
            rankings,
            sector_performance,
            indices,
            summary,
        });

        let snapshot = self.publish(snapshot);
        if snapshot.sequence != sequence {
            return Ok(snapshot);
        }

        info!(
            sequence,
            companies = snapshot.summary.total_companies,
            advancing = snapshot.summary.advancing,
            declining = snapshot.summary.declining,
            avg_change = snapshot.summary.average_change_percent,
            "market snapshot published"
        );

        Ok(snapshot)
    }

    /// Replace the published snapshot unless a newer one is already
    /// visible. Returns whichever snapshot is visible afterwards.
    ///
    /// Sequence numbers are claimed before publication, so two overlapping
    /// refreshes may finish out of order.
    fn publish(&self, snapshot: Arc<MarketSnapshot>) -> Arc<MarketSnapshot> {
        let mut current = self.current.write();
        if let Some(existing) = current.as_ref() {
            if existing.sequence >= snapshot.sequence {
                debug!(
                    stale = snapshot.sequence,
                    published = existing.sequence,
                    "stale market snapshot discarded"
                );
                return Arc::clone(existing);
            }
        }
        *current = Some(Arc::clone(&snapshot));
        snapshot
    }

    /// The last published snapshot.
    pub fn current_snapshot(&self) -> Result<Arc<MarketSnapshot>, MarketError> {
        self.current.read().clone().ok_or(MarketError::NotYetAvailable)
    }

    /// Timestamp of the last published snapshot.
    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.current.read().as_ref().map(|s| s.timestamp)
    }

    fn quote(&self, symbol: &str, rng: &mut StdRng) -> Quote {
        let base = base_price(symbol);
        let change_pct = rng.gen_range(-DAILY_CHANGE_PCT..=DAILY_CHANGE_PCT);
        let change = base * change_pct / 100.0;
        let price = base + change;
        let volume = rng.gen_range(1_000_000_u64..=50_000_000);
        let shares = rng.gen_range(1_000_000_u64..=3_000_000_000);
        let info = self.directory.info(symbol);

        debug!(symbol, base, change_pct, "quote generated");

        Quote {
            symbol: symbol.to_string(),
            name: info.name,
            sector: info.sector,
            price: round2(price),
            change: round2(change),
            change_percent: round2(change_pct),
            volume,
            market_cap: (price * shares as f64).round(),
        }
    }
}

impl RefreshSource for MarketAggregator {
    fn name(&self) -> &str {
        "market-aggregator"
    }

    fn refresh(&self) -> Result<()> {
        MarketAggregator::refresh(self).map(|_| ())
    }
}

fn independent_sector_performance(rng: &mut StdRng) -> Vec<SectorPerformance> {
    let mut sectors: Vec<SectorPerformance> = SECTORS
        .iter()
        .map(|&sector| SectorPerformance {
            sector: sector.to_string(),
            change_percent: round2(rng.gen_range(-SECTOR_CHANGE_PCT..=SECTOR_CHANGE_PCT)),
            companies_count: rng.gen_range(15..=85),
        })
        .collect();
    sort_sectors(&mut sectors);
    sectors
}

fn index_quotes(rng: &mut StdRng) -> BTreeMap<String, IndexQuote> {
    INDICES
        .iter()
        .map(|&(name, symbol, base)| {
            let change_pct = rng.gen_range(-INDEX_CHANGE_PCT..=INDEX_CHANGE_PCT);
            let value = base * (1.0 + change_pct / 100.0);
            (
                name.to_string(),
                IndexQuote {
                    symbol: symbol.to_string(),
                    value: round2(value),
                    change: round2(value - base),
                    change_percent: round2(change_pct),
                },
            )
        })
        .collect()
}

// =============================================================================
// Market snapshot types
// =============================================================================
//
// A `MarketSnapshot` is built completely before it is published and is never
// mutated afterwards; readers share it through an `Arc`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One instrument's quote for the current refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub symbol: String,
    pub name: String,
    pub sector: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: u64,
    pub market_cap: f64,
}

/// Top / bottom lists derived from the quotes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rankings {
    pub gainers: Vec<Quote>,
    pub losers: Vec<Quote>,
    pub most_active: Vec<Quote>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorPerformance {
    pub sector: String,
    pub change_percent: f64,
    pub companies_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexQuote {
    pub symbol: String,
    pub value: f64,
    pub change: f64,
    pub change_percent: f64,
}

/// Breadth and size statistics over all quotes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSummary {
    pub total_companies: usize,
    pub total_market_cap: f64,
    pub average_change_percent: f64,
    pub advancing: usize,
    pub declining: usize,
    pub unchanged: usize,
    /// advancing / max(declining, 1); always finite.
    pub advance_decline_ratio: f64,
}

/// Fully assembled, immutable aggregate view of the universe.
#[derive(Debug, Clone, Serialize)]
pub struct MarketSnapshot {
    pub timestamp: DateTime<Utc>,
    /// Sequence number of the refresh that produced this snapshot.
    pub sequence: u64,
    pub quotes: Vec<Quote>,
    pub rankings: Rankings,
    pub sector_performance: Vec<SectorPerformance>,
    pub indices: BTreeMap<String, IndexQuote>,
    pub summary: MarketSummary,
}

pub mod aggregator;
pub mod snapshot;
pub mod synthetic;
pub mod universe;

// Re-export the commonly used types for convenient access (e.g. `use crate::market::Quote`).
pub use aggregator::{MarketAggregator, MarketError, SectorMode};
pub use snapshot::{MarketSnapshot, MarketSummary, Quote, Rankings};
pub use synthetic::{SeriesSource, SyntheticSeriesSource};
pub use universe::{SymbolDirectory, SymbolInfo};

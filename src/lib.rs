// =============================================================================
// stockscope — market analytics engine
// =============================================================================
//
// Single-instrument analysis (indicators, risk, projections, recommendation)
// and a periodically refreshed market-wide snapshot (quotes, rankings,
// sectors, indices, breadth).
// =============================================================================

pub mod analysis;
pub mod indicators;
pub mod market;
pub mod prediction;
pub mod runtime_config;
pub mod scheduler;
pub mod signals;
pub mod symbol_hash;
pub mod types;

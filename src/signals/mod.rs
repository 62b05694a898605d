// =============================================================================
// Signals Module
// =============================================================================
//
// Turns an indicator snapshot into a discrete BUY / SELL / HOLD signal.

pub mod recommendation;

pub use recommendation::{Recommendation, RecommendationPolicy, ScoreContribution};

// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the technical indicators and risk
// statistics used by the analysis path. Functions that need a minimum amount
// of history return `Option<T>` (or an empty `Vec`) so callers are forced to
// handle insufficient data; divisions that could hit zero fall back to a
// documented constant instead.

pub mod bollinger;
pub mod ema;
pub mod levels;
pub mod macd;
pub mod momentum;
pub mod returns;
pub mod risk;
pub mod rsi;
pub mod sma;

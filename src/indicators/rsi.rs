// =============================================================================
// Relative Strength Index (RSI) — trailing-window average
// =============================================================================
//
// RSI measures the balance of recent gains against recent losses.
//
// Step 1: Compute price changes (deltas) from consecutive closes.
// Step 2: Average gain / average loss = plain mean of the last `period`
//          positive / negative deltas (zero-filled on the other side).
// Step 3: RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// Thresholds:  RSI > 70 => OVERBOUGHT,  RSI < 30 => OVERSOLD.
// =============================================================================

use tracing::trace;

/// Value returned when there is not enough history to compute anything.
pub const NEUTRAL_RSI: f64 = 50.0;

/// Default look-back.
pub const DEFAULT_PERIOD: usize = 14;

/// Compute the RSI of the most recent `period` deltas.
///
/// # Edge cases
/// - `period == 0` or `closes.len() < period + 1` => [`NEUTRAL_RSI`]
/// - Average loss of exactly zero => 100.0 (covers a flat window too).
/// - The result is always clamped into [0, 100].
pub fn current_rsi(closes: &[f64], period: usize) -> f64 {
    if period == 0 || closes.len() < period + 1 {
        trace!(len = closes.len(), period, "RSI: insufficient data, neutral");
        return NEUTRAL_RSI;
    }

    let window = &closes[closes.len() - period - 1..];
    let (sum_gain, sum_loss) = window.windows(2).fold((0.0_f64, 0.0_f64), |(g, l), w| {
        let delta = w[1] - w[0];
        if delta > 0.0 {
            (g + delta, l)
        } else {
            (g, l + delta.abs())
        }
    });

    let period_f = period as f64;
    rsi_from_averages(sum_gain / period_f, sum_loss / period_f)
}

/// Return the current RSI together with a human-readable label.
pub fn labelled_rsi(closes: &[f64], period: usize) -> (f64, &'static str) {
    let value = current_rsi(closes, period);

    let label = if value >= 70.0 {
        "OVERBOUGHT"
    } else if value <= 30.0 {
        "OVERSOLD"
    } else {
        "NEUTRAL"
    };

    (value, label)
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Convert average gain / average loss into an RSI value in [0, 100].
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    let rsi = 100.0 - 100.0 / (1.0 + rs);
    if rsi.is_finite() {
        rsi.clamp(0.0, 100.0)
    } else {
        NEUTRAL_RSI
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rsi_empty_input_is_neutral() {
        assert_eq!(current_rsi(&[], 14), NEUTRAL_RSI);
    }

    #[test]
    fn rsi_period_zero_is_neutral() {
        assert_eq!(current_rsi(&[1.0, 2.0, 3.0], 0), NEUTRAL_RSI);
    }

    #[test]
    fn rsi_insufficient_data_is_neutral() {
        // 14 closes => 13 deltas < 14.
        let closes: Vec<f64> = (1..=14).map(|x| x as f64).collect();
        assert_eq!(current_rsi(&closes, 14), NEUTRAL_RSI);
    }

    #[test]
    fn rsi_all_gains_is_100() {
        let closes: Vec<f64> = (1..=15).map(|x| x as f64).collect();
        assert!((current_rsi(&closes, 14) - 100.0).abs() < 1e-10);
    }

    #[test]
    fn rsi_all_losses_is_0() {
        let closes: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        assert!(current_rsi(&closes, 14).abs() < 1e-10);
    }

    #[test]
    fn rsi_flat_market_has_zero_loss() {
        let closes = vec![100.0; 30];
        assert!((current_rsi(&closes, 14) - 100.0).abs() < 1e-10);
    }

    #[test]
    fn rsi_uses_only_trailing_window() {
        // Early crash followed by 14 straight gains: old losses are ignored.
        let mut closes = vec![100.0, 50.0, 25.0];
        closes.extend((1..=15).map(|x| 25.0 + x as f64));
        assert!((current_rsi(&closes, 14) - 100.0).abs() < 1e-10);
    }

    #[test]
    fn rsi_balanced_moves() {
        // Alternating +1 / -1 over 14 deltas => RS = 1 => RSI = 50.
        let closes: Vec<f64> = (0..15).map(|i| if i % 2 == 0 { 10.0 } else { 11.0 }).collect();
        assert!((current_rsi(&closes, 14) - 50.0).abs() < 1e-10);
    }

    #[test]
    fn labelled_rsi_thresholds() {
        let up: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        assert_eq!(labelled_rsi(&up, 14).1, "OVERBOUGHT");
        let down: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        assert_eq!(labelled_rsi(&down, 14).1, "OVERSOLD");
        assert_eq!(labelled_rsi(&[], 14).1, "NEUTRAL");
    }

    proptest! {
        #[test]
        fn rsi_always_within_bounds(closes in prop::collection::vec(1.0f64..1000.0, 0..60)) {
            let v = current_rsi(&closes, 14);
            prop_assert!((0.0..=100.0).contains(&v));
        }
    }
}

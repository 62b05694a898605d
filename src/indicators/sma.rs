// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// Sliding-window arithmetic mean with "valid" semantics: one output per full
// window, no padding. Output length = input length - period + 1.
//
// The window sum is maintained incrementally; each output is re-derived from
// the running sum so cost is O(n) regardless of period.
// =============================================================================

/// Compute the SMA series for `values` and look-back `period`.
///
/// Returns an empty vec when `period == 0` or `values.len() < period`
/// (insufficient data).
pub fn calculate_sma(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }

    let period_f = period as f64;
    let mut sum: f64 = values[..period].iter().sum();
    let mut result = Vec::with_capacity(values.len() - period + 1);
    result.push(sum / period_f);

    for i in period..values.len() {
        sum += values[i] - values[i - period];
        result.push(sum / period_f);
    }

    result
}

/// Mean of the trailing `period` values, if there are enough.
pub fn last_sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    Some(values[values.len() - period..].iter().sum::<f64>() / period as f64)
}

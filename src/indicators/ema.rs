// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   alpha  = 2 / (period + 1)
//   EMA_0  = x_0
//   EMA_t  = alpha * x_t + (1 - alpha) * EMA_{t-1}
//
// Seeding with the first value (rather than an SMA) means the output is
// aligned one-to-one with the input.
// =============================================================================

/// Smoothing factor for a given look-back.
pub fn alpha(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

/// Compute the EMA series for `values` and look-back `period`.
///
/// The output has the same length as the input.
///
/// # Edge cases
/// - `period == 0` => empty vec
/// - empty input => empty vec
pub fn calculate_ema(values: &[f64], period: usize) -> Vec<f64> {
    let Some(&first) = values.first() else {
        return Vec::new();
    };
    if period == 0 {
        return Vec::new();
    }

    let a = alpha(period);
    let mut result = Vec::with_capacity(values.len());
    result.push(first);

    let mut prev = first;
    for &x in &values[1..] {
        let ema = a * x + (1.0 - a) * prev;
        result.push(ema);
        prev = ema;
    }

    result
}

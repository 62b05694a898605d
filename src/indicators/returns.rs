// =============================================================================
// Daily returns, annualised volatility and Sharpe-like ratio
// =============================================================================
//
//   r_i         = (p_i - p_{i-1}) / p_{i-1}
//   volatility  = σ(r) * sqrt(252)
//   sharpe      = mean(r) / σ(r) * sqrt(252)      (0 when σ is degenerate)
//
// σ is the population standard deviation throughout. Returns that are
// constant in exact arithmetic still leave rounding noise in σ, so σ counts
// as zero below a tolerance relative to the mean.

/// Trading days per year used for annualisation.
pub const TRADING_DAYS: f64 = 252.0;

/// Simple percentage returns between consecutive closes.
///
/// Pairs whose previous close is zero are skipped.
pub fn daily_returns(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect()
}

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Relative tolerance below which σ is treated as zero.
const DEGENERATE_SD_TOLERANCE: f64 = 1e-12;

/// Population standard deviation; `None` for an empty slice.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let variance = values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// Whether `sd` is rounding noise around `mean` rather than real dispersion.
pub fn is_degenerate_sd(sd: f64, mean: f64) -> bool {
    sd <= DEGENERATE_SD_TOLERANCE * mean.abs().max(1.0)
}

/// Annualised volatility of the daily returns.
///
/// Returns `None` when fewer than two closes are supplied.
pub fn annualized_volatility(closes: &[f64]) -> Option<f64> {
    let returns = daily_returns(closes);
    Some(std_dev(&returns)? * TRADING_DAYS.sqrt())
}

/// Annualised mean-over-deviation ratio of the daily returns.
///
/// Returns `None` when fewer than two closes are supplied and `Some(0.0)`
/// when the returns have zero deviation.
pub fn sharpe_ratio(closes: &[f64]) -> Option<f64> {
    let returns = daily_returns(closes);
    let m = mean(&returns)?;
    let sd = std_dev(&returns)?;
    if is_degenerate_sd(sd, m) {
        return Some(0.0);
    }
    Some(m / sd * TRADING_DAYS.sqrt())
}

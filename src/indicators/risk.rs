// =============================================================================
// Risk statistics — drawdown, higher moments, Value at Risk
// =============================================================================
//
// max drawdown   = min_t (p_t - max_{s<=t} p_s) / max_{s<=t} p_s     (<= 0)
// skewness       = E[((r - μ)/σ)^3]                          (0 if σ is degenerate)
// excess kurtosis= E[((r - μ)/σ)^4] - 3                      (0 if σ is degenerate)
// VaR(q)         = q-th percentile of the returns, linear interpolation
// risk score     = min(vol*100, 50) + min(|dd|*100, 30) + min(|VaR95|*100, 20)

use super::returns::{is_degenerate_sd, mean, std_dev};

/// Largest peak-to-trough decline as a non-positive fraction.
///
/// Returns `None` for an empty series. Non-positive running peaks are skipped
/// since the relative decline is undefined there.
pub fn max_drawdown(closes: &[f64]) -> Option<f64> {
    let first = *closes.first()?;
    let mut peak = first;
    let mut worst = 0.0_f64;
    for &price in closes {
        if price > peak {
            peak = price;
        }
        if peak > 0.0 {
            worst = worst.min((price - peak) / peak);
        }
    }
    Some(worst)
}

/// Standardised moment of order `k`. `None` for an empty slice,
/// `Some(None)` when σ is degenerate.
fn standardized_moment(values: &[f64], k: i32) -> Option<Option<f64>> {
    let m = mean(values)?;
    let sd = std_dev(values)?;
    if is_degenerate_sd(sd, m) {
        return Some(None);
    }
    let n = values.len() as f64;
    Some(Some(values.iter().map(|x| ((x - m) / sd).powi(k)).sum::<f64>() / n))
}

/// Third standardised moment.
pub fn skewness(returns: &[f64]) -> Option<f64> {
    Some(standardized_moment(returns, 3)?.unwrap_or(0.0))
}

/// Fourth standardised moment minus 3.
pub fn excess_kurtosis(returns: &[f64]) -> Option<f64> {
    Some(standardized_moment(returns, 4)?.map_or(0.0, |m4| m4 - 3.0))
}

/// Percentile (`q` in [0, 100]) with linear interpolation between closest
/// ranks.
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=100.0).contains(&q) {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Historical Value at Risk at `confidence` (e.g. 0.95): the
/// `(1 - confidence)` percentile of the returns. Typically negative.
pub fn value_at_risk(returns: &[f64], confidence: f64) -> Option<f64> {
    percentile(returns, (1.0 - confidence) * 100.0)
}

/// Composite risk score in [0, 100]; higher means riskier.
pub fn risk_score(volatility: f64, max_drawdown: f64, var_95: f64) -> f64 {
    let vol_score = (volatility * 100.0).min(50.0);
    let dd_score = (max_drawdown.abs() * 100.0).min(30.0);
    let var_score = (var_95.abs() * 100.0).min(20.0);
    (vol_score + dd_score + var_score).max(0.0)
}

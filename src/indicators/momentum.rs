// =============================================================================
// Momentum and Rate of Change (ROC)
// =============================================================================
//
//   momentum_i = close_i - close_{i-period}
//   ROC_i      = (close_i - close_{i-period}) / close_{i-period} * 100
//
// Positive values indicate upward momentum; negative indicates downward.

pub const DEFAULT_PERIOD: usize = 14;

/// Absolute price change over `period` bars, one value per close starting at
/// index `period`.
pub fn calculate_momentum(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() <= period {
        return Vec::new();
    }
    closes[period..]
        .iter()
        .zip(closes)
        .map(|(now, then)| now - then)
        .collect()
}

/// Calculate the Rate of Change for the given closing prices and period.
///
/// A zero base price yields 0.0 for that element.
pub fn calculate_roc(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() <= period {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(closes.len() - period);
    for i in period..closes.len() {
        let prev = closes[i - period];
        if prev == 0.0 {
            result.push(0.0);
        } else {
            result.push(((closes[i] - prev) / prev) * 100.0);
        }
    }
    result
}

/// Return the most recent ROC value.
pub fn current_roc(closes: &[f64], period: usize) -> Option<f64> {
    calculate_roc(closes, period).last().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn momentum_basic() {
        let closes: Vec<f64> = (1..=20).map(|x| (x * x) as f64).collect();
        let m = calculate_momentum(&closes, 14);
        assert_eq!(m.len(), 6);
        // 15^2 - 1^2
        assert!((m[0] - 224.0).abs() < 1e-12);
        assert!((m[5] - (400.0 - 36.0)).abs() < 1e-12);
    }

    #[test]
    fn momentum_insufficient_data() {
        assert!(calculate_momentum(&[1.0; 14], 14).is_empty());
        assert!(calculate_momentum(&[1.0; 5], 0).is_empty());
    }

    #[test]
    fn roc_basic() {
        let closes: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let roc = calculate_roc(&closes, 14);
        // From 1 to 15: ROC = (15-1)/1 * 100 = 1400%
        assert!((roc[0] - 1400.0).abs() < 1e-10);
    }

    #[test]
    fn roc_zero_base() {
        assert_eq!(calculate_roc(&[0.0, 5.0], 1), vec![0.0]);
    }

    #[test]
    fn current_roc_insufficient_data() {
        assert!(current_roc(&[1.0, 2.0, 3.0], 14).is_none());
    }
}

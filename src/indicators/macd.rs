// =============================================================================
// Moving Average Convergence / Divergence (MACD)
// =============================================================================
//
//   line      = EMA(fast) - EMA(slow)
//   signal    = EMA(line, signal_period)
//   histogram = line - signal
//
// All three series are aligned with the input closes (see ema.rs seeding).

use super::ema::calculate_ema;

pub const FAST_PERIOD: usize = 12;
pub const SLOW_PERIOD: usize = 26;
pub const SIGNAL_PERIOD: usize = 9;

/// Full MACD output, one element per input close.
#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// Most recent MACD values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdPoint {
    pub line: f64,
    pub signal: f64,
    pub histogram: f64,
}

impl MacdSeries {
    pub fn last(&self) -> Option<MacdPoint> {
        Some(MacdPoint {
            line: *self.line.last()?,
            signal: *self.signal.last()?,
            histogram: *self.histogram.last()?,
        })
    }
}

/// Compute MACD for `closes`.
///
/// Returns `None` when:
/// - any period is zero or `fast >= slow`
/// - fewer than `slow` closes are supplied (the slow average has not seen a
///   full window yet)
pub fn calculate_macd(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> Option<MacdSeries> {
    if fast == 0 || signal_period == 0 || fast >= slow || closes.len() < slow {
        return None;
    }

    let fast_ema = calculate_ema(closes, fast);
    let slow_ema = calculate_ema(closes, slow);
    let line: Vec<f64> = fast_ema.iter().zip(&slow_ema).map(|(f, s)| f - s).collect();
    let signal = calculate_ema(&line, signal_period);
    let histogram = line.iter().zip(&signal).map(|(l, s)| l - s).collect();

    Some(MacdSeries {
        line,
        signal,
        histogram,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macd_insufficient_data() {
        let closes: Vec<f64> = (1..=25).map(|x| x as f64).collect();
        assert!(calculate_macd(&closes, 12, 26, 9).is_none());
    }

    #[test]
    fn macd_rejects_inverted_periods() {
        let closes = vec![1.0; 50];
        assert!(calculate_macd(&closes, 26, 12, 9).is_none());
    }

    #[test]
    fn macd_flat_series_is_zero() {
        let m = calculate_macd(&[50.0; 40], 12, 26, 9).unwrap().last().unwrap();
        assert!(m.line.abs() < 1e-12);
        assert!(m.signal.abs() < 1e-12);
        assert!(m.histogram.abs() < 1e-12);
    }

    #[test]
    fn macd_rising_series_is_positive() {
        let closes: Vec<f64> = (1..=100).map(|x| x as f64).collect();
        let series = calculate_macd(&closes, 12, 26, 9).unwrap();
        assert_eq!(series.line.len(), closes.len());
        let m = series.last().unwrap();
        assert!(m.line > 0.0);
        assert!((m.histogram - (m.line - m.signal)).abs() < 1e-12);
    }
}

// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ), where σ is the population standard deviation
// of the same rolling window. The Band Width (BBW) is the normalised
// distance: BBW = (upper - lower) / middle * 100.

use super::sma::calculate_sma;

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_NUM_STD: f64 = 2.0;

/// Rolling band series, one element per full window.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

/// Band values at the most recent window.
#[derive(Debug, Clone, Copy)]
pub struct BollingerPoint {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub width: f64,
}

impl BollingerBands {
    pub fn last(&self) -> Option<BollingerPoint> {
        let upper = *self.upper.last()?;
        let middle = *self.middle.last()?;
        let lower = *self.lower.last()?;
        let width = if middle != 0.0 {
            (upper - lower) / middle * 100.0
        } else {
            0.0
        };
        Some(BollingerPoint {
            upper,
            middle,
            lower,
            width,
        })
    }
}

/// Calculate rolling Bollinger Bands for the given closing prices.
///
/// Output length = `closes.len() - period + 1`.
///
/// Returns `None` when `period == 0` or there are fewer than `period` closes.
pub fn calculate_bollinger(closes: &[f64], period: usize, num_std: f64) -> Option<BollingerBands> {
    let middle = calculate_sma(closes, period);
    if middle.is_empty() {
        return None;
    }

    let mut upper = Vec::with_capacity(middle.len());
    let mut lower = Vec::with_capacity(middle.len());
    for (window, &mean) in closes.windows(period).zip(&middle) {
        let variance = window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / period as f64;
        let std_dev = variance.sqrt();
        upper.push(mean + num_std * std_dev);
        lower.push(mean - num_std * std_dev);
    }

    Some(BollingerBands {
        upper,
        middle,
        lower,
    })
}

// =============================================================================
// Support / resistance bands and trend classification
// =============================================================================
//
// Support and resistance are read off the trailing window (50 bars, or all
// available bars when fewer):
//   support    = [min * 0.95, min]
//   resistance = [max, max * 1.05]

use serde::Serialize;

use super::momentum::current_roc;
use crate::types::{Trend, TrendStrength};

pub const DEFAULT_LOOKBACK: usize = 50;

/// Bars over which trend strength is measured.
const STRENGTH_WINDOW: usize = 20;

/// Closed price interval `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceBand {
    pub low: f64,
    pub high: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SupportResistance {
    pub support: PriceBand,
    pub resistance: PriceBand,
}

/// Support and resistance bands over the trailing `lookback` closes.
///
/// Returns `None` for an empty series or `lookback == 0`.
pub fn support_resistance(closes: &[f64], lookback: usize) -> Option<SupportResistance> {
    if closes.is_empty() || lookback == 0 {
        return None;
    }
    let window = &closes[closes.len().saturating_sub(lookback)..];
    let min = window.iter().copied().fold(f64::INFINITY, f64::min);
    let max = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Some(SupportResistance {
        support: PriceBand {
            low: min * 0.95,
            high: min,
        },
        resistance: PriceBand {
            low: max,
            high: max * 1.05,
        },
    })
}

/// Classify price against the 20/50 averages with strict ordering.
///
/// Neutral when either average is missing.
pub fn classify_trend(price: f64, sma_20: Option<f64>, sma_50: Option<f64>) -> Trend {
    match (sma_20, sma_50) {
        (Some(s20), Some(s50)) if price > s20 && s20 > s50 => Trend::Bullish,
        (Some(s20), Some(s50)) if price < s20 && s20 < s50 => Trend::Bearish,
        _ => Trend::Neutral,
    }
}

/// Strength of the move across the last 20 bars: strong above 10%,
/// moderate above 5%, weak otherwise (or with fewer than 20 bars).
pub fn trend_strength(closes: &[f64]) -> TrendStrength {
    if closes.len() < STRENGTH_WINDOW {
        return TrendStrength::Weak;
    }
    let change = current_roc(closes, STRENGTH_WINDOW - 1).unwrap_or(0.0).abs();
    if change > 10.0 {
        TrendStrength::Strong
    } else if change > 5.0 {
        TrendStrength::Moderate
    } else {
        TrendStrength::Weak
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_over_short_series_use_everything() {
        let sr = support_resistance(&[10.0, 12.0, 8.0, 11.0], 50).unwrap();
        assert!((sr.support.low - 7.6).abs() < 1e-12);
        assert_eq!(sr.support.high, 8.0);
        assert_eq!(sr.resistance.low, 12.0);
        assert!((sr.resistance.high - 12.6).abs() < 1e-12);
    }

    #[test]
    fn bands_ignore_bars_outside_lookback() {
        let mut closes = vec![1.0, 1000.0];
        closes.extend(std::iter::repeat(50.0).take(50));
        let sr = support_resistance(&closes, 50).unwrap();
        assert_eq!(sr.support.high, 50.0);
        assert_eq!(sr.resistance.low, 50.0);
    }

    #[test]
    fn bands_empty_series() {
        assert!(support_resistance(&[], 50).is_none());
    }

    #[test]
    fn trend_requires_strict_ordering() {
        assert_eq!(classify_trend(110.0, Some(105.0), Some(100.0)), Trend::Bullish);
        assert_eq!(classify_trend(90.0, Some(95.0), Some(100.0)), Trend::Bearish);
        assert_eq!(classify_trend(105.0, Some(105.0), Some(100.0)), Trend::Neutral);
        assert_eq!(classify_trend(110.0, Some(105.0), None), Trend::Neutral);
    }

    #[test]
    fn strength_buckets() {
        let flat = vec![100.0; 25];
        assert_eq!(trend_strength(&flat), TrendStrength::Weak);

        let mut moderate = vec![100.0; 20];
        moderate.push(100.0 * 1.07);
        assert_eq!(trend_strength(&moderate), TrendStrength::Moderate);

        let mut strong = vec![100.0; 20];
        strong.push(85.0);
        assert_eq!(trend_strength(&strong), TrendStrength::Strong);

        assert_eq!(trend_strength(&[1.0, 100.0]), TrendStrength::Weak);
    }
}

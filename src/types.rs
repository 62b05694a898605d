// =============================================================================
// Shared types used across the stockscope analytics engine
// =============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Price data
// =============================================================================

/// A single OHLCV bar for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

impl PriceBar {
    /// Check the OHLC ordering and volume invariants of a single bar.
    fn validate(&self, index: usize) -> Result<(), SeriesError> {
        let values = [self.open, self.high, self.low, self.close, self.volume];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(SeriesError::NonFinite { index });
        }
        let body_low = self.open.min(self.close);
        let body_high = self.open.max(self.close);
        if self.low > body_low || body_high > self.high {
            return Err(SeriesError::InvalidRange {
                index,
                low: self.low,
                high: self.high,
            });
        }
        if self.volume < 0.0 {
            return Err(SeriesError::NegativeVolume {
                index,
                volume: self.volume,
            });
        }
        Ok(())
    }
}

/// Reasons a sequence of bars cannot form a [`PriceSeries`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("bar {index}: non-finite value")]
    NonFinite { index: usize },

    #[error("bar {index}: open/close outside [low={low}, high={high}]")]
    InvalidRange { index: usize, low: f64, high: f64 },

    #[error("bar {index}: negative volume {volume}")]
    NegativeVolume { index: usize, volume: f64 },

    #[error("bar {index}: timestamp is not strictly after the previous bar")]
    NonIncreasingTimestamp { index: usize },
}

/// An ordered, validated sequence of bars with strictly increasing
/// timestamps.
///
/// Construction is the only place the bar invariants are checked; every
/// indicator downstream may assume them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<PriceBar>) -> Result<Self, SeriesError> {
        for (index, bar) in bars.iter().enumerate() {
            bar.validate(index)?;
            if index > 0 && bar.timestamp <= bars[index - 1].timestamp {
                return Err(SeriesError::NonIncreasingTimestamp { index });
            }
        }
        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Closing prices, oldest first.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Volumes, oldest first.
    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }
}

// =============================================================================
// Classification enums
// =============================================================================

/// Discrete trading signal emitted by the recommendation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Default for Signal {
    fn default() -> Self {
        Self::Hold
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
            Self::Hold => write!(f, "HOLD"),
        }
    }
}

/// Price position relative to the 20- and 50-period averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Bullish,
    Bearish,
    Neutral,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bullish => write!(f, "bullish"),
            Self::Bearish => write!(f, "bearish"),
            Self::Neutral => write!(f, "neutral"),
        }
    }
}

/// Magnitude of the recent 20-bar move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendStrength {
    Weak,
    Moderate,
    Strong,
}

impl std::fmt::Display for TrendStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Weak => write!(f, "weak"),
            Self::Moderate => write!(f, "moderate"),
            Self::Strong => write!(f, "strong"),
        }
    }
}

/// Projection horizon. Serialised with its short tag (`"1d"`, `"7d"`, `"30d"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Horizon {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "7d")]
    SevenDays,
    #[serde(rename = "30d")]
    ThirtyDays,
}

impl Horizon {
    pub const ALL: [Horizon; 3] = [Horizon::OneDay, Horizon::SevenDays, Horizon::ThirtyDays];

    pub fn tag(self) -> &'static str {
        match self {
            Self::OneDay => "1d",
            Self::SevenDays => "7d",
            Self::ThirtyDays => "30d",
        }
    }

    /// Multiplier applied to the recent trend for the base projection.
    pub fn trend_factor(self) -> f64 {
        match self {
            Self::OneDay => 0.2,
            Self::SevenDays => 1.0,
            Self::ThirtyDays => 3.0,
        }
    }

    /// Number of such periods per year, used to de-annualise volatility.
    pub fn periods_per_year(self) -> f64 {
        match self {
            Self::OneDay => 252.0,
            Self::SevenDays => 52.0,
            Self::ThirtyDays => 12.0,
        }
    }
}

impl std::fmt::Display for Horizon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Round to two decimal places (cent precision).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn bar(day: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> PriceBar {
        PriceBar {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(day),
            open,
            high,
            low,
            close,
            volume,
        }
    }

    #[test]
    fn valid_series_accepted() {
        let series = PriceSeries::new(vec![
            bar(0, 10.0, 11.0, 9.0, 10.5, 1000.0),
            bar(1, 10.5, 12.0, 10.0, 11.5, 0.0),
        ])
        .unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![10.5, 11.5]);
        assert_eq!(series.volumes(), vec![1000.0, 0.0]);
    }

    #[test]
    fn close_above_high_rejected() {
        let err = PriceSeries::new(vec![bar(0, 10.0, 11.0, 9.0, 11.5, 1.0)]).unwrap_err();
        assert!(matches!(err, SeriesError::InvalidRange { index: 0, .. }));
    }

    #[test]
    fn negative_volume_rejected() {
        let err = PriceSeries::new(vec![bar(0, 10.0, 11.0, 9.0, 10.0, -1.0)]).unwrap_err();
        assert!(matches!(err, SeriesError::NegativeVolume { index: 0, .. }));
    }

    #[test]
    fn duplicate_timestamp_rejected() {
        let err = PriceSeries::new(vec![
            bar(0, 10.0, 11.0, 9.0, 10.0, 1.0),
            bar(0, 10.0, 11.0, 9.0, 10.0, 1.0),
        ])
        .unwrap_err();
        assert_eq!(err, SeriesError::NonIncreasingTimestamp { index: 1 });
    }

    #[test]
    fn nan_rejected() {
        let err = PriceSeries::new(vec![bar(0, f64::NAN, 11.0, 9.0, 10.0, 1.0)]).unwrap_err();
        assert_eq!(err, SeriesError::NonFinite { index: 0 });
    }

    #[test]
    fn horizon_tags_serialise() {
        let json = serde_json::to_string(&Horizon::ThirtyDays).unwrap();
        assert_eq!(json, "\"30d\"");
        let h: Horizon = serde_json::from_str("\"7d\"").unwrap();
        assert_eq!(h, Horizon::SevenDays);
    }

    #[test]
    fn signal_display_is_uppercase() {
        assert_eq!(Signal::Buy.to_string(), "BUY");
        assert_eq!(Signal::default(), Signal::Hold);
    }

    #[test]
    fn round2_rounds_to_cents() {
        assert!((round2(1.23456) - 1.23).abs() < 1e-12);
        assert!((round2(-2.005) + 2.0).abs() < 0.011);
    }
}

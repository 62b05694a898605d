// =============================================================================
// Single-instrument analysis — indicator, risk and projection snapshots
// =============================================================================
//
// Assembles the outputs of the indicator module into the snapshots handed to
// the presentation layer. Every field whose precondition fails is `None`;
// nothing is defaulted to a misleading number except the documented
// fallbacks (neutral RSI, zero Sharpe, zero higher moments, unit volume
// ratio).
//
// Everything here is a pure function of the series and the parameters, so a
// single `Analyzer` can be shared freely across tasks.
// =============================================================================

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::indicators::levels::{self, PriceBand};
use crate::indicators::{bollinger, macd, momentum, returns, risk, rsi, sma};
use crate::prediction::{PredictionProjector, PredictionSet};
use crate::runtime_config::IndicatorParams;
use crate::signals::{Recommendation, RecommendationPolicy};
use crate::types::{PriceSeries, Trend, TrendStrength};

/// Minimum number of bars for a [`RiskSnapshot`].
pub const MIN_RISK_BARS: usize = 30;

/// Period of the volume average used for the volume ratio.
const VOLUME_AVERAGE_PERIOD: usize = 20;

// =============================================================================
// Snapshots
// =============================================================================

/// Latest value of every technical indicator for one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSnapshot {
    /// Last close the snapshot was computed at.
    pub price: Option<f64>,
    /// Always present: falls back to 50 with too little history.
    pub rsi: f64,
    pub rsi_label: String,
    pub macd_line: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub bollinger_upper: Option<f64>,
    pub bollinger_middle: Option<f64>,
    pub bollinger_lower: Option<f64>,
    pub sma_20: Option<f64>,
    pub sma_50: Option<f64>,
    /// Annualised.
    pub volatility: Option<f64>,
    pub sharpe_ratio: Option<f64>,
    pub momentum: Option<f64>,
    pub support: Option<PriceBand>,
    pub resistance: Option<PriceBand>,
    pub volume_ratio: f64,
    pub price_change_pct: Option<f64>,
    pub trend: Trend,
    pub strength: TrendStrength,
}

/// Distribution statistics of the daily returns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskSnapshot {
    pub volatility_annual: f64,
    pub var_95: f64,
    pub var_99: f64,
    pub max_drawdown: f64,
    pub skewness: f64,
    pub excess_kurtosis: f64,
    /// 0 (calm) to 100 (very risky).
    pub risk_score: f64,
}

/// Everything the analysis path produces for one symbol.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub symbol: String,
    pub generated_at: DateTime<Utc>,
    pub current_price: Option<f64>,
    pub indicators: IndicatorSnapshot,
    pub risk: Option<RiskSnapshot>,
    pub predictions: Option<PredictionSet>,
    pub recommendation: Recommendation,
}

// =============================================================================
// Snapshot builders
// =============================================================================

/// Compute the indicator snapshot for `series`.
pub fn compute_indicators(series: &PriceSeries, params: &IndicatorParams) -> IndicatorSnapshot {
    let closes = series.closes();
    let volumes = series.volumes();

    let (rsi_value, rsi_label) = rsi::labelled_rsi(&closes, params.rsi_period);

    let macd_point = macd::calculate_macd(
        &closes,
        params.macd_fast,
        params.macd_slow,
        params.macd_signal,
    )
    .and_then(|m| m.last());

    let bands = bollinger::calculate_bollinger(&closes, params.bollinger_period, params.bollinger_num_std)
        .and_then(|b| b.last());

    let sma_20 = sma::last_sma(&closes, 20);
    let sma_50 = sma::last_sma(&closes, 50);

    let sr = levels::support_resistance(&closes, params.level_lookback);

    let volume_ratio = match (volumes.last(), sma::last_sma(&volumes, VOLUME_AVERAGE_PERIOD)) {
        (Some(&last), Some(avg)) if avg != 0.0 => last / avg,
        _ => 1.0,
    };

    let price_change_pct = match closes.as_slice() {
        [.., prev, last] if *prev != 0.0 => Some((last - prev) / prev * 100.0),
        _ => None,
    };

    let trend = match closes.last() {
        Some(&price) => levels::classify_trend(price, sma_20, sma_50),
        None => Trend::Neutral,
    };

    IndicatorSnapshot {
        price: closes.last().copied(),
        rsi: rsi_value,
        rsi_label: rsi_label.to_string(),
        macd_line: macd_point.map(|m| m.line),
        macd_signal: macd_point.map(|m| m.signal),
        macd_histogram: macd_point.map(|m| m.histogram),
        bollinger_upper: bands.map(|b| b.upper),
        bollinger_middle: bands.map(|b| b.middle),
        bollinger_lower: bands.map(|b| b.lower),
        sma_20,
        sma_50,
        volatility: returns::annualized_volatility(&closes),
        sharpe_ratio: returns::sharpe_ratio(&closes),
        momentum: momentum::calculate_momentum(&closes, params.momentum_period)
            .last()
            .copied(),
        support: sr.map(|l| l.support),
        resistance: sr.map(|l| l.resistance),
        volume_ratio,
        price_change_pct,
        trend,
        strength: levels::trend_strength(&closes),
    }
}

/// Compute the risk snapshot, or `None` with fewer than [`MIN_RISK_BARS`]
/// bars.
pub fn compute_risk(series: &PriceSeries) -> Option<RiskSnapshot> {
    if series.len() < MIN_RISK_BARS {
        return None;
    }
    let closes = series.closes();
    let daily = returns::daily_returns(&closes);

    let volatility_annual = returns::annualized_volatility(&closes)?;
    let var_95 = risk::value_at_risk(&daily, 0.95)?;
    let var_99 = risk::value_at_risk(&daily, 0.99)?;
    let max_drawdown = risk::max_drawdown(&closes)?;

    Some(RiskSnapshot {
        volatility_annual,
        var_95,
        var_99,
        max_drawdown,
        skewness: risk::skewness(&daily)?,
        excess_kurtosis: risk::excess_kurtosis(&daily)?,
        risk_score: risk::risk_score(volatility_annual, max_drawdown, var_95),
    })
}

// =============================================================================
// Analyzer
// =============================================================================

/// Runs the full single-instrument path: indicators, risk, projection and
/// recommendation.
#[derive(Debug, Clone)]
pub struct Analyzer {
    params: IndicatorParams,
    policy: RecommendationPolicy,
    projector: PredictionProjector,
}

impl Analyzer {
    pub fn new(params: IndicatorParams, projector: PredictionProjector) -> Self {
        let policy = RecommendationPolicy::new(params.high_volatility);
        Self {
            params,
            policy,
            projector,
        }
    }

    /// Analyse one series. Contains no randomness: identical inputs give
    /// identical reports apart from `generated_at`.
    pub fn analyze(&self, symbol: &str, series: &PriceSeries) -> AnalysisReport {
        let indicators = compute_indicators(series, &self.params);
        let risk = compute_risk(series);
        let closes = series.closes();
        let predictions = self.projector.project(&closes);
        let current_price = indicators.price;
        let recommendation = self.policy.evaluate(&indicators, symbol);

        debug!(
            symbol,
            bars = series.len(),
            rsi = indicators.rsi,
            trend = %indicators.trend,
            signal = %recommendation.signal,
            "analysis complete"
        );

        AnalysisReport {
            symbol: symbol.to_string(),
            generated_at: Utc::now(),
            current_price,
            indicators,
            risk,
            predictions,
            recommendation,
        }
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(IndicatorParams::default(), PredictionProjector::default())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::synthetic::SyntheticSeriesSource;
    use crate::types::PriceBar;
    use chrono::{Duration, TimeZone};

    fn series_from_closes(closes: &[f64]) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PriceBar {
                timestamp: start + Duration::days(i as i64),
                open: c,
                high: c,
                low: c,
                close: c,
                volume: 1_000.0 + i as f64,
            })
            .collect();
        PriceSeries::new(bars).unwrap()
    }

    fn fixed_aapl_series() -> PriceSeries {
        let anchor = Utc.with_ymd_and_hms(2024, 6, 28, 0, 0, 0).unwrap();
        SyntheticSeriesSource::new(42)
            .generate("AAPL", 252, anchor)
            .unwrap()
    }

    #[test]
    fn short_series_leaves_fields_absent() {
        let series = series_from_closes(&[10.0, 11.0, 12.0]);
        let snap = compute_indicators(&series, &IndicatorParams::default());
        assert_eq!(snap.rsi, rsi::NEUTRAL_RSI);
        assert!(snap.macd_line.is_none());
        assert!(snap.bollinger_upper.is_none());
        assert!(snap.sma_20.is_none());
        assert!(snap.sma_50.is_none());
        assert!(snap.momentum.is_none());
        assert!(snap.volatility.is_some());
        assert!(snap.support.is_some());
        assert_eq!(snap.volume_ratio, 1.0);
        assert_eq!(snap.trend, Trend::Neutral);
        assert!(compute_risk(&series).is_none());
    }

    #[test]
    fn empty_series_is_handled() {
        let series = PriceSeries::default();
        let snap = compute_indicators(&series, &IndicatorParams::default());
        assert!(snap.price.is_none());
        assert!(snap.volatility.is_none());
        assert!(snap.support.is_none());
        assert!(snap.price_change_pct.is_none());

        let report = Analyzer::default().analyze("EMPTY", &series);
        assert!(report.current_price.is_none());
        assert!(report.predictions.is_none());
    }

    #[test]
    fn rising_series_is_bullish() {
        let closes: Vec<f64> = (1..=60).map(|x| 100.0 + x as f64).collect();
        let series = series_from_closes(&closes);
        let snap = compute_indicators(&series, &IndicatorParams::default());
        assert_eq!(snap.price, Some(160.0));
        assert!((snap.rsi - 100.0).abs() < 1e-10);
        assert_eq!(snap.rsi_label, "OVERBOUGHT");
        assert_eq!(snap.trend, Trend::Bullish);
        assert!(snap.macd_line.unwrap() > 0.0);
        assert!((snap.sma_20.unwrap() - 150.5).abs() < 1e-9);
        assert!((snap.momentum.unwrap() - 14.0).abs() < 1e-9);
        assert_eq!(snap.resistance.unwrap().low, 160.0);
    }

    #[test]
    fn risk_snapshot_on_flat_series_uses_fallbacks() {
        let series = series_from_closes(&[50.0; 40]);
        let r = compute_risk(&series).unwrap();
        assert_eq!(r.volatility_annual, 0.0);
        assert_eq!(r.max_drawdown, 0.0);
        assert_eq!(r.skewness, 0.0);
        assert_eq!(r.excess_kurtosis, 0.0);
        assert_eq!(r.risk_score, 0.0);
    }

    #[test]
    fn risk_snapshot_bounds() {
        let r = compute_risk(&fixed_aapl_series()).unwrap();
        assert!(r.max_drawdown <= 0.0);
        assert!(r.var_99 <= r.var_95);
        assert!((0.0..=100.0).contains(&r.risk_score));
    }

    #[test]
    fn aapl_analysis_is_reproducible() {
        let analyzer = Analyzer::default();
        let a = analyzer.analyze("AAPL", &fixed_aapl_series());
        let b = analyzer.analyze("AAPL", &fixed_aapl_series());
        assert_eq!(a.indicators, b.indicators);
        assert_eq!(a.indicators.rsi, b.indicators.rsi);
        assert_eq!(a.indicators.sma_20, b.indicators.sma_20);
        assert_eq!(a.recommendation.signal, b.recommendation.signal);
        assert_eq!(a.recommendation.buy_score, b.recommendation.buy_score);
        assert_eq!(a.risk, b.risk);
        assert_eq!(a.predictions, b.predictions);
        assert!(a.indicators.sma_20.is_some());
        assert!(a.indicators.sma_50.is_some());
    }
}

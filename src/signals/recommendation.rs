// =============================================================================
// Recommendation Policy — additive BUY / SELL scoring
// =============================================================================
//
// Each rule adds points to the buy side, the sell side, or both. A stable
// per-symbol bias is then applied so that otherwise identical setups differ
// a little across symbols while any single symbol stays reproducible.
//
//   RSI < 30 => buy +3     RSI < 40 => buy +1
//   RSI > 70 => sell +3    RSI > 60 => sell +1
//   trend bullish / bearish              => +2 to that side
//   price > sma20 > sma50 (or reverse)   => another +2 to that side
//   annualised volatility > threshold    => -1 to both
//   bias = (hash(symbol) in [-0.5, 0.5)) * 2  => +bias buy, -bias sell
//
// Decision:
//   BUY  if buy  >= 4 or buy  > sell + 1
//   SELL if sell >= 4 or sell > buy  + 1
//   HOLD otherwise
// =============================================================================

use serde::Serialize;

use crate::analysis::IndicatorSnapshot;
use crate::symbol_hash;
use crate::types::{Signal, Trend};

/// Score at which a side wins outright.
const DECISIVE_SCORE: f64 = 4.0;
/// Lead one side needs over the other to win without a decisive score.
const DECISIVE_LEAD: f64 = 1.0;

/// The contribution of a single rule to the final scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreContribution {
    pub name: String,
    pub buy: f64,
    pub sell: f64,
}

/// Result of the scoring pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub signal: Signal,
    pub buy_score: f64,
    pub sell_score: f64,
    pub contributions: Vec<ScoreContribution>,
}

/// Deterministic scoring rule over an [`IndicatorSnapshot`].
#[derive(Debug, Clone)]
pub struct RecommendationPolicy {
    /// Annualised volatility above which both scores are discounted.
    pub high_volatility: f64,
}

impl RecommendationPolicy {
    pub fn new(high_volatility: f64) -> Self {
        Self { high_volatility }
    }

    /// Stable bias for `symbol`, in `[-1.0, 1.0)`.
    pub fn symbol_bias(symbol: &str) -> f64 {
        symbol_hash::centered_unit(symbol) * 2.0
    }

    /// Score `snapshot` for `symbol`.
    ///
    /// Total and deterministic: the same inputs always produce the same
    /// recommendation. Moving-average alignment is judged at the snapshot's
    /// own price and never fires without one.
    pub fn evaluate(&self, snapshot: &IndicatorSnapshot, symbol: &str) -> Recommendation {
        let mut contributions = Vec::with_capacity(5);

        // --- Oscillator ------------------------------------------------------
        let rsi = snapshot.rsi;
        let rsi_buy = if rsi < 30.0 {
            3.0
        } else if rsi < 40.0 {
            1.0
        } else {
            0.0
        };
        let rsi_sell = if rsi > 70.0 {
            3.0
        } else if rsi > 60.0 {
            1.0
        } else {
            0.0
        };
        contributions.push(ScoreContribution {
            name: "rsi".to_string(),
            buy: rsi_buy,
            sell: rsi_sell,
        });

        // --- Trend and moving-average alignment ------------------------------
        let (trend_buy, trend_sell) = match snapshot.trend {
            Trend::Bullish => (2.0, 0.0),
            Trend::Bearish => (0.0, 2.0),
            Trend::Neutral => (0.0, 0.0),
        };
        contributions.push(ScoreContribution {
            name: "trend".to_string(),
            buy: trend_buy,
            sell: trend_sell,
        });

        let (align_buy, align_sell) = match (snapshot.price, snapshot.sma_20, snapshot.sma_50) {
            (Some(price), Some(s20), Some(s50)) if price > s20 && s20 > s50 => (2.0, 0.0),
            (Some(price), Some(s20), Some(s50)) if price < s20 && s20 < s50 => (0.0, 2.0),
            _ => (0.0, 0.0),
        };
        contributions.push(ScoreContribution {
            name: "ma_alignment".to_string(),
            buy: align_buy,
            sell: align_sell,
        });

        // --- Volatility caution ----------------------------------------------
        let caution = match snapshot.volatility {
            Some(v) if v > self.high_volatility => -1.0,
            _ => 0.0,
        };
        contributions.push(ScoreContribution {
            name: "volatility".to_string(),
            buy: caution,
            sell: caution,
        });

        // --- Per-symbol bias -------------------------------------------------
        let bias = Self::symbol_bias(symbol);
        contributions.push(ScoreContribution {
            name: "symbol_bias".to_string(),
            buy: bias,
            sell: -bias,
        });

        let buy_score: f64 = contributions.iter().map(|c| c.buy).sum();
        let sell_score: f64 = contributions.iter().map(|c| c.sell).sum();

        let signal = if buy_score >= DECISIVE_SCORE || buy_score > sell_score + DECISIVE_LEAD {
            Signal::Buy
        } else if sell_score >= DECISIVE_SCORE || sell_score > buy_score + DECISIVE_LEAD {
            Signal::Sell
        } else {
            Signal::Hold
        };

        Recommendation {
            signal,
            buy_score,
            sell_score,
            contributions,
        }
    }
}

impl Default for RecommendationPolicy {
    fn default() -> Self {
        Self::new(0.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TrendStrength;

    fn snapshot(rsi: f64, sma_20: Option<f64>, sma_50: Option<f64>, vol: Option<f64>) -> IndicatorSnapshot {
        IndicatorSnapshot {
            price: Some(110.0),
            rsi,
            rsi_label: String::new(),
            macd_line: None,
            macd_signal: None,
            macd_histogram: None,
            bollinger_upper: None,
            bollinger_middle: None,
            bollinger_lower: None,
            sma_20,
            sma_50,
            volatility: vol,
            sharpe_ratio: None,
            momentum: None,
            support: None,
            resistance: None,
            volume_ratio: 1.0,
            price_change_pct: None,
            trend: crate::indicators::levels::classify_trend(110.0, sma_20, sma_50),
            strength: TrendStrength::Weak,
        }
    }

    #[test]
    fn bias_is_stable_and_bounded() {
        for sym in ["AAPL", "MSFT", "XOM", "BRK.B"] {
            let b = RecommendationPolicy::symbol_bias(sym);
            assert_eq!(b, RecommendationPolicy::symbol_bias(sym));
            assert!((-1.0..1.0).contains(&b));
        }
    }

    #[test]
    fn strong_uptrend_with_oversold_rsi_buys() {
        let policy = RecommendationPolicy::default();
        let rec = policy.evaluate(&snapshot(25.0, Some(105.0), Some(100.0), Some(0.2)), "AAPL");
        // 3 (rsi) + 2 (trend) + 2 (alignment) + bias in [-1, 1)
        assert!(rec.buy_score >= 6.0);
        assert_eq!(rec.signal, Signal::Buy);
        assert_eq!(rec.contributions.len(), 5);
    }

    #[test]
    fn bearish_overbought_sells() {
        let policy = RecommendationPolicy::default();
        let rec = policy.evaluate(&snapshot(80.0, Some(115.0), Some(120.0), None), "MSFT");
        assert!(rec.sell_score > 7.0 - 1.0 - 1e-9);
        assert_eq!(rec.signal, Signal::Sell);
    }

    #[test]
    fn neutral_inputs_follow_bias_only() {
        let policy = RecommendationPolicy::default();
        let sym = "NEUTRAL";
        let rec = policy.evaluate(&snapshot(50.0, None, None, None), sym);
        let bias = RecommendationPolicy::symbol_bias(sym);
        assert!((rec.buy_score - bias).abs() < 1e-12);
        assert!((rec.sell_score + bias).abs() < 1e-12);
        // buy - sell = 2 * bias; it only wins when that lead exceeds 1.
        let expected = if 2.0 * bias > 1.0 {
            Signal::Buy
        } else if -2.0 * bias > 1.0 {
            Signal::Sell
        } else {
            Signal::Hold
        };
        assert_eq!(rec.signal, expected);
    }

    #[test]
    fn high_volatility_discounts_both_sides() {
        let policy = RecommendationPolicy::default();
        let calm = policy.evaluate(&snapshot(35.0, None, None, Some(0.1)), "AAPL");
        let wild = policy.evaluate(&snapshot(35.0, None, None, Some(0.9)), "AAPL");
        assert!((calm.buy_score - wild.buy_score - 1.0).abs() < 1e-12);
        assert!((calm.sell_score - wild.sell_score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rsi_tiers_are_exclusive() {
        let policy = RecommendationPolicy::default();
        let rec = policy.evaluate(&snapshot(20.0, None, None, None), "X");
        let rsi = &rec.contributions[0];
        assert_eq!((rsi.buy, rsi.sell), (3.0, 0.0));
        let rec = policy.evaluate(&snapshot(65.0, None, None, None), "X");
        let rsi = &rec.contributions[0];
        assert_eq!((rsi.buy, rsi.sell), (0.0, 1.0));
    }

    #[test]
    fn alignment_uses_snapshot_price() {
        let policy = RecommendationPolicy::default();
        let mut snap = snapshot(50.0, Some(105.0), Some(100.0), None);
        let rec = policy.evaluate(&snap, "AAPL");
        assert_eq!((rec.contributions[2].buy, rec.contributions[2].sell), (2.0, 0.0));

        snap.price = None;
        let rec = policy.evaluate(&snap, "AAPL");
        assert_eq!((rec.contributions[2].buy, rec.contributions[2].sell), (0.0, 0.0));
    }

    #[test]
    fn evaluation_is_deterministic() {
        let policy = RecommendationPolicy::default();
        let snap = snapshot(45.0, Some(101.0), Some(99.0), Some(0.3));
        assert_eq!(
            policy.evaluate(&snap, "GOOGL"),
            policy.evaluate(&snap, "GOOGL")
        );
    }
}

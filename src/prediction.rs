// =============================================================================
// Prediction Projector — short-horizon trend extrapolation
// =============================================================================
//
// A simple heuristic, not a trained model:
//
//   recent_trend = mean(last 5 closes) - mean(previous 5 closes)
//   base(h)      = current + recent_trend * factor(h)
//                  factor: 1d = 0.2, 7d = 1.0, 30d = 3.0
//
// The noisy variant adds a bounded uniform shock to each horizon:
//
//   scale(h) = annualised_volatility / sqrt(periods(h))
//              periods: 1d = 252, 7d = 52, 30d = 12
//   noisy(h) = base(h) + current * scale(h) * U(-1, 1)
//
// `confidence` is a fixed constant reported alongside the projections. It is
// not computed from the data.
// =============================================================================

use std::collections::BTreeMap;

use rand::Rng;
use serde::Serialize;

use crate::types::{round2, Horizon};

/// Fixed confidence attached to every projection.
pub const PROJECTION_CONFIDENCE: f64 = 0.75;

/// Closes averaged on each side of the trend split.
const TREND_WINDOW: usize = 5;

/// Projected prices keyed by horizon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionSet {
    pub projections: BTreeMap<Horizon, f64>,
    pub confidence: f64,
}

impl PredictionSet {
    pub fn get(&self, horizon: Horizon) -> Option<f64> {
        self.projections.get(&horizon).copied()
    }
}

#[derive(Debug, Clone)]
pub struct PredictionProjector {
    horizons: Vec<Horizon>,
}

impl PredictionProjector {
    pub fn new(horizons: Vec<Horizon>) -> Self {
        Self { horizons }
    }

    pub fn horizons(&self) -> &[Horizon] {
        &self.horizons
    }

    /// Difference between the mean of the last five closes and the mean of
    /// the five before them. `None` with fewer than ten closes.
    pub fn recent_trend(closes: &[f64]) -> Option<f64> {
        if closes.len() < 2 * TREND_WINDOW {
            return None;
        }
        let n = closes.len();
        let window = TREND_WINDOW as f64;
        let last = closes[n - TREND_WINDOW..].iter().sum::<f64>() / window;
        let prior = closes[n - 2 * TREND_WINDOW..n - TREND_WINDOW].iter().sum::<f64>() / window;
        Some(last - prior)
    }

    /// Deterministic trend projection, rounded to cents.
    pub fn project(&self, closes: &[f64]) -> Option<PredictionSet> {
        let current = *closes.last()?;
        let trend = Self::recent_trend(closes)?;

        let projections = self
            .horizons
            .iter()
            .map(|&h| (h, round2(current + trend * h.trend_factor())))
            .collect();

        Some(PredictionSet {
            projections,
            confidence: PROJECTION_CONFIDENCE,
        })
    }

    /// Trend projection plus a bounded random shock per horizon.
    ///
    /// Each projection stays within `current * volatility / sqrt(periods)`
    /// of the deterministic value (plus rounding). Not reproducible unless
    /// the caller seeds `rng`.
    pub fn project_with_noise<R: Rng + ?Sized>(
        &self,
        closes: &[f64],
        volatility: f64,
        rng: &mut R,
    ) -> Option<PredictionSet> {
        let current = *closes.last()?;
        let trend = Self::recent_trend(closes)?;
        let volatility = if volatility.is_finite() { volatility.abs() } else { 0.0 };

        let projections = self
            .horizons
            .iter()
            .map(|&h| {
                let scale = volatility / h.periods_per_year().sqrt();
                let shock = current * scale * rng.gen_range(-1.0..=1.0);
                (h, round2(current + trend * h.trend_factor() + shock))
            })
            .collect();

        Some(PredictionSet {
            projections,
            confidence: PROJECTION_CONFIDENCE,
        })
    }
}

impl Default for PredictionProjector {
    fn default() -> Self {
        Self::new(Horizon::ALL.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn closes() -> Vec<f64> {
        // prior five average 100, last five average 110
        vec![98.0, 99.0, 100.0, 101.0, 102.0, 108.0, 109.0, 110.0, 111.0, 112.0]
    }

    #[test]
    fn insufficient_history() {
        let p = PredictionProjector::default();
        assert!(p.project(&[1.0; 9]).is_none());
        assert!(p.project(&[]).is_none());
        assert!(PredictionProjector::recent_trend(&[1.0; 9]).is_none());
    }

    #[test]
    fn base_projection_values() {
        let set = PredictionProjector::default().project(&closes()).unwrap();
        assert_eq!(set.get(Horizon::OneDay), Some(114.0));
        assert_eq!(set.get(Horizon::SevenDays), Some(122.0));
        assert_eq!(set.get(Horizon::ThirtyDays), Some(142.0));
        assert_eq!(set.confidence, PROJECTION_CONFIDENCE);
    }

    #[test]
    fn horizon_subset_is_respected() {
        let p = PredictionProjector::new(vec![Horizon::SevenDays]);
        let set = p.project(&closes()).unwrap();
        assert_eq!(set.projections.len(), 1);
        assert!(set.get(Horizon::OneDay).is_none());
    }

    #[test]
    fn noisy_projection_stays_in_band() {
        let p = PredictionProjector::default();
        let base = p.project(&closes()).unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        let current = 112.0;
        let vol = 0.35;
        for _ in 0..200 {
            let noisy = p.project_with_noise(&closes(), vol, &mut rng).unwrap();
            for h in Horizon::ALL {
                let bound = current * vol / h.periods_per_year().sqrt() + 0.011;
                let diff = (noisy.get(h).unwrap() - base.get(h).unwrap()).abs();
                assert!(diff <= bound, "{h}: diff {diff} > {bound}");
            }
        }
    }

    #[test]
    fn zero_volatility_noise_matches_base() {
        let p = PredictionProjector::default();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            p.project_with_noise(&closes(), 0.0, &mut rng),
            p.project(&closes())
        );
    }
}

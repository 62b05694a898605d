// =============================================================================
// Runtime Configuration — engine settings with atomic save
// =============================================================================
//
// Central configuration hub for the stockscope engine. Refresh period,
// universe contents, ranking size, projection horizons and indicator
// look-backs are all injected from here so tests can use short periods and
// small universes.
//
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash. All fields carry `#[serde(default)]` so that adding new fields
// never breaks loading an older config file.
//
// =============================================================================

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::market::SectorMode;
use crate::types::Horizon;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_refresh_interval_secs() -> u64 {
    300
}

fn default_universe() -> Vec<String> {
    crate::market::universe::DEFAULT_UNIVERSE
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_ranking_size() -> usize {
    10
}

fn default_horizons() -> Vec<Horizon> {
    Horizon::ALL.to_vec()
}

fn default_analysis_symbols() -> Vec<String> {
    vec![
        "AAPL".to_string(),
        "GOOGL".to_string(),
        "MSFT".to_string(),
        "AMZN".to_string(),
        "TSLA".to_string(),
    ]
}

fn default_history_bars() -> usize {
    252
}

fn default_rsi_period() -> usize {
    crate::indicators::rsi::DEFAULT_PERIOD
}

fn default_macd_fast() -> usize {
    crate::indicators::macd::FAST_PERIOD
}

fn default_macd_slow() -> usize {
    crate::indicators::macd::SLOW_PERIOD
}

fn default_macd_signal() -> usize {
    crate::indicators::macd::SIGNAL_PERIOD
}

fn default_bollinger_period() -> usize {
    crate::indicators::bollinger::DEFAULT_PERIOD
}

fn default_bollinger_num_std() -> f64 {
    crate::indicators::bollinger::DEFAULT_NUM_STD
}

fn default_momentum_period() -> usize {
    crate::indicators::momentum::DEFAULT_PERIOD
}

fn default_level_lookback() -> usize {
    crate::indicators::levels::DEFAULT_LOOKBACK
}

fn default_high_volatility() -> f64 {
    0.4
}

// =============================================================================
// IndicatorParams
// =============================================================================

/// Look-backs and thresholds for the single-instrument analysis path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorParams {
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    #[serde(default = "default_macd_fast")]
    pub macd_fast: usize,

    #[serde(default = "default_macd_slow")]
    pub macd_slow: usize,

    #[serde(default = "default_macd_signal")]
    pub macd_signal: usize,

    #[serde(default = "default_bollinger_period")]
    pub bollinger_period: usize,

    /// Band half-width in standard deviations.
    #[serde(default = "default_bollinger_num_std")]
    pub bollinger_num_std: f64,

    #[serde(default = "default_momentum_period")]
    pub momentum_period: usize,

    /// Trailing bars for support / resistance.
    #[serde(default = "default_level_lookback")]
    pub level_lookback: usize,

    /// Annualised volatility above which the recommendation applies its
    /// caution discount.
    #[serde(default = "default_high_volatility")]
    pub high_volatility: f64,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_period: default_rsi_period(),
            macd_fast: default_macd_fast(),
            macd_slow: default_macd_slow(),
            macd_signal: default_macd_signal(),
            bollinger_period: default_bollinger_period(),
            bollinger_num_std: default_bollinger_num_std(),
            momentum_period: default_momentum_period(),
            level_lookback: default_level_lookback(),
            high_volatility: default_high_volatility(),
        }
    }
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level runtime configuration for the stockscope engine.
///
/// Every field has a serde default so that older JSON files missing new fields
/// will still deserialise correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    // --- Aggregation ---------------------------------------------------------

    /// Seconds between market snapshot refreshes.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// Symbols the aggregator quotes on every refresh.
    #[serde(default = "default_universe")]
    pub universe: Vec<String>,

    /// Length of each ranking list (gainers, losers, most active).
    #[serde(default = "default_ranking_size")]
    pub ranking_size: usize,

    /// How sector performance is produced.
    #[serde(default)]
    pub sector_mode: SectorMode,

    /// Fixed seed for the aggregator's random source. `None` seeds from OS
    /// entropy.
    #[serde(default)]
    pub rng_seed: Option<u64>,

    // --- Analysis ------------------------------------------------------------

    /// Projection horizons reported by the predictor.
    #[serde(default = "default_horizons")]
    pub horizons: Vec<Horizon>,

    /// Symbols analysed by the binary at startup.
    #[serde(default = "default_analysis_symbols")]
    pub analysis_symbols: Vec<String>,

    /// Bars requested from the series source per analysis.
    #[serde(default = "default_history_bars")]
    pub history_bars: usize,

    #[serde(default)]
    pub indicator_params: IndicatorParams,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval_secs(),
            universe: default_universe(),
            ranking_size: default_ranking_size(),
            sector_mode: SectorMode::default(),
            rng_seed: None,
            horizons: default_horizons(),
            analysis_symbols: default_analysis_symbols(),
            history_bars: default_history_bars(),
            indicator_params: IndicatorParams::default(),
        }
    }
}

impl RuntimeConfig {
    /// Refresh period as a `Duration`, never shorter than one millisecond.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs).max(Duration::from_millis(1))
    }

    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            universe = config.universe.len(),
            refresh_interval_secs = config.refresh_interval_secs,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise runtime config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "runtime config saved (atomic)");
        Ok(())
    }

    /// Apply `STOCKSCOPE_SYMBOLS` / `STOCKSCOPE_REFRESH_SECS` style overrides.
    ///
    /// Takes the raw values so callers decide where they come from.
    pub fn apply_overrides(&mut self, symbols: Option<&str>, refresh_secs: Option<&str>) {
        if let Some(syms) = symbols {
            let parsed: Vec<String> = syms
                .split(',')
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect();
            if !parsed.is_empty() {
                self.universe = parsed;
            }
        }
        if let Some(secs) = refresh_secs.and_then(|s| s.trim().parse::<u64>().ok()) {
            self.refresh_interval_secs = secs;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = RuntimeConfig::default();
        assert_eq!(cfg.refresh_interval_secs, 300);
        assert_eq!(cfg.universe.len(), 50);
        assert_eq!(cfg.universe[0], "AAPL");
        assert_eq!(cfg.ranking_size, 10);
        assert_eq!(cfg.horizons, Horizon::ALL.to_vec());
        assert_eq!(cfg.sector_mode, SectorMode::Independent);
        assert!(cfg.rng_seed.is_none());
        assert_eq!(cfg.indicator_params.rsi_period, 14);
        assert_eq!(cfg.indicator_params.macd_slow, 26);
        assert!((cfg.indicator_params.high_volatility - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: RuntimeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.refresh_interval_secs, 300);
        assert_eq!(cfg.history_bars, 252);
        assert_eq!(cfg.indicator_params.bollinger_period, 20);
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{
            "refresh_interval_secs": 5,
            "universe": ["AAPL", "MSFT"],
            "horizons": ["1d", "30d"],
            "sector_mode": "derived_from_quotes",
            "indicator_params": { "rsi_period": 10 }
        }"#;
        let cfg: RuntimeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.refresh_interval_secs, 5);
        assert_eq!(cfg.universe, vec!["AAPL", "MSFT"]);
        assert_eq!(cfg.horizons, vec![Horizon::OneDay, Horizon::ThirtyDays]);
        assert_eq!(cfg.sector_mode, SectorMode::DerivedFromQuotes);
        assert_eq!(cfg.indicator_params.rsi_period, 10);
        assert_eq!(cfg.indicator_params.macd_fast, 12);
        assert_eq!(cfg.ranking_size, 10);
    }

    #[test]
    fn overrides_replace_universe_and_period() {
        let mut cfg = RuntimeConfig::default();
        cfg.apply_overrides(Some(" aapl, msft ,,"), Some("15"));
        assert_eq!(cfg.universe, vec!["AAPL", "MSFT"]);
        assert_eq!(cfg.refresh_interval_secs, 15);

        cfg.apply_overrides(Some(" , "), Some("not-a-number"));
        assert_eq!(cfg.universe, vec!["AAPL", "MSFT"]);
        assert_eq!(cfg.refresh_interval_secs, 15);
    }

    #[test]
    fn zero_interval_is_clamped() {
        let cfg = RuntimeConfig {
            refresh_interval_secs: 0,
            ..RuntimeConfig::default()
        };
        assert_eq!(cfg.refresh_interval(), Duration::from_millis(1));
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = std::env::temp_dir().join(format!("stockscope-cfg-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");

        let mut cfg = RuntimeConfig::default();
        cfg.universe = vec!["IBM".to_string()];
        cfg.rng_seed = Some(7);
        cfg.save(&path).unwrap();

        let loaded = RuntimeConfig::load(&path).unwrap();
        assert_eq!(loaded.universe, vec!["IBM"]);
        assert_eq!(loaded.rng_seed, Some(7));
        assert!(!path.with_extension("json.tmp").exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn load_missing_file_errors() {
        assert!(RuntimeConfig::load("/definitely/not/here.json").is_err());
    }
}

//! Configuration structures for the information-bar engine.

use crate::error::{Error, Result};
use crate::types::BarKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration for one partition run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Bar sampling configuration.
    pub bars: BarConfig,
    /// Triple-barrier labeling configuration.
    pub labels: LabelConfig,
    /// Sample weighting configuration.
    pub weights: WeightConfig,
}

impl PipelineConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.bars.validate()?;
        self.labels.validate()?;
        self.weights.validate()
    }
}

/// How an unchanged price is signed by the tick rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TieRule {
    /// Unchanged price contributes no signed flow.
    #[default]
    Zero,
    /// Unchanged price repeats the last non-zero direction.
    Inherit,
}

/// Imbalance bar configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarConfig {
    /// Flow measure (dollar or volume).
    pub bar_kind: BarKind,
    /// Target absolute imbalance per bar.
    pub target_threshold: f64,
    /// Span of the per-tick threshold EMA.
    pub ema_window: u32,
    /// Direction assigned to unchanged prices.
    pub tie_rule: TieRule,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            bar_kind: BarKind::Dollar,
            target_threshold: 1_000_000.0,
            ema_window: 20,
            tie_rule: TieRule::Zero,
        }
    }
}

impl BarConfig {
    pub fn new(bar_kind: BarKind, target_threshold: f64, ema_window: u32) -> Self {
        Self {
            bar_kind,
            target_threshold,
            ema_window,
            tie_rule: TieRule::Zero,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.target_threshold.is_finite() || self.target_threshold <= 0.0 {
            return Err(Error::config(format!(
                "target_threshold must be a positive finite number, got {}",
                self.target_threshold
            )));
        }
        if self.ema_window == 0 {
            return Err(Error::config("ema_window must be >= 1"));
        }
        Ok(())
    }
}

/// Triple-barrier labeling configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Trailing bars in the volatility estimate.
    pub volatility_window: u32,
    /// Upper barrier distance in units of volatility.
    pub profit_multiplier: f64,
    /// Lower barrier distance in units of volatility.
    pub stop_multiplier: f64,
    /// Maximum number of forward bars scanned (vertical barrier).
    pub horizon_bars: u32,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            volatility_window: 20,
            profit_multiplier: 2.0,
            stop_multiplier: 2.0,
            horizon_bars: 10,
        }
    }
}

impl LabelConfig {
    pub fn validate(&self) -> Result<()> {
        if self.volatility_window == 0 {
            return Err(Error::config("volatility_window must be >= 1"));
        }
        if !self.profit_multiplier.is_finite() || self.profit_multiplier < 0.0 {
            return Err(Error::config(format!(
                "profit_multiplier must be >= 0, got {}",
                self.profit_multiplier
            )));
        }
        if !self.stop_multiplier.is_finite() || self.stop_multiplier < 0.0 {
            return Err(Error::config(format!(
                "stop_multiplier must be >= 0, got {}",
                self.stop_multiplier
            )));
        }
        if self.horizon_bars == 0 {
            return Err(Error::config("horizon_bars must be >= 1"));
        }
        Ok(())
    }
}

/// Sample weighting configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightConfig {
    /// Divide by label concurrency.
    pub use_uniqueness: bool,
    /// Start from |realized return| instead of 1.
    pub use_abs_return_weight: bool,
    /// Half-life for recency decay, in bars.
    pub half_life_bars: Option<u32>,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            use_uniqueness: true,
            use_abs_return_weight: false,
            half_life_bars: None,
        }
    }
}

impl WeightConfig {
    pub fn validate(&self) -> Result<()> {
        if self.half_life_bars == Some(0) {
            return Err(Error::config("half_life_bars must be >= 1 when set"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bars.bar_kind, BarKind::Dollar);
        assert_eq!(config.bars.tie_rule, TieRule::Zero);
        assert_eq!(config.labels.horizon_bars, 10);
        assert!(config.weights.use_uniqueness);
    }

    #[test]
    fn test_rejects_non_positive_threshold() {
        for threshold in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let config = BarConfig::new(BarKind::Dollar, threshold, 10);
            let err = config.validate().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Config);
        }
    }

    #[test]
    fn test_rejects_zero_windows() {
        let bars = BarConfig::new(BarKind::Volume, 100.0, 0);
        assert!(bars.validate().is_err());

        let labels = LabelConfig {
            volatility_window: 0,
            ..LabelConfig::default()
        };
        assert!(labels.validate().is_err());

        let labels = LabelConfig {
            horizon_bars: 0,
            ..LabelConfig::default()
        };
        assert!(labels.validate().is_err());

        let weights = WeightConfig {
            half_life_bars: Some(0),
            ..WeightConfig::default()
        };
        assert!(weights.validate().is_err());
    }

    #[test]
    fn test_rejects_negative_multipliers() {
        let labels = LabelConfig {
            stop_multiplier: -1.0,
            ..LabelConfig::default()
        };
        assert!(labels.validate().is_err());

        let labels = LabelConfig {
            profit_multiplier: 0.0,
            stop_multiplier: 0.0,
            ..LabelConfig::default()
        };
        assert!(labels.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let json = r#"{
            "bars": { "bar_kind": "volume", "target_threshold": 5000.0, "tie_rule": "inherit" },
            "weights": { "use_abs_return_weight": true, "half_life_bars": 50 }
        }"#;
        let config = PipelineConfig::from_json_str(json).unwrap();
        assert_eq!(config.bars.bar_kind, BarKind::Volume);
        assert_eq!(config.bars.target_threshold, 5000.0);
        assert_eq!(config.bars.ema_window, 20);
        assert_eq!(config.bars.tie_rule, TieRule::Inherit);
        assert_eq!(config.labels, LabelConfig::default());
        assert!(config.weights.use_uniqueness);
        assert_eq!(config.weights.half_life_bars, Some(50));
    }

    #[test]
    fn test_from_json_invalid() {
        let err = PipelineConfig::from_json_str(r#"{ "bars": { "target_threshold": -1.0 } }"#)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);

        let err = PipelineConfig::from_json_str("{ not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Json);
    }

    #[test]
    fn test_from_json_file_missing() {
        let err = PipelineConfig::from_json_file("/nonexistent/infobar.json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}

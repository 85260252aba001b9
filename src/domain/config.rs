//! Resolved run parameters for the equity pipeline.

use crate::domain::error::ScreenerError;
use crate::domain::ranking::RankingWeights;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_DY_MIN: f64 = 5.0;
pub const DEFAULT_ROE_MIN: f64 = 15.0;
pub const DEFAULT_PL_MAX: f64 = 15.0;
pub const DEFAULT_PVP_MAX: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenConfig {
    /// Minimum dividend yield, percentage points.
    pub dy_min: f64,
    /// Minimum return on equity, percentage points.
    pub roe_min: f64,
    /// P/E ceiling for the Graham table.
    pub pl_max: f64,
    /// P/B ceiling for the Graham table.
    pub pvp_max: f64,
    pub apply_graham: bool,
    pub weights: RankingWeights,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            dy_min: DEFAULT_DY_MIN,
            roe_min: DEFAULT_ROE_MIN,
            pl_max: DEFAULT_PL_MAX,
            pvp_max: DEFAULT_PVP_MAX,
            apply_graham: true,
            weights: RankingWeights::default(),
        }
    }
}

impl ScreenConfig {
    /// Read `[acoes]` and `[ranking]`, falling back to defaults per key.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, ScreenerError> {
        let d = RankingWeights::default();
        let weights = RankingWeights::new(
            config.get_double("ranking", "weight_roe", d.roe),
            config.get_double("ranking", "weight_dy", d.dy),
            config.get_double("ranking", "weight_valuation", d.valuation),
            config.get_double("ranking", "weight_leverage", d.leverage),
        )
        .map_err(|e| match e {
            ScreenerError::InvalidParameter { name, reason } => ScreenerError::ConfigInvalid {
                section: "ranking".to_string(),
                key: name,
                reason,
            },
            other => other,
        })?;

        Ok(Self {
            dy_min: config.get_double("acoes", "dy_min", DEFAULT_DY_MIN),
            roe_min: config.get_double("acoes", "roe_min", DEFAULT_ROE_MIN),
            pl_max: config.get_double("acoes", "pl_max", DEFAULT_PL_MAX),
            pvp_max: config.get_double("acoes", "pvp_max", DEFAULT_PVP_MAX),
            apply_graham: config.get_bool("acoes", "apply_graham", true),
            weights,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    #[test]
    fn defaults_match_documented_values() {
        let c = ScreenConfig::default();
        assert_eq!(c.dy_min, 5.0);
        assert_eq!(c.roe_min, 15.0);
        assert_eq!(c.pl_max, 15.0);
        assert_eq!(c.pvp_max, 1.5);
        assert!(c.apply_graham);
        assert_eq!(c.weights, RankingWeights::default());
    }

    #[test]
    fn from_empty_config_is_default() {
        let c = ScreenConfig::from_config(&FileConfigAdapter::empty()).unwrap();
        assert_eq!(c, ScreenConfig::default());
    }

    #[test]
    fn from_config_reads_every_key() {
        let adapter = FileConfigAdapter::from_string(
            "[acoes]\ndy_min = 6\nroe_min = 12\npl_max = 10\npvp_max = 2\napply_graham = no\n\
             [ranking]\nweight_roe = 1\nweight_dy = 1\nweight_valuation = 1\nweight_leverage = 1\n",
        )
        .unwrap();
        let c = ScreenConfig::from_config(&adapter).unwrap();
        assert_eq!(c.dy_min, 6.0);
        assert_eq!(c.roe_min, 12.0);
        assert_eq!(c.pl_max, 10.0);
        assert_eq!(c.pvp_max, 2.0);
        assert!(!c.apply_graham);
        assert_eq!(c.weights.roe, 0.25);
        assert_eq!(c.weights.leverage, 0.25);
    }

    #[test]
    fn bad_weights_are_config_errors() {
        let adapter = FileConfigAdapter::from_string("[ranking]\nweight_dy = -1\n").unwrap();
        let err = ScreenConfig::from_config(&adapter).unwrap_err();
        assert!(
            matches!(err, ScreenerError::ConfigInvalid { section, key, .. } if section == "ranking" && key == "weight_dy")
        );
    }
}

//! Configuration validation.
//!
//! Runs against the raw config before any input is read. Values missing from
//! the file are validated at their defaults.

use crate::domain::config::ScreenConfig;
use crate::domain::error::ScreenerError;
use crate::domain::gordon::GordonConfig;
use crate::ports::config_port::ConfigPort;

pub fn validate_screen_config(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    check_screen_config(&ScreenConfig::from_config(config)?)
}

pub fn validate_gordon_config(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    let defaults = GordonConfig::default();
    let gordon = GordonConfig {
        k: config.get_double("gordon", "k", defaults.k),
        g: config.get_double("gordon", "g", defaults.g),
    };
    gordon.validate()
}

/// Threshold checks shared by file validation and resolved command-line values.
pub fn check_screen_config(screen: &ScreenConfig) -> Result<(), ScreenerError> {
    if !screen.dy_min.is_finite() || screen.dy_min < 0.0 {
        return Err(invalid("acoes", "dy_min", "dy_min must be non-negative"));
    }
    if !screen.roe_min.is_finite() {
        return Err(invalid("acoes", "roe_min", "roe_min must be a finite number"));
    }
    check_ceiling("pl_max", screen.pl_max)?;
    check_ceiling("pvp_max", screen.pvp_max)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> ScreenerError {
    ScreenerError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn check_ceiling(key: &str, value: f64) -> Result<(), ScreenerError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid("acoes", key, &format!("{key} must be positive")));
    }
    Ok(())
}

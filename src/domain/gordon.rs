//! Gordon growth fair value for income funds.

use tracing::debug;

use crate::domain::error::ScreenerError;
use crate::domain::fund::FundRecord;

/// Discount rate `k` and growth rate `g`, both as decimal fractions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GordonConfig {
    pub k: f64,
    pub g: f64,
}

impl Default for GordonConfig {
    fn default() -> Self {
        Self { k: 0.10, g: 0.03 }
    }
}

impl GordonConfig {
    pub fn new(k: f64, g: f64) -> Result<Self, ScreenerError> {
        let config = Self { k, g };
        config.validate()?;
        Ok(config)
    }

    /// Requires finite parameters with `k > g`.
    pub fn validate(&self) -> Result<(), ScreenerError> {
        if !self.k.is_finite() || !self.g.is_finite() {
            return Err(ScreenerError::InvalidParameter {
                name: "k/g".to_string(),
                reason: "gordon parameters must be finite".to_string(),
            });
        }
        if self.k - self.g <= 0.0 {
            return Err(ScreenerError::InvalidParameter {
                name: "k".to_string(),
                reason: format!(
                    "discount rate k ({}) must be greater than growth rate g ({})",
                    self.k, self.g
                ),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GordonRow {
    /// Index of the source row in the normalized fund table.
    pub row: usize,
    pub ticker: String,
    pub price: Option<f64>,
    pub last_distribution: Option<f64>,
    pub dy: Option<f64>,
    pub book_value_per_share: Option<f64>,
    pub pb: Option<f64>,
    /// 3-year distribution CAGR as a decimal fraction.
    pub distribution_cagr_3y: Option<f64>,
    pub fair_value: f64,
}

/// Round to cents, ties to even.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// `(last_distribution * 12) / (k - g)`, rounded to cents.
pub fn fair_value(last_distribution: f64, config: &GordonConfig) -> f64 {
    round_cents(last_distribution * 12.0 / (config.k - config.g))
}

/// Value every fund, keeping only finite, strictly positive fair values.
///
/// Parameters are checked before any row is looked at, so an invalid `k/g`
/// fails even for an empty table.
pub fn value_gordon(
    funds: &[FundRecord],
    config: &GordonConfig,
) -> Result<Vec<GordonRow>, ScreenerError> {
    config.validate()?;

    let mut rows = Vec::with_capacity(funds.len());
    for f in funds {
        let Some(distribution) = f.last_distribution else {
            debug!(ticker = %f.ticker, "gordon skipped: missing distribution");
            continue;
        };
        let value = fair_value(distribution, config);
        if !value.is_finite() || value <= 0.0 {
            debug!(ticker = %f.ticker, value, "gordon skipped: non-positive fair value");
            continue;
        }
        rows.push(GordonRow {
            row: f.row,
            ticker: f.ticker.clone(),
            price: f.price,
            last_distribution: f.last_distribution,
            dy: f.dy,
            book_value_per_share: f.book_value_per_share,
            pb: f.pb,
            distribution_cagr_3y: f.distribution_cagr_3y.map(|v| v / 100.0),
            fair_value: value,
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn default_parameters() {
        let c = GordonConfig::default();
        assert_eq!(c.k, 0.10);
        assert_eq!(c.g, 0.03);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn k_not_above_g_is_rejected() {
        assert!(matches!(
            GordonConfig::new(0.03, 0.03),
            Err(ScreenerError::InvalidParameter { .. })
        ));
        assert!(GordonConfig::new(0.02, 0.05).is_err());
        assert!(GordonConfig::new(f64::INFINITY, 0.05).is_err());
    }

    #[test]
    fn empty_table_still_checks_parameters() {
        let bad = GordonConfig { k: 0.05, g: 0.08 };
        assert!(value_gordon(&[], &bad).is_err());
        assert!(value_gordon(&[], &GordonConfig::default()).unwrap().is_empty());
    }

    #[test]
    fn fair_value_formula() {
        // 1.10 * 12 / 0.07 = 188.571... -> 188.57
        let v = fair_value(1.10, &GordonConfig::default());
        assert_abs_diff_eq!(v, 188.57, epsilon = 1e-9);
    }

    #[test]
    fn cent_ties_round_to_even() {
        // 0.125 * 12 / 12 = 0.125 exactly
        let v = fair_value(0.125, &GordonConfig { k: 12.0, g: 0.0 });
        assert_eq!(v, 0.12);
        assert_eq!(round_cents(0.375), 0.38);
        assert_eq!(round_cents(-0.125), -0.12);
    }

    #[test]
    fn cagr_is_rescaled_to_fraction() {
        let mut f = FundRecord::new("HGLG11", Some(1.0));
        f.distribution_cagr_3y = Some(4.5);
        let rows = value_gordon(&[f], &GordonConfig::default()).unwrap();
        assert_abs_diff_eq!(rows[0].distribution_cagr_3y.unwrap(), 0.045, epsilon = 1e-12);
    }

    #[test]
    fn drops_missing_zero_negative_and_tiny_values() {
        let funds = vec![
            FundRecord::new("MISS", None),
            FundRecord::new("ZERO", Some(0.0)),
            FundRecord::new("NEG", Some(-0.5)),
            // 0.0002 * 12 / 0.07 = 0.0343 -> 0.03, kept
            FundRecord::new("SMALL", Some(0.0002)),
            // 0.0001 * 12 / 0.07 = 0.0171 -> 0.02, kept
            FundRecord::new("EDGE", Some(0.0001)),
            // 0.00002 * 12 / 0.07 = 0.0034 -> 0.00, dropped after rounding
            FundRecord::new("TINY", Some(0.00002)),
            FundRecord::new("OK", Some(0.8)),
        ];
        let rows = value_gordon(&funds, &GordonConfig::default()).unwrap();
        let tickers: Vec<_> = rows.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["SMALL", "EDGE", "OK"]);
        assert!(rows.iter().all(|r| r.fair_value > 0.0));
    }

    #[test]
    fn input_is_not_mutated() {
        let mut f = FundRecord::new("X", Some(1.0));
        f.distribution_cagr_3y = Some(10.0);
        let funds = vec![f];
        let _ = value_gordon(&funds, &GordonConfig::default()).unwrap();
        assert_eq!(funds[0].distribution_cagr_3y, Some(10.0));
    }
}

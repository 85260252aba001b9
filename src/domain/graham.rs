//! Graham number valuation.

use tracing::debug;

use crate::domain::equity::EquityRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct GrahamRow {
    pub ticker: String,
    pub dy: Option<f64>,
    pub roe: Option<f64>,
    pub price: Option<f64>,
    pub intrinsic_value: f64,
    /// `intrinsic_value - price`; positive means undervalued. Missing when
    /// the price is missing.
    pub deviation: Option<f64>,
}

/// `sqrt(P/E * P/B * EPS * BVPS)`.
///
/// `None` when an operand is not finite or the radicand is negative.
pub fn graham_number(pe: f64, pb: f64, eps: f64, bvps: f64) -> Option<f64> {
    let product = pe * pb * eps * bvps;
    if !product.is_finite() || product < 0.0 {
        return None;
    }
    Some(product.sqrt())
}

/// Keep rows with P/E <= `pl_max` and P/B <= `pvp_max` and value them.
///
/// Unlike the screener, a missing multiple disqualifies the row, as does a
/// missing EPS or book value.
pub fn value_graham(records: &[EquityRecord], pl_max: f64, pvp_max: f64) -> Vec<GrahamRow> {
    let mut rows = Vec::new();
    for r in records {
        let (Some(pe), Some(pb)) = (r.pe, r.pb) else {
            continue;
        };
        if pe > pl_max || pb > pvp_max {
            continue;
        }
        let (Some(eps), Some(bvps)) = (r.eps, r.bvps) else {
            debug!(ticker = %r.ticker, "graham skipped: missing EPS or book value");
            continue;
        };
        let Some(intrinsic_value) = graham_number(pe, pb, eps, bvps) else {
            debug!(ticker = %r.ticker, eps, bvps, "graham skipped: negative radicand");
            continue;
        };
        rows.push(GrahamRow {
            ticker: r.ticker.clone(),
            dy: r.dy,
            roe: r.roe,
            price: r.price,
            intrinsic_value,
            deviation: r.price.map(|p| intrinsic_value - p),
        });
    }
    rows
}

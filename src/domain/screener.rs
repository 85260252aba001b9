//! Equity screening: sanity pass followed by minimum thresholds.
//!
//! Missing values never disqualify a row here. The Graham valuator is the
//! stricter stage.

use tracing::debug;

use crate::domain::equity::EquityRecord;

/// Drop rows with obviously broken fundamentals: non-positive P/E or ROE,
/// negative dividend yield.
pub fn passes_sanity(record: &EquityRecord) -> bool {
    record.pe.is_none_or(|v| v > 0.0)
        && record.roe.is_none_or(|v| v > 0.0)
        && record.dy.is_none_or(|v| v >= 0.0)
}

pub fn passes_thresholds(record: &EquityRecord, dy_min: f64, roe_min: f64) -> bool {
    record.dy.is_none_or(|v| v >= dy_min) && record.roe.is_none_or(|v| v >= roe_min)
}

/// Sanity pass then threshold pass. Input order is preserved.
pub fn screen(records: &[EquityRecord], dy_min: f64, roe_min: f64) -> Vec<EquityRecord> {
    let screened: Vec<EquityRecord> = records
        .iter()
        .filter(|r| {
            if !passes_sanity(r) {
                debug!(ticker = %r.ticker, row = r.row, "dropped by sanity pass");
                return false;
            }
            passes_thresholds(r, dy_min, roe_min)
        })
        .cloned()
        .collect();
    debug!(
        input = records.len(),
        kept = screened.len(),
        dy_min,
        roe_min,
        "screen complete"
    );
    screened
}

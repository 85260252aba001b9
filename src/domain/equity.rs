//! Typed equity records extracted from a normalized export.

use crate::domain::error::ScreenerError;
use crate::domain::normalize::ensure_required_columns;
use crate::domain::table::NormalizedTable;

pub const TICKER: &str = "TICKER";
pub const PRICE: &str = "PRECO";
pub const DY: &str = "DY";
pub const ROE: &str = "ROE";
pub const PE: &str = "P/L";
pub const PB: &str = "P/VP";
pub const EPS: &str = "LPA";
pub const BVPS: &str = "VPA";
pub const NET_DEBT_EBITDA: &str = "DL/EBIT";

pub const LABEL: &str = "acoes";

pub const REQUIRED_COLUMNS: [&str; 9] = [TICKER, PRICE, DY, ROE, PE, PB, EPS, BVPS, NET_DEBT_EBITDA];
pub const NUMERIC_COLUMNS: [&str; 8] = [PRICE, DY, ROE, PE, PB, EPS, BVPS, NET_DEBT_EBITDA];

/// One listed equity. Percentages (`dy`, `roe`) are in percentage points.
#[derive(Debug, Clone, PartialEq)]
pub struct EquityRecord {
    /// Position of the source row in the normalized table.
    pub row: usize,
    pub ticker: String,
    pub price: Option<f64>,
    pub dy: Option<f64>,
    pub roe: Option<f64>,
    pub pe: Option<f64>,
    pub pb: Option<f64>,
    pub eps: Option<f64>,
    pub bvps: Option<f64>,
    pub net_debt_ebitda: Option<f64>,
}

impl EquityRecord {
    /// Bare record with every numeric field missing.
    pub fn new(ticker: &str) -> Self {
        Self {
            row: 0,
            ticker: ticker.to_string(),
            price: None,
            dy: None,
            roe: None,
            pe: None,
            pb: None,
            eps: None,
            bvps: None,
            net_debt_ebitda: None,
        }
    }

    pub fn from_table(table: &NormalizedTable) -> Result<Vec<Self>, ScreenerError> {
        let idx = ensure_required_columns(table, &REQUIRED_COLUMNS, LABEL)?;
        let records = (0..table.len())
            .map(|r| EquityRecord {
                row: r,
                ticker: table.text(r, idx[0]),
                price: table.number(r, idx[1]),
                dy: table.number(r, idx[2]),
                roe: table.number(r, idx[3]),
                pe: table.number(r, idx[4]),
                pb: table.number(r, idx[5]),
                eps: table.number(r, idx[6]),
                bvps: table.number(r, idx[7]),
                net_debt_ebitda: table.number(r, idx[8]),
            })
            .collect();
        Ok(records)
    }
}

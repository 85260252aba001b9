//! Typed real-estate fund (FII) records.

use crate::domain::error::ScreenerError;
use crate::domain::normalize::ensure_required_columns;
use crate::domain::table::NormalizedTable;

pub const TICKER: &str = "TICKER";
pub const PRICE: &str = "PRECO";
pub const LAST_DISTRIBUTION: &str = "ULTIMO DIVIDENDO";
pub const DY: &str = "DY";
pub const BOOK_VALUE: &str = "VALOR PATRIMONIAL COTA";
pub const PB: &str = "P/VP";
pub const DISTRIBUTION_CAGR: &str = "CAGR DIVIDENDOS 3 ANOS";

pub const LABEL: &str = "fii";

pub const REQUIRED_COLUMNS: [&str; 7] =
    [TICKER, PRICE, LAST_DISTRIBUTION, DY, BOOK_VALUE, PB, DISTRIBUTION_CAGR];
pub const NUMERIC_COLUMNS: [&str; 6] =
    [PRICE, LAST_DISTRIBUTION, DY, BOOK_VALUE, PB, DISTRIBUTION_CAGR];

#[derive(Debug, Clone, PartialEq)]
pub struct FundRecord {
    pub row: usize,
    pub ticker: String,
    pub price: Option<f64>,
    /// Last monthly distribution per share.
    pub last_distribution: Option<f64>,
    pub dy: Option<f64>,
    pub book_value_per_share: Option<f64>,
    pub pb: Option<f64>,
    /// 3-year distribution CAGR in percentage points, as exported.
    pub distribution_cagr_3y: Option<f64>,
}

impl FundRecord {
    pub fn new(ticker: &str, last_distribution: Option<f64>) -> Self {
        Self {
            row: 0,
            ticker: ticker.to_string(),
            price: None,
            last_distribution,
            dy: None,
            book_value_per_share: None,
            pb: None,
            distribution_cagr_3y: None,
        }
    }

    pub fn from_table(table: &NormalizedTable) -> Result<Vec<Self>, ScreenerError> {
        let idx = ensure_required_columns(table, &REQUIRED_COLUMNS, LABEL)?;
        Ok((0..table.len())
            .map(|r| FundRecord {
                row: r,
                ticker: table.text(r, idx[0]),
                price: table.number(r, idx[1]),
                last_distribution: table.number(r, idx[2]),
                dy: table.number(r, idx[3]),
                book_value_per_share: table.number(r, idx[4]),
                pb: table.number(r, idx[5]),
                distribution_cagr_3y: table.number(r, idx[6]),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::normalize::normalize;
    use crate::domain::table::RawTable;

    #[test]
    fn extracts_fund_records() {
        let raw = RawTable::new(
            vec![
                "TICKER".into(),
                "PRECO".into(),
                "Último Dividendo".into(),
                "DY".into(),
                "Valor Patrimonial Cota".into(),
                "P/VP".into(),
                "CAGR Dividendos 3 Anos".into(),
            ],
            vec![vec![
                "HGLG11".into(),
                "R$ 160,00".into(),
                "1,10".into(),
                "8,2%".into(),
                "155,3".into(),
                "1,03".into(),
                "4,5%".into(),
            ]],
        );
        let t = normalize(&raw, &NUMERIC_COLUMNS);
        let records = FundRecord::from_table(&t).unwrap();
        assert_eq!(records.len(), 1);
        let f = &records[0];
        assert_eq!(f.ticker, "HGLG11");
        assert_eq!(f.price, Some(160.0));
        assert_eq!(f.last_distribution, Some(1.1));
        assert_eq!(f.dy, Some(8.2));
        assert_eq!(f.distribution_cagr_3y, Some(4.5));
    }

    #[test]
    fn missing_distribution_column_fails() {
        let raw = RawTable::new(vec!["TICKER".into(), "PRECO".into()], vec![]);
        let t = normalize(&raw, &NUMERIC_COLUMNS);
        let err = FundRecord::from_table(&t).unwrap_err();
        match err {
            ScreenerError::Schema { label, missing, .. } => {
                assert_eq!(label, "fii");
                assert_eq!(missing.len(), 5);
                assert!(missing.contains(&"ULTIMO DIVIDENDO".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

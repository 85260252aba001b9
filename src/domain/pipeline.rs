//! End-to-end transforms for one snapshot: raw table in, derived tables out.

use tracing::info;

use crate::domain::config::ScreenConfig;
use crate::domain::equity::{self, EquityRecord};
use crate::domain::error::ScreenerError;
use crate::domain::fund::{self, FundRecord};
use crate::domain::gordon::{GordonConfig, GordonRow, value_gordon};
use crate::domain::graham::{GrahamRow, value_graham};
use crate::domain::normalize::normalize;
use crate::domain::ranking::{RankingRow, rank_with};
use crate::domain::screener::screen;
use crate::domain::table::{NormalizedTable, RawTable};

#[derive(Debug, Clone)]
pub struct EquityAnalysis {
    pub normalized: NormalizedTable,
    pub screened: Vec<EquityRecord>,
    /// Screened rows with every normalized source column.
    pub screened_table: NormalizedTable,
    /// `None` when Graham valuation is disabled.
    pub graham: Option<Vec<GrahamRow>>,
    pub ranking: Vec<RankingRow>,
}

#[derive(Debug, Clone)]
pub struct FundAnalysis {
    pub normalized: NormalizedTable,
    pub gordon: Vec<GordonRow>,
}

pub fn analyze_equities(
    raw: &RawTable,
    config: &ScreenConfig,
) -> Result<EquityAnalysis, ScreenerError> {
    let normalized = normalize(raw, &equity::NUMERIC_COLUMNS);
    let records = EquityRecord::from_table(&normalized)?;

    let screened = screen(&records, config.dy_min, config.roe_min);
    let rows: Vec<usize> = screened.iter().map(|r| r.row).collect();
    let screened_table = normalized.select_rows(&rows);

    let graham = config
        .apply_graham
        .then(|| value_graham(&screened, config.pl_max, config.pvp_max));
    let ranking = rank_with(&screened, &config.weights);

    info!(
        input = records.len(),
        screened = screened.len(),
        graham = graham.as_ref().map_or(0, Vec::len),
        "equity analysis complete"
    );

    Ok(EquityAnalysis {
        normalized,
        screened,
        screened_table,
        graham,
        ranking,
    })
}

pub fn analyze_funds(raw: &RawTable, config: &GordonConfig) -> Result<FundAnalysis, ScreenerError> {
    config.validate()?;
    let normalized = normalize(raw, &fund::NUMERIC_COLUMNS);
    let records = FundRecord::from_table(&normalized)?;
    let gordon = value_gordon(&records, config)?;

    info!(
        input = records.len(),
        valued = gordon.len(),
        k = config.k,
        g = config.g,
        "fund analysis complete"
    );

    Ok(FundAnalysis { normalized, gordon })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn equity_raw(rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            strings(&["TICKER", "PRECO", "DY", "ROE", "P/L", "P/VP", "LPA", "VPA", "DL/EBIT", "SETOR"]),
            rows.iter().map(|r| strings(r)).collect(),
        )
    }

    #[test]
    fn single_row_end_to_end() {
        let raw = equity_raw(&[&["AAA", "10,00", "6%", "20%", "8", "1,2", "2", "9", "1", "Bancos"]]);
        let out = analyze_equities(&raw, &ScreenConfig::default()).unwrap();

        assert_eq!(out.screened.len(), 1);
        assert_eq!(out.screened_table.columns.len(), 10);

        let graham = out.graham.unwrap();
        assert_eq!(graham.len(), 1);
        assert_abs_diff_eq!(graham[0].intrinsic_value, 172.8f64.sqrt(), epsilon = 1e-9);
        assert_abs_diff_eq!(graham[0].deviation.unwrap(), 172.8f64.sqrt() - 10.0, epsilon = 1e-9);

        assert_eq!(out.ranking.len(), 1);
        assert_eq!(out.ranking[0].rank, 1);
        assert_abs_diff_eq!(out.ranking[0].score, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn graham_disabled_yields_none() {
        let raw = equity_raw(&[&["AAA", "10", "6", "20", "8", "1", "2", "9", "1", ""]]);
        let config = ScreenConfig {
            apply_graham: false,
            ..ScreenConfig::default()
        };
        let out = analyze_equities(&raw, &config).unwrap();
        assert!(out.graham.is_none());
        assert_eq!(out.ranking.len(), 1);
    }

    #[test]
    fn screened_table_passes_through_extra_columns() {
        let raw = equity_raw(&[
            &["LOW", "10", "1", "20", "8", "1", "2", "9", "1", "Energia"],
            &["HIGH", "10", "9", "25", "8", "1", "2", "9", "1", "Bancos"],
        ]);
        let out = analyze_equities(&raw, &ScreenConfig::default()).unwrap();
        assert_eq!(out.screened_table.len(), 1);
        let setor = out.screened_table.column_index("SETOR").unwrap();
        assert_eq!(out.screened_table.text(0, setor), "Bancos");
        assert_eq!(out.normalized.len(), 2);
    }

    #[test]
    fn empty_equity_table_is_not_an_error() {
        let out = analyze_equities(&equity_raw(&[]), &ScreenConfig::default()).unwrap();
        assert!(out.screened.is_empty());
        assert!(out.ranking.is_empty());
        assert_eq!(out.graham.map(|g| g.len()), Some(0));
    }

    #[test]
    fn missing_columns_fail_fast() {
        let raw = RawTable::new(strings(&["TICKER", "PRECO"]), vec![]);
        let err = analyze_equities(&raw, &ScreenConfig::default()).unwrap_err();
        assert!(matches!(err, ScreenerError::Schema { .. }));
    }

    #[test]
    fn funds_invalid_parameters_checked_before_schema() {
        let raw = RawTable::new(strings(&["TICKER"]), vec![]);
        let bad = GordonConfig { k: 0.03, g: 0.10 };
        let err = analyze_funds(&raw, &bad).unwrap_err();
        assert!(matches!(err, ScreenerError::InvalidParameter { .. }));
    }

    #[test]
    fn funds_end_to_end() {
        let raw = RawTable::new(
            strings(&[
                "TICKER",
                "PRECO",
                "ULTIMO DIVIDENDO",
                "DY",
                "VALOR PATRIMONIAL COTA",
                "P/VP",
                "CAGR DIVIDENDOS 3 ANOS",
                "Segmento",
            ]),
            vec![
                strings(&["DEAD11", "50,00", "-", "0%", "80", "0,6", "-10%", "Shoppings"]),
                strings(&["HGLG11", "160,00", "1,10", "8,2%", "155,3", "1,03", "4,5%", "Logística"]),
            ],
        );
        let out = analyze_funds(&raw, &GordonConfig::default()).unwrap();
        assert_eq!(out.normalized.len(), 2);
        assert_eq!(out.gordon.len(), 1);
        assert_eq!(out.gordon[0].ticker, "HGLG11");
        assert_abs_diff_eq!(out.gordon[0].fair_value, 188.57, epsilon = 1e-9);

        let workbook = crate::domain::report::fund_workbook(&out);
        let sheet = &workbook.sheets[0];
        assert_eq!(sheet.columns.len(), 9);
        assert_eq!(sheet.columns[7], "SEGMENTO");
        assert_eq!(sheet.columns[8], "PRECO_JUSTO_GORDON");
        assert_eq!(sheet.len(), 1);
        assert_eq!(sheet.rows[0][0].render(), "HGLG11");
        assert_eq!(sheet.rows[0][7].render(), "Logística");
        assert_abs_diff_eq!(sheet.rows[0][6].as_number().unwrap(), 0.045, epsilon = 1e-12);
        assert_abs_diff_eq!(sheet.rows[0][8].as_number().unwrap(), 188.57, epsilon = 1e-9);
    }
}

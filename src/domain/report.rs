//! Named output tables handed to a [`ReportPort`](crate::ports::report_port::ReportPort).
//!
//! Sheet and workbook names are the labels a writer maps to spreadsheet tabs
//! or files.

use crate::domain::fund;
use crate::domain::gordon::GordonRow;
use crate::domain::graham::GrahamRow;
use crate::domain::pipeline::{EquityAnalysis, FundAnalysis};
use crate::domain::ranking::RankingRow;
use crate::domain::table::{Cell, NormalizedTable, RawTable};

pub const EQUITY_WORKBOOK: &str = "acoes_resultado";
pub const FUND_WORKBOOK: &str = "fii_resultado";

pub const RAW_SHEET: &str = "Raw";
pub const SCREENED_SHEET: &str = "Filtrado_DY_ROE";
pub const GRAHAM_SHEET: &str = "Filtrado_Graham";
pub const RANKING_SHEET: &str = "Ranking";
pub const GORDON_SHEET: &str = "Analise_Gordon";

pub const GRAHAM_COLUMNS: [&str; 6] = [
    "TICKER",
    "DY",
    "ROE",
    "PRECO",
    "VALOR_GRAHAM",
    "DIFERENCA_GRAHAM",
];

pub const RANKING_COLUMNS: [&str; 13] = [
    "TICKER",
    "ROE",
    "DY",
    "P/L",
    "P/VP",
    "DL/EBIT",
    "NORM_ROE",
    "NORM_DY",
    "NORM_PL",
    "NORM_PVP",
    "NORM_DL_EBIT",
    "SCORE",
    "RANK",
];

pub const FAIR_VALUE_COLUMN: &str = "PRECO_JUSTO_GORDON";

#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: &str, columns: &[&str], rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    pub fn from_raw(name: &str, table: &RawTable) -> Self {
        Self {
            name: name.to_string(),
            columns: table.columns.clone(),
            rows: (0..table.len())
                .map(|r| {
                    (0..table.columns.len())
                        .map(|c| Cell::from(table.cell(r, c)))
                        .collect()
                })
                .collect(),
        }
    }

    pub fn from_normalized(name: &str, table: &NormalizedTable) -> Self {
        Self {
            name: name.to_string(),
            columns: table.columns.clone(),
            rows: table.rows.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Workbook {
    pub name: String,
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

pub fn graham_sheet(rows: &[GrahamRow]) -> Sheet {
    Sheet::new(
        GRAHAM_SHEET,
        &GRAHAM_COLUMNS,
        rows.iter()
            .map(|r| {
                vec![
                    Cell::from(r.ticker.as_str()),
                    r.dy.into(),
                    r.roe.into(),
                    r.price.into(),
                    r.intrinsic_value.into(),
                    r.deviation.into(),
                ]
            })
            .collect(),
    )
}

pub fn ranking_sheet(rows: &[RankingRow]) -> Sheet {
    Sheet::new(
        RANKING_SHEET,
        &RANKING_COLUMNS,
        rows.iter()
            .map(|r| {
                vec![
                    Cell::from(r.ticker.as_str()),
                    r.roe.into(),
                    r.dy.into(),
                    r.pe.into(),
                    r.pb.into(),
                    r.net_debt_ebitda.into(),
                    r.norm_roe.into(),
                    r.norm_dy.into(),
                    r.norm_pe.into(),
                    r.norm_pb.into(),
                    r.norm_net_debt_ebitda.into(),
                    r.score.into(),
                    (r.rank as f64).into(),
                ]
            })
            .collect(),
    )
}

/// Valued fund rows with every source column, CAGR in decimal and the fair
/// value appended.
pub fn gordon_sheet(table: &NormalizedTable, rows: &[GordonRow]) -> Sheet {
    let indices: Vec<usize> = rows.iter().map(|r| r.row).collect();
    let selected = table.select_rows(&indices);
    let cagr = selected.column_index(fund::DISTRIBUTION_CAGR);

    let mut columns = selected.columns;
    columns.push(FAIR_VALUE_COLUMN.to_string());
    Sheet {
        name: GORDON_SHEET.to_string(),
        columns,
        rows: selected
            .rows
            .into_iter()
            .zip(rows)
            .map(|(mut cells, r)| {
                if let Some(cell) = cagr.and_then(|c| cells.get_mut(c)) {
                    *cell = r.distribution_cagr_3y.into();
                }
                cells.push(r.fair_value.into());
                cells
            })
            .collect(),
    }
}

/// `Raw`, `Filtrado_DY_ROE`, `Filtrado_Graham` (when computed) and `Ranking`.
pub fn equity_workbook(raw: &RawTable, analysis: &EquityAnalysis) -> Workbook {
    let mut sheets = vec![
        Sheet::from_raw(RAW_SHEET, raw),
        Sheet::from_normalized(SCREENED_SHEET, &analysis.screened_table),
    ];
    if let Some(graham) = &analysis.graham {
        sheets.push(graham_sheet(graham));
    }
    sheets.push(ranking_sheet(&analysis.ranking));
    Workbook {
        name: EQUITY_WORKBOOK.to_string(),
        sheets,
    }
}

pub fn fund_workbook(analysis: &FundAnalysis) -> Workbook {
    Workbook {
        name: FUND_WORKBOOK.to_string(),
        sheets: vec![gordon_sheet(&analysis.normalized, &analysis.gordon)],
    }
}

#![allow(dead_code)]

use fundscreen::domain::equity::EquityRecord;
use fundscreen::domain::error::ScreenerError;
use fundscreen::domain::fund::FundRecord;
use fundscreen::domain::report::Workbook;
use fundscreen::domain::table::RawTable;
use fundscreen::ports::report_port::ReportPort;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

pub const EQUITY_HEADER: [&str; 10] = [
    "Ticker", "Preço", "DY", "ROE", "P/L", "P/VP", "LPA", "VPA", "DL/EBIT", "Setor",
];

pub const FUND_HEADER: [&str; 7] = [
    "Ticker",
    "Preço",
    "Último Dividendo",
    "DY",
    "Valor Patrimonial Cota",
    "P/VP",
    "CAGR Dividendos 3 Anos",
];

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

pub fn raw_table(header: &[&str], rows: &[&[&str]]) -> RawTable {
    RawTable::new(strings(header), rows.iter().map(|r| strings(r)).collect())
}

pub fn equity_raw(rows: &[&[&str]]) -> RawTable {
    raw_table(&EQUITY_HEADER, rows)
}

pub fn fund_raw(rows: &[&[&str]]) -> RawTable {
    raw_table(&FUND_HEADER, rows)
}

/// The single-row scenario used across pipeline and CLI tests.
pub fn sample_equity_row() -> RawTable {
    equity_raw(&[&[
        "AAA", "10,00", "6%", "20%", "8", "1,2", "2", "9", "1", "Bancos",
    ]])
}

/// Five equities: three survive default thresholds, one fails DY, one fails
/// the sanity pass.
pub fn sample_equities() -> RawTable {
    equity_raw(&[
        &["AAA", "10,00", "6%", "20%", "8", "1,2", "2", "9", "1", "Bancos"],
        &["BBB", "R$ 25,50", "8,5", "18", "12", "1,4", "2,1", "18", "2,5", "Energia"],
        &["CCC", "5", "2", "30", "6", "0,9", "0,8", "5,5", "0,4", "Varejo"],
        &["DDD", "40", "7", "25", "-3", "2", "-13", "20", "3", "Mineração"],
        &["EEE", "12", "9,1", "16", "20", "3", "0,6", "4", "", "Saneamento"],
    ])
}

pub fn sample_funds() -> RawTable {
    fund_raw(&[
        &["HGLG11", "160", "1,10", "8,2", "155", "1,03", "4,5"],
        &["XPLG11", "100", "0,78", "9,1", "110", "0,91", "-2"],
        &["ZERO11", "10", "0,00", "0", "12", "0,83", ""],
        &["BAD11", "9", "n/d", "7", "11", "0,82", "1"],
    ])
}

pub fn equity(ticker: &str) -> EquityRecord {
    EquityRecord::new(ticker)
}

pub fn fund(ticker: &str, last_distribution: f64) -> FundRecord {
    FundRecord::new(ticker, Some(last_distribution))
}

/// Records every workbook handed to it instead of touching the filesystem.
pub struct MockReportPort {
    pub written: RefCell<Vec<Workbook>>,
    pub fail_on: Option<String>,
}

impl MockReportPort {
    pub fn new() -> Self {
        Self {
            written: RefCell::new(Vec::new()),
            fail_on: None,
        }
    }

    pub fn failing_on(workbook: &str) -> Self {
        Self {
            written: RefCell::new(Vec::new()),
            fail_on: Some(workbook.to_string()),
        }
    }

    pub fn workbook(&self, name: &str) -> Option<Workbook> {
        self.written.borrow().iter().find(|w| w.name == name).cloned()
    }
}

impl ReportPort for MockReportPort {
    fn write(&self, workbook: &Workbook, out_dir: &Path) -> Result<Vec<PathBuf>, ScreenerError> {
        if self.fail_on.as_deref() == Some(workbook.name.as_str()) {
            return Err(ScreenerError::Output {
                path: out_dir.join(&workbook.name).display().to_string(),
                reason: "disk full".to_string(),
            });
        }
        self.written.borrow_mut().push(workbook.clone());
        Ok(workbook
            .sheets
            .iter()
            .map(|s| out_dir.join(&workbook.name).join(format!("{}.csv", s.name)))
            .collect())
    }
}

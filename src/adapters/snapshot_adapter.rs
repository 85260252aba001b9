//! Quote-API snapshot adapter.
//!
//! Reads a JSON snapshot saved from the quote API and flattens each quote
//! into one equity row under the canonical export headers. Values are
//! handed over as text so they pass through the same normalizer as a CSV
//! export.

use std::fs;
use std::path::Path;

use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::domain::equity::REQUIRED_COLUMNS;
use crate::domain::error::ScreenerError;
use crate::domain::table::RawTable;
use crate::ports::table_port::TablePort;

const PRICE_KEYS: [&str; 3] = ["regularMarketPrice", "price", "regularMarketPreviousClose"];
const DY_KEYS: [&str; 2] = ["dividendYield", "dividendYieldPercent"];
const ROE_KEYS: [&str; 2] = ["roe", "returnOnEquity"];
const PE_KEYS: [&str; 3] = ["priceEarnings", "peRatio", "trailingPE"];
const PB_KEYS: [&str; 1] = ["priceToBook"];
const EPS_KEYS: [&str; 2] = ["earningsPerShare", "eps"];
const BVPS_KEYS: [&str; 1] = ["bookValue"];
const NET_DEBT_EBITDA_KEYS: [&str; 1] = ["debtToEbitda"];

#[derive(Debug, Deserialize)]
struct Snapshot {
    #[serde(default)]
    fetched_at: Option<String>,
    #[serde(default)]
    results: Vec<SnapshotEntry>,
}

#[derive(Debug, Deserialize)]
struct SnapshotEntry {
    #[serde(default)]
    ticker: Option<String>,
    #[serde(default)]
    data: Value,
}

/// One flattened quote, before rendering to text.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRow {
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

impl QuoteRow {
    fn to_cells(&self) -> Vec<String> {
        let text = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
        vec![
            self.ticker.clone(),
            text(self.price),
            text(self.dy),
            text(self.roe),
            text(self.pe),
            text(self.pb),
            text(self.eps),
            text(self.bvps),
            text(self.net_debt_ebitda),
        ]
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// First non-null key wins, even if its value is not numeric.
fn first_number(data: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .find_map(|k| data.get(*k).filter(|v| !v.is_null()))
        .and_then(as_number)
}

/// Top-level keys first, then the `fundamentalData` object.
fn nested_number(data: &Value, keys: &[&str]) -> Option<f64> {
    first_number(data, keys).or_else(|| {
        data.get("fundamentalData")
            .and_then(|f| first_number(f, keys))
    })
}

/// Fractions in [0, 1] are taken as ratios and scaled to percent.
pub fn normalize_percent(value: Option<f64>) -> Option<f64> {
    value.map(|v| if (0.0..=1.0).contains(&v) { v * 100.0 } else { v })
}

/// Flatten one API quote object into a row.
pub fn parse_quote(quote: &Value) -> QuoteRow {
    let ticker = ["symbol", "shortName"]
        .iter()
        .find_map(|k| quote.get(*k).and_then(Value::as_str).filter(|s| !s.is_empty()))
        .unwrap_or("N/A")
        .to_string();

    let price = first_number(quote, &PRICE_KEYS);
    let eps = nested_number(quote, &EPS_KEYS);
    let bvps = nested_number(quote, &BVPS_KEYS);

    let pe = nested_number(quote, &PE_KEYS).or_else(|| match (price, eps) {
        (Some(p), Some(e)) if e != 0.0 => Some(p / e),
        _ => None,
    });
    let pb = nested_number(quote, &PB_KEYS).or_else(|| match (price, bvps) {
        (Some(p), Some(b)) if b != 0.0 => Some(p / b),
        _ => None,
    });

    QuoteRow {
        ticker,
        price,
        dy: normalize_percent(nested_number(quote, &DY_KEYS)),
        roe: normalize_percent(nested_number(quote, &ROE_KEYS)),
        pe,
        pb,
        eps,
        bvps,
        net_debt_ebitda: nested_number(quote, &NET_DEBT_EBITDA_KEYS),
    }
}

/// Same order as [`QuoteRow::to_cells`].
fn canonical_columns() -> Vec<String> {
    REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect()
}

#[derive(Debug, Default)]
pub struct SnapshotAdapter;

impl SnapshotAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, content: &str, path: &Path) -> Result<RawTable, ScreenerError> {
        let snapshot: Snapshot =
            serde_json::from_str(content).map_err(|e| ScreenerError::Source {
                path: path.display().to_string(),
                reason: format!("invalid snapshot JSON: {}", e),
            })?;

        if let Some(ts) = &snapshot.fetched_at {
            match DateTime::parse_from_rfc3339(ts) {
                Ok(at) => info!(fetched_at = %at, entries = snapshot.results.len(), "snapshot loaded"),
                Err(e) => warn!(fetched_at = %ts, error = %e, "unparseable snapshot timestamp"),
            }
        }

        if snapshot.results.is_empty() {
            warn!(path = %path.display(), "snapshot has no results");
        }

        let mut rows = Vec::with_capacity(snapshot.results.len());
        for entry in &snapshot.results {
            let first = entry
                .data
                .get("results")
                .and_then(Value::as_array)
                .and_then(|r| r.first());
            match first {
                Some(quote) => rows.push(parse_quote(quote).to_cells()),
                None => warn!(
                    ticker = entry.ticker.as_deref().unwrap_or("N/A"),
                    "snapshot entry without results"
                ),
            }
        }

        Ok(RawTable::new(canonical_columns(), rows))
    }
}

impl TablePort for SnapshotAdapter {
    fn read_table(&self, path: &Path) -> Result<RawTable, ScreenerError> {
        let content = fs::read_to_string(path).map_err(|e| ScreenerError::Source {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        self.parse(&content, path)
    }
}

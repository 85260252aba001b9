//! Column-name canonicalization and PT-BR numeric coercion.

use std::collections::HashSet;

use tracing::warn;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::domain::error::ScreenerError;
use crate::domain::table::{Cell, NormalizedTable, RawTable};

/// Upper-case, decompose, drop diacritics and collapse whitespace runs.
///
/// `"Preço "`, `"PRECO"` and `"preço"` all map to `"PRECO"`. Case mapping runs
/// first since it can produce precomposed letters.
pub fn normalize_column_name(name: &str) -> String {
    let stripped: String = name
        .to_uppercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c) && *c != '\u{feff}')
        .collect();
    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse PT-BR formatted numeric text (`"6,5%"`, `"R$ 10,00"`).
///
/// Returns `None` for anything that does not parse to a finite number.
pub fn parse_pt_number(text: &str) -> Option<f64> {
    let cleaned = text.replace('%', "").replace("R$", "").replace(',', ".");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Canonicalize headers and coerce the designated numeric columns.
///
/// `numeric_columns` are matched against the normalized header names. Rows
/// shorter than the header are padded with empty text or missing numbers.
pub fn normalize(raw: &RawTable, numeric_columns: &[&str]) -> NormalizedTable {
    let columns: Vec<String> = raw.columns.iter().map(|c| normalize_column_name(c)).collect();

    let mut seen = HashSet::new();
    for col in &columns {
        if !seen.insert(col.as_str()) {
            warn!(column = %col, "duplicate column after normalization, first occurrence wins");
        }
    }

    let numeric: Vec<bool> = columns
        .iter()
        .map(|c| numeric_columns.contains(&c.as_str()))
        .collect();

    let rows = (0..raw.len())
        .map(|r| {
            numeric
                .iter()
                .enumerate()
                .map(|(c, &is_numeric)| {
                    let text = raw.cell(r, c);
                    if is_numeric {
                        Cell::Number(parse_pt_number(text))
                    } else {
                        Cell::Text(text.trim().to_string())
                    }
                })
                .collect()
        })
        .collect();

    NormalizedTable { columns, rows }
}

/// Resolve required columns, returning their indices in `required` order.
///
/// This is the only hard failure during ingestion.
pub fn ensure_required_columns(
    table: &NormalizedTable,
    required: &[&str],
    label: &str,
) -> Result<Vec<usize>, ScreenerError> {
    let mut indices = Vec::with_capacity(required.len());
    let mut missing = Vec::new();
    for name in required {
        match table.column_index(name) {
            Some(i) => indices.push(i),
            None => missing.push(name.to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(ScreenerError::Schema {
            label: label.to_string(),
            missing,
            available: table.columns.clone(),
        });
    }
    Ok(indices)
}

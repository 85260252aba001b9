//! Tabular input port trait.

use std::path::Path;

use crate::domain::error::ScreenerError;
use crate::domain::table::RawTable;

/// Source of one fully materialized snapshot table.
pub trait TablePort {
    fn read_table(&self, path: &Path) -> Result<RawTable, ScreenerError>;
}

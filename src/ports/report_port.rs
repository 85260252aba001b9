//! Report output port trait.

use std::path::{Path, PathBuf};

use crate::domain::error::ScreenerError;
use crate::domain::report::Workbook;

/// Port for writing named output tables.
pub trait ReportPort {
    /// Write every sheet of `workbook` under `out_dir`, returning the paths
    /// written.
    fn write(&self, workbook: &Workbook, out_dir: &Path) -> Result<Vec<PathBuf>, ScreenerError>;
}

//! CSV adapter: reads fundamentals exports and writes result sheets.
//!
//! Exports use `;` as separator by default. Each sheet of a workbook is
//! written to `<out_dir>/<workbook>/<sheet>.csv`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::domain::error::ScreenerError;
use crate::domain::report::{Sheet, Workbook};
use crate::domain::table::RawTable;
use crate::ports::report_port::ReportPort;
use crate::ports::table_port::TablePort;

pub const DEFAULT_DELIMITER: u8 = b';';

pub struct CsvAdapter {
    delimiter: u8,
}

impl Default for CsvAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}

impl CsvAdapter {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    fn source_error(path: &Path, reason: impl ToString) -> ScreenerError {
        ScreenerError::Source {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    fn output_error(path: &Path, reason: impl ToString) -> ScreenerError {
        ScreenerError::Output {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Parse CSV bytes into a raw table. Non-UTF-8 bytes are decoded lossily.
    pub fn parse(&self, content: &[u8], path: &Path) -> Result<RawTable, ScreenerError> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .from_reader(content);

        let columns: Vec<String> = rdr
            .byte_headers()
            .map_err(|e| Self::source_error(path, format!("CSV header error: {}", e)))?
            .iter()
            .map(|h| {
                String::from_utf8_lossy(h)
                    .trim_start_matches('\u{feff}')
                    .trim()
                    .to_string()
            })
            .collect();

        let mut rows = Vec::new();
        for result in rdr.byte_records() {
            let record = result
                .map_err(|e| Self::source_error(path, format!("CSV parse error: {}", e)))?;
            let row: Vec<String> = record
                .iter()
                .map(|f| String::from_utf8_lossy(f).into_owned())
                .collect();
            if row.iter().all(|c| c.trim().is_empty()) {
                continue;
            }
            rows.push(row);
        }

        debug!(path = %path.display(), columns = columns.len(), rows = rows.len(), "csv parsed");
        Ok(RawTable::new(columns, rows))
    }

    fn write_sheet(&self, sheet: &Sheet, path: &Path) -> Result<(), ScreenerError> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_path(path)
            .map_err(|e| Self::output_error(path, e))?;

        wtr.write_record(&sheet.columns)
            .map_err(|e| Self::output_error(path, e))?;
        for row in &sheet.rows {
            wtr.write_record(row.iter().map(|c| c.render()))
                .map_err(|e| Self::output_error(path, e))?;
        }
        wtr.flush().map_err(|e| Self::output_error(path, e))?;
        Ok(())
    }
}

impl TablePort for CsvAdapter {
    fn read_table(&self, path: &Path) -> Result<RawTable, ScreenerError> {
        let content = fs::read(path).map_err(|e| Self::source_error(path, e))?;
        self.parse(&content, path)
    }
}

impl ReportPort for CsvAdapter {
    fn write(&self, workbook: &Workbook, out_dir: &Path) -> Result<Vec<PathBuf>, ScreenerError> {
        let dir = out_dir.join(&workbook.name);
        fs::create_dir_all(&dir).map_err(|e| Self::output_error(&dir, e))?;

        let mut written = Vec::with_capacity(workbook.sheets.len());
        for sheet in &workbook.sheets {
            let path = dir.join(format!("{}.csv", sheet.name));
            self.write_sheet(sheet, &path)?;
            info!(path = %path.display(), rows = sheet.len(), "sheet written");
            written.push(path);
        }
        Ok(written)
    }
}

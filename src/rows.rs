//! Row source for tabular input files
//!
//! Dispatches on file extension: `.csv` streams records through the csv
//! crate, `.xlsx` reads the first sheet of the workbook via calamine with
//! every cell stringified and trimmed. Rows come back in file order, header
//! row first; the caller consumes the header by taking the first element.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use calamine::{Data, Reader, Xlsx, open_workbook};

use crate::error::ImportError;

/// Forward-only row iterator over a CSV or XLSX file.
pub enum RowSource {
    /// Streams records straight off the file
    Csv(csv::StringRecordsIntoIter<File>),
    /// Eager: calamine loads the whole used range up front, iteration is
    /// over the materialized rows
    Xlsx(std::vec::IntoIter<Vec<String>>),
}

impl std::fmt::Debug for RowSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowSource::Csv(_) => f.write_str("RowSource::Csv(..)"),
            RowSource::Xlsx(_) => f.write_str("RowSource::Xlsx(..)"),
        }
    }
}

impl RowSource {
    /// Open a file and pick the reader by (lowercased) extension.
    pub fn open(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => {
                let reader = csv::ReaderBuilder::new()
                    .has_headers(false)
                    .flexible(true)
                    .from_path(path)
                    .with_context(|| format!("cannot open CSV file {}", path.display()))?;
                Ok(Self::Csv(reader.into_records()))
            }
            "xlsx" => {
                let mut workbook: Xlsx<_> = open_workbook(path)
                    .with_context(|| format!("cannot open XLSX file {}", path.display()))?;
                let sheet_names = workbook.sheet_names().to_owned();
                let first_sheet = sheet_names
                    .first()
                    .ok_or_else(|| anyhow!("workbook {} has no sheets", path.display()))?;
                let range = workbook
                    .worksheet_range(first_sheet)
                    .with_context(|| format!("error reading sheet '{}'", first_sheet))?;

                let rows: Vec<Vec<String>> = range
                    .rows()
                    .map(|row| row.iter().map(cell_text).collect())
                    .collect();
                Ok(Self::Xlsx(rows.into_iter()))
            }
            other => Err(ImportError::UnsupportedFormat(other.to_string()).into()),
        }
    }
}

impl Iterator for RowSource {
    type Item = Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Csv(records) => {
                let record = records.next()?;
                Some(
                    record
                        .map(|r| r.iter().map(str::to_string).collect())
                        .context("malformed CSV record"),
                )
            }
            Self::Xlsx(rows) => rows.next().map(Ok),
        }
    }
}

/// Stringify a spreadsheet cell; absent cells become the empty string.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

//! Excel importer implementation - Excel (.xlsx) → Table

use crate::error::{TranslateError, TranslateResult};
use crate::types::{CellValue, Table};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use std::path::{Path, PathBuf};

/// Reject anything that is not an `.xlsx` workbook
pub fn ensure_xlsx(path: &Path) -> TranslateResult<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    if ext == "xlsx" {
        Ok(())
    } else {
        Err(TranslateError::UnsupportedFormat(path.display().to_string()))
    }
}

/// Excel importer that loads a worksheet into an in-memory [`Table`]
pub struct ExcelImporter {
    path: PathBuf,
}

impl ExcelImporter {
    /// Create a new Excel importer
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn open(&self) -> TranslateResult<Xlsx<std::io::BufReader<std::fs::File>>> {
        if !self.path.exists() {
            return Err(TranslateError::NotFound(self.path.display().to_string()));
        }
        ensure_xlsx(&self.path)?;

        open_workbook(&self.path)
            .map_err(|e| TranslateError::Import(format!("Failed to open Excel file: {}", e)))
    }

    /// Names of all worksheets, in workbook order
    pub fn sheet_names(&self) -> TranslateResult<Vec<String>> {
        let workbook = self.open()?;
        Ok(workbook.sheet_names().to_vec())
    }

    /// Load one worksheet. The first row of the used range is the header row.
    pub fn import_sheet(&self, sheet_name: &str) -> TranslateResult<Table> {
        let mut workbook = self.open()?;

        let sheet_names = workbook.sheet_names().to_vec();
        if !sheet_names.iter().any(|s| s == sheet_name) {
            return Err(TranslateError::missing_sheet(sheet_name, &sheet_names));
        }

        let range = workbook.worksheet_range(sheet_name).map_err(|e| {
            TranslateError::Import(format!("Failed to read sheet '{}': {}", sheet_name, e))
        })?;

        Ok(Self::range_to_table(sheet_name, &range))
    }

    /// Load every worksheet in the workbook
    pub fn import_all(&self) -> TranslateResult<Vec<Table>> {
        let mut workbook = self.open()?;
        let sheet_names = workbook.sheet_names().to_vec();

        let mut tables = Vec::with_capacity(sheet_names.len());
        for sheet_name in sheet_names {
            let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
                TranslateError::Import(format!("Failed to read sheet '{}': {}", sheet_name, e))
            })?;
            tables.push(Self::range_to_table(&sheet_name, &range));
        }
        Ok(tables)
    }

    fn range_to_table(sheet_name: &str, range: &Range<Data>) -> Table {
        let mut rows = range.rows();

        let headers: Vec<String> = match rows.next() {
            Some(header_row) => header_row
                .iter()
                .enumerate()
                .map(|(col, cell)| Self::header_name(col, cell))
                .collect(),
            None => Vec::new(),
        };

        let mut table = Table::new(sheet_name, headers);
        for row in rows {
            table.push_row(row.iter().map(Self::convert_cell).collect());
        }

        tracing::debug!(
            sheet = sheet_name,
            columns = table.column_count(),
            rows = table.row_count(),
            "Loaded worksheet"
        );

        table
    }

    fn header_name(col: usize, cell: &Data) -> String {
        match cell {
            Data::Empty => format!("col_{}", col),
            Data::String(s) if s.trim().is_empty() => format!("col_{}", col),
            Data::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Convert a calamine cell to a [`CellValue`]
    pub(crate) fn convert_cell(cell: &Data) -> CellValue {
        match cell {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTime(dt) => CellValue::DateTime(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
            Data::Error(e) => CellValue::Error(e.to_string()),
        }
    }
}

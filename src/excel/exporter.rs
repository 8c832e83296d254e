//! Excel exporter implementation

use crate::error::{TranslateError, TranslateResult};
use crate::types::{CellValue, Table};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;

const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Excel exporter writing one [`Table`] as a single-sheet workbook
pub struct ExcelExporter<'a> {
    table: &'a Table,
}

impl<'a> ExcelExporter<'a> {
    /// Create a new Excel exporter
    pub fn new(table: &'a Table) -> Self {
        Self { table }
    }

    /// Export the table to an Excel .xlsx file
    pub fn export(&self, output_path: &Path) -> TranslateResult<()> {
        let mut workbook = Workbook::new();
        let datetime_format = Format::new().set_num_format(DATETIME_FORMAT);

        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(&self.table.sheet)
            .map_err(|e| TranslateError::Export(format!("Failed to set worksheet name: {}", e)))?;

        // Header row (row 0)
        for (col_idx, name) in self.table.headers.iter().enumerate() {
            let col = Self::col_index(col_idx)?;
            worksheet
                .write_string(0, col, name)
                .map_err(|e| TranslateError::Export(format!("Failed to write header: {}", e)))?;
        }

        // Data rows (starting at row 1)
        for (row_idx, row) in self.table.rows.iter().enumerate() {
            let excel_row = u32::try_from(row_idx + 1).map_err(|_| {
                TranslateError::Export(format!("Row {} exceeds the worksheet limit", row_idx + 1))
            })?;
            for (col_idx, value) in row.iter().enumerate() {
                let col = Self::col_index(col_idx)?;
                Self::write_cell_value(worksheet, excel_row, col, value, &datetime_format)?;
            }
        }

        workbook
            .save(output_path)
            .map_err(|e| TranslateError::Export(format!("Failed to save Excel file: {}", e)))?;

        tracing::debug!(
            path = %output_path.display(),
            rows = self.table.row_count(),
            columns = self.table.column_count(),
            "Wrote workbook"
        );

        Ok(())
    }

    fn col_index(idx: usize) -> TranslateResult<u16> {
        u16::try_from(idx).map_err(|_| {
            TranslateError::Export(format!("Column {} exceeds the worksheet limit", idx))
        })
    }

    /// Write a single cell value based on its type
    fn write_cell_value(
        worksheet: &mut Worksheet,
        row: u32,
        col: u16,
        value: &CellValue,
        datetime_format: &Format,
    ) -> TranslateResult<()> {
        match value {
            CellValue::Empty => {}
            CellValue::Text(text) => {
                worksheet
                    .write_string(row, col, text)
                    .map_err(|e| TranslateError::Export(format!("Failed to write text: {}", e)))?;
            }
            CellValue::Number(n) => {
                worksheet.write_number(row, col, *n).map_err(|e| {
                    TranslateError::Export(format!("Failed to write number: {}", e))
                })?;
            }
            CellValue::Bool(b) => {
                worksheet.write_boolean(row, col, *b).map_err(|e| {
                    TranslateError::Export(format!("Failed to write boolean: {}", e))
                })?;
            }
            CellValue::DateTime(serial) => {
                worksheet
                    .write_number_with_format(row, col, *serial, datetime_format)
                    .map_err(|e| {
                        TranslateError::Export(format!("Failed to write date: {}", e))
                    })?;
            }
            CellValue::Error(e) => {
                worksheet.write_string(row, col, e).map_err(|err| {
                    TranslateError::Export(format!("Failed to write error value: {}", err))
                })?;
            }
        }
        Ok(())
    }
}

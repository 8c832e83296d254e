//! Excel import/export module
//!
//! - Import: Excel (.xlsx) sheet → in-memory [`Table`](crate::types::Table)
//! - Export: [`Table`](crate::types::Table) → single-sheet Excel (.xlsx)

mod exporter;
mod importer;

pub use exporter::ExcelExporter;
pub use importer::{ensure_xlsx, ExcelImporter};

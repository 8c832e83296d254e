use thiserror::Error;

pub type TranslateResult<T> = Result<T, TranslateError>;

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("The file '{0}' was not found")]
    NotFound(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Unsupported file format '{0}' (expected .xlsx)")]
    UnsupportedFormat(String),
}

impl TranslateError {
    /// Missing sheet in a workbook
    pub fn missing_sheet(sheet: &str, available: &[String]) -> Self {
        TranslateError::Schema(format!(
            "Sheet '{}' was not found (available: {})",
            sheet,
            available.join(", ")
        ))
    }

    /// Missing column in a sheet
    pub fn missing_column(column: &str, sheet: &str, available: &[String]) -> Self {
        TranslateError::Schema(format!(
            "Column '{}' was not found in sheet '{}' (available: {})",
            column,
            sheet,
            available.join(", ")
        ))
    }
}

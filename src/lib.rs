//! xlsx-translate - translate a spreadsheet column through a translation service
//!
//! Reads one column of one sheet, sends every non-blank text cell to a
//! [`Translator`](translator::Translator) in row order, and writes the
//! answers as a new column to `<stem>_translated.xlsx`.
//!
//! # Backends
//!
//! - OpenAI chat completion with a translation prompt
//! - Google Translate (ISO-639-1 codes, no key)
//! - DeepL API
//!
//! # Example
//!
//! ```no_run
//! use xlsx_translate::pipeline::translate_excel_file;
//! use xlsx_translate::translator::{OpenAiConfig, OpenAiTranslator};
//!
//! let translator = OpenAiTranslator::new(OpenAiConfig::new("sk-..."))?;
//! let output = translate_excel_file(
//!     "excel_files/nl_translations.xlsx",
//!     "Sheet1",
//!     "en",
//!     "English",
//!     "Dutch",
//!     &translator,
//! )?;
//! println!("Saved {}", output.display());
//! # Ok::<(), xlsx_translate::error::TranslateError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod excel;
pub mod pipeline;
pub mod translator;
pub mod types;

// Re-export commonly used types
pub use config::{Backend, FailurePolicy};
pub use error::{TranslateError, TranslateResult};
pub use pipeline::{ColumnTranslator, TranslationJob};
pub use translator::Translator;
pub use types::{CellValue, Table, TranslationRequest};

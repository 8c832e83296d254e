//! Column translation pipeline
//!
//! Load one sheet, translate one column cell by cell in row order, append
//! the results as a new column and write `<stem>_translated.xlsx`.

use crate::config::FailurePolicy;
use crate::error::{TranslateError, TranslateResult};
use crate::excel::{ensure_xlsx, ExcelExporter, ExcelImporter};
use crate::translator::{Language, Translator};
use crate::types::{CellValue, Table, TranslationRequest};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const OUTPUT_SUFFIX: &str = "_translated";

/// Where to read, what to translate, where to write
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationJob {
    pub input: PathBuf,
    pub sheet: String,
    pub column: String,
    pub source_lang: String,
    pub target_lang: String,
    /// Explicit output path; derived from `input` when `None`
    pub output: Option<PathBuf>,
}

impl TranslationJob {
    pub fn new(
        input: impl Into<PathBuf>,
        sheet: impl Into<String>,
        column: impl Into<String>,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
    ) -> Self {
        Self {
            input: input.into(),
            sheet: sheet.into(),
            column: column.into(),
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
            output: None,
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| translated_output_path(&self.input))
    }

    /// Output must be an .xlsx path different from the input
    fn checked_output_path(&self) -> TranslateResult<PathBuf> {
        let output = self.output_path();
        ensure_xlsx(&output)?;
        if same_file(&output, &self.input) {
            return Err(TranslateError::Config(format!(
                "output path '{}' would overwrite the input file",
                output.display()
            )));
        }
        Ok(output)
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// `dir/data.xlsx` → `dir/data_translated.xlsx`
pub fn translated_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match input.extension() {
        Some(ext) => format!("{}{}.{}", stem, OUTPUT_SUFFIX, ext.to_string_lossy()),
        None => format!("{}{}", stem, OUTPUT_SUFFIX),
    };
    input.with_file_name(file_name)
}

/// Name for the new column: `<column>_<target code>`, with `_2`, `_3`, …
/// appended if the table already has a column by that name.
pub fn translated_column_name(table: &Table, column: &str, target_lang: &str) -> String {
    let base = format!("{}_{}", column, Language::column_suffix(target_lang));
    if !table.has_column(&base) {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}_{}", base, n);
        if !table.has_column(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

//==============================================================================
// Run results
//==============================================================================

/// Counters for one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationStats {
    pub rows: usize,
    /// Cells sent to the translator and replaced by its answer
    pub translated: usize,
    /// Empty or non-text cells carried over unchanged
    pub passed_through: usize,
    /// Cells whose translation failed and kept their original text
    pub failed: usize,
    pub elapsed: Duration,
}

impl TranslationStats {
    /// Translated cells per second
    pub fn rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.translated as f64 / secs
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranslationOutcome {
    pub output_path: PathBuf,
    pub column_name: String,
    pub stats: TranslationStats,
}

/// What a run would do, without calling the translator
#[derive(Debug, Clone, PartialEq)]
pub struct DryRunReport {
    pub rows: usize,
    pub cells_to_translate: usize,
    pub column_name: String,
    pub output_path: PathBuf,
}

//==============================================================================
// ColumnTranslator
//==============================================================================

/// Translates one column of a table through a [`Translator`]
pub struct ColumnTranslator<'a> {
    translator: &'a dyn Translator,
    policy: FailurePolicy,
}

impl<'a> ColumnTranslator<'a> {
    pub fn new(translator: &'a dyn Translator) -> Self {
        Self {
            translator,
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Translate `column` and append the result as a new column.
    ///
    /// The table is only modified once every row has been processed, so an
    /// aborted run leaves it as it was.
    pub fn translate_table(
        &self,
        table: &mut Table,
        column: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> TranslateResult<(String, TranslationStats)> {
        let col_idx = table
            .column_index(column)
            .ok_or_else(|| TranslateError::missing_column(column, &table.sheet, &table.headers))?;
        let column_name = translated_column_name(table, column, target_lang);

        let start = Instant::now();
        let mut stats = TranslationStats {
            rows: table.row_count(),
            ..Default::default()
        };
        let mut values = Vec::with_capacity(table.row_count());

        for (row_idx, row) in table.rows.iter().enumerate() {
            let cell = &row[col_idx];
            let Some(text) = cell.translatable_text() else {
                tracing::debug!(
                    row = row_idx + 1,
                    kind = cell.type_name(),
                    "Nothing to translate, copying cell"
                );
                stats.passed_through += 1;
                values.push(cell.clone());
                continue;
            };

            let request = TranslationRequest::new(text, source_lang, target_lang);
            match self.translator.translate(&request) {
                Ok(translated) => {
                    tracing::info!(
                        row = row_idx + 1,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "Translated '{}' to '{}'",
                        text,
                        translated
                    );
                    stats.translated += 1;
                    values.push(CellValue::Text(translated));
                }
                // Only remote failures are per cell
                Err(e @ TranslateError::Translation(_))
                    if self.policy == FailurePolicy::PassThrough =>
                {
                    tracing::warn!(
                        row = row_idx + 1,
                        error = %e,
                        "Translation failed, keeping original text"
                    );
                    stats.failed += 1;
                    values.push(cell.clone());
                }
                Err(e) => {
                    tracing::error!(row = row_idx + 1, error = %e, "Translation failed, aborting");
                    return Err(e);
                }
            }
        }

        stats.elapsed = start.elapsed();
        table
            .push_column(column_name.clone(), values)
            .map_err(TranslateError::Schema)?;

        tracing::info!(
            column = %column_name,
            translated = stats.translated,
            passed_through = stats.passed_through,
            failed = stats.failed,
            "Translation process took {:.2} seconds",
            stats.elapsed.as_secs_f64()
        );

        Ok((column_name, stats))
    }

    /// Run a whole job: read, translate, write
    pub fn translate_file(&self, job: &TranslationJob) -> TranslateResult<TranslationOutcome> {
        let output_path = job.checked_output_path()?;

        let mut table = ExcelImporter::new(&job.input).import_sheet(&job.sheet)?;
        let (column_name, stats) =
            self.translate_table(&mut table, &job.column, &job.source_lang, &job.target_lang)?;

        ExcelExporter::new(&table).export(&output_path)?;
        tracing::info!(path = %output_path.display(), "Saved translated workbook");

        Ok(TranslationOutcome {
            output_path,
            column_name,
            stats,
        })
    }

    /// Validate a job and count the cells that would be translated
    pub fn plan(job: &TranslationJob) -> TranslateResult<DryRunReport> {
        let output_path = job.checked_output_path()?;
        let table = ExcelImporter::new(&job.input).import_sheet(&job.sheet)?;
        let cells = table.column(&job.column).ok_or_else(|| {
            TranslateError::missing_column(&job.column, &table.sheet, &table.headers)
        })?;

        Ok(DryRunReport {
            rows: table.row_count(),
            cells_to_translate: cells
                .iter()
                .filter(|c| c.translatable_text().is_some())
                .count(),
            column_name: translated_column_name(&table, &job.column, &job.target_lang),
            output_path,
        })
    }
}

/// Translate `source_column` of `sheet` in the workbook at `path` and return
/// the path of the written `<stem>_translated.xlsx`.
pub fn translate_excel_file(
    path: impl AsRef<Path>,
    sheet: &str,
    source_column: &str,
    source_lang: &str,
    target_lang: &str,
    translator: &dyn Translator,
) -> TranslateResult<PathBuf> {
    let job = TranslationJob::new(
        path.as_ref(),
        sheet,
        source_column,
        source_lang,
        target_lang,
    );
    ColumnTranslator::new(translator)
        .translate_file(&job)
        .map(|outcome| outcome.output_path)
}

use crate::config::{BackendSettings, Credentials, JobConfig};
use crate::error::TranslateResult;
use crate::excel::ExcelImporter;
use crate::pipeline::{ColumnTranslator, TranslationOutcome};
use crate::translator::Language;
use colored::Colorize;
use std::path::PathBuf;
use std::time::Duration;

/// Options for the translate command, as collected from flags and env
#[derive(Debug, Clone, Default)]
pub struct TranslateOptions {
    /// Optional YAML job file
    pub config: Option<PathBuf>,
    /// Settings given on the command line; these win over the job file
    pub overrides: JobConfig,
    pub credentials: Credentials,
    pub base_url: Option<String>,
    pub timeout: Duration,
    pub dry_run: bool,
    pub verbose: bool,
}

/// Execute the translate command
pub fn translate(options: TranslateOptions) -> TranslateResult<()> {
    let file_config = match &options.config {
        Some(path) => JobConfig::load(path)?,
        None => JobConfig::default(),
    };
    let config = file_config.merge(options.overrides);
    let backend = config.backend();
    let policy = config.policy();

    let mut settings = BackendSettings::new(backend, options.credentials);
    settings.model = config.model.clone();
    settings.base_url = options.base_url;
    if !options.timeout.is_zero() {
        settings.timeout = options.timeout;
    }

    // Credentials are checked before any file is touched
    if !options.dry_run {
        settings.validate()?;
    }

    let mut job = config.to_job()?;
    job.source_lang = backend.language_for(&job.source_lang)?;
    job.target_lang = backend.language_for(&job.target_lang)?;

    println!("{}", "🌐 xlsx-translate - Translating column".bold().green());
    println!("   File:     {}", job.input.display());
    println!("   Sheet:    {}", job.sheet);
    println!("   Column:   {}", job.column.bright_blue());
    println!("   Language: {} → {}", job.source_lang, job.target_lang);
    println!("   Backend:  {}  (on error: {})", backend, policy);
    println!();

    if options.dry_run {
        println!(
            "{}",
            "📋 DRY RUN MODE - No requests will be sent, nothing will be written\n".yellow()
        );
        let report = ColumnTranslator::plan(&job)?;
        println!("   Rows:               {}", report.rows);
        println!("   Cells to translate: {}", report.cells_to_translate);
        println!("   New column:         {}", report.column_name.bright_blue());
        println!("   Output file:        {}\n", report.output_path.display());
        return Ok(());
    }

    let translator = settings.build_translator()?;

    if options.verbose {
        println!(
            "{}",
            format!("📖 Translating column '{}' using {}...", job.column, backend).cyan()
        );
    }

    let outcome = ColumnTranslator::new(translator.as_ref())
        .with_policy(policy)
        .translate_file(&job)?;

    print_summary(&outcome);
    Ok(())
}

fn print_summary(outcome: &TranslationOutcome) {
    let stats = &outcome.stats;
    println!(
        "Translation process took {:.2} seconds.",
        stats.elapsed.as_secs_f64()
    );
    println!(
        "   {} translated, {} passed through, {} rows ({:.2} cells/sec)",
        stats.translated,
        stats.passed_through,
        stats.rows,
        stats.rate()
    );
    if stats.failed > 0 {
        println!(
            "{}",
            format!(
                "   ⚠️  {} cells failed to translate and kept their original text",
                stats.failed
            )
            .yellow()
        );
    }
    println!(
        "\n{} New file saved to '{}'",
        "✅ Translation complete!".bold().green(),
        outcome.output_path.display()
    );
    println!("   New column: {}\n", outcome.column_name.bright_blue());
}

/// Execute the inspect command: list sheets and their columns
pub fn inspect(file: PathBuf) -> TranslateResult<()> {
    println!("{}", "🔍 xlsx-translate - Workbook".bold().green());
    println!("   File: {}\n", file.display());

    let tables = ExcelImporter::new(&file).import_all()?;
    for table in &tables {
        println!(
            "   📊 Sheet: {}  ({} columns, {} rows)",
            table.sheet.bright_blue(),
            table.column_count(),
            table.row_count()
        );
        for header in &table.headers {
            let text_cells = table
                .column(header)
                .map(|cells| {
                    cells
                        .iter()
                        .filter(|c| c.translatable_text().is_some())
                        .count()
                })
                .unwrap_or(0);
            println!("      - {} ({} text cells)", header, text_cells);
        }
        println!();
    }

    Ok(())
}

/// Execute the languages command
pub fn languages() -> TranslateResult<()> {
    println!("{}", "🌐 Known languages".bold().green());
    println!("   Names work with every backend; codes are required by google and deepl.\n");
    for lang in Language::all() {
        println!("   {:<4} {}", lang.code.bright_blue(), lang.name);
    }
    println!();
    Ok(())
}

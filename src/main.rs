use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use xlsx_translate::cli::{self, TranslateOptions};
use xlsx_translate::config::{Backend, Credentials, FailurePolicy, JobConfig, DEFAULT_TIMEOUT_SECS};

#[derive(Parser)]
#[command(name = "xlsx-translate")]
#[command(about = "Translate a spreadsheet column and save it as a new column.")]
#[command(long_about = "xlsx-translate - translate one column of an Excel sheet

Every non-empty text cell of the column is sent, in row order, to the
selected backend. The answers are written to a new column named
<column>_<target code> in <input>_translated.xlsx; the input file is
never modified.

COMMANDS:
  translate   - Translate a column
  inspect     - List sheets and columns of a workbook
  languages   - Show known language names and codes

EXAMPLES:
  xlsx-translate translate book.xlsx -c en -f English -t Dutch
  xlsx-translate translate book.xlsx -c en -f en -t nl --backend google
  xlsx-translate translate --config job.yaml --on-error pass-through")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Translate a column of an Excel sheet.

CREDENTIALS (read from the environment):
  OPENAI_API_KEY   - required for --backend openai
  DEEPL_API_KEY    - required for --backend deepl (keys ending in :fx use the free API)
  google needs no key.

JOB FILE:
  All settings can live in a YAML file passed with --config:

  input: excel_files/nl_translations.xlsx
  sheet: Sheet1
  column: en
  source_lang: English
  target_lang: Dutch
  backend: openai
  on_error: abort

  Command-line flags override values from the file.

ERRORS:
  --on-error abort         stop at the first failed cell, write nothing (default)
  --on-error pass-through  keep the original text for failed cells")]
    /// Translate a column of an Excel sheet
    Translate(TranslateArgs),

    /// List sheets, columns and row counts of a workbook
    Inspect {
        /// Path to Excel file (.xlsx)
        file: PathBuf,
    },

    /// Show known language names and ISO-639-1 codes
    Languages,
}

#[derive(Args)]
struct TranslateArgs {
    /// Path to Excel file (.xlsx)
    input: Option<PathBuf>,

    /// YAML job file with default settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sheet name (default: Sheet1)
    #[arg(short, long)]
    sheet: Option<String>,

    /// Column holding the source text
    #[arg(short, long)]
    column: Option<String>,

    /// Source language (name or ISO-639-1 code)
    #[arg(short, long = "from")]
    from: Option<String>,

    /// Target language (name or ISO-639-1 code)
    #[arg(short, long = "to")]
    to: Option<String>,

    /// Translation backend
    #[arg(short, long, value_enum)]
    backend: Option<Backend>,

    /// What to do when a cell fails to translate
    #[arg(long, value_enum)]
    on_error: Option<FailurePolicy>,

    /// Output file (default: <input>_translated.xlsx)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Chat model for the openai backend
    #[arg(long, env = "OPENAI_MODEL")]
    model: Option<String>,

    /// Override the backend's API base URL
    #[arg(long, env = "XLSX_TRANSLATE_BASE_URL")]
    base_url: Option<String>,

    /// HTTP timeout per request, in seconds
    #[arg(long, env = "XLSX_TRANSLATE_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, hide = true)]
    openai_api_key: Option<String>,

    #[arg(long, env = "DEEPL_API_KEY", hide_env_values = true, hide = true)]
    deepl_api_key: Option<String>,

    /// Validate and count cells without calling the backend or writing
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl From<TranslateArgs> for TranslateOptions {
    fn from(args: TranslateArgs) -> Self {
        TranslateOptions {
            config: args.config,
            overrides: JobConfig {
                input: args.input,
                sheet: args.sheet,
                column: args.column,
                source_lang: args.from,
                target_lang: args.to,
                backend: args.backend,
                on_error: args.on_error,
                output: args.output,
                model: args.model,
            },
            credentials: Credentials {
                openai_api_key: args.openai_api_key,
                deepl_api_key: args.deepl_api_key,
            },
            base_url: args.base_url,
            timeout: Duration::from_secs(args.timeout),
            dry_run: args.dry_run,
            verbose: args.verbose,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "xlsx_translate=debug"
    } else {
        "xlsx_translate=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: Cli) -> anyhow::Result<()> {
    match args.command {
        Commands::Translate(args) => {
            init_tracing(args.verbose);
            cli::translate(args.into())?
        }
        Commands::Inspect { file } => {
            init_tracing(false);
            cli::inspect(file)?
        }
        Commands::Languages => cli::languages()?,
    }
    Ok(())
}

fn main() {
    if let Err(e) = run(Cli::parse()) {
        eprintln!("{} {}", "Error:".bold().red(), e);
        std::process::exit(1);
    }
}

//! Run configuration: backend selection, credentials and YAML job files
//!
//! Credentials are read once at startup and handed to the backend
//! constructors as plain values. Nothing reads the environment later.

use crate::error::{TranslateError, TranslateResult};
use crate::pipeline::TranslationJob;
use crate::translator::{
    DeeplConfig, DeeplTranslator, GoogleConfig, GoogleTranslator, Language, OpenAiConfig,
    OpenAiTranslator, Translator,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const DEEPL_API_KEY_VAR: &str = "DEEPL_API_KEY";
pub const DEFAULT_SHEET: &str = "Sheet1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Values that were copied from a template and never filled in
const PLACEHOLDER_KEYS: &[&str] = &[
    "your_api_key_here",
    "your-api-key-here",
    "your_api_key",
    "changeme",
    "<your-api-key>",
];

//==============================================================================
// Backend / Policy
//==============================================================================

/// Which translation service handles the cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// LLM chat completion (language names in the prompt)
    #[default]
    Openai,
    /// Google Translate (ISO-639-1 codes)
    Google,
    /// DeepL API (ISO-639-1 codes)
    Deepl,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Backend::Openai => "openai",
            Backend::Google => "google",
            Backend::Deepl => "deepl",
        };
        f.write_str(name)
    }
}

impl Backend {
    /// Normalise a language to what this backend expects: English names
    /// for the LLM, codes for the translation services.
    pub fn language_for(&self, input: &str) -> TranslateResult<String> {
        match self {
            Backend::Openai => Ok(Language::to_name(input)),
            Backend::Google | Backend::Deepl => Language::to_code(input).ok_or_else(|| {
                TranslateError::Config(format!(
                    "unknown language '{}' for the {} backend (run `xlsx-translate languages`)",
                    input, self
                ))
            }),
        }
    }
}

/// What to do when the translator fails for a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Stop at the first failure and write nothing
    #[default]
    Abort,
    /// Keep the original text for the failed cell and carry on
    PassThrough,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Abort => f.write_str("abort"),
            FailurePolicy::PassThrough => f.write_str("pass-through"),
        }
    }
}

//==============================================================================
// Credentials
//==============================================================================

/// API credentials, captured once at startup
#[derive(Clone, Default)]
pub struct Credentials {
    pub openai_api_key: Option<String>,
    pub deepl_api_key: Option<String>,
}

// Keys never end up in logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "***"))
            .field("deepl_api_key", &self.deepl_api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Validate a credential: present, non-blank and not a template placeholder
pub fn require_key(var: &str, value: Option<&str>) -> TranslateResult<String> {
    let value = value.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return Err(TranslateError::Config(format!(
            "Please set {} in the environment",
            var
        )));
    }
    if PLACEHOLDER_KEYS
        .iter()
        .any(|p| p.eq_ignore_ascii_case(value))
    {
        return Err(TranslateError::Config(format!(
            "{} still holds the placeholder value '{}'",
            var, value
        )));
    }
    Ok(value.to_string())
}

//==============================================================================
// Backend settings → translator
//==============================================================================

/// Everything needed to construct a backend adapter
#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub backend: Backend,
    pub credentials: Credentials,
    pub model: Option<String>,
    /// API base URL override (proxies, OpenAI-compatible servers)
    pub base_url: Option<String>,
    pub timeout: Duration,
}

impl BackendSettings {
    pub fn new(backend: Backend, credentials: Credentials) -> Self {
        Self {
            backend,
            credentials,
            model: None,
            base_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Check credentials without building anything
    pub fn validate(&self) -> TranslateResult<()> {
        match self.backend {
            Backend::Openai => {
                require_key(OPENAI_API_KEY_VAR, self.credentials.openai_api_key.as_deref())?;
            }
            Backend::Deepl => {
                require_key(DEEPL_API_KEY_VAR, self.credentials.deepl_api_key.as_deref())?;
            }
            Backend::Google => {}
        }
        Ok(())
    }

    /// Build the adapter for the selected backend
    pub fn build_translator(&self) -> TranslateResult<Box<dyn Translator>> {
        let translator: Box<dyn Translator> = match self.backend {
            Backend::Openai => {
                let key = require_key(
                    OPENAI_API_KEY_VAR,
                    self.credentials.openai_api_key.as_deref(),
                )?;
                let mut config = OpenAiConfig::new(key).with_timeout(self.timeout);
                if let Some(model) = &self.model {
                    config = config.with_model(model.clone());
                }
                if let Some(base_url) = &self.base_url {
                    config = config.with_base_url(base_url.clone());
                }
                Box::new(OpenAiTranslator::new(config)?)
            }
            Backend::Google => {
                let mut config = GoogleConfig::default().with_timeout(self.timeout);
                if let Some(base_url) = &self.base_url {
                    config = config.with_base_url(base_url.clone());
                }
                Box::new(GoogleTranslator::new(config)?)
            }
            Backend::Deepl => {
                let key =
                    require_key(DEEPL_API_KEY_VAR, self.credentials.deepl_api_key.as_deref())?;
                let mut config = DeeplConfig::new(key).with_timeout(self.timeout);
                if let Some(base_url) = &self.base_url {
                    config = config.with_base_url(base_url.clone());
                }
                Box::new(DeeplTranslator::new(config)?)
            }
        };
        tracing::debug!(backend = %self.backend, "Translator ready");
        Ok(translator)
    }
}

//==============================================================================
// Job files
//==============================================================================

/// A translation job as written in a YAML file. Every field is optional so
/// command-line flags can fill the gaps.
///
/// ```yaml
/// input: excel_files/nl_translations.xlsx
/// sheet: Sheet1
/// column: en
/// source_lang: English
/// target_lang: Dutch
/// backend: openai
/// on_error: abort
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JobConfig {
    pub input: Option<PathBuf>,
    pub sheet: Option<String>,
    pub column: Option<String>,
    pub source_lang: Option<String>,
    pub target_lang: Option<String>,
    pub backend: Option<Backend>,
    pub on_error: Option<FailurePolicy>,
    pub output: Option<PathBuf>,
    pub model: Option<String>,
}

impl JobConfig {
    /// Load a job file
    pub fn load(path: &Path) -> TranslateResult<Self> {
        if !path.exists() {
            return Err(TranslateError::NotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Fields set in `overrides` win
    pub fn merge(self, overrides: JobConfig) -> JobConfig {
        JobConfig {
            input: overrides.input.or(self.input),
            sheet: overrides.sheet.or(self.sheet),
            column: overrides.column.or(self.column),
            source_lang: overrides.source_lang.or(self.source_lang),
            target_lang: overrides.target_lang.or(self.target_lang),
            backend: overrides.backend.or(self.backend),
            on_error: overrides.on_error.or(self.on_error),
            output: overrides.output.or(self.output),
            model: overrides.model.or(self.model),
        }
    }

    pub fn backend(&self) -> Backend {
        self.backend.unwrap_or_default()
    }

    pub fn policy(&self) -> FailurePolicy {
        self.on_error.unwrap_or_default()
    }

    /// Turn the merged configuration into a job, failing on missing fields
    pub fn to_job(&self) -> TranslateResult<TranslationJob> {
        fn required<T: Clone>(value: &Option<T>, name: &str) -> TranslateResult<T> {
            value.clone().ok_or_else(|| {
                TranslateError::Config(format!("missing required setting '{}'", name))
            })
        }

        Ok(TranslationJob {
            input: required(&self.input, "input")?,
            sheet: self
                .sheet
                .clone()
                .unwrap_or_else(|| DEFAULT_SHEET.to_string()),
            column: required(&self.column, "column")?,
            source_lang: required(&self.source_lang, "source_lang")?,
            target_lang: required(&self.target_lang, "target_lang")?,
            output: self.output.clone(),
        })
    }
}

//! Generic machine translation through the public Google Translate endpoint

use super::{api_error, http_client, transport_error, Language, Translator};
use crate::error::{TranslateError, TranslateResult};
use crate::types::TranslationRequest;
use std::time::Duration;

const GOOGLE_API_BASE: &str = "https://translate.googleapis.com";
/// Source language that asks the service to detect it
const AUTO_DETECT: &str = "auto";

#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            base_url: GOOGLE_API_BASE.to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

impl GoogleConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Translator keyed by ISO-639-1 codes; needs no credentials
pub struct GoogleTranslator {
    http: reqwest::blocking::Client,
    config: GoogleConfig,
}

impl GoogleTranslator {
    pub fn new(config: GoogleConfig) -> TranslateResult<Self> {
        let http = http_client(config.timeout)?;
        Ok(Self { http, config })
    }

    fn language_code(input: &str) -> TranslateResult<String> {
        Language::to_code(input)
            .ok_or_else(|| TranslateError::Config(format!("unknown language '{}'", input)))
    }

    /// The reply is a nested array; `[0]` lists the sentence segments and
    /// each segment's first element is its translation.
    fn parse_response(body: &serde_json::Value) -> TranslateResult<String> {
        let segments = body[0].as_array().ok_or_else(|| {
            TranslateError::Translation("Google response has no translation segments".into())
        })?;

        Ok(segments
            .iter()
            .filter_map(|segment| segment[0].as_str())
            .collect::<String>())
    }
}

impl Translator for GoogleTranslator {
    fn translate(&self, request: &TranslationRequest) -> TranslateResult<String> {
        let source = if request.source_lang.trim().eq_ignore_ascii_case(AUTO_DETECT) {
            AUTO_DETECT.to_string()
        } else {
            Self::language_code(&request.source_lang)?
        };
        let target = Self::language_code(&request.target_lang)?;

        let url = format!(
            "{}/translate_a/single",
            self.config.base_url.trim_end_matches('/')
        );
        let response = self
            .http
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", source.as_str()),
                ("tl", target.as_str()),
                ("dt", "t"),
                ("q", request.text.as_str()),
            ])
            .send()
            .map_err(|e| transport_error("Google Translate", e))?;

        if !response.status().is_success() {
            return Err(api_error("Google Translate", response));
        }

        let body: serde_json::Value = response.json().map_err(|e| {
            TranslateError::Translation(format!("Google Translate response invalid: {}", e))
        })?;

        Self::parse_response(&body)
    }
}

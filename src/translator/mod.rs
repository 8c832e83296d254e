//! Translation capability and backend adapters
//!
//! The pipeline only knows about the one-method [`Translator`] trait.
//! Each backend lives in its own module:
//! - [`OpenAiTranslator`]: LLM chat completion with a translation prompt
//! - [`GoogleTranslator`]: generic translation service keyed by ISO-639-1 codes
//! - [`DeeplTranslator`]: DeepL REST API

mod deepl;
mod google;
mod language;
mod openai;

pub use deepl::{DeeplConfig, DeeplTranslator};
pub use google::{GoogleConfig, GoogleTranslator};
pub use language::Language;
pub use openai::{OpenAiConfig, OpenAiTranslator};

use crate::error::{TranslateError, TranslateResult};
use crate::types::TranslationRequest;
use std::time::Duration;

const USER_AGENT: &str = concat!("xlsx-translate/", env!("CARGO_PKG_VERSION"));

/// Translates a single piece of text
pub trait Translator {
    fn translate(&self, request: &TranslationRequest) -> TranslateResult<String>;
}

impl<F> Translator for F
where
    F: Fn(&TranslationRequest) -> TranslateResult<String>,
{
    fn translate(&self, request: &TranslationRequest) -> TranslateResult<String> {
        self(request)
    }
}

/// Strip one layer of surrounding quote characters (`"` or `'`).
///
/// A lone quote character counts as both the opening and the closing one.
pub fn strip_surrounding_quotes(text: &str) -> &str {
    let is_quote = |c: char| c == '"' || c == '\'';
    let mut chars = text.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) if is_quote(first) && is_quote(last) => {
            &text[first.len_utf8()..text.len() - last.len_utf8()]
        }
        (Some(only), None) if is_quote(only) => "",
        _ => text,
    }
}

pub(crate) fn http_client(timeout: Duration) -> TranslateResult<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| TranslateError::Config(format!("failed to build HTTP client: {}", e)))
}

/// Turn a non-success response into a [`TranslateError::Translation`]
pub(crate) fn api_error(service: &str, response: reqwest::blocking::Response) -> TranslateError {
    let status = response.status().as_u16();
    let body: serde_json::Value = response.json().unwrap_or(serde_json::Value::Null);
    let message = body["error"]["message"]
        .as_str()
        .or_else(|| body["message"].as_str())
        .or_else(|| body["error"].as_str())
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status));
    TranslateError::Translation(format!("{} returned {}: {}", service, status, message))
}

pub(crate) fn transport_error(service: &str, err: reqwest::Error) -> TranslateError {
    TranslateError::Translation(format!("{} request failed: {}", service, err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_surrounding_quotes() {
        assert_eq!(strip_surrounding_quotes("'Hallo'"), "Hallo");
        assert_eq!(strip_surrounding_quotes("\"Hallo\""), "Hallo");
        assert_eq!(strip_surrounding_quotes("\"'Hallo'\""), "'Hallo'");
        assert_eq!(strip_surrounding_quotes("Hallo"), "Hallo");
        assert_eq!(strip_surrounding_quotes("'Hallo"), "'Hallo");
        assert_eq!(strip_surrounding_quotes("\"\""), "");
        assert_eq!(strip_surrounding_quotes("'"), "");
        assert_eq!(strip_surrounding_quotes("\""), "");
        assert_eq!(strip_surrounding_quotes(""), "");
    }

    #[test]
    fn test_closure_is_translator() {
        let upper = |req: &TranslationRequest| -> TranslateResult<String> {
            Ok(req.text.to_uppercase())
        };
        let req = TranslationRequest::new("hi", "en", "nl");
        assert_eq!(upper.translate(&req).unwrap(), "HI");
    }

    #[test]
    fn test_boxed_translator_object() {
        let boxed: Box<dyn Translator> =
            Box::new(|req: &TranslationRequest| -> TranslateResult<String> {
                Ok(format!("{}!", req.text))
            });
        let req = TranslationRequest::new("hi", "en", "nl");
        assert_eq!(boxed.translate(&req).unwrap(), "hi!");
    }
}

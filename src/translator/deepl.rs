//! DeepL REST API translator

use super::{api_error, http_client, transport_error, Language, Translator};
use crate::error::{TranslateError, TranslateResult};
use crate::types::TranslationRequest;
use serde::Deserialize;
use std::time::Duration;

const DEEPL_API_BASE: &str = "https://api.deepl.com";
const DEEPL_FREE_API_BASE: &str = "https://api-free.deepl.com";

#[derive(Debug, Clone)]
pub struct DeeplConfig {
    pub auth_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl DeeplConfig {
    /// Free-plan keys end in `:fx` and are served from a separate host
    pub fn new(auth_key: impl Into<String>) -> Self {
        let auth_key = auth_key.into();
        let base_url = if auth_key.ends_with(":fx") {
            DEEPL_FREE_API_BASE
        } else {
            DEEPL_API_BASE
        };
        Self {
            auth_key,
            base_url: base_url.to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Deserialize)]
struct DeeplResponse {
    translations: Vec<DeeplTranslation>,
}

#[derive(Debug, Deserialize)]
struct DeeplTranslation {
    text: String,
}

pub struct DeeplTranslator {
    http: reqwest::blocking::Client,
    config: DeeplConfig,
}

impl DeeplTranslator {
    pub fn new(config: DeeplConfig) -> TranslateResult<Self> {
        let http = http_client(config.timeout)?;
        Ok(Self { http, config })
    }

    fn language_code(input: &str) -> TranslateResult<String> {
        Language::to_code(input)
            .map(|code| code.to_ascii_uppercase())
            .ok_or_else(|| TranslateError::Config(format!("unknown language '{}'", input)))
    }
}

impl Translator for DeeplTranslator {
    fn translate(&self, request: &TranslationRequest) -> TranslateResult<String> {
        let source = Self::language_code(&request.source_lang)?;
        let target = Self::language_code(&request.target_lang)?;

        let url = format!("{}/v2/translate", self.config.base_url.trim_end_matches('/'));
        let response = self
            .http
            .post(&url)
            .header(
                "Authorization",
                format!("DeepL-Auth-Key {}", self.config.auth_key),
            )
            .form(&[
                ("text", request.text.as_str()),
                ("source_lang", source.as_str()),
                ("target_lang", target.as_str()),
            ])
            .send()
            .map_err(|e| transport_error("DeepL", e))?;

        if !response.status().is_success() {
            return Err(api_error("DeepL", response));
        }

        let parsed: DeeplResponse = response
            .json()
            .map_err(|e| TranslateError::Translation(format!("DeepL response invalid: {}", e)))?;

        parsed
            .translations
            .into_iter()
            .next()
            .map(|t| t.text)
            .ok_or_else(|| TranslateError::Translation("DeepL response has no translations".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn test_free_key_selects_free_host() {
        assert_eq!(DeeplConfig::new("abc:fx").base_url, DEEPL_FREE_API_BASE);
        assert_eq!(DeeplConfig::new("abc").base_url, DEEPL_API_BASE);
    }

    #[test]
    fn test_language_code_is_uppercased() {
        assert_eq!(DeeplTranslator::language_code("Dutch").unwrap(), "NL");
        assert_eq!(DeeplTranslator::language_code("pt-br").unwrap(), "PT-BR");
        assert!(DeeplTranslator::language_code("Elvish Sindarin").is_err());
    }

    #[test]
    fn test_translate() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v2/translate")
                .header("authorization", "DeepL-Auth-Key key:fx");
            then.status(200).json_body(serde_json::json!({
                "translations": [{ "detected_source_language": "EN", "text": "Goedemorgen" }]
            }));
        });

        let translator =
            DeeplTranslator::new(DeeplConfig::new("key:fx").with_base_url(server.base_url()))
                .unwrap();
        let out = translator
            .translate(&TranslationRequest::new("Good morning", "en", "nl"))
            .unwrap();
        mock.assert();
        assert_eq!(out, "Goedemorgen");
    }

    #[test]
    fn test_quota_exceeded() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v2/translate");
            then.status(456)
                .json_body(serde_json::json!({ "message": "Quota exceeded" }));
        });

        let translator =
            DeeplTranslator::new(DeeplConfig::new("key").with_base_url(server.base_url()))
                .unwrap();
        let err = translator
            .translate(&TranslationRequest::new("Hello", "en", "de"))
            .unwrap_err();
        assert!(matches!(err, TranslateError::Translation(msg) if msg.contains("Quota exceeded")));
    }
}

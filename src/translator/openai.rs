//! LLM translation through the OpenAI chat completions API

use super::{
    api_error, http_client, strip_surrounding_quotes, transport_error, Language, Translator,
};
use crate::error::{TranslateError, TranslateResult};
use crate::types::TranslationRequest;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const OPENAI_API_BASE: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const SYSTEM_PROMPT: &str = "You are a professional translator.";
const TEMPERATURE: f32 = 0.1;

/// Settings for [`OpenAiTranslator`]
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: OPENAI_API_BASE.to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
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

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: usize,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Prompt-based translator backed by a chat completion model
pub struct OpenAiTranslator {
    http: reqwest::blocking::Client,
    config: OpenAiConfig,
}

impl OpenAiTranslator {
    pub fn new(config: OpenAiConfig) -> TranslateResult<Self> {
        let http = http_client(config.timeout)?;
        Ok(Self { http, config })
    }

    /// User prompt for one cell
    pub fn build_prompt(request: &TranslationRequest) -> String {
        format!(
            "Translate the following text from {} to {}. Only return the translated text, \
             without any additional comments or explanations: '{}'",
            Language::to_name(&request.source_lang),
            Language::to_name(&request.target_lang),
            request.text
        )
    }

    /// Output cap proportional to the input length
    fn max_tokens(text: &str) -> usize {
        (text.chars().count() * 2).max(1)
    }
}

impl Translator for OpenAiTranslator {
    fn translate(&self, request: &TranslationRequest) -> TranslateResult<String> {
        let prompt = Self::build_prompt(request);
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: Self::max_tokens(&request.text),
        };

        let url = format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .map_err(|e| transport_error("OpenAI", e))?;

        if !response.status().is_success() {
            return Err(api_error("OpenAI", response));
        }

        let parsed: ChatResponse = response.json().map_err(|e| {
            TranslateError::Translation(format!("OpenAI response invalid: {}", e))
        })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| TranslateError::Translation("OpenAI response has no choices".into()))?
            .message
            .content;

        match content {
            Some(content) => Ok(strip_surrounding_quotes(content.trim()).to_string()),
            None => {
                tracing::warn!(
                    text = %request.text,
                    "OpenAI response content is empty, keeping original text"
                );
                Ok(request.text.clone())
            }
        }
    }
}

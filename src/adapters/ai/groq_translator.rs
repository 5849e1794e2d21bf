//! Groq translator - live implementation of the Translator port.
//!
//! Talks to Groq's OpenAI-compatible chat completions endpoint with a
//! single-turn instruction prompt. Language codes are resolved to full
//! names for the prompt; unknown codes fall back to the default pair
//! instead of rejecting the request. The prompt asks for translation-only
//! output and for uninterpretable input to be echoed back unchanged, which
//! pushes input validation onto the provider as a pragmatic tradeoff.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::{language_name, DEFAULT_SOURCE_LANGUAGE, DEFAULT_TARGET_LANGUAGE};
use crate::ports::{TranslationError, Translator};

/// Configuration for the Groq translator.
#[derive(Debug, Clone)]
pub struct GroqConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use.
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum tokens in the completion.
    pub max_tokens: u32,
    /// Sampling temperature. Low, since translation wants fidelity.
    pub temperature: f32,
}

impl GroqConfig {
    /// Creates a configuration with the given API key and defaults.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "llama3-8b-8192".to_string(),
            base_url: "https://api.groq.com/openai/v1".to_string(),
            timeout: Duration::from_secs(30),
            max_tokens: 1024,
            temperature: 0.3,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Translator backed by Groq's chat completions API.
pub struct GroqTranslator {
    config: GroqConfig,
    client: Client,
}

impl GroqTranslator {
    /// Creates a translator with the given configuration.
    pub fn new(config: GroqConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    /// Builds the single-turn instruction prompt.
    fn build_prompt(text: &str, source: &str, target: &str) -> String {
        let source_name = language_name(source).unwrap_or(DEFAULT_SOURCE_LANGUAGE);
        let target_name = language_name(target).unwrap_or(DEFAULT_TARGET_LANGUAGE);

        format!(
            "Translate the following text from {} to {}. \
             Only provide the translation, nothing else. \
             If the text cannot be interpreted, return the given text back, nothing else.:\n\n\"{}\"",
            source_name, target_name, text
        )
    }

    async fn send_request(&self, prompt: String) -> Result<Response, TranslationError> {
        let request = GroqRequest {
            messages: vec![GroqMessage {
                role: "user".to_string(),
                content: prompt,
            }],
            model: self.config.model.clone(),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            top_p: 1.0,
            stream: false,
        };

        self.client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TranslationError::Network(format!(
                        "timed out after {}s",
                        self.config.timeout.as_secs()
                    ))
                } else if e.is_connect() {
                    TranslationError::Network(format!("connection failed: {}", e))
                } else {
                    TranslationError::Network(e.to_string())
                }
            })
    }

    async fn handle_response_status(response: Response) -> Result<Response, TranslationError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 | 403 => Err(TranslationError::AuthenticationFailed),
            500..=599 => Err(TranslationError::Unavailable(format!(
                "server error {}: {}",
                status, error_body
            ))),
            _ => Err(TranslationError::Unavailable(format!(
                "unexpected status {}: {}",
                status, error_body
            ))),
        }
    }
}

#[async_trait]
impl Translator for GroqTranslator {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, TranslationError> {
        let prompt = Self::build_prompt(text, source, target);
        let response = self.send_request(prompt).await?;
        let response = Self::handle_response_status(response).await?;

        let body: GroqResponse = response
            .json()
            .await
            .map_err(|e| TranslationError::Parse(e.to_string()))?;

        let translated = body
            .choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_else(|| TranslationError::Parse("response contained no choices".to_string()))?;

        tracing::debug!(%source, %target, "translation completed");
        Ok(translated)
    }
}

#[derive(Debug, Serialize)]
struct GroqRequest {
    messages: Vec<GroqMessage>,
    model: String,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct GroqMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct GroqResponse {
    choices: Vec<GroqChoice>,
}

#[derive(Debug, Deserialize)]
struct GroqChoice {
    message: GroqChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct GroqChoiceMessage {
    content: String,
}

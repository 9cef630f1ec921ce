use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::TranslateConfig;
use crate::error::{Result, SubtransError};
use crate::language::LanguageRegistry;
use super::Translator;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub response: String,
    pub done: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationResult {
    pub text: String,
}

/// Translator backed by an Ollama `/api/generate` endpoint
pub struct OllamaTranslator {
    client: Client,
    config: TranslateConfig,
    languages: LanguageRegistry,
}

impl OllamaTranslator {
    pub fn new(config: TranslateConfig, languages: LanguageRegistry) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            languages,
        })
    }

    /// Check that Ollama answers and the configured model is pulled
    pub async fn check_availability(&self) -> Result<()> {
        let url = format!("{}/api/show", self.config.endpoint);

        let response = self.client
            .post(&url)
            .json(&json!({ "name": self.config.model }))
            .send()
            .await
            .map_err(|e| SubtransError::Translation(format!("Failed to connect to Ollama: {}", e)))?;

        if response.status().is_success() {
            info!("Ollama model '{}' is available", self.config.model);
            Ok(())
        } else {
            Err(SubtransError::Translation(format!(
                "Ollama model '{}' not found. Please pull the model first: ollama pull {}",
                self.config.model, self.config.model
            )))
        }
    }

    fn language_name<'a>(&'a self, code: &'a str) -> &'a str {
        self.languages.name(code).unwrap_or(code)
    }

    fn build_prompt(&self, text: &str, source_language: &str, target_language: &str) -> String {
        let source_name = self.language_name(source_language);
        let target_name = self.language_name(target_language);

        format!(
            "You are a professional subtitle translator.\n\
             \n\
             Translate the subtitle line below from {} to {} ONLY.\n\
             The target language is: {} (language code: {})\n\
             Keep line breaks. Do not add explanations, alternatives, or notes.\n\
             \n\
             Return ONLY the translation in JSON format as {{\"text\":\"your {} translation here\"}}.\n\
             \n\
             [Text to translate]\n\
             {}\n",
            source_name, target_name, target_name, target_language, target_name, text
        )
    }

    /// Fallback when the model ignored the JSON format: first line that looks like a translation
    fn clean_response(response: &str) -> String {
        let candidate = response
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .find(|line| {
                !(line.starts_with("Here is")
                    || line.starts_with("Here's")
                    || line.starts_with("Translation:")
                    || (line.starts_with("**") && line.ends_with("**")))
            });

        candidate.unwrap_or(response.trim()).to_string()
    }

    fn parse_response(raw_response: &str) -> Result<String> {
        let raw_response = raw_response.trim();
        if raw_response.is_empty() {
            return Err(SubtransError::Translation("Empty translation received".to_string()));
        }

        if let Ok(result) = serde_json::from_str::<TranslationResult>(raw_response) {
            let text = result.text.trim();
            if text.is_empty() {
                return Err(SubtransError::Translation("Empty translation received".to_string()));
            }
            return Ok(text.to_string());
        }

        Ok(Self::clean_response(raw_response))
    }
}

#[async_trait]
impl Translator for OllamaTranslator {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String> {
        let request = GenerateRequest {
            model: self.config.model.clone(),
            prompt: self.build_prompt(text, source_language, target_language),
            stream: false,
            format: "json".to_string(),
        };

        let url = format!("{}/api/generate", self.config.endpoint);
        debug!("Sending translation request to: {}", url);

        let response = self.client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SubtransError::Translation(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SubtransError::Translation(format!(
                "Ollama API error {}: {}", status, error_text
            )));
        }

        let generated: GenerateResponse = response.json().await
            .map_err(|e| SubtransError::Translation(format!("Failed to parse response: {}", e)))?;

        debug!("Raw Ollama response: {}", generated.response);
        Self::parse_response(&generated.response)
    }
}

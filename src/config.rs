use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::error::{Result, SubtransError};

/// Concurrent translations per batch. Batch N+1 starts only after batch N fully joins.
pub const DEFAULT_BATCH_SIZE: usize = 10;

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_request_timeout_secs() -> u64 {
    300
}

fn default_show_progress() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub translate: TranslateConfig,
    pub transcriber: TranscriberConfig,
    pub media: MediaConfig,
    /// Render per-file translation progress on the console
    #[serde(default = "default_show_progress")]
    pub show_progress: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateConfig {
    /// Ollama endpoint URL
    pub endpoint: String,
    /// LLM model to use for translation
    pub model: String,
    /// Maximum number of cues translated concurrently
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Upper bound for a single translation request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriberConfig {
    /// Path to transcriber binary (e.g., whisper)
    pub binary_path: String,
    /// Model to load for transcription
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Path to ffmpeg binary
    pub binary_path: String,
    /// Extension of the extracted audio file; ffmpeg picks the codec from it
    pub audio_extension: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            translate: TranslateConfig {
                endpoint: "http://localhost:11434".to_string(),
                model: "llama3.2:3b".to_string(),
                batch_size: DEFAULT_BATCH_SIZE,
                request_timeout_secs: default_request_timeout_secs(),
            },
            transcriber: TranscriberConfig {
                binary_path: "whisper".to_string(),
                model: "small".to_string(),
            },
            media: MediaConfig {
                binary_path: "ffmpeg".to_string(),
                audio_extension: "aac".to_string(),
            },
            show_progress: true,
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SubtransError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| SubtransError::Config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SubtransError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| SubtransError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.translate.batch_size == 0 {
            return Err(SubtransError::Config("translate.batch_size must be at least 1".to_string()));
        }
        if self.media.audio_extension.trim().is_empty() {
            return Err(SubtransError::Config("media.audio_extension must not be empty".to_string()));
        }
        Ok(())
    }
}

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::TranscriberConfig;
use crate::error::{Result, SubtransError};
use super::{Segment, Transcriber};

/// JSON document written by `whisper --output_format json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperOutput {
    #[serde(default)]
    pub text: String,
    pub segments: Vec<WhisperSegment>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl WhisperOutput {
    pub fn into_segments(self) -> Vec<Segment> {
        self
            .segments
            .into_iter()
            .map(|seg| Segment {
                start: seg.start,
                end: seg.end,
                text: seg.text.trim().to_string(),
            })
            .collect()
    }
}

/// Runs the whisper CLI with an explicitly chosen model.
///
/// The model is owned by this value and handed in by whoever builds the
/// workflow; nothing is loaded globally.
pub struct WhisperTranscriber {
    config: TranscriberConfig,
}

impl WhisperTranscriber {
    pub fn new(config: TranscriberConfig) -> Self {
        Self { config }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn parse_output(json_content: &str) -> Result<Vec<Segment>> {
        let output: WhisperOutput = serde_json::from_str(json_content)
            .map_err(|e| SubtransError::Transcription(format!("Failed to parse whisper JSON: {}", e)))?;
        Ok(output.into_segments())
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, audio_path: &Path, language: &str) -> Result<Vec<Segment>> {
        info!(
            "Transcribing {} with whisper model '{}'",
            audio_path.display(),
            self.config.model
        );

        let temp_dir = tempfile::tempdir()
            .map_err(|e| SubtransError::Transcription(format!("Failed to create temp directory: {}", e)))?;
        let output_dir = temp_dir.path();

        let mut cmd = Command::new(&self.config.binary_path);
        cmd.arg(audio_path)
            .arg("--model").arg(&self.config.model)
            .arg("--language").arg(language)
            .arg("--output_dir").arg(output_dir)
            .arg("--output_format").arg("json");

        debug!("Executing whisper command: {:?}", cmd);

        let output = cmd.output().await
            .map_err(|e| SubtransError::Transcription(format!("Failed to execute whisper: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SubtransError::Transcription(format!("Whisper failed: {}", stderr)));
        }

        let audio_stem = audio_path.file_stem()
            .ok_or_else(|| SubtransError::Transcription("Invalid audio filename".to_string()))?;
        let json_file = output_dir.join(format!("{}.json", audio_stem.to_string_lossy()));

        let json_content = tokio::fs::read_to_string(&json_file).await
            .map_err(|e| SubtransError::Transcription(format!("Failed to read output: {}", e)))?;

        let segments = Self::parse_output(&json_content)?;
        info!("Transcription produced {} segments", segments.len());
        Ok(segments)
    }
}

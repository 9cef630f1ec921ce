// Speech-to-text collaborator
//
// - Transcriber: audio file in, ordered timed segments out
// - whisper: Transcriber backed by the whisper command line tool

pub mod whisper;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use whisper::WhisperTranscriber;

use crate::error::Result;

/// One timed piece of recognised speech
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Start offset in seconds
    pub start: f64,
    /// End offset in seconds
    pub end: f64,
    pub text: String,
}

/// External transcription collaborator
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe `audio_path` spoken in `language`, segments in playback order
    async fn transcribe(&self, audio_path: &Path, language: &str) -> Result<Vec<Segment>>;
}

// Media processing collaborator
//
// - commands: ffmpeg command builder
// - processor: MediaProcessor implementation on top of the builder

pub mod commands;
pub mod processor;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub use commands::*;
pub use processor::*;

use crate::config::MediaConfig;
use crate::error::Result;

/// Audio extraction from a media container
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaProcessor: Send + Sync {
    /// Extract the audio track of `video_path` into `audio_path`, overwriting it
    async fn extract_audio(&self, video_path: &Path, audio_path: &Path) -> Result<()>;

    /// Check if the media processor binary can be executed
    async fn check_availability(&self) -> Result<()>;
}

/// Where the audio of `video_path` is extracted to: same directory and base name
pub fn audio_path_for(video_path: &Path, audio_extension: &str) -> PathBuf {
    video_path.with_extension(audio_extension)
}

/// Factory for creating media processor instances
pub struct MediaProcessorFactory;

impl MediaProcessorFactory {
    /// Create the default media processor implementation (FFmpeg-based)
    pub fn create_processor(config: MediaConfig) -> Box<dyn MediaProcessor> {
        Box::new(processor::FfmpegProcessor::new(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_path_keeps_directory_and_stem() {
        assert_eq!(
            audio_path_for(Path::new("/media/shows/ep01.mkv"), "aac"),
            PathBuf::from("/media/shows/ep01.aac")
        );
        assert_eq!(
            audio_path_for(Path::new("clip.final.mp4"), "wav"),
            PathBuf::from("clip.final.wav")
        );
    }
}

use async_trait::async_trait;
use std::path::Path;
use tracing::info;

use crate::config::MediaConfig;
use crate::error::Result;
use super::{MediaProcessor, MediaCommandBuilder};

/// FFmpeg-based media processor
pub struct FfmpegProcessor {
    command_builder: MediaCommandBuilder,
}

impl FfmpegProcessor {
    pub fn new(config: MediaConfig) -> Self {
        Self {
            command_builder: MediaCommandBuilder::new(&config.binary_path),
        }
    }
}

#[async_trait]
impl MediaProcessor for FfmpegProcessor {
    async fn extract_audio(&self, video_path: &Path, audio_path: &Path) -> Result<()> {
        info!("Extracting audio from {} to {}", video_path.display(), audio_path.display());

        self.command_builder
            .extract_audio(video_path, audio_path)
            .execute()
            .await?;

        info!("Audio extraction completed");
        Ok(())
    }

    async fn check_availability(&self) -> Result<()> {
        self.command_builder.version_check().execute().await?;
        info!("Media processor is available");
        Ok(())
    }
}

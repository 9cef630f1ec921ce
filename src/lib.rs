//! Subtrans - batch subtitle translation
//!
//! Parses and writes SRT files, translates their cues in bounded concurrent
//! batches, walks directory trees of subtitle files, and produces subtitles
//! from media files through whisper.

pub mod cli;
pub mod config;
pub mod error;
pub mod language;
pub mod media;
pub mod subtitle;
pub mod transcribe;
pub mod translate;
pub mod walker;
pub mod workflow;

use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::Config;
use crate::error::{Result, SubtransError};
use crate::language::LanguageRegistry;
use crate::media::{audio_path_for, MediaProcessor, MediaProcessorFactory};
use crate::subtitle::{write_srt, Cue};
use crate::transcribe::{Transcriber, WhisperTranscriber};
use crate::translate::{
    BatchReport, BatchScheduler, ConsoleProgress, NoProgress, OllamaTranslator, ProgressReporter,
    TranslationMode, TranslationTask, Translator,
};
use crate::walker::{output_file_name, WalkOptions, WalkSummary, TreeWalker, SUBTITLE_EXTENSION};

/// Result of the transcribe-then-translate entry point
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscribeOutcome {
    Written { path: PathBuf, report: BatchReport },
    Skipped(PathBuf),
}

/// `<dir>/<stem>_<suffix>.srt` next to the media file
pub fn subtitle_path_for(
    media_path: &Path,
    source_language: &str,
    target_language: Option<&str>,
    bilingual: bool,
) -> PathBuf {
    let stem = media_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let file_name = match target_language {
        Some(target) => output_file_name(&stem, source_language, target, bilingual),
        None => format!("{}_{}.{}", stem, source_language, SUBTITLE_EXTENSION),
    };

    media_path.with_file_name(file_name)
}

/// Pipeline entry points composing codec, scheduler, walker and the external
/// collaborators. The collaborators live exactly as long as the workflow.
pub struct Workflow {
    config: Config,
    languages: LanguageRegistry,
    scheduler: BatchScheduler,
    translator: Box<dyn Translator>,
    media: Box<dyn MediaProcessor>,
    transcriber: Box<dyn Transcriber>,
}

impl Workflow {
    pub fn new(config: Config) -> Result<Self> {
        let languages = LanguageRegistry::default();
        let translator = OllamaTranslator::new(config.translate.clone(), languages.clone())?;
        let media = MediaProcessorFactory::create_processor(config.media.clone());
        let transcriber = WhisperTranscriber::new(config.transcriber.clone());

        Ok(Self::with_collaborators(
            config,
            languages,
            Box::new(translator),
            media,
            Box::new(transcriber),
        ))
    }

    pub fn with_collaborators(
        config: Config,
        languages: LanguageRegistry,
        translator: Box<dyn Translator>,
        media: Box<dyn MediaProcessor>,
        transcriber: Box<dyn Transcriber>,
    ) -> Self {
        let scheduler = BatchScheduler::new(config.translate.batch_size);
        Self {
            config,
            languages,
            scheduler,
            translator,
            media,
            transcriber,
        }
    }

    pub fn languages(&self) -> &LanguageRegistry {
        &self.languages
    }

    /// Translate an existing subtitle file, or every subtitle file in a directory
    pub async fn translate_existing(&self, path: &Path, options: WalkOptions) -> Result<WalkSummary> {
        self.languages
            .ensure_all_supported(&[options.source_language.as_str(), options.target_language.as_str()])?;

        let is_subtitle_file = path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext == SUBTITLE_EXTENSION);

        let walker = TreeWalker::new(self.translator.as_ref(), &self.scheduler, &self.languages, options)
            .with_progress(self.config.show_progress);

        let summary = if is_subtitle_file {
            walker.translate_single(path).await
        } else if path.is_dir() {
            walker.translate_directory(path, 0).await
        } else {
            return Err(SubtransError::InvalidPath(path.display().to_string()));
        };

        info!(
            "Translated {} file(s), skipped {}, failed {} ({} cue translation failure(s))",
            summary.translated, summary.skipped, summary.failed, summary.failed_cues
        );
        Ok(summary)
    }

    /// Extract audio from a media file, transcribe it and optionally translate
    /// the result. Never overwrites an existing subtitle file.
    pub async fn transcribe_and_translate(
        &self,
        media_path: &Path,
        source_language: &str,
        target_language: Option<&str>,
        bilingual: bool,
    ) -> Result<TranscribeOutcome> {
        if !media_path.is_file() {
            return Err(SubtransError::FileNotFound(media_path.display().to_string()));
        }

        let target_language = target_language.filter(|code| !code.is_empty());
        if bilingual && target_language.is_none() {
            return Err(SubtransError::MissingDestinationLanguage);
        }

        let mut codes = vec![source_language];
        codes.extend(target_language);
        self.languages.ensure_all_supported(&codes)?;

        let subtitle_path = subtitle_path_for(media_path, source_language, target_language, bilingual);
        if subtitle_path.exists() {
            info!("'{}' file is already exist.", subtitle_path.display());
            return Ok(TranscribeOutcome::Skipped(subtitle_path));
        }

        self.media.check_availability().await?;
        let audio_path = audio_path_for(media_path, &self.config.media.audio_extension);
        self.media.extract_audio(media_path, &audio_path).await?;

        let segments = self.transcriber.transcribe(&audio_path, source_language).await?;
        let mut cues: Vec<Cue> = segments.iter().map(Cue::from).collect();

        let task = TranslationTask::new(
            source_language,
            target_language.unwrap_or(source_language),
            TranslationMode::for_output(target_language.is_some(), bilingual),
        );

        let progress: Box<dyn ProgressReporter> = if self.config.show_progress && task.mode != TranslationMode::None {
            Box::new(ConsoleProgress::new(cues.len()))
        } else {
            Box::new(NoProgress)
        };
        let report = self
            .scheduler
            .translate_cues(self.translator.as_ref(), &mut cues, &task, 0, progress.as_ref())
            .await;
        progress.finish();

        write_srt(&cues, &subtitle_path).await?;
        info!("Wrote {} cues to {}", cues.len(), subtitle_path.display());

        Ok(TranscribeOutcome::Written {
            path: subtitle_path,
            report,
        })
    }
}

use futures::future::{BoxFuture, FutureExt};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::error::Result;
use crate::language::LanguageRegistry;
use crate::subtitle::{read_srt, write_srt};
use crate::translate::progress::indent;
use crate::translate::{
    BatchReport, BatchScheduler, ConsoleProgress, NoProgress, ProgressReporter, TranslationMode,
    TranslationTask, Translator,
};

/// Output directory created next to the sources it was produced from
pub const RESULT_DIR: &str = "result";

/// Extension of subtitle files picked up by the walker
pub const SUBTITLE_EXTENSION: &str = "srt";

/// Directory names never descended into when recursing
pub const EXCLUDED_DIRS: &[&str] = &[RESULT_DIR];

/// `<stem>_<dest>.srt`, or `<stem>_<src>-<dest>.srt` for bilingual output
pub fn output_file_name(stem: &str, source_language: &str, target_language: &str, bilingual: bool) -> String {
    if bilingual {
        format!("{}_{}-{}.{}", stem, source_language, target_language, SUBTITLE_EXTENSION)
    } else {
        format!("{}_{}.{}", stem, target_language, SUBTITLE_EXTENSION)
    }
}

/// Settings of one translate-existing run
#[derive(Debug, Clone)]
pub struct WalkOptions {
    pub source_language: String,
    pub target_language: String,
    pub bilingual: bool,
    pub force: bool,
    pub recursive: bool,
}

impl WalkOptions {
    pub fn task(&self) -> TranslationTask {
        TranslationTask::new(
            &self.source_language,
            &self.target_language,
            TranslationMode::for_output(true, self.bilingual),
        )
    }
}

/// One source file and where its translation goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTask {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub task: TranslationTask,
    pub force: bool,
}

impl PathTask {
    /// Skip when the destination is already there and regeneration was not forced
    pub fn should_skip(&self) -> bool {
        !self.force && self.destination.is_file()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    Translated(BatchReport),
    Skipped,
}

/// File counts of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkSummary {
    pub translated: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Cues whose translation failed inside otherwise translated files
    pub failed_cues: usize,
}

impl WalkSummary {
    fn record(&mut self, outcome: &Result<FileOutcome>) {
        match outcome {
            Ok(FileOutcome::Translated(report)) => {
                self.translated += 1;
                self.failed_cues += report.failed;
            }
            Ok(FileOutcome::Skipped) => self.skipped += 1,
            Err(_) => self.failed += 1,
        }
    }

    fn merge(&mut self, other: WalkSummary) {
        self.translated += other.translated;
        self.skipped += other.skipped;
        self.failed += other.failed;
        self.failed_cues += other.failed_cues;
    }
}

/// Maps the translation pipeline over a directory hierarchy.
///
/// Files in a directory are processed before its subdirectories. A failure on
/// one file is logged and counted; the walk carries on with the rest.
pub struct TreeWalker<'a> {
    translator: &'a dyn Translator,
    scheduler: &'a BatchScheduler,
    languages: &'a LanguageRegistry,
    options: WalkOptions,
    show_progress: bool,
}

impl<'a> TreeWalker<'a> {
    pub fn new(
        translator: &'a dyn Translator,
        scheduler: &'a BatchScheduler,
        languages: &'a LanguageRegistry,
        options: WalkOptions,
    ) -> Self {
        Self {
            translator,
            scheduler,
            languages,
            options,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Source subtitle that is not bilingual output of an earlier run
    pub fn is_eligible(&self, file_name: &str) -> bool {
        file_name.ends_with(&format!(".{}", SUBTITLE_EXTENSION))
            && !self.languages.is_bilingual_output(file_name)
    }

    pub fn plan(&self, dir: &Path, file_name: &str) -> PathTask {
        let source = dir.join(file_name);
        let stem = Path::new(file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| file_name.to_string());
        let destination = dir.join(RESULT_DIR).join(output_file_name(
            &stem,
            &self.options.source_language,
            &self.options.target_language,
            self.options.bilingual,
        ));

        PathTask {
            source,
            destination,
            task: self.options.task(),
            force: self.options.force,
        }
    }

    /// Translate one subtitle file into the `result` directory next to it
    pub async fn translate_single(&self, path: &Path) -> WalkSummary {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let mut summary = WalkSummary::default();
        let outcome = match fs::create_dir_all(dir.join(RESULT_DIR)).await {
            Ok(()) => self.translate_file(&dir, &file_name, 0).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = &outcome {
            warn!("|- Failed to process '{}': {}", file_name, e);
        }
        summary.record(&outcome);
        summary
    }

    /// Translate every eligible file under `dir`, descending into subdirectories
    /// when the run is recursive
    pub fn translate_directory<'b>(&'b self, dir: &'b Path, depth: usize) -> BoxFuture<'b, WalkSummary> {
        async move {
            let pad = indent(depth);
            info!("{}{}", pad, "-".repeat(20));
            info!("{}|+ Processing for folder '{}'", pad, dir.display());

            let mut summary = WalkSummary::default();
            let (files, subdirs) = self.list_directory(dir);

            if !files.is_empty() {
                if let Err(e) = fs::create_dir_all(dir.join(RESULT_DIR)).await {
                    warn!("{}|- Cannot create '{}' in '{}': {}", pad, RESULT_DIR, dir.display(), e);
                    summary.failed += files.len();
                    return summary;
                }
            }

            for file_name in &files {
                let outcome = self.translate_file(dir, file_name, depth).await;
                if let Err(e) = &outcome {
                    warn!("{}  |- Failed to process '{}': {}", pad, file_name, e);
                }
                summary.record(&outcome);
            }

            if !self.options.recursive {
                return summary;
            }

            for subdir in &subdirs {
                summary.merge(self.translate_directory(subdir, depth + 1).await);
            }

            summary
        }
        .boxed()
    }

    async fn translate_file(&self, dir: &Path, file_name: &str, depth: usize) -> Result<FileOutcome> {
        let depth = depth + 1;
        let pad = indent(depth);
        info!("{}|- Processing for file '{}'", pad, file_name);

        let plan = self.plan(dir, file_name);
        if plan.should_skip() {
            info!("{}|- '{}' already exists, skipping", pad, plan.destination.display());
            return Ok(FileOutcome::Skipped);
        }

        let mut cues = read_srt(&plan.source).await?;

        let progress: Box<dyn ProgressReporter> = if self.show_progress {
            Box::new(ConsoleProgress::new(cues.len()))
        } else {
            Box::new(NoProgress)
        };
        let report = self
            .scheduler
            .translate_cues(self.translator, &mut cues, &plan.task, depth + 1, progress.as_ref())
            .await;
        progress.finish();

        write_srt(&cues, &plan.destination).await?;
        info!("{}|- {} has been successfully processed", pad, file_name);

        Ok(FileOutcome::Translated(report))
    }

    /// Eligible files and descendable subdirectories directly inside `dir`
    fn list_directory(&self, dir: &Path) -> (Vec<String>, Vec<PathBuf>) {
        let mut files = Vec::new();
        let mut subdirs = Vec::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                    continue;
                }
            };
            let name = entry.file_name().to_string_lossy().to_string();

            if entry.file_type().is_file() {
                if self.is_eligible(&name) {
                    files.push(name);
                }
            } else if entry.file_type().is_dir() && !EXCLUDED_DIRS.contains(&name.as_str()) {
                subdirs.push(entry.into_path());
            }
        }

        (files, subdirs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::MockTranslator;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;

    const SOURCE: &str = "1\n00:00:01,000 --> 00:00:02,000\nHello\n\n2\n00:00:03,000 --> 00:00:04,000\nGoodbye\n\n";

    fn tagging_translator() -> MockTranslator {
        let mut translator = MockTranslator::new();
        translator
            .expect_translate()
            .returning(|text, _, target| Ok(format!("[{}] {}", target, text)));
        translator
    }

    fn options(bilingual: bool, force: bool, recursive: bool) -> WalkOptions {
        WalkOptions {
            source_language: "en".to_string(),
            target_language: "vi".to_string(),
            bilingual,
            force,
            recursive,
        }
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name("movie", "en", "vi", true), "movie_en-vi.srt");
        assert_eq!(output_file_name("movie", "en", "vi", false), "movie_vi.srt");
    }

    #[test]
    fn test_plan_places_output_in_result_dir() {
        let translator = tagging_translator();
        let scheduler = BatchScheduler::default();
        let languages = LanguageRegistry::default();
        let walker = TreeWalker::new(&translator, &scheduler, &languages, options(true, false, false));

        let plan = walker.plan(Path::new("/subs/season1"), "ep01.srt");
        assert_eq!(plan.source, PathBuf::from("/subs/season1/ep01.srt"));
        assert_eq!(plan.destination, PathBuf::from("/subs/season1/result/ep01_en-vi.srt"));
        assert_eq!(plan.task.mode, TranslationMode::Append);
        assert!(!plan.force);
    }

    #[test]
    fn test_eligibility_filter() {
        let translator = tagging_translator();
        let scheduler = BatchScheduler::default();
        let languages = LanguageRegistry::default();
        let walker = TreeWalker::new(&translator, &scheduler, &languages, options(false, false, false));

        assert!(walker.is_eligible("movie.srt"));
        assert!(!walker.is_eligible("movie_en-vi.srt"));
        assert!(!walker.is_eligible("movie.txt"));
        assert!(!walker.is_eligible("movie.srt.bak"));
    }

    #[tokio::test]
    async fn test_directory_translation_writes_result_files() {
        let temp = TempDir::new().unwrap();
        temp.child("movie.srt").write_str(SOURCE).unwrap();
        temp.child("notes.txt").write_str("not a subtitle").unwrap();
        temp.child("old_en-vi.srt").write_str(SOURCE).unwrap();

        let translator = tagging_translator();
        let scheduler = BatchScheduler::default();
        let languages = LanguageRegistry::default();
        let walker = TreeWalker::new(&translator, &scheduler, &languages, options(false, false, false));

        let summary = walker.translate_directory(temp.path(), 0).await;
        assert_eq!(summary, WalkSummary { translated: 1, ..Default::default() });

        let output = std::fs::read_to_string(temp.child("result/movie_vi.srt").path()).unwrap();
        assert_eq!(
            output,
            "1\n00:00:01,000 --> 00:00:02,000\n[vi] Hello\n\n2\n00:00:03,000 --> 00:00:04,000\n[vi] Goodbye\n\n"
        );
        assert!(!temp.child("result/old_en-vi_vi.srt").path().exists());
    }

    #[tokio::test]
    async fn test_bilingual_output_keeps_both_languages() {
        let temp = TempDir::new().unwrap();
        temp.child("movie.srt").write_str(SOURCE).unwrap();

        let translator = tagging_translator();
        let scheduler = BatchScheduler::default();
        let languages = LanguageRegistry::default();
        let walker = TreeWalker::new(&translator, &scheduler, &languages, options(true, false, false));

        walker.translate_directory(temp.path(), 0).await;

        let output = std::fs::read_to_string(temp.child("result/movie_en-vi.srt").path()).unwrap();
        assert!(output.starts_with("1\n00:00:01,000 --> 00:00:02,000\nHello\n[vi] Hello\n\n"));
    }

    #[tokio::test]
    async fn test_existing_output_is_skipped_unless_forced() {
        let temp = TempDir::new().unwrap();
        temp.child("movie.srt").write_str(SOURCE).unwrap();

        let translator = tagging_translator();
        let scheduler = BatchScheduler::default();
        let languages = LanguageRegistry::default();

        let walker = TreeWalker::new(&translator, &scheduler, &languages, options(false, false, false));
        walker.translate_directory(temp.path(), 0).await;

        let destination = temp.child("result/movie_vi.srt");
        destination.write_str("hand edited").unwrap();

        let summary = walker.translate_directory(temp.path(), 0).await;
        assert_eq!(summary, WalkSummary { skipped: 1, ..Default::default() });
        assert_eq!(std::fs::read_to_string(destination.path()).unwrap(), "hand edited");

        let forced = TreeWalker::new(&translator, &scheduler, &languages, options(false, true, false));
        let summary = forced.translate_directory(temp.path(), 0).await;
        assert_eq!(summary, WalkSummary { translated: 1, ..Default::default() });
        assert!(std::fs::read_to_string(destination.path()).unwrap().contains("[vi] Hello"));
    }

    #[tokio::test]
    async fn test_recursion_processes_subdirectories_only_when_enabled() {
        let temp = TempDir::new().unwrap();
        temp.child("season1/ep01.srt").write_str(SOURCE).unwrap();
        temp.child("season2/ep01.srt").write_str(SOURCE).unwrap();

        let translator = tagging_translator();
        let scheduler = BatchScheduler::default();
        let languages = LanguageRegistry::default();

        let flat = TreeWalker::new(&translator, &scheduler, &languages, options(false, false, false));
        let summary = flat.translate_directory(temp.path(), 0).await;
        assert_eq!(summary, WalkSummary::default());
        assert!(!temp.child("season1/result").path().exists());
        assert!(!temp.child("result").path().exists());

        let recursive = TreeWalker::new(&translator, &scheduler, &languages, options(false, false, true));
        let summary = recursive.translate_directory(temp.path(), 0).await;
        assert_eq!(summary.translated, 2);
        assert!(temp.child("season1/result/ep01_vi.srt").path().is_file());
        assert!(temp.child("season2/result/ep01_vi.srt").path().is_file());
    }

    #[tokio::test]
    async fn test_result_directory_is_not_a_source() {
        let temp = TempDir::new().unwrap();
        temp.child("result/stray.srt").write_str(SOURCE).unwrap();

        let translator = tagging_translator();
        let scheduler = BatchScheduler::default();
        let languages = LanguageRegistry::default();
        let walker = TreeWalker::new(&translator, &scheduler, &languages, options(false, false, true));

        let summary = walker.translate_directory(temp.path(), 0).await;
        assert_eq!(summary, WalkSummary::default());
        assert!(!temp.child("result/result").path().exists());
    }

    #[tokio::test]
    async fn test_unreadable_file_does_not_stop_the_walk() {
        let temp = TempDir::new().unwrap();
        temp.child("a_broken.srt").write_binary(&[0xff, 0xfe, 0x00, 0xd8]).unwrap();
        temp.child("b_good.srt").write_str(SOURCE).unwrap();

        let translator = tagging_translator();
        let scheduler = BatchScheduler::default();
        let languages = LanguageRegistry::default();
        let walker = TreeWalker::new(&translator, &scheduler, &languages, options(false, false, false));

        let summary = walker.translate_directory(temp.path(), 0).await;
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.translated, 1);
        assert!(temp.child("result/b_good_vi.srt").path().is_file());
    }

    #[tokio::test]
    async fn test_single_file_creates_result_dir() {
        let temp = TempDir::new().unwrap();
        temp.child("movie.srt").write_str(SOURCE).unwrap();

        let translator = tagging_translator();
        let scheduler = BatchScheduler::default();
        let languages = LanguageRegistry::default();
        let walker = TreeWalker::new(&translator, &scheduler, &languages, options(true, false, false));

        let summary = walker.translate_single(temp.child("movie.srt").path()).await;
        assert_eq!(summary.translated, 1);
        assert!(temp.child("result/movie_en-vi.srt").path().is_file());
    }

    #[tokio::test]
    async fn test_cue_failures_are_counted_not_fatal() {
        let temp = TempDir::new().unwrap();
        temp.child("movie.srt").write_str(SOURCE).unwrap();

        let mut translator = MockTranslator::new();
        translator.expect_translate().returning(|text, _, _| {
            if text == "Goodbye" {
                Err(crate::error::SubtransError::Translation("rate limited".to_string()))
            } else {
                Ok("Xin chào".to_string())
            }
        });
        let scheduler = BatchScheduler::default();
        let languages = LanguageRegistry::default();
        let walker = TreeWalker::new(&translator, &scheduler, &languages, options(false, false, false));

        let summary = walker.translate_directory(temp.path(), 0).await;
        assert_eq!(summary, WalkSummary { translated: 1, failed_cues: 1, ..Default::default() });

        let output = std::fs::read_to_string(temp.child("result/movie_vi.srt").path()).unwrap();
        assert!(output.contains("Xin chào\n\n"));
        assert!(output.contains("Goodbye\n\n"));
    }
}

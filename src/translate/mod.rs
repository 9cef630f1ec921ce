// Translation architecture
//
// - Translator: one external translation call for one string
// - translate_cue: applies a Translator to one cue under a TranslationMode
// - batch: drives translate_cue over a cue sequence in bounded batches
// - progress: per-batch progress reporting
// - ollama: Translator backed by an Ollama server

pub mod batch;
pub mod ollama;
pub mod progress;

use async_trait::async_trait;

pub use batch::{BatchReport, BatchScheduler};
pub use ollama::OllamaTranslator;
pub use progress::{ConsoleProgress, NoProgress, ProgressReporter, ProgressUpdate};

use crate::error::Result;
use crate::subtitle::Cue;

/// External translation collaborator
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` from `source_language` to `target_language`
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String>;
}

/// How a translation result is merged into a cue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationMode {
    /// Leave the cue untouched
    None,
    /// Replace the cue text with the translation
    Replace,
    /// Keep the original and add the translation on the next line
    Append,
}

impl TranslationMode {
    /// Mode for a run: bilingual output keeps both languages
    pub fn for_output(has_target: bool, bilingual: bool) -> Self {
        match (has_target, bilingual) {
            (false, _) => TranslationMode::None,
            (true, true) => TranslationMode::Append,
            (true, false) => TranslationMode::Replace,
        }
    }
}

/// Language pair and merge policy shared by every cue of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationTask {
    pub source_language: String,
    pub target_language: String,
    pub mode: TranslationMode,
}

impl TranslationTask {
    pub fn new<S: Into<String>, T: Into<String>>(
        source_language: S,
        target_language: T,
        mode: TranslationMode,
    ) -> Self {
        Self {
            source_language: source_language.into(),
            target_language: target_language.into(),
            mode,
        }
    }
}

/// Translate one cue in place.
///
/// Makes exactly one call to `translator` unless the mode is
/// [`TranslationMode::None`]. On error the cue is left as it was.
pub async fn translate_cue(
    translator: &dyn Translator,
    cue: &mut Cue,
    task: &TranslationTask,
) -> Result<()> {
    if task.mode == TranslationMode::None {
        return Ok(());
    }

    let translated = translator
        .translate(&cue.text, &task.source_language, &task.target_language)
        .await?;

    match task.mode {
        TranslationMode::Replace => cue.text = translated,
        TranslationMode::Append => cue.text = format!("{}\n{}", cue.text, translated),
        TranslationMode::None => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SubtransError;

    fn cue(text: &str) -> Cue {
        Cue::new("00:00:01,000 --> 00:00:02,000", text)
    }

    #[tokio::test]
    async fn test_replace_mode_overwrites_text() {
        let mut translator = MockTranslator::new();
        translator
            .expect_translate()
            .withf(|text, source, target| text == "Hello" && source == "en" && target == "vi")
            .times(1)
            .returning(|_, _, _| Ok("Xin chào".to_string()));

        let mut cue = cue("Hello");
        let task = TranslationTask::new("en", "vi", TranslationMode::Replace);
        translate_cue(&translator, &mut cue, &task).await.unwrap();
        assert_eq!(cue.text, "Xin chào");
    }

    #[tokio::test]
    async fn test_append_mode_keeps_original() {
        let mut translator = MockTranslator::new();
        translator
            .expect_translate()
            .times(1)
            .returning(|_, _, _| Ok("Xin chào".to_string()));

        let mut cue = cue("Hello");
        let task = TranslationTask::new("en", "vi", TranslationMode::Append);
        translate_cue(&translator, &mut cue, &task).await.unwrap();
        assert_eq!(cue.text, "Hello\nXin chào");
    }

    #[tokio::test]
    async fn test_none_mode_never_calls_translator() {
        let mut translator = MockTranslator::new();
        translator.expect_translate().times(0);

        let mut cue = cue("Hello");
        let task = TranslationTask::new("en", "vi", TranslationMode::None);
        translate_cue(&translator, &mut cue, &task).await.unwrap();
        assert_eq!(cue.text, "Hello");
    }

    #[tokio::test]
    async fn test_failure_leaves_text_unchanged() {
        for mode in [TranslationMode::Replace, TranslationMode::Append] {
            let mut translator = MockTranslator::new();
            translator
                .expect_translate()
                .times(1)
                .returning(|_, _, _| Err(SubtransError::Translation("throttled".to_string())));

            let mut cue = cue("Hello");
            let task = TranslationTask::new("en", "vi", mode);
            let result = translate_cue(&translator, &mut cue, &task).await;
            assert!(result.is_err());
            assert_eq!(cue.text, "Hello");
        }
    }

    #[test]
    fn test_mode_for_output() {
        assert_eq!(TranslationMode::for_output(false, false), TranslationMode::None);
        assert_eq!(TranslationMode::for_output(false, true), TranslationMode::None);
        assert_eq!(TranslationMode::for_output(true, false), TranslationMode::Replace);
        assert_eq!(TranslationMode::for_output(true, true), TranslationMode::Append);
    }
}

use futures::future::join_all;
use tracing::{debug, warn};

use crate::config::DEFAULT_BATCH_SIZE;
use crate::subtitle::Cue;
use super::progress::{ProgressReporter, ProgressUpdate};
use super::{translate_cue, TranslationTask, Translator};

/// Outcome counts for one scheduled sequence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub succeeded: usize,
    pub failed: usize,
}

/// Runs the translation operator over a cue sequence in fixed-size batches.
///
/// Cues inside a batch are translated concurrently; the next batch starts
/// only after every cue of the current one has finished. Cue order is never
/// changed, each unit writes only to its own cue.
#[derive(Debug, Clone)]
pub struct BatchScheduler {
    batch_size: usize,
}

impl Default for BatchScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

impl BatchScheduler {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Translate every cue in place, reporting progress after each batch
    pub async fn translate_cues(
        &self,
        translator: &dyn Translator,
        cues: &mut [Cue],
        task: &TranslationTask,
        depth: usize,
        progress: &dyn ProgressReporter,
    ) -> BatchReport {
        let total = cues.len();
        let mut completed = 0;
        let mut report = BatchReport::default();

        for batch in cues.chunks_mut(self.batch_size) {
            let size = batch.len();
            debug!("Translating batch of {} cues ({}/{} done)", size, completed, total);

            let outcomes = join_all(
                batch
                    .iter_mut()
                    .map(|cue| translate_cue(translator, cue, task)),
            )
            .await;

            for (cue, outcome) in batch.iter().zip(outcomes) {
                match outcome {
                    Ok(()) => report.succeeded += 1,
                    Err(e) => {
                        report.failed += 1;
                        warn!("** Translating for '{}' was failed **: {}", cue.text, e);
                    }
                }
            }

            completed += size;
            progress.report(ProgressUpdate { depth, completed, total });
        }

        report
    }
}

use indicatif::{ProgressBar, ProgressStyle};

/// Indentation for a nesting depth, two spaces per level
pub fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

/// Progress of one cue sequence after a batch has joined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub depth: usize,
    pub completed: usize,
    pub total: usize,
}

impl ProgressUpdate {
    /// Share of cues processed, as a percentage rounded to two decimals
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        let raw = self.completed as f64 * 100.0 / self.total as f64;
        (raw * 100.0).round() / 100.0
    }

    pub fn status_line(&self) -> String {
        format!(
            "{}|- The translation process has reached {:.2}%",
            indent(self.depth),
            self.percent()
        )
    }
}

/// Receives progress from the batch scheduler, one call per joined batch
pub trait ProgressReporter: Send + Sync {
    fn report(&self, update: ProgressUpdate);

    /// Called once the whole sequence has been processed
    fn finish(&self) {}
}

/// Discards all updates
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _update: ProgressUpdate) {}
}

/// Single overwriting status line on the terminal
pub struct ConsoleProgress {
    bar: ProgressBar,
}

impl ConsoleProgress {
    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::with_template("{msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Self { bar }
    }
}

impl ProgressReporter for ConsoleProgress {
    fn report(&self, update: ProgressUpdate) {
        self.bar.set_position(update.completed as u64);
        self.bar.set_message(update.status_line());
    }

    fn finish(&self) {
        self.bar.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_is_rounded_to_two_decimals() {
        let update = ProgressUpdate { depth: 0, completed: 1, total: 3 };
        assert_eq!(update.percent(), 33.33);

        let update = ProgressUpdate { depth: 0, completed: 2, total: 3 };
        assert_eq!(update.percent(), 66.67);

        let update = ProgressUpdate { depth: 0, completed: 25, total: 25 };
        assert_eq!(update.percent(), 100.0);
    }

    #[test]
    fn test_status_line_is_indented_by_depth() {
        let update = ProgressUpdate { depth: 2, completed: 10, total: 40 };
        assert_eq!(
            update.status_line(),
            "    |- The translation process has reached 25.00%"
        );
    }

    #[test]
    fn test_console_progress_tracks_position() {
        let progress = ConsoleProgress::new(20);
        progress.report(ProgressUpdate { depth: 1, completed: 10, total: 20 });
        assert_eq!(progress.bar.position(), 10);
        progress.finish();
        assert!(progress.bar.is_finished());
    }
}

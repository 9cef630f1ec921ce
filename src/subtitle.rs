use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

use crate::error::Result;
use crate::transcribe::Segment;

/// Token separating start and end in a cue's time line
pub const TIME_RANGE_DELIMITER: &str = "-->";

/// One timed subtitle entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    /// `<start> --> <end>`, copied verbatim between input and output
    pub time_range: String,
    pub text: String,
}

impl Cue {
    pub fn new<T: Into<String>, S: Into<String>>(time_range: T, text: S) -> Self {
        Self {
            time_range: time_range.into(),
            text: text.into(),
        }
    }
}

impl From<&Segment> for Cue {
    fn from(segment: &Segment) -> Self {
        Cue::new(
            format!(
                "{} {} {}",
                format_srt_time(segment.start),
                TIME_RANGE_DELIMITER,
                format_srt_time(segment.end)
            ),
            segment.text.trim(),
        )
    }
}

/// Parse SRT text into cues.
///
/// A line containing `-->` opens a cue; following lines are trimmed and
/// collected as its text until a blank line closes it. Anything seen while no
/// cue is open (index lines, stray headers) is ignored. A cue still open at a
/// new time line or at end of input is kept.
pub fn parse_srt(content: &str) -> Vec<Cue> {
    let mut cues = Vec::new();
    let mut current: Option<(String, Vec<String>)> = None;

    for line in content.lines() {
        if line.contains(TIME_RANGE_DELIMITER) {
            if let Some((time_range, lines)) = current.take() {
                cues.push(Cue::new(time_range, lines.join("\n")));
            }
            current = Some((line.trim().to_string(), Vec::new()));
        } else if line.trim().is_empty() {
            if let Some((time_range, lines)) = current.take() {
                cues.push(Cue::new(time_range, lines.join("\n")));
            }
        } else if let Some((_, lines)) = current.as_mut() {
            lines.push(line.trim().to_string());
        }
    }

    if let Some((time_range, lines)) = current.take() {
        debug!("Keeping final cue without trailing blank line: {}", time_range);
        cues.push(Cue::new(time_range, lines.join("\n")));
    }

    cues
}

/// Render cues as SRT text, numbering them from 1 in sequence order
pub fn format_srt(cues: &[Cue]) -> String {
    let mut srt_content = String::new();

    for (index, cue) in cues.iter().enumerate() {
        srt_content.push_str(&format!(
            "{}\n{}\n{}\n\n",
            index + 1,
            cue.time_range,
            cue.text
        ));
    }

    srt_content
}

/// Read and parse an SRT file
pub async fn read_srt<P: AsRef<Path>>(path: P) -> Result<Vec<Cue>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).await?;
    let cues = parse_srt(&content);
    debug!("Parsed {} cues from {}", cues.len(), path.display());
    Ok(cues)
}

/// Write cues to an SRT file, replacing any existing content
pub async fn write_srt<P: AsRef<Path>>(cues: &[Cue], output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    info!("Generating SRT file: {}", output_path.display());

    fs::write(output_path, format_srt(cues)).await?;

    Ok(())
}

/// Format time in seconds to SRT time format (HH:MM:SS,mmm).
///
/// Milliseconds are rounded half away from zero; a remainder that rounds up
/// to a full second carries into the seconds field. Hours are not wrapped.
pub fn format_srt_time(seconds: f64) -> String {
    let total_milliseconds = (seconds.max(0.0) * 1000.0).round() as u64;
    let hours = total_milliseconds / 3_600_000;
    let minutes = (total_milliseconds % 3_600_000) / 60_000;
    let secs = (total_milliseconds % 60_000) / 1_000;
    let millis = total_milliseconds % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}

//! Request, pair, and report types for alignment runs.

use std::path::PathBuf;

use serde::Serialize;
use uuid::Uuid;

/// Default prefix for synthesized output filenames.
pub const DEFAULT_OUTPUT_PREFIX: &str = "ad_";

/// Inputs for one alignment run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Video file paths (existing local files).
    pub videos: Vec<PathBuf>,
    /// Audio file paths (existing local files).
    pub audios: Vec<PathBuf>,
    /// Optional explicit output path. Used verbatim for a single pair;
    /// suffixed `_<n>` before the extension when several pairs share it.
    pub output_hint: Option<PathBuf>,
    /// Prefix for synthesized output filenames when no hint is given.
    pub output_prefix: String,
    /// Identifier correlating progress events to this run. Not required
    /// for correctness, only for multiplexed callers.
    pub run_id: String,
}

impl RunRequest {
    /// Create a request with a generated run identifier.
    pub fn new(videos: Vec<PathBuf>, audios: Vec<PathBuf>) -> Self {
        Self {
            videos,
            audios,
            output_hint: None,
            output_prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
            run_id: format!("run-{}", Uuid::new_v4()),
        }
    }

    /// Set an explicit output path.
    pub fn with_output_hint(mut self, hint: impl Into<PathBuf>) -> Self {
        self.output_hint = Some(hint.into());
        self
    }

    /// Set the synthesized-filename prefix.
    pub fn with_output_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.output_prefix = prefix.into();
        self
    }

    /// Set the run identifier.
    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = run_id.into();
        self
    }
}

/// One video/audio pair with its resolved output path.
#[derive(Debug, Clone)]
pub struct AlignmentPair {
    pub video: PathBuf,
    pub audio: PathBuf,
    pub output: PathBuf,
}

/// Report entry for one successfully processed pair.
#[derive(Debug, Clone, Serialize)]
pub struct AlignmentReportEntry {
    /// Display title (the video's file name).
    pub title: String,
    pub video: PathBuf,
    pub audio: PathBuf,
    /// Applied audio offset in milliseconds.
    pub offset_ms: i64,
    /// Correlation score at the chosen offset.
    pub score: f64,
    /// Path of the muxed deliverable.
    pub output: PathBuf,
}

/// Final report of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct AlignmentReport {
    /// Identifier of the run that produced this report.
    pub run_id: String,
    /// One entry per pair, in processing order.
    pub entries: Vec<AlignmentReportEntry>,
    /// Full ordered log-line list.
    pub log_lines: Vec<String>,
    /// Last successfully written output path.
    pub last_output: Option<PathBuf>,
}

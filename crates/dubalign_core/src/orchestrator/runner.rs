//! Sequential alignment run driver.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::analysis::{
    compute_energy_profile, find_best_offset, EnergyProfile, Waveform, HOP_MS, MIN_PROFILE_LEN,
};
use crate::logging::RunLogger;
use crate::media::{MediaTool, ScratchDir, ScratchSpace};

use super::errors::{PairError, RunError, RunResult};
use super::pairing::{build_pairs, derive_output_path};
use super::types::{AlignmentPair, AlignmentReport, AlignmentReportEntry, RunRequest};

/// Drives alignment runs.
///
/// One logical worker per run: pairs are processed strictly
/// sequentially, with at most one external tool invocation in flight.
/// Concurrent runs are possible but discouraged (they contend for the
/// same CPU and disk); scratch directories are uniquely named, so they
/// never collide across runs.
pub struct AlignmentRunner {
    tool: Arc<dyn MediaTool>,
    scratch: Arc<dyn ScratchSpace>,
    cancelled: Arc<AtomicBool>,
}

impl AlignmentRunner {
    /// Create a runner over the given tool and scratch space.
    pub fn new(tool: Arc<dyn MediaTool>, scratch: Arc<dyn ScratchSpace>) -> Self {
        Self {
            tool,
            scratch,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get a handle for cancelling the run from another thread.
    ///
    /// Cancellation is cooperative: it is honored at the next step
    /// boundary.
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            flag: Arc::clone(&self.cancelled),
        }
    }

    /// Execute one run.
    ///
    /// Validates inputs and environment upfront (no partial work on a
    /// validation failure), then processes each pair in order. The first
    /// pair failure aborts the run; the caller still holds the logger
    /// and with it every line emitted up to the failure.
    pub fn run(&self, request: &RunRequest, logger: &RunLogger) -> RunResult<AlignmentReport> {
        logger.phase("Validating inputs");
        self.validate(request)?;

        let pairs = build_pairs(&request.videos, &request.audios);
        if request.videos.len() != request.audios.len() {
            logger.warn(&format!(
                "input lists differ in length ({} videos, {} audios); pairing truncated to {} pair(s)",
                request.videos.len(),
                request.audios.len(),
                pairs.len()
            ));
        }
        logger.info(&format!("{} pair(s) queued", pairs.len()));

        // Created lazily for synthesized output paths; this directory
        // holds deliverables and is intentionally left on disk.
        let mut output_dir: Option<PathBuf> = None;

        let pair_count = pairs.len();
        let mut entries = Vec::with_capacity(pair_count);

        for (index, (video, audio)) in pairs.into_iter().enumerate() {
            self.check_cancelled(logger)?;

            let fallback = if request.output_hint.is_none() {
                match &output_dir {
                    Some(dir) => dir.clone(),
                    None => {
                        let dir = self.scratch.create_unique_dir().map_err(|e| {
                            RunError::environment(format!(
                                "failed to create output directory: {}",
                                e
                            ))
                        })?;
                        logger.info(&format!("Writing outputs to {}", dir.display()));
                        output_dir = Some(dir.clone());
                        dir
                    }
                }
            } else {
                PathBuf::new()
            };

            let output = derive_output_path(
                &video,
                index,
                pair_count,
                request.output_hint.as_deref(),
                &request.output_prefix,
                &fallback,
            );

            let pair = AlignmentPair {
                video,
                audio,
                output,
            };
            let entry = self.process_pair(&pair, index, pair_count, logger)?;
            entries.push(entry);
        }

        logger.phase("Completed");
        logger.success(&format!("{} pair(s) aligned", entries.len()));

        Ok(AlignmentReport {
            run_id: request.run_id.clone(),
            last_output: entries.last().map(|e| e.output.clone()),
            entries,
            log_lines: logger.lines(),
        })
    }

    /// Upfront validation: input lists, file existence, tool presence.
    ///
    /// Performs no work beyond the checks themselves - in particular no
    /// scratch directory is created and no tool process is spawned.
    fn validate(&self, request: &RunRequest) -> RunResult<()> {
        if request.videos.is_empty() {
            return Err(RunError::input("no video inputs given"));
        }
        if request.audios.is_empty() {
            return Err(RunError::input("no audio inputs given"));
        }
        for path in request.videos.iter().chain(request.audios.iter()) {
            if !path.exists() {
                return Err(RunError::input(format!(
                    "input file not found: {}",
                    path.display()
                )));
            }
        }
        if !self.tool.is_available() {
            return Err(RunError::environment(
                "external media tool (ffmpeg/ffprobe) not found on this system",
            ));
        }
        Ok(())
    }

    /// Process one pair: decode both sources, profile, search, remux.
    ///
    /// Both scratch directories are guarded and removed on every exit
    /// path, so a failing pair cannot leak intermediate files.
    fn process_pair(
        &self,
        pair: &AlignmentPair,
        index: usize,
        pair_count: usize,
        logger: &RunLogger,
    ) -> RunResult<AlignmentReportEntry> {
        let title = pair
            .video
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| pair.video.display().to_string());

        logger.phase(&format!("Pair {}/{}: {}", index + 1, pair_count, title));

        let video_scratch = ScratchDir::acquire(&*self.scratch)
            .map_err(|e| RunError::pair(&title, PairError::from(e)))?;
        let audio_scratch = ScratchDir::acquire(&*self.scratch)
            .map_err(|e| RunError::pair(&title, PairError::from(e)))?;

        logger.info(&format!(
            "Extracting reference audio from {}",
            pair.video.display()
        ));
        let video_wave = self
            .tool
            .decode_to_mono_pcm(&pair.video, video_scratch.path())
            .map_err(|e| RunError::pair(&title, PairError::Decode(e)))?;
        self.check_cancelled(logger)?;

        logger.info(&format!("Decoding dub track {}", pair.audio.display()));
        let audio_wave = self
            .tool
            .decode_to_mono_pcm(&pair.audio, audio_scratch.path())
            .map_err(|e| RunError::pair(&title, PairError::Decode(e)))?;
        self.check_cancelled(logger)?;

        let video_profile = usable_profile(&pair.video, &video_wave)
            .map_err(|e| RunError::pair(&title, e))?;
        let audio_profile = usable_profile(&pair.audio, &audio_wave)
            .map_err(|e| RunError::pair(&title, e))?;

        logger.info("Searching for best offset");
        let result = find_best_offset(&video_profile.values, &audio_profile.values, HOP_MS);
        logger.info(&format!(
            "Offset: {} ms (score {:.4})",
            result.offset_ms, result.score
        ));
        self.check_cancelled(logger)?;

        logger.info(&format!("Muxing to {}", pair.output.display()));
        self.tool
            .remux(&pair.video, &pair.audio, result.offset_ms, &pair.output)
            .map_err(|e| RunError::pair(&title, PairError::Mux(e)))?;

        logger.success(&format!("{} aligned at {} ms", title, result.offset_ms));

        Ok(AlignmentReportEntry {
            title,
            video: pair.video.clone(),
            audio: pair.audio.clone(),
            offset_ms: result.offset_ms,
            score: result.score,
            output: pair.output.clone(),
        })
    }

    fn check_cancelled(&self, logger: &RunLogger) -> RunResult<()> {
        if self.cancelled.load(Ordering::SeqCst) {
            logger.warn("Run cancelled");
            return Err(RunError::Cancelled);
        }
        Ok(())
    }
}

/// Compute a profile and reject it when too short to correlate.
fn usable_profile(source: &Path, waveform: &Waveform) -> Result<EnergyProfile, PairError> {
    let profile = compute_energy_profile(waveform);
    if profile.len() < MIN_PROFILE_LEN {
        return Err(PairError::profile_too_short(
            source.display().to_string(),
            profile.len(),
            MIN_PROFILE_LEN,
        ));
    }
    Ok(profile)
}

/// Handle for cancelling a running alignment from another thread.
#[derive(Clone)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Request cancellation; honored at the next step boundary.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

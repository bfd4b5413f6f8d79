//! Subtitle-slot fitting.
//!
//! A rendered speech clip must fit the time window of its subtitle
//! line. The fitter measures the clip, and when it overruns the window
//! beyond a small tolerance, requests one re-synthesis at a higher
//! playback speed. This is a single-shot corrective pass, not a
//! converge-to-fit loop: one overrun, one correction attempt, then the
//! best available clip is accepted.
//!
//! Every failure here degrades to "use what you have" - a slightly
//! mistimed clip is preferable to blocking an entire batch conversion
//! over one subtitle line.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::media::MediaTool;

/// Accept clips that overrun their slot by up to 2%.
pub const OVERRUN_TOLERANCE: f64 = 1.02;

/// Hard ceiling on the synthesis speed multiplier; anything faster is
/// unintelligible.
pub const MAX_SPEED: f64 = 4.0;

/// A speed increase below this is not worth a re-synthesis.
const MIN_SPEED_GAIN: f64 = 0.01;

/// Target time window for one subtitle line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubtitleSlot {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl SubtitleSlot {
    /// Create a slot from start and end timestamps.
    pub fn new(start_ms: i64, end_ms: i64) -> Self {
        Self { start_ms, end_ms }
    }

    /// Slot length, clamped to a minimum of 1 ms when the timestamps
    /// are inverted upstream.
    pub fn duration_ms(&self) -> i64 {
        (self.end_ms - self.start_ms).max(1)
    }
}

/// Speech synthesis failure, carrying the provider's diagnostic.
#[derive(Error, Debug)]
#[error("speech synthesis failed: {0}")]
pub struct SynthesisError(pub String);

/// Capability to re-render the current subtitle line's speech clip at a
/// given speed multiplier. Voice, text, and provider are bound by the
/// caller.
pub trait ClipSynthesizer {
    fn synthesize(&self, speed: f64) -> Result<PathBuf, SynthesisError>;
}

impl<F> ClipSynthesizer for F
where
    F: Fn(f64) -> Result<PathBuf, SynthesisError>,
{
    fn synthesize(&self, speed: f64) -> Result<PathBuf, SynthesisError> {
        self(speed)
    }
}

/// Callback producing a replacement clip when the original cannot be
/// measured. Invoked at most once.
pub type RecoveryFn<'a> = &'a dyn Fn() -> Option<PathBuf>;

/// States of the fitting pass.
enum FitState {
    Measuring { clip: PathBuf, recovered: bool },
    Recovering { original: PathBuf },
    Deciding { clip: PathBuf, duration_ms: f64 },
}

/// Fit a speech clip to its subtitle slot.
///
/// Measures the clip's duration; when the measurement fails, a supplied
/// recovery callback is given one chance to produce a replacement clip.
/// A clip overrunning the slot by more than the tolerance triggers a
/// single re-synthesis at `base_speed * overrun_ratio`, capped at
/// [`MAX_SPEED`]. Returns the path of the best clip available - the
/// re-synthesized one when the correction succeeded, the original
/// otherwise.
pub fn fit_clip_to_slot(
    clip: &Path,
    slot: SubtitleSlot,
    base_speed: f64,
    tool: &dyn MediaTool,
    synthesizer: &dyn ClipSynthesizer,
    recovery: Option<RecoveryFn<'_>>,
) -> PathBuf {
    let mut state = FitState::Measuring {
        clip: clip.to_path_buf(),
        recovered: false,
    };

    loop {
        state = match state {
            FitState::Measuring { clip, recovered } => {
                let seconds = tool.duration_seconds(&clip);
                if seconds > 0.0 {
                    FitState::Deciding {
                        clip,
                        duration_ms: seconds * 1000.0,
                    }
                } else if !recovered && recovery.is_some() {
                    FitState::Recovering { original: clip }
                } else {
                    // Duration unknown; pass the clip through untouched.
                    tracing::debug!(
                        "clip duration unavailable for {}, accepting as-is",
                        clip.display()
                    );
                    return clip;
                }
            }

            FitState::Recovering { original } => match recovery.and_then(|recover| recover()) {
                Some(replacement) => FitState::Measuring {
                    clip: replacement,
                    recovered: true,
                },
                None => return original,
            },

            FitState::Deciding { clip, duration_ms } => {
                let slot_ms = slot.duration_ms() as f64;
                let ratio = duration_ms / slot_ms;

                if ratio <= OVERRUN_TOLERANCE {
                    return clip;
                }

                let needed_speed = (base_speed * ratio).min(MAX_SPEED);
                if needed_speed <= base_speed + MIN_SPEED_GAIN {
                    // Already at (or effectively at) the ceiling.
                    return clip;
                }

                return match synthesizer.synthesize(needed_speed) {
                    Ok(faster_clip) => faster_clip,
                    Err(e) => {
                        tracing::warn!(
                            "re-synthesis at {:.2}x failed ({}), keeping overrunning clip",
                            needed_speed,
                            e
                        );
                        clip
                    }
                };
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Waveform;
    use crate::media::{MediaToolError, MediaToolResult};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Tool stub answering duration queries from a canned map.
    struct DurationStub {
        durations: HashMap<PathBuf, f64>,
        queries: AtomicUsize,
    }

    impl DurationStub {
        fn new(entries: &[(&str, f64)]) -> Self {
            Self {
                durations: entries
                    .iter()
                    .map(|(path, secs)| (PathBuf::from(path), *secs))
                    .collect(),
                queries: AtomicUsize::new(0),
            }
        }
    }

    impl MediaTool for DurationStub {
        fn is_available(&self) -> bool {
            true
        }

        fn decode_to_mono_pcm(
            &self,
            input: &Path,
            _scratch_dir: &Path,
        ) -> MediaToolResult<Waveform> {
            Err(MediaToolError::decode_failed(
                input.display().to_string(),
                "not supported by stub",
            ))
        }

        fn duration_seconds(&self, input: &Path) -> f64 {
            self.queries.fetch_add(1, Ordering::SeqCst);
            self.durations.get(input).copied().unwrap_or(0.0)
        }

        fn remux(
            &self,
            _video: &Path,
            _audio: &Path,
            _offset_ms: i64,
            _output: &Path,
        ) -> MediaToolResult<()> {
            Ok(())
        }
    }

    /// Synthesizer recording each requested speed.
    struct RecordingSynth {
        speeds: RefCell<Vec<f64>>,
        fail: bool,
    }

    impl RecordingSynth {
        fn new() -> Self {
            Self {
                speeds: RefCell::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                speeds: RefCell::new(Vec::new()),
                fail: true,
            }
        }

        fn calls(&self) -> Vec<f64> {
            self.speeds.borrow().clone()
        }
    }

    impl ClipSynthesizer for RecordingSynth {
        fn synthesize(&self, speed: f64) -> Result<PathBuf, SynthesisError> {
            self.speeds.borrow_mut().push(speed);
            if self.fail {
                Err(SynthesisError("provider returned 500".to_string()))
            } else {
                Ok(PathBuf::from("faster.mp3"))
            }
        }
    }

    #[test]
    fn near_fit_is_accepted_without_resynthesis() {
        // 2.02s into a 2s slot is exactly at tolerance.
        let tool = DurationStub::new(&[("clip.mp3", 2.02)]);
        let synth = RecordingSynth::new();

        let result = fit_clip_to_slot(
            Path::new("clip.mp3"),
            SubtitleSlot::new(0, 2000),
            1.0,
            &tool,
            &synth,
            None,
        );

        assert_eq!(result, PathBuf::from("clip.mp3"));
        assert!(synth.calls().is_empty());
    }

    #[test]
    fn overrun_requests_exactly_one_resynthesis_at_scaled_speed() {
        // 3s into a 2s slot: ratio 1.5, base 1.0 -> 1.5x.
        let tool = DurationStub::new(&[("clip.mp3", 3.0)]);
        let synth = RecordingSynth::new();

        let result = fit_clip_to_slot(
            Path::new("clip.mp3"),
            SubtitleSlot::new(1000, 3000),
            1.0,
            &tool,
            &synth,
            None,
        );

        assert_eq!(result, PathBuf::from("faster.mp3"));
        let calls = synth.calls();
        assert_eq!(calls.len(), 1);
        assert!((calls[0] - 1.5).abs() < 1e-9);
    }

    #[test]
    fn needed_speed_is_capped() {
        // 20s into a 2s slot: ratio 10, base 1.0 -> capped to 4.
        let tool = DurationStub::new(&[("clip.mp3", 20.0)]);
        let synth = RecordingSynth::new();

        fit_clip_to_slot(
            Path::new("clip.mp3"),
            SubtitleSlot::new(0, 2000),
            1.0,
            &tool,
            &synth,
            None,
        );

        assert_eq!(synth.calls(), vec![MAX_SPEED]);
    }

    #[test]
    fn no_resynthesis_when_already_at_the_ceiling() {
        let tool = DurationStub::new(&[("clip.mp3", 3.0)]);
        let synth = RecordingSynth::new();

        let result = fit_clip_to_slot(
            Path::new("clip.mp3"),
            SubtitleSlot::new(0, 2000),
            MAX_SPEED,
            &tool,
            &synth,
            None,
        );

        assert_eq!(result, PathBuf::from("clip.mp3"));
        assert!(synth.calls().is_empty());
    }

    #[test]
    fn synthesis_failure_keeps_the_original_clip() {
        let tool = DurationStub::new(&[("clip.mp3", 3.0)]);
        let synth = RecordingSynth::failing();

        let result = fit_clip_to_slot(
            Path::new("clip.mp3"),
            SubtitleSlot::new(0, 2000),
            1.0,
            &tool,
            &synth,
            None,
        );

        assert_eq!(result, PathBuf::from("clip.mp3"));
        assert_eq!(synth.calls().len(), 1);
    }

    #[test]
    fn unknown_duration_without_recovery_passes_through() {
        let tool = DurationStub::new(&[]);
        let synth = RecordingSynth::new();

        let result = fit_clip_to_slot(
            Path::new("clip.mp3"),
            SubtitleSlot::new(0, 2000),
            1.0,
            &tool,
            &synth,
            None,
        );

        assert_eq!(result, PathBuf::from("clip.mp3"));
        assert!(synth.calls().is_empty());
        assert_eq!(tool.queries.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn recovery_is_invoked_once_and_remeasured() {
        // Original unmeasurable, replacement measures fine.
        let tool = DurationStub::new(&[("replacement.mp3", 1.0)]);
        let synth = RecordingSynth::new();
        let recovery_calls = RefCell::new(0usize);
        let recovery = || {
            *recovery_calls.borrow_mut() += 1;
            Some(PathBuf::from("replacement.mp3"))
        };

        let result = fit_clip_to_slot(
            Path::new("clip.mp3"),
            SubtitleSlot::new(0, 2000),
            1.0,
            &tool,
            &synth,
            Some(&recovery),
        );

        assert_eq!(result, PathBuf::from("replacement.mp3"));
        assert_eq!(*recovery_calls.borrow(), 1);
        assert_eq!(tool.queries.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unmeasurable_replacement_is_still_accepted() {
        let tool = DurationStub::new(&[]);
        let synth = RecordingSynth::new();
        let recovery = || Some(PathBuf::from("replacement.mp3"));

        let result = fit_clip_to_slot(
            Path::new("clip.mp3"),
            SubtitleSlot::new(0, 2000),
            1.0,
            &tool,
            &synth,
            Some(&recovery),
        );

        // Two measurements, no third attempt.
        assert_eq!(result, PathBuf::from("replacement.mp3"));
        assert_eq!(tool.queries.load(Ordering::SeqCst), 2);
        assert!(synth.calls().is_empty());
    }

    #[test]
    fn failed_recovery_returns_the_original() {
        let tool = DurationStub::new(&[]);
        let synth = RecordingSynth::new();
        let recovery = || None;

        let result = fit_clip_to_slot(
            Path::new("clip.mp3"),
            SubtitleSlot::new(0, 2000),
            1.0,
            &tool,
            &synth,
            Some(&recovery),
        );

        assert_eq!(result, PathBuf::from("clip.mp3"));
    }

    #[test]
    fn inverted_slot_is_clamped_to_one_millisecond() {
        let slot = SubtitleSlot::new(5000, 4000);
        assert_eq!(slot.duration_ms(), 1);
    }

    #[test]
    fn closures_can_act_as_synthesizers() {
        let tool = DurationStub::new(&[("clip.mp3", 3.0)]);
        let synth = |speed: f64| -> Result<PathBuf, SynthesisError> {
            Ok(PathBuf::from(format!("clip_{:.1}x.mp3", speed)))
        };

        let result = fit_clip_to_slot(
            Path::new("clip.mp3"),
            SubtitleSlot::new(0, 2000),
            1.0,
            &tool,
            &synth,
            None,
        );

        assert_eq!(result, PathBuf::from("clip_1.5x.mp3"));
    }
}

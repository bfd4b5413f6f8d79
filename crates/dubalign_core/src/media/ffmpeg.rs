//! FFmpeg-backed implementation of the media tool capability.
//!
//! Decoding writes an intermediate mono 16 kHz WAV into the caller's
//! scratch directory and reads it back; duration queries go through
//! ffprobe; muxing applies the offset-dependent audio filter graph from
//! [`crate::mux`].

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::analysis::Waveform;
use crate::mux::build_remux_args;

use super::{MediaTool, MediaToolError, MediaToolResult};

/// Canonical sample rate of decoded waveforms.
pub const DECODE_SAMPLE_RATE: u32 = 16000;

/// Name of the intermediate file written into the scratch directory.
const DECODED_FILE_NAME: &str = "decoded.wav";

/// How many trailing stderr lines to keep as the diagnostic for a
/// failed invocation.
const DIAGNOSTIC_TAIL_LINES: usize = 20;

/// FFmpeg/ffprobe implementation of [`MediaTool`].
pub struct FfmpegTool {
    /// Path to the ffmpeg executable (None = find in PATH).
    ffmpeg_path: Option<PathBuf>,
    /// Path to the ffprobe executable (None = find in PATH).
    ffprobe_path: Option<PathBuf>,
}

impl FfmpegTool {
    pub fn new() -> Self {
        Self {
            ffmpeg_path: None,
            ffprobe_path: None,
        }
    }

    /// Set a custom path to the ffmpeg executable.
    pub fn with_ffmpeg_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ffmpeg_path = Some(path.into());
        self
    }

    /// Set a custom path to the ffprobe executable.
    pub fn with_ffprobe_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ffprobe_path = Some(path.into());
        self
    }

    fn ffmpeg_cmd(&self) -> &str {
        self.ffmpeg_path
            .as_deref()
            .and_then(Path::to_str)
            .unwrap_or("ffmpeg")
    }

    fn ffprobe_cmd(&self) -> &str {
        self.ffprobe_path
            .as_deref()
            .and_then(Path::to_str)
            .unwrap_or("ffprobe")
    }

    /// Read the intermediate WAV back as a normalized f64 waveform.
    fn read_decoded_wav(input: &Path, wav_path: &Path) -> MediaToolResult<Waveform> {
        let reader = hound::WavReader::open(wav_path).map_err(|e| {
            MediaToolError::decode_failed(
                input.display().to_string(),
                format!("failed to open decoded audio: {}", e),
            )
        })?;

        let spec = reader.spec();
        let sample_rate = spec.sample_rate;

        let samples: Result<Vec<i16>, _> = reader.into_samples::<i16>().collect();
        let samples = samples.map_err(|e| {
            MediaToolError::decode_failed(
                input.display().to_string(),
                format!("failed to read decoded samples: {}", e),
            )
        })?;

        if samples.is_empty() {
            return Err(MediaToolError::decode_failed(
                input.display().to_string(),
                "no audio samples decoded",
            ));
        }

        let samples: Vec<f64> = samples
            .into_iter()
            .map(|s| f64::from(s) / f64::from(i16::MAX))
            .collect();

        Ok(Waveform::new(samples, sample_rate))
    }
}

impl Default for FfmpegTool {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaTool for FfmpegTool {
    fn is_available(&self) -> bool {
        which::which(self.ffmpeg_cmd()).is_ok() && which::which(self.ffprobe_cmd()).is_ok()
    }

    fn decode_to_mono_pcm(&self, input: &Path, scratch_dir: &Path) -> MediaToolResult<Waveform> {
        let wav_path = scratch_dir.join(DECODED_FILE_NAME);

        let mut cmd = Command::new(self.ffmpeg_cmd());
        cmd.arg("-hide_banner")
            .arg("-y")
            .arg("-i")
            .arg(input)
            .arg("-vn") // No video
            .arg("-ac")
            .arg("1") // Mono
            .arg("-ar")
            .arg(DECODE_SAMPLE_RATE.to_string())
            .arg("-acodec")
            .arg("pcm_s16le")
            .arg(&wav_path);

        tracing::debug!("Running FFmpeg (decode): {:?}", cmd);

        let output = cmd.output().map_err(|e| {
            MediaToolError::unavailable(format!("failed to spawn {}: {}", self.ffmpeg_cmd(), e))
        })?;

        if !output.status.success() {
            return Err(MediaToolError::decode_failed(
                input.display().to_string(),
                stderr_tail(&output.stderr),
            ));
        }

        let waveform = Self::read_decoded_wav(input, &wav_path)?;

        tracing::debug!(
            "Decoded {} samples ({:.2}s) from {}",
            waveform.len(),
            waveform.duration(),
            input.display()
        );

        Ok(waveform)
    }

    fn duration_seconds(&self, input: &Path) -> f64 {
        let output = Command::new(self.ffprobe_cmd())
            .arg("-v")
            .arg("error")
            .arg("-show_entries")
            .arg("format=duration")
            .arg("-of")
            .arg("default=noprint_wrappers=1:nokey=1")
            .arg(input)
            .output();

        let output = match output {
            Ok(output) if output.status.success() => output,
            Ok(_) | Err(_) => {
                tracing::debug!("ffprobe duration query failed for {}", input.display());
                return 0.0;
            }
        };

        String::from_utf8_lossy(&output.stdout)
            .trim()
            .parse::<f64>()
            .unwrap_or_else(|_| {
                tracing::debug!("unparseable ffprobe duration for {}", input.display());
                0.0
            })
    }

    fn remux(
        &self,
        video: &Path,
        audio: &Path,
        offset_ms: i64,
        output: &Path,
    ) -> MediaToolResult<()> {
        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| MediaToolError::io_error("creating output directory", e))?;
        }

        let args = build_remux_args(video, audio, offset_ms, output);

        let mut cmd = Command::new(self.ffmpeg_cmd());
        cmd.args(&args);

        tracing::debug!("Running FFmpeg (remux): {:?}", cmd);

        let result = cmd.output().map_err(|e| {
            MediaToolError::unavailable(format!("failed to spawn {}: {}", self.ffmpeg_cmd(), e))
        })?;

        if !result.status.success() {
            return Err(MediaToolError::mux_failed(stderr_tail(&result.stderr)));
        }

        Ok(())
    }
}

/// Last lines of a tool's stderr, joined as one diagnostic string.
fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(DIAGNOSTIC_TAIL_LINES);
    lines[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn stderr_tail_keeps_last_lines() {
        let text: String = (0..40).map(|i| format!("line {}\n", i)).collect();
        let tail = stderr_tail(text.as_bytes());
        assert!(tail.starts_with("line 20"));
        assert!(tail.ends_with("line 39"));
    }

    #[test]
    fn stderr_tail_handles_short_output() {
        let tail = stderr_tail(b"only line");
        assert_eq!(tail, "only line");
    }

    #[test]
    fn read_decoded_wav_round_trips_samples() {
        let dir = tempfile::tempdir().unwrap();
        let wav_path = dir.path().join("decoded.wav");

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: DECODE_SAMPLE_RATE,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&wav_path, spec).unwrap();
        for value in [0i16, 8192, -8192, i16::MAX] {
            writer.write_sample(value).unwrap();
        }
        writer.finalize().unwrap();

        let waveform =
            FfmpegTool::read_decoded_wav(Path::new("in.mkv"), &wav_path).unwrap();
        assert_eq!(waveform.len(), 4);
        assert_eq!(waveform.sample_rate, DECODE_SAMPLE_RATE);
        assert!((waveform.samples[0]).abs() < 1e-9);
        assert!((waveform.samples[3] - 1.0).abs() < 1e-9);
        assert!(waveform.samples.iter().all(|s| (-1.0..=1.0).contains(s)));
    }

    #[test]
    fn read_decoded_wav_rejects_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let wav_path = dir.path().join("decoded.wav");

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: DECODE_SAMPLE_RATE,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        hound::WavWriter::create(&wav_path, spec)
            .unwrap()
            .finalize()
            .unwrap();

        let result = FfmpegTool::read_decoded_wav(Path::new("in.mkv"), &wav_path);
        assert!(matches!(result, Err(MediaToolError::DecodeFailed { .. })));
    }

    #[test]
    fn read_decoded_wav_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let wav_path = dir.path().join("decoded.wav");
        let mut file = std::fs::File::create(&wav_path).unwrap();
        file.write_all(b"not a wav file").unwrap();

        let result = FfmpegTool::read_decoded_wav(Path::new("in.mkv"), &wav_path);
        assert!(matches!(result, Err(MediaToolError::DecodeFailed { .. })));
    }

    #[test]
    fn custom_executable_paths_are_used() {
        let tool = FfmpegTool::new()
            .with_ffmpeg_path("/opt/ffmpeg/bin/ffmpeg")
            .with_ffprobe_path("/opt/ffmpeg/bin/ffprobe");
        assert_eq!(tool.ffmpeg_cmd(), "/opt/ffmpeg/bin/ffmpeg");
        assert_eq!(tool.ffprobe_cmd(), "/opt/ffmpeg/bin/ffprobe");
    }
}

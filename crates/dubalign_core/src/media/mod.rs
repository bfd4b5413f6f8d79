//! External media tool abstraction.
//!
//! Every decode, mux, and duration query shells out to an external media
//! processor (FFmpeg). The [`MediaTool`] trait keeps that capability
//! injectable so the analysis code stays pure and the orchestrator and
//! slot fitter can be tested against mocks.

mod ffmpeg;
mod scratch;

use std::io;
use std::path::Path;

use thiserror::Error;

use crate::analysis::Waveform;

pub use ffmpeg::{FfmpegTool, DECODE_SAMPLE_RATE};
pub use scratch::{ScratchDir, ScratchSpace, TempScratch};

/// Errors from external media tool invocations.
#[derive(Error, Debug)]
pub enum MediaToolError {
    /// The external tool could not be located or executed.
    #[error("media tool unavailable: {0}")]
    ToolUnavailable(String),

    /// The input could not be demuxed or decoded.
    #[error("failed to decode '{input}': {detail}")]
    DecodeFailed { input: String, detail: String },

    /// The remux step exited nonzero.
    #[error("remux failed: {detail}")]
    MuxFailed { detail: String },

    /// File I/O around a tool invocation failed.
    #[error("I/O error in {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: io::Error,
    },
}

impl MediaToolError {
    /// Create a tool-unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::ToolUnavailable(message.into())
    }

    /// Create a decode error carrying the tool's diagnostic text.
    pub fn decode_failed(input: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::DecodeFailed {
            input: input.into(),
            detail: detail.into(),
        }
    }

    /// Create a mux error carrying the tool's diagnostic text.
    pub fn mux_failed(detail: impl Into<String>) -> Self {
        Self::MuxFailed {
            detail: detail.into(),
        }
    }

    /// Create an I/O error with operation context.
    pub fn io_error(operation: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }
}

/// Result type for media tool operations.
pub type MediaToolResult<T> = Result<T, MediaToolError>;

/// Capability interface over the external media processor.
///
/// Implemented by [`FfmpegTool`] for production and by mocks in tests.
pub trait MediaTool: Send + Sync {
    /// Whether the external tool can be located on this system.
    ///
    /// Consulted before a run starts; a `false` here is surfaced to the
    /// caller as a precondition failure.
    fn is_available(&self) -> bool;

    /// Decode any audio or video container into a canonical mono
    /// 16 kHz 16-bit PCM waveform.
    ///
    /// Writes an intermediate file into `scratch_dir`; the caller owns
    /// deletion of that directory.
    fn decode_to_mono_pcm(&self, input: &Path, scratch_dir: &Path) -> MediaToolResult<Waveform>;

    /// Query a media file's duration in seconds.
    ///
    /// Returns 0.0 if the duration cannot be determined - this query
    /// never errors, and callers must treat 0.0 as "unknown".
    fn duration_seconds(&self, input: &Path) -> f64;

    /// Re-mux `video`'s video stream with `audio` shifted by `offset_ms`,
    /// writing the result to `output`.
    ///
    /// The video stream is copied untouched; only the audio is filtered
    /// and re-encoded.
    fn remux(
        &self,
        video: &Path,
        audio: &Path,
        offset_ms: i64,
        output: &Path,
    ) -> MediaToolResult<()>;
}

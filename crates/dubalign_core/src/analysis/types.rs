//! Core types for audio analysis.

use serde::Serialize;

/// Decoded audio samples with their sample rate.
///
/// Samples are mono floats in `[-1.0, 1.0]`. Waveforms are transient:
/// they are produced by the media decoder, consumed by the energy
/// profiler, and never persisted.
#[derive(Debug, Clone)]
pub struct Waveform {
    /// Audio samples (mono).
    pub samples: Vec<f64>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl Waveform {
    /// Create waveform from samples and sample rate.
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the waveform contains no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Low-rate log-energy time series derived from a waveform.
///
/// One value per analysis hop. Values are non-negative (`log10(1 + e)`
/// of a non-negative energy).
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyProfile {
    /// Log-energy values, one per hop.
    pub values: Vec<f64>,
    /// Hop duration in milliseconds.
    pub hop_ms: u32,
}

impl EnergyProfile {
    /// Create a profile from values and hop duration.
    pub fn new(values: Vec<f64>, hop_ms: u32) -> Self {
        Self { values, hop_ms }
    }

    /// Number of hops in the profile.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the profile contains no hops.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Profile duration in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        self.values.len() as u64 * self.hop_ms as u64
    }
}

/// Result of an offset search between two energy series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OffsetResult {
    /// Best offset in milliseconds (a signed multiple of the hop duration).
    ///
    /// Positive means the audio series lags the video reference and must
    /// be delayed by this amount when muxing.
    pub offset_ms: i64,
    /// Normalized cross-correlation score at the best offset.
    ///
    /// Higher is better. `-inf` when no tested shift had any overlap.
    pub score: f64,
}

//! Short-time energy profiling.
//!
//! Converts a PCM waveform into a 10 Hz log-energy envelope using a
//! Hann-windowed analysis. Pure function - no I/O, no side effects,
//! identical input always yields identical output.

use std::f64::consts::PI;

use super::types::{EnergyProfile, Waveform};

/// Analysis window length in milliseconds.
pub const WINDOW_MS: u32 = 200;

/// Analysis hop length in milliseconds (50% overlap).
pub const HOP_MS: u32 = 100;

/// Minimum number of hops for a profile to be usable.
///
/// Anything shorter (source under ~500 ms, or pure silence after decode
/// failure) carries too little structure to correlate.
pub const MIN_PROFILE_LEN: usize = 5;

/// Compute the log-energy profile of a waveform.
///
/// For each hop position where a full window fits, the window of samples
/// is weighted by Hann coefficients, the squared weighted samples are
/// summed and normalized by the sum of the coefficients, and the result
/// is compressed as `log10(1 + e)`. The `1 +` offset keeps silence at
/// exactly zero instead of `-inf`.
///
/// A waveform shorter than one window yields an empty profile.
pub fn compute_energy_profile(waveform: &Waveform) -> EnergyProfile {
    let window_len = (waveform.sample_rate as u64 * WINDOW_MS as u64 / 1000) as usize;
    let hop_len = (waveform.sample_rate as u64 * HOP_MS as u64 / 1000) as usize;

    if window_len == 0 || hop_len == 0 || waveform.len() < window_len {
        return EnergyProfile::new(Vec::new(), HOP_MS);
    }

    let window = hann_window(window_len);
    let window_sum: f64 = window.iter().sum();

    let hop_count = (waveform.len() - window_len) / hop_len + 1;
    let mut values = Vec::with_capacity(hop_count);

    for hop in 0..hop_count {
        let start = hop * hop_len;
        let frame = &waveform.samples[start..start + window_len];

        let mut energy = 0.0;
        for (sample, coeff) in frame.iter().zip(window.iter()) {
            let weighted = sample * coeff;
            energy += weighted * weighted;
        }
        let normalized = energy / window_sum;

        values.push((1.0 + normalized).log10());
    }

    EnergyProfile::new(values, HOP_MS)
}

/// Hann window coefficients: `0.5 * (1 - cos(2*pi*i / (N-1)))`.
fn hann_window(len: usize) -> Vec<f64> {
    if len < 2 {
        return vec![1.0; len];
    }
    let denom = (len - 1) as f64;
    (0..len)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f64 / denom).cos()))
        .collect()
}

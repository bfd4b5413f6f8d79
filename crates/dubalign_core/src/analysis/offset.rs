//! Exhaustive cross-correlation offset search.
//!
//! Both energy series are z-score normalized, then every integer-hop
//! shift within the search window is scored by the mean dot-product over
//! the overlapping region. Pure function - no I/O, no side effects.
//!
//! This is the asymptotically dominant step of a run,
//! O(max_steps * profile_length), and is expected to be called from a
//! worker thread, never a UI thread.

use super::types::OffsetResult;

/// Search window: offsets up to 15 minutes in either direction.
pub const MAX_OFFSET_MS: i64 = 15 * 60 * 1000;

/// Floor applied to the standard deviation during normalization so a
/// constant (silent) series divides cleanly instead of blowing up.
const STDDEV_FLOOR: f64 = 1e-6;

/// Find the integer-hop offset that best aligns `series_b` to `series_a`.
///
/// Positive result: `series_b` lags `series_a` (the audio track must be
/// delayed relative to the video reference). Ties keep the earliest
/// candidate scanned, from `-max_steps` upward.
///
/// If no tested shift has any overlap (one series empty, or both far
/// shorter than the search window), the published offset is 0 with a
/// score of `-inf`.
pub fn find_best_offset(series_a: &[f64], series_b: &[f64], hop_ms: u32) -> OffsetResult {
    let hop_ms = i64::from(hop_ms.max(1));
    let max_steps = MAX_OFFSET_MS / hop_ms;

    let norm_a = z_normalize(series_a);
    let norm_b = z_normalize(series_b);

    let mut best_step: i64 = 0;
    let mut best_score = f64::NEG_INFINITY;

    for step in -max_steps..=max_steps {
        let score = overlap_score(&norm_a, &norm_b, step);
        if score > best_score {
            best_score = score;
            best_step = step;
        }
    }

    OffsetResult {
        offset_ms: best_step * hop_ms,
        score: best_score,
    }
}

/// Z-score normalize a series: `(x - mean) / max(stddev, floor)`.
fn z_normalize(series: &[f64]) -> Vec<f64> {
    if series.is_empty() {
        return Vec::new();
    }

    let n = series.len() as f64;
    let mean = series.iter().sum::<f64>() / n;
    let variance = series.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / n;
    let stddev = variance.sqrt().max(STDDEV_FLOOR);

    series.iter().map(|x| (x - mean) / stddev).collect()
}

/// Mean dot-product of the overlapping region at a given shift.
///
/// A positive step shifts `b` forward (drops its head), a negative step
/// shifts `a` forward. Returns `-inf` when the shift leaves no overlap.
fn overlap_score(a: &[f64], b: &[f64], step: i64) -> f64 {
    let (a_start, b_start) = if step >= 0 {
        (0usize, step as usize)
    } else {
        ((-step) as usize, 0usize)
    };

    if a_start >= a.len() || b_start >= b.len() {
        return f64::NEG_INFINITY;
    }

    let overlap = (a.len() - a_start).min(b.len() - b_start);
    if overlap == 0 {
        return f64::NEG_INFINITY;
    }

    let mut sum = 0.0;
    for i in 0..overlap {
        sum += a[a_start + i] * b[b_start + i];
    }
    sum / overlap as f64
}

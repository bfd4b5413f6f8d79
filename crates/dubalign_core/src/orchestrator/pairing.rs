//! Input pairing and output path derivation.
//!
//! Pairing is order-based: both path lists are sorted lexicographically
//! and zipped by index up to the shorter list's length. Callers must
//! name files so that lexicographic order matches the intended pairing;
//! nothing here matches by content. This is a documented limitation of
//! the pairing contract, kept deliberately simple.

use std::path::{Path, PathBuf};

/// Pair video and audio paths by sorted position.
///
/// Both lists are sorted independently; the longer list's surplus tail
/// is dropped.
pub fn build_pairs(videos: &[PathBuf], audios: &[PathBuf]) -> Vec<(PathBuf, PathBuf)> {
    let mut videos: Vec<PathBuf> = videos.to_vec();
    let mut audios: Vec<PathBuf> = audios.to_vec();
    videos.sort();
    audios.sort();

    videos.into_iter().zip(audios).collect()
}

/// Derive the output path for one pair.
///
/// - Explicit hint and exactly one pair: the hint, verbatim.
/// - Explicit hint shared by several pairs: `_<n>` inserted before the
///   hint's extension, numbering pairs from 1.
/// - No hint: the video's file name prefixed with `prefix`, inside
///   `fallback_dir`.
pub fn derive_output_path(
    video: &Path,
    pair_index: usize,
    pair_count: usize,
    hint: Option<&Path>,
    prefix: &str,
    fallback_dir: &Path,
) -> PathBuf {
    match hint {
        Some(hint) if pair_count == 1 => hint.to_path_buf(),
        Some(hint) => numbered_variant(hint, pair_index + 1),
        None => {
            let file_name = video
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| format!("pair_{}", pair_index + 1));
            fallback_dir.join(format!("{}{}", prefix, file_name))
        }
    }
}

/// Insert `_<n>` before the path's extension.
fn numbered_variant(path: &Path, n: usize) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());

    let file_name = match path.extension() {
        Some(ext) => format!("{}_{}.{}", stem, n, ext.to_string_lossy()),
        None => format!("{}_{}", stem, n),
    };

    path.with_file_name(file_name)
}

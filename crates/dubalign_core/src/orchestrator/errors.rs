//! Error types for alignment runs.
//!
//! Errors carry context that chains through layers:
//! Run -> Pair -> Operation -> Detail. Nothing here is retried; every
//! external invocation is a single attempt.

use thiserror::Error;

use crate::media::MediaToolError;

/// Run-fatal errors.
#[derive(Error, Debug)]
pub enum RunError {
    /// The required external media tool is missing. Checked upfront,
    /// before any work is performed.
    #[error("environment error: {0}")]
    Environment(String),

    /// Input lists were empty or named nonexistent files. Checked
    /// upfront, before any external tool invocation.
    #[error("input error: {0}")]
    Input(String),

    /// A specific pair failed; the run aborted at that pair.
    #[error("pair '{pair}' failed: {source}")]
    Pair {
        pair: String,
        #[source]
        source: PairError,
    },

    /// The run was cancelled between steps.
    #[error("run was cancelled")]
    Cancelled,
}

impl RunError {
    /// Create an environment error.
    pub fn environment(message: impl Into<String>) -> Self {
        Self::Environment(message.into())
    }

    /// Create an input error.
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input(message.into())
    }

    /// Wrap a pair-scoped failure with the pair's title.
    pub fn pair(pair: impl Into<String>, source: PairError) -> Self {
        Self::Pair {
            pair: pair.into(),
            source,
        }
    }
}

/// Failures scoped to one pair's processing.
#[derive(Error, Debug)]
pub enum PairError {
    /// A source could not be demuxed or decoded.
    #[error("decode failed: {0}")]
    Decode(#[source] MediaToolError),

    /// An extracted energy profile was too short to correlate.
    #[error("energy profile of '{src}' has only {hops} hops (minimum {minimum}); source too short or silent")]
    ProfileTooShort {
        src: String,
        hops: usize,
        minimum: usize,
    },

    /// The remux step failed.
    #[error("mux failed: {0}")]
    Mux(#[source] MediaToolError),

    /// A scratch directory could not be created.
    #[error("scratch directory error: {0}")]
    Scratch(#[from] std::io::Error),
}

impl PairError {
    /// Create a profile-too-short error.
    pub fn profile_too_short(source: impl Into<String>, hops: usize, minimum: usize) -> Self {
        Self::ProfileTooShort {
            src: source.into(),
            hops,
            minimum,
        }
    }
}

/// Result type for run operations.
pub type RunResult<T> = Result<T, RunError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_error_chains_through_run_error() {
        let decode = PairError::Decode(MediaToolError::decode_failed(
            "dub.wav",
            "invalid data found",
        ));
        let run = RunError::pair("episode_01", decode);

        let msg = run.to_string();
        assert!(msg.contains("episode_01"));
        assert!(msg.contains("decode failed"));
    }

    #[test]
    fn profile_too_short_names_the_source() {
        let err = PairError::profile_too_short("clip.mkv", 3, 5);
        let msg = err.to_string();
        assert!(msg.contains("clip.mkv"));
        assert!(msg.contains("3 hops"));
        assert!(msg.contains("minimum 5"));
    }
}

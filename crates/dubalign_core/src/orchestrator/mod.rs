//! Alignment run orchestration.
//!
//! A run pairs video and audio inputs, then drives each pair through a
//! fixed sequence: decode both sources, profile both waveforms, search
//! for the best offset, remux. Pairs are processed strictly
//! sequentially; the external tool is the bottleneck and concurrent
//! invocations would contend for the same CPU and disk while
//! complicating scratch cleanup ordering.
//!
//! ```text
//! Idle -> ValidatingInputs -> {ProcessingPair}* -> Completed | Failed
//! ```
//!
//! A failure on any pair aborts the entire run and returns the error
//! together with the logs accumulated so far - alignment failures are
//! never silently partial.

mod errors;
mod pairing;
mod runner;
mod types;

pub use errors::{PairError, RunError, RunResult};
pub use pairing::{build_pairs, derive_output_path};
pub use runner::{AlignmentRunner, CancelHandle};
pub use types::{
    AlignmentPair, AlignmentReport, AlignmentReportEntry, RunRequest, DEFAULT_OUTPUT_PREFIX,
};

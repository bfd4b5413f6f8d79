//! Per-run logging.
//!
//! Each alignment run owns a [`RunLogger`] that accumulates ordered log
//! lines in memory and optionally forwards each line to a caller-supplied
//! sink as it is emitted, so progress is observable *during* the run.
//! Emission is fire-and-forget: the run never depends on whether anyone
//! is listening.

mod run_logger;
mod types;

pub use run_logger::RunLogger;
pub use types::{LogSink, MessagePrefix};

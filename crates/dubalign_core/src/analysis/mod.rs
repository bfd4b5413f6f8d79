//! Audio analysis module for offset detection.
//!
//! The analysis pipeline consists of pure functions that the orchestrator
//! composes together:
//!
//! 1. **Energy Profiling** (`energy`): Convert a decoded waveform into a
//!    low-rate log-energy time series using windowed short-time analysis.
//!
//! 2. **Offset Search** (`offset`): Normalize two energy series and scan a
//!    bounded range of integer-hop shifts for the best cross-correlation.
//!
//! Decoding media files into waveforms lives in [`crate::media`]; nothing
//! in this module does I/O.

mod energy;
mod offset;
pub mod types;

pub use energy::{compute_energy_profile, HOP_MS, MIN_PROFILE_LEN, WINDOW_MS};
pub use offset::{find_best_offset, MAX_OFFSET_MS};
pub use types::{EnergyProfile, OffsetResult, Waveform};

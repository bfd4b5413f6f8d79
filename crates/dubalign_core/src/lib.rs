//! Dubalign Core - backend logic for the dub alignment engine.
//!
//! This crate contains all business logic with zero UI dependencies.
//! It can be used by a GUI application or the `dubalign` CLI tool.
//!
//! The engine takes an unsynchronized video file and an unsynchronized
//! audio file (typically a dub track), finds the time offset that best
//! aligns them by cross-correlating short-time energy envelopes, and
//! re-muxes the audio onto the video at that offset.

pub mod analysis;
pub mod config;
pub mod fitter;
pub mod logging;
pub mod media;
pub mod mux;
pub mod orchestrator;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

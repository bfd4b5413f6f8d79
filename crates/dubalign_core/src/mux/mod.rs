//! Remux command construction.
//!
//! Builds the FFmpeg invocation that re-muxes the original video stream
//! with the offset-shifted audio. Pure token building - execution lives
//! in [`crate::media`].

mod options_builder;

pub use options_builder::{
    build_audio_filter, build_remux_args, MUX_AUDIO_BITRATE_KBPS, MUX_AUDIO_CHANNELS,
    MUX_AUDIO_SAMPLE_RATE,
};

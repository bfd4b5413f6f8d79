//! FFmpeg remux option builder.
//!
//! The video stream is always stream-copied; only the audio is filtered
//! and re-encoded. A non-negative offset delays the audio and pads its
//! tail, a negative offset trims the start instead. `-shortest` keeps
//! the output bounded by the shorter of the two streams.

use std::path::Path;

/// Fixed MP3 bitrate of the re-encoded audio stream.
pub const MUX_AUDIO_BITRATE_KBPS: u32 = 320;

/// Fixed sample rate of the re-encoded audio stream.
pub const MUX_AUDIO_SAMPLE_RATE: u32 = 48000;

/// Fixed channel count of the re-encoded audio stream.
pub const MUX_AUDIO_CHANNELS: u32 = 2;

/// Build the audio filter expression for a given offset.
///
/// `offset_ms >= 0`: pure delay followed by tail padding so the audio is
/// never shorter than required. `offset_ms < 0`: trim the surplus head
/// and restamp so playback starts at zero.
pub fn build_audio_filter(offset_ms: i64) -> String {
    if offset_ms >= 0 {
        format!("adelay={}:all=1,apad", offset_ms)
    } else {
        format!(
            "atrim=start={:.3},asetpts=PTS-STARTPTS",
            (-offset_ms) as f64 / 1000.0
        )
    }
}

/// Build the full FFmpeg argument list for a remux.
pub fn build_remux_args(video: &Path, audio: &Path, offset_ms: i64, output: &Path) -> Vec<String> {
    vec![
        "-hide_banner".to_string(),
        "-y".to_string(),
        "-i".to_string(),
        video.display().to_string(),
        "-i".to_string(),
        audio.display().to_string(),
        "-map".to_string(),
        "0:v:0".to_string(),
        "-map".to_string(),
        "1:a:0".to_string(),
        "-c:v".to_string(),
        "copy".to_string(),
        "-af".to_string(),
        build_audio_filter(offset_ms),
        "-c:a".to_string(),
        "libmp3lame".to_string(),
        "-b:a".to_string(),
        format!("{}k", MUX_AUDIO_BITRATE_KBPS),
        "-ar".to_string(),
        MUX_AUDIO_SAMPLE_RATE.to_string(),
        "-ac".to_string(),
        MUX_AUDIO_CHANNELS.to_string(),
        "-shortest".to_string(),
        output.display().to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn positive_offset_delays_and_pads() {
        assert_eq!(build_audio_filter(300), "adelay=300:all=1,apad");
    }

    #[test]
    fn zero_offset_is_a_zero_delay() {
        assert_eq!(build_audio_filter(0), "adelay=0:all=1,apad");
    }

    #[test]
    fn negative_offset_trims_the_start() {
        assert_eq!(
            build_audio_filter(-1250),
            "atrim=start=1.250,asetpts=PTS-STARTPTS"
        );
    }

    #[test]
    fn remux_args_copy_video_and_reencode_audio() {
        let args = build_remux_args(
            &PathBuf::from("movie.mkv"),
            &PathBuf::from("dub.wav"),
            300,
            &PathBuf::from("out.mkv"),
        );

        let joined = args.join(" ");
        assert!(joined.contains("-c:v copy"));
        assert!(joined.contains("-c:a libmp3lame"));
        assert!(joined.contains("-b:a 320k"));
        assert!(joined.contains("-ar 48000"));
        assert!(joined.contains("-ac 2"));
        assert!(joined.contains("-shortest"));
        assert!(joined.contains("adelay=300"));
        assert_eq!(args.last().unwrap(), "out.mkv");
    }

    #[test]
    fn remux_args_map_video_from_first_input_only() {
        let args = build_remux_args(
            &PathBuf::from("movie.mkv"),
            &PathBuf::from("dub.wav"),
            -100,
            &PathBuf::from("out.mkv"),
        );
        let joined = args.join(" ");
        assert!(joined.contains("-map 0:v:0"));
        assert!(joined.contains("-map 1:a:0"));
        assert!(joined.contains("atrim=start=0.100"));
    }
}

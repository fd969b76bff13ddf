//! Bitrate and recording-size estimation
//!
//! Pure functions over negotiated video settings. The controller feeds the
//! estimate to the recording sink as its target bitrate and multiplies it
//! by elapsed time for the projected on-disk size.

use crate::capture::TrackSettings;

/// Assumed encoding density for VP9-in-WebM output, in bits per pixel.
pub const WEBM_BITS_PER_PIXEL: f64 = 0.06;

/// Estimate a WebM encoding bitrate, in bits per second, for the given
/// video settings. Falls back to 1920x1080 at 30 fps when no settings are
/// available (e.g. an audio-only stream).
pub fn estimate_webm_bitrate(settings: Option<&TrackSettings>) -> f64 {
    let TrackSettings {
        width,
        height,
        frame_rate,
    } = settings.copied().unwrap_or_default();

    let pixels_per_frame = width as f64 * height as f64;
    pixels_per_frame * frame_rate * WEBM_BITS_PER_PIXEL
}

/// Projected recording size in bytes after `elapsed_seconds` of encoding
/// at `bits_per_second`.
pub fn estimated_recording_bytes(elapsed_seconds: u64, bits_per_second: f64) -> f64 {
    elapsed_seconds as f64 * bits_per_second / 8.0
}

//! Capture trait definitions
//!
//! Platform-agnostic types for acquiring a live audio/video stream. The
//! actual device binding (camera, microphone, permission prompts) lives
//! behind [`MediaCapture`]; the crate only consumes negotiated results.

use crate::utils::AppResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which media tracks to request from the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamConstraints {
    /// Request an audio track
    pub audio: bool,

    /// Request a video track
    pub video: bool,
}

/// Negotiated settings of a video track
///
/// These reflect what the device actually granted, not what was requested.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSettings {
    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,

    /// Frame rate in frames per second
    pub frame_rate: f64,
}

impl Default for TrackSettings {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            frame_rate: 30.0,
        }
    }
}

/// A live capture stream handle
///
/// Exclusively owned by whoever acquired it. Dropping the handle releases
/// the underlying device; `release` can be called earlier on any exit path
/// and is idempotent.
pub struct CaptureStream {
    id: Uuid,
    video: Option<TrackSettings>,
    has_audio: bool,
    releaser: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl CaptureStream {
    /// Wrap a platform stream. `releaser` runs exactly once, when the
    /// stream is released or dropped.
    pub fn new(
        video: Option<TrackSettings>,
        has_audio: bool,
        releaser: Option<Box<dyn FnOnce() + Send + Sync>>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            video,
            has_audio,
            releaser,
        }
    }

    /// Unique id of this stream instance
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Negotiated video track settings, if a video track was granted
    pub fn video_settings(&self) -> Option<TrackSettings> {
        self.video
    }

    /// Whether an audio track was granted
    pub fn has_audio(&self) -> bool {
        self.has_audio
    }

    /// Release the underlying device tracks
    pub fn release(&mut self) {
        if let Some(release) = self.releaser.take() {
            tracing::debug!(stream_id = %self.id, "releasing capture stream");
            release();
        }
    }
}

impl Drop for CaptureStream {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for CaptureStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureStream")
            .field("id", &self.id)
            .field("video", &self.video)
            .field("has_audio", &self.has_audio)
            .finish()
    }
}

/// Platform media-capture capability
///
/// Fails with `PermissionDenied` or `DeviceUnavailable` when the user or
/// hardware refuses; callers treat any failure as recording-unavailable.
#[async_trait]
pub trait MediaCapture: Send + Sync {
    /// Request a live stream for the given track constraints
    async fn request_stream(&self, constraints: StreamConstraints) -> AppResult<CaptureStream>;
}

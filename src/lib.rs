//! camrec - webcam recording lifecycle, estimation, and storage gauging.
//!
//! The core of a recording widget without its rendering surface: a
//! [`recorder::RecordingController`] drives start/pause/resume/stop/reset
//! over platform capture and encoding primitives (consumed through the
//! [`capture::MediaCapture`] and [`recorder::SinkFactory`] seams), pure
//! estimators project the recording's bitrate and on-disk size, and a
//! [`storage::StorageGauge`] renders that projection against the origin's
//! storage quota.

pub mod capture;
pub mod estimate;
pub mod export;
pub mod recorder;
pub mod storage;
pub mod utils;

#[cfg(test)]
pub(crate) mod testutil;

pub use capture::{CaptureStream, MediaCapture, StreamConstraints, TrackSettings};
pub use recorder::{CommandOutcome, RecordingController, RecordingEvent, RecordingState};
pub use storage::StorageGauge;
pub use utils::{AppError, AppResult};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging for an application embedding the crate
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "camrec=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("camrec v{} initialized", env!("CARGO_PKG_VERSION"));
}

//! Recording export
//!
//! Assembles delivered segments into a single downloadable blob and hands
//! it to a platform save mechanism.

pub mod saver;

pub use saver::DiskSaver;

use crate::recorder::sink::Segment;
use crate::recorder::state::SessionMeta;
use crate::utils::AppResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Container media type produced by the recording sink
pub const RECORDING_MIME: &str = "video/webm";

/// Suggested file name for a downloaded recording
pub const RECORDING_FILENAME: &str = "recording.webm";

/// A fully assembled recording, ready to save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingBlob {
    /// Segment bytes concatenated in arrival order
    pub data: Vec<u8>,

    /// Media type of the container
    pub mime: &'static str,

    /// Suggested file name
    pub filename: &'static str,
}

impl RecordingBlob {
    /// Concatenate segments in arrival order. Returns `None` when no
    /// segment was ever delivered, so downloads of an empty session are
    /// a no-op.
    pub fn assemble(segments: &[Segment]) -> Option<Self> {
        if segments.is_empty() {
            return None;
        }

        let mut data = Vec::with_capacity(segments.iter().map(Segment::len).sum());
        for segment in segments {
            data.extend_from_slice(segment.as_bytes());
        }

        Some(Self {
            data,
            mime: RECORDING_MIME,
            filename: RECORDING_FILENAME,
        })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Metadata written alongside a saved recording
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingMeta {
    /// Session the recording came from
    pub session_id: Uuid,

    /// When recording started
    pub started_at: DateTime<Utc>,

    /// Seconds spent recording
    pub elapsed_seconds: u64,

    /// Container media type
    pub mime: String,

    /// Blob size in bytes
    pub byte_len: u64,
}

impl RecordingMeta {
    pub fn new(session: &SessionMeta, elapsed_seconds: u64, blob: &RecordingBlob) -> Self {
        Self {
            session_id: session.id,
            started_at: session.started_at,
            elapsed_seconds,
            mime: blob.mime.to_string(),
            byte_len: blob.len() as u64,
        }
    }
}

/// Platform save mechanism for an assembled recording
#[async_trait]
pub trait FileSaver: Send + Sync {
    /// Persist the blob, returning where it landed
    async fn save(&self, blob: &RecordingBlob, meta: &RecordingMeta) -> AppResult<PathBuf>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assemble_concatenates_in_order() {
        let segments = vec![
            Segment(vec![1, 2]),
            Segment(vec![3]),
            Segment(vec![4, 5, 6]),
        ];
        let blob = RecordingBlob::assemble(&segments).unwrap();

        assert_eq!(blob.data, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(blob.mime, "video/webm");
        assert_eq!(blob.filename, "recording.webm");
    }

    #[test]
    fn assemble_of_nothing_is_none() {
        assert_eq!(RecordingBlob::assemble(&[]), None);
    }
}

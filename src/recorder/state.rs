//! Recording state management
//!
//! Defines the recording state machine tag, command outcomes, and the
//! serializable session snapshot.

use crate::capture::TrackSettings;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current state of the recording lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordingState {
    /// No recording in progress
    Idle,
    /// Currently recording
    Recording,
    /// Recording is paused
    Paused,
    /// Recording finished, awaiting download or reset
    Completed,
}

impl Default for RecordingState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Why a command was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RejectReason {
    /// No capture stream has been attached yet
    NoActiveStream,
    /// Command requires the Idle state
    NotIdle,
    /// Command requires the Recording state
    NotRecording,
    /// Command requires the Paused state
    NotPaused,
    /// Command requires the Completed state
    NotCompleted,
    /// The sink has no active recording to act on
    SinkInactive,
}

/// Outcome of a lifecycle command
///
/// A rejected command changes nothing and raises no error; callers that
/// care (UI, tests) can distinguish the two arms.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "outcome")]
pub enum CommandOutcome {
    /// The transition was applied
    Accepted {
        from: RecordingState,
        to: RecordingState,
    },
    /// Precondition failed; state unchanged
    Rejected {
        state: RecordingState,
        reason: RejectReason,
    },
}

impl CommandOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Identity of one start-to-reset recording session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMeta {
    /// Session id
    pub id: Uuid,

    /// When recording started
    pub started_at: DateTime<Utc>,
}

impl SessionMeta {
    /// Create a session starting now
    pub fn begin() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
        }
    }
}

/// Point-in-time view of the controller, shaped for a UI layer
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingSnapshot {
    /// Lifecycle state
    pub status: RecordingState,

    /// Seconds spent in the Recording state
    pub elapsed_seconds: u64,

    /// Whether an audio track will be requested
    pub audio_enabled: bool,

    /// Whether a video track will be requested
    pub video_enabled: bool,

    /// Negotiated video settings of the attached stream
    pub video: Option<TrackSettings>,

    /// Estimated encoding bitrate in bits per second
    pub estimated_bitrate: f64,

    /// Segments delivered so far
    pub segment_count: usize,

    /// Total bytes across delivered segments
    pub recorded_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&RecordingState::Completed).unwrap(),
            "\"completed\""
        );
        assert_eq!(
            serde_json::to_string(&RecordingState::Idle).unwrap(),
            "\"idle\""
        );
    }

    #[test]
    fn outcome_tags_its_variant() {
        let outcome = CommandOutcome::Rejected {
            state: RecordingState::Paused,
            reason: RejectReason::NotRecording,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "rejected");
        assert_eq!(json["reason"], "notRecording");
        assert!(!outcome.is_accepted());
    }

    #[test]
    fn snapshot_uses_camel_case() {
        let snapshot = RecordingSnapshot {
            status: RecordingState::Recording,
            elapsed_seconds: 12,
            audio_enabled: true,
            video_enabled: true,
            video: Some(TrackSettings::default()),
            estimated_bitrate: 3_732_480.0,
            segment_count: 1,
            recorded_bytes: 42,
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["elapsedSeconds"], 12);
        assert_eq!(json["video"]["frameRate"], 30.0);
        assert_eq!(json["recordedBytes"], 42);
    }
}

//! Recording sink abstraction
//!
//! The platform facility that encodes a live capture stream into discrete
//! binary segments. The crate drives the sink through [`RecordingSink`]
//! and receives segments over a channel handed out at open time.

use crate::capture::CaptureStream;
use crate::utils::AppResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Sub-state reported by the platform sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkState {
    /// Not started, or already finalized
    Inactive,
    /// Actively encoding
    Recording,
    /// Suspended between pause and resume
    Paused,
}

/// Options applied when opening a sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SinkOptions {
    /// Target encoding bitrate in bits per second
    pub bits_per_second: u64,
}

/// One encoded chunk delivered by the sink. Arrival order is significant;
/// chunks concatenate in that order to reconstruct the recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment(pub Vec<u8>);

impl Segment {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Receiver side of a sink's segment delivery channel
pub type SegmentReceiver = mpsc::Receiver<Segment>;

/// An open recording sink bound to one capture stream
///
/// Contract: `stop` finalizes the encoder, flushes any pending segment
/// into the delivery channel, and then closes the channel. State errors
/// (e.g. pausing an inactive sink) surface as `AppError::Sink`; the
/// controller checks `state()` first, so a well-behaved caller never
/// triggers them.
#[async_trait]
pub trait RecordingSink: Send {
    /// Current sub-state
    fn state(&self) -> SinkState;

    /// Begin encoding
    async fn start(&mut self) -> AppResult<()>;

    /// Suspend encoding
    async fn pause(&mut self) -> AppResult<()>;

    /// Resume a suspended sink
    async fn resume(&mut self) -> AppResult<()>;

    /// Finalize, flush, and close the segment channel
    async fn stop(&mut self) -> AppResult<()>;
}

/// Opens recording sinks for capture streams
pub trait SinkFactory: Send + Sync {
    /// Bind a new sink to `stream`, returning the sink handle and the
    /// receiving end of its segment channel.
    fn open(
        &self,
        stream: &CaptureStream,
        options: SinkOptions,
    ) -> AppResult<(Box<dyn RecordingSink>, SegmentReceiver)>;
}

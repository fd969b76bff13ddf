//! In-memory fakes for the platform seams, shared across unit tests.

use crate::capture::{CaptureStream, MediaCapture, StreamConstraints, TrackSettings};
use crate::export::{FileSaver, RecordingBlob, RecordingMeta};
use crate::recorder::sink::{
    RecordingSink, Segment, SegmentReceiver, SinkFactory, SinkOptions, SinkState,
};
use crate::utils::{AppError, AppResult};
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Capture device that resolves immediately.
pub struct MockCapture {
    pub settings: TrackSettings,
    pub released: Arc<AtomicUsize>,
    pub deny: bool,
}

impl Default for MockCapture {
    fn default() -> Self {
        Self {
            settings: TrackSettings::default(),
            released: Arc::new(AtomicUsize::new(0)),
            deny: false,
        }
    }
}

impl MockCapture {
    fn stream(&self, constraints: StreamConstraints) -> CaptureStream {
        let released = Arc::clone(&self.released);
        CaptureStream::new(
            constraints.video.then_some(self.settings),
            constraints.audio,
            Some(Box::new(move || {
                released.fetch_add(1, Ordering::SeqCst);
            })),
        )
    }
}

#[async_trait]
impl MediaCapture for MockCapture {
    async fn request_stream(&self, constraints: StreamConstraints) -> AppResult<CaptureStream> {
        if self.deny {
            return Err(AppError::PermissionDenied("media access denied".into()));
        }
        Ok(self.stream(constraints))
    }
}

/// Capture device that resolves only once `gate` is notified, for
/// exercising late acquisition completions.
pub struct GatedCapture {
    pub inner: MockCapture,
    pub gate: Arc<tokio::sync::Notify>,
}

impl GatedCapture {
    pub fn new() -> Self {
        Self {
            inner: MockCapture::default(),
            gate: Arc::new(tokio::sync::Notify::new()),
        }
    }
}

#[async_trait]
impl MediaCapture for GatedCapture {
    async fn request_stream(&self, constraints: StreamConstraints) -> AppResult<CaptureStream> {
        self.gate.notified().await;
        Ok(self.inner.stream(constraints))
    }
}

/// Test-side handle onto an opened [`MockSink`].
#[derive(Clone)]
pub struct MockSinkHandle {
    pub options: SinkOptions,
    pub state: Arc<RwLock<SinkState>>,
    sender: mpsc::WeakSender<Segment>,
}

impl MockSinkHandle {
    /// Deliver a segment mid-recording, as a sink with a timeslice would.
    pub async fn deliver(&self, bytes: Vec<u8>) {
        let sender = self
            .sender
            .upgrade()
            .expect("segment channel already closed");
        sender.send(Segment(bytes)).await.expect("collector gone");
    }

    pub fn state(&self) -> SinkState {
        *self.state.read()
    }
}

struct MockSink {
    state: Arc<RwLock<SinkState>>,
    sender: Option<mpsc::Sender<Segment>>,
    final_segment: Option<Vec<u8>>,
}

#[async_trait]
impl RecordingSink for MockSink {
    fn state(&self) -> SinkState {
        *self.state.read()
    }

    async fn start(&mut self) -> AppResult<()> {
        *self.state.write() = SinkState::Recording;
        Ok(())
    }

    async fn pause(&mut self) -> AppResult<()> {
        *self.state.write() = SinkState::Paused;
        Ok(())
    }

    async fn resume(&mut self) -> AppResult<()> {
        *self.state.write() = SinkState::Recording;
        Ok(())
    }

    async fn stop(&mut self) -> AppResult<()> {
        if let Some(sender) = self.sender.take() {
            if let Some(bytes) = self.final_segment.take() {
                let _ = sender.send(Segment(bytes)).await;
            }
        }
        *self.state.write() = SinkState::Inactive;
        Ok(())
    }
}

/// Factory producing [`MockSink`]s and exposing handles to drive them.
#[derive(Default)]
pub struct MockSinkFactory {
    pub opened: Mutex<Vec<MockSinkHandle>>,
    pub final_segment: Mutex<Option<Vec<u8>>>,
}

impl MockSinkFactory {
    /// Make the next opened sink flush `bytes` when stopped.
    pub fn flush_on_stop(&self, bytes: Vec<u8>) {
        *self.final_segment.lock() = Some(bytes);
    }

    pub fn last_handle(&self) -> MockSinkHandle {
        self.opened.lock().last().cloned().expect("no sink opened")
    }
}

impl SinkFactory for MockSinkFactory {
    fn open(
        &self,
        _stream: &CaptureStream,
        options: SinkOptions,
    ) -> AppResult<(Box<dyn RecordingSink>, SegmentReceiver)> {
        let (tx, rx) = mpsc::channel(32);
        let state = Arc::new(RwLock::new(SinkState::Inactive));
        self.opened.lock().push(MockSinkHandle {
            options,
            state: Arc::clone(&state),
            sender: tx.downgrade(),
        });
        let sink = MockSink {
            state,
            sender: Some(tx),
            final_segment: self.final_segment.lock().take(),
        };
        Ok((Box::new(sink), rx))
    }
}

/// Saver that records what it was asked to persist.
#[derive(Default)]
pub struct MemorySaver {
    pub saved: Mutex<Vec<(RecordingBlob, RecordingMeta)>>,
}

#[async_trait]
impl FileSaver for MemorySaver {
    async fn save(&self, blob: &RecordingBlob, meta: &RecordingMeta) -> AppResult<PathBuf> {
        self.saved.lock().push((blob.clone(), meta.clone()));
        Ok(PathBuf::from(blob.filename))
    }
}

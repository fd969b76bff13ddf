//! Recording lifecycle controller
//!
//! Owns the capture stream, the recording sink, the accumulated segments,
//! and the elapsed-time counter, and drives the Idle -> Recording ->
//! Paused -> Completed -> Idle state machine.

use crate::capture::{CaptureStream, MediaCapture, StreamConstraints, TrackSettings};
use crate::estimate::{estimate_webm_bitrate, estimated_recording_bytes};
use crate::export::{FileSaver, RecordingBlob, RecordingMeta};
use crate::recorder::sink::{RecordingSink, Segment, SegmentReceiver, SinkFactory, SinkOptions, SinkState};
use crate::recorder::state::{
    CommandOutcome, RecordingSnapshot, RecordingState, RejectReason, SessionMeta,
};
use crate::utils::AppResult;
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Events emitted during recording
#[derive(Debug, Clone, PartialEq)]
pub enum RecordingEvent {
    /// A capture stream was acquired and attached
    StreamReady,
    /// Recording started
    Started,
    /// Recording paused
    Paused,
    /// Recording resumed
    Resumed,
    /// Recording stopped
    Stopped,
    /// Session cleared back to Idle
    Reset,
    /// One second of recording elapsed (total seconds so far)
    Progress(u64),
    /// A platform operation failed
    Error(String),
}

/// Drives one recording session over platform capture/record primitives
///
/// All lifecycle commands take `&mut self`; an application embeds the
/// controller behind its own `Arc<Mutex<_>>`. The elapsed-time ticker,
/// segment collector, and stream acquisition run as background tasks that
/// only touch shared slots, and every task is torn down on the state exits
/// that end its purpose.
pub struct RecordingController {
    capture: Arc<dyn MediaCapture>,
    sinks: Arc<dyn SinkFactory>,

    status: Arc<RwLock<RecordingState>>,
    stream: Arc<RwLock<Option<CaptureStream>>>,
    segments: Arc<RwLock<Vec<Segment>>>,
    elapsed: Arc<AtomicU64>,
    /// Set on shutdown; a late-resolving acquisition must not install
    closed: Arc<AtomicBool>,

    audio_enabled: bool,
    video_enabled: bool,

    sink: Option<Box<dyn RecordingSink>>,
    session: Option<SessionMeta>,

    ticker: Option<JoinHandle<()>>,
    collector: Option<JoinHandle<()>>,
    acquisition: Option<JoinHandle<()>>,

    event_tx: broadcast::Sender<RecordingEvent>,
}

impl RecordingController {
    /// Create a controller over the given platform capabilities. Both
    /// tracks start enabled; no stream is requested until
    /// [`open_stream`](Self::open_stream).
    pub fn new(capture: Arc<dyn MediaCapture>, sinks: Arc<dyn SinkFactory>) -> Self {
        let (event_tx, _) = broadcast::channel(100);
        Self {
            capture,
            sinks,
            status: Arc::new(RwLock::new(RecordingState::Idle)),
            stream: Arc::new(RwLock::new(None)),
            segments: Arc::new(RwLock::new(Vec::new())),
            elapsed: Arc::new(AtomicU64::new(0)),
            closed: Arc::new(AtomicBool::new(false)),
            audio_enabled: true,
            video_enabled: true,
            sink: None,
            session: None,
            ticker: None,
            collector: None,
            acquisition: None,
            event_tx,
        }
    }

    /// Subscribe to recording events
    pub fn subscribe(&self) -> broadcast::Receiver<RecordingEvent> {
        self.event_tx.subscribe()
    }

    /// Current lifecycle state
    pub fn status(&self) -> RecordingState {
        *self.status.read()
    }

    /// Seconds spent in the Recording state this session
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed.load(Ordering::SeqCst)
    }

    /// Whether a capture stream is currently attached
    pub fn has_stream(&self) -> bool {
        self.stream.read().is_some()
    }

    /// Negotiated video settings of the attached stream
    pub fn video_settings(&self) -> Option<TrackSettings> {
        self.stream.read().as_ref().and_then(CaptureStream::video_settings)
    }

    /// Estimated encoding bitrate for the attached stream, in bits per
    /// second; defaults apply while no video settings are known
    pub fn estimated_bitrate(&self) -> f64 {
        estimate_webm_bitrate(self.video_settings().as_ref())
    }

    /// Projected recording size so far, in bytes
    pub fn projected_usage_bytes(&self) -> f64 {
        estimated_recording_bytes(self.elapsed_seconds(), self.estimated_bitrate())
    }

    /// Segments delivered so far
    pub fn segment_count(&self) -> usize {
        self.segments.read().len()
    }

    /// Total bytes across delivered segments
    pub fn recorded_bytes(&self) -> u64 {
        self.segments.read().iter().map(|s| s.len() as u64).sum()
    }

    pub fn audio_enabled(&self) -> bool {
        self.audio_enabled
    }

    pub fn video_enabled(&self) -> bool {
        self.video_enabled
    }

    /// Point-in-time view for a UI layer
    pub fn snapshot(&self) -> RecordingSnapshot {
        let segments = self.segments.read();
        RecordingSnapshot {
            status: self.status(),
            elapsed_seconds: self.elapsed_seconds(),
            audio_enabled: self.audio_enabled,
            video_enabled: self.video_enabled,
            video: self.video_settings(),
            estimated_bitrate: self.estimated_bitrate(),
            segment_count: segments.len(),
            recorded_bytes: segments.iter().map(|s| s.len() as u64).sum(),
        }
    }

    /// Enable or disable the audio track request. Only honored while Idle;
    /// takes effect at the next [`open_stream`](Self::open_stream).
    pub fn set_audio_enabled(&mut self, enabled: bool) -> CommandOutcome {
        let status = self.status();
        if status != RecordingState::Idle {
            return self.rejected(status, RejectReason::NotIdle);
        }
        self.audio_enabled = enabled;
        CommandOutcome::Accepted {
            from: status,
            to: status,
        }
    }

    /// Enable or disable the video track request. Only honored while Idle;
    /// takes effect at the next [`open_stream`](Self::open_stream).
    pub fn set_video_enabled(&mut self, enabled: bool) -> CommandOutcome {
        let status = self.status();
        if status != RecordingState::Idle {
            return self.rejected(status, RejectReason::NotIdle);
        }
        self.video_enabled = enabled;
        CommandOutcome::Accepted {
            from: status,
            to: status,
        }
    }

    /// Request a capture stream using the current enablement flags.
    ///
    /// Acquisition runs in the background; `StreamReady` is broadcast once
    /// the stream is attached, `Error` if the platform refuses. A stream
    /// that resolves after [`shutdown`](Self::shutdown) is released instead
    /// of installed. Toggling the enablement flags afterwards does not
    /// re-request; call this again while Idle to re-acquire.
    pub fn open_stream(&mut self) -> CommandOutcome {
        let status = self.status();
        if status != RecordingState::Idle {
            return self.rejected(status, RejectReason::NotIdle);
        }

        let constraints = StreamConstraints {
            audio: self.audio_enabled,
            video: self.video_enabled,
        };
        let capture = Arc::clone(&self.capture);
        let slot = Arc::clone(&self.stream);
        let closed = Arc::clone(&self.closed);
        let events = self.event_tx.clone();

        self.acquisition = Some(tokio::spawn(async move {
            match capture.request_stream(constraints).await {
                Ok(stream) => {
                    if closed.load(Ordering::SeqCst) {
                        // Owner is gone; hand the hardware straight back.
                        drop(stream);
                        return;
                    }
                    tracing::info!(
                        stream_id = %stream.id(),
                        video = ?stream.video_settings(),
                        audio = stream.has_audio(),
                        "capture stream attached"
                    );
                    *slot.write() = Some(stream);
                    let _ = events.send(RecordingEvent::StreamReady);
                }
                Err(err) => {
                    tracing::error!("error accessing media devices: {err}");
                    let _ = events.send(RecordingEvent::Error(err.to_string()));
                }
            }
        }));

        CommandOutcome::Accepted {
            from: status,
            to: status,
        }
    }

    /// Wait for a pending acquisition to settle; returns whether a stream
    /// is attached afterwards
    pub async fn await_stream(&mut self) -> bool {
        if let Some(acquisition) = self.acquisition.take() {
            let _ = acquisition.await;
        }
        self.has_stream()
    }

    /// Start recording the attached stream
    pub async fn start(&mut self) -> AppResult<CommandOutcome> {
        let status = self.status();
        if status != RecordingState::Idle {
            return Ok(self.rejected(status, RejectReason::NotIdle));
        }

        let (mut sink, rx) = {
            let stream = self.stream.read();
            let Some(stream) = stream.as_ref() else {
                return Ok(self.rejected(status, RejectReason::NoActiveStream));
            };
            let bits_per_second = estimate_webm_bitrate(stream.video_settings().as_ref());
            self.sinks.open(
                stream,
                SinkOptions {
                    bits_per_second: bits_per_second.round() as u64,
                },
            )?
        };

        sink.start().await?;
        self.sink = Some(sink);
        self.spawn_collector(rx);
        self.session = Some(SessionMeta::begin());
        self.set_status(RecordingState::Recording);
        self.arm_ticker();
        let _ = self.event_tx.send(RecordingEvent::Started);

        tracing::info!("recording started");
        Ok(CommandOutcome::Accepted {
            from: RecordingState::Idle,
            to: RecordingState::Recording,
        })
    }

    /// Pause an active recording
    pub async fn pause(&mut self) -> AppResult<CommandOutcome> {
        let status = self.status();
        if status != RecordingState::Recording {
            return Ok(self.rejected(status, RejectReason::NotRecording));
        }
        let Some(sink) = self.sink.as_mut() else {
            return Ok(self.rejected(status, RejectReason::SinkInactive));
        };
        if sink.state() != SinkState::Recording {
            return Ok(self.rejected(status, RejectReason::SinkInactive));
        }

        sink.pause().await?;
        self.disarm_ticker();
        self.set_status(RecordingState::Paused);
        let _ = self.event_tx.send(RecordingEvent::Paused);

        tracing::info!("recording paused");
        Ok(CommandOutcome::Accepted {
            from: RecordingState::Recording,
            to: RecordingState::Paused,
        })
    }

    /// Resume a paused recording
    pub async fn resume(&mut self) -> AppResult<CommandOutcome> {
        let status = self.status();
        if status != RecordingState::Paused {
            return Ok(self.rejected(status, RejectReason::NotPaused));
        }
        let Some(sink) = self.sink.as_mut() else {
            return Ok(self.rejected(status, RejectReason::SinkInactive));
        };
        if sink.state() != SinkState::Paused {
            return Ok(self.rejected(status, RejectReason::SinkInactive));
        }

        sink.resume().await?;
        self.set_status(RecordingState::Recording);
        self.arm_ticker();
        let _ = self.event_tx.send(RecordingEvent::Resumed);

        tracing::info!("recording resumed");
        Ok(CommandOutcome::Accepted {
            from: RecordingState::Paused,
            to: RecordingState::Recording,
        })
    }

    /// Stop and finalize the recording
    ///
    /// Waits for the sink to flush its final segments before returning, so
    /// a download issued afterwards sees the full recording.
    pub async fn stop(&mut self) -> AppResult<CommandOutcome> {
        let status = self.status();
        if status != RecordingState::Recording && status != RecordingState::Paused {
            return Ok(self.rejected(status, RejectReason::NotRecording));
        }
        let Some(sink) = self.sink.as_mut() else {
            return Ok(self.rejected(status, RejectReason::SinkInactive));
        };
        if sink.state() == SinkState::Inactive {
            return Ok(self.rejected(status, RejectReason::SinkInactive));
        }

        sink.stop().await?;
        self.disarm_ticker();
        self.sink = None;
        if let Some(collector) = self.collector.take() {
            // The sink closed its segment channel; drain the tail.
            let _ = collector.await;
        }
        self.set_status(RecordingState::Completed);
        let _ = self.event_tx.send(RecordingEvent::Stopped);

        tracing::info!(
            segments = self.segment_count(),
            bytes = self.recorded_bytes(),
            "recording stopped"
        );
        Ok(CommandOutcome::Accepted {
            from: status,
            to: RecordingState::Completed,
        })
    }

    /// Clear the completed session back to Idle
    pub fn reset(&mut self) -> CommandOutcome {
        let status = self.status();
        if status != RecordingState::Completed {
            return self.rejected(status, RejectReason::NotCompleted);
        }

        self.elapsed.store(0, Ordering::SeqCst);
        self.segments.write().clear();
        self.session = None;
        self.set_status(RecordingState::Idle);
        let _ = self.event_tx.send(RecordingEvent::Reset);

        tracing::info!("session reset");
        CommandOutcome::Accepted {
            from: RecordingState::Completed,
            to: RecordingState::Idle,
        }
    }

    /// Assemble the delivered segments and hand them to `saver`
    ///
    /// Returns `Ok(None)` without touching the saver when no segment was
    /// ever delivered.
    pub async fn download(&self, saver: &dyn FileSaver) -> AppResult<Option<PathBuf>> {
        let blob = {
            let segments = self.segments.read();
            RecordingBlob::assemble(&segments)
        };
        let Some(blob) = blob else {
            tracing::debug!("download requested with no recorded segments");
            return Ok(None);
        };

        let session = self.session.clone().unwrap_or_else(SessionMeta::begin);
        let meta = RecordingMeta::new(&session, self.elapsed_seconds(), &blob);
        let path = saver.save(&blob, &meta).await?;
        Ok(Some(path))
    }

    /// Tear down every resource on the way out: stop an active sink,
    /// cancel the ticker and collector, release the capture stream, and
    /// mark the controller closed so a late acquisition cannot install.
    pub async fn shutdown(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
        self.disarm_ticker();

        if let Some(mut sink) = self.sink.take() {
            if sink.state() != SinkState::Inactive {
                if let Err(err) = sink.stop().await {
                    tracing::warn!("sink stop during shutdown failed: {err}");
                }
            }
        }
        if let Some(collector) = self.collector.take() {
            collector.abort();
        }
        if let Some(mut stream) = self.stream.write().take() {
            stream.release();
        }

        tracing::info!("recording controller shut down");
    }

    fn rejected(&self, state: RecordingState, reason: RejectReason) -> CommandOutcome {
        tracing::debug!(?state, ?reason, "command rejected");
        CommandOutcome::Rejected { state, reason }
    }

    fn set_status(&self, status: RecordingState) {
        *self.status.write() = status;
    }

    /// Arm the once-per-second elapsed counter. Active iff Recording;
    /// missed ticks are skipped, not compensated.
    fn arm_ticker(&mut self) {
        self.disarm_ticker();
        let elapsed = Arc::clone(&self.elapsed);
        let events = self.event_tx.clone();
        self.ticker = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // consume the immediate first tick
            interval.tick().await;
            loop {
                interval.tick().await;
                let seconds = elapsed.fetch_add(1, Ordering::SeqCst) + 1;
                let _ = events.send(RecordingEvent::Progress(seconds));
            }
        }));
    }

    fn disarm_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }

    /// Accumulate delivered segments in arrival order, skipping empties.
    fn spawn_collector(&mut self, mut rx: SegmentReceiver) {
        if let Some(stale) = self.collector.take() {
            stale.abort();
        }
        let segments = Arc::clone(&self.segments);
        self.collector = Some(tokio::spawn(async move {
            while let Some(segment) = rx.recv().await {
                if segment.is_empty() {
                    continue;
                }
                tracing::debug!(bytes = segment.len(), "segment delivered");
                segments.write().push(segment);
            }
        }));
    }
}

impl Drop for RecordingController {
    fn drop(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
        if let Some(collector) = self.collector.take() {
            collector.abort();
        }
        if let Some(mut stream) = self.stream.write().take() {
            stream.release();
        }
    }
}

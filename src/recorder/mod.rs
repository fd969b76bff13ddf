//! Recording system module
//!
//! This module implements the recording lifecycle:
//! - RecordingSink trait for the platform encoding facility
//! - RecordingController driving the state machine over it
//! - State, outcome, and snapshot types

pub mod controller;
pub mod sink;
pub mod state;

pub use controller::{RecordingController, RecordingEvent};
pub use sink::{RecordingSink, Segment, SegmentReceiver, SinkFactory, SinkOptions, SinkState};
pub use state::{CommandOutcome, RecordingSnapshot, RecordingState, RejectReason, SessionMeta};

//! Media capture abstraction
//!
//! The device side of stream acquisition is a platform capability; this
//! module defines the trait seam and the handle types the rest of the
//! crate works with.

pub mod traits;

pub use traits::{CaptureStream, MediaCapture, StreamConstraints, TrackSettings};

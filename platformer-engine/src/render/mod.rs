//! Rendering shell
//!
//! The engine draws through a [`RenderContext`] that owns an external
//! [`RenderBackend`]. Only the frame sequencing and device lifecycle live
//! here; real backends plug in behind the trait.

mod context;
mod surface;

pub use context::{DeviceState, RenderContext};
pub use surface::{Color, DrawCommand, FrameOutcome, Recorder, RecordingBackend, RenderBackend};

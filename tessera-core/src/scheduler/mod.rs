//! Frame scheduling
//!
//! Decides when the next frame is due. Rendering and flushing are done by
//! [`Device`](crate::Device) once a tick fires.

pub mod frame;

pub use frame::{FrameScheduler, DEFAULT_FRAME_INTERVAL_MS};

//! Hardware abstraction traits
//!
//! These traits define the interface between the display/connectivity logic
//! and the board-specific pixel output and network transport.

pub mod network;
pub mod sink;

pub use network::{NetworkPort, PortError};
pub use sink::{PixelSink, SinkError};

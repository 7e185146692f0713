//! Pixel output sink

use crate::surface::Surface;

/// Errors that can occur flushing a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SinkError {
    /// Previous frame still being shifted out
    Busy,
}

/// Physical pixel output
///
/// Receives a complete frame plus the global brightness. Implementations
/// own the mapping from grid coordinates to the physical strip.
pub trait PixelSink<const W: usize, const H: usize> {
    /// Push a full frame to the pixels
    fn flush(&mut self, frame: &Surface<W, H>, brightness: u8) -> Result<(), SinkError>;
}

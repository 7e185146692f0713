//! Inbound bar data bridge
//!
//! Owns the magnitude vector the bar visualizer reads. Each accepted
//! payload overwrites it positionally; columns past the end of the decoded
//! array keep their previous values, and a rejected payload changes nothing.

use tessera_protocol::{BarFrame, BarSource, DecodeError};

use crate::surface::MATRIX_WIDTH;

/// Magnitude vector plus the payload field it is fed from
#[derive(Debug, Clone)]
pub struct InboundDataBridge<const W: usize = MATRIX_WIDTH> {
    magnitudes: [f32; W],
    source: BarSource,
}

impl<const W: usize> Default for InboundDataBridge<W> {
    fn default() -> Self {
        Self::new(BarSource::default())
    }
}

impl<const W: usize> InboundDataBridge<W> {
    /// Create a bridge with all magnitudes at zero
    pub fn new(source: BarSource) -> Self {
        Self {
            magnitudes: [0.0; W],
            source,
        }
    }

    /// Field of the payload being read
    pub fn source(&self) -> BarSource {
        self.source
    }

    /// Current magnitudes, one per column
    pub fn magnitudes(&self) -> &[f32; W] {
        &self.magnitudes
    }

    /// Decode `raw` into the vector that accepting it would produce
    pub fn decode(&self, raw: &[u8]) -> Result<[f32; W], DecodeError> {
        let frame = BarFrame::parse(raw, self.source)?;
        let mut next = self.magnitudes;
        frame.apply_to(&mut next);
        Ok(next)
    }

    /// Decode `raw` and replace the magnitude vector
    ///
    /// Returns the number of columns updated.
    pub fn ingest(&mut self, raw: &[u8]) -> Result<usize, DecodeError> {
        let frame = BarFrame::parse(raw, self.source)?;
        Ok(frame.apply_to(&mut self.magnitudes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stale_tail_is_kept() {
        let mut bridge = InboundDataBridge::<4>::default();
        bridge
            .ingest(br#"{"fast_bar_values": [0.1, 0.2, 0.3, 0.4]}"#)
            .unwrap();
        let updated = bridge.ingest(br#"{"fast_bar_values": [0.9, 0.8]}"#).unwrap();

        assert_eq!(updated, 2);
        assert_eq!(bridge.magnitudes(), &[0.9, 0.8, 0.3, 0.4]);
    }

    #[test]
    fn test_extra_entries_are_ignored() {
        let mut bridge = InboundDataBridge::<2>::default();
        let updated = bridge
            .ingest(br#"{"fast_bar_values": [0.5, 0.6, 0.7]}"#)
            .unwrap();
        assert_eq!(updated, 2);
        assert_eq!(bridge.magnitudes(), &[0.5, 0.6]);
    }

    #[test]
    fn test_malformed_leaves_vector_untouched() {
        let mut bridge = InboundDataBridge::<3>::default();
        bridge.ingest(br#"{"fast_bar_values": [0.1, 0.2, 0.3]}"#).unwrap();

        assert_eq!(bridge.ingest(b"{\"fast_bar_values\": [0.9,"), Err(DecodeError::Malformed));
        assert_eq!(
            bridge.ingest(br#"{"slow_bar_values": [0.9]}"#),
            Err(DecodeError::MissingField)
        );
        assert_eq!(
            bridge.ingest(br#"{"fast_bar_values": [0.9, "loud"]}"#),
            Err(DecodeError::InvalidValue)
        );
        assert_eq!(bridge.magnitudes(), &[0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_decode_does_not_mutate() {
        let bridge = InboundDataBridge::<3>::new(BarSource::Slow);
        let next = bridge.decode(br#"{"slow_bar_values": [2.5]}"#).unwrap();
        assert_eq!(next, [2.5, 0.0, 0.0]);
        assert_eq!(bridge.magnitudes(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_out_of_range_values_kept() {
        let mut bridge = InboundDataBridge::<2>::default();
        bridge.ingest(br#"{"fast_bar_values": [-0.5, 7.0]}"#).unwrap();
        assert_eq!(bridge.magnitudes(), &[-0.5, 7.0]);
    }
}

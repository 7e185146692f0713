//! Bar visualization payload
//!
//! The audio service publishes JSON objects of the form
//!
//! ```json
//! {"fast_bar_values": [0.12, 0.5, ...], "slow_bar_values": [0.1, 0.4, ...]}
//! ```
//!
//! One array entry per matrix column. Values are nominally 0.0–1.0 but are
//! not range-checked here.

use alloc::vec::Vec;

use serde::Deserialize;
use serde_json::error::Category;

/// Which of the published bar arrays to display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BarSource {
    /// Quickly decaying peaks (`fast_bar_values`)
    #[default]
    Fast,
    /// Slowly decaying envelope (`slow_bar_values`)
    Slow,
}

impl BarSource {
    /// JSON field this source reads
    pub fn field(self) -> &'static str {
        match self {
            BarSource::Fast => "fast_bar_values",
            BarSource::Slow => "slow_bar_values",
        }
    }
}

/// Reasons a payload was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Not parseable as JSON
    Malformed,
    /// The selected array field is absent
    MissingField,
    /// Field present but not an array of numbers
    InvalidValue,
}

#[derive(Deserialize)]
struct BarPayload {
    fast_bar_values: Option<Vec<f32>>,
    slow_bar_values: Option<Vec<f32>>,
}

/// A decoded bar frame
#[derive(Debug, Clone, PartialEq)]
pub struct BarFrame {
    values: Vec<f32>,
}

impl BarFrame {
    /// Decode a raw payload, selecting the array named by `source`
    pub fn parse(raw: &[u8], source: BarSource) -> Result<Self, DecodeError> {
        let payload: BarPayload = serde_json::from_slice(raw).map_err(|e| match e.classify() {
            Category::Data => DecodeError::InvalidValue,
            Category::Io | Category::Syntax | Category::Eof => DecodeError::Malformed,
        })?;

        let values = match source {
            BarSource::Fast => payload.fast_bar_values,
            BarSource::Slow => payload.slow_bar_values,
        };

        values
            .map(|values| Self { values })
            .ok_or(DecodeError::MissingField)
    }

    /// Decoded values, in column order
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Copy values positionally into `target`
    ///
    /// Entries of `target` beyond the decoded array are left as they were.
    /// Returns the number of entries written.
    pub fn apply_to(&self, target: &mut [f32]) -> usize {
        let count = self.values.len().min(target.len());
        target[..count].copy_from_slice(&self.values[..count]);
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fast_values() {
        let raw = br#"{"fast_bar_values": [0.1, 0.5, 1.0], "slow_bar_values": [0.0]}"#;
        let frame = BarFrame::parse(raw, BarSource::Fast).unwrap();
        assert_eq!(frame.values(), &[0.1, 0.5, 1.0]);
    }

    #[test]
    fn test_parse_slow_values() {
        let raw = br#"{"fast_bar_values": [0.1], "slow_bar_values": [0.25, 0.75]}"#;
        let frame = BarFrame::parse(raw, BarSource::Slow).unwrap();
        assert_eq!(frame.values(), &[0.25, 0.75]);
    }

    #[test]
    fn test_integer_entries_are_numbers() {
        let frame = BarFrame::parse(br#"{"fast_bar_values": [0, 1, 2]}"#, BarSource::Fast).unwrap();
        assert_eq!(frame.values(), &[0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_malformed_json() {
        assert_eq!(
            BarFrame::parse(br#"{"fast_bar_values": [0.1,"#, BarSource::Fast),
            Err(DecodeError::Malformed)
        );
        assert_eq!(
            BarFrame::parse(b"not json", BarSource::Fast),
            Err(DecodeError::Malformed)
        );
    }

    #[test]
    fn test_missing_field() {
        assert_eq!(
            BarFrame::parse(br#"{"slow_bar_values": [0.1]}"#, BarSource::Fast),
            Err(DecodeError::MissingField)
        );
    }

    #[test]
    fn test_non_numeric_entries() {
        assert_eq!(
            BarFrame::parse(br#"{"fast_bar_values": ["loud"]}"#, BarSource::Fast),
            Err(DecodeError::InvalidValue)
        );
    }

    #[test]
    fn test_apply_leaves_tail_untouched() {
        let frame = BarFrame::parse(br#"{"fast_bar_values": [0.5, 0.25]}"#, BarSource::Fast).unwrap();
        let mut target = [0.9f32; 4];
        assert_eq!(frame.apply_to(&mut target), 2);
        assert_eq!(target, [0.5, 0.25, 0.9, 0.9]);
    }

    #[test]
    fn test_apply_truncates_long_arrays() {
        let frame =
            BarFrame::parse(br#"{"fast_bar_values": [0.1, 0.2, 0.3]}"#, BarSource::Fast).unwrap();
        let mut target = [0.0f32; 2];
        assert_eq!(frame.apply_to(&mut target), 2);
        assert_eq!(target, [0.1, 0.2]);
    }
}

//! Render modes
//!
//! Each mode paints the whole surface once per frame. The active mode is
//! fixed by configuration.

pub mod bars;
pub mod life;

pub use bars::BarVisualizer;
pub use life::{Automaton, SEED};

use crate::surface::Rgb;

/// Render mode selected at configuration time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderMode {
    /// Game of Life on the torus
    Life,
    /// Live bar visualization from the data topic
    #[default]
    Bars,
}

impl RenderMode {
    /// Parse the configuration name (`life` or `bars`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "life" => Some(RenderMode::Life),
            "bars" => Some(RenderMode::Bars),
            _ => None,
        }
    }
}

/// Two-colour palette: lit and unlit pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Palette {
    /// Live cell / lit bar segment
    pub on: Rgb,
    /// Dead cell / background
    pub off: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            on: Rgb::WHEAT,
            off: Rgb::BLACK,
        }
    }
}

impl Palette {
    /// Colour for a lit (`true`) or unlit pixel
    pub const fn pick(&self, lit: bool) -> Rgb {
        if lit {
            self.on
        } else {
            self.off
        }
    }
}

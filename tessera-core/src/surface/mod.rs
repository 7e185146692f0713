//! Pixel surface
//!
//! Addressable toroidal grid plus the colour and strip-layout helpers the
//! output sink needs.

pub mod color;
pub mod grid;
pub mod layout;

pub use color::Rgb;
pub use grid::Grid;
pub use layout::{grid_position, strip_index, strip_order};

/// Matrix width in pixels
pub const MATRIX_WIDTH: usize = 64;

/// Matrix height in pixels
pub const MATRIX_HEIGHT: usize = 8;

/// Total pixel count
pub const PIXEL_COUNT: usize = MATRIX_WIDTH * MATRIX_HEIGHT;

/// Colour grid painted by the render modes and flushed to the sink
pub type Surface<const W: usize = MATRIX_WIDTH, const H: usize = MATRIX_HEIGHT> = Grid<Rgb, W, H>;

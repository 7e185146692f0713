//! Vertical bar visualizer
//!
//! Column `i` shows `magnitudes[i]` as a bar growing up from the bottom row.
//! Row `j` is lit when `(H - j) <= magnitude * H + 1`. Magnitudes are not
//! clamped: negative values draw nothing, anything above 1.0 lights the
//! whole column, and 0.0 still lights the bottom row.

use super::Palette;
use crate::surface::Surface;

/// Renders a magnitude vector as bars
#[derive(Debug, Clone, Copy, Default)]
pub struct BarVisualizer;

impl BarVisualizer {
    /// Is row `row` of a column lit for `magnitude`
    pub fn is_lit(magnitude: f32, height: usize, row: usize) -> bool {
        let bar_height = magnitude * height as f32;
        ((height - row) as f32) <= bar_height + 1.0
    }

    /// Number of lit rows in a column for `magnitude`
    pub fn lit_rows(magnitude: f32, height: usize) -> usize {
        (0..height)
            .filter(|&row| Self::is_lit(magnitude, height, row))
            .count()
    }

    /// Paint every column of `surface` from `magnitudes`
    pub fn render<const W: usize, const H: usize>(
        magnitudes: &[f32; W],
        surface: &mut Surface<W, H>,
        palette: &Palette,
    ) {
        for (x, &magnitude) in magnitudes.iter().enumerate() {
            for y in 0..H {
                let lit = Self::is_lit(magnitude, H, y);
                surface.set(x as isize, y as isize, palette.pick(lit));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Rgb;

    const H: usize = 8;

    #[test]
    fn test_zero_lights_bottom_row_only() {
        // bar_height = 0 still satisfies H - j <= 1 for j = H - 1
        assert_eq!(BarVisualizer::lit_rows(0.0, H), 1);
        assert!(BarVisualizer::is_lit(0.0, H, H - 1));
        assert!(!BarVisualizer::is_lit(0.0, H, H - 2));
    }

    #[test]
    fn test_full_magnitude_lights_all_rows() {
        assert_eq!(BarVisualizer::lit_rows(1.0, H), H);
    }

    #[test]
    fn test_one_row_short_of_full() {
        // bar_height = H - 1: every row satisfies H - j <= H
        let magnitude = (H - 1) as f32 / H as f32;
        assert_eq!(BarVisualizer::lit_rows(magnitude, H), H);
    }

    #[test]
    fn test_half_magnitude() {
        // bar_height = 4: rows with H - j <= 5, i.e. j >= 3
        assert_eq!(BarVisualizer::lit_rows(0.5, H), 5);
        assert!(BarVisualizer::is_lit(0.5, H, 3));
        assert!(!BarVisualizer::is_lit(0.5, H, 2));
    }

    #[test]
    fn test_negative_draws_nothing() {
        assert_eq!(BarVisualizer::lit_rows(-0.2, H), 0);
    }

    #[test]
    fn test_overdrive_is_not_clamped() {
        assert_eq!(BarVisualizer::lit_rows(3.5, H), H);
    }

    #[test]
    fn test_render_paints_columns() {
        let mut surface = Surface::<3, 8>::filled(Rgb::new(9, 9, 9));
        let palette = Palette::default();
        BarVisualizer::render(&[1.0, -1.0, 0.5], &mut surface, &palette);

        assert!(surface.column(0).iter().all(|&c| c == Rgb::WHEAT));
        assert!(surface.column(1).iter().all(|&c| c == Rgb::BLACK));
        assert_eq!(
            surface.column(2).iter().filter(|&&c| c == Rgb::WHEAT).count(),
            5
        );
        // Bars grow from the bottom row
        assert_eq!(surface.get(2, 7), Rgb::WHEAT);
        assert_eq!(surface.get(2, 0), Rgb::BLACK);
    }
}

//! Physical strip layout
//!
//! The matrix is one WS2812 strip folded into columns: pixel 0 is the top
//! left corner, column 0 runs downward, column 1 runs back up, and so on.

use super::{Rgb, Surface};

/// Strip offset of grid cell `(x, y)` in a column zigzag of height `height`
pub const fn strip_index(x: usize, y: usize, height: usize) -> usize {
    let offset = if x % 2 == 0 { y } else { height - 1 - y };
    x * height + offset
}

/// Grid cell driven by strip offset `index`
pub const fn grid_position(index: usize, height: usize) -> (usize, usize) {
    let x = index / height;
    let offset = index % height;
    let y = if x % 2 == 0 { offset } else { height - 1 - offset };
    (x, y)
}

/// Colours of `frame` in strip order, scaled by `brightness`
pub fn strip_order<const W: usize, const H: usize>(
    frame: &Surface<W, H>,
    brightness: u8,
) -> impl Iterator<Item = Rgb> + '_ {
    (0..W * H).map(move |index| {
        let (x, y) = grid_position(index, H);
        frame.get(x as isize, y as isize).scale(brightness)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zigzag_columns() {
        assert_eq!(strip_index(0, 0, 8), 0);
        assert_eq!(strip_index(0, 7, 8), 7);
        // Column 1 runs bottom to top
        assert_eq!(strip_index(1, 7, 8), 8);
        assert_eq!(strip_index(1, 0, 8), 15);
        assert_eq!(strip_index(2, 0, 8), 16);
    }

    #[test]
    fn test_grid_position_inverts_strip_index() {
        for x in 0..64 {
            for y in 0..8 {
                assert_eq!(grid_position(strip_index(x, y, 8), 8), (x, y));
            }
        }
    }

    #[test]
    fn test_strip_order_scales_and_reorders() {
        let mut frame = Surface::<2, 3>::filled(Rgb::BLACK);
        frame.set(1, 2, Rgb::new(255, 255, 255));

        let pixels: heapless::Vec<Rgb, 6> = strip_order(&frame, 255).collect();
        // (1, 2) is the first pixel of the upward-running second column
        assert_eq!(pixels[3], Rgb::new(255, 255, 255));
        assert_eq!(pixels.iter().filter(|p| **p != Rgb::BLACK).count(), 1);
    }
}

//! Fixed-size toroidal grid
//!
//! Every coordinate access wraps modulo the grid dimensions, so callers can
//! step off any edge and land on the opposite one.

/// Fixed-size `W` × `H` grid with wrap-around addressing
///
/// Storage is column-major (`cells[x][y]`), matching the column-wise
/// wiring of the LED strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T, const W: usize, const H: usize> {
    cells: [[T; H]; W],
}

impl<T: Copy + Default, const W: usize, const H: usize> Default for Grid<T, W, H> {
    fn default() -> Self {
        Self::filled(T::default())
    }
}

impl<T: Copy, const W: usize, const H: usize> Grid<T, W, H> {
    /// Create a grid with every cell set to `value`
    pub fn filled(value: T) -> Self {
        Self {
            cells: [[value; H]; W],
        }
    }

    /// Grid width (columns)
    pub const fn width(&self) -> usize {
        W
    }

    /// Grid height (rows)
    pub const fn height(&self) -> usize {
        H
    }

    /// Resolve a possibly out-of-range coordinate onto the torus
    pub fn wrap(x: isize, y: isize) -> (usize, usize) {
        (
            x.rem_euclid(W as isize) as usize,
            y.rem_euclid(H as isize) as usize,
        )
    }

    /// Read a cell, wrapping the coordinate
    pub fn get(&self, x: isize, y: isize) -> T {
        let (x, y) = Self::wrap(x, y);
        self.cells[x][y]
    }

    /// Write a cell, wrapping the coordinate
    pub fn set(&mut self, x: isize, y: isize, value: T) {
        let (x, y) = Self::wrap(x, y);
        self.cells[x][y] = value;
    }

    /// Set every cell to `value`
    pub fn fill(&mut self, value: T) {
        for column in &mut self.cells {
            column.fill(value);
        }
    }

    /// Iterate over `(x, y, value)` in column-major order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        self.cells.iter().enumerate().flat_map(|(x, column)| {
            column
                .iter()
                .enumerate()
                .map(move |(y, &value)| (x, y, value))
        })
    }

    /// Borrow one column
    pub fn column(&self, x: isize) -> &[T; H] {
        let (x, _) = Self::wrap(x, 0);
        &self.cells[x]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    type Small = Grid<u8, 5, 3>;

    #[test]
    fn test_wrap_edges_once() {
        // x in {-1, W}, y in {-1, H} land on the opposite edge exactly once
        assert_eq!(Small::wrap(-1, 0), (4, 0));
        assert_eq!(Small::wrap(5, 0), (0, 0));
        assert_eq!(Small::wrap(0, -1), (0, 2));
        assert_eq!(Small::wrap(0, 3), (0, 0));
        assert_eq!(Small::wrap(-1, -1), (4, 2));
        assert_eq!(Small::wrap(5, 3), (0, 0));
    }

    #[test]
    fn test_set_and_get_wrap() {
        let mut grid = Small::default();
        grid.set(-1, -1, 7);
        assert_eq!(grid.get(4, 2), 7);
        assert_eq!(grid.get(-6, -4), 7);
    }

    #[test]
    fn test_fill_and_iter() {
        let mut grid = Small::default();
        grid.fill(2);
        assert_eq!(grid.iter().count(), 15);
        assert!(grid.iter().all(|(_, _, v)| v == 2));
    }

    #[test]
    fn test_iter_is_column_major() {
        let mut grid = Small::default();
        grid.set(1, 0, 9);
        let first_nine = grid.iter().position(|(_, _, v)| v == 9);
        assert_eq!(first_nine, Some(3));
    }

    proptest! {
        #[test]
        fn prop_wrap_stays_in_bounds(x in -1000isize..1000, y in -1000isize..1000) {
            let (wx, wy) = Small::wrap(x, y);
            prop_assert!(wx < 5);
            prop_assert!(wy < 3);
            prop_assert_eq!(Small::wrap(x + 5, y - 3), (wx, wy));
        }
    }
}

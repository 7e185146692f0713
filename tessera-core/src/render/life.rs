//! Game of Life on a torus
//!
//! One generation per frame. Neighbour counts for the whole grid are
//! materialized before any cell changes, so the result does not depend on
//! scan order. A grid that dies out stays dead; nothing reseeds it.

use super::Palette;
use crate::surface::{Grid, Surface, MATRIX_HEIGHT, MATRIX_WIDTH};

/// Boot pattern: a glider near the middle of the 64 × 8 matrix
pub const SEED: [(isize, isize); 5] = [(3, 3), (4, 4), (5, 3), (5, 4), (4, 5)];

/// Relative positions of the eight neighbours
const NEIGHBOURS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Next alive/dead value for a cell with `neighbours` live neighbours
pub fn next_state(alive: bool, neighbours: u8) -> bool {
    if alive {
        !(neighbours < 2 || neighbours > 3)
    } else {
        neighbours == 3
    }
}

/// Automaton state: alive cells plus the neighbour counts of the
/// generation being computed
#[derive(Debug, Clone)]
pub struct Automaton<const W: usize = MATRIX_WIDTH, const H: usize = MATRIX_HEIGHT> {
    cells: Grid<bool, W, H>,
    counts: Grid<u8, W, H>,
    generation: u32,
}

impl<const W: usize, const H: usize> Default for Automaton<W, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize, const H: usize> Automaton<W, H> {
    /// Create an empty (all dead) automaton
    pub fn new() -> Self {
        Self {
            cells: Grid::filled(false),
            counts: Grid::filled(0),
            generation: 0,
        }
    }

    /// Create an automaton with the given cells alive
    pub fn with_cells(alive: &[(isize, isize)]) -> Self {
        let mut automaton = Self::new();
        for &(x, y) in alive {
            automaton.cells.set(x, y, true);
        }
        automaton
    }

    /// Create an automaton holding the boot glider
    pub fn seeded() -> Self {
        Self::with_cells(&SEED)
    }

    /// Current cells
    pub fn cells(&self) -> &Grid<bool, W, H> {
        &self.cells
    }

    /// Neighbour counts from the last generation computed
    pub fn counts(&self) -> &Grid<u8, W, H> {
        &self.counts
    }

    /// Is the cell alive (coordinates wrap)
    pub fn is_alive(&self, x: isize, y: isize) -> bool {
        self.cells.get(x, y)
    }

    /// Number of live cells
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&(_, _, alive)| alive).count()
    }

    /// Generations advanced since creation
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Advance one generation without painting
    pub fn step(&mut self) {
        self.commit(|_, _, _| {});
    }

    /// Advance one generation and repaint every cell
    pub fn advance(&mut self, surface: &mut Surface<W, H>, palette: &Palette) {
        self.commit(|x, y, alive| surface.set(x, y, palette.pick(alive)));
    }

    /// Paint the current generation without advancing
    pub fn paint(&self, surface: &mut Surface<W, H>, palette: &Palette) {
        for (x, y, alive) in self.cells.iter() {
            surface.set(x as isize, y as isize, palette.pick(alive));
        }
    }

    fn count_neighbours(&mut self) {
        for x in 0..W as isize {
            for y in 0..H as isize {
                let count = NEIGHBOURS
                    .iter()
                    .filter(|&&(dx, dy)| self.cells.get(x + dx, y + dy))
                    .count();
                self.counts.set(x, y, count as u8);
            }
        }
    }

    fn commit(&mut self, mut paint: impl FnMut(isize, isize, bool)) {
        self.count_neighbours();
        for x in 0..W as isize {
            for y in 0..H as isize {
                let alive = next_state(self.cells.get(x, y), self.counts.get(x, y));
                self.cells.set(x, y, alive);
                paint(x, y, alive);
            }
        }
        self.generation = self.generation.wrapping_add(1);
    }
}

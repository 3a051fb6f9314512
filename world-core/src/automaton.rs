//! Background cellular automaton: Conway's Game of Life (B3/S23) on a torus.

use rand::Rng;

use crate::error::WorldError;

/// Largest accepted grid, in cells.
pub const MAX_CELLS: usize = 1 << 20;

/// Reject grids too small to wrap or too large to allocate.
pub fn check_dimensions(cols: usize, rows: usize) -> Result<(), WorldError> {
    if cols < 3 || rows < 3 {
        return Err(WorldError::AutomatonTooSmall { cols, rows });
    }
    match cols.checked_mul(rows) {
        Some(cells) if cells <= MAX_CELLS => Ok(()),
        _ => Err(WorldError::AutomatonTooLarge {
            cols,
            rows,
            max: MAX_CELLS,
        }),
    }
}

/// Row-major grid of 0/1 cells whose edges wrap around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Automaton {
    cols: usize,
    rows: usize,
    cells: Vec<u8>,
    scratch: Vec<u8>,
    generation: u64,
}

impl Automaton {
    /// Grid with every cell dead.
    pub fn empty(cols: usize, rows: usize) -> Result<Self, WorldError> {
        check_dimensions(cols, rows)?;
        Ok(Self {
            cols,
            rows,
            cells: vec![0; cols * rows],
            scratch: vec![0; cols * rows],
            generation: 0,
        })
    }

    /// Grid where each cell starts alive with probability `density`.
    pub fn seeded<R: Rng>(
        cols: usize,
        rows: usize,
        density: f64,
        rng: &mut R,
    ) -> Result<Self, WorldError> {
        let mut grid = Self::empty(cols, rows)?;
        for cell in &mut grid.cells {
            *cell = u8::from(rng.random::<f64>() < density);
        }
        Ok(grid)
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        y * self.cols + x
    }

    pub fn get(&self, x: usize, y: usize) -> Option<bool> {
        if x < self.cols && y < self.rows {
            Some(self.cells[self.offset(x, y)] == 1)
        } else {
            None
        }
    }

    pub fn set(&mut self, x: usize, y: usize, alive: bool) {
        if x < self.cols && y < self.rows {
            let idx = self.offset(x, y);
            self.cells[idx] = u8::from(alive);
        }
    }

    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == 1).count()
    }

    fn live_neighbors(&self, x: usize, y: usize) -> u8 {
        let mut n = 0;
        for dy in [self.rows - 1, 0, 1] {
            for dx in [self.cols - 1, 0, 1] {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nx = (x + dx) % self.cols;
                let ny = (y + dy) % self.rows;
                n += self.cells[self.offset(nx, ny)];
            }
        }
        n
    }

    /// Advance one generation.
    pub fn step(&mut self) {
        for y in 0..self.rows {
            for x in 0..self.cols {
                let n = self.live_neighbors(x, y);
                let alive = self.cells[self.offset(x, y)] == 1;
                let idx = self.offset(x, y);
                self.scratch[idx] = u8::from(n == 3 || (alive && n == 2));
            }
        }
        std::mem::swap(&mut self.cells, &mut self.scratch);
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn blinker_oscillates() {
        let mut grid = Automaton::empty(5, 5).unwrap();
        for x in 1..4 {
            grid.set(x, 2, true);
        }
        grid.step();
        assert_eq!(grid.get(2, 1), Some(true));
        assert_eq!(grid.get(2, 3), Some(true));
        assert_eq!(grid.get(1, 2), Some(false));
        assert_eq!(grid.live_count(), 3);
        grid.step();
        assert_eq!(grid.get(1, 2), Some(true));
        assert_eq!(grid.generation(), 2);
    }

    #[test]
    fn block_is_stable_across_the_wrap() {
        let mut grid = Automaton::empty(6, 4).unwrap();
        for (x, y) in [(5, 3), (0, 3), (5, 0), (0, 0)] {
            grid.set(x, y, true);
        }
        let before = grid.cells().to_vec();
        grid.step();
        assert_eq!(grid.cells(), &before[..]);
    }

    #[test]
    fn lonely_cell_dies() {
        let mut grid = Automaton::empty(4, 4).unwrap();
        grid.set(1, 1, true);
        grid.step();
        assert_eq!(grid.live_count(), 0);
    }

    #[test]
    fn seeded_density_is_roughly_respected() {
        let mut rng = StdRng::seed_from_u64(7);
        let grid = Automaton::seeded(60, 30, 0.18, &mut rng).unwrap();
        let ratio = grid.live_count() as f64 / 1800.0;
        assert!((0.13..0.23).contains(&ratio), "ratio {ratio}");
    }

    #[test]
    fn rejects_tiny_grids() {
        assert_eq!(
            Automaton::empty(2, 10),
            Err(WorldError::AutomatonTooSmall { cols: 2, rows: 10 })
        );
        assert_eq!(Automaton::empty(60, 30).unwrap().get(60, 0), None);
    }

    #[test]
    fn rejects_grids_too_large_to_allocate() {
        assert_eq!(
            Automaton::empty(usize::MAX, 3),
            Err(WorldError::AutomatonTooLarge {
                cols: usize::MAX,
                rows: 3,
                max: MAX_CELLS
            })
        );
        assert!(Automaton::empty(2048, 512).is_ok());
        assert!(Automaton::empty(2048, 513).is_err());
    }
}

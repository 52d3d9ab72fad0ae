/*
 * Cellular Automaton Module
 *
 * Conway's Game of Life (B3/S23) on a toroidal grid. The generation being
 * read and the one being written live in two separate buffers that swap after
 * every step, so no cell ever sees a half-updated neighborhood. Rows of the
 * next generation are filled in parallel.
 */

use nannou::prelude::*;
use rand::Rng;
use rayon::prelude::*;

use crate::canvas::{Canvas, Color};
use crate::grid::ToroidalGrid;

pub struct GridAutomaton {
    grid: ToroidalGrid,
    cells: Vec<bool>,
    next: Vec<bool>,
    generation: u64,
}

impl GridAutomaton {
    pub fn new(grid: ToroidalGrid) -> Self {
        Self {
            grid,
            cells: vec![false; grid.len()],
            next: vec![false; grid.len()],
            generation: 0,
        }
    }

    /// Grid with exactly the given (col, row) cells alive. Out-of-range
    /// coordinates wrap.
    pub fn with_alive(grid: ToroidalGrid, alive: &[(usize, usize)]) -> Self {
        let mut automaton = Self::new(grid);
        for &(col, row) in alive {
            automaton.set(col, row, true);
        }
        automaton
    }

    /// Fill every cell independently with probability `density` of being alive.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R, density: f64) {
        let density = if density.is_finite() { density.clamp(0.0, 1.0) } else { 0.0 };
        for cell in &mut self.cells {
            *cell = rng.gen_bool(density);
        }
        self.generation = 0;
    }

    pub fn grid(&self) -> ToroidalGrid {
        self.grid
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    pub fn is_alive(&self, col: usize, row: usize) -> bool {
        self.cells[self.grid.wrapped(col, row, 0, 0)]
    }

    pub fn set(&mut self, col: usize, row: usize, alive: bool) {
        let index = self.grid.wrapped(col, row, 0, 0);
        self.cells[index] = alive;
    }

    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    // Count live cells among the 8 wrapped neighbors
    fn live_neighbors(cells: &[bool], grid: &ToroidalGrid, col: usize, row: usize) -> u8 {
        let mut count = 0;
        for dr in -1..=1 {
            for dc in -1..=1 {
                if (dc, dr) != (0, 0) && cells[grid.wrapped(col, row, dc, dr)] {
                    count += 1;
                }
            }
        }
        count
    }

    /// Advance one generation.
    pub fn step(&mut self) {
        let grid = self.grid;
        let cells = &self.cells;

        self.next
            .par_chunks_mut(grid.cols())
            .enumerate()
            .for_each(|(row, out)| {
                for (col, cell) in out.iter_mut().enumerate() {
                    let alive = cells[grid.index(col, row)];
                    let neighbors = Self::live_neighbors(cells, &grid, col, row);
                    *cell = matches!((alive, neighbors), (true, 2) | (true, 3) | (false, 3));
                }
            });

        std::mem::swap(&mut self.cells, &mut self.next);
        self.generation += 1;
    }

    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C, cell_size: f32, frame: u64) {
        let size = vec2(cell_size, cell_size);
        let shift = frame as f32 * 0.5;

        for (index, _) in self.cells.iter().enumerate().filter(|(_, &alive)| alive) {
            let (col, row) = self.grid.position(index);
            let hue = ((col + row) as f32 + shift).rem_euclid(360.0);
            canvas.rect(
                vec2(col as f32 * cell_size, row as f32 * cell_size),
                size,
                Color::hsla(hue, 0.8, 0.55, 1.0),
            );
        }
    }
}

/*
 * Reaction-Diffusion Module
 *
 * Gray-Scott model on a toroidal grid. Chemical A is fed into the system and
 * consumed by B (A + 2B -> 3B); B decays at the kill rate. Both diffuse with a
 * 3x3 Laplacian (center -8, every neighbor +1). Values are clamped to [0, 1]
 * after every step.
 */

use nannou::prelude::*;
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::canvas::{Canvas, Color};
use crate::grid::ToroidalGrid;

/// Integration step applied to every update.
pub const TIME_STEP: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactionParams {
    pub diffusion_a: f32,
    pub diffusion_b: f32,
    pub feed: f32,
    pub kill: f32,
}

impl Default for ReactionParams {
    fn default() -> Self {
        Self {
            diffusion_a: 1.0,
            diffusion_b: 0.5,
            feed: 0.055,
            kill: 0.062,
        }
    }
}

pub struct ReactionDiffusionField {
    grid: ToroidalGrid,
    a: Vec<f32>,
    b: Vec<f32>,
    next_a: Vec<f32>,
    next_b: Vec<f32>,
    steps: u64,
}

impl ReactionDiffusionField {
    /// Uniform field: A everywhere, no B.
    pub fn new(grid: ToroidalGrid) -> Self {
        let len = grid.len();
        Self {
            grid,
            a: vec![1.0; len],
            b: vec![0.0; len],
            next_a: vec![0.0; len],
            next_b: vec![0.0; len],
            steps: 0,
        }
    }

    /// Reset to the uniform field and drop `droplets` squares of B with the
    /// given half-width. Squares are clipped at the grid edge.
    pub fn seed<R: Rng + ?Sized>(&mut self, rng: &mut R, droplets: usize, radius: usize) {
        self.a.fill(1.0);
        self.b.fill(0.0);
        self.steps = 0;

        let (cols, rows) = (self.grid.cols(), self.grid.rows());
        for _ in 0..droplets {
            let cx = rng.gen_range(0..cols);
            let cy = rng.gen_range(0..rows);
            for row in cy.saturating_sub(radius)..(cy + radius + 1).min(rows) {
                for col in cx.saturating_sub(radius)..(cx + radius + 1).min(cols) {
                    let idx = self.grid.index(col, row);
                    self.b[idx] = 1.0;
                }
            }
        }
    }

    pub fn grid(&self) -> ToroidalGrid {
        self.grid
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn a(&self, col: usize, row: usize) -> f32 {
        self.a[self.grid.wrapped(col, row, 0, 0)]
    }

    pub fn b(&self, col: usize, row: usize) -> f32 {
        self.b[self.grid.wrapped(col, row, 0, 0)]
    }

    pub fn concentrations(&self) -> (&[f32], &[f32]) {
        (&self.a, &self.b)
    }

    pub fn set_cell(&mut self, col: usize, row: usize, a: f32, b: f32) {
        let idx = self.grid.wrapped(col, row, 0, 0);
        self.a[idx] = a.clamp(0.0, 1.0);
        self.b[idx] = b.clamp(0.0, 1.0);
    }

    #[inline]
    fn laplacian(values: &[f32], grid: &ToroidalGrid, col: usize, row: usize) -> f32 {
        let mut sum = 0.0;
        for dr in -1..=1 {
            for dc in -1..=1 {
                let weight = if (dc, dr) == (0, 0) { -8.0 } else { 1.0 };
                sum += weight * values[grid.wrapped(col, row, dc, dr)];
            }
        }
        sum
    }

    /// Advance the field by one time step.
    pub fn step(&mut self, params: &ReactionParams) {
        let grid = self.grid;
        let (a, b) = (&self.a, &self.b);
        let params = *params;

        self.next_a
            .par_chunks_mut(grid.cols())
            .zip(self.next_b.par_chunks_mut(grid.cols()))
            .enumerate()
            .for_each(|(row, (out_a, out_b))| {
                for col in 0..grid.cols() {
                    let idx = grid.index(col, row);
                    let (ca, cb) = (a[idx], b[idx]);
                    let lap_a = Self::laplacian(a, &grid, col, row);
                    let lap_b = Self::laplacian(b, &grid, col, row);
                    let reaction = ca * cb * cb;

                    let next_a = ca + (params.diffusion_a * lap_a - reaction + params.feed * (1.0 - ca)) * TIME_STEP;
                    let next_b = cb + (params.diffusion_b * lap_b + reaction - (params.kill + params.feed) * cb) * TIME_STEP;

                    out_a[col] = clamp_unit(next_a);
                    out_b[col] = clamp_unit(next_b);
                }
            });

        std::mem::swap(&mut self.a, &mut self.next_a);
        std::mem::swap(&mut self.b, &mut self.next_b);
        self.steps += 1;
    }

    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C, cell_size: f32) {
        let size = vec2(cell_size, cell_size);
        for (idx, (&a, &b)) in self.a.iter().zip(&self.b).enumerate() {
            let (col, row) = self.grid.position(idx);
            // a - b in [-1, 1] maps to hues 200..320
            let hue = 260.0 + 60.0 * (a - b);
            canvas.rect(
                vec2(col as f32 * cell_size, row as f32 * cell_size),
                size,
                Color::hsla(hue, 0.3 + 0.7 * a, 0.1 + 0.5 * b, 1.0),
            );
        }
    }
}

// Clamp to [0, 1]; a non-finite intermediate collapses to 0
fn clamp_unit(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

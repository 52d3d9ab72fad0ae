/*
 * Toroidal Grid Module
 *
 * Shared shape for the two cell simulations. Cells are stored row-major in a
 * flat buffer, one row per `cols` entries, so a whole row can be handed to a
 * worker as a contiguous slice. Neighbor lookups wrap at every edge.
 */

use crate::geometry::Bounds;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToroidalGrid {
    cols: usize,
    rows: usize,
}

impl ToroidalGrid {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols: cols.max(1),
            rows: rows.max(1),
        }
    }

    /// Grid covering `bounds` with square cells of `cell_size` points.
    pub fn for_surface(bounds: Bounds, cell_size: f32) -> Self {
        let cell_size = cell_size.max(1.0);
        Self::new(
            (bounds.width / cell_size).floor() as usize,
            (bounds.height / cell_size).floor() as usize,
        )
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.cols * self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn index(&self, col: usize, row: usize) -> usize {
        row * self.cols + col
    }

    #[inline]
    pub fn position(&self, index: usize) -> (usize, usize) {
        (index % self.cols, index / self.cols)
    }

    /// Index of the cell offset by (`dc`, `dr`) from (`col`, `row`), wrapping around.
    #[inline]
    pub fn wrapped(&self, col: usize, row: usize, dc: isize, dr: isize) -> usize {
        let c = (col as isize + dc).rem_euclid(self.cols as isize) as usize;
        let r = (row as isize + dr).rem_euclid(self.rows as isize) as usize;
        self.index(c, r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_from_surface() {
        let grid = ToroidalGrid::for_surface(Bounds::new(803.0, 402.0), 4.0);
        assert_eq!((grid.cols(), grid.rows()), (200, 100));

        let tiny = ToroidalGrid::for_surface(Bounds::new(2.0, 2.0), 4.0);
        assert_eq!((tiny.cols(), tiny.rows()), (1, 1));
    }

    #[test]
    fn test_wrapped_lookup_crosses_edges() {
        let grid = ToroidalGrid::new(5, 4);
        assert_eq!(grid.wrapped(0, 0, -1, -1), grid.index(4, 3));
        assert_eq!(grid.wrapped(4, 3, 1, 1), grid.index(0, 0));
        assert_eq!(grid.wrapped(2, 2, 0, 0), grid.index(2, 2));
        assert_eq!(grid.position(grid.index(3, 2)), (3, 2));
    }
}

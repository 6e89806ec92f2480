//! Toroidal spatial partition
//!
//! Each rock is inserted into all nine cells of the 3x3 block around its home
//! cell. When it lands in a cell it is tested against the rocks already there,
//! never against rocks inserted later. Two nearby rocks usually share several
//! cells, so a pair can be resolved more than once per tick; callers rely on
//! that, the grid does not deduplicate.
//!
//! Cell edge must be at least the largest interaction distance so any pair
//! within reach shares at least one cell.

use glam::Vec2;

/// Flat array of cells holding rock indices
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cols: usize,
    rows: usize,
    cell_size: f32,
    cells: Vec<Vec<usize>>,
}

impl SpatialGrid {
    pub fn new(cols: usize, rows: usize, cell_size: f32) -> Self {
        Self {
            cols,
            rows,
            cell_size,
            cells: vec![Vec::new(); cols * rows],
        }
    }

    /// Empty every cell, keeping allocations
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }

    /// Cell coordinates containing `pos`, wrapped into the grid
    pub fn home_cell(&self, pos: Vec2) -> (usize, usize) {
        let cx = (pos.x / self.cell_size).floor() as i64;
        let cy = (pos.y / self.cell_size).floor() as i64;
        (
            cx.rem_euclid(self.cols as i64) as usize,
            cy.rem_euclid(self.rows as i64) as usize,
        )
    }

    /// Flat indices of the 3x3 block centered on `pos`'s home cell
    pub fn neighborhood(&self, pos: Vec2) -> [usize; 9] {
        let (cx, cy) = self.home_cell(pos);
        let mut out = [0; 9];
        let mut n = 0;
        for dy in [self.rows - 1, 0, 1] {
            for dx in [self.cols - 1, 0, 1] {
                let x = (cx + dx) % self.cols;
                let y = (cy + dy) % self.rows;
                out[n] = y * self.cols + x;
                n += 1;
            }
        }
        out
    }

    /// Insert `rock` into its 3x3 block, calling `on_pair(rock, resident)` for
    /// every rock already present in each cell before the rock joins it.
    pub fn insert_with<F>(&mut self, rock: usize, pos: Vec2, mut on_pair: F)
    where
        F: FnMut(usize, usize),
    {
        for cell in self.neighborhood(pos) {
            for &resident in &self.cells[cell] {
                if resident != rock {
                    on_pair(rock, resident);
                }
            }
            self.cells[cell].push(rock);
        }
    }

    /// Every rock index resident in the 3x3 block around `pos`, one entry per
    /// cell it appears in
    pub fn query(&self, pos: Vec2) -> impl Iterator<Item = usize> + '_ {
        self.neighborhood(pos)
            .into_iter()
            .flat_map(move |cell| self.cells[cell].iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> SpatialGrid {
        SpatialGrid::new(6, 5, 100.0)
    }

    #[test]
    fn test_home_cell_wraps() {
        let g = grid();
        assert_eq!(g.home_cell(Vec2::new(50.0, 50.0)), (0, 0));
        assert_eq!(g.home_cell(Vec2::new(399.0, 299.0)), (3, 2));
        assert_eq!(g.home_cell(Vec2::new(-1.0, 300.0)), (5, 3));
        assert_eq!(g.home_cell(Vec2::new(650.0, 510.0)), (0, 0));
    }

    #[test]
    fn test_neighborhood_wraps_at_corner() {
        let g = grid();
        let mut cells = g.neighborhood(Vec2::new(10.0, 10.0)).to_vec();
        cells.sort_unstable();
        // cols {5, 0, 1}, rows {4, 0, 1}
        let mut expected = vec![];
        for y in [4, 0, 1] {
            for x in [5, 0, 1] {
                expected.push(y * 6 + x);
            }
        }
        expected.sort_unstable();
        assert_eq!(cells, expected);
    }

    #[test]
    fn test_insert_pairs_only_with_earlier_rocks() {
        let mut g = grid();
        let mut pairs = Vec::new();
        g.insert_with(0, Vec2::new(150.0, 150.0), |a, b| pairs.push((a, b)));
        assert!(pairs.is_empty());
        // Same home cell: shares all nine cells
        g.insert_with(1, Vec2::new(160.0, 160.0), |a, b| pairs.push((a, b)));
        assert_eq!(pairs.len(), 9);
        assert!(pairs.iter().all(|&p| p == (1, 0)));
    }

    #[test]
    fn test_diagonal_neighbors_share_four_cells() {
        let mut g = grid();
        let mut pairs = 0;
        g.insert_with(0, Vec2::new(99.0, 99.0), |_, _| pairs += 1);
        g.insert_with(1, Vec2::new(101.0, 101.0), |_, _| pairs += 1);
        assert_eq!(pairs, 4);
    }

    #[test]
    fn test_query_sees_redundant_copies() {
        let mut g = grid();
        g.insert_with(0, Vec2::new(150.0, 150.0), |_, _| {});
        assert_eq!(g.query(Vec2::new(150.0, 150.0)).count(), 9);
        g.clear();
        assert_eq!(g.query(Vec2::new(150.0, 150.0)).count(), 0);
    }
}

use smallvec::SmallVec;
use ultraviolet::DVec2;

use crate::config;
use crate::particle::Particle;

/// Gathered 3x3-neighborhood indices; sized to keep the hot loop off the heap
/// for typical cell occupancy.
pub type NeighborBuf = SmallVec<[usize; 32]>;

/// Uniform broad-phase grid over the arena, rebuilt from scratch every
/// sub-step and never persisted across steps.
pub struct CellList {
    pub width: f64,
    pub height: f64,
    pub cell_width: f64,
    pub cell_height: f64,
    n_cols: usize,
    n_rows: usize,
    cells: Vec<Vec<usize>>, // particle indices per cell, row-major
}

impl CellList {
    /// Cell size is the larger of the maximum influence radius and a fixed
    /// fraction of the arena: coarse enough to bound the cell count, never
    /// finer than the largest interaction range (a finer grid would miss true
    /// neighbors in the 3x3 sweep).
    pub fn new(width: f64, height: f64, max_influence_radius: f64) -> Self {
        let cell_width = max_influence_radius.max(width / config::GRID_COLS_DIVISOR);
        let cell_height = max_influence_radius.max(height / config::GRID_ROWS_DIVISOR);
        let n_cols = (width / cell_width).ceil() as usize;
        let n_rows = (height / cell_height).ceil() as usize;
        Self {
            width,
            height,
            cell_width,
            cell_height,
            n_cols,
            n_rows,
            cells: vec![Vec::new(); n_cols * n_rows],
        }
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Cell coordinate of a position by floor division, clamped to the grid.
    pub fn coord(&self, pos: DVec2) -> (usize, usize) {
        let col = (pos.x / self.cell_width).floor() as isize;
        let row = (pos.y / self.cell_height).floor() as isize;
        let col = col.clamp(0, self.n_cols as isize - 1) as usize;
        let row = row.clamp(0, self.n_rows as isize - 1) as usize;
        (col, row)
    }

    pub fn rebuild(&mut self, particles: &[Particle]) {
        self.cells.clear();
        self.cells.resize(self.n_cols * self.n_rows, Vec::new());
        for (i, p) in particles.iter().enumerate() {
            let (col, row) = self.coord(p.pos);
            self.cells[row * self.n_cols + col].push(i);
        }
    }

    pub fn cell(&self, col: usize, row: usize) -> &[usize] {
        &self.cells[row * self.n_cols + col]
    }

    /// Indices of every particle in the 3x3 block centered on `(col, row)`.
    /// The solver only asks for interior centers; edge centers still answer
    /// with their clipped block.
    pub fn neighborhood(&self, col: usize, row: usize) -> NeighborBuf {
        let mut indices = NeighborBuf::new();
        let c1 = (col + 1).min(self.n_cols - 1);
        let r1 = (row + 1).min(self.n_rows - 1);
        for r in row.saturating_sub(1)..=r1 {
            for c in col.saturating_sub(1)..=c1 {
                indices.extend_from_slice(&self.cells[r * self.n_cols + c]);
            }
        }
        indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle_at(x: f64, y: f64) -> Particle {
        Particle::new(DVec2::new(x, y), 2.0, 75.0, 0)
    }

    #[test]
    fn cell_size_never_finer_than_influence_radius() {
        let grid = CellList::new(1280.0, 720.0, 75.0);
        assert_eq!(grid.cell_width, 75.0);
        assert_eq!(grid.cell_height, 75.0);
        assert_eq!(grid.n_cols(), (1280.0_f64 / 75.0).ceil() as usize);
        assert_eq!(grid.n_rows(), (720.0_f64 / 75.0).ceil() as usize);
    }

    #[test]
    fn small_influence_radius_falls_back_to_arena_fraction() {
        let grid = CellList::new(1000.0, 500.0, 1.0);
        assert_eq!(grid.cell_width, 10.0); // width / 100
        assert_eq!(grid.cell_height, 10.0); // height / 50
        assert_eq!(grid.n_cols(), 100);
        assert_eq!(grid.n_rows(), 50);
    }

    #[test]
    fn rebuild_bins_by_floor_division() {
        let mut grid = CellList::new(1000.0, 500.0, 1.0);
        let particles = vec![
            particle_at(5.0, 5.0),    // cell (0, 0)
            particle_at(15.0, 5.0),   // cell (1, 0)
            particle_at(999.0, 499.0), // cell (99, 49)
            particle_at(15.9, 5.9),   // cell (1, 0) again
        ];
        grid.rebuild(&particles);
        assert_eq!(grid.cell(0, 0), &[0]);
        assert_eq!(grid.cell(1, 0), &[1, 3]);
        assert_eq!(grid.cell(99, 49), &[2]);
    }

    #[test]
    fn rebuild_with_no_particles_leaves_all_cells_empty() {
        let mut grid = CellList::new(1000.0, 500.0, 1.0);
        grid.rebuild(&[]);
        for row in 0..grid.n_rows() {
            for col in 0..grid.n_cols() {
                assert!(grid.cell(col, row).is_empty());
            }
        }
    }

    #[test]
    fn neighborhood_concatenates_the_3x3_block() {
        let mut grid = CellList::new(1000.0, 500.0, 1.0);
        // one particle in the center cell (5, 5), one in each surrounding cell,
        // and one two cells away that must not appear
        let mut particles = Vec::new();
        for dy in -1..=1_i64 {
            for dx in -1..=1_i64 {
                particles.push(particle_at(55.0 + dx as f64 * 10.0, 55.0 + dy as f64 * 10.0));
            }
        }
        particles.push(particle_at(85.0, 55.0)); // cell (8, 5)
        grid.rebuild(&particles);

        let mut neighbors: Vec<usize> = grid.neighborhood(5, 5).to_vec();
        neighbors.sort_unstable();
        assert_eq!(neighbors, (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn edge_neighborhood_is_clipped() {
        let mut grid = CellList::new(1000.0, 500.0, 1.0);
        grid.rebuild(&[particle_at(5.0, 5.0)]);
        let corner = grid.neighborhood(0, 0);
        assert_eq!(corner.as_slice(), &[0]);
    }
}

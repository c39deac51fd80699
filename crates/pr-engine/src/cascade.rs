//! Cascade mechanic — gravity compaction and refill

use rand::Rng;

use crate::grid::{Cell, Grid, Position};
use crate::symbols::SymbolSampler;

/// Compact each column downward, preserving relative vertical order
///
/// Stable: the cell closest to the bottom before compaction stays closest to
/// the bottom after. Vacated slots collect at the top of the column. Sticky
/// cells are ordinary occupants here; they fall and block like any other.
pub fn apply_gravity(grid: &mut Grid) {
    for col in 0..grid.cols() {
        let mut write = grid.rows();
        for row in (0..grid.rows()).rev() {
            if let Some(cell) = grid.take(Position::new(row, col)) {
                write -= 1;
                grid.set(Position::new(write, col), Some(cell));
            }
        }
    }
}

/// Draw fresh symbols into every empty slot
///
/// New cells start unstaged and non-sticky.
pub fn refill<R: Rng + ?Sized>(grid: &mut Grid, sampler: &SymbolSampler, rng: &mut R) {
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let pos = Position::new(row, col);
            if grid.get(pos).is_none() {
                grid.set(pos, Some(Cell::new(sampler.draw(rng))));
            }
        }
    }
}

/// One full cascade step: gravity, then refill
pub fn cascade<R: Rng + ?Sized>(grid: &mut Grid, sampler: &SymbolSampler, rng: &mut R) {
    apply_gravity(grid);
    refill(grid, sampler, rng);
}

//! Free spins bonus — pre-infected grid, sticky multipliers, the Doctor

use rand::Rng;

use crate::config::EngineConfig;
use crate::grid::{Grid, GridMultiplier, OverdoseStage};
use crate::symbols::{SymbolKind, SymbolSampler};

/// Free-spins mode state
///
/// Multipliers created while free spins run live in the sticky set: a Doctor
/// draw wipes them, and so does feature teardown. Permanent multipliers from
/// ordinary play are never touched here.
#[derive(Debug, Clone, Default)]
pub struct FreeSpinsBonus {
    spins_remaining: u32,
    sticky: Vec<GridMultiplier>,
}

impl FreeSpinsBonus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter free spins: seed a fresh grid with a fraction of cells Infected
    pub fn initialize<R: Rng + ?Sized>(
        &mut self,
        config: &EngineConfig,
        sampler: &SymbolSampler,
        rng: &mut R,
    ) -> Grid {
        self.spins_remaining = config.free_spins_count;
        self.sticky.clear();

        let mut grid = Grid::random(config.grid, sampler, rng);
        for pos in grid.positions() {
            if rng.random::<f64>() < config.pre_infected_chance {
                if let Some(cell) = grid.get_mut(pos) {
                    cell.stage = OverdoseStage::Infected;
                    cell.sticky = true;
                }
            }
        }
        grid
    }

    /// Wipe sticky multipliers when a Doctor is on the grid; true if wiped
    pub fn process_doctor(&mut self, grid: &Grid) -> bool {
        if grid.contains_kind(SymbolKind::Doctor) && !self.sticky.is_empty() {
            log::debug!(
                "doctor on grid, clearing {} sticky multipliers",
                self.sticky.len()
            );
            self.sticky.clear();
            return true;
        }
        false
    }

    /// Record multipliers created during free spins, one per position
    pub fn add_sticky_multipliers(&mut self, new: &[GridMultiplier]) {
        for mult in new {
            if !self.sticky.iter().any(|m| m.position == mult.position) {
                self.sticky.push(*mult);
            }
        }
    }

    pub fn decrement(&mut self) {
        self.spins_remaining = self.spins_remaining.saturating_sub(1);
    }

    pub fn is_active(&self) -> bool {
        self.spins_remaining > 0
    }

    pub fn spins_remaining(&self) -> u32 {
        self.spins_remaining
    }

    pub fn sticky_multipliers(&self) -> &[GridMultiplier] {
        &self.sticky
    }

    /// Leave free-spins mode, dropping sticky multipliers
    pub fn reset(&mut self) {
        self.spins_remaining = 0;
        self.sticky.clear();
    }

    #[cfg(test)]
    pub(crate) fn begin(&mut self, spins: u32) {
        self.spins_remaining = spins;
    }
}

//! Spin result types

use serde::{Deserialize, Serialize};

use crate::grid::{Grid, GridMultiplier};
use crate::win::WinResult;

/// Bonus entry decided by the scatter count on the settled grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BonusTrigger {
    #[default]
    None,
    /// 3 scatters
    Shooter,
    /// 4 scatters
    BossBattle,
    /// 5 scatters
    FreeSpins,
}

impl BonusTrigger {
    pub fn is_triggered(&self) -> bool {
        !matches!(self, BonusTrigger::None)
    }
}

/// Complete outcome of one spin
///
/// Immutable value handed to the caller; the engine keeps nothing of it.
/// `cascade_results` is ordered oldest-first, one entry per paying cascade
/// iteration, so the whole win is reconstructible after the fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinResult {
    /// Spin ID
    pub spin_id: String,
    /// Bet amount
    pub bet: f64,
    /// Grid snapshot after the cascade loop settled
    pub final_grid: Grid,
    /// Per-cascade win breakdown
    pub cascade_results: Vec<WinResult>,
    /// Total win including any bonus payout
    pub total_win: f64,
    /// Win-to-bet ratio
    pub win_ratio: f64,
    /// Bonus entered at settlement
    pub bonus_triggered: BonusTrigger,
    /// Win contributed by an immediate bonus game
    pub bonus_win: f64,
    /// Multipliers created during this spin
    pub new_multipliers: Vec<GridMultiplier>,
    /// Did this spin run inside an active free-spins sequence?
    pub is_free_spin: bool,
    /// Free spins left after this spin
    pub free_spins_remaining: u32,
    /// Cascade loop ended via the safety ceiling rather than stability
    pub ceiling_hit: bool,
}

impl SpinResult {
    pub fn is_win(&self) -> bool {
        self.total_win > 0.0
    }

    /// Number of cascade iterations that paid
    pub fn cascade_count(&self) -> usize {
        self.cascade_results.len()
    }
}

//! Overdose Cycle — the per-cell three-stage progression
//!
//! Repeated wins at a position walk it through Infected → Mutated (Wild) →
//! Exploded. The explosion leaves a permanent grid multiplier behind and
//! releases the cell for removal. This module never removes symbols; removal
//! is the cascade's job.

use crate::cluster::Cluster;
use crate::grid::{Grid, GridMultiplier, OverdoseStage};
use crate::symbols::SymbolKind;

/// Advance every winning cell one stage and collect emitted multipliers
///
/// Exactly one transition per cell per call; transitions never chain inside a
/// single cascade iteration. On the Exploded transition a multiplier is
/// emitted only when `existing` has none at that position; a later explosion
/// at an already-multiplied cell emits nothing.
pub fn process_clusters(
    grid: &mut Grid,
    clusters: &[Cluster],
    existing: &[GridMultiplier],
    explosion_multiplier: u32,
) -> Vec<GridMultiplier> {
    let mut emitted: Vec<GridMultiplier> = Vec::new();

    for cluster in clusters {
        for &pos in &cluster.cells {
            let Some(cell) = grid.get_mut(pos) else {
                continue;
            };
            match cell.stage {
                OverdoseStage::None => {
                    cell.stage = OverdoseStage::Infected;
                    cell.sticky = true;
                }
                OverdoseStage::Infected => {
                    cell.stage = OverdoseStage::Mutated;
                    cell.kind = SymbolKind::Wild;
                    cell.sticky = true;
                }
                OverdoseStage::Mutated => {
                    cell.stage = OverdoseStage::Exploded;
                    cell.sticky = false;
                    let occupied = existing
                        .iter()
                        .chain(emitted.iter())
                        .any(|m| m.position == pos);
                    if !occupied {
                        emitted.push(GridMultiplier {
                            position: pos,
                            value: explosion_multiplier,
                            permanent: true,
                        });
                    }
                }
                OverdoseStage::Exploded => {}
            }
        }
    }

    emitted
}

/// Clear winning cells that are eligible for removal
///
/// A cell is removed when it is not sticky, or when it has Exploded.
/// Infected and Mutated cells stay on the grid.
pub fn remove_winning(grid: &mut Grid, clusters: &[Cluster]) {
    for cluster in clusters {
        for &pos in &cluster.cells {
            let removable = grid
                .get(pos)
                .map(|cell| !cell.sticky || cell.stage == OverdoseStage::Exploded)
                .unwrap_or(false);
            if removable {
                grid.set(pos, None);
            }
        }
    }
}

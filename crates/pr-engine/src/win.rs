//! Win calculation — cluster pricing with position multipliers

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::cluster::Cluster;
use crate::grid::{GridMultiplier, Position};
use crate::symbols::PayoutTable;

/// One cascade iteration's priced result
///
/// Keeps the clusters and the effective multiplier so every win amount stays
/// attributable after the fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinResult {
    pub clusters: Vec<Cluster>,
    pub total_win: f64,
    /// Combined grid-multiplier factor applied to this iteration
    pub multiplier: f64,
}

impl WinResult {
    pub fn is_win(&self) -> bool {
        self.total_win > 0.0
    }
}

/// Price a set of clusters against the active grid multipliers
///
/// Base win per cluster is payout × size × bet, summed. Every multiplier
/// sitting on a position touched by any winning cluster compounds
/// multiplicatively into one factor applied to the summed base. The result is
/// clamped to `bet × max_win_multiplier`; the cap applies per cascade
/// iteration, not per spin.
pub fn calculate_win(
    clusters: &[Cluster],
    bet: f64,
    multipliers: &[GridMultiplier],
    payouts: &PayoutTable,
    max_win_multiplier: f64,
) -> WinResult {
    let mut total_win = 0.0;
    for cluster in clusters {
        total_win += payouts.get(cluster.kind) * cluster.size as f64 * bet;
    }

    let touched: HashSet<Position> = clusters
        .iter()
        .flat_map(|c| c.cells.iter().copied())
        .collect();

    let mut factor = 1.0;
    for mult in multipliers {
        if touched.contains(&mult.position) {
            factor *= mult.value as f64;
        }
    }

    total_win = (total_win * factor).min(bet * max_win_multiplier);

    WinResult {
        clusters: clusters.to_vec(),
        total_win,
        multiplier: factor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::SymbolKind::*;

    fn cluster_at(kind: crate::symbols::SymbolKind, cells: Vec<Position>) -> Cluster {
        Cluster {
            kind,
            size: cells.len(),
            cells,
        }
    }

    fn row_of(n: usize) -> Vec<Position> {
        (0..n).map(|col| Position::new(0, col)).collect()
    }

    #[test]
    fn test_simple_cluster_win() {
        // 8 cells at 0.5 per unit with bet 10 → 40
        let mut payouts = PayoutTable::reference();
        payouts.set(Sparky, 0.5);
        let clusters = [cluster_at(Sparky, row_of(8))];
        let result = calculate_win(&clusters, 10.0, &[], &payouts, 50_000.0);
        assert_eq!(result.total_win, 40.0);
        assert_eq!(result.multiplier, 1.0);
    }

    #[test]
    fn test_cluster_wins_sum_across_clusters() {
        let payouts = PayoutTable::reference();
        let clusters = [
            cluster_at(Fish, row_of(8)),
            cluster_at(
                Squirt,
                (0..8).map(|col| Position::new(2, col)).collect(),
            ),
        ];
        let result = calculate_win(&clusters, 1.0, &[], &payouts, 50_000.0);
        // 0.10×8 + 2.0×8
        assert!((result.total_win - 16.8).abs() < 1e-9);
    }

    #[test]
    fn test_multipliers_compound_multiplicatively() {
        let payouts = PayoutTable::reference();
        let clusters = [cluster_at(Fish, row_of(8))];
        let multipliers = [
            GridMultiplier {
                position: Position::new(0, 0),
                value: 2,
                permanent: true,
            },
            GridMultiplier {
                position: Position::new(0, 3),
                value: 2,
                permanent: true,
            },
        ];
        let result = calculate_win(&clusters, 10.0, &multipliers, &payouts, 50_000.0);
        // Two ×2 positions touched → ×4, not ×2+×2
        assert_eq!(result.multiplier, 4.0);
        assert!((result.total_win - 0.10 * 8.0 * 10.0 * 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_untouched_multipliers_do_not_apply() {
        let payouts = PayoutTable::reference();
        let clusters = [cluster_at(Fish, row_of(8))];
        let multipliers = [GridMultiplier {
            position: Position::new(4, 4),
            value: 2,
            permanent: true,
        }];
        let result = calculate_win(&clusters, 10.0, &multipliers, &payouts, 50_000.0);
        assert_eq!(result.multiplier, 1.0);
    }

    #[test]
    fn test_win_cap_clamps_per_iteration() {
        let mut payouts = PayoutTable::reference();
        payouts.set(Squirt, 1_000_000.0);
        let clusters = [cluster_at(Squirt, row_of(8))];
        let result = calculate_win(&clusters, 2.0, &[], &payouts, 50_000.0);
        assert_eq!(result.total_win, 2.0 * 50_000.0);
    }

    #[test]
    fn test_unpaying_kinds_contribute_zero() {
        let payouts = PayoutTable::reference();
        let clusters = [cluster_at(Doctor, row_of(8))];
        let result = calculate_win(&clusters, 10.0, &[], &payouts, 50_000.0);
        assert_eq!(result.total_win, 0.0);
        assert!(!result.is_win());
    }
}

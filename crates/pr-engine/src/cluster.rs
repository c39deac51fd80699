//! Cluster detection — 4-connected flood fill with Wild substitution

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::grid::{Grid, Position};
use crate::symbols::SymbolKind;

/// A maximal 4-connected region of matching symbols
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Paying kind, resolved away from Wild when any ordinary member exists
    pub kind: SymbolKind,
    /// Member positions
    pub cells: Vec<Position>,
    pub size: usize,
}

/// Find all clusters of at least `min_size` cells
///
/// Row-major scan with a global visited set: each cell belongs to at most one
/// cluster per pass. A neighbor joins the fill when its kind equals the
/// seed's, or either side is Wild. Scatter cells never participate. Regions
/// below the threshold are discarded but stay consumed, so they are never
/// re-examined from another seed.
pub fn find_clusters(grid: &Grid, min_size: usize) -> Vec<Cluster> {
    let mut visited = vec![false; grid.len()];
    let mut clusters = Vec::new();

    for pos in grid.positions() {
        if visited[pos.row * grid.cols() + pos.col] {
            continue;
        }
        let Some(seed) = grid.get(pos) else {
            continue;
        };
        if seed.kind.is_scatter() {
            continue;
        }

        let (cells, kind) = flood_fill(grid, pos, seed.kind, &mut visited);
        if cells.len() >= min_size {
            clusters.push(Cluster {
                kind,
                size: cells.len(),
                cells,
            });
        }
    }

    clusters
}

/// BFS flood fill from a seed; returns member positions and the resolved kind
fn flood_fill(
    grid: &Grid,
    start: Position,
    seed_kind: SymbolKind,
    visited: &mut [bool],
) -> (Vec<Position>, SymbolKind) {
    let mut cells = Vec::new();
    let mut queue = VecDeque::from([start]);

    while let Some(pos) = queue.pop_front() {
        if !grid.in_bounds(pos) {
            continue;
        }
        let idx = pos.row * grid.cols() + pos.col;
        if visited[idx] {
            continue;
        }
        let Some(cell) = grid.get(pos) else {
            continue;
        };
        if cell.kind.is_scatter() {
            continue;
        }

        let matches =
            cell.kind == seed_kind || cell.kind.is_wild() || seed_kind.is_wild();
        if !matches {
            continue;
        }

        visited[idx] = true;
        cells.push(pos);

        if pos.row > 0 {
            queue.push_back(Position::new(pos.row - 1, pos.col));
        }
        queue.push_back(Position::new(pos.row + 1, pos.col));
        if pos.col > 0 {
            queue.push_back(Position::new(pos.row, pos.col - 1));
        }
        queue.push_back(Position::new(pos.row, pos.col + 1));
    }

    // A Wild seed reports the first ordinary member; all-Wild regions pay as Wild
    let kind = if seed_kind.is_wild() {
        cells
            .iter()
            .filter_map(|&p| grid.get(p))
            .map(|c| c.kind)
            .find(|k| !k.is_wild())
            .unwrap_or(SymbolKind::Wild)
    } else {
        seed_kind
    };

    (cells, kind)
}

/// Flat count of Scatter cells on the grid
pub fn count_scatters(grid: &Grid) -> usize {
    grid.count_kind(SymbolKind::Scatter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use SymbolKind::*;

    fn connected(cells: &[Position]) -> bool {
        // Every returned cluster must be one 4-connected region
        if cells.is_empty() {
            return false;
        }
        let mut seen = vec![cells[0]];
        let mut frontier = vec![cells[0]];
        while let Some(pos) = frontier.pop() {
            for other in cells {
                if seen.contains(other) {
                    continue;
                }
                let adjacent = (pos.row.abs_diff(other.row) == 1 && pos.col == other.col)
                    || (pos.col.abs_diff(other.col) == 1 && pos.row == other.row);
                if adjacent {
                    seen.push(*other);
                    frontier.push(*other);
                }
            }
        }
        seen.len() == cells.len()
    }

    #[test]
    fn test_simple_cluster_of_eight() {
        // One connected block of 8 Fish on an otherwise quiet 5×5 grid
        let grid = Grid::from_rows(&[
            vec![Fish, Fish, Fish, Fish, Can],
            vec![Fish, Fish, Fish, Fish, Sparky],
            vec![Can, Sparky, Can, Sparky, Can],
            vec![Sparky, Can, Sparky, Can, Sparky],
            vec![Can, Sparky, Can, Sparky, Can],
        ]);
        let clusters = find_clusters(&grid, 4);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].kind, Fish);
        assert_eq!(clusters[0].size, 8);
        assert!(connected(&clusters[0].cells));
    }

    #[test]
    fn test_no_cluster_below_min_size() {
        let grid = Grid::from_rows(&[
            vec![Fish, Fish, Can],
            vec![Can, Sparky, Fish],
            vec![Sparky, Can, Sparky],
        ]);
        assert!(find_clusters(&grid, 4).is_empty());
    }

    #[test]
    fn test_min_size_invariant() {
        let grid = Grid::from_rows(&[
            vec![Fish, Fish, Fish, Fish, Fish, Fish],
            vec![Pills, Pills, Pills, Can, Can, Can],
            vec![Fish, Fish, Fish, Fish, Fish, Fish],
            vec![Can, Can, Pills, Pills, Sparky, Sparky],
            vec![Fish, Fish, Fish, Sparky, Zippo, Zippo],
        ]);
        for cluster in find_clusters(&grid, 6) {
            assert!(cluster.size >= 6);
            assert!(connected(&cluster.cells));
        }
    }

    #[test]
    fn test_wild_assisted_cluster() {
        // 6 Fish + 2 Wilds, all 4-connected: size 8, pays as Fish
        let grid = Grid::from_rows(&[
            vec![Fish, Fish, Fish, Can, Sparky],
            vec![Wild, Wild, Fish, Sparky, Can],
            vec![Fish, Fish, Can, Can, Sparky],
            vec![Can, Sparky, Sparky, Can, Can],
            vec![Sparky, Can, Can, Sparky, Sparky],
        ]);
        let clusters = find_clusters(&grid, 8);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].size, 8);
        assert_eq!(clusters[0].kind, Fish);
    }

    #[test]
    fn test_all_wild_cluster_pays_as_wild() {
        // Scatters fence the Wilds in, so no ordinary kind can resolve the payer
        let grid = Grid::from_rows(&[
            vec![Wild, Wild, Scatter],
            vec![Wild, Wild, Scatter],
        ]);
        let clusters = find_clusters(&grid, 4);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].size, 4);
        assert_eq!(clusters[0].kind, Wild);
    }

    #[test]
    fn test_wild_seed_absorbs_everything_reachable() {
        // A Wild seed matches every non-scatter neighbor, so mixed kinds merge
        let grid = Grid::from_rows(&[
            vec![Wild, Wild, Can],
            vec![Wild, Wild, Sparky],
        ]);
        let clusters = find_clusters(&grid, 4);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].size, 6);
        assert_eq!(clusters[0].kind, Can);
    }

    #[test]
    fn test_scatters_never_cluster() {
        let grid = Grid::from_rows(&[
            vec![Scatter, Scatter, Scatter],
            vec![Scatter, Scatter, Scatter],
            vec![Scatter, Scatter, Scatter],
        ]);
        assert!(find_clusters(&grid, 4).is_empty());
        assert_eq!(count_scatters(&grid), 9);
    }

    #[test]
    fn test_scatter_blocks_connectivity() {
        // Two Fish arms joined only through a Scatter do not merge
        let grid = Grid::from_rows(&[
            vec![Fish, Fish, Scatter, Fish, Fish],
            vec![Can, Sparky, Can, Sparky, Can],
        ]);
        assert!(find_clusters(&grid, 3).is_empty());
    }

    #[test]
    fn test_each_cell_in_at_most_one_cluster() {
        // A Wild bridging two kinds is consumed by the first scan to reach it
        let grid = Grid::from_rows(&[
            vec![Fish, Fish, Wild, Pills, Pills],
            vec![Fish, Fish, Can, Pills, Pills],
        ]);
        let clusters = find_clusters(&grid, 4);
        let mut all_cells: Vec<Position> = clusters.iter().flat_map(|c| c.cells.clone()).collect();
        let before = all_cells.len();
        all_cells.sort();
        all_cells.dedup();
        assert_eq!(all_cells.len(), before);
    }

    #[test]
    fn test_count_scatters_flat() {
        let grid = Grid::from_rows(&[
            vec![Fish, Scatter, Fish],
            vec![Scatter, Fish, Scatter],
        ]);
        assert_eq!(count_scatters(&grid), 3);
    }
}

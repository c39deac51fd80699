//! Grid state: cells, positions, and grid multipliers

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::GridSpec;
use crate::symbols::{SymbolKind, SymbolSampler};

/// A grid position (row 0 = top, col 0 = left)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Overdose Cycle stage of a cell
///
/// Advances one step per winning participation, never regresses:
/// None → Infected → Mutated → Exploded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverdoseStage {
    #[default]
    None,
    Infected,
    Mutated,
    Exploded,
}

/// One occupied grid slot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub kind: SymbolKind,
    pub stage: OverdoseStage,
    /// Sticky cells (Infected or Mutated) survive cascade removal
    pub sticky: bool,
}

impl Cell {
    /// A freshly drawn cell
    pub fn new(kind: SymbolKind) -> Self {
        Self {
            kind,
            stage: OverdoseStage::None,
            sticky: false,
        }
    }
}

/// A permanent multiplier anchored to a grid position
///
/// Emitted by the Exploded transition of the Overdose Cycle. At most one
/// active multiplier exists per position in any set the win calculator sees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridMultiplier {
    pub position: Position,
    pub value: u32,
    pub permanent: bool,
}

/// Fixed-size symbol grid, row-major
///
/// Slots are `None` only transiently while a cascade is being processed;
/// at every phase boundary observed by callers the grid is full.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Option<Cell>>,
}

impl Grid {
    /// An all-empty grid
    pub fn empty(spec: GridSpec) -> Self {
        Self {
            rows: spec.rows,
            cols: spec.cols,
            cells: vec![None; spec.rows * spec.cols],
        }
    }

    /// A full grid drawn from the given weight table
    pub fn random<R: Rng + ?Sized>(spec: GridSpec, sampler: &SymbolSampler, rng: &mut R) -> Self {
        let mut grid = Self::empty(spec);
        for slot in grid.cells.iter_mut() {
            *slot = Some(Cell::new(sampler.draw(rng)));
        }
        grid
    }

    /// Build a grid from explicit rows of kinds; rows must share one width
    pub fn from_rows(rows: &[Vec<SymbolKind>]) -> Self {
        let cols = rows.first().map(|r| r.len()).unwrap_or(0);
        let cells = rows
            .iter()
            .flat_map(|row| row.iter().map(|&kind| Some(Cell::new(kind))))
            .collect();
        Self {
            rows: rows.len(),
            cols,
            cells,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of slots
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    fn index(&self, pos: Position) -> usize {
        pos.row * self.cols + pos.col
    }

    pub fn get(&self, pos: Position) -> Option<&Cell> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.cells[self.index(pos)].as_ref()
    }

    pub fn get_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        if !self.in_bounds(pos) {
            return None;
        }
        let idx = self.index(pos);
        self.cells[idx].as_mut()
    }

    pub fn set(&mut self, pos: Position, cell: Option<Cell>) {
        if self.in_bounds(pos) {
            let idx = self.index(pos);
            self.cells[idx] = cell;
        }
    }

    /// Remove and return the cell at a position
    pub fn take(&mut self, pos: Position) -> Option<Cell> {
        if !self.in_bounds(pos) {
            return None;
        }
        let idx = self.index(pos);
        self.cells[idx].take()
    }

    /// All positions in row-major scan order
    pub fn positions(&self) -> Vec<Position> {
        let mut out = Vec::with_capacity(self.cells.len());
        for row in 0..self.rows {
            for col in 0..self.cols {
                out.push(Position { row, col });
            }
        }
        out
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// True when every slot holds a cell
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }

    pub fn contains_kind(&self, kind: SymbolKind) -> bool {
        self.cells
            .iter()
            .flatten()
            .any(|cell| cell.kind == kind)
    }

    pub fn count_kind(&self, kind: SymbolKind) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| cell.kind == kind)
            .count()
    }
}

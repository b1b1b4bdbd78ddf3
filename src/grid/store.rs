//! Hex offset grid storage
//!
//! Rows alternate between `cols_even` and `cols_even - 1` cells, odd rows
//! shifted half a cell to the right (brick-wall layout). The shape is fixed at
//! construction. Per-kind counters are kept in step with every mutation so
//! presence queries never scan the grid.

use std::collections::HashMap;

use super::cell::{Cell, CellKind, GridPos};
use crate::error::GridError;

/// Neighbor offsets (row, col) for cells in even rows
const EVEN_ROW_NEIGHBORS: [(isize, isize); 6] = [(-1, -1), (-1, 0), (0, -1), (0, 1), (1, -1), (1, 0)];
/// Neighbor offsets (row, col) for cells in odd rows
const ODD_ROW_NEIGHBORS: [(isize, isize); 6] = [(-1, 0), (-1, 1), (0, -1), (0, 1), (1, 0), (1, 1)];

/// The bubble grid
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    cols_even: usize,
    cells: Vec<Vec<Option<Cell>>>,
    counts: HashMap<CellKind, usize>,
    occupied: usize,
}

impl Grid {
    /// Empty grid. With fewer than 2 columns the odd rows hold no cells.
    pub fn new(rows: usize, cols_even: usize) -> Self {
        let cells = (0..rows)
            .map(|row| vec![None; row_width(row, cols_even)])
            .collect();
        Self {
            rows,
            cols_even,
            cells,
            counts: HashMap::new(),
            occupied: 0,
        }
    }

    /// Build a grid from explicit rows, checking the brick-wall shape
    pub fn from_layout(layout: &[Vec<Option<CellKind>>]) -> Result<Self, GridError> {
        let rows = layout.len();
        let cols_even = layout.first().map_or(0, Vec::len);
        if rows == 0 || cols_even < 2 {
            return Err(GridError::BadDimensions {
                rows,
                columns: cols_even,
            });
        }

        let mut grid = Grid::new(rows, cols_even);
        for (row, cells) in layout.iter().enumerate() {
            let expected = row_width(row, cols_even);
            if cells.len() != expected {
                return Err(GridError::RowWidth {
                    row,
                    expected,
                    found: cells.len(),
                });
            }
            for (col, kind) in cells.iter().enumerate() {
                if let Some(kind) = kind {
                    grid.set(GridPos::new(row, col), Some(Cell::new(*kind)));
                }
            }
        }
        Ok(grid)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols_even(&self) -> usize {
        self.cols_even
    }

    /// Number of columns in `row`
    pub fn cols_in_row(&self, row: usize) -> usize {
        row_width(row, self.cols_even)
    }

    pub fn is_in_bounds(&self, pos: GridPos) -> bool {
        pos.row < self.rows && pos.col < self.cols_in_row(pos.row)
    }

    pub fn get(&self, pos: GridPos) -> Option<&Cell> {
        self.cells.get(pos.row)?.get(pos.col)?.as_ref()
    }

    pub fn is_occupied(&self, pos: GridPos) -> bool {
        self.get(pos).is_some()
    }

    /// Replace the contents of a cell and return what was there.
    /// Out-of-bounds writes are ignored.
    pub fn set(&mut self, pos: GridPos, cell: Option<Cell>) -> Option<Cell> {
        let slot = self.cells.get_mut(pos.row)?.get_mut(pos.col)?;
        let previous = std::mem::replace(slot, cell);

        if let Some(old) = &previous {
            if let Some(count) = self.counts.get_mut(&old.kind) {
                *count -= 1;
                if *count == 0 {
                    self.counts.remove(&old.kind);
                }
            }
            self.occupied -= 1;
        }
        if let Some(new) = &cell {
            *self.counts.entry(new.kind).or_insert(0) += 1;
            self.occupied += 1;
        }
        previous
    }

    /// Checked insertion
    pub fn insert(&mut self, pos: GridPos, cell: Cell) -> Result<Option<Cell>, GridError> {
        if !self.is_in_bounds(pos) {
            return Err(GridError::OutOfBounds {
                row: pos.row,
                col: pos.col,
            });
        }
        Ok(self.set(pos, Some(cell)))
    }

    pub fn remove(&mut self, pos: GridPos) -> Option<Cell> {
        self.set(pos, None)
    }

    /// In-bounds neighbor addresses, occupied or not
    pub fn neighbor_positions(&self, pos: GridPos) -> impl Iterator<Item = GridPos> + '_ {
        let offsets = if pos.is_even_row() {
            &EVEN_ROW_NEIGHBORS
        } else {
            &ODD_ROW_NEIGHBORS
        };
        offsets.iter().filter_map(move |&(dr, dc)| {
            let row = pos.row.checked_add_signed(dr)?;
            let col = pos.col.checked_add_signed(dc)?;
            let p = GridPos::new(row, col);
            self.is_in_bounds(p).then_some(p)
        })
    }

    /// Occupied neighbors
    pub fn neighbors(&self, pos: GridPos) -> impl Iterator<Item = (GridPos, &Cell)> + '_ {
        self.neighbor_positions(pos)
            .filter_map(move |p| self.get(p).map(|c| (p, c)))
    }

    /// Every occupied cell in row-major order
    pub fn occupied(&self) -> impl Iterator<Item = (GridPos, &Cell)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter_map(move |(col, c)| c.as_ref().map(|c| (GridPos::new(row, col), c)))
        })
    }

    /// Occupied cells in one row
    pub fn row_positions(&self, row: usize) -> Vec<GridPos> {
        self.cells.get(row).map_or_else(Vec::new, |cells| {
            cells
                .iter()
                .enumerate()
                .filter(|(_, c)| c.is_some())
                .map(|(col, _)| GridPos::new(row, col))
                .collect()
        })
    }

    /// Addresses of every cell holding `kind`
    pub fn positions_of_kind(&self, kind: CellKind) -> Vec<GridPos> {
        if !self.is_kind_in_grid(kind) {
            return Vec::new();
        }
        self.occupied()
            .filter(|(_, c)| c.kind == kind)
            .map(|(p, _)| p)
            .collect()
    }

    /// Presence check backed by the running counters
    pub fn is_kind_in_grid(&self, kind: CellKind) -> bool {
        self.count_of_kind(kind) > 0
    }

    pub fn count_of_kind(&self, kind: CellKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Whether any normal (colored) bubble remains
    pub fn has_normal_cells(&self) -> bool {
        self.counts.keys().any(CellKind::is_normal)
    }

    /// Number of occupied cells
    pub fn len(&self) -> usize {
        self.occupied
    }

    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }
}

#[inline]
fn row_width(row: usize, cols_even: usize) -> usize {
    if row % 2 == 0 { cols_even } else { cols_even.saturating_sub(1) }
}

//! Flat column-major symbol grid

use serde::{Deserialize, Serialize};

use crate::config::GridSpec;
use crate::error::{MathError, MathResult};

/// Grid position as (reel, row); row 0 is the top
pub type Position = (u8, u8);

/// Symbol grid of `columns × rows` cells stored at `col * rows + row`.
///
/// Multiplier cells keep the value they landed with in a parallel vector
/// (0 = no value).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    columns: u8,
    rows: u8,
    cells: Vec<u32>,
    multipliers: Vec<u32>,
}

impl Grid {
    /// Grid with every cell holding `symbol_id`
    pub fn filled(spec: GridSpec, symbol_id: u32) -> Self {
        let len = spec.total_positions();
        Self {
            columns: spec.columns,
            rows: spec.rows,
            cells: vec![symbol_id; len],
            multipliers: vec![0; len],
        }
    }

    /// Build from flat column-major cells
    pub fn from_cells(spec: GridSpec, cells: Vec<u32>) -> MathResult<Self> {
        if cells.len() != spec.total_positions() {
            return Err(MathError::GridDimensionMismatch {
                expected_columns: spec.columns,
                expected_rows: spec.rows,
                columns: cells.len() / spec.rows.max(1) as usize,
                rows: spec.rows as usize,
            });
        }
        let len = cells.len();
        Ok(Self {
            columns: spec.columns,
            rows: spec.rows,
            cells,
            multipliers: vec![0; len],
        })
    }

    /// Build from reels (outer = columns, inner = rows top to bottom)
    pub fn from_columns(columns: Vec<Vec<u32>>) -> MathResult<Self> {
        let rows = columns.first().map(Vec::len).unwrap_or(0);
        let ragged = columns.iter().find(|c| c.len() != rows).map(Vec::len);
        if columns.is_empty()
            || rows == 0
            || columns.len() > u8::MAX as usize
            || rows > u8::MAX as usize
            || ragged.is_some()
        {
            return Err(MathError::GridDimensionMismatch {
                expected_columns: columns.len().min(u8::MAX as usize) as u8,
                expected_rows: rows.min(u8::MAX as usize) as u8,
                columns: columns.len(),
                rows: ragged.unwrap_or(rows),
            });
        }

        let spec = GridSpec::new(columns.len() as u8, rows as u8);
        Self::from_cells(spec, columns.into_iter().flatten().collect())
    }

    /// Reject a grid whose dimensions differ from `spec`
    pub fn check_spec(&self, spec: &GridSpec) -> MathResult<()> {
        let total = spec.total_positions();
        if self.columns != spec.columns
            || self.rows != spec.rows
            || self.cells.len() != total
            || self.multipliers.len() != total
        {
            return Err(MathError::GridDimensionMismatch {
                expected_columns: spec.columns,
                expected_rows: spec.rows,
                columns: self.columns as usize,
                rows: self.rows as usize,
            });
        }
        Ok(())
    }

    pub fn columns(&self) -> u8 {
        self.columns
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn spec(&self) -> GridSpec {
        GridSpec::new(self.columns, self.rows)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Flat index for a position, None when out of bounds
    #[inline]
    pub fn index(&self, (col, row): Position) -> Option<usize> {
        if col < self.columns && row < self.rows {
            Some(col as usize * self.rows as usize + row as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn position(&self, index: usize) -> Position {
        let rows = self.rows as usize;
        ((index / rows) as u8, (index % rows) as u8)
    }

    pub fn get(&self, pos: Position) -> Option<u32> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Replace a cell's symbol; its multiplier value is cleared.
    /// Returns false when out of bounds.
    pub fn set(&mut self, pos: Position, symbol_id: u32) -> bool {
        match self.index(pos) {
            Some(i) => {
                self.cells[i] = symbol_id;
                self.multipliers[i] = 0;
                true
            }
            None => false,
        }
    }

    pub fn multiplier_value(&self, pos: Position) -> Option<u32> {
        self.index(pos)
            .map(|i| self.multipliers[i])
            .filter(|&v| v > 0)
    }

    pub fn set_multiplier_value(&mut self, pos: Position, value: u32) -> bool {
        match self.index(pos) {
            Some(i) => {
                self.multipliers[i] = value;
                true
            }
            None => false,
        }
    }

    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    /// All positions in column-major scan order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.columns).flat_map(move |col| (0..self.rows).map(move |row| (col, row)))
    }

    /// In-bounds 4-directional neighbours (no diagonals)
    pub fn neighbors(&self, (col, row): Position) -> impl Iterator<Item = Position> + '_ {
        const DIRS: [(i16, i16); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];
        DIRS.iter().filter_map(move |&(dc, dr)| {
            let c = col as i16 + dc;
            let r = row as i16 + dr;
            if c >= 0 && r >= 0 && c < self.columns as i16 && r < self.rows as i16 {
                Some((c as u8, r as u8))
            } else {
                None
            }
        })
    }

    pub fn positions_of(&self, symbol_id: u32) -> Vec<Position> {
        self.positions()
            .filter(|&p| self.get(p) == Some(symbol_id))
            .collect()
    }

    pub fn count(&self, symbol_id: u32) -> usize {
        self.cells.iter().filter(|&&s| s == symbol_id).count()
    }

    /// Reels as nested vectors (presentation layers want this shape)
    pub fn to_columns(&self) -> Vec<Vec<u32>> {
        self.cells
            .chunks(self.rows as usize)
            .map(<[u32]>::to_vec)
            .collect()
    }
}

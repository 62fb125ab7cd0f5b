//! Fog-of-war bitmap congruent to the terrain grid.

use maze_explorer_core::{Grid, Position};

/// Dense row-major record of revealed cells. Cells are never hidden again.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Visibility {
    rows: u32,
    columns: u32,
    cells: Vec<bool>,
    revealed: usize,
}

impl Visibility {
    /// Creates a fully hidden bitmap matching the grid dimensions.
    #[must_use]
    pub fn for_grid(grid: &Grid) -> Self {
        Self {
            rows: grid.rows(),
            columns: grid.columns(),
            cells: vec![false; grid.len()],
            revealed: 0,
        }
    }

    /// Marks the cell as revealed. Returns `true` when it was hidden before.
    pub fn reveal(&mut self, position: Position) -> bool {
        let Some(cell) = self.index(position).and_then(|index| self.cells.get_mut(index)) else {
            return false;
        };
        if *cell {
            return false;
        }
        *cell = true;
        self.revealed += 1;
        true
    }

    /// Whether the cell has been revealed. Out-of-bounds cells never are.
    #[must_use]
    pub fn is_revealed(&self, position: Position) -> bool {
        self.index(position)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(false)
    }

    /// Number of revealed cells.
    #[must_use]
    pub const fn revealed_count(&self) -> usize {
        self.revealed
    }

    /// Revealed cells in row-major order.
    pub fn iter_revealed(&self) -> impl Iterator<Item = Position> + '_ {
        let columns = self.columns;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, revealed)| **revealed)
            .filter_map(move |(index, _)| {
                let index = u32::try_from(index).ok()?;
                Some(Position::new(index / columns, index % columns))
            })
    }

    fn index(&self, position: Position) -> Option<usize> {
        if position.row() >= self.rows || position.column() >= self.columns {
            return None;
        }
        let row = usize::try_from(position.row()).ok()?;
        let column = usize::try_from(position.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

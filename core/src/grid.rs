//! Immutable terrain grid and the comma-separated maze format.

use thiserror::Error;

use crate::{Position, TerrainCode};

/// Rectangular terrain map. Immutable after construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: u32,
    columns: u32,
    cells: Vec<TerrainCode>,
}

impl Grid {
    /// Builds a grid from rows of terrain, rejecting empty or ragged input.
    pub fn new(rows: Vec<Vec<TerrainCode>>) -> Result<Self, GridError> {
        let expected = rows.first().map_or(0, Vec::len);
        if expected == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::with_capacity(expected * rows.len());
        for (index, row) in rows.iter().enumerate() {
            if row.len() != expected {
                return Err(GridError::Ragged {
                    row: index,
                    expected,
                    found: row.len(),
                });
            }
            cells.extend_from_slice(row);
        }

        let row_count = u32::try_from(rows.len()).map_err(|_| GridError::TooLarge)?;
        let column_count = u32::try_from(expected).map_err(|_| GridError::TooLarge)?;

        Ok(Self {
            rows: row_count,
            columns: column_count,
            cells,
        })
    }

    /// Parses a comma-separated matrix of terrain codes, one row per line.
    ///
    /// Blank lines are skipped and whitespace around values is ignored.
    pub fn parse(source: &str) -> Result<Self, GridError> {
        let mut rows = Vec::new();
        for (row, line) in source
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
        {
            let mut cells = Vec::new();
            for (column, value) in line.split(',').map(str::trim).enumerate() {
                let terrain = value
                    .parse::<u8>()
                    .ok()
                    .and_then(TerrainCode::from_code)
                    .ok_or_else(|| GridError::InvalidCode {
                        row,
                        column,
                        value: value.to_owned(),
                    })?;
                cells.push(terrain);
            }
            rows.push(cells);
        }
        Self::new(rows)
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Reports whether the position lies inside the grid.
    #[must_use]
    pub const fn contains(&self, position: Position) -> bool {
        position.row() < self.rows && position.column() < self.columns
    }

    /// Terrain stored at the position, or `None` when out of bounds.
    #[must_use]
    pub fn terrain(&self, position: Position) -> Option<TerrainCode> {
        self.index(position)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// True iff the position is in bounds and neither a wall nor a mountain.
    #[must_use]
    pub fn is_passable(&self, position: Position) -> bool {
        self.terrain(position).is_some_and(TerrainCode::is_passable)
    }

    /// Iterates over every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, TerrainCode)> + '_ {
        let columns = self.columns;
        (0..self.rows)
            .flat_map(move |row| (0..columns).map(move |column| Position::new(row, column)))
            .zip(self.cells.iter().copied())
    }

    /// Row-major index of the position, if it lies inside the grid.
    #[must_use]
    pub fn index(&self, position: Position) -> Option<usize> {
        if !self.contains(position) {
            return None;
        }
        let row = usize::try_from(position.row()).ok()?;
        let column = usize::try_from(position.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Total number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false for a constructed grid; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Errors raised while constructing or parsing a grid.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The input contained no cells.
    #[error("maze contains no cells")]
    Empty,
    /// A row length differed from the first row.
    #[error("row {row} has {found} cells but {expected} were expected")]
    Ragged {
        /// Zero-based index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
    /// A value was not an integer terrain code in `0..=5`.
    #[error("invalid terrain code '{value}' at row {row}, column {column}")]
    InvalidCode {
        /// Zero-based row of the value.
        row: usize,
        /// Zero-based column of the value.
        column: usize,
        /// Raw text that failed to parse.
        value: String,
    },
    /// The maze dimensions do not fit the coordinate type.
    #[error("maze dimensions exceed the supported size")]
    TooLarge,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reads_rows_and_columns() {
        let grid = Grid::parse("0,1,5\n2, 3 ,4\n\n").expect("valid maze");

        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.columns(), 3);
        assert_eq!(grid.terrain(Position::new(0, 2)), Some(TerrainCode::Mountain));
        assert_eq!(grid.terrain(Position::new(1, 1)), Some(TerrainCode::Sand));
    }

    #[test]
    fn parse_rejects_ragged_rows() {
        let error = Grid::parse("1,1,1\n1,1").expect_err("ragged maze must fail");

        assert_eq!(
            error,
            GridError::Ragged {
                row: 1,
                expected: 3,
                found: 2,
            }
        );
    }

    #[test]
    fn parse_rejects_unknown_codes() {
        let error = Grid::parse("1,7\n1,1").expect_err("code 7 is not a terrain");

        assert!(matches!(
            error,
            GridError::InvalidCode {
                row: 0,
                column: 1,
                ..
            }
        ));
    }

    #[test]
    fn parse_rejects_empty_input() {
        assert_eq!(Grid::parse("\n  \n"), Err(GridError::Empty));
    }

    #[test]
    fn passability_accounts_for_bounds_and_terrain() {
        let grid = Grid::parse("1,0\n5,2").expect("valid maze");

        assert!(grid.is_passable(Position::new(0, 0)));
        assert!(!grid.is_passable(Position::new(0, 1)));
        assert!(!grid.is_passable(Position::new(1, 0)));
        assert!(grid.is_passable(Position::new(1, 1)));
        assert!(!grid.is_passable(Position::new(2, 0)));
        assert!(!grid.is_passable(Position::new(0, 2)));
    }

    #[test]
    fn iter_visits_cells_in_row_major_order() {
        let grid = Grid::parse("1,2\n3,4").expect("valid maze");
        let cells: Vec<_> = grid.iter().collect();

        assert_eq!(cells.len(), grid.len());
        assert_eq!(cells[0], (Position::new(0, 0), TerrainCode::Floor));
        assert_eq!(cells[1], (Position::new(0, 1), TerrainCode::Water));
        assert_eq!(cells[2], (Position::new(1, 0), TerrainCode::Sand));
        assert_eq!(cells[3], (Position::new(1, 1), TerrainCode::Forest));
    }
}

//! The grid and gravity-based token insertion.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// The marker one of the two players drops on the board.
///
/// `X` belongs to the first joiner and moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    X,
    O,
}

impl Symbol {
    /// The opposing symbol.
    pub fn other(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "X"),
            Self::O => write!(f, "O"),
        }
    }
}

/// An immutable copy of the board contents, `grid[row][column]` with
/// row 0 at the bottom. This is what gets serialized to clients.
pub type Grid = Vec<Vec<Option<Symbol>>>;

/// A fixed-size grid where tokens fall to the lowest empty cell of
/// their column.
///
/// Cells are stored row-major; a per-column fill level makes insertion
/// O(1). Once set, a cell never reverts to empty for the lifetime of
/// the board.
#[derive(Debug, Clone)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Option<Symbol>>,
    /// Next free row per column; `fill[c] == height` means column c is full.
    fill: Vec<usize>,
    occupied: usize,
}

impl Board {
    /// Creates an empty board.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
            fill: vec![0; width],
            occupied: 0,
        }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Drops `symbol` into `column`, returning the row it came to rest in.
    ///
    /// # Errors
    /// [`EngineError::InvalidColumn`] if the column index is out of range,
    /// [`EngineError::ColumnFull`] if the column has no empty cell. The
    /// grid is untouched in both cases.
    pub fn insert(
        &mut self,
        column: usize,
        symbol: Symbol,
    ) -> Result<usize, EngineError> {
        if column >= self.width {
            return Err(EngineError::InvalidColumn {
                column,
                width: self.width,
            });
        }
        let row = self.fill[column];
        if row >= self.height {
            return Err(EngineError::ColumnFull(column));
        }

        self.cells[row * self.width + column] = Some(symbol);
        self.fill[column] = row + 1;
        self.occupied += 1;
        Ok(row)
    }

    /// The symbol at `(row, column)`, or `None` if the cell is empty.
    ///
    /// Out-of-range coordinates also return `None`, which lets the win
    /// scan walk off the edge without special cases.
    pub fn get(&self, row: usize, column: usize) -> Option<Symbol> {
        if row >= self.height || column >= self.width {
            return None;
        }
        self.cells[row * self.width + column]
    }

    /// `true` when every cell is occupied (the draw precursor).
    pub fn is_full(&self) -> bool {
        self.occupied == self.width * self.height
    }

    /// An immutable copy of the current contents for transmission.
    pub fn snapshot(&self) -> Grid {
        (0..self.height)
            .map(|row| {
                (0..self.width)
                    .map(|col| self.get(row, col))
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_lands_in_lowest_empty_row() {
        let mut board = Board::new(7, 6);
        assert_eq!(board.insert(3, Symbol::X), Ok(0));
        assert_eq!(board.insert(3, Symbol::O), Ok(1));
        assert_eq!(board.insert(3, Symbol::X), Ok(2));
        // A different column starts at the bottom again.
        assert_eq!(board.insert(0, Symbol::O), Ok(0));
    }

    #[test]
    fn test_insert_out_of_range_column_is_rejected() {
        let mut board = Board::new(7, 6);
        let result = board.insert(7, Symbol::X);
        assert_eq!(
            result,
            Err(EngineError::InvalidColumn { column: 7, width: 7 })
        );
        // The grid must be unchanged.
        assert_eq!(board.snapshot(), Board::new(7, 6).snapshot());
    }

    #[test]
    fn test_insert_into_full_column_fails_without_mutation() {
        let mut board = Board::new(7, 6);
        for i in 0..6 {
            let s = if i % 2 == 0 { Symbol::X } else { Symbol::O };
            board.insert(2, s).unwrap();
        }
        let before = board.snapshot();

        let result = board.insert(2, Symbol::X);

        assert_eq!(result, Err(EngineError::ColumnFull(2)));
        assert_eq!(board.snapshot(), before, "failed insert must not mutate");
    }

    #[test]
    fn test_column_never_exceeds_height() {
        // Property from the contract: hammering one column can never
        // place more tokens than the board is tall.
        let mut board = Board::new(4, 3);
        let mut placed = 0;
        for _ in 0..10 {
            if board.insert(1, Symbol::X).is_ok() {
                placed += 1;
            }
        }
        assert_eq!(placed, 3);
    }

    #[test]
    fn test_is_full_tracks_every_cell() {
        let mut board = Board::new(2, 2);
        assert!(!board.is_full());
        board.insert(0, Symbol::X).unwrap();
        board.insert(0, Symbol::O).unwrap();
        board.insert(1, Symbol::X).unwrap();
        assert!(!board.is_full());
        board.insert(1, Symbol::O).unwrap();
        assert!(board.is_full());
    }

    #[test]
    fn test_snapshot_is_bottom_up_and_detached() {
        let mut board = Board::new(3, 2);
        board.insert(1, Symbol::X).unwrap();

        let snap = board.snapshot();
        assert_eq!(snap[0][1], Some(Symbol::X));
        assert_eq!(snap[1][1], None);

        // Mutating the board after the fact must not change the copy.
        board.insert(1, Symbol::O).unwrap();
        assert_eq!(snap[1][1], None);
    }

    #[test]
    fn test_get_out_of_range_is_none() {
        let board = Board::new(7, 6);
        assert_eq!(board.get(6, 0), None);
        assert_eq!(board.get(0, 7), None);
    }

    #[test]
    fn test_symbol_other_flips() {
        assert_eq!(Symbol::X.other(), Symbol::O);
        assert_eq!(Symbol::O.other(), Symbol::X);
    }
}

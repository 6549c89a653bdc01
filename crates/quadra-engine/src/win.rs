//! Localized win detection.
//!
//! Only the lines through the most recently placed token can newly
//! contain a winning alignment, so every check is anchored at the
//! last move's coordinates. This keeps the per-move cost bounded by
//! the win length regardless of how full the board is — there is
//! deliberately no full-grid rescan anywhere in the engine.

use crate::{Board, Symbol};

/// The four alignment directions: horizontal, vertical, and the two
/// diagonals. The opposite direction of each is covered by negating.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Returns `true` if the token just placed at `(row, column)` completes
/// a contiguous run of at least `length` cells of `symbol`.
///
/// For each direction the run is counted outward from the placed cell
/// both ways, inclusive of the cell itself.
pub fn connects(
    board: &Board,
    row: usize,
    column: usize,
    symbol: Symbol,
    length: usize,
) -> bool {
    for (dr, dc) in DIRECTIONS {
        let run = 1
            + count_run(board, row, column, symbol, dr, dc)
            + count_run(board, row, column, symbol, -dr, -dc);
        if run >= length {
            return true;
        }
    }
    false
}

/// Counts contiguous `symbol` cells strictly beyond `(row, column)` in
/// the given direction. Stops at the first mismatch or board edge.
fn count_run(
    board: &Board,
    row: usize,
    column: usize,
    symbol: Symbol,
    dr: isize,
    dc: isize,
) -> usize {
    let mut count = 0;
    let mut r = row as isize + dr;
    let mut c = column as isize + dc;
    while r >= 0
        && c >= 0
        && board.get(r as usize, c as usize) == Some(symbol)
    {
        count += 1;
        r += dr;
        c += dc;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Naive full-grid scan used only as a test oracle: checks every
    /// possible window of `length` cells in all four directions.
    fn full_scan(board: &Board, symbol: Symbol, length: usize) -> bool {
        for row in 0..board.height() {
            for col in 0..board.width() {
                for (dr, dc) in DIRECTIONS {
                    let hit = (0..length).all(|i| {
                        let r = row as isize + dr * i as isize;
                        let c = col as isize + dc * i as isize;
                        r >= 0
                            && c >= 0
                            && board.get(r as usize, c as usize)
                                == Some(symbol)
                    });
                    if hit {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Drops a sequence of (column, symbol) pairs and returns the board
    /// along with the landing spot of the final drop.
    fn play_out(drops: &[(usize, Symbol)]) -> (Board, usize, usize) {
        let mut board = Board::new(7, 6);
        let mut last = (0, 0);
        for &(col, sym) in drops {
            let row = board.insert(col, sym).unwrap();
            last = (row, col);
        }
        (board, last.0, last.1)
    }

    #[test]
    fn test_horizontal_run_on_bottom_row() {
        use Symbol::{O, X};
        let (board, row, col) = play_out(&[
            (0, X), (0, O), (1, X), (1, O), (2, X), (2, O), (3, X),
        ]);
        assert!(connects(&board, row, col, X, 4));
        assert!(!connects(&board, row, col, O, 4));
    }

    #[test]
    fn test_vertical_run_in_single_column() {
        use Symbol::{O, X};
        let (board, row, col) = play_out(&[
            (5, X), (6, O), (5, X), (6, O), (5, X), (6, O), (5, X),
        ]);
        assert!(connects(&board, row, col, X, 4));
    }

    #[test]
    fn test_rising_diagonal_run() {
        use Symbol::{O, X};
        // X at (0,0), (1,1), (2,2), (3,3) with O filler underneath.
        let (board, row, col) = play_out(&[
            (0, X),
            (1, O), (1, X),
            (2, O), (2, O), (2, X),
            (3, O), (3, O), (3, O), (3, X),
        ]);
        assert!(connects(&board, row, col, X, 4));
    }

    #[test]
    fn test_falling_diagonal_run() {
        use Symbol::{O, X};
        // X at (3,0), (2,1), (1,2), (0,3).
        let (board, row, col) = play_out(&[
            (3, X),
            (0, O), (0, O), (0, O), (0, X),
            (1, O), (1, O), (1, X),
            (2, O), (2, X),
        ]);
        // Last drop was column 2 row 1; anchor the check there.
        assert!(connects(&board, row, col, X, 4));
    }

    #[test]
    fn test_run_split_across_anchor_counts_both_sides() {
        use Symbol::X;
        // X X _ X X, then the middle drop completes five-in-a-row.
        let mut board = Board::new(7, 6);
        for col in [0, 1, 3, 4] {
            board.insert(col, X).unwrap();
        }
        let row = board.insert(2, X).unwrap();
        assert!(connects(&board, row, 2, X, 4));
        assert!(connects(&board, row, 2, X, 5));
    }

    #[test]
    fn test_three_in_a_row_is_not_enough() {
        use Symbol::X;
        let (board, row, col) = play_out(&[(0, X), (1, X), (2, X)]);
        assert!(!connects(&board, row, col, X, 4));
    }

    #[test]
    fn test_localized_check_agrees_with_full_scan() {
        // Equivalence property: after every single move of several
        // scripted games, the anchored check and the naive full-grid
        // oracle must agree.
        use Symbol::{O, X};
        let games: [&[usize]; 3] = [
            // Horizontal X win on the bottom row.
            &[0, 0, 1, 1, 2, 2, 3],
            // Vertical O win in column 6.
            &[0, 6, 1, 6, 0, 6, 2, 6],
            // No winner, scattered fill.
            &[0, 1, 2, 3, 4, 5, 6, 0, 1, 2, 3, 4, 5, 6],
        ];

        for columns in games {
            let mut board = Board::new(7, 6);
            for (i, &col) in columns.iter().enumerate() {
                let sym = if i % 2 == 0 { X } else { O };
                let row = board.insert(col, sym).unwrap();
                assert_eq!(
                    connects(&board, row, col, sym, 4),
                    full_scan(&board, sym, 4),
                    "divergence after dropping {sym} in column {col}"
                );
            }
        }
    }
}

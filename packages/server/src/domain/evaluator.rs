//! Win and draw detection.

use super::board::{Board, Mark};

/// The eight winning lines as `(row, col)` triples, in evaluation order:
/// rows top to bottom, columns left to right, then both diagonals.
const LINES: [[(usize, usize); 3]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

/// Returns the mark of the first complete line, if any.
pub fn evaluate_winner(board: &Board) -> Option<Mark> {
    let rows = board.rows();
    LINES.iter().find_map(|[a, b, c]| {
        let first = rows[a.0][a.1]?;
        (rows[b.0][b.1] == Some(first) && rows[c.0][c.1] == Some(first)).then_some(first)
    })
}

/// True iff every cell is occupied.
pub fn is_full(board: &Board) -> bool {
    board.cells().all(|cell| cell.is_some())
}

/// A full board with no completed line.
pub fn is_draw(board: &Board) -> bool {
    is_full(board) && evaluate_winner(board).is_none()
}

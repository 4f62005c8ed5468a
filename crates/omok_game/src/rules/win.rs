//! Line detection through a freshly placed mark.

use crate::board::{Board, Mark};
use crate::roster::PlayerId;
use tracing::{debug, instrument};

/// Same-owner run length that wins the five-in-a-row variant.
pub const WIN_LENGTH: usize = 5;

/// The four undirected lines through a cell, as (row, col) steps:
/// horizontal, vertical, diagonal, anti-diagonal.
const AXES: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Counts consecutive marks owned by `owner`, starting one step away from
/// `(row, col)` and walking `(d_row, d_col)` for at most `max_steps`.
fn run_from(
    board: &Board,
    owner: &PlayerId,
    (row, col): (isize, isize),
    (d_row, d_col): (isize, isize),
    max_steps: usize,
) -> usize {
    let mut count = 0;
    for step in 1..=max_steps as isize {
        match board.mark_at_cell(row + d_row * step, col + d_col * step) {
            Some(mark) if mark.placed_by() == owner => count += 1,
            _ => break,
        }
    }
    count
}

/// Longest same-owner run through `mark` along any axis, capped at
/// `2 * (length - 1) + 1`.
pub fn line_length(board: &Board, mark: &Mark, length: usize) -> usize {
    let (row, col) = board.coordinates(*mark.position());
    let origin = (row as isize, col as isize);
    let reach = length.saturating_sub(1);
    let owner = mark.placed_by();

    AXES.iter()
        .map(|&(d_row, d_col)| {
            1 + run_from(board, owner, origin, (d_row, d_col), reach)
                + run_from(board, owner, origin, (-d_row, -d_col), reach)
        })
        .max()
        .unwrap_or(1)
}

/// True if `mark` sits on a same-owner line of at least `length` marks.
#[instrument(skip(board), fields(position = mark.position()))]
pub fn completes_line(board: &Board, mark: &Mark, length: usize) -> bool {
    let longest = line_length(board, mark, length);
    debug!(longest, length, "Scanned lines through mark");
    longest >= length
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: usize = 19;

    /// Places `positions` for `owner` with increasing turn numbers and
    /// returns the last mark placed.
    fn fill(board: &mut Board, owner: &str, positions: &[usize]) -> Mark {
        let mut last = None;
        for &p in positions {
            let mark = Mark::new(owner.into(), board.len() as u32 + 1, p);
            board.place(mark.clone());
            last = Some(mark);
        }
        last.unwrap()
    }

    fn at(row: usize, col: usize) -> usize {
        row * W + col
    }

    #[test]
    fn test_horizontal_five_wins() {
        let mut board = Board::new(W);
        let last = fill(&mut board, "a", &[0, 1, 2, 3, 4]);
        assert!(completes_line(&board, &last, WIN_LENGTH));
    }

    #[test]
    fn test_four_does_not_win() {
        let mut board = Board::new(W);
        let last = fill(&mut board, "a", &[0, 1, 2, 3]);
        assert!(!completes_line(&board, &last, WIN_LENGTH));
        assert_eq!(line_length(&board, &last, WIN_LENGTH), 4);
    }

    #[test]
    fn test_vertical_five_wins() {
        let mut board = Board::new(W);
        let last = fill(
            &mut board,
            "a",
            &[at(5, 7), at(6, 7), at(7, 7), at(8, 7), at(9, 7)],
        );
        assert!(completes_line(&board, &last, WIN_LENGTH));
    }

    #[test]
    fn test_diagonal_five_wins() {
        let mut board = Board::new(W);
        let last = fill(
            &mut board,
            "a",
            &[at(14, 14), at(15, 15), at(16, 16), at(17, 17), at(18, 18)],
        );
        assert!(completes_line(&board, &last, WIN_LENGTH));
    }

    #[test]
    fn test_anti_diagonal_five_wins() {
        let mut board = Board::new(W);
        let last = fill(
            &mut board,
            "a",
            &[at(0, 4), at(1, 3), at(2, 2), at(3, 1), at(4, 0)],
        );
        assert!(completes_line(&board, &last, WIN_LENGTH));
    }

    #[test]
    fn test_gap_filled_in_middle_wins() {
        let mut board = Board::new(W);
        fill(&mut board, "a", &[at(9, 5), at(9, 6), at(9, 8), at(9, 9)]);
        let last = fill(&mut board, "a", &[at(9, 7)]);
        assert!(completes_line(&board, &last, WIN_LENGTH));
    }

    #[test]
    fn test_line_does_not_wrap_across_rows() {
        let mut board = Board::new(W);
        let last = fill(
            &mut board,
            "a",
            &[at(0, 16), at(0, 17), at(0, 18), at(1, 0), at(1, 1)],
        );
        assert!(!completes_line(&board, &last, WIN_LENGTH));
    }

    #[test]
    fn test_opponent_mark_breaks_line() {
        let mut board = Board::new(W);
        fill(&mut board, "a", &[0, 1]);
        fill(&mut board, "b", &[2]);
        let last = fill(&mut board, "a", &[3, 4, 5]);
        assert!(!completes_line(&board, &last, WIN_LENGTH));
    }

    #[test]
    fn test_overline_still_wins() {
        let mut board = Board::new(W);
        fill(&mut board, "a", &[0, 1, 2, 4, 5]);
        let last = fill(&mut board, "a", &[3]);
        assert!(completes_line(&board, &last, WIN_LENGTH));
        assert_eq!(line_length(&board, &last, WIN_LENGTH), 6);
    }
}

//! Board encoding, move encoding, and move application for Ultimate
//! Tic-Tac-Toe.
//!
//! A [`Board`] is nine local boards, each a base-3 integer in `[0, 19683)`
//! (see [`crate::tables`]). A [`Move`] is an integer in `[0, 81)`:
//! `row = mv / 9`, `col = mv % 9`. The state is a flat, cheaply-cloned
//! struct with free functions operating on it, rather than a tree of
//! owned sub-objects.

use crate::constants::{BOARDS, NO_MOVE, TOTAL_CELLS};
use crate::tables::{tables, MiniStatus, POW3};

/// A move on the full 9x9 grid, or [`NO_MOVE`] for "game not yet started".
pub type Move = usize;

/// `+1` for one side, `-1` for the other.
pub type Player = i8;

/// The nine local boards, row-major, each a base-3 encoding in `[0, 19683)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    pub minis: [usize; BOARDS],
}

impl Board {
    /// An empty board: every local board at encoding 0 (all cells empty).
    pub const fn empty() -> Self {
        Self { minis: [0; BOARDS] }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

/// Outcome of the whole game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalStatus {
    Undecided,
    XWins,
    OWins,
    Draw,
}

impl GlobalStatus {
    #[inline]
    pub fn is_terminal(self) -> bool {
        !matches!(self, GlobalStatus::Undecided)
    }
}

/// Which local board a move lands in.
#[inline]
pub fn outer(mv: Move) -> usize {
    tables().outer[mv] as usize
}

/// Which cell within that local board a move lands in. This also names the
/// local board the opponent is sent to next.
#[inline]
pub fn inner(mv: Move) -> usize {
    tables().inner[mv] as usize
}

/// Stone id stored in a mini-board encoding: 1 for X (`player == 1`), 2 for
/// O (`player == -1`).
#[inline]
fn stone_id(player: Player) -> usize {
    if player > 0 {
        1
    } else {
        2
    }
}

/// Place `player`'s stone at `mv`. O(1). The caller must ensure `mv` targets
/// an empty cell; debug builds assert it.
pub fn apply(board: &mut Board, mv: Move, player: Player) {
    let o = outer(mv);
    let i = inner(mv);
    debug_assert!(
        (board.minis[o] / POW3[i]) % 3 == 0,
        "apply: target cell is not empty"
    );
    board.minis[o] += stone_id(player) * POW3[i];
}

/// Remove `player`'s stone from `mv`, the exact inverse of [`apply`]. O(1).
pub fn undo(board: &mut Board, mv: Move, player: Player) {
    let o = outer(mv);
    let i = inner(mv);
    board.minis[o] -= stone_id(player) * POW3[i];
}

/// Compute the global game status: a local board reduces to a virtual cell
/// (X/O/undecided-or-drawn); three such cells in a row decide the game;
/// otherwise, once every local board is decided, the side controlling more
/// (decided, non-drawn) local boards wins, ties draw.
pub fn global_status(board: &Board) -> GlobalStatus {
    let t = tables();
    let mut virtual_trits = [0u8; 9];
    let mut any_undecided = false;
    let mut x_boards = 0i32;
    let mut o_boards = 0i32;

    for (i, &mini) in board.minis.iter().enumerate() {
        match t.state[mini] {
            MiniStatus::XWon => {
                virtual_trits[i] = 1;
                x_boards += 1;
            }
            MiniStatus::OWon => {
                virtual_trits[i] = 2;
                o_boards += 1;
            }
            MiniStatus::Undecided => any_undecided = true,
            MiniStatus::Drawn => {}
        }
    }

    if let Some(winner) = virtual_three_in_a_row(&virtual_trits) {
        return if winner == 1 {
            GlobalStatus::XWins
        } else {
            GlobalStatus::OWins
        };
    }

    if any_undecided {
        return GlobalStatus::Undecided;
    }

    match x_boards.cmp(&o_boards) {
        std::cmp::Ordering::Greater => GlobalStatus::XWins,
        std::cmp::Ordering::Less => GlobalStatus::OWins,
        std::cmp::Ordering::Equal => GlobalStatus::Draw,
    }
}

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Check the virtual (per-board-winner) grid for a 3-in-a-row. Returns the
/// winning trit value (1 = X, 2 = O) or `None`.
fn virtual_three_in_a_row(trits: &[u8; 9]) -> Option<u8> {
    for line in LINES {
        let [a, b, c] = line;
        if trits[a] != 0 && trits[a] == trits[b] && trits[a] == trits[c] {
            return Some(trits[a]);
        }
    }
    None
}

/// Format a move as `"row col"`, or `"NO_MOVE"` for the sentinel. Debug aid
/// only — board/move pretty-printing lives outside the search core, but a
/// terse `Display` is still useful in `--verbose` logging.
pub fn move_label(mv: Move) -> String {
    if mv == NO_MOVE {
        "NO_MOVE".to_string()
    } else {
        format!("{} {}", mv / 9, mv % 9)
    }
}

impl std::fmt::Display for Board {
    /// Nine space-separated base-3 local-board encodings, one per line's
    /// worth of board state. Not a 9x9 grid rendering — that belongs to a
    /// caller that wants a human-facing UI, not to the search core.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, mini) in self.minis.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{mini}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_undo_is_inverse() {
        let mut board = Board::empty();
        for mv in 0..TOTAL_CELLS {
            let before = board;
            apply(&mut board, mv, 1);
            undo(&mut board, mv, 1);
            assert_eq!(board, before);
        }
    }

    #[test]
    fn outer_inner_roundtrip_to_move() {
        for mv in 0..TOTAL_CELLS {
            let o = outer(mv);
            let i = inner(mv);
            let board_row = o / 3;
            let board_col = o % 3;
            let cell_row = i / 3;
            let cell_col = i % 3;
            let row = board_row * 3 + cell_row;
            let col = board_col * 3 + cell_col;
            assert_eq!(row * 9 + col, mv);
        }
    }

    #[test]
    fn global_status_exactly_one_outcome() {
        let board = Board::empty();
        let outcomes = [
            global_status(&board) == GlobalStatus::Undecided,
            global_status(&board) == GlobalStatus::XWins,
            global_status(&board) == GlobalStatus::OWins,
            global_status(&board) == GlobalStatus::Draw,
        ];
        assert_eq!(outcomes.iter().filter(|&&b| b).count(), 1);
    }

    #[test]
    fn three_boards_won_in_a_row_wins_game() {
        let mut board = Board::empty();
        // Fill boards 0, 1, 2 (top row of boards) entirely with X's winning line.
        for b in 0..3 {
            board.minis[b] = 1 + 3 + 9; // X at inner cells 0,1,2 -> top row win.
        }
        assert_eq!(global_status(&board), GlobalStatus::XWins);
    }

    #[test]
    fn all_boards_decided_no_line_goes_to_control_count() {
        let mut board = Board::empty();
        // Drawn filled local board with no 3-in-a-row: X O X / X O O / O X X
        let drawn_mini = {
            let trits = [1u8, 2, 1, 1, 2, 2, 2, 1, 1];
            trits
                .iter()
                .enumerate()
                .fold(0usize, |acc, (i, &t)| acc + t as usize * POW3[i])
        };
        // X wins boards 0, 1, 3 (not a full line); O wins board 4; rest drawn.
        board.minis[0] = 1 + 3 + 9; // X top row
        board.minis[1] = 1 + 3 + 9;
        board.minis[3] = 1 + 3 + 9;
        board.minis[4] = 2 + 6 + 18; // O top row -> 2*(1+3+9)
        for b in [2, 5, 6, 7, 8] {
            board.minis[b] = drawn_mini;
        }
        assert_eq!(global_status(&board), GlobalStatus::XWins);
    }
}

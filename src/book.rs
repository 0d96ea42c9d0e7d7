//! A tiny opening book covering the first couple of plies.
//!
//! Ultimate Tic-Tac-Toe is symmetric enough that the first few moves are
//! well understood without search: take the center, and answer a
//! center-opening by taking the center of the forced board. A further rule
//! answers "sent to an empty corner board" by mirroring the corner. The
//! corner-mirroring rule in particular reads as an odd, very specific
//! heuristic whose strategic rationale isn't obvious, but changing it
//! changes the engine's opening repertoire, so it is kept as-is rather than
//! "fixed".

use crate::board::{inner, Board, Move};
use crate::constants::NO_MOVE;
use crate::tables::tables;

/// The four local boards in the corners of the 3x3 grid of boards.
const CORNER_BOARDS: [usize; 4] = [0, 2, 6, 8];

/// Look up a book move for ply `turn` (0-indexed, own perspective) given the
/// opponent's `last_move`. Returns `None` when the position falls outside
/// the book, at which point the caller should fall back to search.
pub fn opening_move(board: &Board, last_move: Move, turn: u32) -> Option<Move> {
    if turn == 0 {
        return Some(40); // dead center: board 4, cell 4.
    }
    if turn == 1 && last_move == 40 {
        return Some(30); // center of the forced board (board 3, cell 3).
    }
    if last_move == NO_MOVE {
        return None;
    }

    let forced = inner(last_move);
    if CORNER_BOARDS.contains(&forced) && board.minis[forced] == 0 {
        return Some(tables().move_from_gridbit[forced * 9 + forced] as Move);
    }
    None
}

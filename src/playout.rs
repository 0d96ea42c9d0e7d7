//! Random playouts from a position to a terminal outcome.
//!
//! Plain uniform-random rollout, no heuristics: this engine's playout
//! policy is deliberately unweighted. What matters for throughput is the
//! *shape* — a hand-rolled fast PRNG feeding an O(1) move picker on the hot
//! path, see [`Rng`] below.

use crate::board::{apply, global_status, Board, GlobalStatus, Move, Player};
use crate::constants::NO_MOVE;
use crate::movegen::{fast_moves, nth_move};

/// Xorshift32, seeded per-thread. Not cryptographic; exists solely so the
/// playout hot path never touches a shared/thread-local RNG with its own
/// synchronization overhead.
pub struct Rng(u32);

impl Rng {
    pub fn new(seed: u32) -> Self {
        // xorshift32 requires a nonzero state.
        Rng(if seed == 0 { 0x9E3779B9 } else { seed })
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        x
    }

    /// Uniform in `[0, bound)`. `bound` is always small here (<= 81), so the
    /// modulo bias is negligible and not worth a rejection loop.
    #[inline]
    pub fn below(&mut self, bound: u32) -> u32 {
        self.next_u32() % bound
    }
}

/// Play uniform-random legal moves from `board` (whose last move was
/// `last_move`, next to move is `to_move`) until the game ends, then return
/// the reward for `perspective` (1.0 win, 0.5 draw, 0.0 loss).
///
/// The board is mutated move-by-move and restored from a stack-held
/// snapshot before returning, so the caller's position is untouched and the
/// hot path never touches the heap — `Board` is `Copy`, so the snapshot is
/// just 9 `usize`s.
pub fn playout(
    board: &mut Board,
    mut last_move: Move,
    mut to_move: Player,
    perspective: Player,
    rng: &mut Rng,
) -> f64 {
    let snapshot = *board;

    let status = loop {
        let status = global_status(board);
        if status.is_terminal() {
            break status;
        }
        let mask = fast_moves(board, last_move);
        debug_assert!(mask.count > 0, "undecided position with no legal moves");
        let r = rng.below(mask.count);
        let mv = nth_move(&mask, r);
        apply(board, mv, to_move);
        last_move = mv;
        to_move = -to_move;
    };

    *board = snapshot;

    reward_for(status, perspective)
}

/// Map a terminal [`GlobalStatus`] to a reward in `{0.0, 0.5, 1.0}` from
/// `perspective`'s point of view.
pub fn reward_for(status: GlobalStatus, perspective: Player) -> f64 {
    match status {
        GlobalStatus::Draw => 0.5,
        GlobalStatus::XWins if perspective > 0 => 1.0,
        GlobalStatus::OWins if perspective < 0 => 1.0,
        GlobalStatus::XWins | GlobalStatus::OWins => 0.0,
        GlobalStatus::Undecided => unreachable!("reward_for called on non-terminal status"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playout_leaves_board_unchanged() {
        let mut board = Board::empty();
        let before = board;
        let mut rng = Rng::new(42);
        let reward = playout(&mut board, NO_MOVE, 1, 1, &mut rng);
        assert_eq!(board, before);
        assert!((0.0..=1.0).contains(&reward));
    }

    #[test]
    fn playout_always_terminates_and_rewards_are_symmetric() {
        let mut board = Board::empty();
        let mut rng = Rng::new(7);
        let r_x = playout(&mut board, NO_MOVE, 1, 1, &mut rng);
        let mut rng2 = Rng::new(7);
        let r_o = playout(&mut board, NO_MOVE, 1, -1, &mut rng2);
        assert!((r_x - (1.0 - r_o)).abs() < 1e-9);
    }

    #[test]
    fn rng_is_deterministic_given_seed() {
        let mut a = Rng::new(123);
        let mut b = Rng::new(123);
        for _ in 0..50 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn rng_zero_seed_is_remapped_to_nonzero() {
        let mut rng = Rng::new(0);
        // xorshift32 with state 0 would be stuck at 0 forever.
        assert_ne!(rng.next_u32(), 0);
    }
}

//! The Monte Carlo Tree Search loop: selection, lazy expansion, random
//! simulation, and incremental backpropagation.
//!
//! Nodes live in [`crate::arena::Arena`] rather than behind individually
//! owned pointers. There is no transposition table and no RAVE-style
//! all-moves-as-first bookkeeping here: this engine searches a plain tree.

use crate::arena::{Arena, NodeIndex, NIL};
use crate::board::{apply, global_status, undo, Board, Move, Player};
use crate::constants::TOTAL_CELLS;
use crate::movegen::legal_moves;
use crate::playout::{playout, reward_for, Rng as FastRng};
use crate::tables::log2_floor;

/// Upper bound on the number of edges from root to leaf: at most one per
/// cell on the 9x9 grid, plus the root itself. Lets `playout_once` keep its
/// selection path on the stack instead of a heap-allocated `Vec`.
const MAX_PATH_LEN: usize = TOTAL_CELLS + 1;

/// Tunable knobs for one search. A subset of [`crate::search::EngineConfig`]
/// threaded down to the tree-policy math.
#[derive(Debug, Clone, Copy)]
pub struct McConfig {
    pub c: f64,
    pub fpu: f64,
    pub fpu_jitter: f64,
}

/// One MCTS tree bound to a fixed-capacity [`Arena`]. A fresh `Mcts` (or a
/// [`Arena::reset_with_root`] call on an existing one) is created per engine
/// move: no state survives between moves.
pub struct Mcts {
    pub arena: Arena,
    cfg: McConfig,
}

impl Mcts {
    pub fn new(capacity: usize, cfg: McConfig) -> Self {
        Mcts {
            arena: Arena::with_capacity(capacity),
            cfg,
        }
    }

    /// Reset the tree and allocate a root node where `to_move` is about to
    /// play. Returns the root index (always 0 right after a reset, but
    /// callers should treat it opaquely).
    pub fn new_search(&mut self, to_move: Player) -> NodeIndex {
        self.arena.reset_with_root(to_move)
    }

    /// Run one selection/expansion/simulation/backpropagation cycle from
    /// `root`. `board` must reflect the position at `root`, with `last_move`
    /// the move that led to it (or [`crate::constants::NO_MOVE`] for a fresh
    /// game); `board` is restored to that exact state before returning.
    pub fn playout_once(
        &mut self,
        root: NodeIndex,
        board: &mut Board,
        last_move: Move,
        fast_rng: &mut FastRng,
        cold_rng: &mut fastrand::Rng,
    ) {
        let mut path = [NIL; MAX_PATH_LEN];
        let mut path_len = 0usize;
        path[path_len] = root;
        path_len += 1;
        let mut current = root;
        let mut last_move = last_move;

        let reward_from_leaf_player = loop {
            let status = global_status(board);
            if status.is_terminal() {
                let leaf_player = self.arena.get(current).player;
                // Root itself can be terminal only in pathological callers;
                // fall back to the mover-about-to-play convention.
                let perspective = if current == root {
                    self.arena.get(root).player
                } else {
                    leaf_player
                };
                break reward_for(status, perspective);
            }

            if self.arena.get(current).first_child == NIL {
                self.expand(root, current, board, last_move, cold_rng);
                // `expand` guarantees at least one child when the position is
                // undecided (legal_moves is never empty here).
                let child = self.select_child(current);
                let node = *self.arena.get(child);
                apply(board, node.mv, node.player);
                path[path_len] = child;
                path_len += 1;
                break playout(board, node.mv, -node.player, node.player, fast_rng);
            }

            let child = self.select_child(current);
            let node = *self.arena.get(child);
            apply(board, node.mv, node.player);
            path[path_len] = child;
            path_len += 1;
            current = child;
            last_move = node.mv;
        };

        self.backprop(&path[..path_len], reward_from_leaf_player);

        // Undo every move we applied to the board, root excluded, restoring
        // the caller's position exactly.
        for &idx in path[1..path_len].iter().rev() {
            let node = self.arena.get(idx);
            undo(board, node.mv, node.player);
        }
    }

    /// Allocate one child per legal move from `node`, seeding each with the
    /// first-play-urgency bound plus a small uniform jitter to break ties
    /// among otherwise-identical unvisited children, rather than requiring
    /// every child to get a mandatory first visit before UCT takes over.
    fn expand(
        &mut self,
        root: NodeIndex,
        node: NodeIndex,
        board: &Board,
        last_move: Move,
        cold_rng: &mut fastrand::Rng,
    ) {
        // The root's `player` field holds "who is about to move". Every
        // other node's `player` field holds who played the edge *into* it,
        // so the next mover there is that player's opponent.
        let mover = if node == root {
            self.arena.get(node).player
        } else {
            -self.arena.get(node).player
        };
        let moves = legal_moves(board, last_move);
        for mv in moves {
            let jitter = cold_rng.f64() * self.cfg.fpu_jitter;
            let initial_upper = self.cfg.fpu + jitter;
            self.arena.push_child(node, mv, mover, initial_upper);
        }
    }

    /// Pick the child with the highest UCT upper bound.
    fn select_child(&self, node: NodeIndex) -> NodeIndex {
        self.arena
            .children(node)
            .max_by(|&a, &b| {
                self.arena
                    .get(a)
                    .upper
                    .partial_cmp(&self.arena.get(b).upper)
                    .expect("upper bound is never NaN")
            })
            .expect("select_child called on a childless node")
    }

    /// Update visits/mean along `path` from leaf to root, flipping the
    /// reward's perspective at every level, then recompute the UCT upper
    /// bound of every sibling at each level whose parent's visit count just
    /// changed.
    fn backprop(&mut self, path: &[NodeIndex], mut reward: f64) {
        for &idx in path.iter().rev() {
            {
                let node = self.arena.get_mut(idx);
                node.visits += 1;
                node.mean += (reward - node.mean) / node.visits as f64;
            }
            reward = 1.0 - reward;
            let parent = self.arena.get(idx).parent;
            if parent != NIL {
                self.recompute_children_upper(parent);
            }
        }
    }

    fn recompute_children_upper(&mut self, parent: NodeIndex) {
        let parent_visits = self.arena.get(parent).visits;
        let log_parent = log2_floor(parent_visits + 1) as f64;
        let c = self.cfg.c;
        let mut child = self.arena.get(parent).first_child;
        while child != NIL {
            let next_sibling = self.arena.get(child).next_sibling;
            let node = self.arena.get_mut(child);
            if node.visits > 0 {
                node.upper = node.mean + c * (log_parent / node.visits as f64).sqrt();
            }
            child = next_sibling;
        }
    }

    /// Final move choice: the child of `root` with the highest mean reward,
    /// not the highest visit count. With FPU-driven expansion, visit counts
    /// alone are a noisier signal than mean for a shallow tree, so mean is
    /// the statistic this search actually optimizes.
    pub fn best_move(&self, root: NodeIndex) -> Option<Move> {
        self.arena
            .children(root)
            .max_by(|&a, &b| {
                self.arena
                    .get(a)
                    .mean
                    .partial_cmp(&self.arena.get(b).mean)
                    .expect("mean is never NaN")
            })
            .map(|idx| self.arena.get(idx).mv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DEFAULT_C, DEFAULT_FPU, FPU_JITTER, NO_MOVE};

    fn cfg() -> McConfig {
        McConfig {
            c: DEFAULT_C,
            fpu: DEFAULT_FPU,
            fpu_jitter: FPU_JITTER,
        }
    }

    #[test]
    fn single_playout_visits_root_and_one_child() {
        let mut mcts = Mcts::new(1024, cfg());
        let root = mcts.new_search(1);
        let mut board = Board::empty();
        let mut fast_rng = FastRng::new(1);
        let mut cold_rng = fastrand::Rng::with_seed(1);
        mcts.playout_once(root, &mut board, NO_MOVE, &mut fast_rng, &mut cold_rng);

        assert_eq!(mcts.arena.get(root).visits, 1);
        assert_eq!(mcts.arena.children(root).count(), 81);
        let visited_children = mcts
            .arena
            .children(root)
            .filter(|&c| mcts.arena.get(c).visits > 0)
            .count();
        assert_eq!(visited_children, 1);
    }

    #[test]
    fn many_playouts_keep_board_unchanged_and_means_in_range() {
        let mut mcts = Mcts::new(4096, cfg());
        let root = mcts.new_search(1);
        let mut board = Board::empty();
        let before = board;
        let mut fast_rng = FastRng::new(99);
        let mut cold_rng = fastrand::Rng::with_seed(99);

        for _ in 0..200 {
            mcts.playout_once(root, &mut board, NO_MOVE, &mut fast_rng, &mut cold_rng);
        }

        assert_eq!(board, before);
        assert_eq!(mcts.arena.get(root).visits, 200);
        for child in mcts.arena.children(root) {
            let node = mcts.arena.get(child);
            assert!((0.0..=1.0).contains(&node.mean));
        }
        assert!(mcts.best_move(root).is_some());
    }

    #[test]
    fn sibling_upper_uses_log2_of_parent_visits_plus_one() {
        // A root with a single visit already has a nonzero exploration term
        // for its visited child: log2(1 + 1) = 1, not log2(1) = 0.
        let mut mcts = Mcts::new(1024, cfg());
        let root = mcts.new_search(1);
        let mut board = Board::empty();
        let mut fast_rng = FastRng::new(5);
        let mut cold_rng = fastrand::Rng::with_seed(5);
        mcts.playout_once(root, &mut board, NO_MOVE, &mut fast_rng, &mut cold_rng);

        assert_eq!(mcts.arena.get(root).visits, 1);
        let visited_child = mcts
            .arena
            .children(root)
            .find(|&c| mcts.arena.get(c).visits > 0)
            .expect("exactly one child visited after one playout");
        let node = mcts.arena.get(visited_child);
        let expected_upper = node.mean + cfg().c * (1.0f64).sqrt();
        assert!((node.upper - expected_upper).abs() < 1e-9);
    }

    #[test]
    fn visits_are_monotonically_non_decreasing_across_backprop() {
        let mut mcts = Mcts::new(4096, cfg());
        let root = mcts.new_search(1);
        let mut board = Board::empty();
        let mut fast_rng = FastRng::new(3);
        let mut cold_rng = fastrand::Rng::with_seed(3);
        let mut last_root_visits = 0;
        for _ in 0..50 {
            mcts.playout_once(root, &mut board, NO_MOVE, &mut fast_rng, &mut cold_rng);
            let visits = mcts.arena.get(root).visits;
            assert!(visits >= last_root_visits);
            last_root_visits = visits;
        }
    }
}

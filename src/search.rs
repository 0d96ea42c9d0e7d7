//! The time-bounded per-move search driver.
//!
//! Ties the opening book, the MCTS loop, and a wall-clock deadline
//! together into the one call a caller (the line-protocol adapter in
//! [`crate::io`], or a benchmark harness) actually needs: "given this
//! position and how we got here, what do we play?" The loop is the obvious
//! one: try the book first, otherwise run playouts until the clock runs
//! out and return the best root child.

use std::time::{Duration, Instant};

use crate::board::{apply, global_status, undo, Board, Move, Player};
use crate::book::opening_move;
use crate::constants::{
    DEADLINE_CHECK_PERIOD, DEFAULT_ARENA_BYTES, DEFAULT_C, DEFAULT_DEADLINE_MS, DEFAULT_FPU,
    FPU_JITTER, NO_MOVE,
};
use crate::error::{EngineError, Result};
use crate::mcts::{McConfig, Mcts};
use crate::playout::Rng as FastRng;

/// Runtime knobs for one engine instance. Every field has a sensible
/// default; callers (`main.rs`'s `clap` parser, primarily) override only
/// what they need to.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// UCT exploration constant.
    pub exploration_c: f64,
    /// First-play-urgency bound for unvisited children.
    pub fpu: f64,
    /// Per-move wall-clock budget.
    pub deadline_ms: u64,
    /// Arena capacity, in bytes (converted to a node count internally).
    pub arena_bytes: usize,
    /// Emit progress (`playouts run`, `nodes expanded`, timing) to stderr.
    pub verbose: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            exploration_c: DEFAULT_C,
            fpu: DEFAULT_FPU,
            deadline_ms: DEFAULT_DEADLINE_MS,
            arena_bytes: DEFAULT_ARENA_BYTES,
            verbose: false,
        }
    }
}

/// Diagnostics about one [`Driver::choose_move`] call, surfaced so
/// `--verbose` logging (and the `bench` CLI subcommand) can report them
/// without the driver depending on any particular output format.
#[derive(Debug, Clone, Copy)]
pub struct SearchStats {
    pub playouts: u32,
    pub elapsed: Duration,
    pub from_book: bool,
}

/// Owns the MCTS tree across the playouts of a single move. Built fresh (or
/// reset) per move: no tree state carries over between moves.
pub struct Driver {
    config: EngineConfig,
    mcts: Mcts,
    cold_rng: fastrand::Rng,
}

impl Driver {
    pub fn new(config: EngineConfig) -> Self {
        let node_size = std::mem::size_of::<crate::arena::Node>();
        let capacity = (config.arena_bytes / node_size).max(64);
        let mc_config = McConfig {
            c: config.exploration_c,
            fpu: config.fpu,
            fpu_jitter: FPU_JITTER,
        };
        Driver {
            config,
            mcts: Mcts::new(capacity, mc_config),
            cold_rng: fastrand::Rng::new(),
        }
    }

    /// Choose a move for `player` in `board`, given `last_move` (the move
    /// that produced this position, or [`NO_MOVE`]) and `turn` (0-indexed
    /// ply count from this engine's point of view, used only by the
    /// opening book).
    pub fn choose_move(
        &mut self,
        board: &Board,
        last_move: Move,
        turn: u32,
        player: Player,
    ) -> Result<(Move, SearchStats)> {
        if global_status(board).is_terminal() {
            return Err(EngineError::NoLegalMove);
        }

        if let Some(mv) = opening_move(board, last_move, turn) {
            return Ok((
                mv,
                SearchStats {
                    playouts: 0,
                    elapsed: Duration::ZERO,
                    from_book: true,
                },
            ));
        }

        let deadline = Duration::from_millis(self.config.deadline_ms);
        let start = Instant::now();
        let root = self.mcts.new_search(player);
        let mut working_board = *board;
        let mut fast_rng = FastRng::new(self.cold_rng.u32(1..=u32::MAX));

        let mut playouts: u32 = 0;
        loop {
            self.mcts
                .playout_once(root, &mut working_board, last_move, &mut fast_rng, &mut self.cold_rng);
            playouts += 1;
            if playouts % DEADLINE_CHECK_PERIOD as u32 == 0 && start.elapsed() >= deadline {
                break;
            }
        }

        let elapsed = start.elapsed();
        if self.config.verbose {
            eprintln!(
                "playouts {playouts} nodes {} kpps {:.1} time {}ms",
                self.mcts.arena.len(),
                playouts as f64 / elapsed.as_secs_f64().max(1e-9) / 1000.0,
                elapsed.as_millis()
            );
        }

        let mv = self.mcts.best_move(root).ok_or(EngineError::NoLegalMove)?;
        debug_assert_eq!(working_board, *board, "search must leave the board untouched");
        Ok((
            mv,
            SearchStats {
                playouts,
                elapsed,
                from_book: false,
            },
        ))
    }

    /// Apply `mv` to `board` on the caller's behalf, mirroring the
    /// apply/undo discipline used throughout search so state management
    /// stays in one place.
    pub fn apply_move(board: &mut Board, mv: Move, player: Player) {
        apply(board, mv, player);
    }

    /// Inverse of [`Driver::apply_move`], exposed for callers that need to
    /// explore hypothetical continuations (benchmarks, tests).
    pub fn undo_move(board: &mut Board, mv: Move, player: Player) {
        undo(board, mv, player);
    }
}

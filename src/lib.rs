//! A move-selection engine for Ultimate Tic-Tac-Toe: UCT-style Monte Carlo
//! Tree Search over a preallocated node arena, fast uniform-random
//! playouts, and a small opening book, driven by a fixed per-move
//! wall-clock budget.
//!
//! ## Modules
//!
//! - [`constants`] - board geometry and MCTS tuning defaults
//! - [`tables`] - precomputed lookup tables keyed by local-board encoding
//! - [`board`] - board/move encoding, move application, global status
//! - [`movegen`] - legal move generation (fast bitmask and slow `Vec` forms)
//! - [`playout`] - uniform-random rollout to a terminal position
//! - [`arena`] - fixed-capacity node pool backing the search tree
//! - [`mcts`] - the selection/expansion/simulation/backpropagation loop
//! - [`book`] - a handful of hardcoded opening responses
//! - [`search`] - the time-bounded per-move driver tying the above together
//! - [`io`] - the line-oriented turn protocol adapter
//! - [`error`] - the engine's error taxonomy
//!
//! The module layout keeps a flat board/state module, precomputed tables,
//! and a separate search module apart: boards are base-3 encoded 3x3 local
//! grids, moves select one of 81 cells, and the search tree lives in
//! [`arena::Arena`] rather than an owned `Vec<TreeNode>` per node.
//!
//! ## Example
//!
//! ```
//! use uttt_engine::board::Board;
//! use uttt_engine::constants::NO_MOVE;
//! use uttt_engine::search::{Driver, EngineConfig};
//!
//! let mut driver = Driver::new(EngineConfig {
//!     deadline_ms: 5,
//!     ..EngineConfig::default()
//! });
//! let board = Board::empty();
//! let (mv, _stats) = driver.choose_move(&board, NO_MOVE, 0, 1).unwrap();
//! assert_eq!(mv, 40); // opening book: center.
//! ```

pub mod arena;
pub mod board;
pub mod book;
pub mod constants;
pub mod error;
pub mod io;
pub mod mcts;
pub mod movegen;
pub mod playout;
pub mod search;
pub mod tables;

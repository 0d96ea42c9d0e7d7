//! Board geometry and MCTS tuning constants for Ultimate Tic-Tac-Toe.
//!
//! A flat, `pub const` module that every other module pulls from rather
//! than threading a config struct through every call. The handful of values
//! a caller legitimately wants to override at runtime (the UCT exploration
//! constant, FPU, the deadline, the arena size) are *defaults* here and are
//! bundled into [`crate::search::EngineConfig`] at the driver boundary.

/// Number of local (3x3) boards, and number of cells within each.
pub const BOARDS: usize = 9;
pub const CELLS_PER_BOARD: usize = 9;

/// Total cells on the full 9x9 grid.
pub const TOTAL_CELLS: usize = BOARDS * CELLS_PER_BOARD;

/// Number of distinct base-3 encodings of one local board ([0, 3^9)).
pub const MINI_STATES: usize = 19_683;

/// Sentinel meaning "no move has been played yet" (fresh game).
pub const NO_MOVE: usize = 81;

// =============================================================================
// MCTS parameters
// =============================================================================

/// Default UCT exploration constant (recommended range 0.5-0.7).
pub const DEFAULT_C: f64 = 0.6;

/// Default first-play-urgency bound for unvisited children.
pub const DEFAULT_FPU: f64 = 1.2;

/// Width of the uniform jitter added to FPU to break ties ([0, JITTER)).
pub const FPU_JITTER: f64 = 0.01;

/// Default per-move wall-clock budget in milliseconds.
pub const DEFAULT_DEADLINE_MS: u64 = 490;

/// Default arena capacity in bytes (node count = this / size_of::<Node>()).
pub const DEFAULT_ARENA_BYTES: usize = 500_000_000;

/// Check the deadline every this many playouts, to amortize the clock syscall.
pub const DEADLINE_CHECK_PERIOD: usize = 100;

/// log2 lookup table domain: values below this use the precomputed table.
pub const LOG2_TABLE_SIZE: usize = 1024;

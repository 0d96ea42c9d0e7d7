//! Structured error taxonomy for the engine.
//!
//! `thiserror` gives each variant a `Display` impl without hand-writing one.
//! Binary-level code (`main.rs`, `io.rs`) wraps these in `anyhow::Result`
//! at the outermost boundary rather than threading `anyhow::Error` through
//! the library.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed input on the line-oriented turn protocol.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Search was asked to move in a position with no legal moves (should
    /// only occur if a caller ignores a terminal [`crate::board::GlobalStatus`]).
    #[error("no legal move available")]
    NoLegalMove,

    /// The node arena ran out of room mid-search and wrapped, overwriting
    /// its oldest nodes. [`crate::arena::Arena`] already logs this once per
    /// search and keeps going — this variant exists for callers (tests,
    /// stricter CLI modes) that want to treat it as fatal instead.
    #[error("node arena exhausted ({capacity} nodes)")]
    ArenaExhausted { capacity: usize },
}

pub type Result<T> = std::result::Result<T, EngineError>;

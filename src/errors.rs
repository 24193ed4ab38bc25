use std::error::Error;
use std::fmt;

use crate::game_state::chess_types::Square;

/// Caller-contract violations surfaced by the game state. Neither is
/// recoverable internally: the caller must re-derive from the current
/// legal move list or stop undoing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// `apply` was called with endpoints not matching exactly one move in
    /// the current legal move list. No state change occurred.
    InvalidMove { start: Square, end: Square },
    /// `undo` was called with no moves played. No state change occurred.
    EmptyHistory,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidMove { start, end } => {
                write!(f, "no unique legal move from {start} to {end}")
            }
            EngineError::EmptyHistory => write!(f, "no moves to undo"),
        }
    }
}

impl Error for EngineError {}

//! Error types for game operations

use crate::board::Cell;

/// Recoverable game-logic errors: the offending input is rejected and the
/// state it was applied to is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("not a move: {0:?} (expected a single cell letter)")]
    InvalidMoveToken(String),

    #[error("cell {cell} is not on a size {size} board")]
    CellOffBoard { cell: Cell, size: u8 },

    #[error("cell {cell} is already claimed")]
    CellClaimed { cell: Cell },

    #[error("unsupported board size {0} (expected 1-5)")]
    UnsupportedSize(u8),

    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

impl GameError {
    /// True for a well-formed cell that cannot be played in this position
    pub fn is_illegal_move(&self) -> bool {
        matches!(self, GameError::CellOffBoard { .. } | GameError::CellClaimed { .. })
    }
}

use crate::game_state::chess_types::{CastlingRights, Move};

/// Single reversible record for `apply` / `undo`.
///
/// Stores the move itself plus the two facts the board alone cannot give
/// back: whether a pawn was promoted on arrival (the queen must revert to a
/// pawn), and which castling-right flags this particular move cleared (undo
/// restores only those, keeping rights monotonic under play).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryEntry {
    pub mv: Move,
    pub promoted: bool,
    pub cleared_rights: CastlingRights,
}

impl HistoryEntry {
    #[inline]
    pub fn new(mv: Move) -> Self {
        Self {
            mv,
            promoted: false,
            cleared_rights: CastlingRights::none(),
        }
    }
}

//! Square coverage analysis.
//!
//! For every square, the origins of the pieces attacking it, per color.
//! These are pseudo-attacks: legality, pins, and turn order are ignored, and
//! squares occupied by the attacker's own pieces are included so that
//! "defended" questions can be answered during check resolution.

use crate::game_state::board::Board;
use crate::game_state::chess_rules::{
    pawn_capture_deltas, BISHOP_DIRECTIONS, KING_OFFSETS, KNIGHT_OFFSETS, QUEEN_DIRECTIONS,
    ROOK_DIRECTIONS,
};
use crate::game_state::chess_types::{Color, PieceKind, Square};
use crate::move_generation::ray;

pub struct Coverage {
    covers: [[Vec<Square>; 2]; 64],
}

impl Coverage {
    /// Full recomputation over the given board.
    pub fn analyze(board: &Board) -> Self {
        let mut covers: [[Vec<Square>; 2]; 64] =
            std::array::from_fn(|_| [Vec::new(), Vec::new()]);

        let mut record = |target: Square, owner: Color, origin: Square| {
            covers[target.index()][owner.index()].push(origin);
        };

        for (origin, piece) in board.occupied() {
            match piece.kind {
                PieceKind::Pawn => {
                    for delta in pawn_capture_deltas(piece.color) {
                        if let Some(target) = origin.offset(delta) {
                            record(target, piece.color, origin);
                        }
                    }
                }
                PieceKind::Knight => {
                    for delta in KNIGHT_OFFSETS {
                        if let Some(target) = origin.offset(delta) {
                            record(target, piece.color, origin);
                        }
                    }
                }
                PieceKind::King => {
                    for delta in KING_OFFSETS {
                        if let Some(target) = origin.offset(delta) {
                            record(target, piece.color, origin);
                        }
                    }
                }
                PieceKind::Bishop => {
                    for target in ray::cast(board, origin, &BISHOP_DIRECTIONS) {
                        record(target, piece.color, origin);
                    }
                }
                PieceKind::Rook => {
                    for target in ray::cast(board, origin, &ROOK_DIRECTIONS) {
                        record(target, piece.color, origin);
                    }
                }
                PieceKind::Queen => {
                    for target in ray::cast(board, origin, &QUEEN_DIRECTIONS) {
                        record(target, piece.color, origin);
                    }
                }
            }
        }

        Self { covers }
    }

    /// Origins of `color`'s pieces attacking `square`.
    #[inline]
    pub fn covers(&self, square: Square, color: Color) -> &[Square] {
        &self.covers[square.index()][color.index()]
    }

    #[inline]
    pub fn is_covered(&self, square: Square, color: Color) -> bool {
        !self.covers[square.index()][color.index()].is_empty()
    }
}

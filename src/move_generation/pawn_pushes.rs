//! Pawn push analysis.
//!
//! Pushes are not captures and never appear in coverage; this pass records,
//! for every square, which pawns could push onto it. A double push is only
//! recorded from the home rank through an empty intermediate square. Whether
//! the destination itself is empty is left to the move generator: push
//! destinations must stay empty while capture destinations must not.

use crate::game_state::board::Board;
use crate::game_state::chess_rules::{pawn_home_rank, pawn_push_delta};
use crate::game_state::chess_types::{Color, PieceKind, Square};

pub struct PawnPushes {
    pushers: [[Vec<Square>; 2]; 64],
}

impl PawnPushes {
    pub fn analyze(board: &Board) -> Self {
        let mut pushers: [[Vec<Square>; 2]; 64] =
            std::array::from_fn(|_| [Vec::new(), Vec::new()]);

        for (origin, piece) in board.occupied() {
            if piece.kind != PieceKind::Pawn {
                continue;
            }
            let step = (0, pawn_push_delta(piece.color));

            let Some(single) = origin.offset(step) else {
                continue;
            };
            pushers[single.index()][piece.color.index()].push(origin);

            if origin.rank() == pawn_home_rank(piece.color) && board.is_empty(single) {
                if let Some(double) = single.offset(step) {
                    pushers[double.index()][piece.color.index()].push(origin);
                }
            }
        }

        Self { pushers }
    }

    /// Origins of `color`'s pawns that could push onto `square`.
    #[inline]
    pub fn pushers(&self, square: Square, color: Color) -> &[Square] {
        &self.pushers[square.index()][color.index()]
    }
}

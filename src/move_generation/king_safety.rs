//! King safety analysis.
//!
//! Locates the side-to-move's king, lists the pieces checking it, and walks
//! the eight king-centered rays to classify absolute pins and the squares
//! the king may not retreat to while a slider holds it in check.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, PieceKind, Square};
use crate::move_generation::coverage::Coverage;

use crate::game_state::chess_rules::QUEEN_DIRECTIONS;

/// A friendly piece that may only move along its pin ray.
#[derive(Debug)]
pub struct Pin {
    pub square: Square,
    /// Empty ray squares plus the pinning piece's own square.
    pub allowed: Vec<Square>,
}

#[derive(Debug)]
pub struct KingSafety {
    pub king: Square,
    /// Enemy origins covering the king's square.
    pub checkers: Vec<Square>,
    /// Empty squares between the king and a directly checking slider;
    /// candidates for blocking. Meaningful only under a single check.
    pub check_span: Vec<Square>,
    /// Squares directly behind the king on direct-check rays. Stepping onto
    /// one keeps the king inside the attacker's line even though the king's
    /// own body hides it from coverage.
    pub forbidden_retreats: Vec<Square>,
    pins: Vec<Pin>,
}

impl KingSafety {
    /// Returns `None` when the side has no king on the board.
    pub fn analyze(board: &Board, coverage: &Coverage, side: Color) -> Option<Self> {
        let king = board.king_square(side)?;
        let checkers = coverage.covers(king, side.opposite()).to_vec();

        let mut check_span = Vec::new();
        let mut forbidden_retreats = Vec::new();
        let mut pins = Vec::new();

        for direction in QUEEN_DIRECTIONS {
            let mut blockers: Vec<Square> = Vec::new();
            let mut span: Vec<Square> = Vec::new();
            let mut threat: Option<Square> = None;

            let mut cursor = king.offset(direction);
            while let Some(square) = cursor {
                match board.piece_at(square) {
                    None => span.push(square),
                    Some(piece) if piece.color == side => {
                        blockers.push(square);
                        if blockers.len() > 1 {
                            break;
                        }
                    }
                    Some(piece) => {
                        if slider_attacks_along(piece.kind, direction) {
                            threat = Some(square);
                        }
                        break;
                    }
                }
                cursor = square.offset(direction);
            }

            let Some(threat_square) = threat else {
                continue;
            };

            match blockers.len() {
                0 => {
                    // Direct check along this ray.
                    if let Some(behind) = king.offset((-direction.0, -direction.1)) {
                        forbidden_retreats.push(behind);
                    }
                    check_span = span;
                }
                1 => {
                    let mut allowed = span;
                    allowed.push(threat_square);
                    pins.push(Pin {
                        square: blockers[0],
                        allowed,
                    });
                }
                _ => {}
            }
        }

        Some(Self {
            king,
            checkers,
            check_span,
            forbidden_retreats,
            pins,
        })
    }

    #[inline]
    pub fn is_pinned(&self, square: Square) -> bool {
        self.pins.iter().any(|pin| pin.square == square)
    }

    /// Destination whitelist for a pinned piece, `None` when unpinned.
    #[inline]
    pub fn pin_allowed(&self, square: Square) -> Option<&[Square]> {
        self.pins
            .iter()
            .find(|pin| pin.square == square)
            .map(|pin| pin.allowed.as_slice())
    }
}

/// Whether a piece of this kind slides along the given direction.
#[inline]
fn slider_attacks_along(kind: PieceKind, direction: (i8, i8)) -> bool {
    let orthogonal = direction.0 == 0 || direction.1 == 0;
    match kind {
        PieceKind::Rook => orthogonal,
        PieceKind::Bishop => !orthogonal,
        PieceKind::Queen => true,
        _ => false,
    }
}

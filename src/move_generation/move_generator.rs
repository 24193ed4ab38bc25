//! Legal move derivation.
//!
//! Combines coverage, pawn pushes, and king safety into the exhaustive
//! legal move list for one side, branching on how many pieces give check:
//! two or more checkers leave only king moves, a single checker can also be
//! captured or blocked, and an unchecked side moves freely subject to pins,
//! castling conditions, and the en passant window.

use crate::game_state::board::Board;
use crate::game_state::chess_rules::{castle_between, castle_king_path, KING_OFFSETS};
use crate::game_state::chess_types::{
    CastlingRights, Color, Move, Piece, PieceKind, Square, Wing, WINGS,
};
use crate::move_generation::coverage::Coverage;
use crate::move_generation::king_safety::KingSafety;
use crate::move_generation::pawn_pushes::PawnPushes;

/// En passant opportunity, derived from the most recent move each time the
/// move list is rebuilt; never stored across plies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnPassantState {
    /// The enemy pawn that just double-pushed.
    pub victim: Square,
    /// Where a capturing pawn lands: the square the victim skipped.
    pub attacker_end: Square,
    /// Friendly pawns beside the victim, able to capture it immediately.
    pub attackers: Vec<Square>,
}

impl EnPassantState {
    /// `last_move` is the move just played by `side.opposite()`. Yields a
    /// state only for a two-square pawn push with at least one adjacent
    /// capturer.
    pub fn derive(board: &Board, last_move: Option<&Move>, side: Color) -> Option<Self> {
        let &Move::Normal { start, end, .. } = last_move? else {
            return None;
        };

        let enemy = side.opposite();
        let pawn = board.piece_at(end)?;
        if pawn != Piece::new(PieceKind::Pawn, enemy) {
            return None;
        }
        if start.file() != end.file() || start.rank().abs_diff(end.rank()) != 2 {
            return None;
        }

        let skipped_rank = (start.rank() + end.rank()) / 2;
        let attacker_end = Square::new(end.file(), skipped_rank);

        let mut attackers = Vec::new();
        for delta in [(-1, 0), (1, 0)] {
            if let Some(beside) = end.offset(delta) {
                if board.piece_at(beside) == Some(Piece::new(PieceKind::Pawn, side)) {
                    attackers.push(beside);
                }
            }
        }

        if attackers.is_empty() {
            None
        } else {
            Some(Self {
                victim: end,
                attacker_end,
                attackers,
            })
        }
    }
}

pub struct LegalMoves {
    pub in_check: bool,
    pub moves: Vec<Move>,
}

/// Full recomputation of the legal move list for `side`.
pub fn generate(
    board: &Board,
    side: Color,
    rights: CastlingRights,
    en_passant: Option<&EnPassantState>,
) -> LegalMoves {
    let coverage = Coverage::analyze(board);
    let pushes = PawnPushes::analyze(board);

    let Some(safety) = KingSafety::analyze(board, &coverage, side) else {
        return LegalMoves {
            in_check: false,
            moves: Vec::new(),
        };
    };

    let in_check = !safety.checkers.is_empty();
    let mut moves = Vec::new();

    if in_check {
        if let [threat] = safety.checkers[..] {
            generate_checker_captures(board, &coverage, &safety, side, threat, &mut moves);
            generate_blocks(board, &coverage, &pushes, &safety, side, &mut moves);

            // The one case where en passant resolves a check: the checker is
            // itself the freshly double-pushed pawn.
            if let Some(ep) = en_passant {
                if ep.victim == threat {
                    generate_en_passant(board, side, ep, &mut moves);
                }
            }
        }

        // King escapes apply to single and double check alike.
        generate_king_escapes(board, &coverage, &safety, side, &mut moves);
    } else {
        generate_quiet_position_moves(board, &coverage, &pushes, &safety, side, &mut moves);

        for wing in WINGS {
            if rights.allows(side, wing) && castle_available(board, &coverage, side, wing) {
                moves.push(match wing {
                    Wing::Short => Move::CastleShort,
                    Wing::Long => Move::CastleLong,
                });
            }
        }

        if let Some(ep) = en_passant {
            generate_en_passant(board, side, ep, &mut moves);
        }
    }

    LegalMoves { in_check, moves }
}

/// Non-king captures of the single checking piece. King captures are left
/// to the escape scan so each `(start, end)` pair is produced exactly once.
fn generate_checker_captures(
    board: &Board,
    coverage: &Coverage,
    safety: &KingSafety,
    side: Color,
    threat: Square,
    moves: &mut Vec<Move>,
) {
    let capture = board.piece_at(threat);
    for &origin in coverage.covers(threat, side) {
        let Some(piece) = board.piece_at(origin) else {
            continue;
        };
        if piece.kind == PieceKind::King {
            continue;
        }
        // A piece pinned on one ray can never resolve a check on another.
        if safety.is_pinned(origin) {
            continue;
        }
        moves.push(Move::Normal {
            start: origin,
            end: threat,
            capture,
        });
    }
}

/// Interpositions on the empty squares between king and checking slider.
fn generate_blocks(
    board: &Board,
    coverage: &Coverage,
    pushes: &PawnPushes,
    safety: &KingSafety,
    side: Color,
    moves: &mut Vec<Move>,
) {
    for &target in &safety.check_span {
        for &origin in coverage.covers(target, side) {
            let Some(piece) = board.piece_at(origin) else {
                continue;
            };
            // Pawn coverage is capture-only and the king cannot stand in
            // front of itself; both block by other means or not at all.
            if piece.kind == PieceKind::King || piece.kind == PieceKind::Pawn {
                continue;
            }
            if safety.is_pinned(origin) {
                continue;
            }
            moves.push(Move::Normal {
                start: origin,
                end: target,
                capture: None,
            });
        }

        for &origin in pushes.pushers(target, side) {
            if safety.is_pinned(origin) {
                continue;
            }
            moves.push(Move::Normal {
                start: origin,
                end: target,
                capture: None,
            });
        }
    }
}

/// King steps to adjacent squares that are in bounds, not friendly-occupied,
/// uncovered by the enemy, and not directly behind the king on a live check
/// ray (coverage cannot see through the king's own body).
fn generate_king_escapes(
    board: &Board,
    coverage: &Coverage,
    safety: &KingSafety,
    side: Color,
    moves: &mut Vec<Move>,
) {
    let enemy = side.opposite();
    for delta in KING_OFFSETS {
        let Some(target) = safety.king.offset(delta) else {
            continue;
        };
        if matches!(board.piece_at(target), Some(piece) if piece.color == side) {
            continue;
        }
        if coverage.is_covered(target, enemy) {
            continue;
        }
        if safety.forbidden_retreats.contains(&target) {
            continue;
        }
        moves.push(Move::Normal {
            start: safety.king,
            end: target,
            capture: board.piece_at(target),
        });
    }
}

/// The no-check branch: every cover of every square becomes a candidate
/// move, validated per piece kind, then filtered by the pin whitelist.
fn generate_quiet_position_moves(
    board: &Board,
    coverage: &Coverage,
    pushes: &PawnPushes,
    safety: &KingSafety,
    side: Color,
    moves: &mut Vec<Move>,
) {
    let enemy = side.opposite();

    for index in 0..64 {
        let target = Square::from_index(index);
        let occupant = board.piece_at(target);

        for &origin in coverage.covers(target, side) {
            let Some(mover) = board.piece_at(origin) else {
                continue;
            };

            let valid = match mover.kind {
                // A pawn's covered squares are its capture squares.
                PieceKind::Pawn => matches!(occupant, Some(p) if p.color == enemy),
                PieceKind::King => {
                    occupant.map_or(true, |p| p.color == enemy)
                        && !coverage.is_covered(target, enemy)
                }
                _ => occupant.map_or(true, |p| p.color == enemy),
            };
            if !valid {
                continue;
            }

            if let Some(allowed) = safety.pin_allowed(origin) {
                if !allowed.contains(&target) {
                    continue;
                }
            }

            moves.push(Move::Normal {
                start: origin,
                end: target,
                capture: occupant,
            });
        }

        if occupant.is_none() {
            for &origin in pushes.pushers(target, side) {
                if let Some(allowed) = safety.pin_allowed(origin) {
                    if !allowed.contains(&target) {
                        continue;
                    }
                }
                moves.push(Move::Normal {
                    start: origin,
                    end: target,
                    capture: None,
                });
            }
        }
    }
}

/// Castling on a wing: king and rook at home, the squares between them
/// empty, and the king's start/transit/destination squares uncovered.
fn castle_available(board: &Board, coverage: &Coverage, side: Color, wing: Wing) -> bool {
    if !board.castle_pieces_at_home(side, wing) {
        return false;
    }
    if castle_between(side, wing)
        .iter()
        .any(|&square| !board.is_empty(square))
    {
        return false;
    }
    let enemy = side.opposite();
    castle_king_path(side, wing)
        .iter()
        .all(|&square| !coverage.is_covered(square, enemy))
}

fn generate_en_passant(board: &Board, side: Color, ep: &EnPassantState, moves: &mut Vec<Move>) {
    for &origin in &ep.attackers {
        if en_passant_keeps_king_safe(board, side, origin, ep) {
            moves.push(Move::EnPassant {
                start: origin,
                end: ep.attacker_end,
            });
        }
    }
}

/// En passant removes two pieces from the victim's rank at once, which the
/// single-blocker pin analysis cannot represent, so each candidate is
/// simulated on a scratch board and rejected if the king ends up covered.
/// This also screens ordinary pins on the capturing pawn and, under check,
/// confirms the capture actually lifts the check.
fn en_passant_keeps_king_safe(
    board: &Board,
    side: Color,
    start: Square,
    ep: &EnPassantState,
) -> bool {
    let mut scratch = board.clone();
    scratch.clear(ep.victim);
    if let Some(pawn) = scratch.clear(start) {
        scratch.set(ep.attacker_end, pawn);
    }

    match scratch.king_square(side) {
        Some(king) => !Coverage::analyze(&scratch).is_covered(king, side.opposite()),
        None => true,
    }
}

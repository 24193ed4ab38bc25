//! Central game state.
//!
//! Owns the board, turn, castling rights, and reversible history, and keeps
//! a cached legality snapshot (`in_check` plus the full legal move list)
//! that is recomputed from scratch after every mutation. Callers pick moves
//! from the cached list and address them by their `(start, end)` endpoints.

use crate::errors::EngineError;
use crate::game_state::board::Board;
use crate::game_state::chess_rules::{
    castle_king_end, castle_rook_end, king_start, pawn_home_rank, pawn_push_delta,
    promotion_rank, rook_start,
};
use crate::game_state::chess_types::{
    CastlingRights, Color, Move, Piece, PieceKind, Square, Wing, WINGS,
};
use crate::game_state::history::HistoryEntry;
use crate::move_generation::move_generator::{self, EnPassantState};
use crate::utils::fen_parser::parse_fen;

#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    side_to_move: Color,
    castling_rights: CastlingRights,
    history: Vec<HistoryEntry>,
    in_check: bool,
    legal_moves: Vec<Move>,
}

impl GameState {
    /// Standard starting position, white to move.
    pub fn new() -> Self {
        Self::from_position(Board::standard(), Color::White)
    }

    /// Arbitrary position with an empty history. Castling rights are granted
    /// wherever king and rook still stand on their original squares.
    pub fn from_position(board: Board, side: Color) -> Self {
        let mut rights = CastlingRights::none();
        for color in [Color::White, Color::Black] {
            for wing in WINGS {
                if board.castle_pieces_at_home(color, wing) {
                    rights.grant(color, wing);
                }
            }
        }

        let mut state = Self {
            board,
            side_to_move: side,
            castling_rights: rights,
            history: Vec::new(),
            in_check: false,
            legal_moves: Vec::new(),
        };
        state.refresh();
        state
    }

    pub fn from_fen(fen: &str) -> Result<Self, String> {
        parse_fen(fen)
    }

    /// Assembles a state from parsed FEN fields. An en passant target square
    /// is realized by synthesizing the double push that implies it, so the
    /// derived en passant window works exactly as if the move were played.
    pub(crate) fn from_setup(
        board: Board,
        side: Color,
        rights: CastlingRights,
        en_passant_target: Option<Square>,
    ) -> Result<Self, String> {
        for color in [Color::White, Color::Black] {
            let kings = board
                .occupied()
                .filter(|(_, p)| *p == Piece::new(PieceKind::King, color))
                .count();
            if kings != 1 {
                return Err(format!("expected exactly one king per side, found {kings}"));
            }
        }

        // Keep only the rights the piece placement can still support.
        let mut effective = CastlingRights::none();
        for color in [Color::White, Color::Black] {
            for wing in WINGS {
                if rights.allows(color, wing) && board.castle_pieces_at_home(color, wing) {
                    effective.grant(color, wing);
                }
            }
        }

        let mut history = Vec::new();
        if let Some(target) = en_passant_target {
            history.push(synthesize_double_push(&board, side, target)?);
        }

        let mut state = Self {
            board,
            side_to_move: side,
            castling_rights: effective,
            history,
            in_check: false,
            legal_moves: Vec::new(),
        };
        state.refresh();
        Ok(state)
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn in_check(&self) -> bool {
        self.in_check
    }

    #[inline]
    pub fn legal_moves(&self) -> &[Move] {
        &self.legal_moves
    }

    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    #[inline]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn king_position(&self, color: Color) -> Option<Square> {
        self.board.king_square(color)
    }

    /// Plays the unique cached legal move with these endpoints. The board
    /// mutation, rights bookkeeping, and history push happen together, then
    /// the legality snapshot is rebuilt for the other side.
    pub fn apply(&mut self, start: Square, end: Square) -> Result<(), EngineError> {
        let side = self.side_to_move;

        let mut matched: Option<Move> = None;
        let mut count = 0usize;
        for &mv in &self.legal_moves {
            if mv.endpoints(side) == (start, end) {
                matched = Some(mv);
                count += 1;
            }
        }
        let mv = match (matched, count) {
            (Some(mv), 1) => mv,
            _ => return Err(EngineError::InvalidMove { start, end }),
        };

        let mut entry = HistoryEntry::new(mv);

        match mv {
            Move::Normal { start, end, capture } => {
                // A rook captured on its original corner loses that right
                // for its owner.
                if let Some(captured) = capture {
                    if captured.kind == PieceKind::Rook {
                        for wing in WINGS {
                            if end == rook_start(captured.color, wing) {
                                self.revoke_right(captured.color, wing, &mut entry);
                            }
                        }
                    }
                }

                let moved = self
                    .board
                    .clear(start)
                    .expect("legal move starts from an occupied square");

                if moved.kind == PieceKind::Pawn && end.rank() == promotion_rank(side) {
                    self.board.set(end, Piece::new(PieceKind::Queen, side));
                    entry.promoted = true;
                } else {
                    self.board.set(end, moved);
                }

                match moved.kind {
                    PieceKind::King => {
                        for wing in WINGS {
                            self.revoke_right(side, wing, &mut entry);
                        }
                    }
                    PieceKind::Rook => {
                        for wing in WINGS {
                            if start == rook_start(side, wing) {
                                self.revoke_right(side, wing, &mut entry);
                            }
                        }
                    }
                    _ => {}
                }
            }
            Move::CastleShort | Move::CastleLong => {
                let wing = castle_wing(mv);
                let king = self
                    .board
                    .clear(king_start(side))
                    .expect("castling starts with the king at home");
                self.board.set(castle_king_end(side, wing), king);
                let rook = self
                    .board
                    .clear(rook_start(side, wing))
                    .expect("castling starts with the rook at home");
                self.board.set(castle_rook_end(side, wing), rook);

                for w in WINGS {
                    self.revoke_right(side, w, &mut entry);
                }
            }
            Move::EnPassant { start, end } => {
                let moved = self
                    .board
                    .clear(start)
                    .expect("en passant starts from an occupied square");
                self.board.set(end, moved);
                // The victim sits beside the start square, not on the
                // destination.
                self.board.clear(Square::new(end.file(), start.rank()));
            }
        }

        self.history.push(entry);
        self.side_to_move = side.opposite();
        self.refresh();
        Ok(())
    }

    /// Reverts the most recent move exactly: board, side, and precisely the
    /// castling rights that move had cleared.
    pub fn undo(&mut self) -> Result<(), EngineError> {
        let entry = self.history.pop().ok_or(EngineError::EmptyHistory)?;
        let mover = self.side_to_move.opposite();

        match entry.mv {
            Move::Normal { start, end, capture } => {
                let mut moved = self
                    .board
                    .clear(end)
                    .expect("undone move ends on an occupied square");
                if entry.promoted {
                    moved = Piece::new(PieceKind::Pawn, mover);
                }
                self.board.set(start, moved);
                if let Some(captured) = capture {
                    self.board.set(end, captured);
                }
            }
            Move::CastleShort | Move::CastleLong => {
                let wing = castle_wing(entry.mv);
                let king = self
                    .board
                    .clear(castle_king_end(mover, wing))
                    .expect("undone castle has the king on its destination");
                self.board.set(king_start(mover), king);
                let rook = self
                    .board
                    .clear(castle_rook_end(mover, wing))
                    .expect("undone castle has the rook on its destination");
                self.board.set(rook_start(mover, wing), rook);
            }
            Move::EnPassant { start, end } => {
                let moved = self
                    .board
                    .clear(end)
                    .expect("undone en passant ends on an occupied square");
                self.board.set(start, moved);
                self.board.set(
                    Square::new(end.file(), start.rank()),
                    Piece::new(PieceKind::Pawn, mover.opposite()),
                );
            }
        }

        for color in [Color::White, Color::Black] {
            for wing in WINGS {
                if entry.cleared_rights.allows(color, wing) {
                    self.castling_rights.grant(color, wing);
                }
            }
        }

        self.side_to_move = mover;
        self.refresh();
        Ok(())
    }

    fn revoke_right(&mut self, color: Color, wing: Wing, entry: &mut HistoryEntry) {
        if self.castling_rights.revoke(color, wing) {
            entry.cleared_rights.grant(color, wing);
        }
    }

    /// Rebuilds the cached legality snapshot from the current position. The
    /// en passant window is derived from the last history entry, never
    /// stored on its own.
    fn refresh(&mut self) {
        let last_move = self.history.last().map(|entry| entry.mv);
        let en_passant =
            EnPassantState::derive(&self.board, last_move.as_ref(), self.side_to_move);
        let result = move_generator::generate(
            &self.board,
            self.side_to_move,
            self.castling_rights,
            en_passant.as_ref(),
        );
        self.in_check = result.in_check;
        self.legal_moves = result.moves;
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn castle_wing(mv: Move) -> Wing {
    match mv {
        Move::CastleLong => Wing::Long,
        _ => Wing::Short,
    }
}

/// Reconstructs the double push implied by a FEN en passant target square.
fn synthesize_double_push(
    board: &Board,
    side: Color,
    target: Square,
) -> Result<HistoryEntry, String> {
    let pusher = side.opposite();
    let expected_target_rank = match pusher {
        Color::White => 2,
        Color::Black => 5,
    };
    if target.rank() != expected_target_rank {
        return Err(format!(
            "en passant target {target} does not match the side to move"
        ));
    }

    let start = Square::new(target.file(), pawn_home_rank(pusher));
    let end = match target.offset((0, pawn_push_delta(pusher))) {
        Some(square) => square,
        None => return Err(format!("en passant target {target} has no pawn square")),
    };

    if board.piece_at(end) != Some(Piece::new(PieceKind::Pawn, pusher)) {
        return Err(format!(
            "en passant target {target} is not behind a {pusher:?} pawn"
        ));
    }
    if !board.is_empty(start) || !board.is_empty(target) {
        return Err(format!(
            "en passant target {target} implies an impossible double push"
        ));
    }

    Ok(HistoryEntry::new(Move::Normal {
        start,
        end,
        capture: None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::algebraic::algebraic_to_square;

    fn sq(name: &str) -> Square {
        algebraic_to_square(name).expect("test square should parse")
    }

    fn play(state: &mut GameState, moves: &[(&str, &str)]) {
        for (start, end) in moves {
            state
                .apply(sq(start), sq(end))
                .unwrap_or_else(|e| panic!("move {start}{end} should be legal: {e}"));
        }
    }

    #[test]
    fn fresh_game_has_twenty_moves_for_white() {
        let state = GameState::new();
        assert_eq!(state.side_to_move(), Color::White);
        assert!(!state.in_check());
        assert_eq!(state.legal_moves().len(), 20);
        assert_eq!(state.history_len(), 0);
        assert_eq!(state.king_position(Color::White), Some(sq("e1")));
        assert_eq!(state.king_position(Color::Black), Some(sq("e8")));
    }

    #[test]
    fn known_positions_have_known_move_counts() {
        // Strong whole-pipeline checks: classic move-count fixtures
        // featuring pins, castling, and check evasion.
        let cases = [
            ("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 20),
            ("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 14),
            (
                "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
                48,
            ),
            (
                "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1",
                6,
            ),
        ];
        for (fen, expected) in cases {
            let state = GameState::from_fen(fen).expect("fixture FEN should parse");
            assert_eq!(
                state.legal_moves().len(),
                expected,
                "move count mismatch for {fen}"
            );
        }
    }

    #[test]
    fn invalid_apply_is_rejected_without_state_change() {
        let mut state = GameState::new();
        let err = state.apply(sq("e2"), sq("e6")).expect_err("e2e6 is not legal");
        assert_eq!(
            err,
            EngineError::InvalidMove {
                start: sq("e2"),
                end: sq("e6"),
            }
        );
        assert_eq!(state.legal_moves().len(), 20);
        assert_eq!(state.side_to_move(), Color::White);
        assert_eq!(state.history_len(), 0);
    }

    #[test]
    fn undo_on_fresh_game_reports_empty_history() {
        let mut state = GameState::new();
        assert_eq!(state.undo(), Err(EngineError::EmptyHistory));
    }

    #[test]
    fn every_legal_move_round_trips_through_undo() {
        let fens = [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        ];

        for fen in fens {
            let mut state = GameState::from_fen(fen).expect("fixture FEN should parse");
            let before_board = state.board().clone();
            let before_side = state.side_to_move();
            let before_rights = state.castling_rights();
            let before_moves = state.legal_moves().to_vec();

            for mv in before_moves.clone() {
                let (start, end) = mv.endpoints(before_side);
                state
                    .apply(start, end)
                    .unwrap_or_else(|e| panic!("{mv:?} should apply: {e}"));
                state.undo().expect("undo after apply should succeed");

                assert_eq!(*state.board(), before_board, "board after {mv:?}");
                assert_eq!(state.side_to_move(), before_side);
                assert_eq!(state.castling_rights(), before_rights);
                assert_eq!(state.history_len(), 0);
                assert_eq!(state.legal_moves(), before_moves.as_slice());
            }
        }
    }

    #[test]
    fn castling_executes_and_undoes_both_wings() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
        let mut state = GameState::from_fen(fen).expect("castling FEN should parse");

        play(&mut state, &[("e1", "g1")]);
        assert_eq!(
            state.board().piece_at(sq("g1")),
            Some(Piece::new(PieceKind::King, Color::White))
        );
        assert_eq!(
            state.board().piece_at(sq("f1")),
            Some(Piece::new(PieceKind::Rook, Color::White))
        );
        assert!(state.board().is_empty(sq("e1")));
        assert!(state.board().is_empty(sq("h1")));
        assert!(!state.castling_rights().allows(Color::White, Wing::Short));
        assert!(!state.castling_rights().allows(Color::White, Wing::Long));
        assert!(state.castling_rights().allows(Color::Black, Wing::Short));

        play(&mut state, &[("e8", "c8")]);
        assert_eq!(
            state.board().piece_at(sq("c8")),
            Some(Piece::new(PieceKind::King, Color::Black))
        );
        assert_eq!(
            state.board().piece_at(sq("d8")),
            Some(Piece::new(PieceKind::Rook, Color::Black))
        );

        state.undo().expect("undo black castle");
        state.undo().expect("undo white castle");
        assert_eq!(
            state.board().piece_at(sq("e1")),
            Some(Piece::new(PieceKind::King, Color::White))
        );
        assert_eq!(
            state.board().piece_at(sq("h1")),
            Some(Piece::new(PieceKind::Rook, Color::White))
        );
        assert!(state.castling_rights().allows(Color::White, Wing::Short));
        assert!(state.castling_rights().allows(Color::Black, Wing::Long));
    }

    #[test]
    fn rights_cleared_by_play_are_not_resurrected_by_later_undos() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
        let mut state = GameState::from_fen(fen).expect("castling FEN should parse");

        // The rook trip h1-h2-h1 burns the short right for good.
        play(&mut state, &[("h1", "h2"), ("a8", "a7"), ("h2", "h1"), ("a7", "a8")]);
        assert!(!state.castling_rights().allows(Color::White, Wing::Short));
        assert!(state.castling_rights().allows(Color::White, Wing::Long));

        // Undoing the return trip must not restore the right: only the
        // original departure cleared it.
        state.undo().expect("undo a7a8");
        state.undo().expect("undo h2h1");
        assert!(!state.castling_rights().allows(Color::White, Wing::Short));

        // Undoing the departure itself does restore it.
        state.undo().expect("undo a8a7");
        state.undo().expect("undo h1h2");
        assert!(state.castling_rights().allows(Color::White, Wing::Short));
    }

    #[test]
    fn capturing_a_home_rook_clears_the_owners_right() {
        let fen = "r3k3/8/8/8/8/8/8/R3K3 w Qq - 0 1";
        let mut state = GameState::from_fen(fen).expect("open-file FEN should parse");
        assert!(state.castling_rights().allows(Color::Black, Wing::Long));

        play(&mut state, &[("a1", "a8")]);
        assert!(!state.castling_rights().allows(Color::White, Wing::Long));
        assert!(!state.castling_rights().allows(Color::Black, Wing::Long));

        state.undo().expect("undo the rook trade");
        assert!(state.castling_rights().allows(Color::White, Wing::Long));
        assert!(state.castling_rights().allows(Color::Black, Wing::Long));
    }

    #[test]
    fn en_passant_window_opens_for_one_ply_only() {
        let mut state = GameState::new();
        play(&mut state, &[("e2", "e4"), ("a7", "a6"), ("e4", "e5"), ("d7", "d5")]);

        let ep = Move::EnPassant {
            start: sq("e5"),
            end: sq("d6"),
        };
        assert!(state.legal_moves().contains(&ep));

        // Decline it; the window is gone next turn.
        play(&mut state, &[("b1", "c3"), ("a6", "a5")]);
        assert!(!state
            .legal_moves()
            .iter()
            .any(|mv| matches!(mv, Move::EnPassant { .. })));
    }

    #[test]
    fn en_passant_capture_executes_and_undoes() {
        let mut state = GameState::new();
        play(&mut state, &[("e2", "e4"), ("a7", "a6"), ("e4", "e5"), ("d7", "d5")]);
        let before = state.board().clone();

        play(&mut state, &[("e5", "d6")]);
        assert_eq!(
            state.board().piece_at(sq("d6")),
            Some(Piece::new(PieceKind::Pawn, Color::White))
        );
        assert!(state.board().is_empty(sq("d5")), "victim leaves its own square");
        assert!(state.board().is_empty(sq("e5")));

        state.undo().expect("undo en passant");
        assert_eq!(*state.board(), before);
        assert!(state.legal_moves().contains(&Move::EnPassant {
            start: sq("e5"),
            end: sq("d6"),
        }));
    }

    #[test]
    fn promotion_always_yields_a_queen_and_undoes_to_a_pawn() {
        let fen = "1b5k/P7/8/8/8/8/8/K7 w - - 0 1";
        let mut state = GameState::from_fen(fen).expect("promotion FEN should parse");

        play(&mut state, &[("a7", "b8")]);
        assert_eq!(
            state.board().piece_at(sq("b8")),
            Some(Piece::new(PieceKind::Queen, Color::White))
        );

        state.undo().expect("undo the promotion capture");
        assert_eq!(
            state.board().piece_at(sq("a7")),
            Some(Piece::new(PieceKind::Pawn, Color::White))
        );
        assert_eq!(
            state.board().piece_at(sq("b8")),
            Some(Piece::new(PieceKind::Bishop, Color::Black))
        );
    }

    #[test]
    fn scholars_mate_sequence_ends_in_mate() {
        let mut state = GameState::new();
        play(
            &mut state,
            &[
                ("e2", "e4"),
                ("e7", "e5"),
                ("f1", "c4"),
                ("b8", "c6"),
                ("d1", "h5"),
                ("g8", "f6"),
                ("h5", "f7"),
            ],
        );

        assert_eq!(state.side_to_move(), Color::Black);
        assert!(state.in_check());
        assert!(
            state.legal_moves().is_empty(),
            "the defended queen on f7 mates: {:?}",
            state.legal_moves()
        );
    }

    #[test]
    fn fools_mate_is_checkmate() {
        let mut state = GameState::new();
        play(
            &mut state,
            &[("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")],
        );

        assert!(state.in_check());
        assert!(state.legal_moves().is_empty());
    }

    #[test]
    fn stalemate_is_no_check_with_no_moves() {
        let state =
            GameState::from_fen("k7/8/1Q6/8/8/8/8/K7 b - - 0 1").expect("stalemate FEN");
        assert!(!state.in_check());
        assert!(state.legal_moves().is_empty());
    }

    #[test]
    fn fen_en_passant_target_opens_the_window() {
        let state = GameState::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1")
            .expect("en passant FEN should parse");
        assert!(state.legal_moves().contains(&Move::EnPassant {
            start: sq("e5"),
            end: sq("d6"),
        }));

        // Same position without the target square offers no capture.
        let state = GameState::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - - 0 1")
            .expect("plain FEN should parse");
        assert!(!state
            .legal_moves()
            .iter()
            .any(|mv| matches!(mv, Move::EnPassant { .. })));
    }

    #[test]
    fn from_position_derives_rights_from_placement() {
        let mut board = Board::standard();
        board.clear(sq("h1"));
        let state = GameState::from_position(board, Color::White);
        assert!(!state.castling_rights().allows(Color::White, Wing::Short));
        assert!(state.castling_rights().allows(Color::White, Wing::Long));
        assert!(state.castling_rights().allows(Color::Black, Wing::Short));
    }
}

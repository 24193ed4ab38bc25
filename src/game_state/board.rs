//! Mailbox board representation.
//!
//! A total mapping from every square to an optional piece, mutated in place
//! by the game state and read by every analysis pass.

use crate::game_state::chess_rules::{back_rank, pawn_home_rank};
use crate::game_state::chess_types::{Color, Piece, PieceKind, Square, Wing};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; 64],
}

impl Board {
    #[inline]
    pub fn empty() -> Self {
        Self {
            squares: [None; 64],
        }
    }

    /// Standard starting position.
    pub fn standard() -> Self {
        let mut board = Self::empty();

        for color in [Color::White, Color::Black] {
            let rank = back_rank(color);
            for file in 0..8 {
                board.set(
                    Square::new(file, pawn_home_rank(color)),
                    Piece::new(PieceKind::Pawn, color),
                );
            }
            for (file, kind) in [
                (0, PieceKind::Rook),
                (1, PieceKind::Knight),
                (2, PieceKind::Bishop),
                (3, PieceKind::Queen),
                (4, PieceKind::King),
                (5, PieceKind::Bishop),
                (6, PieceKind::Knight),
                (7, PieceKind::Rook),
            ] {
                board.set(Square::new(file, rank), Piece::new(kind, color));
            }
        }

        board
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.index()]
    }

    #[inline]
    pub fn is_empty(&self, square: Square) -> bool {
        self.squares[square.index()].is_none()
    }

    #[inline]
    pub fn set(&mut self, square: Square, piece: Piece) {
        self.squares[square.index()] = Some(piece);
    }

    /// Empties a square, returning whatever occupied it.
    #[inline]
    pub fn clear(&mut self, square: Square) -> Option<Piece> {
        self.squares[square.index()].take()
    }

    /// All occupied squares with their pieces, in index order.
    pub fn occupied(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.squares
            .iter()
            .enumerate()
            .filter_map(|(index, piece)| piece.map(|p| (Square::from_index(index), p)))
    }

    /// Linear scan for the king. `None` only on hand-built boards that have
    /// not placed one yet.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.occupied()
            .find(|(_, piece)| piece.kind == PieceKind::King && piece.color == color)
            .map(|(square, _)| square)
    }

    /// True when this color's king and the wing's rook still sit on their
    /// original squares.
    pub fn castle_pieces_at_home(&self, color: Color, wing: Wing) -> bool {
        use crate::game_state::chess_rules::{king_start, rook_start};
        self.piece_at(king_start(color)) == Some(Piece::new(PieceKind::King, color))
            && self.piece_at(rook_start(color, wing)) == Some(Piece::new(PieceKind::Rook, color))
    }
}

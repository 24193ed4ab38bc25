//! Core value types shared by the board, move generation, and game state.

pub use crate::game_state::board::Board;
pub use crate::game_state::game_state::GameState;
pub use crate::game_state::history::HistoryEntry;

/// Side to move / piece owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    #[inline]
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Self { kind, color }
    }
}

/// Board coordinate. Both axes are always in `0..8`; construction through
/// `new`/`from_index`/`offset` keeps out-of-range values unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    /// Panics if either axis is out of range; use `offset` for fallible steps.
    #[inline]
    pub fn new(file: u8, rank: u8) -> Self {
        assert!(file < 8 && rank < 8, "square ({file}, {rank}) off the board");
        Self { file, rank }
    }

    #[inline]
    pub fn from_index(index: usize) -> Self {
        assert!(index < 64, "square index {index} out of range");
        Self {
            file: (index / 8) as u8,
            rank: (index % 8) as u8,
        }
    }

    #[inline]
    pub const fn file(self) -> u8 {
        self.file
    }

    #[inline]
    pub const fn rank(self) -> u8 {
        self.rank
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.file as usize * 8 + self.rank as usize
    }

    /// Step by a signed delta, `None` when the result leaves the board.
    #[inline]
    pub fn offset(self, delta: (i8, i8)) -> Option<Square> {
        let file = self.file as i8 + delta.0;
        let rank = self.rank as i8 + delta.1;
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Some(Square {
                file: file as u8,
                rank: rank as u8,
            })
        } else {
            None
        }
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}",
            char::from(b'a' + self.file),
            char::from(b'1' + self.rank)
        )
    }
}

/// Castling wing: short is the king-side rook, long the queen-side rook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wing {
    Short,
    Long,
}

impl Wing {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Wing::Short => 0,
            Wing::Long => 1,
        }
    }
}

pub const WINGS: [Wing; 2] = [Wing::Short, Wing::Long];

/// Per-color, per-wing castling eligibility. Rights only move towards
/// `false` during play; `undo` restores exactly the flags a move cleared,
/// so the same type also serves as the "flags cleared by this move" record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlingRights {
    flags: [[bool; 2]; 2],
}

impl CastlingRights {
    #[inline]
    pub const fn all() -> Self {
        Self {
            flags: [[true; 2]; 2],
        }
    }

    #[inline]
    pub const fn none() -> Self {
        Self {
            flags: [[false; 2]; 2],
        }
    }

    #[inline]
    pub const fn allows(&self, color: Color, wing: Wing) -> bool {
        self.flags[color.index()][wing.index()]
    }

    #[inline]
    pub fn grant(&mut self, color: Color, wing: Wing) {
        self.flags[color.index()][wing.index()] = true;
    }

    /// Clears one flag; returns whether it was previously set.
    #[inline]
    pub fn revoke(&mut self, color: Color, wing: Wing) -> bool {
        let was = self.flags[color.index()][wing.index()];
        self.flags[color.index()][wing.index()] = false;
        was
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.flags.iter().all(|per_color| per_color.iter().all(|&f| !f))
    }
}

/// A legal move, tagged with its execution protocol. Castle variants are
/// interpreted for the side to move at execution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Normal {
        start: Square,
        end: Square,
        /// Occupant of `end` before the move, kept for undo.
        capture: Option<Piece>,
    },
    CastleShort,
    CastleLong,
    EnPassant {
        start: Square,
        end: Square,
    },
}

impl Move {
    /// The `(start, end)` pair a caller addresses this move by. Castles map
    /// to the king's two-file hop on the mover's back rank.
    pub fn endpoints(&self, side: Color) -> (Square, Square) {
        use crate::game_state::chess_rules::{back_rank, KING_START_FILE};
        match *self {
            Move::Normal { start, end, .. } => (start, end),
            Move::EnPassant { start, end } => (start, end),
            Move::CastleShort => {
                let rank = back_rank(side);
                (
                    Square::new(KING_START_FILE, rank),
                    Square::new(KING_START_FILE + 2, rank),
                )
            }
            Move::CastleLong => {
                let rank = back_rank(side);
                (
                    Square::new(KING_START_FILE, rank),
                    Square::new(KING_START_FILE - 2, rank),
                )
            }
        }
    }
}

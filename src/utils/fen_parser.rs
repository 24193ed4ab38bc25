//! FEN-to-GameState parser.
//!
//! Builds a fully-populated game state from a Forsyth-Edwards Notation
//! string: board layout, side to move, castling rights, and the en passant
//! target square. The clock fields are validated syntactically and then
//! ignored; no draw rules depend on them here.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{
    CastlingRights, Color, GameState, Piece, PieceKind, Square, Wing,
};
use crate::utils::algebraic::algebraic_to_square;

pub fn parse_fen(fen: &str) -> Result<GameState, String> {
    let mut parts = fen.split_whitespace();

    let board_part = parts.next().ok_or("Missing board layout in FEN")?;
    let side_part = parts.next().ok_or("Missing side-to-move in FEN")?;
    let castling_part = parts.next().ok_or("Missing castling rights in FEN")?;
    let en_passant_part = parts.next().ok_or("Missing en-passant square in FEN")?;
    let halfmove_part = parts.next().ok_or("Missing halfmove clock in FEN")?;
    let fullmove_part = parts.next().ok_or("Missing fullmove number in FEN")?;

    if parts.next().is_some() {
        return Err("FEN has extra trailing fields".to_owned());
    }

    let board = parse_board(board_part)?;
    let side = parse_side_to_move(side_part)?;
    let rights = parse_castling_rights(castling_part)?;
    let en_passant = parse_en_passant_square(en_passant_part)?;

    halfmove_part
        .parse::<u16>()
        .map_err(|_| format!("Invalid halfmove clock: {halfmove_part}"))?;
    fullmove_part
        .parse::<u16>()
        .map_err(|_| format!("Invalid fullmove number: {fullmove_part}"))?;

    GameState::from_setup(board, side, rights, en_passant)
}

fn parse_board(board_part: &str) -> Result<Board, String> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err("Board layout must contain 8 ranks".to_owned());
    }

    let mut board = Board::empty();

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let board_rank = 7 - fen_rank_idx as u8;
        let mut file = 0u8;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(format!("Invalid empty-square count '{ch}'"));
                }
                file += empty_count as u8;
                if file > 8 {
                    return Err("Board rank has too many files".to_owned());
                }
                continue;
            }

            let piece = piece_from_fen_char(ch)
                .ok_or_else(|| format!("Invalid piece character '{ch}' in board layout"))?;

            if file >= 8 {
                return Err("Board rank has too many files".to_owned());
            }

            board.set(Square::new(file, board_rank), piece);
            file += 1;
        }

        if file != 8 {
            return Err("Board rank does not sum to 8 files".to_owned());
        }
    }

    Ok(board)
}

fn parse_side_to_move(side_part: &str) -> Result<Color, String> {
    match side_part {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(format!("Invalid side-to-move field: {side_part}")),
    }
}

fn parse_castling_rights(castling_part: &str) -> Result<CastlingRights, String> {
    let mut rights = CastlingRights::none();
    if castling_part == "-" {
        return Ok(rights);
    }

    for ch in castling_part.chars() {
        match ch {
            'K' => rights.grant(Color::White, Wing::Short),
            'Q' => rights.grant(Color::White, Wing::Long),
            'k' => rights.grant(Color::Black, Wing::Short),
            'q' => rights.grant(Color::Black, Wing::Long),
            _ => return Err(format!("Invalid castling rights character: {ch}")),
        }
    }

    Ok(rights)
}

fn parse_en_passant_square(en_passant_part: &str) -> Result<Option<Square>, String> {
    if en_passant_part == "-" {
        return Ok(None);
    }

    Ok(Some(algebraic_to_square(en_passant_part)?))
}

fn piece_from_fen_char(ch: char) -> Option<Piece> {
    let color = if ch.is_ascii_uppercase() {
        Color::White
    } else if ch.is_ascii_lowercase() {
        Color::Black
    } else {
        return None;
    };

    let kind = match ch.to_ascii_lowercase() {
        'p' => PieceKind::Pawn,
        'n' => PieceKind::Knight,
        'b' => PieceKind::Bishop,
        'r' => PieceKind::Rook,
        'q' => PieceKind::Queen,
        'k' => PieceKind::King,
        _ => return None,
    };

    Some(Piece::new(kind, color))
}

#[cfg(test)]
mod tests {
    use super::parse_fen;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::{Color, Piece, PieceKind, Square, Wing};
    use crate::utils::render_board::render_board;

    #[test]
    fn parse_starting_fen_matches_the_standard_setup() {
        let state = parse_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");

        println!("\n{}", render_board(state.board()));

        assert_eq!(state.side_to_move(), Color::White);
        assert_eq!(
            state.board().piece_at(Square::new(4, 0)),
            Some(Piece::new(PieceKind::King, Color::White))
        );
        assert_eq!(state.legal_moves().len(), 20);
        assert!(state.castling_rights().allows(Color::Black, Wing::Long));
    }

    #[test]
    fn rights_inconsistent_with_placement_are_dropped() {
        // Full rights claimed, but the white king-side rook is missing.
        let state = parse_fen("r3k2r/8/8/8/8/8/8/R3K3 w KQkq - 0 1")
            .expect("FEN should parse");
        assert!(!state.castling_rights().allows(Color::White, Wing::Short));
        assert!(state.castling_rights().allows(Color::White, Wing::Long));
        assert!(state.castling_rights().allows(Color::Black, Wing::Short));
    }

    #[test]
    fn malformed_fens_are_rejected() {
        assert!(parse_fen("").is_err());
        assert!(parse_fen("8/8/8/8/8/8/8 w - - 0 1").is_err());
        assert!(parse_fen("9/8/8/8/8/8/8/8 w - - 0 1").is_err());
        assert!(parse_fen("8/8/8/8/8/8/8/8 x - - 0 1").is_err());
        assert!(parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0").is_err());
        assert!(parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - zero 1").is_err());
        // No kings on the board.
        assert!(parse_fen("8/8/8/8/8/8/8/8 w - - 0 1").is_err());
        // En passant target on the wrong rank for the side to move.
        assert!(parse_fen("4k3/8/8/3pP3/8/8/8/4K3 b - d6 0 1").is_err());
    }
}

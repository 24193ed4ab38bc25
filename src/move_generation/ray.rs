use crate::game_state::board::Board;
use crate::game_state::chess_types::Square;

/// Casts each direction vector outward from `origin`, collecting visited
/// squares. A ray includes the first occupied square it meets and stops
/// there; otherwise it runs to the board edge. Pure function of the board.
pub fn cast(board: &Board, origin: Square, directions: &[(i8, i8)]) -> Vec<Square> {
    let mut squares = Vec::new();

    for &direction in directions {
        let mut cursor = origin.offset(direction);
        while let Some(square) = cursor {
            squares.push(square);
            if !board.is_empty(square) {
                break;
            }
            cursor = square.offset(direction);
        }
    }

    squares
}

//! Move-choosing abstraction layered over the engine.
//!
//! Agents only read the public game state (cached legal moves, side to
//! move) and answer with the endpoints to feed back into `apply`; they
//! never compute legality themselves. Human front-ends and automated
//! policies plug in behind the same trait.

use crate::game_state::chess_types::{GameState, Square};

pub trait Agent {
    fn name(&self) -> &str;

    /// Endpoints of the chosen move, or `None` when the position is
    /// terminal (no legal moves: checkmate or stalemate).
    fn choose_move(&mut self, game_state: &GameState) -> Option<(Square, Square)>;
}

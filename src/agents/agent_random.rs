//! Random-choice agent.
//!
//! Selects uniformly from the cached legal moves; used for diagnostics,
//! integration testing, and low-strength gameplay.

use rand::prelude::IndexedRandom;

use crate::agents::agent_trait::Agent;
use crate::game_state::chess_types::{GameState, Square};

#[derive(Default)]
pub struct RandomAgent;

impl RandomAgent {
    pub fn new() -> Self {
        Self
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        "random"
    }

    fn choose_move(&mut self, game_state: &GameState) -> Option<(Square, Square)> {
        let mut rng = rand::rng();
        game_state
            .legal_moves()
            .choose(&mut rng)
            .map(|mv| mv.endpoints(game_state.side_to_move()))
    }
}

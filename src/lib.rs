//! Crate root module declarations for the Walnut Chess engine.
//!
//! Exposes the game-state model, the move-generation pipeline, the agent
//! seam, and utility helpers so binaries, tests, and external front-ends
//! can import stable module paths.

pub mod errors;

pub mod game_state {
    pub mod board;
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_state;
    pub mod history;
}

pub mod move_generation {
    pub mod coverage;
    pub mod king_safety;
    pub mod move_generator;
    pub mod pawn_pushes;
    pub mod ray;
}

pub mod agents {
    pub mod agent_random;
    pub mod agent_trait;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_parser;
    pub mod render_board;
}

//! Host layer: game loop thread, shared state, and progression wiring.

pub mod game_loop;
pub mod state;

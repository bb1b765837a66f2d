//! STARFIGHTER simulation — headless, deterministic session core.
//!
//! Owns the entity containers, the wave/boss scripting, the collision
//! pipeline, and the session state machine. No rendering, audio, or
//! input capture; collaborators drive it through commands and consume
//! per-tick snapshots and events.

pub mod engine;
pub mod entities;
pub mod input;
pub mod systems;
pub mod timefx;

#[cfg(test)]
mod tests;

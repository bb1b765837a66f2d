//! Core types and definitions for the STARFIGHTER simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geometry, enums, commands, events, snapshot views, constants, and
//! the external configuration tables. It has no dependency on any
//! runtime framework.

pub mod commands;
pub mod config;
pub mod constants;
pub mod enums;
pub mod events;
pub mod state;
pub mod types;

//! Mytikas - rules engine for the Mytikas board game

pub mod core;
pub mod engine;
pub mod utils;

// Re-export commonly used items
pub use crate::core::{execute_turn, generate_turns, Position, Turn};
pub use engine::Engine;

mod engine;
mod options;
mod playout;

pub use engine::Engine;
pub use options::{EngineOptions, Seed};
pub use playout::{perft, playout, random_turn, Playout};

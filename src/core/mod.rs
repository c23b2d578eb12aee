//! Core game representations and rules

pub mod action;
pub mod board;
pub mod convert;
pub mod display;
pub mod encoding;
pub mod error;
pub mod execute;
pub mod gods;
pub mod movegen;
pub mod position;
pub mod side;

pub use action::{Action, ActionKind, Turn, MAX_ACTIONS};
pub use board::{Field, FIELD_COUNT};
pub use convert::{FromIndex, ToIndex};
pub use display::PositionDiff;
pub use error::DecodeError;
pub use execute::{execute_action, execute_actions, execute_turn};
pub use gods::{God, GodInfo, StatusFx, PANTHEON};
pub use movegen::generate_turns;
pub use position::{GodState, Occupant, Position};
pub use side::{Side, SideArray};

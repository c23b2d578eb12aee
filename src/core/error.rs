//! Errors for malformed external input

use thiserror::Error;

/// Failure to decode a position string, a turn string, or one of their parts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unexpected end of input at position {0}")]
    UnexpectedEnd(usize),
    #[error("invalid character {ch:?} at position {pos}")]
    InvalidChar { ch: char, pos: usize },
    #[error("value {value} exceeds limit {limit} at position {pos}")]
    OutOfRange { value: usize, limit: usize, pos: usize },
    #[error("zero hit points for a god in play at position {0}")]
    ZeroHitPoints(usize),
    #[error("trailing data at position {0}")]
    TrailingData(usize),
    #[error("field {0} is occupied twice")]
    DoubleOccupancy(String),
    #[error("unknown god id {0:?}")]
    UnknownGod(char),
    #[error("unknown action symbol {0:?}")]
    UnknownActionKind(char),
    #[error("invalid field name {0:?}")]
    InvalidField(String),
    #[error("malformed action {0:?}")]
    MalformedAction(String),
    #[error("too many actions in turn (max {0})")]
    TooManyActions(usize),
    #[error("empty input")]
    Empty,
}

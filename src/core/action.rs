//! Actions and turns, with their text notation

use anyhow::{anyhow, Result};
use arrayvec::ArrayVec;
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;
use std::{fmt::Display, ops::Deref, str::FromStr};

use super::board::Field;
use super::convert::{FromIndex, ToIndex};
use super::error::DecodeError;
use super::gods::God;

/// Most actions a single turn can hold
pub const MAX_ACTIONS: usize = 6;

const KIND_SYMBOLS: [char; 4] = ['@', '>', '!', '+'];
const PASS: &str = "x";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, FromPrimitive, ToPrimitive)]
pub enum ActionKind {
    Summon,
    Move,
    Attack,
    Special,
}

impl ActionKind {
    pub fn symbol(self) -> char {
        KIND_SYMBOLS[self as usize]
    }

    pub fn from_symbol(c: char) -> Option<Self> {
        KIND_SYMBOLS
            .iter()
            .position(|&s| s == c)
            .and_then(FromPrimitive::from_usize)
    }
}

impl FromIndex for ActionKind {
    fn from_index(idx: usize) -> Result<Self> {
        FromPrimitive::from_usize(idx)
            .ok_or_else(|| anyhow!("Invalid action kind index: {}", idx))
    }
}

impl ToIndex for ActionKind {
    fn to_index(&self) -> usize {
        *self as usize
    }
}

/// One step of a turn. `field` is the gate for a summon, the destination for
/// a move, and the target (or the attacker's own field for area attacks)
/// for attacks and specials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Action {
    pub kind: ActionKind,
    pub god: God,
    pub field: Field,
}

impl Action {
    pub fn new(kind: ActionKind, god: God, field: Field) -> Self {
        Self { kind, god, field }
    }

    pub fn summon(god: God, field: Field) -> Self {
        Self::new(ActionKind::Summon, god, field)
    }

    pub fn move_to(god: God, field: Field) -> Self {
        Self::new(ActionKind::Move, god, field)
    }

    pub fn attack(god: God, field: Field) -> Self {
        Self::new(ActionKind::Attack, god, field)
    }

    pub fn special(god: God, field: Field) -> Self {
        Self::new(ActionKind::Special, god, field)
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.god.to_id_char(), self.kind.symbol(), self.field)
    }
}

impl FromStr for Action {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(god), Some(kind)) = (chars.next(), chars.next()) else {
            return Err(DecodeError::MalformedAction(s.to_string()));
        };
        let god = God::from_id_char(god).ok_or(DecodeError::UnknownGod(god))?;
        let kind = ActionKind::from_symbol(kind).ok_or(DecodeError::UnknownActionKind(kind))?;
        let field = chars.as_str().parse()?;
        Ok(Action { kind, god, field })
    }
}

/// Everything one side does before play passes over. Empty means pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Turn {
    actions: ArrayVec<Action, MAX_ACTIONS>,
}

impl Turn {
    pub fn pass() -> Self {
        Self::default()
    }

    pub fn from_actions(actions: &[Action]) -> Self {
        debug_assert!(actions.len() <= MAX_ACTIONS);
        Self { actions: actions.iter().copied().collect() }
    }

    pub fn is_pass(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn push(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub fn pop(&mut self) -> Option<Action> {
        self.actions.pop()
    }
}

impl Deref for Turn {
    type Target = [Action];

    fn deref(&self) -> &Self::Target {
        &self.actions
    }
}

impl Display for Turn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_pass() {
            return write!(f, "{}", PASS);
        }
        for (i, action) in self.actions.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", action)?;
        }
        Ok(())
    }
}

impl FromStr for Turn {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DecodeError::Empty);
        }
        if s == PASS {
            return Ok(Turn::pass());
        }
        let mut turn = Turn::pass();
        for part in s.split(',') {
            if turn.actions.is_full() {
                return Err(DecodeError::TooManyActions(MAX_ACTIONS));
            }
            turn.push(part.trim().parse()?);
        }
        Ok(turn)
    }
}

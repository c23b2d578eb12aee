use anyhow::{anyhow, Result};
use arrayvec::ArrayVec;
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;
use std::ops::{BitAnd, BitOr, BitOrAssign, Not};

use super::board::{Coords, Field};
use super::convert::{FromIndex, ToIndex};
use super::side::Side;

pub const GOD_COUNT: usize = 12;

/// The twelve gods each side may field, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, FromPrimitive, ToPrimitive)]
pub enum God {
    Zeus,
    Hephaestus,
    Hera,
    Poseidon,
    Apollo,
    Aphrodite,
    Ares,
    Hermes,
    Dionysos,
    Artemis,
    Hades,
    Athena,
}

impl God {
    pub fn all() -> impl Iterator<Item = God> {
        (0..GOD_COUNT).map(|i| PANTHEON[i].god)
    }

    pub fn info(self) -> &'static GodInfo {
        &PANTHEON[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// One-letter identifier used by turn notation
    pub fn to_id_char(self) -> char {
        self.info().id
    }

    pub fn from_id_char(c: char) -> Option<Self> {
        PANTHEON.iter().find(|info| info.id == c).map(|info| info.god)
    }

    pub fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl FromIndex for God {
    fn from_index(idx: usize) -> Result<Self> {
        FromPrimitive::from_usize(idx)
            .ok_or_else(|| anyhow!("Invalid god index: {}", idx))
    }
}

impl ToIndex for God {
    fn to_index(&self) -> usize {
        *self as usize
    }
}

/// Bitmask of status effects on a god
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StatusFx(u8);

impl StatusFx {
    pub const NONE: StatusFx = StatusFx(0);
    /// Bound by an enemy Hades. The only effect not derived from adjacency.
    pub const CHAINED: StatusFx = StatusFx(1);
    /// +1 attack damage, granted by Hephaestus
    pub const DAMAGE_BOOST: StatusFx = StatusFx(2);
    /// +1 movement, granted by Hermes
    pub const SPEED_BOOST: StatusFx = StatusFx(4);
    /// Immune to damage, granted by Athena
    pub const SHIELDED: StatusFx = StatusFx(8);

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: StatusFx) -> bool {
        self.0 & other.0 == other.0 && !other.is_empty()
    }

    pub fn insert(&mut self, other: StatusFx) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: StatusFx) {
        self.0 &= !other.0;
    }
}

impl BitOr for StatusFx {
    type Output = StatusFx;

    fn bitor(self, rhs: Self) -> Self::Output {
        StatusFx(self.0 | rhs.0)
    }
}

impl BitOrAssign for StatusFx {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for StatusFx {
    type Output = StatusFx;

    fn bitand(self, rhs: Self) -> Self::Output {
        StatusFx(self.0 & rhs.0)
    }
}

impl Not for StatusFx {
    type Output = StatusFx;

    fn not(self) -> Self::Output {
        StatusFx(!self.0)
    }
}

/// A step on the board, in rows and columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dir {
    pub dr: i32,
    pub dc: i32,
}

const fn dir(dr: i32, dc: i32) -> Dir {
    Dir { dr, dc }
}

pub const ORTHO_DIRS: &[Dir] = &[dir(-1, 0), dir(0, 1), dir(0, -1), dir(1, 0)];
pub const DIAG_DIRS: &[Dir] = &[dir(-1, -1), dir(-1, 1), dir(1, -1), dir(1, 1)];
pub const ALL_DIRS: &[Dir] = &[
    dir(-1, 0), dir(0, 1), dir(0, -1), dir(1, 0),
    dir(-1, -1), dir(-1, 1), dir(1, -1), dir(1, 1),
];
pub const KNIGHT_DIRS: &[Dir] = &[
    dir(-2, -1), dir(-2, 1), dir(-1, -2), dir(-1, 2),
    dir(1, -2), dir(1, 2), dir(2, -1), dir(2, 1),
];

/// How a pattern reaches fields further than one step away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// Slide along each direction, stopping at the first occupied field
    Direct,
    /// Breadth-first flood fill through empty fields
    Indirect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern {
    pub dirs: &'static [Dir],
    pub traversal: Traversal,
}

/// Fixed set of fields hit by an area attack, relative to the attacker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaShape {
    /// Three columns wide, the two rows in front of the attacker
    Front,
    /// The 3x3 square centred on the attacker
    Square,
    /// Fields orthogonally adjacent to the attacker
    Diamond,
}

impl AreaShape {
    /// Fields covered when attacking from `origin`, in ascending order.
    pub fn fields(self, side: Side, origin: Field) -> ArrayVec<Field, 9> {
        let Coords { r, c } = origin.coords();
        let contains = |fr: i32, fc: i32| -> bool {
            let (dr, dc) = (fr - r, fc - c);
            match self {
                AreaShape::Front => {
                    let ahead = dr * side.forward();
                    (1..=2).contains(&ahead) && dc.abs() <= 1
                }
                AreaShape::Square => (dr, dc) != (0, 0) && dr.abs() <= 1 && dc.abs() <= 1,
                AreaShape::Diamond => dr.abs() + dc.abs() == 1,
            }
        };
        let mut fields = ArrayVec::new();
        for dr in -2..=2 {
            for dc in -1..=1 {
                if contains(r + dr, c + dc) {
                    if let Some(field) = Field::at(r + dr, c + dc) {
                        fields.push(field);
                    }
                }
            }
        }
        fields
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackKind {
    Ranged(Pattern),
    Area(AreaShape),
}

/// Ability used through a special action, dispatched by god
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Special {
    None,
    /// Hermes: attack a second enemy right after attacking
    DoubleAttack,
    /// Hades: bind an adjacent enemy
    Chain,
    /// Aphrodite: trade places with an ally anywhere on the board
    Swap,
    /// Artemis: hit any enemy for 1, taking 1 in return
    WitheringMoon,
    /// Dionysos: knight leaps that kill where they land
    Frenzy,
}

#[derive(Debug, Clone)]
pub struct GodInfo {
    pub god: God,
    pub name: &'static str,
    pub id: char,
    pub hit: u8,
    pub mov: u8,
    pub dmg: u8,
    pub rng: u8,
    pub movement: Pattern,
    pub attack: AttackKind,
    /// Effect granted to same-side neighbours
    pub aura: StatusFx,
    pub special: Special,
    /// Damage dealt to each adjacent enemy when landing on a field
    pub landing_damage: u8,
}

const fn pattern(dirs: &'static [Dir], traversal: Traversal) -> Pattern {
    Pattern { dirs, traversal }
}

pub const PANTHEON: [GodInfo; GOD_COUNT] = [
    GodInfo {
        god: God::Zeus,
        name: "Zeus",
        id: 'Z',
        hit: 10,
        mov: 1,
        dmg: 10,
        rng: 3,
        movement: pattern(ALL_DIRS, Traversal::Indirect),
        attack: AttackKind::Ranged(pattern(ORTHO_DIRS, Traversal::Direct)),
        aura: StatusFx::NONE,
        special: Special::None,
        landing_damage: 0,
    },
    GodInfo {
        god: God::Hephaestus,
        name: "Hephaestus",
        id: 'H',
        hit: 9,
        mov: 2,
        dmg: 7,
        rng: 2,
        movement: pattern(ORTHO_DIRS, Traversal::Indirect),
        attack: AttackKind::Ranged(pattern(ORTHO_DIRS, Traversal::Direct)),
        aura: StatusFx::DAMAGE_BOOST,
        special: Special::None,
        landing_damage: 0,
    },
    GodInfo {
        god: God::Hera,
        name: "Hera",
        id: 'E',
        hit: 8,
        mov: 2,
        dmg: 5,
        rng: 2,
        movement: pattern(DIAG_DIRS, Traversal::Indirect),
        attack: AttackKind::Ranged(pattern(DIAG_DIRS, Traversal::Indirect)),
        aura: StatusFx::NONE,
        special: Special::None,
        landing_damage: 0,
    },
    GodInfo {
        god: God::Poseidon,
        name: "Poseidon",
        id: 'P',
        hit: 7,
        mov: 3,
        dmg: 4,
        rng: 0,
        movement: pattern(ORTHO_DIRS, Traversal::Indirect),
        attack: AttackKind::Area(AreaShape::Front),
        aura: StatusFx::NONE,
        special: Special::None,
        landing_damage: 0,
    },
    GodInfo {
        god: God::Apollo,
        name: "Apollo",
        id: 'O',
        hit: 6,
        mov: 2,
        dmg: 2,
        rng: 3,
        movement: pattern(ALL_DIRS, Traversal::Indirect),
        attack: AttackKind::Ranged(pattern(ALL_DIRS, Traversal::Indirect)),
        aura: StatusFx::NONE,
        special: Special::None,
        landing_damage: 0,
    },
    GodInfo {
        god: God::Aphrodite,
        name: "Aphrodite",
        id: 'A',
        hit: 6,
        mov: 3,
        dmg: 6,
        rng: 1,
        movement: pattern(ALL_DIRS, Traversal::Indirect),
        attack: AttackKind::Ranged(pattern(ALL_DIRS, Traversal::Indirect)),
        aura: StatusFx::NONE,
        special: Special::Swap,
        landing_damage: 0,
    },
    GodInfo {
        god: God::Ares,
        name: "Ares",
        id: 'R',
        hit: 5,
        mov: 3,
        dmg: 5,
        rng: 3,
        movement: pattern(ALL_DIRS, Traversal::Direct),
        attack: AttackKind::Ranged(pattern(ALL_DIRS, Traversal::Direct)),
        aura: StatusFx::NONE,
        special: Special::None,
        landing_damage: 1,
    },
    GodInfo {
        god: God::Hermes,
        name: "Hermes",
        id: 'M',
        hit: 5,
        mov: 3,
        dmg: 3,
        rng: 2,
        movement: pattern(ALL_DIRS, Traversal::Indirect),
        attack: AttackKind::Ranged(pattern(ALL_DIRS, Traversal::Direct)),
        aura: StatusFx::SPEED_BOOST,
        special: Special::DoubleAttack,
        landing_damage: 0,
    },
    GodInfo {
        god: God::Dionysos,
        name: "Dionysos",
        id: 'D',
        hit: 4,
        mov: 1,
        dmg: 4,
        rng: 0,
        movement: pattern(KNIGHT_DIRS, Traversal::Indirect),
        attack: AttackKind::Area(AreaShape::Square),
        aura: StatusFx::NONE,
        special: Special::Frenzy,
        landing_damage: 0,
    },
    GodInfo {
        god: God::Artemis,
        name: "Artemis",
        id: 'T',
        hit: 4,
        mov: 2,
        dmg: 4,
        rng: 2,
        movement: pattern(ALL_DIRS, Traversal::Indirect),
        attack: AttackKind::Ranged(pattern(DIAG_DIRS, Traversal::Direct)),
        aura: StatusFx::NONE,
        special: Special::WitheringMoon,
        landing_damage: 0,
    },
    GodInfo {
        god: God::Hades,
        name: "Hades",
        id: 'S',
        hit: 3,
        mov: 3,
        dmg: 3,
        rng: 1,
        movement: pattern(ALL_DIRS, Traversal::Direct),
        attack: AttackKind::Area(AreaShape::Diamond),
        aura: StatusFx::NONE,
        special: Special::Chain,
        landing_damage: 0,
    },
    GodInfo {
        god: God::Athena,
        name: "Athena",
        id: 'N',
        hit: 3,
        mov: 1,
        dmg: 3,
        rng: 3,
        movement: pattern(ALL_DIRS, Traversal::Indirect),
        attack: AttackKind::Ranged(pattern(ALL_DIRS, Traversal::Direct)),
        aura: StatusFx::SHIELDED,
        special: Special::None,
        landing_damage: 0,
    },
];

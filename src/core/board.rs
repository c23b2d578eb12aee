//! Board topology: the 41 fields of the diamond board.
//!
//! ```text
//!       a  b  c  d  e  f  g  h  i
//!   9              40               9
//!   8           37 38 39            8
//!   7        32 33 34 35 36         7
//!   6     25 26 27 28 29 30 31      6
//!   5  16 17 18 19 20 21 22 23 24   5
//!   4      9 10 11 12 13 14 15      4
//!   3         4  5  6  7  8         3
//!   2            1  2  3            2
//!   1               0               1
//!       a  b  c  d  e  f  g  h  i
//! ```

use std::{fmt::Display, str::FromStr};
use lazy_static::lazy_static;

use super::{error::DecodeError, side::Side};

pub const FIELD_COUNT: usize = 41;
pub const BOARD_SIZE: i32 = 9;

const fn on_board(r: i32, c: i32) -> bool {
    (r - 4).abs() + (c - 4).abs() <= 4
}

const fn build_coords() -> [Coords; FIELD_COUNT] {
    let mut coords = [Coords { r: 0, c: 0 }; FIELD_COUNT];
    let mut i = 0;
    let mut r = 0;
    while r < BOARD_SIZE {
        let mut c = 0;
        while c < BOARD_SIZE {
            if on_board(r, c) {
                coords[i] = Coords { r, c };
                i += 1;
            }
            c += 1;
        }
        r += 1;
    }
    coords
}

const fn build_index() -> [[i8; BOARD_SIZE as usize]; BOARD_SIZE as usize] {
    let mut index = [[-1i8; BOARD_SIZE as usize]; BOARD_SIZE as usize];
    let mut i = 0;
    while i < FIELD_COUNT {
        let Coords { r, c } = COORDS[i];
        index[r as usize][c as usize] = i as i8;
        i += 1;
    }
    index
}

const COORDS: [Coords; FIELD_COUNT] = build_coords();
const INDEX_BY_COORDS: [[i8; BOARD_SIZE as usize]; BOARD_SIZE as usize] = build_index();

const FIELD_NAMES: [&str; FIELD_COUNT] = [
                            "e1",
                      "d2", "e2", "f2",
                "c3", "d3", "e3", "f3", "g3",
          "b4", "c4", "d4", "e4", "f4", "g4", "h4",
    "a5", "b5", "c5", "d5", "e5", "f5", "g5", "h5", "i5",
          "b6", "c6", "d6", "e6", "f6", "g6", "h6",
                "c7", "d7", "e7", "f7", "g7",
                      "d8", "e8", "f8",
                            "e9",
];

/// Row/column of a field; row 0 is Light's back rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coords {
    pub r: i32,
    pub c: i32,
}

impl Coords {
    pub fn field(&self) -> Option<Field> {
        Field::at(self.r, self.c)
    }
}

/// A field on the board, identified by its index (0..41).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Field(u8);

impl Field {
    pub const fn new(index: usize) -> Self {
        debug_assert!(index < FIELD_COUNT);
        Self(index as u8)
    }

    pub fn from_index(index: usize) -> Option<Self> {
        (index < FIELD_COUNT).then_some(Field(index as u8))
    }

    pub fn at(r: i32, c: i32) -> Option<Self> {
        if !(0..BOARD_SIZE).contains(&r) || !(0..BOARD_SIZE).contains(&c) {
            return None;
        }
        let i = INDEX_BY_COORDS[r as usize][c as usize];
        (i >= 0).then_some(Field(i as u8))
    }

    /// Home gate of `side`; standing on the opponent's gate wins.
    pub const fn gate(side: Side) -> Self {
        match side {
            Side::Light => Field(0),
            Side::Dark => Field(FIELD_COUNT as u8 - 1),
        }
    }

    pub fn all() -> impl Iterator<Item = Field> {
        (0..FIELD_COUNT).map(Field::new)
    }

    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    pub const fn coords(&self) -> Coords {
        COORDS[self.0 as usize]
    }

    pub fn offset(&self, dr: i32, dc: i32) -> Option<Field> {
        let Coords { r, c } = self.coords();
        Field::at(r + dr, c + dc)
    }

    pub fn name(&self) -> &'static str {
        FIELD_NAMES[self.index()]
    }

    /// Fields adjacent to this one (all eight directions), in ascending order.
    pub fn neighbors(&self) -> &'static [Field] {
        &NEIGHBORS[self.index()]
    }

    pub fn is_adjacent(&self, other: Field) -> bool {
        let (a, b) = (self.coords(), other.coords());
        *self != other && (a.r - b.r).abs() <= 1 && (a.c - b.c).abs() <= 1
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Field {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DecodeError::InvalidField(s.to_string());
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(invalid());
        }
        let (col, row) = (bytes[0], bytes[1]);
        if !(b'a'..=b'i').contains(&col) || !(b'1'..=b'9').contains(&row) {
            return Err(invalid());
        }
        Field::at((row - b'1') as i32, (col - b'a') as i32).ok_or_else(invalid)
    }
}

/// Walks the neighbours of `src` and `dst` (a piece moving from `src` to
/// `dst`). `on_old` gets each field that neighbours `src` but not `dst`,
/// excluding `dst` itself; `on_new` gets each field that neighbours `dst`
/// but not `src`, excluding `src` itself.
pub fn neighbors_diff(
    src: Field,
    dst: Field,
    mut on_old: impl FnMut(Field),
    mut on_new: impl FnMut(Field),
) {
    let src_nbs = src.neighbors();
    let dst_nbs = dst.neighbors();
    let (mut i, mut j) = (0, 0);
    loop {
        match (src_nbs.get(i), dst_nbs.get(j)) {
            (None, None) => break,
            (Some(&f), Some(&g)) if f == g => {
                i += 1;
                j += 1;
            }
            (Some(&f), g) if g.map_or(true, |&g| f < g) => {
                if f != dst {
                    on_old(f);
                }
                i += 1;
            }
            (_, Some(&g)) => {
                if g != src {
                    on_new(g);
                }
                j += 1;
            }
            (Some(_), None) => unreachable!(),
        }
    }
}

lazy_static!(
    static ref NEIGHBORS: Vec<Vec<Field>> = Field::all()
        .map(|field| {
            let mut nbs: Vec<Field> = (-1..=1)
                .flat_map(|dr| (-1..=1).map(move |dc| (dr, dc)))
                .filter(|&d| d != (0, 0))
                .filter_map(|(dr, dc)| field.offset(dr, dc))
                .collect();
            nbs.sort();
            nbs
        })
        .collect();
);

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_field_count_and_order() {
        assert_eq!(Field::new(0).coords(), Coords { r: 0, c: 4 });
        assert_eq!(Field::new(16).coords(), Coords { r: 4, c: 0 });
        assert_eq!(Field::new(20).coords(), Coords { r: 4, c: 4 });
        assert_eq!(Field::new(40).coords(), Coords { r: 8, c: 4 });
        for field in Field::all() {
            let Coords { r, c } = field.coords();
            assert_eq!(Field::at(r, c), Some(field));
        }
    }

    #[test_case("e1", 0)]
    #[test_case("d2", 1)]
    #[test_case("a5", 16)]
    #[test_case("i5", 24)]
    #[test_case("e9", 40)]
    fn test_field_names(name: &str, index: usize) {
        let field: Field = name.parse().unwrap();
        assert_eq!(field.index(), index);
        assert_eq!(field.to_string(), name);
    }

    #[test_case("a1")]
    #[test_case("j5")]
    #[test_case("e0")]
    #[test_case("e10")]
    #[test_case("")]
    fn test_invalid_field_names(name: &str) {
        assert!(name.parse::<Field>().is_err());
    }

    #[test]
    fn test_gates() {
        assert_eq!(Field::gate(Side::Light).name(), "e1");
        assert_eq!(Field::gate(Side::Dark).name(), "e9");
    }

    #[test]
    fn test_neighbors() {
        let names = |f: Field| f.neighbors().iter().map(|n| n.name()).collect::<Vec<_>>();
        assert_eq!(names(Field::new(0)), vec!["d2", "e2", "f2"]);
        assert_eq!(names(Field::new(20)).len(), 8);
        assert_eq!(names(Field::new(16)), vec!["b4", "b5", "b6"]);
        for field in Field::all() {
            let nbs = field.neighbors();
            assert!(nbs.windows(2).all(|w| w[0] < w[1]));
            for nb in nbs {
                assert!(nb.neighbors().contains(&field));
                assert!(field.is_adjacent(*nb));
            }
        }
    }

    #[test]
    fn test_neighbors_diff() {
        let src: Field = "e4".parse().unwrap();
        let dst: Field = "e5".parse().unwrap();
        let (mut old, mut new) = (Vec::new(), Vec::new());
        neighbors_diff(src, dst, |f| old.push(f.name()), |f| new.push(f.name()));
        old.sort();
        new.sort();
        assert_eq!(old, vec!["d3", "e3", "f3"]);
        assert_eq!(new, vec!["d6", "e6", "f6"]);
    }

    #[test]
    fn test_neighbors_diff_far() {
        let src = Field::gate(Side::Light);
        let dst = Field::gate(Side::Dark);
        let (mut old, mut new) = (0, 0);
        neighbors_diff(src, dst, |_| old += 1, |_| new += 1);
        assert_eq!(old, 3);
        assert_eq!(new, 3);
    }
}

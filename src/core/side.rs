use anyhow::{anyhow, Result};
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;
use super::convert::{FromIndex, ToIndex};
use std::ops::{Index, IndexMut, Not};

/// Side/player in the game. Light moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, FromPrimitive, ToPrimitive)]
pub enum Side {
    Light,
    Dark,
}

impl Side {
    pub fn all() -> [Side; 2] {
        [Side::Light, Side::Dark]
    }

    /// Row direction this side attacks towards.
    pub fn forward(&self) -> i32 {
        match self {
            Side::Light => 1,
            Side::Dark => -1,
        }
    }

    pub fn opponent(self) -> Self {
        !self
    }

    pub fn name(&self) -> &'static str {
        match self {
            Side::Light => "Light",
            Side::Dark => "Dark",
        }
    }
}

impl FromIndex for Side {
    fn from_index(idx: usize) -> Result<Self> {
        FromPrimitive::from_usize(idx)
            .ok_or_else(|| anyhow!("Invalid side index: {}", idx))
    }
}

impl ToIndex for Side {
    fn to_index(&self) -> usize {
        *self as usize
    }
}

impl Not for Side {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Side::Light => Side::Dark,
            Side::Dark => Side::Light,
        }
    }
}

/// Array indexed by game side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SideArray<T> {
    pub values: [T; 2],
}

impl<T> SideArray<T> {
    pub const fn new(light: T, dark: T) -> Self {
        Self {
            values: [light, dark],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.values.iter_mut()
    }
}

impl<T> Index<Side> for SideArray<T> {
    type Output = T;

    fn index(&self, index: Side) -> &Self::Output {
        &self.values[index.to_index()]
    }
}

impl<T> IndexMut<Side> for SideArray<T> {
    fn index_mut(&mut self, index: Side) -> &mut Self::Output {
        &mut self.values[index.to_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_from_index() {
        assert_eq!(Side::from_index(0).unwrap(), Side::Light);
        assert_eq!(Side::from_index(1).unwrap(), Side::Dark);
        assert!(Side::from_index(2).is_err());
    }

    #[test]
    fn test_side_to_index() {
        assert_eq!(Side::Light.to_index(), 0);
        assert_eq!(Side::Dark.to_index(), 1);
    }

    #[test]
    fn test_opponent() {
        assert_eq!(Side::Light.opponent(), Side::Dark);
        assert_eq!(!Side::Dark, Side::Light);
        assert_eq!(Side::Light.forward(), -Side::Dark.forward());
    }

    #[test]
    fn test_side_array() {
        let mut array = SideArray::new(5, 10);

        assert_eq!(array[Side::Light], 5);
        assert_eq!(array[Side::Dark], 10);

        array[Side::Light] = 15;
        assert_eq!(array[Side::Light], 15);

        let values: Vec<_> = array.iter().copied().collect();
        assert_eq!(values, vec![15, 10]);

        for v in array.iter_mut() {
            *v *= 2;
        }
        assert_eq!(array[Side::Light], 30);
        assert_eq!(array[Side::Dark], 20);
    }
}

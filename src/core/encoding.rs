//! Compact text form of a position.
//!
//! The first character is the side to move. Then, for Light and Dark in
//! turn, one entry per god in table order: a field index (0..=40) followed
//! by a `(hp << 1) | chained` character, or one of the markers for a dead,
//! summonable or reserved god. All values are base-64 digits.

use std::str::FromStr;

use super::board::{Field, FIELD_COUNT};
use super::error::DecodeError;
use super::gods::{God, StatusFx};
use super::position::Position;
use super::side::Side;

const BASE64_DIGITS: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

const DEAD: usize = FIELD_COUNT;
const SUMMONABLE: usize = FIELD_COUNT + 1;
const RESERVED: usize = FIELD_COUNT + 2;

fn digit(value: usize) -> char {
    BASE64_DIGITS[value] as char
}

fn digit_value(c: char) -> Option<usize> {
    BASE64_DIGITS.iter().position(|&d| d as char == c)
}

struct Reader<'a> {
    chars: std::iter::Enumerate<std::str::Chars<'a>>,
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(s: &'a str) -> Self {
        Self { chars: s.chars().enumerate(), pos: 0 }
    }

    /// Reads one digit whose value must be below `limit`.
    fn read(&mut self, limit: usize) -> Result<usize, DecodeError> {
        let (pos, c) = self.chars.next().ok_or(DecodeError::UnexpectedEnd(self.pos))?;
        self.pos = pos + 1;
        let value = digit_value(c).ok_or(DecodeError::InvalidChar { ch: c, pos })?;
        if value >= limit {
            return Err(DecodeError::OutOfRange { value, limit, pos });
        }
        Ok(value)
    }

    fn finish(mut self) -> Result<(), DecodeError> {
        match self.chars.next() {
            Some((pos, _)) => Err(DecodeError::TrailingData(pos)),
            None => Ok(()),
        }
    }
}

impl Position {
    pub fn encode(&self) -> String {
        let mut s = String::with_capacity(1 + 4 * God::all().count());
        s.push(digit(self.side_to_move() as usize));
        for side in Side::all() {
            for god in God::all() {
                let state = self.god_state(side, god);
                if state.hp == 0 {
                    s.push(digit(DEAD));
                } else if let Some(field) = state.field {
                    s.push(digit(field.index()));
                    let chained = state.fx.contains(StatusFx::CHAINED) as usize;
                    s.push(digit(((state.hp as usize) << 1) | chained));
                } else if self.is_summonable(side, god) {
                    s.push(digit(SUMMONABLE));
                } else {
                    s.push(digit(RESERVED));
                }
            }
        }
        s
    }

    pub fn decode(s: &str) -> Result<Self, DecodeError> {
        if s.is_empty() {
            return Err(DecodeError::Empty);
        }
        let mut reader = Reader::new(s);
        let mut position = Position::with_gods(&[], &[]);

        let side = match reader.read(2)? {
            0 => Side::Light,
            _ => Side::Dark,
        };
        position.set_side_to_move(side);

        for side in Side::all() {
            for god in God::all() {
                let hit = god.info().hit;
                match reader.read(RESERVED + 1)? {
                    DEAD => {}
                    SUMMONABLE => {
                        position.restore(side, god, hit);
                        position.make_summonable(side, god);
                    }
                    RESERVED => position.restore(side, god, hit),
                    index => {
                        let field = Field::new(index);
                        let start = reader.pos;
                        let value = reader.read((hit as usize + 1) * 2)?;
                        let hp = (value >> 1) as u8;
                        if hp == 0 {
                            return Err(DecodeError::ZeroHitPoints(start));
                        }
                        if position.is_occupied(field) {
                            return Err(DecodeError::DoubleOccupancy(field.to_string()));
                        }
                        position.restore(side, god, hp);
                        position.place(side, god, field);
                        if value & 1 == 1 {
                            position.chain(side, god);
                        }
                    }
                }
            }
        }
        reader.finish()?;
        Ok(position)
    }
}

impl FromStr for Position {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::decode(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn initial_code() -> String {
        format!("A{}", "q".repeat(24))
    }

    #[test]
    fn test_initial_encoding() {
        assert_eq!(Position::initial().encode(), initial_code());
        assert_eq!(Position::decode(&initial_code()).unwrap(), Position::initial());
        assert_eq!(initial_code().parse::<Position>().unwrap(), Position::initial());
    }

    #[test]
    fn test_round_trip_with_effects() {
        let mut pos = Position::initial();
        pos.place(Side::Light, God::Hephaestus, "e3".parse().unwrap());
        pos.place(Side::Light, God::Zeus, "e4".parse().unwrap());
        pos.place(Side::Dark, God::Hades, "e5".parse().unwrap());
        pos.chain(Side::Light, God::Zeus);
        pos.deal_damage("e5".parse().unwrap(), 1);
        pos.make_reserved(Side::Dark, God::Athena);
        pos.end_turn();

        let code = pos.encode();
        let decoded = Position::decode(&code).unwrap();
        assert_eq!(decoded, pos);
        assert_eq!(decoded.encode(), code);
        assert!(decoded.has_fx(Side::Light, God::Zeus, StatusFx::DAMAGE_BOOST));
        assert!(decoded.has_fx(Side::Light, God::Zeus, StatusFx::CHAINED));
        assert!(decoded.is_reserved(Side::Dark, God::Athena));
        assert_eq!(decoded.hp(Side::Dark, God::Hades), 2);
        assert_eq!(decoded.side_to_move(), Side::Dark);
    }

    #[test]
    fn test_dead_gods() {
        let pos = Position::with_gods(&[God::Zeus], &[God::Athena]);
        let code = pos.encode();
        assert_eq!(&code[..3], "Aqp");
        assert_eq!(Position::decode(&code).unwrap(), pos);
    }

    #[test_case("", DecodeError::Empty; "empty")]
    #[test_case("C", DecodeError::OutOfRange { value: 2, limit: 2, pos: 0 }; "bad side")]
    #[test_case("Aqqq", DecodeError::UnexpectedEnd(4); "short")]
    #[test_case("Aqq*", DecodeError::InvalidChar { ch: '*', pos: 3 }; "invalid char")]
    #[test_case("Aqs", DecodeError::OutOfRange { value: 44, limit: 44, pos: 2 }; "bad marker")]
    fn test_decode_errors(code: &str, expected: DecodeError) {
        assert_eq!(Position::decode(code), Err(expected));
    }

    #[test]
    fn test_rejects_trailing_data() {
        let code = format!("{}q", initial_code());
        assert_eq!(Position::decode(&code), Err(DecodeError::TrailingData(25)));
    }

    #[test]
    fn test_rejects_zero_hp() {
        // Zeus on e1 with hp 0
        let code = format!("AAA{}", "q".repeat(23));
        assert_eq!(Position::decode(&code), Err(DecodeError::ZeroHitPoints(2)));
    }

    #[test]
    fn test_rejects_hp_above_base() {
        // Athena (3 hp) encoded with 4 hp
        let code = format!("A{}AI{}", "q".repeat(11), "q".repeat(12));
        assert_eq!(
            Position::decode(&code),
            Err(DecodeError::OutOfRange { value: 8, limit: 8, pos: 13 })
        );
    }

    #[test]
    fn test_rejects_double_occupancy() {
        let code = format!("AAUAS{}", "q".repeat(22));
        assert_eq!(
            Position::decode(&code),
            Err(DecodeError::DoubleOccupancy("e1".to_string()))
        );
    }
}

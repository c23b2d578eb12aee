use arrayvec::ArrayVec;

use super::board::{neighbors_diff, Field, FIELD_COUNT};
use super::gods::{God, StatusFx, GOD_COUNT};
use super::side::{Side, SideArray};

/// Per-god state. A god is dead when `hp == 0`, in play when it has a
/// field, and otherwise summonable or reserved depending on its side's
/// summonable set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GodState {
    pub hp: u8,
    pub field: Option<Field>,
    pub fx: StatusFx,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Occupant {
    pub side: Side,
    pub god: God,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    gods: SideArray<[GodState; GOD_COUNT]>,
    fields: [Option<Occupant>; FIELD_COUNT],
    summonable: SideArray<u16>,
    side_to_move: Side,
}

impl Default for Position {
    fn default() -> Self {
        Self::initial()
    }
}

impl Position {
    /// Start position: every god of both sides is summonable, Light to move.
    pub fn initial() -> Self {
        Self::with_gods(&God::all().collect::<Vec<_>>(), &God::all().collect::<Vec<_>>())
    }

    /// Start position with only the listed gods; the others count as dead.
    pub fn with_gods(light: &[God], dark: &[God]) -> Self {
        let mut position = Position {
            gods: SideArray::new([GodState::default(); GOD_COUNT], [GodState::default(); GOD_COUNT]),
            fields: [None; FIELD_COUNT],
            summonable: SideArray::new(0, 0),
            side_to_move: Side::Light,
        };
        for (side, gods) in [(Side::Light, light), (Side::Dark, dark)] {
            for &god in gods {
                position.gods[side][god as usize].hp = god.info().hit;
                position.summonable[side] |= god.bit();
            }
        }
        position
    }

    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    pub fn set_side_to_move(&mut self, side: Side) {
        self.side_to_move = side;
    }

    pub fn god_state(&self, side: Side, god: God) -> &GodState {
        &self.gods[side][god as usize]
    }

    pub fn hp(&self, side: Side, god: God) -> u8 {
        self.god_state(side, god).hp
    }

    pub fn field_of(&self, side: Side, god: God) -> Option<Field> {
        self.god_state(side, god).field
    }

    pub fn fx(&self, side: Side, god: God) -> StatusFx {
        self.god_state(side, god).fx
    }

    pub fn has_fx(&self, side: Side, god: God, fx: StatusFx) -> bool {
        self.fx(side, god).contains(fx)
    }

    pub fn occupant(&self, field: Field) -> Option<Occupant> {
        self.fields[field.index()]
    }

    pub fn is_occupied(&self, field: Field) -> bool {
        self.fields[field.index()].is_some()
    }

    pub fn side_at(&self, field: Field) -> Option<Side> {
        self.occupant(field).map(|o| o.side)
    }

    pub fn is_dead(&self, side: Side, god: God) -> bool {
        self.hp(side, god) == 0
    }

    pub fn is_deployed(&self, side: Side, god: God) -> bool {
        self.field_of(side, god).is_some()
    }

    pub fn is_summonable(&self, side: Side, god: God) -> bool {
        !self.is_dead(side, god)
            && !self.is_deployed(side, god)
            && self.summonable[side] & god.bit() != 0
    }

    pub fn is_reserved(&self, side: Side, god: God) -> bool {
        !self.is_dead(side, god)
            && !self.is_deployed(side, god)
            && self.summonable[side] & god.bit() == 0
    }

    /// Bitmask of summonable gods of `side`, indexed by god id.
    pub fn summonable_set(&self, side: Side) -> u16 {
        let mut set = 0;
        for god in God::all() {
            if self.is_summonable(side, god) {
                set |= god.bit();
            }
        }
        set
    }

    /// Moves a reserved god into the summonable set.
    pub fn make_summonable(&mut self, side: Side, god: God) {
        debug_assert!(self.is_reserved(side, god));
        self.summonable[side] |= god.bit();
    }

    /// Moves a summonable god back into reserve.
    pub fn make_reserved(&mut self, side: Side, god: God) {
        debug_assert!(self.is_summonable(side, god));
        self.summonable[side] &= !god.bit();
    }

    /// Gods of `side` currently on the board, in field order.
    pub fn deployed(&self, side: Side) -> impl Iterator<Item = (Field, God)> + '_ {
        Field::all().filter_map(move |field| match self.occupant(field) {
            Some(o) if o.side == side => Some((field, o.god)),
            _ => None,
        })
    }

    /// The side that reached the opponent's gate, if any.
    pub fn winner(&self) -> Option<Side> {
        if self.side_at(Field::gate(Side::Dark)) == Some(Side::Light) {
            return Some(Side::Light);
        }
        if self.side_at(Field::gate(Side::Light)) == Some(Side::Dark) {
            return Some(Side::Dark);
        }
        None
    }

    pub fn is_over(&self) -> bool {
        self.winner().is_some()
    }

    fn is_wiped_out(&self, side: Side) -> bool {
        God::all().all(|god| self.is_dead(side, god))
    }

    /// True once a side has no living gods left, even if no gate is taken yet.
    pub fn is_almost_over(&self) -> bool {
        self.is_over() || Side::all().iter().any(|&side| self.is_wiped_out(side))
    }

    /// Winner of a game that is over or almost over.
    pub fn almost_winner(&self) -> Option<Side> {
        if let Some(side) = self.winner() {
            return Some(side);
        }
        match (self.is_wiped_out(Side::Light), self.is_wiped_out(Side::Dark)) {
            (true, false) => Some(Side::Dark),
            (false, true) => Some(Side::Light),
            _ => None,
        }
    }

    /// Puts a god that is not on the board onto an empty field.
    pub fn place(&mut self, side: Side, god: God, field: Field) {
        debug_assert!(!self.is_occupied(field), "{} is occupied", field);
        debug_assert!(!self.is_deployed(side, god), "{} already deployed", god.name());
        debug_assert!(!self.is_dead(side, god), "{} is dead", god.name());
        self.fields[field.index()] = Some(Occupant { side, god });
        self.summonable[side] &= !god.bit();
        let state = &mut self.gods[side][god as usize];
        state.field = Some(field);
        self.update_auras(side, god, None, Some(field));
    }

    /// Places a summonable god on its side's gate.
    pub fn summon(&mut self, side: Side, god: God) {
        debug_assert!(self.is_summonable(side, god));
        self.place(side, god, Field::gate(side));
    }

    /// Takes a god off the board without killing it.
    pub fn remove(&mut self, side: Side, god: God) {
        let src = self.field_of(side, god);
        debug_assert!(src.is_some(), "{} is not on the board", god.name());
        let Some(src) = src else { return };
        self.fields[src.index()] = None;
        self.gods[side][god as usize].field = None;
        self.update_auras(side, god, Some(src), None);
    }

    /// Relocates a god on the board to an empty field.
    pub fn move_god(&mut self, side: Side, god: God, dst: Field) {
        let src = self.field_of(side, god);
        debug_assert!(src.is_some(), "{} is not on the board", god.name());
        debug_assert!(!self.is_occupied(dst), "{} is occupied", dst);
        let Some(src) = src else { return };
        self.fields[dst.index()] = self.fields[src.index()].take();
        self.gods[side][god as usize].field = Some(dst);
        self.update_auras(side, god, Some(src), Some(dst));
    }

    /// Exchanges the fields of two gods of the same side.
    pub fn swap(&mut self, side: Side, a: God, b: God) {
        let (Some(fa), Some(fb)) = (self.field_of(side, a), self.field_of(side, b)) else {
            debug_assert!(false, "swap of gods not on the board");
            return;
        };
        self.remove(side, a);
        self.move_god(side, b, fa);
        self.place(side, a, fb);
    }

    /// Reduces the hit points of the god on `field`, killing it at zero.
    /// Returns the remaining hit points.
    pub fn deal_damage(&mut self, field: Field, damage: u8) -> u8 {
        let occupant = self.occupant(field);
        debug_assert!(occupant.is_some(), "no god on {}", field);
        let Some(Occupant { side, god }) = occupant else { return 0 };
        let hp = self.gods[side][god as usize].hp;
        if hp > damage {
            self.gods[side][god as usize].hp = hp - damage;
            hp - damage
        } else {
            self.kill(side, god);
            0
        }
    }

    fn kill(&mut self, side: Side, god: God) {
        self.remove(side, god);
        self.gods[side][god as usize] = GodState::default();
        if god == God::Hades {
            for state in self.gods[!side].iter_mut() {
                state.fx.remove(StatusFx::CHAINED);
            }
        }
    }

    pub fn chain(&mut self, side: Side, god: God) {
        debug_assert!(self.is_deployed(side, god));
        self.gods[side][god as usize].fx.insert(StatusFx::CHAINED);
    }

    pub fn unchain(&mut self, side: Side, god: God) {
        self.gods[side][god as usize].fx.remove(StatusFx::CHAINED);
    }

    /// Revives an off-board god with the given hit points, as reserved.
    pub(super) fn restore(&mut self, side: Side, god: God, hp: u8) {
        debug_assert!(!self.is_deployed(side, god));
        self.gods[side][god as usize] = GodState { hp, field: None, fx: StatusFx::NONE };
        self.summonable[side] &= !god.bit();
    }

    pub fn end_turn(&mut self) {
        self.side_to_move = !self.side_to_move;
    }

    /// Keeps adjacency-derived effects in sync after `god` went from `src`
    /// to `dst` (either may be off the board).
    fn update_auras(&mut self, side: Side, god: God, src: Option<Field>, dst: Option<Field>) {
        let aura = god.info().aura;
        if !aura.is_empty() {
            let mut old: ArrayVec<Field, 8> = ArrayVec::new();
            let mut new: ArrayVec<Field, 8> = ArrayVec::new();
            match (src, dst) {
                (Some(src), Some(dst)) => {
                    neighbors_diff(src, dst, |f| old.push(f), |f| new.push(f))
                }
                (Some(src), None) => old.extend(src.neighbors().iter().copied()),
                (None, Some(dst)) => new.extend(dst.neighbors().iter().copied()),
                (None, None) => {}
            }
            for field in old {
                self.clear_aura_at(field, side, aura);
            }
            for field in new {
                self.grant_aura_at(field, side, aura);
            }
        }

        let state = &mut self.gods[side][god as usize];
        let chained = state.fx & StatusFx::CHAINED;
        state.fx = chained;
        if let Some(dst) = dst {
            let mut received = chained;
            for &nb in dst.neighbors() {
                if let Some(o) = self.fields[nb.index()] {
                    if o.side == side {
                        received |= o.god.info().aura;
                    }
                }
            }
            self.gods[side][god as usize].fx = received;
        }
    }

    fn grant_aura_at(&mut self, field: Field, side: Side, aura: StatusFx) {
        if let Some(o) = self.fields[field.index()] {
            if o.side == side {
                self.gods[side][o.god as usize].fx.insert(aura);
            }
        }
    }

    fn clear_aura_at(&mut self, field: Field, side: Side, aura: StatusFx) {
        if let Some(o) = self.fields[field.index()] {
            if o.side == side {
                self.gods[side][o.god as usize].fx.remove(aura);
            }
        }
    }
}

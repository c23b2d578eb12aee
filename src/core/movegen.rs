//! Enumeration of every legal turn for the side to move.
//!
//! Turns are composed depth first. The builder keeps the actions played so
//! far and one cached position per prefix length, computed only when a rule
//! needs to look at it. Every prefix reached is emitted as a turn of its own.

use std::collections::HashSet;

use arrayvec::ArrayVec;
use tracing::trace;

use super::action::{Action, ActionKind, Turn, MAX_ACTIONS};
use super::board::{Field, FIELD_COUNT};
use super::execute::execute_action;
use super::gods::{AttackKind, Dir, God, Special, StatusFx, Traversal, KNIGHT_DIRS};
use super::position::{Occupant, Position};
use super::side::Side;

/// Breadth-first search from `origin` through empty fields, up to `range`
/// steps. `visit` sees every field reached once, occupied or not; only
/// empty fields are expanded further.
fn flood(
    position: &Position,
    origin: Field,
    dirs: &[Dir],
    range: usize,
    mut visit: impl FnMut(Field, Option<Occupant>),
) {
    let mut seen = [false; FIELD_COUNT];
    seen[origin.index()] = true;
    let mut frontier = vec![origin];
    for _ in 0..range {
        let mut next = Vec::new();
        for field in frontier {
            for d in dirs {
                let Some(nb) = field.offset(d.dr, d.dc) else { continue };
                if seen[nb.index()] {
                    continue;
                }
                seen[nb.index()] = true;
                let occupant = position.occupant(nb);
                visit(nb, occupant);
                if occupant.is_none() {
                    next.push(nb);
                }
            }
        }
        frontier = next;
    }
}

/// Fields `god` can move to from where it stands.
pub fn move_targets(position: &Position, side: Side, god: God) -> Vec<Field> {
    let Some(origin) = position.field_of(side, god) else { return Vec::new() };
    let info = god.info();
    let mut range = info.mov as usize;
    if position.has_fx(side, god, StatusFx::SPEED_BOOST) {
        range += 1;
    }
    let mut targets = Vec::new();
    match info.movement.traversal {
        Traversal::Direct => {
            for d in info.movement.dirs {
                let mut field = origin;
                for _ in 0..range {
                    match field.offset(d.dr, d.dc) {
                        Some(next) if !position.is_occupied(next) => {
                            targets.push(next);
                            field = next;
                        }
                        _ => break,
                    }
                }
            }
        }
        Traversal::Indirect => {
            flood(position, origin, info.movement.dirs, range, |field, occupant| {
                if occupant.is_none() {
                    targets.push(field);
                }
            });
        }
    }
    targets
}

/// Enemy fields `god` can attack with its ranged pattern. Empty for area
/// attackers.
pub fn attack_targets(position: &Position, side: Side, god: God) -> Vec<Field> {
    let Some(origin) = position.field_of(side, god) else { return Vec::new() };
    let info = god.info();
    let AttackKind::Ranged(pattern) = info.attack else { return Vec::new() };
    let range = info.rng as usize;
    let mut targets = Vec::new();
    match pattern.traversal {
        Traversal::Direct => {
            for d in pattern.dirs {
                let mut field = origin;
                for _ in 0..range {
                    let Some(next) = field.offset(d.dr, d.dc) else { break };
                    field = next;
                    match position.side_at(next) {
                        Some(s) if s != side => targets.push(next),
                        _ => {}
                    }
                    // Zeus' bolt passes over anything in its way.
                    if position.is_occupied(next) && god != God::Zeus {
                        break;
                    }
                }
            }
        }
        Traversal::Indirect => {
            flood(position, origin, pattern.dirs, range, |field, occupant| {
                if occupant.is_some_and(|o| o.side != side) {
                    targets.push(field);
                }
            });
        }
    }
    targets
}

fn is_exposed_enemy(position: &Position, side: Side, field: Field) -> bool {
    match position.occupant(field) {
        Some(o) => o.side != side && !position.has_fx(o.side, o.god, StatusFx::SHIELDED),
        None => false,
    }
}

/// Knight leaps available to Dionysos from `origin`: empty fields and
/// unshielded enemies, the latter flagged as kills.
fn leaps(position: &Position, side: Side, origin: Field) -> Vec<(Field, bool)> {
    KNIGHT_DIRS
        .iter()
        .filter_map(|d| origin.offset(d.dr, d.dc))
        .filter_map(|field| {
            if !position.is_occupied(field) {
                Some((field, false))
            } else if is_exposed_enemy(position, side, field) {
                Some((field, true))
            } else {
                None
            }
        })
        .collect()
}

/// Whether the second target of a double attack may follow the first.
fn double_attack_order(first: Option<God>, second: God) -> bool {
    if cfg!(feature = "unordered-double-attack") {
        return true;
    }
    first.map_or(true, |first| second < first)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Follow {
    None,
    /// Special rule 1: the god just summoned may move or attack.
    MoveOrAttack(God),
    /// Special rule 2: a god left its gate, so a summon may follow.
    Summon,
    /// Special rule 2: the god summoned after that may attack.
    Attack(God),
}

/// What may come after the action just played.
#[derive(Debug, Clone, Copy)]
struct Ctx {
    follow: Follow,
    /// Inside the extra move phase of special rule 3
    extra: bool,
    /// An enemy was killed on its own gate and the extra move is unused
    pending: bool,
}

impl Ctx {
    const MAIN: Ctx = Ctx { follow: Follow::None, extra: false, pending: false };

    fn with_follow(self, follow: Follow) -> Self {
        Ctx { follow, ..self }
    }
}

struct Builder<'a> {
    root: &'a Position,
    side: Side,
    actions: ArrayVec<Action, MAX_ACTIONS>,
    cache: [Option<Position>; MAX_ACTIONS + 1],
    turns: Vec<Turn>,
    seen: HashSet<Turn>,
}

impl<'a> Builder<'a> {
    fn new(root: &'a Position) -> Self {
        Self {
            root,
            side: root.side_to_move(),
            actions: ArrayVec::new(),
            cache: Default::default(),
            turns: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Position after the first `len` actions, materialized on demand.
    fn position_at(&mut self, len: usize) -> &Position {
        let mut k = len;
        while k > 0 && self.cache[k].is_none() {
            k -= 1;
        }
        for i in k..len {
            let mut next = match &self.cache[i] {
                Some(position) => position.clone(),
                None => self.root.clone(),
            };
            execute_action(&mut next, &self.actions[i]);
            self.cache[i + 1] = Some(next);
        }
        match &self.cache[len] {
            Some(position) => position,
            None => self.root,
        }
    }

    fn position(&mut self) -> &Position {
        self.position_at(self.actions.len())
    }

    /// Position before the last action.
    fn previous(&mut self) -> &Position {
        self.position_at(self.actions.len().saturating_sub(1))
    }

    fn push(&mut self, action: Action) -> bool {
        if self.actions.try_push(action).is_err() {
            trace!(prefix = %Turn::from_actions(&self.actions), %action, "turn is full, action dropped");
            return false;
        }
        self.cache[self.actions.len()] = None;
        true
    }

    fn pop(&mut self) {
        self.actions.pop();
    }

    fn emit(&mut self) {
        let turn = Turn::from_actions(&self.actions);
        if self.seen.insert(turn.clone()) {
            self.turns.push(turn);
        }
    }

    fn used_special(&self, god: God) -> bool {
        self.actions
            .iter()
            .any(|a| a.kind == ActionKind::Special && a.god == god)
    }

    /// Deployed, unchained gods of the side to move.
    fn ready_gods(&mut self) -> Vec<(Field, God)> {
        let side = self.side;
        let position = self.position();
        position
            .deployed(side)
            .filter(|&(_, god)| !position.has_fx(side, god, StatusFx::CHAINED))
            .collect()
    }

    fn play(&mut self, action: Action, ctx: Ctx) {
        if self.push(action) {
            self.after(action, ctx);
            self.pop();
        }
    }

    fn after(&mut self, last: Action, ctx: Ctx) {
        self.emit();
        if self.wins(&last) {
            return;
        }
        let pending = ctx.pending || self.gate_killed(&last);
        let ctx = Ctx { pending, ..ctx };

        self.hooks(&last, ctx);

        let next = Ctx { follow: Follow::None, ..ctx };
        match ctx.follow {
            Follow::None => {}
            Follow::MoveOrAttack(god) => {
                self.moves_of(god, next);
                self.attack_slot(god, next);
            }
            Follow::Summon => self.summons(false, next),
            Follow::Attack(god) => self.attack_slot(god, next),
        }

        if pending {
            self.extra_moves();
        }
        if !ctx.extra {
            self.swaps();
        }
    }

    fn wins(&self, last: &Action) -> bool {
        let lands = match last.kind {
            ActionKind::Move => true,
            ActionKind::Special => last.god.info().special == Special::Frenzy,
            _ => false,
        };
        lands && last.field == Field::gate(!self.side)
    }

    /// Whether the last action killed the enemy standing on its own gate.
    /// Only materializes positions when the action could reach that gate.
    fn gate_killed(&mut self, last: &Action) -> bool {
        let side = self.side;
        let gate = Field::gate(!side);
        let info = last.god.info();
        let could_reach = match last.kind {
            ActionKind::Summon | ActionKind::Move => {
                info.landing_damage > 0 && last.field.is_adjacent(gate)
            }
            ActionKind::Attack => match info.attack {
                AttackKind::Ranged(_) => last.field == gate,
                AttackKind::Area(shape) => shape.fields(side, last.field).contains(&gate),
            },
            ActionKind::Special => match info.special {
                Special::Swap => true,
                Special::Chain | Special::None => false,
                _ => last.field == gate,
            },
        };
        if !could_reach {
            return false;
        }
        let before = self.previous();
        let Some(defender) = before.occupant(gate).filter(|o| o.side == !side) else {
            return false;
        };
        if info.special == Special::Swap && last.kind == ActionKind::Special {
            let lands = before
                .occupant(last.field)
                .is_some_and(|ally| ally.god.info().landing_damage > 0);
            if !lands {
                return false;
            }
        }
        // A knockback may refill the gate, so ask about the defender itself.
        self.position().is_dead(defender.side, defender.god)
    }

    /// Character hooks that may follow `last` directly.
    fn hooks(&mut self, last: &Action, ctx: Ctx) {
        let actor = match last.kind {
            ActionKind::Special if last.god.info().special == Special::Swap => {
                self.previous().occupant(last.field).map(|o| o.god)
            }
            ActionKind::Special => None,
            _ => Some(last.god),
        };
        if actor == Some(God::Hades) && !self.used_special(God::Hades) {
            self.chains(ctx);
        }
        if last.kind == ActionKind::Attack && last.god.info().special == Special::DoubleAttack {
            self.double_attacks(last, ctx);
        }
    }

    fn chains(&mut self, ctx: Ctx) {
        let side = self.side;
        let targets: Vec<Field> = {
            let position = self.position();
            match position.field_of(side, God::Hades) {
                Some(origin) if !position.has_fx(side, God::Hades, StatusFx::CHAINED) => origin
                    .neighbors()
                    .iter()
                    .copied()
                    .filter(|&f| match position.occupant(f) {
                        Some(o) => o.side != side && !position.has_fx(o.side, o.god, StatusFx::CHAINED),
                        None => false,
                    })
                    .collect(),
                _ => return,
            }
        };
        for field in targets {
            self.play(Action::special(God::Hades, field), ctx);
        }
    }

    fn double_attacks(&mut self, first: &Action, ctx: Ctx) {
        let side = self.side;
        let god = first.god;
        let first_target = self.previous().occupant(first.field).map(|o| o.god);
        let targets: Vec<Field> = {
            let position = self.position();
            attack_targets(position, side, god)
                .into_iter()
                .filter(|&f| f != first.field)
                .filter(|&f| match position.occupant(f) {
                    Some(o) => double_attack_order(first_target, o.god),
                    None => false,
                })
                .collect()
        };
        for field in targets {
            self.play(Action::special(god, field), ctx);
        }
    }

    fn moves_of(&mut self, god: God, ctx: Ctx) {
        let side = self.side;
        let targets = {
            let position = self.position();
            if position.has_fx(side, god, StatusFx::CHAINED) {
                return;
            }
            move_targets(position, side, god)
        };
        for field in targets {
            self.play(Action::move_to(god, field), ctx);
        }
    }

    /// Everything `god` can do with its attack: ranged or area attacks, and
    /// the specials that take an attack's place.
    fn attack_slot(&mut self, god: God, ctx: Ctx) {
        let side = self.side;
        let info = god.info();
        let actions: Vec<Action> = {
            let position = self.position();
            let Some(origin) = position.field_of(side, god) else { return };
            if position.has_fx(side, god, StatusFx::CHAINED) {
                return;
            }
            let mut actions: Vec<Action> = match info.attack {
                AttackKind::Ranged(_) => attack_targets(position, side, god)
                    .into_iter()
                    .map(|f| Action::attack(god, f))
                    .collect(),
                AttackKind::Area(shape) => {
                    let hits_enemy = shape
                        .fields(side, origin)
                        .iter()
                        .any(|&f| position.side_at(f) == Some(!side));
                    if hits_enemy {
                        vec![Action::attack(god, origin)]
                    } else {
                        Vec::new()
                    }
                }
            };
            if info.special == Special::WitheringMoon {
                actions.extend(
                    Field::all()
                        .filter(|&f| is_exposed_enemy(position, side, f))
                        .map(|f| Action::special(god, f)),
                );
            }
            actions
        };
        for action in actions {
            self.play(action, ctx);
        }
        if info.special == Special::Frenzy {
            self.frenzy(god, ctx);
        }
    }

    /// One or, when speed boosted, two knight leaps. At least one leap must
    /// kill; sequences with the same landing field and kills are generated
    /// once, preferring the single leap.
    fn frenzy(&mut self, god: God, ctx: Ctx) {
        let side = self.side;
        let enemy_gate = Field::gate(!side);
        let (first_leaps, boosted) = {
            let position = self.position();
            match position.field_of(side, god) {
                Some(origin) if !position.has_fx(side, god, StatusFx::CHAINED) => (
                    leaps(position, side, origin),
                    position.has_fx(side, god, StatusFx::SPEED_BOOST),
                ),
                _ => return,
            }
        };
        let kill_bit = |field: Field| 1u64 << field.index();

        let mut outcomes: HashSet<(Field, u64)> = HashSet::new();
        for &(field, kills) in &first_leaps {
            if kills {
                outcomes.insert((field, kill_bit(field)));
                self.play(Action::special(god, field), ctx);
            }
        }
        if !boosted {
            return;
        }
        for &(field, kills) in &first_leaps {
            if field == enemy_gate || !self.push(Action::special(god, field)) {
                continue;
            }
            let first_kills = if kills { kill_bit(field) } else { 0 };
            let second_leaps = leaps(self.position(), side, field);
            for (second, kills) in second_leaps {
                let all_kills = first_kills | if kills { kill_bit(second) } else { 0 };
                if all_kills != 0 && outcomes.insert((second, all_kills)) {
                    self.play(Action::special(god, second), ctx);
                }
            }
            self.pop();
        }
    }

    /// `rule1` marks summons at the start of a turn, which the summoned god
    /// may follow with a move or an attack; later summons only with an attack.
    fn summons(&mut self, rule1: bool, ctx: Ctx) {
        let side = self.side;
        let gate = Field::gate(side);
        let gods: Vec<God> = {
            let position = self.position();
            if position.is_occupied(gate) {
                return;
            }
            God::all().filter(|&g| position.is_summonable(side, g)).collect()
        };
        for god in gods {
            let follow = if rule1 { Follow::MoveOrAttack(god) } else { Follow::Attack(god) };
            self.play(Action::summon(god, gate), ctx.with_follow(follow));
        }
    }

    fn extra_moves(&mut self) {
        let ctx = Ctx { follow: Follow::None, extra: true, pending: false };
        for (_, god) in self.ready_gods() {
            self.moves_of(god, ctx);
        }
    }

    /// Aphrodite's swap ends the main phase: only a gate kill caused by the
    /// swap itself grants another move.
    fn swaps(&mut self) {
        if self.used_special(God::Aphrodite) {
            return;
        }
        let summoned = self
            .actions
            .iter()
            .any(|a| a.kind == ActionKind::Summon && a.god == God::Aphrodite);
        if !summoned && !self.root.is_deployed(self.side, God::Aphrodite) {
            return;
        }
        let allies: Vec<Field> = {
            let ready = self.ready_gods();
            if !ready.iter().any(|&(_, g)| g == God::Aphrodite) {
                return;
            }
            ready.into_iter().filter(|&(_, g)| g != God::Aphrodite).map(|(f, _)| f).collect()
        };
        for field in allies {
            self.play(Action::special(God::Aphrodite, field), Ctx::MAIN);
        }
    }

    fn generate(&mut self) {
        let gate = Field::gate(self.side);
        self.summons(true, Ctx::MAIN);
        let ready = self.ready_gods();
        for &(field, god) in &ready {
            let follow = if field == gate { Follow::Summon } else { Follow::None };
            self.moves_of(god, Ctx::MAIN.with_follow(follow));
        }
        for &(_, god) in &ready {
            self.attack_slot(god, Ctx::MAIN);
        }
        self.swaps();
    }
}

/// All legal turns for the side to move, each distinct action sequence once.
/// A position with no legal action yields the single pass turn; a game that
/// is already won yields none.
pub fn generate_turns(position: &Position) -> Vec<Turn> {
    if position.is_over() {
        return Vec::new();
    }
    let mut builder = Builder::new(position);
    builder.generate();
    let mut turns = builder.turns;
    if turns.is_empty() {
        turns.push(Turn::pass());
    }
    trace!(count = turns.len(), "generated turns");
    turns
}

//! Applying actions and turns to a position

use tracing::trace;

use super::action::{Action, ActionKind, Turn};
use super::board::Field;
use super::gods::{AreaShape, AttackKind, God, Special, StatusFx};
use super::position::{Occupant, Position};
use super::side::Side;

/// Damage `god` of `side` deals when attacking `target` from where it stands.
pub fn attack_damage(position: &Position, side: Side, god: God, target: Field) -> u8 {
    let info = god.info();
    let mut damage = info.dmg;
    if let Some(source) = position.field_of(side, god) {
        let (from, to) = (source.coords(), target.coords());
        let (dr, dc) = (to.r - from.r, to.c - from.c);
        match god {
            // Double damage unless the target is strictly in front.
            God::Hera if dr * side.forward() <= 0 => damage *= 2,
            God::Apollo if dr == 0 || dc == 0 || dr.abs() == dc.abs() => damage += 1,
            _ => {}
        }
    }
    if position.has_fx(side, god, StatusFx::DAMAGE_BOOST) {
        damage += 1;
    }
    damage
}

fn is_shielded(position: &Position, occupant: Occupant) -> bool {
    position.has_fx(occupant.side, occupant.god, StatusFx::SHIELDED)
}

/// Damages the god on `field` unless it is shielded.
fn damage_field(position: &mut Position, field: Field, damage: u8) {
    match position.occupant(field) {
        Some(occupant) if !is_shielded(position, occupant) => {
            position.deal_damage(field, damage);
        }
        Some(_) => {}
        None => debug_assert!(false, "no target on {}", field),
    }
}

/// Damages every enemy of `side` on `fields`, Athena first so that her
/// death lifts the shield from the others.
fn damage_fields(position: &mut Position, side: Side, fields: &[Field], damage: u8) {
    let athena = position.field_of(!side, God::Athena).filter(|f| fields.contains(f));
    if let Some(field) = athena {
        damage_field(position, field, damage);
    }
    for &field in fields {
        if Some(field) != athena && position.side_at(field) == Some(!side) {
            damage_field(position, field, damage);
        }
    }
}

/// Pushes enemies in the area one field away from the attacker, farthest
/// row first. Blocked pushes are skipped.
fn knock_back(position: &mut Position, side: Side, fields: &[Field]) {
    let forward = side.forward();
    let mut ordered = fields.to_vec();
    ordered.sort_by_key(|f| -f.coords().r * forward);
    for field in ordered {
        let Some(occupant) = position.occupant(field) else { continue };
        if occupant.side == side {
            continue;
        }
        let Some(behind) = field.offset(forward, 0) else { continue };
        if position.is_occupied(behind) {
            continue;
        }
        position.move_god(occupant.side, occupant.god, behind);
        release_after_push(position, occupant, behind);
    }
}

fn release_after_push(position: &mut Position, pushed: Occupant, dst: Field) {
    position.unchain(pushed.side, pushed.god);
    if pushed.god == God::Hades {
        let victims: Vec<(Field, God)> = position.deployed(!pushed.side).collect();
        for (field, god) in victims {
            if !field.is_adjacent(dst) {
                position.unchain(!pushed.side, god);
            }
        }
    }
}

/// Ares' arrival: every adjacent enemy takes damage.
fn land(position: &mut Position, side: Side, god: God) {
    let damage = god.info().landing_damage;
    if damage == 0 {
        return;
    }
    if let Some(field) = position.field_of(side, god) {
        damage_fields(position, side, field.neighbors(), damage);
    }
}

fn attack(position: &mut Position, side: Side, action: &Action) {
    let damage = attack_damage(position, side, action.god, action.field);
    match action.god.info().attack {
        AttackKind::Ranged(_) => damage_field(position, action.field, damage),
        AttackKind::Area(shape) => {
            let fields = shape.fields(side, action.field);
            damage_fields(position, side, &fields, damage);
            if shape == AreaShape::Front {
                knock_back(position, side, &fields);
            }
        }
    }
}

fn special(position: &mut Position, side: Side, action: &Action) {
    let god = action.god;
    match god.info().special {
        Special::DoubleAttack => {
            let damage = attack_damage(position, side, god, action.field);
            damage_field(position, action.field, damage);
        }
        Special::Chain => {
            if let Some(victim) = position.occupant(action.field) {
                position.chain(victim.side, victim.god);
            }
        }
        Special::Swap => {
            if let Some(ally) = position.occupant(action.field) {
                position.swap(side, god, ally.god);
                land(position, side, ally.god);
            }
        }
        Special::WitheringMoon => {
            damage_field(position, action.field, 1);
            if let Some(own) = position.field_of(side, god) {
                position.deal_damage(own, 1);
            }
        }
        Special::Frenzy => {
            if let Some(victim) = position.occupant(action.field) {
                let hp = position.hp(victim.side, victim.god);
                position.deal_damage(action.field, hp);
            }
            position.move_god(side, god, action.field);
        }
        Special::None => debug_assert!(false, "{} has no special", god.name()),
    }
}

/// Applies a single action for the side to move, without ending the turn.
pub fn execute_action(position: &mut Position, action: &Action) {
    let side = position.side_to_move();
    match action.kind {
        ActionKind::Summon => {
            debug_assert_eq!(action.field, Field::gate(side));
            position.summon(side, action.god);
            land(position, side, action.god);
        }
        ActionKind::Move => {
            position.move_god(side, action.god, action.field);
            land(position, side, action.god);
        }
        ActionKind::Attack => attack(position, side, action),
        ActionKind::Special => special(position, side, action),
    }
}

pub fn execute_actions(position: &mut Position, actions: &[Action]) {
    for action in actions {
        execute_action(position, action);
    }
}

/// Plays a whole turn and passes the move to the opponent.
pub fn execute_turn(position: &mut Position, turn: &Turn) {
    debug_assert!(!position.is_over(), "game is already over");
    trace!(side = position.side_to_move().name(), turn = %turn, "execute turn");
    execute_actions(position, turn);
    position.end_turn();
}

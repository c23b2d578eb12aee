use mytikas::core::{
    execute_turn, generate_turns, Field, God, Position, Side, StatusFx, Turn, FIELD_COUNT,
};
use mytikas::engine::random_turn;
use mytikas::utils::make_rng;

fn f(name: &str) -> Field {
    name.parse().unwrap()
}

fn notations(position: &Position) -> Vec<String> {
    generate_turns(position).iter().map(|t| t.to_string()).collect()
}

fn after(position: &Position, turn: &str) -> Position {
    let turn: Turn = turn.parse().unwrap();
    assert!(generate_turns(position).contains(&turn), "{} is not legal", turn);
    let mut next = position.clone();
    execute_turn(&mut next, &turn);
    next
}

/// Occupancy and god states agree with each other.
fn assert_consistent(position: &Position) {
    let mut seen = 0;
    for side in Side::all() {
        for god in God::all() {
            let state = position.god_state(side, god);
            assert!(state.hp <= god.info().hit);
            if let Some(field) = state.field {
                assert!(state.hp > 0, "dead {} on {}", god.name(), field);
                let occupant = position.occupant(field).unwrap();
                assert_eq!((occupant.side, occupant.god), (side, god));
                seen += 1;
            }
        }
    }
    let occupied = Field::all().filter(|&field| position.is_occupied(field)).count();
    assert_eq!(occupied, seen);
    assert!(occupied <= FIELD_COUNT);
}

#[test]
fn summon_then_attack() {
    let mut position = Position::initial();
    position.place(Side::Dark, God::Hera, f("f2"));
    let turns = notations(&position);
    assert!(turns.contains(&"N@e1,N!f2".to_string()));

    let next = after(&position, "N@e1,N!f2");
    assert_eq!(next.hp(Side::Dark, God::Hera), 5);
    assert_eq!(next.side_to_move(), Side::Dark);
}

#[test]
fn gate_kill_grants_extra_move() {
    let mut position = Position::with_gods(&[God::Apollo, God::Zeus], &[God::Athena]);
    position.place(Side::Light, God::Apollo, f("e7"));
    position.place(Side::Light, God::Zeus, f("a5"));
    position.place(Side::Dark, God::Athena, f("e9"));
    let turns = notations(&position);
    assert!(turns.contains(&"O!e9,Z>b5".to_string()));
    assert!(!turns.contains(&"Z>b5,O!e9".to_string()));

    let next = after(&position, "O!e9,Z>b5");
    assert!(next.is_dead(Side::Dark, God::Athena));
    assert_eq!(next.field_of(Side::Light, God::Zeus), Some(f("b5")));
}

#[test]
fn ares_summon_damages_neighbours() {
    let mut position = Position::initial();
    position.place(Side::Dark, God::Athena, f("d2"));
    position.place(Side::Dark, God::Zeus, f("e2"));
    position.deal_damage(f("d2"), 2);
    let next = after(&position, "R@e1");
    // Athena goes first and dies, so Zeus is hit unshielded.
    assert!(next.is_dead(Side::Dark, God::Athena));
    assert_eq!(next.hp(Side::Dark, God::Zeus), 9);
}

#[test]
fn auras_follow_moves() {
    let position = after(&Position::initial(), "M@e1,M>e3");
    let position = after(&position, "Z@e9");
    let position = after(&position, "H@e1,H>e2");
    assert!(position.has_fx(Side::Light, God::Hermes, StatusFx::DAMAGE_BOOST));
    assert!(position.has_fx(Side::Light, God::Hephaestus, StatusFx::SPEED_BOOST));
    assert!(position.fx(Side::Dark, God::Zeus).is_empty());
}

#[test]
fn winning_is_reaching_the_enemy_gate() {
    let mut position = Position::with_gods(&[God::Zeus], &[God::Zeus]);
    position.place(Side::Light, God::Zeus, f("e8"));
    position.place(Side::Dark, God::Zeus, f("a5"));
    assert_eq!(position.winner(), None);
    let won = after(&position, "Z>e9");
    assert_eq!(won.winner(), Some(Side::Light));
    assert!(generate_turns(&won).is_empty());

    // Holding your own gate wins nothing.
    let mut position = Position::with_gods(&[God::Zeus], &[God::Zeus]);
    position.place(Side::Light, God::Zeus, Field::gate(Side::Light));
    position.place(Side::Dark, God::Zeus, Field::gate(Side::Dark));
    assert_eq!(position.winner(), None);
}

#[test]
fn position_codes_round_trip_through_play() {
    let mut position = Position::initial();
    let mut rng = make_rng(Some(17));
    for _ in 0..12 {
        if position.is_almost_over() {
            break;
        }
        let turn = random_turn(&position, &mut rng).unwrap();
        assert_eq!(turn.to_string().parse::<Turn>().unwrap(), turn);
        execute_turn(&mut position, &turn);
        let code = position.encode();
        assert_eq!(Position::decode(&code).unwrap(), position);
    }
}

#[test]
fn random_games_stay_consistent() {
    for seed in 0..4 {
        let mut rng = make_rng(Some(seed));
        let mut position = Position::initial();
        for _ in 0..40 {
            if position.is_almost_over() {
                break;
            }
            let turns = generate_turns(&position);
            assert!(!turns.is_empty());
            let mut unique = turns.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), turns.len());

            let turn = random_turn(&position, &mut rng).unwrap();
            let mut a = position.clone();
            let mut b = position.clone();
            execute_turn(&mut a, &turn);
            execute_turn(&mut b, &turn);
            assert_eq!(a, b);
            assert_consistent(&a);
            position = a;
        }
    }
}

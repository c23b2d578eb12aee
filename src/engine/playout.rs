//! Random turns, random playouts and perft

use rand::{seq::IndexedRandom, Rng};
use tracing::trace;

use crate::core::{execute_turn, generate_turns, Position, Side, Turn};

/// A uniformly chosen legal turn, or `None` if the game is already won.
pub fn random_turn<R: Rng + ?Sized>(position: &Position, rng: &mut R) -> Option<Turn> {
    let turns = generate_turns(position);
    turns.choose(rng).cloned()
}

/// Outcome of a random playout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playout {
    pub turns: usize,
    pub winner: Option<Side>,
}

/// Plays random turns until the game is over or almost over, or until
/// `limit` turns have been played.
pub fn playout<R: Rng + ?Sized>(position: &mut Position, rng: &mut R, limit: usize) -> Playout {
    let mut turns = 0;
    while turns < limit && !position.is_almost_over() {
        let Some(turn) = random_turn(position, rng) else { break };
        execute_turn(position, &turn);
        turns += 1;
    }
    trace!(turns, "playout finished");
    Playout { turns, winner: position.almost_winner() }
}

/// Number of turn sequences of length `depth` from `position`. Won
/// positions end a sequence early and are not counted.
pub fn perft(position: &Position, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }
    let turns = generate_turns(position);
    if depth == 1 {
        return turns.len() as u64;
    }
    turns
        .iter()
        .map(|turn| {
            let mut next = position.clone();
            execute_turn(&mut next, turn);
            perft(&next, depth - 1)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::God;
    use crate::utils::make_rng;

    #[test]
    fn test_perft_initial() {
        let position = Position::initial();
        assert_eq!(perft(&position, 0), 1);
        // Each god can be summoned alone or summoned and moved.
        assert_eq!(perft(&position, 1), 100);
    }

    #[test]
    fn test_random_turn_is_legal() {
        let position = Position::initial();
        let mut rng = make_rng(Some(1));
        let turn = random_turn(&position, &mut rng).unwrap();
        assert!(generate_turns(&position).contains(&turn));
    }

    #[test]
    fn test_playout_is_reproducible() {
        let mut a = Position::initial();
        let mut b = Position::initial();
        let result_a = playout(&mut a, &mut make_rng(Some(5)), 40);
        let result_b = playout(&mut b, &mut make_rng(Some(5)), 40);
        assert_eq!(result_a, result_b);
        assert_eq!(a, b);
        assert!(result_a.turns <= 40);
    }

    #[test]
    fn test_playout_stops_when_almost_over() {
        let mut position = Position::with_gods(&[God::Zeus], &[]);
        let result = playout(&mut position, &mut make_rng(Some(2)), 10);
        assert_eq!(result, Playout { turns: 0, winner: Some(Side::Light) });
    }
}

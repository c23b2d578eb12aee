use anyhow::{bail, ensure, Context, Result};
use rand::rngs::StdRng;
use tracing::debug;

use crate::core::{execute_turn, generate_turns, Position, PositionDiff, Side, Turn};
use crate::utils::make_rng;

use super::options::EngineOptions;
use super::playout::{perft, playout, random_turn, Playout};

/// Engine manages a game session: the current position, the turns that led
/// to it, and the random source used for random turns and playouts.
pub struct Engine {
    pub position: Position,
    pub options: EngineOptions,
    history: Vec<(Position, Turn)>,
    rng: StdRng,
}

impl Engine {
    /// Create a new engine at the initial position with default options
    pub fn new() -> Self {
        Self::with_options(EngineOptions::default())
    }

    pub fn with_options(options: EngineOptions) -> Self {
        let rng = make_rng(options.seed.value());
        Self {
            position: Position::initial(),
            options,
            history: Vec::new(),
            rng,
        }
    }

    /// Replace the current position and forget the history
    pub fn set_position(&mut self, position: Position) {
        debug!(code = %position.encode(), "set position");
        self.position = position;
        self.history.clear();
    }

    pub fn reset(&mut self) {
        self.set_position(Position::initial());
    }

    /// Set an engine option. Changing the seed restarts the random source.
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<()> {
        self.options.set_option(name, value)?;
        if name == "seed" {
            self.rng = make_rng(self.options.seed.value());
        }
        Ok(())
    }

    pub fn turns(&self) -> Vec<Turn> {
        generate_turns(&self.position)
    }

    pub fn history(&self) -> impl Iterator<Item = &Turn> {
        self.history.iter().map(|(_, turn)| turn)
    }

    /// Play a turn for the side to move and return the winner, if any.
    /// With `verify` on, the turn must be one of the generated turns; the
    /// position is left untouched when it is not.
    pub fn play(&mut self, turn: &Turn) -> Result<Option<Side>> {
        ensure!(!self.position.is_over(), "Game is already over");
        if self.options.verify && !self.turns().contains(turn) {
            bail!("Illegal turn for {}: {}", self.position.side_to_move().name(), turn);
        }
        debug!(side = self.position.side_to_move().name(), turn = %turn, "play");
        let before = self.position.clone();
        execute_turn(&mut self.position, turn);
        self.history.push((before, turn.clone()));
        Ok(self.position.winner())
    }

    /// Parse and play a turn in text notation
    pub fn play_str(&mut self, s: &str) -> Result<Option<Side>> {
        let turn: Turn = s.parse().with_context(|| format!("Invalid turn: {}", s))?;
        self.play(&turn)
    }

    /// Take back the last turn played
    pub fn undo(&mut self) -> Result<Turn> {
        let (position, turn) = self.history.pop().context("Nothing to undo")?;
        debug!(turn = %turn, "undo");
        self.position = position;
        Ok(turn)
    }

    /// Play a uniformly random legal turn
    pub fn play_random(&mut self) -> Result<(Turn, Option<Side>)> {
        let turn = random_turn(&self.position, &mut self.rng).context("Game is already over")?;
        let winner = self.play(&turn)?;
        Ok((turn, winner))
    }

    /// Random playout from the current position, which is left unchanged
    pub fn playout(&mut self) -> Playout {
        let mut position = self.position.clone();
        let result = playout(&mut position, &mut self.rng, self.options.playout_limit);
        debug!(turns = result.turns, winner = ?result.winner, "playout");
        result
    }

    pub fn perft(&self, depth: usize) -> u64 {
        perft(&self.position, depth)
    }

    /// Changes made by the last turn played
    pub fn last_diff(&self) -> Option<PositionDiff<'_>> {
        self.history.last().map(|(before, _)| PositionDiff { before, after: &self.position })
    }

    pub fn display(&self) -> String {
        self.position.to_string()
    }

    pub fn get_code(&self) -> String {
        self.position.encode()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::God;

    fn seeded() -> Engine {
        let mut engine = Engine::new();
        engine.set_option("seed", "11").unwrap();
        engine
    }

    #[test]
    fn test_play_and_undo() {
        let mut engine = Engine::new();
        assert_eq!(engine.play_str("N@e1,N>e2").unwrap(), None);
        assert_eq!(engine.position.side_to_move(), Side::Dark);
        assert_eq!(engine.history().count(), 1);
        assert_eq!(engine.last_diff().unwrap().lines().len(), 1);

        let turn = engine.undo().unwrap();
        assert_eq!(turn.to_string(), "N@e1,N>e2");
        assert_eq!(engine.position, Position::initial());
        assert!(engine.undo().is_err());
    }

    #[test]
    fn test_illegal_turn_is_rejected() {
        let mut engine = Engine::new();
        assert!(engine.play_str("N>e2").is_err());
        assert!(engine.play_str("N@e1,N>e3").is_err());
        assert!(engine.play_str("garbage").is_err());
        assert_eq!(engine.position, Position::initial());
        assert_eq!(engine.history().count(), 0);
    }

    #[test]
    fn test_play_reports_winner() {
        let mut position = Position::with_gods(&[God::Zeus], &[God::Hera]);
        position.place(Side::Light, God::Zeus, "e8".parse().unwrap());
        position.place(Side::Dark, God::Hera, "a5".parse().unwrap());
        let mut engine = Engine::new();
        engine.set_position(position);
        assert_eq!(engine.play_str("Z>e9").unwrap(), Some(Side::Light));
        assert!(engine.play_str("x").is_err());
    }

    #[test]
    fn test_random_play_is_seeded() {
        let mut a = seeded();
        let mut b = seeded();
        for _ in 0..4 {
            let (turn_a, _) = a.play_random().unwrap();
            let (turn_b, _) = b.play_random().unwrap();
            assert_eq!(turn_a, turn_b);
        }
        assert_eq!(a.position, b.position);
    }

    #[test]
    fn test_playout_keeps_position() {
        let mut engine = seeded();
        engine.set_option("playoutlimit", "30").unwrap();
        let result = engine.playout();
        assert!(result.turns <= 30);
        assert_eq!(engine.position, Position::initial());
    }
}

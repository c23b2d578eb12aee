//! Protocol command handling

use anyhow::{Context, Result};
use indoc::indoc;
use mytikas::{core::Position, engine::Engine};
use std::io::Write;

use super::command::{Command, StartPos};

const HELLO: &str = indoc! {"
    id name mytikas
    option name strictmode type bool default false
    option name seed type string default random
    option name verify type bool default true
    option name playoutlimit type spin default 1000
    mytikasok"};

/// What the session loop should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

fn set_position(engine: &mut Engine, start: &StartPos, turns: &[String]) -> Result<()> {
    let position = match start {
        StartPos::Initial => Position::initial(),
        StartPos::Code(code) => {
            Position::decode(code).with_context(|| format!("Invalid position code: {}", code))?
        }
    };
    // Validate every turn on a scratch engine first so that a bad turn
    // leaves the session where it was.
    let mut scratch = Engine::with_options(engine.options.clone());
    scratch.set_position(position);
    for turn in turns {
        scratch.play_str(turn)?;
    }
    engine.set_position(scratch.position);
    Ok(())
}

fn report_winner(out: &mut impl Write, engine: &Engine) -> Result<()> {
    if let Some(winner) = engine.position.winner() {
        writeln!(out, "info result winner {}", winner.name())?;
    }
    Ok(())
}

/// Handle one protocol command, writing responses to `out`
pub fn handle_command(cmd: &Command, engine: &mut Engine, out: &mut impl Write) -> Result<Flow> {
    match cmd {
        Command::Hello => writeln!(out, "{}", HELLO)?,
        Command::IsReady => writeln!(out, "readyok")?,
        Command::SetOption { name, value } => engine.set_option(name, value)?,
        Command::Position { start, turns } => set_position(engine, start, turns)?,
        Command::Turns => {
            let turns = engine.turns();
            writeln!(out, "turns {}", turns.len())?;
            for turn in turns {
                writeln!(out, "{}", turn)?;
            }
        }
        Command::Play(turn) => {
            engine.play_str(turn)?;
            if let Some(diff) = engine.last_diff() {
                for line in diff.lines() {
                    writeln!(out, "info {}", line)?;
                }
            }
            report_winner(out, engine)?;
        }
        Command::Undo => {
            let turn = engine.undo()?;
            writeln!(out, "undo {}", turn)?;
        }
        Command::Random => {
            let (turn, _) = engine.play_random()?;
            writeln!(out, "turn {}", turn)?;
            report_winner(out, engine)?;
        }
        Command::Playout => {
            let result = engine.playout();
            let winner = result.winner.map_or("none", |side| side.name());
            writeln!(out, "playout turns {} winner {}", result.turns, winner)?;
        }
        Command::Display => write!(out, "{}", engine.display())?,
        Command::GetPos => writeln!(out, "{}", engine.get_code())?,
        Command::Perft(depth) => writeln!(out, "perft {}", engine.perft(*depth))?,
        Command::Quit => return Ok(Flow::Quit),
    }
    out.flush()?;
    Ok(Flow::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(engine: &mut Engine, line: &str) -> Result<String> {
        let mut out = Vec::new();
        handle_command(&line.parse()?, engine, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn test_handshake() {
        let mut engine = Engine::new();
        let out = run(&mut engine, "mytikas").unwrap();
        assert!(out.starts_with("id name mytikas"));
        assert!(out.trim_end().ends_with("mytikasok"));
        assert_eq!(run(&mut engine, "isready").unwrap(), "readyok\n");
    }

    #[test]
    fn test_position_with_turns() {
        let mut engine = Engine::new();
        run(&mut engine, "position startpos turns N@e1,N>e2 Z@e9").unwrap();
        assert_eq!(engine.history().count(), 2);
        let code = run(&mut engine, "getpos").unwrap();

        let mut other = Engine::new();
        run(&mut other, &format!("position code {}", code.trim())).unwrap();
        assert_eq!(other.position, engine.position);
    }

    #[test]
    fn test_bad_position_keeps_session() {
        let mut engine = Engine::new();
        run(&mut engine, "play N@e1").unwrap();
        assert!(run(&mut engine, "position startpos turns N@e1 Z>e2").is_err());
        assert!(run(&mut engine, "position code nonsense").is_err());
        assert_eq!(engine.history().count(), 1);
    }

    #[test]
    fn test_play_prints_changes() {
        let mut engine = Engine::new();
        let out = run(&mut engine, "play N@e1,N>e2").unwrap();
        assert_eq!(out, "info Light Athena is summoned to e2\n");
        assert_eq!(run(&mut engine, "undo").unwrap(), "undo N@e1,N>e2\n");
    }

    #[test]
    fn test_turns_and_perft_agree() {
        let mut engine = Engine::new();
        let turns = run(&mut engine, "turns").unwrap();
        assert!(turns.starts_with("turns 100\n"));
        assert_eq!(turns.lines().count(), 101);
        assert_eq!(run(&mut engine, "perft 1").unwrap(), "perft 100\n");
    }

    #[test]
    fn test_quit() {
        let mut engine = Engine::new();
        let mut out = Vec::new();
        assert_eq!(handle_command(&Command::Quit, &mut engine, &mut out).unwrap(), Flow::Quit);
    }
}

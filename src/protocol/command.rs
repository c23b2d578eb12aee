//! Protocol command parsing

use anyhow::{bail, ensure, Context, Result};
use std::str::FromStr;

/// Where a `position` command starts from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartPos {
    Initial,
    Code(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Handshake: prints the engine id and its options
    Hello,
    IsReady,
    SetOption { name: String, value: String },
    /// Set up a position, then play the listed turns from it
    Position { start: StartPos, turns: Vec<String> },
    Turns,
    Play(String),
    Undo,
    Random,
    Playout,
    Display,
    GetPos,
    Perft(usize),
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        ensure!(!parts.is_empty(), "Empty command");

        let command = match parts[0] {
            "mytikas" => Command::Hello,
            "isready" => Command::IsReady,
            "setoption" => {
                ensure!(
                    parts.len() == 5 && parts[1] == "name" && parts[3] == "value",
                    "Usage: setoption name <name> value <value>"
                );
                Command::SetOption { name: parts[2].to_string(), value: parts[4].to_string() }
            }
            "position" => {
                let (start, rest) = match parts.get(1..) {
                    Some(["startpos", rest @ ..]) => (StartPos::Initial, rest),
                    Some(["code", code, rest @ ..]) => (StartPos::Code(code.to_string()), rest),
                    _ => bail!("Usage: position startpos|code <code> [turns <turn>...]"),
                };
                let turns = match rest {
                    [] => Vec::new(),
                    ["turns", turns @ ..] => turns.iter().map(|t| t.to_string()).collect(),
                    _ => bail!("Expected 'turns' after the position"),
                };
                Command::Position { start, turns }
            }
            "turns" => Command::Turns,
            "play" => {
                ensure!(parts.len() == 2, "Usage: play <turn>");
                Command::Play(parts[1].to_string())
            }
            "undo" => Command::Undo,
            "random" => Command::Random,
            "playout" => Command::Playout,
            "display" | "d" => Command::Display,
            "getpos" => Command::GetPos,
            "perft" => {
                ensure!(parts.len() == 2, "Usage: perft <depth>");
                Command::Perft(parts[1].parse().context("Invalid perft depth")?)
            }
            "quit" => Command::Quit,
            cmd => bail!("Unknown command: {}", cmd),
        };
        Ok(command)
    }
}

/// Parse a protocol line; blank lines yield no command
pub fn parse_command(input: &str) -> Option<Result<Command>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    Some(input.parse())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_position_commands() {
        assert_eq!(
            "position startpos".parse::<Command>().unwrap(),
            Command::Position { start: StartPos::Initial, turns: vec![] }
        );
        assert_eq!(
            "position code Aqq turns N@e1 x".parse::<Command>().unwrap(),
            Command::Position {
                start: StartPos::Code("Aqq".to_string()),
                turns: vec!["N@e1".to_string(), "x".to_string()],
            }
        );
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!("perft 2".parse::<Command>().unwrap(), Command::Perft(2));
        assert_eq!("play N@e1,N>e2".parse::<Command>().unwrap(), Command::Play("N@e1,N>e2".to_string()));
        assert_eq!(
            "setoption name seed value 3".parse::<Command>().unwrap(),
            Command::SetOption { name: "seed".to_string(), value: "3".to_string() }
        );
        assert!(parse_command("   ").is_none());
    }

    #[test_case("go"; "unknown")]
    #[test_case("perft"; "missing depth")]
    #[test_case("perft deep"; "bad depth")]
    #[test_case("position"; "missing start")]
    #[test_case("position startpos N@e1"; "missing turns keyword")]
    #[test_case("setoption name seed 3"; "missing value keyword")]
    #[test_case("play"; "missing turn")]
    fn test_invalid_commands(line: &str) {
        assert!(line.parse::<Command>().is_err());
    }
}

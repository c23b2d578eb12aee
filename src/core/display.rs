use std::fmt;

use anyhow::{bail, ensure, Result};
use colored::{ColoredString, Colorize};

use super::{
    board::{Field, BOARD_SIZE, FIELD_COUNT},
    gods::{God, StatusFx},
    position::{Occupant, Position},
    side::Side,
};

fn paint(side: Side, text: &str) -> ColoredString {
    match side {
        Side::Light => text.bright_blue(),
        Side::Dark => text.bright_red(),
    }
}

fn occupant_char(occupant: Occupant) -> char {
    let id = occupant.god.to_id_char();
    match occupant.side {
        Side::Light => id,
        Side::Dark => id.to_ascii_lowercase(),
    }
}

/// Fields of row `r` (0-based from Light's side) in column order.
fn row_fields(r: i32) -> impl Iterator<Item = Field> {
    (0..BOARD_SIZE).filter_map(move |c| Field::at(r, c))
}

fn indent(r: i32) -> usize {
    ((r - 4).abs() * 2) as usize
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", paint(*self, self.name()))
    }
}

fn fx_labels(fx: StatusFx) -> Vec<&'static str> {
    let mut labels = Vec::new();
    if fx.contains(StatusFx::CHAINED) {
        labels.push("chained");
    }
    if fx.contains(StatusFx::DAMAGE_BOOST) {
        labels.push("+dmg");
    }
    if fx.contains(StatusFx::SPEED_BOOST) {
        labels.push("+mov");
    }
    if fx.contains(StatusFx::SHIELDED) {
        labels.push("shield");
    }
    labels
}

impl Position {
    /// One-line summary of a god's state, such as `Zeus 10/10 e4 [shield]`.
    pub fn describe_god(&self, side: Side, god: God) -> String {
        let state = self.god_state(side, god);
        let info = god.info();
        if state.hp == 0 {
            return format!("{} dead", info.name);
        }
        let place = match state.field {
            Some(field) => field.to_string(),
            None if self.is_summonable(side, god) => "summonable".to_string(),
            None => "reserved".to_string(),
        };
        let labels = fx_labels(state.fx);
        if labels.is_empty() {
            format!("{} {}/{} {}", info.name, state.hp, info.hit, place)
        } else {
            format!("{} {}/{} {} [{}]", info.name, state.hp, info.hit, place, labels.join(", "))
        }
    }

    /// Plain board diagram, row 9 first. Light gods are upper case, Dark
    /// gods lower case, empty fields `.`.
    pub fn diagram(&self) -> String {
        let mut out = String::new();
        for r in (0..BOARD_SIZE).rev() {
            out.push_str(&" ".repeat(indent(r)));
            let cells: Vec<String> = row_fields(r)
                .map(|field| match self.occupant(field) {
                    Some(occupant) => occupant_char(occupant).to_string(),
                    None => ".".to_string(),
                })
                .collect();
            out.push_str(&cells.join("   "));
            out.push('\n');
        }
        out
    }

    /// Builds a position from a diagram in the format of [`Position::diagram`].
    /// Whitespace is ignored and any non-letter marks an empty field. Only
    /// the gods shown are alive; the rest count as dead.
    pub fn from_diagram(side_to_move: Side, diagram: &str) -> Result<Position> {
        let cells = parse_diagram(diagram)?;
        let mut light = Vec::new();
        let mut dark = Vec::new();
        let mut placements = Vec::new();
        for (field, c) in cells {
            if !c.is_ascii_alphabetic() {
                continue;
            }
            let Some(god) = God::from_id_char(c.to_ascii_uppercase()) else {
                bail!("Unknown god {:?} on {}", c, field);
            };
            let (side, gods) = if c.is_ascii_uppercase() {
                (Side::Light, &mut light)
            } else {
                (Side::Dark, &mut dark)
            };
            ensure!(!gods.contains(&god), "{} appears twice for {}", god.name(), side.name());
            gods.push(god);
            placements.push((side, god, field));
        }
        let mut position = Position::with_gods(&light, &dark);
        for (side, god, field) in placements {
            position.place(side, god, field);
        }
        position.set_side_to_move(side_to_move);
        Ok(position)
    }
}

/// Reads the 41 cells of a diagram, row 9 first, returning each field with
/// its character.
pub fn parse_diagram(diagram: &str) -> Result<Vec<(Field, char)>> {
    let chars: Vec<char> = diagram.chars().filter(|c| !c.is_whitespace()).collect();
    ensure!(
        chars.len() == FIELD_COUNT,
        "Diagram has {} cells, expected {}",
        chars.len(),
        FIELD_COUNT
    );
    let mut chars = chars.into_iter();
    let mut cells = Vec::with_capacity(FIELD_COUNT);
    for r in (0..BOARD_SIZE).rev() {
        for field in row_fields(r) {
            if let Some(c) = chars.next() {
                cells.push((field, c));
            }
        }
    }
    cells.sort_by_key(|&(field, _)| field);
    Ok(cells)
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for r in (0..BOARD_SIZE).rev() {
            write!(f, "{} {}", r + 1, " ".repeat(indent(r)))?;
            for (i, field) in row_fields(r).enumerate() {
                if i > 0 {
                    write!(f, "   ")?;
                }
                match self.occupant(field) {
                    Some(occupant) => {
                        write!(f, "{}", paint(occupant.side, &occupant_char(occupant).to_string()))?
                    }
                    None if field == Field::gate(Side::Light) || field == Field::gate(Side::Dark) => {
                        write!(f, "{}", "◇".dimmed())?
                    }
                    None => write!(f, "·")?,
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "  a   b   c   d   e   f   g   h   i")?;
        writeln!(f)?;

        for side in Side::all() {
            writeln!(f, "{}:", side)?;
            for god in God::all() {
                let line = self.describe_god(side, god);
                if self.is_dead(side, god) {
                    writeln!(f, "  {}", line.as_str().dimmed())?;
                } else {
                    writeln!(f, "  {}", line)?;
                }
            }
        }
        writeln!(f)?;
        writeln!(f, "To move: {}", self.side_to_move())?;
        if let Some(side) = self.winner() {
            writeln!(f, "Winner: {}", side)?;
        }
        Ok(())
    }
}

/// Changes between two positions, one line per god that changed.
pub struct PositionDiff<'a> {
    pub before: &'a Position,
    pub after: &'a Position,
}

impl PositionDiff<'_> {
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for side in Side::all() {
            for god in God::all() {
                let (a, b) = (self.before.god_state(side, god), self.after.god_state(side, god));
                if a == b {
                    continue;
                }
                let name = god.name();
                let change = match (a.field, b.field) {
                    _ if a.hp > 0 && b.hp == 0 => format!("{} dies", name),
                    (None, Some(to)) => format!("{} is summoned to {}", name, to),
                    (Some(from), Some(to)) if from != to => format!("{} moves {} -> {}", name, from, to),
                    _ if a.hp != b.hp => format!("{} takes {} damage ({} left)", name, a.hp.saturating_sub(b.hp), b.hp),
                    _ => {
                        let labels = fx_labels(b.fx);
                        if labels.is_empty() {
                            format!("{} loses its effects", name)
                        } else {
                            format!("{} is now {}", name, labels.join(", "))
                        }
                    }
                };
                lines.push(format!("{} {}", side.name(), change));
            }
        }
        lines
    }
}

impl fmt::Display for PositionDiff<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

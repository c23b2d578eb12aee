use anyhow::{Context, Result};
use clap::Parser;
use mytikas::{
    core::Position,
    engine::{Engine, EngineOptions, Seed},
};
use std::io::{self, BufRead};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod protocol;
use protocol::command::parse_command;
use protocol::protocol::{handle_command, Flow};

/// Mytikas rules engine speaking a line protocol on stdin/stdout
#[derive(Parser, Debug)]
#[command(name = "mytikas", version, about, long_about = None)]
struct Args {
    /// Start from this encoded position instead of the initial one
    #[arg(long)]
    position: Option<String>,

    /// Seed for random turns and playouts
    #[arg(long)]
    seed: Option<u64>,

    /// Stop at the first command that fails
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut options = EngineOptions::default();
    options.strict_mode = args.strict;
    if let Some(seed) = args.seed {
        options.seed = Seed::Fixed(seed);
    }
    let mut engine = Engine::with_options(options);
    if let Some(code) = &args.position {
        let position = Position::decode(code).with_context(|| format!("Invalid position code: {}", code))?;
        engine.set_position(position);
    }
    debug!(?args, "session started");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let input = line?;
        let Some(cmd) = parse_command(&input) else { continue };

        match cmd.and_then(|cmd| handle_command(&cmd, &mut engine, &mut stdout)) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(err) if engine.options.strict_mode => return Err(err),
            Err(err) => eprintln!("error: {:#}", err),
        }
    }

    Ok(())
}

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use rand::{Rng as _, SeedableRng as _, rngs::StdRng, seq::IndexedRandom as _};
use serde::Serialize;
use tetrus_engine::{
    Command, CommandError, GameEngine, GameSeed, GameStats, Snapshot, TICK_QUANTUM, TickOutcome,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Bag seed as 32 hex characters (random if omitted)
    #[arg(long)]
    seed: Option<GameSeed>,
    /// Stop after this many ticks even if the game is still running
    #[arg(long, default_value_t = 1_000_000)]
    max_ticks: u64,
    /// Ticks between two random commands
    #[arg(long, default_value_t = 25)]
    input_interval: u64,
    /// Seed of the random input policy
    #[arg(long, default_value_t = 0)]
    policy_seed: u64,
    /// Let the input policy issue soft drops
    #[arg(long, default_value_t = false)]
    allow_soft_drop: bool,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Print the final board to stderr
    #[arg(long, default_value_t = false)]
    show_board: bool,
}

impl Default for SimulateArg {
    fn default() -> Self {
        Self {
            seed: None,
            max_ticks: 1_000_000,
            input_interval: 25,
            policy_seed: 0,
            allow_soft_drop: false,
            output: None,
            show_board: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct SimulationReport {
    seed: GameSeed,
    policy_seed: u64,
    ticks: u64,
    /// Wall-clock length of the run at the reference tick rate
    game_time_ms: u128,
    commands_issued: usize,
    commands_rejected: usize,
    commands: Vec<IssuedCommand>,
    stats: GameStats,
    snapshot: Snapshot,
}

/// One policy command and whether the engine accepted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
struct IssuedCommand {
    tick: u64,
    command: Command,
    accepted: bool,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let report = simulate(arg);
    if arg.show_board {
        eprint!("{}", report.snapshot);
    }
    write_report(&report, arg.output.as_deref())
}

/// Plays one game until it tops out or `max_ticks` ticks have run.
fn simulate(arg: &SimulateArg) -> SimulationReport {
    let SimulateArg {
        seed,
        max_ticks,
        input_interval,
        policy_seed,
        allow_soft_drop,
        output: _,
        show_board: _,
    } = arg;

    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let mut policy = StdRng::seed_from_u64(*policy_seed);
    let choices = if *allow_soft_drop {
        &Command::ALL[..]
    } else {
        &Command::ALL[..3]
    };
    let interval = (*input_interval).max(1);

    let mut engine = GameEngine::with_seed(seed);
    let mut ticks = 0;
    let mut commands = Vec::new();

    while ticks < *max_ticks {
        if ticks.is_multiple_of(interval)
            && let Some(&command) = choices.choose(&mut policy)
        {
            let accepted = match engine.apply(command) {
                Ok(()) => true,
                Err(CommandError::PieceCollision) => false,
                Err(CommandError::GameOver) => break,
            };
            commands.push(IssuedCommand {
                tick: ticks,
                command,
                accepted,
            });
        }

        ticks += 1;
        match engine.tick() {
            TickOutcome::ToppedOut | TickOutcome::Halted => break,
            TickOutcome::Waiting | TickOutcome::Descended | TickOutcome::Locked { .. } => {}
        }
    }

    SimulationReport {
        seed,
        policy_seed: *policy_seed,
        ticks,
        game_time_ms: TICK_QUANTUM.as_millis() * u128::from(ticks),
        commands_issued: commands.len(),
        commands_rejected: commands.iter().filter(|c| !c.accepted).count(),
        commands,
        stats: engine.stats().clone(),
        snapshot: engine.snapshot(),
    }
}

fn write_report(report: &SimulationReport, output: Option<&Path>) -> anyhow::Result<()> {
    let target = output.map_or_else(|| "stdout".to_owned(), |path| path.display().to_string());
    let mut writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {target}"))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout().lock()),
    };

    serde_json::to_writer_pretty(&mut writer, report)
        .with_context(|| format!("Failed to write JSON to {target}"))?;
    writeln!(writer).with_context(|| format!("Failed to write newline to {target}"))?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush output to {target}"))?;
    Ok(())
}

use clap::{Parser, Subcommand};

use self::{pieces::PiecesArg, simulate::SimulateArg};

mod pieces;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Run a headless game with a random input policy and report the result
    Simulate(#[clap(flatten)] SimulateArg),
    /// Print the rotation phases of every piece kind
    Pieces(#[clap(flatten)] PiecesArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Simulate(SimulateArg::default())) {
        Mode::Simulate(arg) => simulate::run(&arg)?,
        Mode::Pieces(arg) => pieces::run(&arg)?,
    }
    Ok(())
}

use clap::{Parser, Subcommand};

use self::{explain::ExplainArg, play::PlayArg, weights::WeightsArg};

mod explain;
mod play;
mod weights;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play a match between two reflex teams
    Play(#[clap(flatten)] PlayArg),
    /// Show how a unit scores each of its legal actions
    Explain(#[clap(flatten)] ExplainArg),
    /// Write the built-in weights as a policy model file
    Weights(#[clap(flatten)] WeightsArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Explain(arg) => explain::run(&arg)?,
        Mode::Weights(arg) => weights::run(&arg)?,
    }
    Ok(())
}

//! ttr CLI - render and measure text from the command line

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Render(ref args) => commands::render::run(args),
        Commands::Measure(ref args) => commands::measure::run(args),
    }
}

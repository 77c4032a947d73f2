//! MultiFx CLI
//!
//! Command-line front end for rendering audio through the effect chain.

use clap::Parser;
use env_logger::Env;
use log::info;

use multifx::cli::{commands, Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("MultiFx v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(cmd) => handle_command(cmd),
        None => {
            println!("MultiFx v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(cmd: Commands) -> anyhow::Result<()> {
    match cmd {
        Commands::Process(args) => commands::process(&args),
        Commands::Params => commands::list_params(),
        Commands::State(args) => commands::state(&args),
    }
}

//! CLI Module
//!
//! Command-line interface for rendering audio files through the effect chain.

pub mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// MultiFx - reorderable phaser / chorus / overdrive / filter chain
#[derive(Parser, Debug)]
#[command(name = "multifx")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a WAV file through the effect chain
    #[command(name = "process")]
    Process(ProcessArgs),

    /// List every parameter with its range and default
    #[command(name = "params")]
    Params,

    /// Print or write a state snapshot
    #[command(name = "state")]
    State(StateArgs),
}

#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Input WAV file
    pub input: PathBuf,

    /// Output WAV file
    pub output: PathBuf,

    /// Processing order, e.g. "ladder,chorus,phaser"
    #[arg(short, long)]
    pub order: Option<String>,

    /// Parameter assignment "Name=value"; choices accept their label
    #[arg(short, long = "set", value_name = "NAME=VALUE")]
    pub set: Vec<String>,

    /// State snapshot applied before --order and --set
    #[arg(long)]
    pub state: Option<PathBuf>,

    /// Processor configuration JSON
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Host block size in frames (overrides the config)
    #[arg(short, long)]
    pub block_size: Option<usize>,

    /// Output bit depth: 16, 24 or 32
    #[arg(long, default_value_t = 24)]
    pub bit_depth: u16,
}

#[derive(Args, Debug)]
pub struct StateArgs {
    /// Processing order, e.g. "chorus,phaser"
    #[arg(short, long)]
    pub order: Option<String>,

    /// Parameter assignment "Name=value"
    #[arg(short, long = "set", value_name = "NAME=VALUE")]
    pub set: Vec<String>,

    /// Write the snapshot here instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_process() {
        let cli = Cli::try_parse_from([
            "multifx",
            "process",
            "in.wav",
            "out.wav",
            "--order",
            "chorus,phaser",
            "--set",
            "Chorus mix %=0.5",
            "-s",
            "Ladder Filter Mode=HPF24",
            "--bit-depth",
            "16",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Process(args)) => {
                assert_eq!(args.input, PathBuf::from("in.wav"));
                assert_eq!(args.order.as_deref(), Some("chorus,phaser"));
                assert_eq!(args.set.len(), 2);
                assert_eq!(args.bit_depth, 16);
                assert!(args.block_size.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_state_with_verbose() {
        let cli = Cli::try_parse_from(["multifx", "-v", "state", "--output", "s.json"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Some(Commands::State(StateArgs { output: Some(_), .. }))));
    }
}

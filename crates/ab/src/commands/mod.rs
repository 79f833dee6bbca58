//! CLI command dispatch and execution

use anyhow::Result;
use clap::{Parser, Subcommand};

mod attach;
mod config_cmd;
mod probe;

/// abridge - attach Python and native debuggers to the running session
#[derive(Parser, Debug)]
#[command(
    name = "abridge",
    version,
    about = "Attach Python and native debuggers to the running interactive session",
    long_about = "Finds the interactive session host, ensures a debugpy listener is up, and \
                  writes a compound Python + LLDB attach configuration to .vscode/launch.json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write attach configurations for the current session
    Attach(attach::AttachArgs),

    /// Check whether a debug listener is accepting connections
    Probe(probe::ProbeArgs),

    /// Show effective configuration
    Config(config_cmd::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Attach(args) => attach::execute(args),
            Commands::Probe(args) => probe::execute(args),
            Commands::Config(args) => config_cmd::execute(args),
        }
    }
}

//! abridge - attach Python and native debuggers to one interactive session
//!
//! A thin CLI over `attach-bridge-core`: finds the session host, makes sure a
//! debugpy listener is up, and writes matching attach entries into
//! `.vscode/launch.json`.

use attach_bridge_core::AttachError;
use clap::Parser;

mod commands;

use commands::Cli;

fn main() {
    attach_bridge_core::logging::init();

    let cli = Cli::parse();

    if let Err(e) = cli.execute() {
        match e.downcast_ref::<AttachError>() {
            Some(attach_err) => {
                eprintln!("Error: failed to {}: {attach_err}", attach_err.step());
                eprintln!("hint: {}", attach_err.remediation());
            }
            None => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }
}

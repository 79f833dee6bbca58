//! Probe command implementation

use anyhow::Result;
use attach_bridge_core::AttachError;
use attach_bridge_core::config::{ConfigOverrides, resolve_options};
use attach_bridge_core::home::get_home_dir;
use attach_bridge_core::launch::validate_port;
use attach_bridge_core::listener::is_listening;
use clap::Args;
use serde_json::json;

/// Check whether a debug listener is accepting connections
#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Port to probe (default: configured listener port)
    #[arg(long, allow_negative_numbers = true)]
    port: Option<i64>,

    /// Host to probe (default: configured listener host)
    #[arg(long)]
    host: Option<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Execute the probe command
pub fn execute(args: ProbeArgs) -> Result<()> {
    let home_dir = get_home_dir()?;
    let current_dir = std::env::current_dir()?;

    let overrides = ConfigOverrides {
        host: args.host,
        port: args.port,
        ..Default::default()
    };
    let options = resolve_options(&overrides, &current_dir, &home_dir)?;

    let port = validate_port(options.port).map_err(AttachError::from)?;

    let listening = is_listening(&options.host, port);

    if args.json {
        let output = json!({
            "host": options.host,
            "port": port,
            "listening": listening,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let state = if listening { "listening" } else { "not listening" };
        println!("{}:{port} {state}", options.host);
    }

    Ok(())
}

//! Attach command implementation

use anyhow::Result;
use attach_bridge_core::attach::{AttachReport, attach_with_debugpy};
use attach_bridge_core::config::{ConfigOverrides, resolve_options};
use attach_bridge_core::home::get_home_dir;
use attach_bridge_core::launch::WriteOutcome;
use attach_bridge_core::session::{AmbientLocator, FixedLocator};
use clap::Args;
use std::path::PathBuf;
use tracing::debug;

/// Write attach configurations for the current session
#[derive(Args, Debug)]
pub struct AttachArgs {
    /// Debug listener port (default: 5678)
    #[arg(long, allow_negative_numbers = true)]
    port: Option<i64>,

    /// Do not start the debugpy listener; assume the session manages it
    #[arg(long)]
    no_listener: bool,

    /// Launch configuration file (default: .vscode/launch.json)
    #[arg(long)]
    config_path: Option<PathBuf>,

    /// Session host PID (default: discover from the environment)
    #[arg(long, allow_negative_numbers = true)]
    pid: Option<i64>,

    /// Listener host (default: 127.0.0.1)
    #[arg(long)]
    host: Option<String>,

    /// Python interpreter used to inject debugpy
    #[arg(long)]
    python: Option<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Execute the attach command
pub fn execute(args: AttachArgs) -> Result<()> {
    let home_dir = get_home_dir()?;
    let current_dir = std::env::current_dir()?;

    let overrides = ConfigOverrides {
        enable_listener: args.no_listener.then_some(false),
        host: args.host,
        port: args.port,
        config_path: args.config_path,
        python: args.python,
    };
    let options = resolve_options(&overrides, &current_dir, &home_dir)?;

    let report = match args.pid {
        Some(pid) => {
            debug!("using explicit pid {pid}");
            attach_with_debugpy(&options, &FixedLocator(pid))?
        }
        None => attach_with_debugpy(&options, &AmbientLocator)?,
    };

    if args.json {
        let mut output = serde_json::to_value(&report)?;
        if let Some(map) = output.as_object_mut() {
            map.insert(
                "next_action".to_string(),
                serde_json::Value::String(report.next_action()),
            );
        }
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_report(&report, &options.host);
    }

    Ok(())
}

fn print_report(report: &AttachReport, host: &str) {
    let path = report.write.path.display();
    let launch = report.write.summary.launch;
    let compounds = report.write.summary.compounds;

    match report.write.outcome {
        WriteOutcome::Created => println!("Created {path}"),
        WriteOutcome::Updated => println!("Updated {path}"),
        WriteOutcome::Unchanged => {
            println!("{path} already up to date")
        }
    }
    println!(
        "  launch configurations: {} created, {} updated",
        launch.created, launch.updated
    );
    println!(
        "  compounds: {} created, {} updated",
        compounds.created, compounds.updated
    );
    println!(
        "  debug listener on {host}:{}: {}",
        report.port, report.listener
    );
    match &report.session.kernel_id {
        Some(kernel) => println!("  session pid: {} (kernel {kernel})", report.pid),
        None => println!("  session pid: {}", report.pid),
    }
    println!();
    println!("Next: {}", report.next_action());
}

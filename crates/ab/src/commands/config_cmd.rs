//! Config command implementation

use anyhow::Result;
use attach_bridge_core::config::{ConfigOverrides, config_sources, resolve_options};
use attach_bridge_core::home::get_home_dir;
use clap::Args;
use serde_json::json;

/// Show effective configuration
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Execute the config command
pub fn execute(args: ConfigArgs) -> Result<()> {
    let home_dir = get_home_dir()?;
    let current_dir = std::env::current_dir()?;

    let options = resolve_options(&ConfigOverrides::default(), &current_dir, &home_dir)?;
    let sources = config_sources(&current_dir, &home_dir);

    if args.json {
        let output = json!({
            "options": options,
            "configFiles": {
                "global": {
                    "path": sources.global.display().to_string(),
                    "exists": sources.global_exists,
                },
                "repo": {
                    "path": sources.repo.as_ref().map(|p| p.display().to_string()),
                    "exists": sources.repo.is_some(),
                }
            }
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Configuration:");
        println!("  listener: {}", if options.enable_listener { "enabled" } else { "disabled" });
        println!("  host: {}", options.host);
        println!("  port: {}", options.port);
        println!("  config_path: {}", options.config_path.display());
        println!("  python: {}", options.python);
        println!("  local_root: {}", options.launch.local_root);
        println!("  remote_root: {}", options.launch.remote_root);
        println!("  just_my_code: {}", options.launch.just_my_code);
        println!();
        println!("Config files:");
        let global_display = sources.global.display();
        let global_status = if sources.global_exists { "(found)" } else { "(not found)" };
        println!("  Global: {global_display} {global_status}");
        match &sources.repo {
            Some(path) => println!("  Repo: {} (found)", path.display()),
            None => println!("  Repo: .abridge.toml (not found)"),
        }
    }

    Ok(())
}

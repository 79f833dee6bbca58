//! Configuration discovery and resolution

use super::types::{FileConfig, Options};
use crate::home::global_config_path;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Repo-local config file name
pub const REPO_CONFIG_FILE: &str = ".abridge.toml";

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Environment variable holds an unusable value
    #[error("{var}={value:?} is not valid: {reason}")]
    InvalidEnv {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Command-line overrides for configuration
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub enable_listener: Option<bool>,
    pub host: Option<String>,
    pub port: Option<i64>,
    pub config_path: Option<PathBuf>,
    pub python: Option<String>,
}

/// Where config files were looked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSources {
    pub global: PathBuf,
    pub global_exists: bool,
    pub repo: Option<PathBuf>,
}

/// Locate the config files that [`resolve_options`] would read.
pub fn config_sources(current_dir: &Path, home_dir: &Path) -> ConfigSources {
    let global = global_config_path(home_dir);
    ConfigSources {
        global_exists: global.exists(),
        global,
        repo: find_repo_local_config(current_dir),
    }
}

/// Resolve options from all sources
///
/// Priority (highest to lowest):
/// 1. Command-line overrides
/// 2. Environment variables (`ABRIDGE_*`)
/// 3. Repo-local config (`.abridge.toml` in current dir or up to git root)
/// 4. Global config (`~/.config/abridge/config.toml`)
/// 5. Defaults
pub fn resolve_options(
    overrides: &ConfigOverrides,
    current_dir: &Path,
    home_dir: &Path,
) -> Result<Options, ConfigError> {
    let mut options = Options::default();
    let sources = config_sources(current_dir, home_dir);

    // 4. Global config
    if sources.global_exists {
        match load_config_file(&sources.global) {
            Ok(file_config) => merge_file_config(&mut options, file_config, None),
            Err(e) => warn!("Failed to parse global config at {:?}: {e}", sources.global),
        }
    }

    // 3. Repo-local config; relative paths are relative to the file
    if let Some(repo_config) = &sources.repo {
        match load_config_file(repo_config) {
            Ok(file_config) => {
                merge_file_config(&mut options, file_config, repo_config.parent());
            }
            Err(e) => warn!("Failed to parse repo config at {repo_config:?}: {e}"),
        }
    }

    // 2. Environment
    apply_env_overrides(&mut options, |key| std::env::var(key).ok())?;

    // 1. Command line
    apply_cli_overrides(&mut options, overrides);

    debug!(?options, "resolved options");
    Ok(options)
}

/// Find repo-local config file
///
/// Searches current directory and parent directories up to git root
fn find_repo_local_config(current_dir: &Path) -> Option<PathBuf> {
    let mut dir = current_dir;

    loop {
        let config_path = dir.join(REPO_CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        // Stop at git root
        if dir.join(".git").exists() {
            break;
        }

        dir = dir.parent()?;
    }

    None
}

fn load_config_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    let config: FileConfig = toml::from_str(&contents)?;
    Ok(config)
}

fn merge_file_config(base: &mut Options, file: FileConfig, base_dir: Option<&Path>) {
    let FileConfig { listener, launch } = file;

    if let Some(enabled) = listener.enabled {
        base.enable_listener = enabled;
    }
    if let Some(host) = listener.host {
        base.host = host;
    }
    if let Some(port) = listener.port {
        base.port = port;
    }
    if let Some(python) = listener.python {
        base.python = python;
    }

    if let Some(path) = launch.config_path {
        base.config_path = match base_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path,
        };
    }
    if let Some(local_root) = launch.local_root {
        base.launch.local_root = local_root;
    }
    if let Some(remote_root) = launch.remote_root {
        base.launch.remote_root = remote_root;
    }
    if let Some(just_my_code) = launch.just_my_code {
        base.launch.just_my_code = just_my_code;
    }
    if let Some(source_map) = launch.source_map {
        base.launch.source_map = source_map;
    }
}

fn parse_switch(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

fn apply_env_overrides<F>(options: &mut Options, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup("ABRIDGE_PORT") {
        options.port = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
            var: "ABRIDGE_PORT",
            value: raw.clone(),
            reason: "expected an integer",
        })?;
    }

    if let Some(raw) = lookup("ABRIDGE_LISTENER") {
        options.enable_listener = parse_switch(&raw).ok_or_else(|| ConfigError::InvalidEnv {
            var: "ABRIDGE_LISTENER",
            value: raw.clone(),
            reason: "expected one of 1/0, true/false, on/off, yes/no",
        })?;
    }

    if let Some(path) = lookup("ABRIDGE_CONFIG_PATH") {
        options.config_path = PathBuf::from(path);
    }

    if let Some(host) = lookup("ABRIDGE_HOST") {
        options.host = host;
    }

    if let Some(python) = lookup("ABRIDGE_PYTHON") {
        options.python = python;
    }

    Ok(())
}

fn apply_cli_overrides(options: &mut Options, overrides: &ConfigOverrides) {
    if let Some(enabled) = overrides.enable_listener {
        options.enable_listener = enabled;
    }

    if let Some(ref host) = overrides.host {
        options.host = host.clone();
    }

    if let Some(port) = overrides.port {
        options.port = port;
    }

    if let Some(ref path) = overrides.config_path {
        options.config_path = path.clone();
    }

    if let Some(ref python) = overrides.python {
        options.python = python.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    const ENV_KEYS: &[&str] = &[
        "ABRIDGE_PORT",
        "ABRIDGE_LISTENER",
        "ABRIDGE_CONFIG_PATH",
        "ABRIDGE_HOST",
        "ABRIDGE_PYTHON",
    ];

    fn with_clean_env<F: FnOnce()>(f: F) {
        let saved: Vec<_> = ENV_KEYS.iter().map(|k| (*k, std::env::var(k).ok())).collect();
        for key in ENV_KEYS {
            unsafe { std::env::remove_var(key) };
        }
        f();
        for (key, value) in saved {
            unsafe {
                match value {
                    Some(v) => std::env::set_var(key, v),
                    None => std::env::remove_var(key),
                }
            }
        }
    }

    fn env_map(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    #[serial]
    fn test_defaults_without_any_config() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join(".git")).unwrap();

        with_clean_env(|| {
            let options =
                resolve_options(&ConfigOverrides::default(), temp_dir.path(), temp_dir.path())
                    .unwrap();
            assert_eq!(options, Options::default());
        });
    }

    #[test]
    #[serial]
    fn test_layer_priority() {
        let temp_dir = TempDir::new().unwrap();
        let home = temp_dir.path().join("home");
        let repo = temp_dir.path().join("repo");
        fs::create_dir_all(home.join(".config/abridge")).unwrap();
        fs::create_dir_all(repo.join(".git")).unwrap();

        fs::write(
            home.join(".config/abridge/config.toml"),
            "[listener]\nport = 6000\nhost = \"localhost\"\npython = \"/opt/py/bin/python\"\n",
        )
        .unwrap();
        fs::write(
            repo.join(".abridge.toml"),
            "[listener]\nport = 7000\n[launch]\nconfig_path = \"ide/launch.json\"\n",
        )
        .unwrap();

        with_clean_env(|| {
            let options = resolve_options(&ConfigOverrides::default(), &repo, &home).unwrap();
            assert_eq!(options.port, 7000);
            assert_eq!(options.host, "localhost");
            assert_eq!(options.python, "/opt/py/bin/python");
            assert_eq!(options.config_path, repo.join("ide/launch.json"));

            let overrides = ConfigOverrides {
                port: Some(8000),
                enable_listener: Some(false),
                ..Default::default()
            };
            let options = resolve_options(&overrides, &repo, &home).unwrap();
            assert_eq!(options.port, 8000);
            assert!(!options.enable_listener);
        });
    }

    #[test]
    #[serial]
    fn test_repo_config_found_from_subdirectory() {
        let temp_dir = TempDir::new().unwrap();
        let repo = temp_dir.path();
        let nested = repo.join("notebooks/analysis");
        fs::create_dir_all(&nested).unwrap();
        fs::create_dir(repo.join(".git")).unwrap();
        fs::write(repo.join(".abridge.toml"), "[listener]\nenabled = false\n").unwrap();

        let sources = config_sources(&nested, temp_dir.path());
        assert_eq!(sources.repo, Some(repo.join(".abridge.toml")));

        with_clean_env(|| {
            let options =
                resolve_options(&ConfigOverrides::default(), &nested, temp_dir.path()).unwrap();
            assert!(!options.enable_listener);
        });
    }

    #[test]
    #[serial]
    fn test_broken_repo_config_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join(".git")).unwrap();
        fs::write(temp_dir.path().join(".abridge.toml"), "[listener\nport = ").unwrap();

        with_clean_env(|| {
            let options =
                resolve_options(&ConfigOverrides::default(), temp_dir.path(), temp_dir.path())
                    .unwrap();
            assert_eq!(options.port, 5678);
        });
    }

    #[test]
    fn test_env_overrides() {
        let mut options = Options::default();
        apply_env_overrides(
            &mut options,
            env_map(&[
                ("ABRIDGE_PORT", "6789"),
                ("ABRIDGE_LISTENER", "off"),
                ("ABRIDGE_CONFIG_PATH", "/tmp/launch.json"),
            ]),
        )
        .unwrap();

        assert_eq!(options.port, 6789);
        assert!(!options.enable_listener);
        assert_eq!(options.config_path, PathBuf::from("/tmp/launch.json"));
    }

    #[test]
    fn test_env_invalid_values() {
        let mut options = Options::default();
        let err = apply_env_overrides(&mut options, env_map(&[("ABRIDGE_PORT", "http")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { var: "ABRIDGE_PORT", .. }));

        let err = apply_env_overrides(&mut options, env_map(&[("ABRIDGE_LISTENER", "maybe")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { var: "ABRIDGE_LISTENER", .. }));
    }

    #[test]
    fn test_parse_switch() {
        assert_eq!(parse_switch("TRUE"), Some(true));
        assert_eq!(parse_switch(" 0 "), Some(false));
        assert_eq!(parse_switch("sometimes"), None);
    }
}

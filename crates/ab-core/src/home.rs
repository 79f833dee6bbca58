//! Home directory resolution
//!
//! The global config file lives at `<home>/.config/abridge/config.toml`.
//! `ABRIDGE_HOME` overrides the platform home directory, which keeps tests
//! and sandboxed runs away from the operator's real config.
//!
//! # Precedence
//!
//! 1. `ABRIDGE_HOME` environment variable (if set and non-empty)
//! 2. `dirs::home_dir()` platform default

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Get the home directory used for global config lookup.
///
/// # Errors
///
/// Returns an error if `ABRIDGE_HOME` is unset and the platform home
/// directory cannot be determined.
pub fn get_home_dir() -> Result<PathBuf> {
    if let Ok(home) = std::env::var("ABRIDGE_HOME") {
        let trimmed = home.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(trimmed));
        }
    }

    dirs::home_dir().context("Could not determine home directory")
}

/// Path of the global config file under `home_dir`.
pub fn global_config_path(home_dir: &std::path::Path) -> PathBuf {
    home_dir.join(".config").join("abridge").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn with_abridge_home<F: FnOnce()>(value: Option<&str>, f: F) {
        let original = env::var("ABRIDGE_HOME").ok();
        unsafe {
            match value {
                Some(v) => env::set_var("ABRIDGE_HOME", v),
                None => env::remove_var("ABRIDGE_HOME"),
            }
        }
        f();
        unsafe {
            match original {
                Some(v) => env::set_var("ABRIDGE_HOME", v),
                None => env::remove_var("ABRIDGE_HOME"),
            }
        }
    }

    #[test]
    #[serial]
    fn test_abridge_home_set() {
        with_abridge_home(Some("/custom/home"), || {
            assert_eq!(get_home_dir().unwrap(), PathBuf::from("/custom/home"));
        });
    }

    #[test]
    #[serial]
    fn test_abridge_home_whitespace_falls_back() {
        with_abridge_home(Some("   "), || {
            let home = get_home_dir().unwrap();
            assert_ne!(home, PathBuf::from("   "));
        });
    }

    #[test]
    fn test_global_config_path_layout() {
        let path = global_config_path(std::path::Path::new("/home/dev"));
        assert_eq!(
            path,
            PathBuf::from("/home/dev/.config/abridge/config.toml")
        );
    }
}
